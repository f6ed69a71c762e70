use std::fmt;
use std::fs;
use std::path::Path;

use log::{info, warn};

use crate::plan::batch::SubmissionPlan;

#[derive(Debug)]
pub enum PlanError {
    PlanReadError,
    JSONDecodeError,
    EmptyPlan,
    InvalidCommand(String),
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PlanError::PlanReadError => write!(f, "can't read plan file"),
            PlanError::JSONDecodeError => write!(f, "plan file is not a valid plan"),
            PlanError::EmptyPlan => write!(f, "plan has no families or a family with no job files"),
            PlanError::InvalidCommand(command) => write!(f, "invalid submission command {command:?}"),
        }
    }
}

impl std::error::Error for PlanError {}

/// Read a JSON plan file, e.g.
///
/// ```json
/// {"base_dir": "/scratch/tpec", "command": "sbatch",
///  "families": [{"directory": "RF", "job_files": ["bo", "p0"]}]}
/// ```
pub fn read_plan(path: &Path) -> Result<SubmissionPlan, PlanError> {
    let json_string = read_file(path)?;
    info!("Parsing plan JSON");
    let plan = serde_json::from_str::<SubmissionPlan>(&json_string).map_err(|err| {
        warn!("Can't parse plan at path {}: {}", path.display(), err);
        PlanError::JSONDecodeError
    })?;

    match plan.validate() {
        Ok(_) => {
            info!("Plan is valid");
            Ok(plan)
        }
        Err(err) => {
            warn!("Plan fails validation");
            Err(err)
        }
    }
}

fn read_file(path: &Path) -> Result<String, PlanError> {
    info!("Reading plan at {}", path.display());
    fs::read_to_string(path).map_err(|err| {
        warn!("Can't read plan at path {}: {}", path.display(), err);
        PlanError::PlanReadError
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::batch::DEFAULT_COMMAND;

    fn write_plan(dir: &tempfile::TempDir, json: &str) -> std::path::PathBuf {
        let path = dir.path().join("plan.json");
        fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn command_defaults_to_sbatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_plan(&dir, r#"{"base_dir": "/x", "families": [{"directory": "RF", "job_files": ["bo"]}]}"#);
        let plan = read_plan(&path).unwrap();
        assert_eq!(plan.command, DEFAULT_COMMAND);
        assert_eq!(plan.submissions().len(), 1);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_plan(&dir.path().join("nope.json"));
        assert!(matches!(result, Err(PlanError::PlanReadError)));
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_plan(&dir, r#"{"base_dir": 3}"#);
        assert!(matches!(read_plan(&path), Err(PlanError::JSONDecodeError)));
    }

    #[test]
    fn empty_family_list_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_plan(&dir, r#"{"base_dir": "/x", "command": "sbatch", "families": []}"#);
        assert!(matches!(read_plan(&path), Err(PlanError::EmptyPlan)));
    }
}
