use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use crate::plan::family::ModelFamily;
use crate::plan::read::PlanError;
use crate::variant::SweepVariant;

/// Submission command used when a plan doesn't name one
pub static DEFAULT_COMMAND: &str = "sbatch";

/// Job-description files submitted from one model family directory
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FamilyBatch {
    /// Directory name relative to the plan's base directory
    pub directory: String,
    pub job_files: Vec<String>,
}

/// Every submission to make, in order
///
/// There is exactly one `command` per plan so every directory is submitted with the same
/// executable.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SubmissionPlan {
    pub base_dir: PathBuf,
    #[serde(default = "default_command")]
    pub command: String,
    pub families: Vec<FamilyBatch>,
}

/// A single job file to submit from a directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub directory: PathBuf,
    pub job_file: String,
}

impl SubmissionPlan {
    /// All seven families in submission order, each with the variant's job files
    pub fn for_variant(variant: SweepVariant, base_dir: &Path, command: &str) -> SubmissionPlan {
        info!("Building {variant} plan in {}", base_dir.display());
        let job_files: Vec<String> = variant.job_files().iter().map(|f| f.to_string()).collect();
        let families = ModelFamily::SUBMISSION_ORDER
            .iter()
            .map(|family| FamilyBatch { directory: family.dir_name().to_string(), job_files: job_files.clone() })
            .collect();

        SubmissionPlan { base_dir: base_dir.to_path_buf(), command: command.to_string(), families }
    }

    pub fn family_dir(&self, batch: &FamilyBatch) -> PathBuf {
        self.base_dir.join(&batch.directory)
    }

    /// Flatten into (directory, job file) pairs: family-major, file-minor
    pub fn submissions(&self) -> Vec<Submission> {
        self.families
            .iter()
            .flat_map(|batch| {
                let directory = self.family_dir(batch);
                batch.job_files.iter().map(move |job_file| Submission {
                    directory: directory.clone(),
                    job_file: job_file.clone(),
                })
            })
            .collect()
    }

    /// Reject plans that would submit nothing or can't name a command
    pub fn validate(&self) -> Result<(), PlanError> {
        if self.command.trim().is_empty() || self.command.chars().any(char::is_whitespace) {
            return Err(PlanError::InvalidCommand(self.command.clone()));
        }
        if self.families.is_empty() || self.families.iter().any(|batch| batch.job_files.is_empty()) {
            return Err(PlanError::EmptyPlan);
        }
        Ok(())
    }
}

fn default_command() -> String {
    DEFAULT_COMMAND.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tuning_plan_has_six_files_per_family() {
        let plan = SubmissionPlan::for_variant(SweepVariant::Tuning, Path::new("/work"), "sbatch");
        let submissions = plan.submissions();
        assert_eq!(submissions.len(), 42);

        let first_family: Vec<&str> = submissions[..6].iter().map(|s| s.job_file.as_str()).collect();
        assert_eq!(first_family, ["bo", "p0", "p25", "p50", "p75", "p100"]);
        assert!(submissions[..6].iter().all(|s| s.directory == Path::new("/work/RF")));
        assert_eq!(submissions[41].directory, Path::new("/work/LSVC"));
    }

    #[test]
    fn diversity_plan_visits_families_in_order() {
        let plan = SubmissionPlan::for_variant(SweepVariant::Diversity, Path::new("base"), "sbatch");
        let dirs: Vec<PathBuf> = plan.submissions().into_iter().map(|s| s.directory).collect();
        let expected: Vec<PathBuf> = ["RF", "DT", "ET", "GB", "KSVC", "LSGD", "LSVC"]
            .iter()
            .map(|d| Path::new("base").join(d))
            .collect();
        assert_eq!(dirs, expected);
    }

    #[test]
    fn command_with_whitespace_is_rejected() {
        let plan = SubmissionPlan::for_variant(SweepVariant::Diversity, Path::new("."), "s batch");
        assert!(matches!(plan.validate(), Err(PlanError::InvalidCommand(_))));
    }

    #[test]
    fn family_without_files_is_rejected() {
        let mut plan = SubmissionPlan::for_variant(SweepVariant::Diversity, Path::new("."), "sbatch");
        plan.families[3].job_files.clear();
        assert!(matches!(plan.validate(), Err(PlanError::EmptyPlan)));
    }
}
