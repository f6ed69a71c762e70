use std::io::{self, Write};
use std::path::Path;

use anyhow::{bail, Result};
use log::{info, warn};

use crate::plan::family::ModelFamily;
use crate::results::layout::{array_id, replicate_dir, task_dir, NUM_REPLICATES};
use crate::results::read::is_empty_dir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyReplicate {
    pub task_id: u32,
    pub replicate: u32,
    pub array_id: u32,
}

/// Empty replicates found for one model family
#[derive(Debug)]
pub struct FamilyCheck {
    pub family: ModelFamily,
    /// false when the family's results folder doesn't exist at all
    pub found: bool,
    pub empty: Vec<EmptyReplicate>,
}

impl FamilyCheck {
    /// Array IDs to resubmit, ascending
    pub fn rerun_array_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.empty.iter().map(|e| e.array_id).collect();
        ids.sort_unstable();
        ids
    }
}

/// Walk every family's results folder and collect replicates that produced nothing
///
/// A missing task folder means every replicate of that task is empty.
pub fn check_replicates(results_dir: &Path, task_ids: &[u32]) -> Result<Vec<FamilyCheck>> {
    if !results_dir.is_dir() {
        bail!("Directory does not exist: {}", results_dir.display());
    }
    info!("Checking {} tasks x {} replicates in {}", task_ids.len(), NUM_REPLICATES, results_dir.display());

    let checks = ModelFamily::results_order()
        .into_iter()
        .map(|family| check_family(results_dir, family, task_ids))
        .collect();
    Ok(checks)
}

fn check_family(results_dir: &Path, family: ModelFamily, task_ids: &[u32]) -> FamilyCheck {
    let model_dir = results_dir.join(family.timing_dir());
    if !model_dir.exists() {
        warn!("Model folder not found: {}", family.timing_dir());
        return FamilyCheck { family, found: false, empty: Vec::new() };
    }

    let mut empty = Vec::new();
    for (task_index, &task_id) in task_ids.iter().enumerate() {
        let task_path = task_dir(&model_dir, task_id);
        let task_missing = !task_path.exists();
        for replicate in 0..NUM_REPLICATES {
            if task_missing || is_empty_dir(&replicate_dir(&task_path, replicate)) {
                empty.push(EmptyReplicate { task_id, replicate, array_id: array_id(task_index, replicate) });
            }
        }
    }

    FamilyCheck { family, found: true, empty }
}

pub fn print_check_report<W: Write>(checks: &[FamilyCheck], out: &mut W) -> io::Result<()> {
    let rule = "=".repeat(80);
    writeln!(out, "{rule}")?;
    writeln!(out, "Checking for empty replicate folders...")?;
    writeln!(out, "{rule}")?;
    writeln!(out, "{:<15} {:<10} {:<10} {:<10}", "Model", "Task ID", "Replicate", "Array ID")?;
    writeln!(out, "{}", "-".repeat(80))?;

    let mut total = 0;
    for check in checks {
        for e in &check.empty {
            writeln!(out, "{:<15} {:<10} {:<10} {:<10}", check.family.dir_name(), e.task_id, e.replicate, e.array_id)?;
        }
        total += check.empty.len();
    }

    writeln!(out, "{}", "-".repeat(80))?;
    writeln!(out, "Total empty replicate folders found: {total}")?;
    writeln!(out, "{rule}")?;

    writeln!(out, "\n{rule}")?;
    writeln!(out, "Array IDs to Rerun by Model")?;
    writeln!(out, "{rule}")?;
    for check in checks {
        writeln!(out, "\n{}:", check.family.dir_name())?;
        let ids = check.rerun_array_ids();
        match (check.found, ids.is_empty()) {
            (false, _) => writeln!(out, "  Model folder not found")?,
            (true, true) => {
                writeln!(out, "  Count: 0")?;
                writeln!(out, "  All replicates complete!")?;
            }
            (true, false) => {
                let joined: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
                writeln!(out, "  Count: {}", ids.len())?;
                writeln!(out, "  Array IDs: {}", joined.join(","))?;
            }
        }
    }
    writeln!(out, "\n{rule}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    const TASKS: [u32; 2] = [190412, 146818];

    /// Every family folder with every replicate populated
    fn complete_results() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for family in ModelFamily::results_order() {
            for task in TASKS {
                let task_path = task_dir(&dir.path().join(family.timing_dir()), task);
                for replicate in 0..NUM_REPLICATES {
                    let rep = replicate_dir(&task_path, replicate);
                    fs::create_dir_all(&rep).unwrap();
                    fs::write(rep.join("global_accuracy_results.json"), "{}").unwrap();
                }
            }
        }
        dir
    }

    fn family<'a>(checks: &'a [FamilyCheck], name: &str) -> &'a FamilyCheck {
        checks.iter().find(|c| c.family.dir_name() == name).unwrap()
    }

    #[test]
    fn complete_results_have_nothing_to_rerun() {
        let dir = complete_results();
        let checks = check_replicates(dir.path(), &TASKS).unwrap();
        assert_eq!(checks.len(), 7);
        assert!(checks.iter().all(|c| c.found && c.empty.is_empty()));
    }

    #[test]
    fn empty_replicate_maps_to_array_id() {
        let dir = complete_results();
        let rep = replicate_dir(&task_dir(&dir.path().join("GB_Timing"), 146818), 3);
        fs::remove_file(rep.join("global_accuracy_results.json")).unwrap();

        let checks = check_replicates(dir.path(), &TASKS).unwrap();
        let gb = family(&checks, "GB");
        assert_eq!(gb.empty, vec![EmptyReplicate { task_id: 146818, replicate: 3, array_id: 13 }]);
    }

    #[test]
    fn missing_task_folder_reruns_every_replicate() {
        let dir = complete_results();
        fs::remove_dir_all(task_dir(&dir.path().join("RF_Timing"), 190412)).unwrap();

        let checks = check_replicates(dir.path(), &TASKS).unwrap();
        assert_eq!(family(&checks, "RF").rerun_array_ids(), (0..10).collect::<Vec<u32>>());
    }

    #[test]
    fn missing_model_folder_is_reported_not_complete() {
        let dir = complete_results();
        fs::remove_dir_all(dir.path().join("LSVC_Timing")).unwrap();

        let checks = check_replicates(dir.path(), &TASKS).unwrap();
        assert!(!family(&checks, "LSVC").found);

        let mut out = Vec::new();
        print_check_report(&checks, &mut out).unwrap();
        let report = String::from_utf8(out).unwrap();
        assert!(report.contains("LSVC:\n  Model folder not found"));
        assert!(report.contains("RF:\n  Count: 0\n  All replicates complete!"));
    }

    #[test]
    fn missing_results_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(check_replicates(&dir.path().join("Timing_Results"), &TASKS).is_err());
    }
}
