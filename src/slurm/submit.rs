use std::io::{self, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use log::{error, info};

use crate::plan::batch::{Submission, SubmissionPlan};
use crate::slurm::launch::Launcher;
use crate::slurm::state::SubmissionState;

/// Printed once after every submission has been attempted
pub static COMPLETION_MESSAGE: &str = "All jobs submitted!";

#[derive(Debug)]
pub struct SubmissionRecord {
    pub submission: Submission,
    pub state: SubmissionState,
    pub attempted_at: DateTime<Utc>,
}

/// Every attempt made for a plan, in the order they were made
#[derive(Debug, Default)]
pub struct SubmissionReport {
    pub records: Vec<SubmissionRecord>,
}

impl SubmissionReport {
    pub fn submitted(&self) -> usize {
        self.records.iter().filter(|r| r.state == SubmissionState::Submitted).count()
    }

    pub fn failed(&self) -> Vec<&SubmissionRecord> {
        self.records.iter().filter(|r| r.state.is_failure()).collect()
    }

    pub fn is_success(&self) -> bool {
        self.failed().is_empty()
    }
}

/// Submit every job file in the plan, one family directory at a time
///
/// Nothing is checked up front and nothing is retried: a missing directory or job file shows up
/// as a failed attempt and the next pair is submitted anyway. The completion message is written
/// to `out` exactly once after the last attempt, followed by a count of failures.
pub fn submit_plan<L: Launcher, W: Write>(
    plan: &SubmissionPlan,
    launcher: &mut L,
    dry_run: bool,
    out: &mut W,
) -> io::Result<SubmissionReport> {
    let mut report = SubmissionReport::default();

    for batch in &plan.families {
        let dir = plan.family_dir(batch);
        info!("Entering {}", dir.display());

        for job_file in &batch.job_files {
            let state = match dry_run {
                true => {
                    info!("--dry-run set, not running {} {} in {}", plan.command, job_file, dir.display());
                    SubmissionState::DryRun
                }
                false => attempt(launcher, &plan.command, &dir, job_file),
            };
            report.records.push(SubmissionRecord {
                submission: Submission { directory: dir.clone(), job_file: job_file.clone() },
                state,
                attempted_at: Utc::now(),
            });
        }
    }

    writeln!(out, "{COMPLETION_MESSAGE}")?;
    write_summary(&report, out)?;
    Ok(report)
}

fn attempt<L: Launcher>(launcher: &mut L, command: &str, dir: &Path, job_file: &str) -> SubmissionState {
    match launcher.launch(command, dir, job_file) {
        Ok(0) => {
            info!("Submitted {job_file} from {}", dir.display());
            SubmissionState::Submitted
        }
        Ok(code) => {
            error!("{command} {job_file} in {} exited with {code}", dir.display());
            SubmissionState::Failed(code)
        }
        Err(err) => {
            error!("{command} {job_file} in {}: {err}", dir.display());
            SubmissionState::NotLaunched(err.to_string())
        }
    }
}

fn write_summary<W: Write>(report: &SubmissionReport, out: &mut W) -> io::Result<()> {
    let failed = report.failed();
    writeln!(out, "{} of {} submissions succeeded, {} failed", report.submitted(), report.records.len(), failed.len())?;
    for record in failed {
        writeln!(
            out,
            "  {} {}/{}: {}",
            record.attempted_at.format("%Y-%m-%dT%H:%M:%SZ"),
            record.submission.directory.display(),
            record.submission.job_file,
            record.state
        )?;
    }
    Ok(())
}
