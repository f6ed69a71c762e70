use std::fmt;

/// What happened to one submission attempt.
///
/// Only the exit status of the submission command is looked at. A zero exit counts as submitted,
/// anything else is failed, whatever the scheduler printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionState {
    Submitted,
    /// --dry-run was set, nothing was launched
    DryRun,
    /// Command ran and exited non-zero
    Failed(i32),
    /// Command never produced an exit code (couldn't start, or was killed)
    NotLaunched(String),
}

impl SubmissionState {
    pub fn is_failure(&self) -> bool {
        matches!(self, SubmissionState::Failed(_) | SubmissionState::NotLaunched(_))
    }
}

impl fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SubmissionState::Submitted => write!(f, "submitted"),
            SubmissionState::DryRun => write!(f, "dry run"),
            SubmissionState::Failed(code) => write!(f, "failed (exit {code})"),
            SubmissionState::NotLaunched(reason) => write!(f, "not launched ({reason})"),
        }
    }
}
