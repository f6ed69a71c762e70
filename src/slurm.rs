//! Submit job-description files to the batch scheduler
//!
//! Submissions are strictly sequential. Each one runs the plan's command with the job file as its
//! only argument, from inside the model family directory. Scheduler output is passed through and
//! never interpreted; only the exit status is recorded.

/// Run the submission command as a child process
pub mod launch;

/// Outcome of a single submission attempt
pub mod state;

/// Walk a plan and submit every job file
pub mod submit;
