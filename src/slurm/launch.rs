use std::fmt;
use std::io;
use std::path::Path;
use std::process::Command;

use log::info;

#[derive(Debug)]
pub enum LaunchError {
    /// The command couldn't be started, e.g. missing executable or working directory
    Spawn(io::Error),
    /// The command was killed by a signal and has no exit code
    Terminated,
}

impl fmt::Display for LaunchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LaunchError::Spawn(err) => write!(f, "failed to start: {err}"),
            LaunchError::Terminated => write!(f, "terminated by signal"),
        }
    }
}

impl std::error::Error for LaunchError {}

/// Something that can run `command job_file` from inside a directory
pub trait Launcher {
    /// Returns the exit code of the command
    fn launch(&mut self, command: &str, dir: &Path, job_file: &str) -> Result<i32, LaunchError>;
}

/// Runs the submission command as a real child process
///
/// The working directory is set on the child only, the tool's own working directory never
/// changes. stdout and stderr are inherited so the scheduler's response reaches the terminal
/// untouched.
pub struct ProcessLauncher;

impl Launcher for ProcessLauncher {
    fn launch(&mut self, command: &str, dir: &Path, job_file: &str) -> Result<i32, LaunchError> {
        let mut cmd = Command::new(command);
        cmd.arg(job_file).current_dir(dir);
        info!("Running submission process in {}", dir.display());
        info!("{:?}", &cmd);

        let status = cmd.status().map_err(LaunchError::Spawn)?;
        status.code().ok_or(LaunchError::Terminated)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn exit_code_is_returned() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(ProcessLauncher.launch("true", dir.path(), "bo").unwrap(), 0);
        assert_eq!(ProcessLauncher.launch("false", dir.path(), "bo").unwrap(), 1);
    }

    #[test]
    fn missing_directory_fails_to_spawn() {
        let dir = tempfile::tempdir().unwrap();
        let result = ProcessLauncher.launch("true", &dir.path().join("KSVC"), "bo");
        assert!(matches!(result, Err(LaunchError::Spawn(_))));
    }

    #[test]
    fn job_file_is_resolved_in_the_family_directory() {
        let base = tempfile::tempdir().unwrap();
        let family = base.path().join("RF");
        std::fs::create_dir(&family).unwrap();
        std::fs::write(family.join("p25"), "").unwrap();

        assert_eq!(ProcessLauncher.launch("cat", &family, "p25").unwrap(), 0);
        assert_ne!(ProcessLauncher.launch("cat", base.path(), "p25").unwrap(), 0);
    }
}
