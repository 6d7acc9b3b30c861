//! External command execution.
//!
//! Commands are described with the [`Cmd`] builder and executed through a
//! [`CommandRunner`]. Output is always captured, never streamed.
//!
//! ```ignore
//! use daily_memes::exec::{Cmd, SystemCommandRunner};
//! use daily_memes::domain::CommandRunner;
//!
//! SystemCommandRunner.run(&Cmd::new("git").args(["add", "."]).cwd(work_dir))?;
//! ```

use crate::domain::CommandRunner;
use crate::errors::CommandError;
use std::{
    ffi::{OsStr, OsString},
    fmt,
    path::{Path, PathBuf},
    process::Command,
};

/// Command builder for external process execution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cmd {
    program: OsString,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
}

impl Cmd {
    pub fn new<S: AsRef<OsStr>>(program: S) -> Self {
        Self {
            program: program.as_ref().to_owned(),
            ..Default::default()
        }
    }

    /// Create from a command line split into words (e.g. `["python3", "generate_site.py"]`).
    pub fn from_slice<S: AsRef<OsStr>>(cmd: &[S]) -> Self {
        let mut iter = cmd.iter();
        let program = iter
            .next()
            .map(|s| s.as_ref().to_owned())
            .unwrap_or_default();
        let args = iter.map(|s| s.as_ref().to_owned()).collect();
        Self {
            program,
            args,
            ..Default::default()
        }
    }

    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Self {
        self.args.push(arg.as_ref().to_owned());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(args.into_iter().map(|a| a.as_ref().to_owned()));
        self
    }

    /// Set working directory.
    pub fn cwd<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.cwd = Some(dir.as_ref().to_owned());
        self
    }

    pub fn program(&self) -> &OsStr {
        &self.program
    }

    pub fn get_args(&self) -> impl Iterator<Item = &OsStr> {
        self.args.iter().map(OsString::as_os_str)
    }

    pub fn get_cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    fn program_name(&self) -> String {
        self.program.to_string_lossy().to_string()
    }
}

impl fmt::Display for Cmd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandOutput {
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs commands as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn output(&self, cmd: &Cmd) -> Result<CommandOutput, CommandError> {
        let mut command = Command::new(&cmd.program);
        command.args(&cmd.args);
        if let Some(dir) = &cmd.cwd {
            command.current_dir(dir);
        }

        let output = command.output().map_err(|source| CommandError::Spawn {
            program: cmd.program_name(),
            source,
        })?;

        tracing::debug!(command = %cmd, status = %output.status, "Command finished");
        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_joins_program_and_args() {
        let cmd = Cmd::new("git").args(["commit", "-m", "Daily update"]);
        assert_eq!(cmd.to_string(), "git commit -m Daily update");
    }

    #[test]
    fn from_slice_splits_program_and_args() {
        let cmd = Cmd::from_slice(&["python3", "generate_site.py"]).cwd("/srv/memes");
        assert_eq!(cmd.program(), "python3");
        assert_eq!(cmd.get_args().collect::<Vec<_>>(), vec!["generate_site.py"]);
        assert_eq!(cmd.get_cwd(), Some(Path::new("/srv/memes")));
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let cmd = Cmd::new("daily-memes-definitely-not-a-real-program");
        let err = SystemCommandRunner.output(&cmd).unwrap_err();
        assert!(matches!(err, CommandError::Spawn { .. }));
        assert_eq!(err.exit_code(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn run_reports_exit_code_and_stderr() {
        let cmd = Cmd::new("sh").args(["-c", "echo boom >&2; exit 3"]);
        let err = SystemCommandRunner.run(&cmd).unwrap_err();
        match err {
            CommandError::Failed { code, stderr, .. } => {
                assert_eq!(code, Some(3));
                assert_eq!(stderr, "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn run_captures_stdout_in_working_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let cmd = Cmd::new("pwd").cwd(dir.path());
        let out = SystemCommandRunner.run(&cmd).unwrap();
        assert!(out.success());
        let reported = std::fs::canonicalize(out.stdout.trim()).unwrap();
        assert_eq!(reported, std::fs::canonicalize(dir.path()).unwrap());
    }
}
