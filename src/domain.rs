use crate::errors::{CommandError, SourceError, StorageError};
use crate::exec::{Cmd, CommandOutput};
use crate::models::{ApiMeme, MemeRecord};
use async_trait::async_trait;
use std::path::PathBuf;

/// A remote endpoint that hands out one random meme per call.
#[async_trait]
pub trait MemeSource: Send + Sync {
    /// Performs a single request. Every call counts as one collector attempt.
    async fn fetch(&self) -> Result<ApiMeme, SourceError>;
}

/// Trait defining where a day's collection ends up.
pub trait CollectionStore {
    /// Persists the whole collection, replacing anything saved earlier for the same day.
    /// Returns the location written to.
    fn save(&self, records: &[MemeRecord]) -> Result<PathBuf, StorageError>;
}

/// Runs external programs to completion with their output captured.
pub trait CommandRunner {
    /// Runs `cmd` and reports how it exited. Only a failure to start the
    /// process is an error here; a non-zero exit is returned as-is.
    fn output(&self, cmd: &Cmd) -> Result<CommandOutput, CommandError>;

    /// Runs `cmd` and turns a non-zero exit into `CommandError::Failed`,
    /// logging the captured stderr first.
    fn run(&self, cmd: &Cmd) -> Result<CommandOutput, CommandError> {
        tracing::info!("+ {}", cmd);
        let output = self.output(cmd)?;
        if output.success() {
            return Ok(output);
        }

        let stderr = output.stderr.trim().to_string();
        tracing::error!(command = %cmd, code = ?output.code, "ERROR: {}", stderr);
        Err(CommandError::Failed {
            command: cmd.to_string(),
            code: output.code,
            stderr,
        })
    }
}
