use std::path::PathBuf;
use thiserror::Error; // Use thiserror for cleaner error definitions

// --- Collector Errors ---

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Meme API returned HTTP {0}")]
    Status(u16),

    #[error("Could not decode meme API response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            SourceError::Status(status.as_u16())
        } else if err.is_decode() {
            SourceError::Decode(err.to_string())
        } else {
            SourceError::Transport(err)
        }
    }
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Could not write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not serialize collection: {0}")]
    Serialize(#[from] serde_json::Error),
}

// --- Publisher Errors ---

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("status {c}"),
        None => "a signal".to_string(),
    }
}

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Failed to execute `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command `{command}` exited with {}", describe_exit(.code))]
    Failed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("No build directory found at {}. Run the site generator first.", .0.display())]
    MissingBuildDir(PathBuf),

    #[error("Could not determine repo remote URL for remote '{0}'. Make sure the git remote exists in your repo.")]
    MissingRemoteUrl(String),

    #[error("Could not create working tree: {0}")]
    WorkingTree(#[source] std::io::Error),

    #[error("Could not copy build output: {0:#}")]
    Copy(#[from] anyhow::Error),

    #[error(transparent)]
    Command(#[from] CommandError),
}

// --- Configuration ---

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid environment variable format for {0}: {1}")]
    InvalidVar(String, String),
    #[error("Could not locate the running executable: {0}")]
    CurrentExe(#[source] std::io::Error),
}

// --- Binary Level Error ---

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Meme source could not be initialized: {0}")]
    SourceInit(#[source] SourceError),
    #[error("Could not save memes: {0}")]
    Storage(#[source] StorageError),
    #[error(transparent)]
    Publish(#[from] PublishError),
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Storage(err)
    }
}

impl From<CommandError> for AppError {
    fn from(err: CommandError) -> Self {
        AppError::Publish(PublishError::Command(err))
    }
}

impl CommandError {
    /// Exit status to propagate when this command aborts the run.
    pub fn exit_code(&self) -> i32 {
        match self {
            CommandError::Failed { code: Some(code), .. } => *code,
            CommandError::Failed { code: None, .. } | CommandError::Spawn { .. } => 1,
        }
    }
}

impl AppError {
    /// Process exit status for this error. Failed commands keep their own status.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Publish(PublishError::Command(e)) => e.exit_code(),
            _ => 1,
        }
    }

    /// `exit_code` narrowed to a process status. Anything outside 1..=255 becomes 1
    /// so a failure can never be reported as success.
    pub fn exit_status(&self) -> u8 {
        match u8::try_from(self.exit_code()) {
            Ok(0) | Err(_) => 1,
            Ok(code) => code,
        }
    }
}
