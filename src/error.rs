//! Error types shared by the launcher and the games.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArcadeError {
    #[error("no games found in {}; place game executables next to the launcher", .dir.display())]
    NoGames { dir: PathBuf },

    #[error("unable to read directory {}: {source}", .dir.display())]
    ScanDir {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("terminal error: {0}")]
    Terminal(#[source] io::Error),

    #[error("failed to start {}: {source}", .path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to wait for child process {pid}: {source}")]
    Wait {
        pid: u32,
        #[source]
        source: io::Error,
    },

    #[error("a child process is already running (pid {pid})")]
    AlreadyRunning { pid: u32 },

    #[error("failed to install signal handler: {0}")]
    Signal(#[source] io::Error),

    #[error("unable to read config {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unable to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("invalid config: {field} {message}")]
    InvalidConfig {
        field: &'static str,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, ArcadeError>;

impl ArcadeError {
    pub(crate) fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        ArcadeError::InvalidConfig {
            field,
            message: message.into(),
        }
    }
}
