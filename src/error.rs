use std::io;

use thiserror::Error;

/// Invalid command line input, detected before any prompt is shown.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("no files given to rename")]
    NoFiles,
    #[error("a series id or name is required")]
    MissingSeries,
    #[error("a TheTVDB API key is required (--api-key or TVDB_API_KEY)")]
    MissingApiKey,
}

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("cancelled by user")]
    Cancelled,
    #[error("choice {index} is out of range ({count} options)")]
    OutOfRange { index: usize, count: usize },
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
}

/// Failure of a matching and renaming run as a whole, as opposed to a
/// single entry in it.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error(transparent)]
    Prompt(#[from] PromptError),
    #[error("could not write output: {0}")]
    Output(#[from] io::Error),
}

impl ProcessError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ProcessError::Prompt(PromptError::Cancelled))
    }
}

/// Why a single rename did not happen.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenameError {
    #[error("target file already exists")]
    AlreadyExists,
    #[error("permission denied")]
    NoPermission,
    #[error("source file not found")]
    SourceNotFound,
    #[error("{0}")]
    Other(String),
}

impl From<io::Error> for RenameError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => RenameError::SourceNotFound,
            io::ErrorKind::PermissionDenied => RenameError::NoPermission,
            io::ErrorKind::AlreadyExists => RenameError::AlreadyExists,
            _ => RenameError::Other(err.to_string()),
        }
    }
}
