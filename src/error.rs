use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Fatal conditions. Anything recoverable is a [`crate::diagnostics::Diagnostic`] instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("could not access {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: expected an `output` statement, found `{line}`", path.display())]
    MalformedIr { path: PathBuf, line: String },

    #[error("{}:{line}: {reason}", path.display())]
    TokenStream {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("{tool} not found on PATH")]
    ToolNotFound { tool: String },

    #[error("{tool} failed ({status})\n{stderr}")]
    ToolFailed {
        tool: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("llvm backend: {0}")]
    Backend(String),

    #[error("{0}")]
    InvalidInput(String),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
