//! CLI-specific error types and mappings.
//!
//! This module provides the CLI error type plus mappings from
//! `DownloadError` to exit codes and user-facing messages.

use thiserror::Error;
use workshopdl_core::{DownloadError, ErrorKind};

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid arguments or missing required input.
    #[error("{0}")]
    Usage(String),

    /// The collection could not be fetched or contained no items.
    #[error("{0}")]
    Fetch(String),

    /// steamcmd could not be located.
    #[error("{0}")]
    ToolNotFound(String),

    /// The run was cancelled by the user.
    #[error("run cancelled")]
    Cancelled,

    /// The run finished but some items failed.
    #[error("{failed} of {total} items failed")]
    Failures { failed: usize, total: usize },

    /// Settings or filesystem error.
    #[error("{0}")]
    Io(String),

    /// Process-level failure outside a download unit.
    #[error("{0}")]
    Process(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 0: Success (including runs where every item was skipped)
    /// - 1: Run completed but items failed
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 69: Remote service unavailable (EX_UNAVAILABLE)
    /// - 71: OS-level process error (EX_OSERR)
    /// - 74: IO error (EX_IOERR)
    /// - 127: Tool not found (shell convention for missing commands)
    /// - 130: Interrupted (128 + SIGINT)
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Failures { .. } => 1,
            Self::Usage(_) => 2,
            Self::Fetch(_) => 69,
            Self::Process(_) => 71,
            Self::Io(_) => 74,
            Self::ToolNotFound(_) => 127,
            Self::Cancelled => 130,
        }
    }
}

impl From<DownloadError> for CliError {
    fn from(err: DownloadError) -> Self {
        let message = err.user_message();
        match err.kind() {
            ErrorKind::InvalidInput => Self::Usage(message),
            ErrorKind::Fetch | ErrorKind::EmptyCollection => Self::Fetch(message),
            ErrorKind::ToolNotFound => Self::ToolNotFound(message),
            ErrorKind::Cancelled => Self::Cancelled,
            ErrorKind::Spawn | ErrorKind::ToolReported => Self::Process(message),
            ErrorKind::Io => Self::Io(message),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
