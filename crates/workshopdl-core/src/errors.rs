//! Error taxonomy for the download domain.
//!
//! These errors cross crate boundaries and ride inside events and reports,
//! so the whole enum is `Clone + Serialize + Deserialize` and never embeds a
//! non-serializable source. I/O and HTTP failures are captured as message
//! strings at the boundary where they occur.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result alias used throughout the workshopdl crates.
pub type DownloadResult<T> = Result<T, DownloadError>;

/// Every way a run, or one unit within a run, can go wrong.
///
/// Fatal variants abort the whole run before or during planning; unit-scoped
/// variants (`Spawn`, `ToolReported`) fail one unit's items and leave the
/// remaining batches to run. `Cancelled` is user-initiated and reported
/// distinctly from failure.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DownloadError {
    /// The collection reference was empty or whitespace.
    #[error("invalid collection reference: {reason}")]
    InvalidInput { reason: String },

    /// The resolver could not fetch or parse the collection page.
    #[error("failed to fetch collection: {message}")]
    Fetch { message: String },

    /// The collection page resolved to zero items.
    #[error("no items found")]
    EmptyCollection,

    /// The external downloader binary could not be located.
    #[error("downloader tool not found: {message}")]
    ToolNotFound { message: String },

    /// The external downloader failed to start for one unit.
    #[error("failed to spawn downloader: {message}")]
    Spawn { message: String },

    /// The external downloader reported an error line or exited non-zero.
    #[error("downloader reported failure: {message}")]
    ToolReported { message: String },

    /// The run was cancelled by the embedder.
    #[error("run cancelled")]
    Cancelled,

    /// Filesystem failure outside the tool itself (probe, cleanup).
    #[error("I/O error: {message}")]
    Io { message: String },
}

impl DownloadError {
    /// Create an invalid-input error.
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Create a fetch error.
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::Fetch {
            message: message.into(),
        }
    }

    /// Create a tool-not-found error.
    pub fn tool_not_found(message: impl Into<String>) -> Self {
        Self::ToolNotFound {
            message: message.into(),
        }
    }

    /// Create a spawn error.
    pub fn spawn(message: impl Into<String>) -> Self {
        Self::Spawn {
            message: message.into(),
        }
    }

    /// Create a tool-reported error.
    pub fn tool_reported(message: impl Into<String>) -> Self {
        Self::ToolReported {
            message: message.into(),
        }
    }

    /// Create an I/O error from a message.
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// The kind tag surfaced alongside the message to embedders.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput { .. } => ErrorKind::InvalidInput,
            Self::Fetch { .. } => ErrorKind::Fetch,
            Self::EmptyCollection => ErrorKind::EmptyCollection,
            Self::ToolNotFound { .. } => ErrorKind::ToolNotFound,
            Self::Spawn { .. } => ErrorKind::Spawn,
            Self::ToolReported { .. } => ErrorKind::ToolReported,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Io { .. } => ErrorKind::Io,
        }
    }

    /// Whether this error aborts the whole run.
    ///
    /// Unit-scoped failures and cancellation are not fatal: the former leave
    /// later batches running, the latter ends the run by request, not defect.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput { .. }
                | Self::Fetch { .. }
                | Self::EmptyCollection
                | Self::ToolNotFound { .. }
        )
    }

    /// Whether this error is the cooperative-cancellation signal.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Short human-readable message for user-facing surfaces.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidInput { reason } => {
                format!("The collection reference is not usable: {reason}")
            }
            Self::Fetch { message } => format!("Could not read the collection page: {message}"),
            Self::EmptyCollection => "No items found in the collection.".to_string(),
            Self::ToolNotFound { message } => format!("steamcmd was not found: {message}"),
            Self::Spawn { message } => format!("steamcmd could not be started: {message}"),
            Self::ToolReported { message } => format!("steamcmd reported a failure: {message}"),
            Self::Cancelled => "The run was cancelled.".to_string(),
            Self::Io { message } => format!("Filesystem error: {message}"),
        }
    }
}

impl From<std::io::Error> for DownloadError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}

/// Machine-readable error kind, one per [`DownloadError`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    Fetch,
    EmptyCollection,
    ToolNotFound,
    Spawn,
    ToolReported,
    Cancelled,
    Io,
}

impl ErrorKind {
    /// Stable lowercase name, matching the serde representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::Fetch => "fetch",
            Self::EmptyCollection => "empty_collection",
            Self::ToolNotFound => "tool_not_found",
            Self::Spawn => "spawn",
            Self::ToolReported => "tool_reported",
            Self::Cancelled => "cancelled",
            Self::Io => "io",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(DownloadError::invalid_input("empty").is_fatal());
        assert!(DownloadError::fetch("timeout").is_fatal());
        assert!(DownloadError::EmptyCollection.is_fatal());
        assert!(DownloadError::tool_not_found("nothing on PATH").is_fatal());
        assert!(!DownloadError::spawn("permission denied").is_fatal());
        assert!(!DownloadError::tool_reported("ERROR! Download failed").is_fatal());
        assert!(!DownloadError::Cancelled.is_fatal());
    }

    #[test]
    fn test_cancelled_is_distinct() {
        let err = DownloadError::Cancelled;
        assert!(err.is_cancelled());
        assert!(!err.is_fatal());
        assert_eq!(err.kind(), ErrorKind::Cancelled);
    }

    #[test]
    fn test_empty_collection_message() {
        // Embedders match on this exact phrase for the zero-items outcome.
        assert_eq!(DownloadError::EmptyCollection.to_string(), "no items found");
    }

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(DownloadError::fetch("x").kind(), ErrorKind::Fetch);
        assert_eq!(DownloadError::spawn("x").kind(), ErrorKind::Spawn);
        assert_eq!(ErrorKind::ToolReported.as_str(), "tool_reported");
    }

    #[test]
    fn test_io_error_captured_as_string() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: DownloadError = io.into();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_serializable_across_boundaries() {
        let err = DownloadError::tool_reported("ERROR! Timeout downloading item 42");
        let json = serde_json::to_string(&err).unwrap();
        let back: DownloadError = serde_json::from_str(&json).unwrap();
        assert_eq!(err, back);
    }

    #[test]
    fn test_user_messages_are_not_debug_dumps() {
        let err = DownloadError::tool_not_found("tried PATH and 3 candidates");
        assert!(err.user_message().starts_with("steamcmd was not found"));
    }
}
