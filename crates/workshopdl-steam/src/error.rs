//! Internal error types for collection page operations.
//!
//! These errors are internal to `workshopdl-steam` and are mapped to the core
//! error taxonomy at the port boundary.

use thiserror::Error;

/// Result type alias for collection page operations.
pub type SteamResult<T> = Result<T, SteamError>;

/// Errors related to fetching and parsing a collection page.
#[derive(Debug, Error)]
pub enum SteamError {
    /// The reference was not a collection ID or a recognizable collection URL.
    #[error("'{reference}' is not a collection ID or steamcommunity.com collection URL")]
    InvalidReference {
        /// The reference as supplied by the caller
        reference: String,
    },

    /// The page request failed with an HTTP error status.
    #[error("collection page request failed with status {status}: {url}")]
    RequestFailed {
        /// HTTP status code
        status: u16,
        /// The URL that was requested
        url: String,
    },

    /// The page lists items but no `/app/<id>` link to attribute them to.
    ///
    /// Download directives need the app ID, so items without one are
    /// undownloadable.
    #[error("collection page has items but no recognizable app id")]
    MissingAppId,

    /// Network or HTTP client error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
