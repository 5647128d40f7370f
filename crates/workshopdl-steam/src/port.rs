//! Port trait implementation for `SteamCollectionClient`.
//!
//! This module implements the core-owned `CollectionResolverPort` trait for
//! `SteamCollectionClient`, handling the conversion between internal errors
//! and core error types.

use async_trait::async_trait;
use workshopdl_core::{CollectionItem, CollectionResolverPort, DownloadError, DownloadResult};

use crate::client::SteamCollectionClient;
use crate::error::SteamError;
use crate::http::HttpBackend;

// ============================================================================
// Error Mapping
// ============================================================================

/// Convert internal `SteamError` to core `DownloadError`.
fn map_error(err: SteamError) -> DownloadError {
    match err {
        // The reference itself was unusable, not the network.
        SteamError::InvalidReference { .. } | SteamError::InvalidUrl(_) => {
            DownloadError::invalid_input(err.to_string())
        }
        SteamError::RequestFailed { .. } | SteamError::MissingAppId | SteamError::Network(_) => {
            DownloadError::fetch(err.to_string())
        }
    }
}

// ============================================================================
// Port Implementation
// ============================================================================

#[async_trait]
impl<B: HttpBackend + Send + Sync> CollectionResolverPort for SteamCollectionClient<B> {
    async fn resolve(&self, reference: &str) -> DownloadResult<Vec<CollectionItem>> {
        self.fetch_collection(reference).await.map_err(map_error)
    }
}
