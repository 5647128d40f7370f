//! Collection page client.

use workshopdl_core::CollectionItem;

use crate::config::SteamClientConfig;
use crate::http::{HttpBackend, ReqwestBackend};
use crate::parse;
use crate::reference::canonical_collection_url;
use crate::error::{SteamError, SteamResult};

// ============================================================================
// Type Aliases
// ============================================================================

/// Default collection client using the reqwest HTTP backend.
pub type DefaultCollectionClient = SteamCollectionClient<ReqwestBackend>;

// ============================================================================
// Client
// ============================================================================

/// Client that turns a collection reference into its member items.
///
/// Generic over an HTTP backend for testing; production code uses
/// `DefaultCollectionClient::new()` and talks to it through
/// `CollectionResolverPort`.
pub struct SteamCollectionClient<B: HttpBackend> {
    pub(crate) backend: B,
}

impl DefaultCollectionClient {
    /// Create a new client with the given configuration.
    #[must_use]
    pub fn new(config: &SteamClientConfig) -> Self {
        Self {
            backend: ReqwestBackend::new(config),
        }
    }

    /// Create a new client with default configuration.
    #[must_use]
    pub fn default_client() -> Self {
        Self::new(&SteamClientConfig::default())
    }
}

impl<B: HttpBackend> SteamCollectionClient<B> {
    /// Create a new client with a custom backend.
    ///
    /// Use this for testing with a fake backend.
    #[cfg(test)]
    pub(crate) const fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    /// Fetch and parse one collection page.
    ///
    /// Zero recognizable items is `Ok(vec![])`; items without an app id to
    /// attribute them to are an error, because download directives need one.
    pub(crate) async fn fetch_collection(
        &self,
        reference: &str,
    ) -> SteamResult<Vec<CollectionItem>> {
        let url = canonical_collection_url(reference)?;
        tracing::debug!(url = %url, "fetching collection page");

        let html = self.backend.get_text(&url).await?;
        let pairs = parse::extract_items(&html);
        if pairs.is_empty() {
            tracing::info!(url = %url, "collection page has no recognizable items");
            return Ok(Vec::new());
        }

        let app_id = parse::extract_app_id(&html).ok_or(SteamError::MissingAppId)?;
        let items: Vec<CollectionItem> = pairs
            .into_iter()
            .map(|(item_id, title)| match title {
                Some(title) => CollectionItem::new(&app_id, item_id, title),
                None => CollectionItem::unnamed(&app_id, item_id),
            })
            .collect();

        tracing::info!(app_id = %app_id, count = items.len(), "resolved collection");
        Ok(items)
    }
}
