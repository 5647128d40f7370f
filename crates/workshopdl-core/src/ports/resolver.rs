//! Collection resolution port.

use async_trait::async_trait;

use crate::errors::DownloadResult;
use crate::item::CollectionItem;

/// Resolves a collection reference into its ordered member items.
///
/// Returns the items in page order. A page with no recognizable items is an
/// empty `Ok` vector, not an error; network and parse failures surface as
/// [`DownloadError::Fetch`](crate::errors::DownloadError::Fetch). The
/// orchestrator decides what an empty collection means - the resolver does
/// not.
#[async_trait]
pub trait CollectionResolverPort: Send + Sync {
    /// Resolve `reference` (collection URL or bare ID) into items.
    async fn resolve(&self, reference: &str) -> DownloadResult<Vec<CollectionItem>>;
}

/// Resolver that returns a fixed item list.
///
/// Useful in tests and for embedders that already know their item set and
/// only want the batch/process machinery.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    items: Vec<CollectionItem>,
}

impl StaticResolver {
    /// Create a resolver that always yields `items`.
    #[must_use]
    pub fn new(items: Vec<CollectionItem>) -> Self {
        Self { items }
    }

    /// Create a resolver that always yields nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CollectionResolverPort for StaticResolver {
    async fn resolve(&self, _reference: &str) -> DownloadResult<Vec<CollectionItem>> {
        Ok(self.items.clone())
    }
}
