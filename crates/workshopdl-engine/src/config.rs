//! Engine configuration.

use std::path::{Path, PathBuf};

/// Items handed to one `steamcmd` invocation when nothing else is configured.
pub const DEFAULT_BATCH_SIZE: usize = 10;

// ============================================================================
// Unit Mode
// ============================================================================

/// How many items share one `steamcmd` invocation.
///
/// `PerBatch` is the fast path: one process per batch, one login handshake
/// for up to `batch_size` items. Its trade-off is failure attribution: an
/// error anywhere in the unit fails every item in it. `PerItem` spawns one
/// process per item, trading speed for exact attribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnitMode {
    /// One process per planned batch.
    #[default]
    PerBatch,
    /// One process per item.
    PerItem,
}

impl UnitMode {
    /// Short lowercase name for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PerBatch => "per-batch",
            Self::PerItem => "per-item",
        }
    }
}

// ============================================================================
// Engine Config
// ============================================================================

/// Configuration for one engine run.
///
/// # Example
///
/// ```
/// use workshopdl_engine::EngineConfig;
///
/// let config = EngineConfig::new()
///     .with_batch_size(25)
///     .with_delete_failed(true);
/// assert_eq!(config.batch_size(), 25);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Explicit path to the steamcmd binary. `None` means auto-discover.
    steamcmd_path: Option<PathBuf>,
    /// Maximum items per batch. Zero is treated as one.
    batch_size: Option<usize>,
    /// Process-per-batch or process-per-item execution.
    unit_mode: UnitMode,
    /// Remove partial content directories of failed items after their unit.
    delete_failed: bool,
    /// Override for the workshop content root, mainly for tests.
    content_root: Option<PathBuf>,
}

impl EngineConfig {
    /// Create a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an explicit steamcmd binary instead of auto-discovery.
    #[must_use]
    pub fn with_steamcmd_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.steamcmd_path = Some(path.into());
        self
    }

    /// Set the maximum number of items per batch.
    #[must_use]
    pub const fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = Some(batch_size);
        self
    }

    /// Set the unit execution mode.
    #[must_use]
    pub const fn with_unit_mode(mut self, mode: UnitMode) -> Self {
        self.unit_mode = mode;
        self
    }

    /// Delete partial content of failed items once their unit finishes.
    #[must_use]
    pub const fn with_delete_failed(mut self, delete: bool) -> Self {
        self.delete_failed = delete;
        self
    }

    /// Override where downloaded content is looked up and cleaned up.
    #[must_use]
    pub fn with_content_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.content_root = Some(root.into());
        self
    }

    /// Explicitly configured steamcmd path, if any.
    #[must_use]
    pub fn steamcmd_path(&self) -> Option<&Path> {
        self.steamcmd_path.as_deref()
    }

    /// Effective batch size, never below one.
    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.batch_size.unwrap_or(DEFAULT_BATCH_SIZE).max(1)
    }

    /// Effective unit execution mode.
    #[must_use]
    pub const fn unit_mode(&self) -> UnitMode {
        self.unit_mode
    }

    /// Whether failed items have their partial content removed.
    #[must_use]
    pub const fn delete_failed(&self) -> bool {
        self.delete_failed
    }

    /// Configured content root override, if any.
    #[must_use]
    pub fn content_root(&self) -> Option<&Path> {
        self.content_root.as_deref()
    }
}
