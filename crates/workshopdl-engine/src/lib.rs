#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod config;
pub mod filter;
pub mod locate;
pub mod orchestrator;
pub mod output;
pub mod plan;
pub mod steamcmd;
pub mod tracker;

// ============================================================================
// Public API
// ============================================================================

pub use config::{DEFAULT_BATCH_SIZE, EngineConfig, UnitMode};
pub use filter::is_already_downloaded;
pub use locate::{STEAMCMD_ENV, locate_steamcmd};
pub use orchestrator::Orchestrator;
pub use output::{LineEvent, classify_line};
pub use plan::{Batch, plan_batches};
pub use steamcmd::{StreamSource, build_command, run_unit};
pub use tracker::RunTracker;

// Re-export core types so engine consumers get the full run vocabulary
// without importing workshopdl-core themselves.
pub use workshopdl_core::{
    CollectionItem, CollectionResolverPort, DownloadError, DownloadResult, ErrorKind, ItemState,
    RunEvent, RunEventEmitterPort, RunOutcome, RunPhase, RunReport,
};

// Silence unused dev-dependency warnings
#[cfg(test)]
use tokio_test as _;
