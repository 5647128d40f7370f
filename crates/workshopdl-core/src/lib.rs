#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod errors;
pub mod events;
pub mod item;
pub mod paths;
pub mod ports;
pub mod report;
pub mod state;

// Re-export commonly used types for convenience
pub use errors::{DownloadError, DownloadResult, ErrorKind};
pub use events::RunEvent;
pub use item::{CollectionItem, UNKNOWN_NAME};
pub use ports::{
    CallbackEmitter, CollectionResolverPort, NoopRunEmitter, RunEventEmitterPort, StaticResolver,
};
pub use report::{ItemOutcome, RunOutcome, RunReport};
pub use state::{ItemState, RunPhase};

// Silence unused dev-dependency warnings until we add mock-based tests
#[cfg(test)]
use mockall as _;
#[cfg(test)]
use tokio_test as _;
