//! Port definitions - the seams between the orchestration core and the
//! outside world.
//!
//! Design rules for this module:
//! - No HTTP, process, or terminal types in any signature.
//! - Every port is `Send + Sync`; the orchestrator holds them across awaits.
//! - Implementations live in adapter crates; this module only ships the
//!   trivial ones (no-op emitter, fixed resolver) that tests and headless
//!   embedders need.

mod event_emitter;
mod resolver;

pub use event_emitter::{CallbackEmitter, NoopRunEmitter, RunEventEmitterPort};
pub use resolver::{CollectionResolverPort, StaticResolver};
