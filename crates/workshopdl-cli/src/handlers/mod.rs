//! Command handlers.
//!
//! Handlers follow the canonical pattern:
//! - Signature: `pub async fn execute(...) -> Result<()>` (sync where no IO
//!   waits are involved)
//! - Thin wrappers that:
//!   1. Parse/validate CLI-specific input
//!   2. Wire and call engine operations
//!   3. Format output for the terminal
//!
//! Handlers should NOT contain download logic of their own; that lives in
//! `workshopdl-engine`.

pub mod download;
pub mod locate;
pub mod path;
