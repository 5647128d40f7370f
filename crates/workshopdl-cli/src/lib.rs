#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

// Silence unused dev-dependency warnings
#[cfg(test)]
use tokio_test as _;

// Dependencies used only by main.rs (the binary target)
use dotenvy as _;
use tracing_subscriber as _;

pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod progress;
pub mod settings;

// Re-export primary types for convenient access
pub use commands::Commands;
pub use error::CliError;
pub use parser::Cli;
pub use progress::ProgressRenderer;
pub use settings::CliSettings;
