#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]
// Allow private types in public type alias - DefaultCollectionClient is meant
// to be used through the CollectionResolverPort trait, not its internal
// generic structure
#![allow(private_interfaces)]

mod client;
mod config;
mod error;
mod http;
mod parse;
mod port;
mod reference;

// ============================================================================
// Public API
// ============================================================================

// Client
pub use client::DefaultCollectionClient;

// Configuration
pub use config::SteamClientConfig;

// Silence unused dev-dependency warnings
#[cfg(test)]
use mockall as _;
#[cfg(test)]
use tokio_test as _;
