//! Main commands enum and primary subcommands.
//!
//! This module defines the available commands for the CLI tool.

use std::path::PathBuf;

use clap::Subcommand;

use workshopdl_engine::DEFAULT_BATCH_SIZE;

/// Available commands for the workshop downloader.
#[derive(Subcommand)]
pub enum Commands {
    /// Download every item in a workshop collection
    Download {
        /// Collection URL or numeric collection ID. With no value, the
        /// last-used reference from the settings file is reused.
        reference: Option<String>,

        /// Items per steamcmd invocation
        #[arg(short, long, default_value_t = DEFAULT_BATCH_SIZE)]
        batch_size: usize,

        /// Explicit path to the steamcmd executable
        #[arg(long)]
        steamcmd: Option<PathBuf>,

        /// Run one steamcmd process per item instead of per batch
        #[arg(long)]
        per_item: bool,

        /// Remove partially downloaded content when an item fails
        #[arg(long)]
        delete_failed: bool,
    },

    /// Print the expected content directory for an app or a single item
    Path {
        /// Application (game) identifier
        app_id: String,

        /// Workshop item identifier
        item_id: Option<String>,

        /// Explicit path to the steamcmd executable
        #[arg(long)]
        steamcmd: Option<PathBuf>,
    },

    /// Print the discovered steamcmd path
    Locate,
}
