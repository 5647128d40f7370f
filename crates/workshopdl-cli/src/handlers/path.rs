//! Path command handler.
//!
//! Prints the directory where downloaded content lands, without launching
//! anything. Useful for scripting and for finding content by hand.

use std::path::Path;

use anyhow::Result;
use workshopdl_core::paths::{app_content_dir, item_content_dir};
use workshopdl_engine::locate_steamcmd;

use crate::error::CliError;

/// Execute the path command.
///
/// Resolves the steamcmd installation (content lives next to it) and prints
/// the app- or item-level content directory.
pub fn execute(app_id: &str, item_id: Option<&str>, steamcmd: Option<&Path>) -> Result<()> {
    let tool = locate_steamcmd(steamcmd).map_err(CliError::from)?;
    let tool_dir = tool.parent().unwrap_or_else(|| Path::new("."));

    let dir = match item_id {
        Some(item) => item_content_dir(tool_dir, app_id, item),
        None => app_content_dir(tool_dir, app_id),
    };
    println!("{}", dir.display());
    Ok(())
}
