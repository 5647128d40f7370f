//! Locate command handler.
//!
//! Prints where the steamcmd executable was found, using the same discovery
//! order the download command uses.

use anyhow::Result;
use workshopdl_engine::locate_steamcmd;

use crate::error::CliError;

/// Execute the locate command.
pub fn execute() -> Result<()> {
    let tool = locate_steamcmd(None).map_err(CliError::from)?;
    println!("{}", tool.display());
    Ok(())
}
