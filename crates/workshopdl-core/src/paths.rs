//! Canonical filesystem layout consumed by the existing-content filter and
//! the `path` affordance.
//!
//! steamcmd writes workshop content into a fixed tree relative to the
//! directory holding the binary:
//! `<tool_dir>/steamapps/workshop/content/<app_id>/<item_id>/`.

use std::path::{Path, PathBuf};

/// Root directory steamcmd downloads workshop content into.
#[must_use]
pub fn workshop_content_root(tool_dir: &Path) -> PathBuf {
    tool_dir.join("steamapps").join("workshop").join("content")
}

/// Content directory for one application.
#[must_use]
pub fn app_content_dir(tool_dir: &Path, app_id: &str) -> PathBuf {
    workshop_content_root(tool_dir).join(app_id)
}

/// Expected output directory for one item. Existence plus at least one file
/// below it is what the filter treats as "already downloaded".
#[must_use]
pub fn item_content_dir(tool_dir: &Path, app_id: &str, item_id: &str) -> PathBuf {
    app_content_dir(tool_dir, app_id).join(item_id)
}
