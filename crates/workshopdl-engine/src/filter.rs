//! Existing-content filter.
//!
//! Read-only filesystem probe that decides whether an item is already on
//! disk. A positive probe lets the orchestrator skip the item without
//! spawning anything.

use std::fs;
use std::path::{Path, PathBuf};

use workshopdl_core::CollectionItem;

/// Content directory expected for `item` under a workshop content root.
pub(crate) fn item_dir(content_root: &Path, item: &CollectionItem) -> PathBuf {
    content_root.join(item.app_id()).join(item.item_id())
}

/// True iff the item's content directory exists and contains at least one
/// file anywhere below it.
///
/// A directory tree of empty folders does not count: steamcmd creates the
/// directory before writing anything into it, so presence alone proves
/// nothing. Unreadable directories count as absent so the item gets
/// re-downloaded rather than silently skipped.
#[must_use]
pub fn is_already_downloaded(content_root: &Path, item: &CollectionItem) -> bool {
    dir_has_any_file(&item_dir(content_root, item))
}

fn dir_has_any_file(dir: &Path) -> bool {
    let Ok(entries) = fs::read_dir(dir) else {
        return false;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_file() {
            return true;
        }
        if path.is_dir() && dir_has_any_file(&path) {
            return true;
        }
    }
    false
}
