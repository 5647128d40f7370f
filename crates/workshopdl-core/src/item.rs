//! Resolved collection items.
//!
//! Pure data types with no I/O dependencies.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Display name used when the collection page offers no readable title.
pub const UNKNOWN_NAME: &str = "Unknown";

/// One downloadable workshop item, as resolved from a collection page.
///
/// Immutable after resolution: the resolver produces these once per run and
/// every later component only reads them. `item_id` is the unique key - two
/// values with the same `item_id` refer to the same item.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollectionItem {
    app_id: String,
    item_id: String,
    display_name: String,
}

impl CollectionItem {
    /// Create a new item. Blank display names collapse to [`UNKNOWN_NAME`].
    pub fn new(
        app_id: impl Into<String>,
        item_id: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        let display_name: String = display_name.into();
        Self {
            app_id: app_id.into(),
            item_id: item_id.into(),
            display_name: if display_name.trim().is_empty() {
                UNKNOWN_NAME.to_string()
            } else {
                display_name
            },
        }
    }

    /// Create an item whose page offered no readable title.
    pub fn unnamed(app_id: impl Into<String>, item_id: impl Into<String>) -> Self {
        Self::new(app_id, item_id, UNKNOWN_NAME)
    }

    /// Application (game) identifier the item belongs to.
    #[must_use]
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Workshop item identifier - the unique key within a run.
    #[must_use]
    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    /// Human-readable title; [`UNKNOWN_NAME`] when the page had none.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Whether the resolver found a readable title for this item.
    #[must_use]
    pub fn is_named(&self) -> bool {
        self.display_name != UNKNOWN_NAME
    }
}

impl fmt::Display for CollectionItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.item_id, self.display_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_keeps_fields() {
        let item = CollectionItem::new("294100", "1234567", "Better Roads");
        assert_eq!(item.app_id(), "294100");
        assert_eq!(item.item_id(), "1234567");
        assert_eq!(item.display_name(), "Better Roads");
        assert!(item.is_named());
    }

    #[test]
    fn test_blank_name_collapses_to_unknown() {
        let item = CollectionItem::new("294100", "1234567", "   ");
        assert_eq!(item.display_name(), UNKNOWN_NAME);
        assert!(!item.is_named());
    }

    #[test]
    fn test_unnamed_constructor() {
        let item = CollectionItem::unnamed("294100", "1234567");
        assert_eq!(item.display_name(), UNKNOWN_NAME);
    }

    #[test]
    fn test_display_format() {
        let item = CollectionItem::new("294100", "42", "Mod");
        assert_eq!(item.to_string(), "42 (Mod)");
    }

    #[test]
    fn test_serde_round_trip() {
        let item = CollectionItem::new("294100", "42", "Mod");
        let json = serde_json::to_string(&item).unwrap();
        let back: CollectionItem = serde_json::from_str(&json).unwrap();
        assert_eq!(item, back);
    }
}
