//! Pure batch planner.
//!
//! Splits the resolved item list into ordered batches of at most
//! `batch_size` items. No IO, no state; given the same input it always
//! produces the same plan.

use workshopdl_core::CollectionItem;

/// One planned batch.
///
/// Guaranteed non-empty: `plan_batches` never produces an empty batch, and
/// there is no other way to construct one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    items: Vec<CollectionItem>,
}

impl Batch {
    /// Items in this batch, in input order.
    #[must_use]
    pub fn items(&self) -> &[CollectionItem] {
        &self.items
    }

    /// Number of items in this batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false for planner-produced batches.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Split `items` into batches of at most `batch_size`, preserving order.
///
/// `ceil(items.len() / batch_size)` batches come back; every batch except
/// possibly the last is exactly `batch_size` long. An empty input plans to
/// zero batches. A `batch_size` of zero is treated as one.
#[must_use]
pub fn plan_batches(items: &[CollectionItem], batch_size: usize) -> Vec<Batch> {
    let size = batch_size.max(1);
    items
        .chunks(size)
        .map(|chunk| Batch {
            items: chunk.to_vec(),
        })
        .collect()
}
