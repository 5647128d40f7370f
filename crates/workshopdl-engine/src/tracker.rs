//! Run state tracker.
//!
//! Pure state holder that accumulates item transitions and derives the
//! aggregate progress percentage. No IO and no locking happens here; the
//! orchestrator owns one `RunTracker` per run and is the only writer.

use indexmap::IndexMap;
use uuid::Uuid;
use workshopdl_core::{CollectionItem, ItemOutcome, ItemState, RunOutcome, RunReport};

/// Per-run item states, counters, and the reported progress high-water mark.
///
/// INVARIANT: `completed` equals the number of entries in `states` whose
/// state is terminal. Every transition into a terminal state increments it
/// exactly once.
#[derive(Debug)]
pub struct RunTracker {
    /// Tracked items in resolved order. Duplicate ids in the input collapse
    /// to their first occurrence.
    items: Vec<CollectionItem>,
    /// Current state per item id, same order as `items`.
    states: IndexMap<String, ItemState>,
    /// Failure detail per item, where one was captured.
    details: IndexMap<String, String>,
    /// Items in any terminal state.
    completed: usize,
    /// Fractional progress of the in-flight unit, `0.0..=1.0`.
    unit_fraction: f64,
    /// Highest percentage reported so far. Never decreases within a run.
    high_water: f64,
}

impl RunTracker {
    /// Start tracking `items`, all `Pending`.
    #[must_use]
    pub fn new(items: &[CollectionItem]) -> Self {
        let mut unique = Vec::with_capacity(items.len());
        let mut states = IndexMap::with_capacity(items.len());
        for item in items {
            if !states.contains_key(item.item_id()) {
                states.insert(item.item_id().to_string(), ItemState::Pending);
                unique.push(item.clone());
            }
        }
        Self {
            items: unique,
            states,
            details: IndexMap::new(),
            completed: 0,
            unit_fraction: 0.0,
            high_water: 0.0,
        }
    }

    /// Number of tracked items.
    #[must_use]
    pub fn total(&self) -> usize {
        self.states.len()
    }

    /// Number of items in a terminal state.
    #[must_use]
    pub const fn completed(&self) -> usize {
        self.completed
    }

    /// Current state of one item.
    #[must_use]
    pub fn state_of(&self, item_id: &str) -> Option<ItemState> {
        self.states.get(item_id).copied()
    }

    /// Whether every tracked item has reached a terminal state.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.completed == self.total()
    }

    /// Aggregate progress percentage, `0.0..=100.0`, monotonic.
    #[must_use]
    pub const fn progress_percent(&self) -> f64 {
        self.high_water
    }

    /// Mark an item skipped because its content is already on disk.
    pub fn mark_skipped(&mut self, item_id: &str) {
        self.transition(item_id, ItemState::Skipped, None);
        self.recompute();
    }

    /// Mark a unit's items as in flight and reset the unit fraction.
    pub fn begin_unit(&mut self, item_ids: &[String]) {
        self.unit_fraction = 0.0;
        for item_id in item_ids {
            self.transition(item_id, ItemState::Running, None);
        }
    }

    /// Fold a progress line from the in-flight unit into the aggregate.
    ///
    /// The unit fraction itself is monotonic: a lower percentage after a
    /// higher one is kept at the higher value.
    pub fn observe_unit_progress(&mut self, percent: u8) {
        let fraction = f64::from(percent.min(100)) / 100.0;
        if fraction > self.unit_fraction {
            self.unit_fraction = fraction;
        }
        self.recompute();
    }

    /// Resolve a finished unit: every item still in flight becomes
    /// `Succeeded` or `Failed`. The detail is recorded for failures only.
    pub fn finish_unit(&mut self, item_ids: &[String], succeeded: bool, detail: Option<&str>) {
        let next = if succeeded {
            ItemState::Succeeded
        } else {
            ItemState::Failed
        };
        for item_id in item_ids {
            self.transition(item_id, next, if succeeded { None } else { detail });
        }
        self.unit_fraction = 0.0;
        self.recompute();
    }

    /// Cancel every item that has not reached a terminal state.
    ///
    /// Returns the ids that were cancelled, in tracked order.
    pub fn cancel_remaining(&mut self) -> Vec<String> {
        let remaining: Vec<String> = self
            .states
            .iter()
            .filter(|(_, state)| !state.is_terminal())
            .map(|(item_id, _)| item_id.clone())
            .collect();
        for item_id in &remaining {
            self.transition(item_id, ItemState::Cancelled, None);
        }
        self.unit_fraction = 0.0;
        self.recompute();
        remaining
    }

    /// Snapshot the run into its final report.
    #[must_use]
    pub fn report(&self, run_id: Uuid, outcome: RunOutcome) -> RunReport {
        let mut entries = Vec::with_capacity(self.items.len());
        let mut success_ids = Vec::new();
        let mut failed_ids = Vec::new();
        let mut skipped_ids = Vec::new();
        let mut cancelled_ids = Vec::new();

        for item in &self.items {
            let item_id = item.item_id().to_string();
            let state = self
                .states
                .get(&item_id)
                .copied()
                .unwrap_or(ItemState::Pending);

            match state {
                ItemState::Succeeded => success_ids.push(item_id.clone()),
                ItemState::Skipped => {
                    success_ids.push(item_id.clone());
                    skipped_ids.push(item_id.clone());
                }
                ItemState::Failed => failed_ids.push(item_id.clone()),
                ItemState::Cancelled => cancelled_ids.push(item_id.clone()),
                ItemState::Pending | ItemState::Running => {}
            }

            entries.push(ItemOutcome {
                item_id,
                display_name: item.display_name().to_string(),
                state,
                detail: self.details.get(item.item_id()).cloned(),
            });
        }

        RunReport {
            run_id,
            outcome,
            total: self.total(),
            completed: self.completed,
            progress_percent: self.progress_percent(),
            entries,
            success_ids,
            failed_ids,
            skipped_ids,
            cancelled_ids,
        }
    }

    fn transition(&mut self, item_id: &str, next: ItemState, detail: Option<&str>) {
        let Some(state) = self.states.get_mut(item_id) else {
            tracing::warn!(item_id, "transition requested for untracked item");
            return;
        };
        if !state.can_transition_to(next) {
            tracing::warn!(item_id, from = %state, to = %next, "illegal item transition ignored");
            return;
        }
        *state = next;
        if next.is_terminal() {
            self.completed += 1;
        }
        if let Some(detail) = detail {
            self.details.insert(item_id.to_string(), detail.to_string());
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn recompute(&mut self) {
        let total = self.total();
        if total == 0 {
            return;
        }
        let raw = 100.0 * (self.completed as f64 + self.unit_fraction) / total as f64;
        let raw = raw.clamp(0.0, 100.0);
        if raw > self.high_water {
            self.high_water = raw;
        }
    }
}
