//! Final run report handed to embedders.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state::ItemState;

/// How a run that got past planning ended.
///
/// Fatal pre-run errors (bad reference, fetch failure, missing tool) never
/// produce a report; they surface as `Err(DownloadError)` from the
/// orchestrator instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// Every batch ran to the end. Individual items may still have failed.
    Completed,
    /// Cancellation was requested; unstarted items are reported `Cancelled`.
    Cancelled,
}

impl RunOutcome {
    /// Stable lowercase name, matching the serde representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Terminal record for a single item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemOutcome {
    pub item_id: String,
    pub display_name: String,
    pub state: ItemState,
    /// Failure or skip detail, when there is one worth surfacing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Aggregate result of one orchestrator run.
///
/// `entries` preserves the resolved collection order. The id vectors are the
/// success/failure sets from the run state; skipped items appear in both
/// `success_ids` and `skipped_ids`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub outcome: RunOutcome,
    pub total: usize,
    pub completed: usize,
    pub progress_percent: f64,
    pub entries: Vec<ItemOutcome>,
    pub success_ids: Vec<String>,
    pub failed_ids: Vec<String>,
    pub skipped_ids: Vec<String>,
    pub cancelled_ids: Vec<String>,
}

impl RunReport {
    /// Whether every item ended in `Succeeded` or `Skipped`.
    #[must_use]
    pub fn is_fully_successful(&self) -> bool {
        self.outcome == RunOutcome::Completed
            && self.failed_ids.is_empty()
            && self.cancelled_ids.is_empty()
    }

    /// Count of items that succeeded by actually downloading (not skipped).
    #[must_use]
    pub fn downloaded_count(&self) -> usize {
        self.success_ids.len() - self.skipped_ids.len()
    }

    /// One-line summary suitable for logs.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{}: {} succeeded ({} skipped), {} failed, {} cancelled of {} total",
            self.outcome.as_str(),
            self.success_ids.len(),
            self.skipped_ids.len(),
            self.failed_ids.len(),
            self.cancelled_ids.len(),
            self.total,
        )
    }
}
