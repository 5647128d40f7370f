//! Run events emitted while the orchestrator makes progress.
//!
//! Events are serde-tagged so embedders that forward them over a wire (IPC,
//! websocket) get a discriminated union keyed by `type`. The core emits them
//! synchronously from its control task; anything thread-affine (UI dispatch,
//! terminal redraw) is the embedder's job.

use serde::{Deserialize, Serialize};

use crate::report::RunReport;
use crate::state::{ItemState, RunPhase};

/// One observable step of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RunEvent {
    /// The run moved to a new phase.
    PhaseChanged { phase: RunPhase },

    /// One item changed state. `detail` carries the failure or skip reason
    /// when there is one.
    ItemChanged {
        item_id: String,
        state: ItemState,
        #[serde(skip_serializing_if = "Option::is_none")]
        detail: Option<String>,
    },

    /// Aggregate progress moved. Monotonically non-decreasing within a run.
    Progress { percent: f64 },

    /// The run reached a terminal phase and produced its report.
    Finished { report: RunReport },
}

impl RunEvent {
    /// Create a phase-change event.
    #[must_use]
    pub const fn phase_changed(phase: RunPhase) -> Self {
        Self::PhaseChanged { phase }
    }

    /// Create an item-change event without detail.
    pub fn item_changed(item_id: impl Into<String>, state: ItemState) -> Self {
        Self::ItemChanged {
            item_id: item_id.into(),
            state,
            detail: None,
        }
    }

    /// Create an item-change event carrying a reason.
    pub fn item_changed_with_detail(
        item_id: impl Into<String>,
        state: ItemState,
        detail: impl Into<String>,
    ) -> Self {
        Self::ItemChanged {
            item_id: item_id.into(),
            state,
            detail: Some(detail.into()),
        }
    }

    /// Create a progress event, clamped to the valid 0-100 range.
    #[must_use]
    pub fn progress(percent: f64) -> Self {
        Self::Progress {
            percent: percent.clamp(0.0, 100.0),
        }
    }

    /// Create the terminal event.
    #[must_use]
    pub fn finished(report: RunReport) -> Self {
        Self::Finished { report }
    }

    /// Stable event name, matching the serde `type` tag.
    #[must_use]
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::PhaseChanged { .. } => "phase_changed",
            Self::ItemChanged { .. } => "item_changed",
            Self::Progress { .. } => "progress",
            Self::Finished { .. } => "finished",
        }
    }

    /// The item this event concerns, when it concerns exactly one.
    #[must_use]
    pub fn item_id(&self) -> Option<&str> {
        match self {
            Self::ItemChanged { item_id, .. } => Some(item_id),
            _ => None,
        }
    }
}
