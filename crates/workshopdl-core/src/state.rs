//! Per-item and per-run state machines.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle of a single item within one run.
///
/// `Pending -> Running -> {Succeeded, Failed}`, with `Skipped` reachable only
/// from `Pending` (existing-content filter, before any process is spawned),
/// `Cancelled` reachable from `Pending` or `Running` once cancellation is
/// requested, and `Failed` also reachable straight from `Pending` for items
/// whose unit was never attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemState {
    Pending,
    Running,
    Succeeded,
    Failed,
    Skipped,
    Cancelled,
}

impl ItemState {
    /// Stable lowercase name, matching the serde representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether the item can make no further transition.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Succeeded | Self::Failed | Self::Skipped | Self::Cancelled
        )
    }

    /// Whether the transition `self -> next` is legal.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (
                Self::Pending,
                Self::Running | Self::Skipped | Self::Failed | Self::Cancelled
            ) | (Self::Running, Self::Succeeded | Self::Failed | Self::Cancelled)
        )
    }
}

impl fmt::Display for ItemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "running" => Ok(Self::Running),
            "succeeded" => Ok(Self::Succeeded),
            "failed" => Ok(Self::Failed),
            "skipped" => Ok(Self::Skipped),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("unknown item state: {other}")),
        }
    }
}

/// Lifecycle of one orchestrator invocation.
///
/// `Idle -> FetchingIdentifiers -> Planning -> RunningBatches -> Completed`,
/// with `Cancelling -> Cancelled` branching off `RunningBatches` and `Failed`
/// reachable from `FetchingIdentifiers` or `Planning` (resolution error, zero
/// items, tool missing).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    Idle,
    FetchingIdentifiers,
    Planning,
    RunningBatches,
    Cancelling,
    Completed,
    Cancelled,
    Failed,
}

impl RunPhase {
    /// Stable lowercase name, matching the serde representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::FetchingIdentifiers => "fetching_identifiers",
            Self::Planning => "planning",
            Self::RunningBatches => "running_batches",
            Self::Cancelling => "cancelling",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
        }
    }

    /// Whether the run can make no further transition.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Failed)
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
