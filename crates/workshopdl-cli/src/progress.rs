//! Terminal progress rendering for download runs.
//!
//! Implements the engine's event emitter port on top of indicatif. When
//! stdout is a terminal the run gets a live bar with per-item status lines
//! printed above it; otherwise items print as plain lines and the bar stays
//! hidden.

use std::io::IsTerminal;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use workshopdl_core::{ItemState, RunEvent, RunEventEmitterPort, RunPhase, RunReport};

// ============================================================================
// Progress renderer
// ============================================================================

/// Event emitter that renders run progress to the terminal.
///
/// Clones share the same underlying bar, so the orchestrator's `clone_box`
/// calls all draw to one place.
#[derive(Clone)]
pub struct ProgressRenderer {
    bar: ProgressBar,
    fancy: bool,
}

impl ProgressRenderer {
    /// Create a renderer drawing to stdout, auto-detecting terminal
    /// capability.
    #[must_use]
    pub fn stdout() -> Self {
        let fancy = std::io::stdout().is_terminal();
        let bar = if fancy {
            let bar = ProgressBar::with_draw_target(Some(100), ProgressDrawTarget::stdout());
            bar.set_style(spinner_style());
            bar.set_message("starting");
            bar.enable_steady_tick(Duration::from_millis(120));
            bar
        } else {
            ProgressBar::hidden()
        };
        Self { bar, fancy }
    }

    fn on_phase(&self, phase: RunPhase) {
        if !self.fancy {
            return;
        }
        match phase {
            RunPhase::FetchingIdentifiers => self.bar.set_message("fetching collection"),
            RunPhase::Planning => self.bar.set_message("planning batches"),
            RunPhase::RunningBatches => {
                // Switch from the startup spinner to the real bar.
                self.bar.set_style(bar_style());
                self.bar.set_message("downloading");
            }
            RunPhase::Cancelling => self.bar.set_message("cancelling"),
            RunPhase::Idle
            | RunPhase::Completed
            | RunPhase::Cancelled
            | RunPhase::Failed => {}
        }
    }

    fn print_line(&self, line: &str) {
        if self.fancy {
            self.bar.println(line);
        } else {
            println!("{line}");
        }
    }
}

impl RunEventEmitterPort for ProgressRenderer {
    fn emit(&self, event: RunEvent) {
        match event {
            RunEvent::PhaseChanged { phase } => self.on_phase(phase),
            RunEvent::ItemChanged {
                item_id,
                state,
                detail,
            } => {
                if let Some(line) = item_line(&item_id, state, detail.as_deref()) {
                    self.print_line(&line);
                }
            }
            RunEvent::Progress { percent } => {
                if self.fancy {
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    self.bar.set_position(percent.round() as u64);
                }
            }
            RunEvent::Finished { .. } => {
                if self.fancy {
                    self.bar.finish_and_clear();
                }
            }
        }
    }

    fn clone_box(&self) -> Box<dyn RunEventEmitterPort> {
        Box::new(self.clone())
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner} {msg}").unwrap()
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{msg:<20} {bar:32.cyan/blue} {pos:>3}%").unwrap()
}

/// Render one item's terminal state as a status line.
///
/// Non-terminal states render nothing; the bar already shows activity.
fn item_line(item_id: &str, state: ItemState, detail: Option<&str>) -> Option<String> {
    let line = match state {
        ItemState::Succeeded => format!("{} {item_id}", style("✓").green()),
        ItemState::Failed => match detail {
            Some(reason) => format!("{} {item_id}: {reason}", style("✗").red()),
            None => format!("{} {item_id}", style("✗").red()),
        },
        ItemState::Skipped => format!("{} {item_id} (already downloaded)", style("○").dim()),
        ItemState::Cancelled => format!("{} {item_id} (cancelled)", style("-").yellow()),
        ItemState::Pending | ItemState::Running => return None,
    };
    Some(line)
}

// ============================================================================
// Run summary
// ============================================================================

/// Print the end-of-run summary: counts plus the IDs in each bucket.
pub fn print_summary(report: &RunReport) {
    println!();
    println!("{}", style(report.summary()).bold());

    let downloaded: Vec<&str> = report
        .success_ids
        .iter()
        .filter(|id| !report.skipped_ids.contains(id))
        .map(String::as_str)
        .collect();
    print_group("downloaded", &downloaded, |s| style(s).green());
    let skipped: Vec<&str> = report.skipped_ids.iter().map(String::as_str).collect();
    print_group("skipped", &skipped, |s| style(s).dim());
    let failed: Vec<&str> = report.failed_ids.iter().map(String::as_str).collect();
    print_group("failed", &failed, |s| style(s).red());
    let cancelled: Vec<&str> = report.cancelled_ids.iter().map(String::as_str).collect();
    print_group("cancelled", &cancelled, |s| style(s).yellow());
}

fn print_group(label: &str, ids: &[&str], paint: impl Fn(String) -> console::StyledObject<String>) {
    if ids.is_empty() {
        return;
    }
    println!("  {} {}", paint(format!("{label}:")), ids.join(", "));
}
