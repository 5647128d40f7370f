//! Stateless classification of steamcmd output lines.
//!
//! steamcmd interleaves banner noise, download chatter, and error reports on
//! both stdout and stderr. Each line is classified on its own; no state is
//! kept between lines.
//!
//! Recognized shapes:
//!
//! ```text
//! ERROR! Download item 1234 failed (Failure).   -> ErrorDetected
//! progress: 42%                                 -> ProgressUpdate(42)
//! Redirecting stderr to '/logs/stderr.txt'      -> Ignored
//! ```

use std::sync::LazyLock;

use regex::Regex;

static PROGRESS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)progress:\s*(\d+)%").expect("progress pattern is valid"));

/// Classification of a single tool output line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent {
    /// The line carries an integer percentage for the in-flight unit.
    ProgressUpdate(u8),
    /// The line contains `error` in any casing; the full line is kept for
    /// failure details.
    ErrorDetected(String),
    /// Anything else.
    Ignored,
}

/// Classify one output line.
///
/// Error detection wins over progress: a line matching both shapes is an
/// error. Progress values outside 0..=100 are noise and classify as
/// `Ignored`, as does any malformed percentage.
#[must_use]
pub fn classify_line(line: &str) -> LineEvent {
    if line.to_ascii_lowercase().contains("error") {
        return LineEvent::ErrorDetected(line.to_string());
    }

    if let Some(captures) = PROGRESS_RE.captures(line) {
        if let Ok(percent) = captures[1].parse::<u8>() {
            if percent <= 100 {
                return LineEvent::ProgressUpdate(percent);
            }
        }
    }

    LineEvent::Ignored
}
