//! steamcmd command construction and supervised execution.
//!
//! One invocation downloads one unit (a whole batch or a single item). The
//! child's stdout and stderr are both streamed line by line to the caller;
//! the unit only counts as finished once both streams have hit EOF and the
//! process has exited.

use std::path::Path;
use std::process::{ExitStatus, Stdio};

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use workshopdl_core::{CollectionItem, DownloadError, DownloadResult};

// ============================================================================
// Command Construction
// ============================================================================

/// Build the steamcmd invocation for one unit of items.
///
/// Produces `+login anonymous`, one `+workshop_download_item <app> <item>`
/// directive per item in order, and a trailing `+quit` so the process exits
/// instead of dropping into the interactive prompt.
#[must_use]
pub fn build_command(tool_path: &Path, items: &[CollectionItem]) -> Command {
    let mut command = Command::new(tool_path);
    command.arg("+login").arg("anonymous");
    for item in items {
        command
            .arg("+workshop_download_item")
            .arg(item.app_id())
            .arg(item.item_id());
    }
    command.arg("+quit");
    command
}

// ============================================================================
// Supervised Execution
// ============================================================================

/// Which pipe a line arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamSource {
    Stdout,
    Stderr,
}

/// Run one unit to completion, feeding every output line to `on_line`.
///
/// Returns the child's exit status after stdout EOF, stderr EOF, and process
/// exit have all been observed. Cancellation kills the child immediately and
/// returns `DownloadError::Cancelled`; whatever the tool wrote to disk so
/// far stays there.
pub async fn run_unit(
    mut command: Command,
    cancel: &CancellationToken,
    mut on_line: impl FnMut(StreamSource, &str),
) -> DownloadResult<ExitStatus> {
    let program = command.as_std().get_program().to_string_lossy().to_string();

    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = command
        .spawn()
        .map_err(|e| DownloadError::spawn(format!("failed to spawn {program}: {e}")))?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| DownloadError::spawn("missing stdout pipe"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| DownloadError::spawn("missing stderr pipe"))?;

    // Both readers feed one channel; `None` from the receiver means both
    // streams have reached EOF.
    let (tx, mut rx) = mpsc::channel::<(StreamSource, String)>(64);
    tokio::spawn(forward_lines(stdout, StreamSource::Stdout, tx.clone()));
    tokio::spawn(forward_lines(stderr, StreamSource::Stderr, tx));

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => {
                tracing::debug!(program = %program, "cancellation requested, killing child");
                let _ = child.kill().await;
                return Err(DownloadError::Cancelled);
            }

            received = rx.recv() => {
                let Some((source, line)) = received else { break };
                on_line(source, &line);
            }
        }
    }

    let status = child.wait().await?;
    tracing::debug!(program = %program, %status, "unit process exited");
    Ok(status)
}

async fn forward_lines(
    stream: impl AsyncRead + Unpin,
    source: StreamSource,
    tx: mpsc::Sender<(StreamSource, String)>,
) {
    let mut lines = BufReader::new(stream).lines();
    // Read errors end the stream the same way EOF does.
    while let Ok(Some(line)) = lines.next_line().await {
        if tx.send((source, line)).await.is_err() {
            break;
        }
    }
}
