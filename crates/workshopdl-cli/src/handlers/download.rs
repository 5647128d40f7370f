//! Download handler.
//!
//! Wires the Steam resolver, the engine orchestrator, and the terminal
//! progress renderer together, then maps the run outcome to an exit status.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use console::style;
use tokio_util::sync::CancellationToken;
use workshopdl_core::RunOutcome;
use workshopdl_engine::{EngineConfig, Orchestrator, UnitMode};
use workshopdl_steam::DefaultCollectionClient;

use crate::error::CliError;
use crate::progress::{self, ProgressRenderer};
use crate::settings::CliSettings;

/// Download command arguments passed from CLI.
pub struct DownloadArgs {
    pub reference: Option<String>,
    pub batch_size: usize,
    pub steamcmd: Option<PathBuf>,
    pub per_item: bool,
    pub delete_failed: bool,
}

/// Execute the download command.
///
/// Resolves the collection reference (falling back to the last-used one),
/// runs the orchestrator with Ctrl-C wired to cancellation, persists the
/// reference on success, and prints the run summary.
pub async fn execute(args: DownloadArgs) -> Result<()> {
    let mut settings = CliSettings::load().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "could not load settings, continuing with defaults");
        CliSettings::default()
    });

    let Some(reference) = args.reference.or_else(|| settings.last_reference.clone()) else {
        return Err(CliError::Usage(
            "no collection reference given and none remembered; \
             run `workshopdl download <URL-or-ID>` once"
                .to_string(),
        )
        .into());
    };

    let mut config = EngineConfig::new()
        .with_batch_size(args.batch_size)
        .with_delete_failed(args.delete_failed);
    if let Some(path) = args.steamcmd {
        config = config.with_steamcmd_path(path);
    }
    if args.per_item {
        config = config.with_unit_mode(UnitMode::PerItem);
    }

    let resolver = Arc::new(DefaultCollectionClient::default_client());
    let orchestrator =
        Orchestrator::new(resolver, config).with_emitter(Box::new(ProgressRenderer::stdout()));

    // First Ctrl-C cancels the run cleanly, a second one aborts outright.
    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        eprintln!();
        eprintln!(
            "{}",
            style("cancelling run, press Ctrl-C again to abort").yellow()
        );
        signal_token.cancel();
        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(130);
        }
    });

    let report = orchestrator
        .run(&reference, &cancel)
        .await
        .map_err(CliError::from)?;

    settings.last_reference = Some(reference);
    if let Err(err) = settings.save() {
        tracing::warn!(error = %err, "could not persist settings");
    }

    progress::print_summary(&report);

    match report.outcome {
        RunOutcome::Cancelled => Err(CliError::Cancelled.into()),
        RunOutcome::Completed => {
            if report.failed_ids.is_empty() {
                Ok(())
            } else {
                Err(CliError::Failures {
                    failed: report.failed_ids.len(),
                    total: report.total,
                }
                .into())
            }
        }
    }
}
