//! Run orchestration.
//!
//! Drives one run end to end: resolve the collection reference, plan
//! batches, skip items already on disk, run one steamcmd unit at a time,
//! and emit events along the way. Batches run strictly sequentially; a
//! failing unit marks its own items and the run moves on to the next one.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use uuid::Uuid;
use workshopdl_core::paths::workshop_content_root;
use workshopdl_core::{
    CollectionItem, CollectionResolverPort, DownloadError, DownloadResult, ItemState,
    NoopRunEmitter, RunEvent, RunEventEmitterPort, RunOutcome, RunPhase, RunReport,
};

use crate::config::{EngineConfig, UnitMode};
use crate::filter::{is_already_downloaded, item_dir};
use crate::locate::locate_steamcmd;
use crate::output::{LineEvent, classify_line};
use crate::plan::{Batch, plan_batches};
use crate::steamcmd::{build_command, run_unit};
use crate::tracker::RunTracker;

// ============================================================================
// Orchestrator
// ============================================================================

/// Coordinates one collection download at a time.
///
/// Holds the resolver and emitter ports plus the engine configuration. Each
/// `run` call owns its state from start to finish; running twice produces
/// two independent reports.
pub struct Orchestrator {
    resolver: Arc<dyn CollectionResolverPort>,
    emitter: Box<dyn RunEventEmitterPort>,
    config: EngineConfig,
}

impl Orchestrator {
    /// Create an orchestrator that discards events.
    #[must_use]
    pub fn new(resolver: Arc<dyn CollectionResolverPort>, config: EngineConfig) -> Self {
        Self {
            resolver,
            emitter: Box::new(NoopRunEmitter::new()),
            config,
        }
    }

    /// Replace the event emitter.
    #[must_use]
    pub fn with_emitter(mut self, emitter: Box<dyn RunEventEmitterPort>) -> Self {
        self.emitter = emitter;
        self
    }

    /// Run one full download of `reference`.
    ///
    /// Returns a report for runs that completed or were cancelled; the two
    /// are told apart by [`RunReport::outcome`]. Fatal setup problems (bad
    /// reference, fetch failure, empty collection, missing tool) return an
    /// error instead and no process is ever spawned for them.
    pub async fn run(
        &self,
        reference: &str,
        cancel: &CancellationToken,
    ) -> DownloadResult<RunReport> {
        let run_id = Uuid::new_v4();
        tracing::info!(%run_id, reference, "starting run");

        self.phase(RunPhase::FetchingIdentifiers);
        let items = match self.fetch_items(reference).await {
            Ok(items) => items,
            Err(e) => return Err(self.fail(e)),
        };

        self.phase(RunPhase::Planning);
        let (tool_path, content_root, batches) = match self.plan(&items) {
            Ok(plan) => plan,
            Err(e) => return Err(self.fail(e)),
        };

        let mut tracker = RunTracker::new(&items);
        self.phase(RunPhase::RunningBatches);

        match self
            .run_batches(&batches, &tool_path, &content_root, &mut tracker, cancel)
            .await
        {
            Ok(()) => {
                self.phase(RunPhase::Completed);
                let report = tracker.report(run_id, RunOutcome::Completed);
                tracing::info!(%run_id, summary = %report.summary(), "run completed");
                self.emitter.emit(RunEvent::finished(report.clone()));
                Ok(report)
            }
            Err(e) if e.is_cancelled() => {
                self.phase(RunPhase::Cancelling);
                for item_id in tracker.cancel_remaining() {
                    self.emitter
                        .emit(RunEvent::item_changed(item_id, ItemState::Cancelled));
                }
                self.phase(RunPhase::Cancelled);
                let report = tracker.report(run_id, RunOutcome::Cancelled);
                tracing::info!(%run_id, summary = %report.summary(), "run cancelled");
                self.emitter.emit(RunEvent::finished(report.clone()));
                Ok(report)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    // ========================================================================
    // Phases
    // ========================================================================

    async fn fetch_items(&self, reference: &str) -> DownloadResult<Vec<CollectionItem>> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(DownloadError::invalid_input("collection reference is empty"));
        }

        let items = self.resolver.resolve(reference).await?;
        if items.is_empty() {
            return Err(DownloadError::EmptyCollection);
        }
        tracing::info!(count = items.len(), "resolved collection");
        Ok(items)
    }

    fn plan(&self, items: &[CollectionItem]) -> DownloadResult<(PathBuf, PathBuf, Vec<Batch>)> {
        let tool_path = locate_steamcmd(self.config.steamcmd_path())?;
        let tool_dir = tool_path
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        let content_root = self
            .config
            .content_root()
            .map_or_else(|| workshop_content_root(&tool_dir), Path::to_path_buf);

        let batches = plan_batches(items, self.config.batch_size());
        tracing::info!(
            batches = batches.len(),
            batch_size = self.config.batch_size(),
            mode = self.config.unit_mode().as_str(),
            tool = %tool_path.display(),
            "planned run"
        );
        Ok((tool_path, content_root, batches))
    }

    async fn run_batches(
        &self,
        batches: &[Batch],
        tool_path: &Path,
        content_root: &Path,
        tracker: &mut RunTracker,
        cancel: &CancellationToken,
    ) -> DownloadResult<()> {
        for (index, batch) in batches.iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(DownloadError::Cancelled);
            }
            tracing::debug!(
                batch = index + 1,
                of = batches.len(),
                items = batch.len(),
                "processing batch"
            );

            let mut to_run = Vec::with_capacity(batch.len());
            for item in batch.items() {
                if is_already_downloaded(content_root, item) {
                    tracing::debug!(item = %item, "already present, skipping");
                    tracker.mark_skipped(item.item_id());
                    self.emitter
                        .emit(RunEvent::item_changed(item.item_id(), ItemState::Skipped));
                    self.emit_progress(tracker);
                } else {
                    to_run.push(item.clone());
                }
            }

            match self.config.unit_mode() {
                UnitMode::PerBatch => {
                    if !to_run.is_empty() {
                        self.run_one_unit(&to_run, tool_path, content_root, tracker, cancel)
                            .await?;
                    }
                }
                UnitMode::PerItem => {
                    for item in &to_run {
                        if cancel.is_cancelled() {
                            return Err(DownloadError::Cancelled);
                        }
                        self.run_one_unit(
                            std::slice::from_ref(item),
                            tool_path,
                            content_root,
                            tracker,
                            cancel,
                        )
                        .await?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Run one steamcmd invocation and resolve its items.
    ///
    /// A unit succeeds only when the process exits zero and no output line
    /// classified as an error. Spawn and IO failures fail this unit's items
    /// but not the run; only cancellation propagates out.
    async fn run_one_unit(
        &self,
        unit: &[CollectionItem],
        tool_path: &Path,
        content_root: &Path,
        tracker: &mut RunTracker,
        cancel: &CancellationToken,
    ) -> DownloadResult<()> {
        let unit_ids: Vec<String> = unit.iter().map(|i| i.item_id().to_string()).collect();

        tracker.begin_unit(&unit_ids);
        for item_id in &unit_ids {
            self.emitter
                .emit(RunEvent::item_changed(item_id, ItemState::Running));
        }

        let mut error_count = 0usize;
        let mut first_error: Option<String> = None;

        let command = build_command(tool_path, unit);
        let outcome = run_unit(command, cancel, |source, line| {
            tracing::trace!(?source, line, "tool output");
            match classify_line(line) {
                LineEvent::ErrorDetected(detail) => {
                    error_count += 1;
                    if first_error.is_none() {
                        first_error = Some(detail);
                    }
                }
                LineEvent::ProgressUpdate(percent) => {
                    tracker.observe_unit_progress(percent);
                    self.emit_progress(tracker);
                }
                LineEvent::Ignored => {}
            }
        })
        .await;

        match outcome {
            Ok(status) => {
                let succeeded = status.success() && error_count == 0;
                let detail = if succeeded {
                    None
                } else {
                    Some(first_error.unwrap_or_else(|| format!("steamcmd exited with {status}")))
                };
                if !succeeded {
                    tracing::warn!(
                        items = unit_ids.len(),
                        errors = error_count,
                        %status,
                        "unit failed"
                    );
                }
                self.resolve_unit(unit, &unit_ids, succeeded, detail.as_deref(), tracker);
                if !succeeded && self.config.delete_failed() {
                    self.delete_partial_content(unit, content_root).await;
                }
                Ok(())
            }
            Err(e) if e.is_cancelled() => Err(e),
            Err(e) => {
                tracing::warn!(error = %e, "unit could not run");
                let message = e.user_message();
                self.resolve_unit(unit, &unit_ids, false, Some(&message), tracker);
                if self.config.delete_failed() {
                    self.delete_partial_content(unit, content_root).await;
                }
                Ok(())
            }
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn resolve_unit(
        &self,
        unit: &[CollectionItem],
        unit_ids: &[String],
        succeeded: bool,
        detail: Option<&str>,
        tracker: &mut RunTracker,
    ) {
        tracker.finish_unit(unit_ids, succeeded, detail);

        let state = if succeeded {
            ItemState::Succeeded
        } else {
            ItemState::Failed
        };
        for item in unit {
            let event = match detail {
                Some(detail) => RunEvent::item_changed_with_detail(item.item_id(), state, detail),
                None => RunEvent::item_changed(item.item_id(), state),
            };
            self.emitter.emit(event);
        }
        self.emit_progress(tracker);
    }

    async fn delete_partial_content(&self, unit: &[CollectionItem], content_root: &Path) {
        for item in unit {
            let dir = item_dir(content_root, item);
            match tokio::fs::remove_dir_all(&dir).await {
                Ok(()) => {
                    tracing::debug!(item = %item, dir = %dir.display(), "removed partial content");
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(item = %item, error = %e, "could not remove partial content");
                }
            }
        }
    }

    fn phase(&self, phase: RunPhase) {
        tracing::debug!(%phase, "phase change");
        self.emitter.emit(RunEvent::phase_changed(phase));
    }

    fn emit_progress(&self, tracker: &RunTracker) {
        self.emitter
            .emit(RunEvent::progress(tracker.progress_percent()));
    }

    fn fail(&self, error: DownloadError) -> DownloadError {
        tracing::error!(error = %error, "run failed");
        self.phase(RunPhase::Failed);
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;
    use workshopdl_core::{CallbackEmitter, ErrorKind, StaticResolver};

    fn items(ids: &[&str]) -> Vec<CollectionItem> {
        ids.iter()
            .map(|id| CollectionItem::new("294100", *id, format!("Mod {id}")))
            .collect()
    }

    fn orchestrator_for(items: Vec<CollectionItem>, config: EngineConfig) -> Orchestrator {
        Orchestrator::new(Arc::new(StaticResolver::new(items)), config)
    }

    fn capturing_emitter() -> (Box<dyn RunEventEmitterPort>, Arc<Mutex<Vec<RunEvent>>>) {
        let captured = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&captured);
        let emitter = CallbackEmitter::new(move |event| sink.lock().unwrap().push(event));
        (Box::new(emitter), captured)
    }

    fn phases(events: &[RunEvent]) -> Vec<RunPhase> {
        events
            .iter()
            .filter_map(|event| match event {
                RunEvent::PhaseChanged { phase } => Some(*phase),
                _ => None,
            })
            .collect()
    }

    fn progress_values(events: &[RunEvent]) -> Vec<f64> {
        events
            .iter()
            .filter_map(|event| match event {
                RunEvent::Progress { percent } => Some(*percent),
                _ => None,
            })
            .collect()
    }

    /// Resolver that counts how often it is asked.
    struct CountingResolver {
        items: Vec<CollectionItem>,
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl CollectionResolverPort for CountingResolver {
        async fn resolve(&self, _reference: &str) -> DownloadResult<Vec<CollectionItem>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.items.clone())
        }
    }

    #[cfg(unix)]
    fn fake_tool(dir: &Path, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join("steamcmd");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn seed_content(root: &Path, item_id: &str) {
        let dir = root.join("294100").join(item_id);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("data.bin"), b"content").unwrap();
    }

    // ------------------------------------------------------------------------
    // Successful runs
    // ------------------------------------------------------------------------

    #[cfg(unix)]
    #[tokio::test]
    async fn test_successful_run_reports_every_item_succeeded() {
        let dir = tempfile::tempdir().unwrap();
        let tool = fake_tool(dir.path(), "echo progress: 50%");
        let config = EngineConfig::new()
            .with_steamcmd_path(&tool)
            .with_content_root(dir.path().join("content"))
            .with_batch_size(2);

        let orchestrator = orchestrator_for(items(&["1", "2", "3"]), config);
        let report = orchestrator
            .run("555", &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(report.outcome, RunOutcome::Completed);
        assert_eq!(report.success_ids, vec!["1", "2", "3"]);
        assert!(report.failed_ids.is_empty());
        assert!(report.skipped_ids.is_empty());
        assert_eq!(report.completed, 3);
        assert_eq!(report.total, 3);
        assert!(report.is_fully_successful());
        assert!((report.progress_percent - 100.0).abs() < f64::EPSILON);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_phase_sequence_for_successful_run() {
        let dir = tempfile::tempdir().unwrap();
        let tool = fake_tool(dir.path(), "true");
        let config = EngineConfig::new()
            .with_steamcmd_path(&tool)
            .with_content_root(dir.path().join("content"));
        let (emitter, captured) = capturing_emitter();

        let orchestrator = orchestrator_for(items(&["1"]), config).with_emitter(emitter);
        let report = orchestrator
            .run("555", &CancellationToken::new())
            .await
            .unwrap();

        let events = captured.lock().unwrap();
        assert_eq!(
            phases(&events),
            vec![
                RunPhase::FetchingIdentifiers,
                RunPhase::Planning,
                RunPhase::RunningBatches,
                RunPhase::Completed,
            ]
        );
        let Some(RunEvent::Finished { report: emitted }) = events.last() else {
            panic!("last event must be the finished report");
        };
        assert_eq!(emitted, &report);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_progress_sequence_matches_batch_math() {
        let dir = tempfile::tempdir().unwrap();
        let tool = fake_tool(dir.path(), "echo progress: 50%");
        let config = EngineConfig::new()
            .with_steamcmd_path(&tool)
            .with_content_root(dir.path().join("content"))
            .with_batch_size(2);
        let (emitter, captured) = capturing_emitter();

        let orchestrator = orchestrator_for(items(&["1", "2", "3"]), config).with_emitter(emitter);
        orchestrator
            .run("555", &CancellationToken::new())
            .await
            .unwrap();

        let events = captured.lock().unwrap();
        let progress = progress_values(&events);
        assert!(!progress.is_empty());
        assert!(
            progress.windows(2).all(|pair| pair[0] <= pair[1]),
            "progress must never decrease: {progress:?}"
        );
        // Half of the first two-item unit across three items.
        assert!(progress.iter().any(|p| (p - 50.0 / 3.0).abs() < 1e-9));
        // First unit resolved, second not yet started.
        assert!(progress.iter().any(|p| (p - 200.0 / 3.0).abs() < 1e-9));
        assert!((progress.last().unwrap() - 100.0).abs() < f64::EPSILON);
    }

    // ------------------------------------------------------------------------
    // Unit verdicts
    // ------------------------------------------------------------------------

    #[cfg(unix)]
    #[tokio::test]
    async fn test_exit_zero_with_error_line_fails_the_unit() {
        let dir = tempfile::tempdir().unwrap();
        let tool = fake_tool(
            dir.path(),
            r#"echo "ERROR! Download item 1 failed (Failure)."
exit 0"#,
        );
        let config = EngineConfig::new()
            .with_steamcmd_path(&tool)
            .with_content_root(dir.path().join("content"));

        let orchestrator = orchestrator_for(items(&["1", "2"]), config);
        let report = orchestrator
            .run("555", &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(report.outcome, RunOutcome::Completed);
        assert_eq!(report.failed_ids, vec!["1", "2"]);
        assert!(report.success_ids.is_empty());
        assert!(!report.is_fully_successful());
        assert!(
            report.entries[0]
                .detail
                .as_deref()
                .is_some_and(|d| d.contains("ERROR!")),
            "failure detail should carry the offending line"
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_without_output_fails_the_unit() {
        let dir = tempfile::tempdir().unwrap();
        let tool = fake_tool(dir.path(), "exit 7");
        let config = EngineConfig::new()
            .with_steamcmd_path(&tool)
            .with_content_root(dir.path().join("content"));

        let orchestrator = orchestrator_for(items(&["1"]), config);
        let report = orchestrator
            .run("555", &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(report.failed_ids, vec!["1"]);
        assert!(
            report.entries[0]
                .detail
                .as_deref()
                .is_some_and(|d| d.contains("exited with")),
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failed_unit_does_not_stop_later_batches() {
        let dir = tempfile::tempdir().unwrap();
        let tool = fake_tool(
            dir.path(),
            r#"case "$*" in
  *101*) echo "ERROR! Download item 101 failed (Failure)."; exit 1;;
esac
echo progress: 100%"#,
        );
        let config = EngineConfig::new()
            .with_steamcmd_path(&tool)
            .with_content_root(dir.path().join("content"))
            .with_batch_size(2);

        let orchestrator = orchestrator_for(items(&["101", "102", "201", "202"]), config);
        let report = orchestrator
            .run("555", &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(report.outcome, RunOutcome::Completed);
        assert_eq!(report.failed_ids, vec!["101", "102"]);
        assert_eq!(report.success_ids, vec!["201", "202"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_per_item_mode_attributes_failures_individually() {
        let dir = tempfile::tempdir().unwrap();
        let tool = fake_tool(
            dir.path(),
            r#"case "$*" in
  *101*) echo "ERROR! Download item 101 failed (Failure)."; exit 1;;
esac"#,
        );
        let config = EngineConfig::new()
            .with_steamcmd_path(&tool)
            .with_content_root(dir.path().join("content"))
            .with_batch_size(2)
            .with_unit_mode(UnitMode::PerItem);

        let orchestrator = orchestrator_for(items(&["101", "102"]), config);
        let report = orchestrator
            .run("555", &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(report.failed_ids, vec!["101"]);
        assert_eq!(report.success_ids, vec!["102"]);
    }

    // ------------------------------------------------------------------------
    // Skipping
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_already_downloaded_items_are_skipped_without_spawning() {
        let dir = tempfile::tempdir().unwrap();
        // Deliberately not executable: any spawn attempt would fail the items.
        let tool = dir.path().join("steamcmd");
        std::fs::write(&tool, "not a binary").unwrap();
        let content = dir.path().join("content");
        seed_content(&content, "1");
        seed_content(&content, "2");

        let config = EngineConfig::new()
            .with_steamcmd_path(&tool)
            .with_content_root(&content);
        let orchestrator = orchestrator_for(items(&["1", "2"]), config);
        let report = orchestrator
            .run("555", &CancellationToken::new())
            .await
            .unwrap();

        assert!(report.is_fully_successful());
        assert_eq!(report.skipped_ids, vec!["1", "2"]);
        assert_eq!(report.success_ids, vec!["1", "2"]);
        assert_eq!(report.downloaded_count(), 0);
        assert_eq!(report.completed, 2);
        assert!((report.progress_percent - 100.0).abs() < f64::EPSILON);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_second_run_skips_what_the_first_downloaded() {
        let dir = tempfile::tempdir().unwrap();
        let content = dir.path().join("content");
        let script = format!(
            r#"root="{}/294100"
for arg in "$@"; do
  case "$arg" in
    +*|anonymous|294100) ;;
    *) mkdir -p "$root/$arg"; echo data > "$root/$arg/file.bin";;
  esac
done
echo progress: 100%"#,
            content.display()
        );
        let tool = fake_tool(dir.path(), &script);
        let config = EngineConfig::new()
            .with_steamcmd_path(&tool)
            .with_content_root(&content)
            .with_batch_size(2);

        let orchestrator = orchestrator_for(items(&["1", "2"]), config);
        let first = orchestrator
            .run("555", &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(first.downloaded_count(), 2);
        assert!(first.skipped_ids.is_empty());

        let second = orchestrator
            .run("555", &CancellationToken::new())
            .await
            .unwrap();
        assert!(second.is_fully_successful());
        assert_eq!(second.skipped_ids, vec!["1", "2"]);
        assert_eq!(second.downloaded_count(), 0);
    }

    // ------------------------------------------------------------------------
    // Fatal setup errors
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_empty_collection_fails_before_planning() {
        let (emitter, captured) = capturing_emitter();
        let orchestrator = Orchestrator::new(
            Arc::new(StaticResolver::empty()),
            EngineConfig::new(),
        )
        .with_emitter(emitter);

        let err = orchestrator
            .run("555", &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err, DownloadError::EmptyCollection);
        assert_eq!(err.to_string(), "no items found");

        let events = captured.lock().unwrap();
        assert_eq!(
            phases(&events),
            vec![RunPhase::FetchingIdentifiers, RunPhase::Failed]
        );
        assert!(
            events.iter().all(|e| e.item_id().is_none()),
            "no item may be touched when resolution yields nothing"
        );
    }

    #[tokio::test]
    async fn test_blank_reference_is_rejected_without_resolver_call() {
        let resolver = Arc::new(CountingResolver {
            items: items(&["1"]),
            calls: AtomicUsize::new(0),
        });
        let orchestrator = Orchestrator::new(resolver.clone(), EngineConfig::new());

        let err = orchestrator
            .run("   ", &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_tool_is_fatal() {
        let (emitter, captured) = capturing_emitter();
        let config = EngineConfig::new().with_steamcmd_path("/definitely/not/here/steamcmd");
        let orchestrator = orchestrator_for(items(&["1"]), config).with_emitter(emitter);

        let err = orchestrator
            .run("555", &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ToolNotFound);
        let events = captured.lock().unwrap();
        assert_eq!(
            phases(&events),
            vec![
                RunPhase::FetchingIdentifiers,
                RunPhase::Planning,
                RunPhase::Failed,
            ]
        );
    }

    // ------------------------------------------------------------------------
    // Cancellation
    // ------------------------------------------------------------------------

    #[cfg(unix)]
    #[tokio::test]
    async fn test_cancellation_produces_cancelled_report() {
        let dir = tempfile::tempdir().unwrap();
        let tool = fake_tool(dir.path(), "sleep 30");
        let config = EngineConfig::new()
            .with_steamcmd_path(&tool)
            .with_content_root(dir.path().join("content"))
            .with_batch_size(1);
        let (emitter, captured) = capturing_emitter();

        let orchestrator =
            orchestrator_for(items(&["1", "2", "3"]), config).with_emitter(emitter);
        let cancel = CancellationToken::new();
        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            canceller.cancel();
        });

        let report = tokio::time::timeout(
            Duration::from_secs(10),
            orchestrator.run("555", &cancel),
        )
        .await
        .expect("cancellation must end the run promptly")
        .unwrap();

        assert_eq!(report.outcome, RunOutcome::Cancelled);
        assert_eq!(report.cancelled_ids, vec!["1", "2", "3"]);
        assert!(report.success_ids.is_empty());
        assert!(report.failed_ids.is_empty());
        assert!(!report.is_fully_successful());

        let events = captured.lock().unwrap();
        let seen = phases(&events);
        assert!(seen.contains(&RunPhase::Cancelling));
        assert_eq!(seen.last(), Some(&RunPhase::Cancelled));
    }

    #[tokio::test]
    async fn test_already_cancelled_token_cancels_everything_up_front() {
        let dir = tempfile::tempdir().unwrap();
        let tool = dir.path().join("steamcmd");
        std::fs::write(&tool, "not a binary").unwrap();
        let config = EngineConfig::new()
            .with_steamcmd_path(&tool)
            .with_content_root(dir.path().join("content"));
        let (emitter, captured) = capturing_emitter();

        let orchestrator = orchestrator_for(items(&["1", "2"]), config).with_emitter(emitter);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let report = orchestrator.run("555", &cancel).await.unwrap();

        assert_eq!(report.outcome, RunOutcome::Cancelled);
        assert_eq!(report.cancelled_ids, vec!["1", "2"]);

        let events = captured.lock().unwrap();
        assert!(
            events.iter().all(|e| !matches!(
                e,
                RunEvent::ItemChanged { state: ItemState::Running, .. }
            )),
            "nothing may start running under a pre-cancelled token"
        );
    }

    // ------------------------------------------------------------------------
    // Failed-content cleanup
    // ------------------------------------------------------------------------

    #[cfg(unix)]
    #[tokio::test]
    async fn test_delete_failed_removes_partial_content() {
        let dir = tempfile::tempdir().unwrap();
        let content = dir.path().join("content");
        let script = format!(
            r#"mkdir -p "{root}/294100/1"
echo partial > "{root}/294100/1/part.bin"
echo "ERROR! Download item 1 failed (Failure)."
exit 1"#,
            root = content.display()
        );
        let tool = fake_tool(dir.path(), &script);
        let config = EngineConfig::new()
            .with_steamcmd_path(&tool)
            .with_content_root(&content)
            .with_delete_failed(true);

        let orchestrator = orchestrator_for(items(&["1"]), config);
        let report = orchestrator
            .run("555", &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(report.failed_ids, vec!["1"]);
        assert!(
            !content.join("294100").join("1").exists(),
            "partial content of failed items must be removed"
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failed_content_is_kept_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let content = dir.path().join("content");
        let script = format!(
            r#"mkdir -p "{root}/294100/1"
echo partial > "{root}/294100/1/part.bin"
echo "ERROR! Download item 1 failed (Failure)."
exit 1"#,
            root = content.display()
        );
        let tool = fake_tool(dir.path(), &script);
        let config = EngineConfig::new()
            .with_steamcmd_path(&tool)
            .with_content_root(&content);

        let orchestrator = orchestrator_for(items(&["1"]), config);
        orchestrator
            .run("555", &CancellationToken::new())
            .await
            .unwrap();

        assert!(
            content.join("294100").join("1").join("part.bin").exists(),
            "partial content stays on disk unless cleanup is requested"
        );
    }
}
