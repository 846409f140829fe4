use thiserror::Error;

use crate::conversion::domain::conversion_event::{BatchSummary, ConversionEvent};
use crate::conversion::domain::conversion_item::ConversionItem;
use crate::conversion::domain::withdrawn_items::WithdrawnItems;
use crate::engine::domain::engine_config::EngineConfig;
use crate::engine::domain::engine_session::EngineSession;
use crate::engine::domain::media_engine::{EngineError, MediaEngine};
use crate::engine::domain::resource_fetcher::{FetchError, ResourceFetcher};
use crate::shared::constants::{
    DEFAULT_INPUT_EXTENSION, MP3_VBR_QUALITY, OUTPUT_FILE_NAME, RESOURCE_MEDIA_TYPE,
};
use crate::shared::media_blob::MediaBlob;
use crate::shared::source_file::SourceFile;

const TIMEOUT_MESSAGE: &str = "Loading the converter took too long. Check your connection.";

#[derive(Error, Debug)]
pub enum LoadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl LoadError {
    /// Text suitable for the global error line.
    pub fn user_message(&self) -> String {
        match self {
            LoadError::Fetch(e) if e.is_timeout() => TIMEOUT_MESSAGE.to_string(),
            other => format!("Failed to load the converter: {other}"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("{}", .0.user_message())]
    Load(#[from] LoadError),
    #[error("cannot read {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("the converter produced no audio")]
    EmptyOutput,
}

/// Which resource a load progress report refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadStage {
    Glue,
    Payload,
    Starting,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadProgress {
    pub stage: LoadStage,
    pub downloaded: u64,
    /// 0 when unknown.
    pub total: u64,
}

/// Drives the media engine: loading it, converting one file, and converting
/// a batch strictly one item at a time.
///
/// The adapter holds no engine state of its own. Every operation receives the
/// session explicitly, and the `&mut` borrow is what keeps conversions from
/// overlapping.
pub struct EngineAdapter {
    fetcher: Box<dyn ResourceFetcher>,
    config: EngineConfig,
}

impl EngineAdapter {
    pub fn new(fetcher: Box<dyn ResourceFetcher>, config: EngineConfig) -> Self {
        Self { fetcher, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Fetch the engine resources and start the engine. No-op when loaded.
    ///
    /// On failure the session stays unloaded, its last error is set, and a
    /// later call retries from scratch.
    pub fn load(
        &self,
        session: &mut EngineSession,
        on_progress: &mut dyn FnMut(LoadProgress),
    ) -> Result<(), LoadError> {
        if session.is_loaded() {
            return Ok(());
        }
        session.clear_error();

        let result = self.fetch_and_start(session, on_progress);
        if let Err(ref e) = result {
            log::error!("Engine load failed: {e}");
            session.set_error(e.user_message());
        }
        result
    }

    fn fetch_and_start(
        &self,
        session: &mut EngineSession,
        on_progress: &mut dyn FnMut(LoadProgress),
    ) -> Result<(), LoadError> {
        let timeout = self.config.load_timeout;

        let glue = self.fetcher.fetch(
            &self.config.glue_url(),
            RESOURCE_MEDIA_TYPE,
            timeout,
            &mut |downloaded, total| {
                on_progress(LoadProgress {
                    stage: LoadStage::Glue,
                    downloaded,
                    total,
                })
            },
        )?;
        let payload = self.fetcher.fetch(
            &self.config.payload_url(),
            RESOURCE_MEDIA_TYPE,
            timeout,
            &mut |downloaded, total| {
                on_progress(LoadProgress {
                    stage: LoadStage::Payload,
                    downloaded,
                    total,
                })
            },
        )?;

        on_progress(LoadProgress {
            stage: LoadStage::Starting,
            downloaded: 0,
            total: 0,
        });
        session.engine_mut().load(&glue, &payload)?;
        session.mark_loaded();
        log::info!("Converter ready (version {})", self.config.version);
        Ok(())
    }

    /// Extract the audio of one file as MP3.
    ///
    /// Loads the engine first if needed. `on_progress` receives
    /// non-decreasing percentages and ends at 100 on success. Both virtual
    /// files are deleted whether or not the conversion succeeds.
    pub fn convert_one(
        &self,
        session: &mut EngineSession,
        file: &SourceFile,
        on_progress: &mut dyn FnMut(u8),
    ) -> Result<MediaBlob, ConvertError> {
        if !session.is_loaded() {
            self.load(session, &mut |_| {})?;
        }
        session.clear_error();
        on_progress(0);

        let mut reported = 0u8;
        let outcome = transcode(session.engine_mut(), file, &mut |percent| {
            reported = percent;
            on_progress(percent);
        });
        match outcome {
            Ok(blob) => {
                if reported < 100 {
                    on_progress(100);
                }
                Ok(blob)
            }
            Err(e) => {
                log::error!("Conversion of {} failed: {e}", file.name());
                session.set_error(e.to_string());
                Err(e)
            }
        }
    }

    /// Convert every item that hasn't finished yet, one after another.
    ///
    /// Never fails as a whole: each item's outcome is reported through
    /// `on_event`, and an item that fails does not stop the ones after it.
    /// Each item is claimed in `withdrawn` right before it starts; items the
    /// user withdrew first are skipped.
    pub fn convert_batch(
        &self,
        session: &mut EngineSession,
        items: &[ConversionItem],
        withdrawn: &WithdrawnItems,
        on_event: &mut dyn FnMut(ConversionEvent),
    ) -> BatchSummary {
        let mut summary = BatchSummary::default();

        for item in items {
            let id = item.id;
            if item.status.is_terminal() || !withdrawn.claim(id) {
                summary.skipped += 1;
                continue;
            }

            on_event(ConversionEvent::Started { id });
            let outcome = self.convert_one(session, &item.source, &mut |percent| {
                on_event(ConversionEvent::Progress { id, percent })
            });
            match outcome {
                Ok(result) => {
                    summary.completed += 1;
                    on_event(ConversionEvent::Completed { id, result });
                }
                Err(e) => {
                    summary.failed += 1;
                    on_event(ConversionEvent::Failed {
                        id,
                        message: e.to_string(),
                    });
                }
            }
        }

        log::info!(
            "Batch finished: {} completed, {} failed, {} skipped",
            summary.completed,
            summary.failed,
            summary.skipped
        );
        summary
    }
}

/// Command that drops the video stream and encodes the audio as VBR MP3.
pub fn transcode_args(input: &str, output: &str) -> Vec<String> {
    vec![
        "-i".into(),
        input.into(),
        "-vn".into(),
        "-acodec".into(),
        "libmp3lame".into(),
        "-q:a".into(),
        MP3_VBR_QUALITY.to_string(),
        output.into(),
    ]
}

fn to_percent(ratio: f64) -> u8 {
    (ratio.clamp(0.0, 1.0) * 100.0).round() as u8
}

fn transcode(
    engine: &mut dyn MediaEngine,
    file: &SourceFile,
    on_progress: &mut dyn FnMut(u8),
) -> Result<MediaBlob, ConvertError> {
    let input_name = format!(
        "input.{}",
        file.extension()
            .unwrap_or_else(|| DEFAULT_INPUT_EXTENSION.to_string())
    );
    let data = file.read_bytes().map_err(|source| ConvertError::Read {
        name: file.name().to_string(),
        source,
    })?;

    let args = transcode_args(&input_name, OUTPUT_FILE_NAME);
    let mut last_percent = 0u8;
    let outcome = engine
        .write_file(&input_name, &data)
        .and_then(|()| {
            engine.exec(&args, &mut |ratio| {
                let percent = to_percent(ratio);
                if percent > last_percent {
                    last_percent = percent;
                    on_progress(percent);
                }
            })
        })
        .and_then(|()| engine.read_file(OUTPUT_FILE_NAME));

    if let Err(e) = engine.delete_file(&input_name) {
        log::warn!("Could not delete {input_name}: {e}");
    }
    if let Err(e) = engine.delete_file(OUTPUT_FILE_NAME) {
        if outcome.is_ok() {
            log::warn!("Could not delete {OUTPUT_FILE_NAME}: {e}");
        }
    }

    let bytes = outcome?;
    if bytes.is_empty() {
        return Err(ConvertError::EmptyOutput);
    }
    Ok(MediaBlob::mp3(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::domain::conversion_item::{ConversionStatus, ItemId};
    use crate::conversion::domain::conversion_queue::{ConversionQueue, QueueError};
    use crate::test_support::{source, EngineProbe, StubEngine, StubFetcher, CORRUPT_MARKER};
    use rstest::rstest;
    use std::sync::atomic::Ordering;
    use std::time::Duration;
    use tempfile::TempDir;

    fn setup(fetcher: StubFetcher) -> (EngineAdapter, EngineSession, EngineProbe) {
        let probe = EngineProbe::default();
        let session = EngineSession::new(Box::new(StubEngine::new(probe.clone())));
        let adapter = EngineAdapter::new(Box::new(fetcher), EngineConfig::default());
        (adapter, session, probe)
    }

    fn corrupt_bytes() -> Vec<u8> {
        [CORRUPT_MARKER, b" not a video"].concat()
    }

    // --- load ---

    #[test]
    fn test_load_is_idempotent() {
        let fetcher = StubFetcher::ok();
        let calls = fetcher.calls.clone();
        let (adapter, mut session, probe) = setup(fetcher);

        adapter.load(&mut session, &mut |_| {}).unwrap();
        adapter.load(&mut session, &mut |_| {}).unwrap();

        assert!(session.is_loaded());
        assert_eq!(calls.load(Ordering::SeqCst), 2, "one fetch per resource");
        assert_eq!(probe.loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_load_reports_stages_in_order() {
        let (adapter, mut session, _) = setup(StubFetcher::ok());
        let mut stages = Vec::new();
        adapter
            .load(&mut session, &mut |p| {
                if stages.last() != Some(&p.stage) {
                    stages.push(p.stage);
                }
            })
            .unwrap();
        assert_eq!(
            stages,
            vec![LoadStage::Glue, LoadStage::Payload, LoadStage::Starting]
        );
    }

    #[test]
    fn test_load_fetches_pinned_urls() {
        let (adapter, _, _) = setup(StubFetcher::ok());
        let config = adapter.config();
        assert!(config.glue_url().contains(&config.version));
        assert!(config.payload_url().contains(&config.version));
    }

    #[test]
    fn test_load_timeout_leaves_session_unloaded() {
        let (adapter, mut session, probe) = setup(StubFetcher::failing(1));

        let err = adapter.load(&mut session, &mut |_| {}).unwrap_err();

        assert!(matches!(err, LoadError::Fetch(FetchError::Timeout { .. })));
        assert!(!session.is_loaded());
        assert_eq!(session.last_error(), Some(TIMEOUT_MESSAGE));
        assert_eq!(probe.loads.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_load_can_be_retried() {
        let (adapter, mut session, _) = setup(StubFetcher::failing(1));
        assert!(adapter.load(&mut session, &mut |_| {}).is_err());

        adapter.load(&mut session, &mut |_| {}).unwrap();
        assert!(session.is_loaded());
        assert_eq!(session.last_error(), None);
    }

    #[test]
    fn test_load_uses_configured_timeout() {
        let probe = EngineProbe::default();
        let mut session = EngineSession::new(Box::new(StubEngine::new(probe)));
        let config = EngineConfig::default().with_load_timeout(Duration::from_millis(1500));
        let adapter = EngineAdapter::new(Box::new(StubFetcher::failing(1)), config);

        match adapter.load(&mut session, &mut |_| {}) {
            Err(LoadError::Fetch(FetchError::Timeout { timeout, .. })) => {
                assert_eq!(timeout, Duration::from_millis(1500))
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    // --- convert_one ---

    #[test]
    fn test_convert_one_loads_on_demand() {
        let tmp = TempDir::new().unwrap();
        let (adapter, mut session, probe) = setup(StubFetcher::ok());

        let blob = adapter
            .convert_one(&mut session, &source(&tmp, "a.mp4", b"video"), &mut |_| {})
            .unwrap();

        assert!(session.is_loaded());
        assert_eq!(probe.loads.load(Ordering::SeqCst), 1);
        assert_eq!(blob.bytes(), b"MP3:video");
        assert_eq!(blob.media_type(), "audio/mpeg");
    }

    #[test]
    fn test_convert_one_runs_fixed_command_and_cleans_up() {
        let tmp = TempDir::new().unwrap();
        let (adapter, mut session, probe) = setup(StubFetcher::ok());

        adapter
            .convert_one(&mut session, &source(&tmp, "talk.MOV", b"video"), &mut |_| {})
            .unwrap();

        let commands = probe.commands.lock().unwrap();
        assert_eq!(
            commands[0],
            vec!["-i", "input.mov", "-vn", "-acodec", "libmp3lame", "-q:a", "2", "output.mp3"]
        );
        assert_eq!(probe.file_count(), 0);
    }

    #[test]
    fn test_convert_one_without_extension_uses_default_input_name() {
        let tmp = TempDir::new().unwrap();
        let (adapter, mut session, probe) = setup(StubFetcher::ok());

        adapter
            .convert_one(&mut session, &source(&tmp, "capture", b"video"), &mut |_| {})
            .unwrap();

        assert_eq!(probe.commands.lock().unwrap()[0][1], "input.mp4");
    }

    #[test]
    fn test_convert_one_progress_is_monotonic_and_ends_at_100() {
        let tmp = TempDir::new().unwrap();
        let probe = EngineProbe::default();
        let engine = StubEngine::new(probe).with_ratios(vec![0.5, 0.3, 0.904, 1.7]);
        let mut session = EngineSession::new(Box::new(engine));
        let adapter = EngineAdapter::new(Box::new(StubFetcher::ok()), EngineConfig::default());

        let mut seen = Vec::new();
        adapter
            .convert_one(&mut session, &source(&tmp, "a.mp4", b"v"), &mut |p| {
                seen.push(p)
            })
            .unwrap();

        assert_eq!(seen, vec![0, 50, 90, 100]);
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_convert_one_engine_failure() {
        let tmp = TempDir::new().unwrap();
        let (adapter, mut session, probe) = setup(StubFetcher::ok());

        let err = adapter
            .convert_one(
                &mut session,
                &source(&tmp, "bad.mp4", &corrupt_bytes()),
                &mut |_| {},
            )
            .unwrap_err();

        assert!(matches!(err, ConvertError::Engine(EngineError::Exec(_))));
        assert!(session
            .last_error()
            .is_some_and(|m| m.contains("Invalid data")));
        assert_eq!(probe.file_count(), 0, "no partial output left behind");
    }

    #[test]
    fn test_convert_one_clears_previous_error() {
        let tmp = TempDir::new().unwrap();
        let (adapter, mut session, _) = setup(StubFetcher::ok());
        let _ = adapter.convert_one(
            &mut session,
            &source(&tmp, "bad.mp4", &corrupt_bytes()),
            &mut |_| {},
        );
        assert!(session.last_error().is_some());

        adapter
            .convert_one(&mut session, &source(&tmp, "good.mp4", b"v"), &mut |_| {})
            .unwrap();
        assert_eq!(session.last_error(), None);
    }

    #[test]
    fn test_convert_one_missing_source() {
        let (adapter, mut session, _) = setup(StubFetcher::ok());
        let missing = SourceFile::from_path("/no/such/dir/clip.mp4");
        let err = adapter
            .convert_one(&mut session, &missing, &mut |_| {})
            .unwrap_err();
        assert!(matches!(err, ConvertError::Read { .. }));
    }

    #[test]
    fn test_convert_one_empty_output_is_error() {
        let tmp = TempDir::new().unwrap();
        let probe = EngineProbe::default();
        let engine = StubEngine::new(probe.clone()).with_empty_output();
        let mut session = EngineSession::new(Box::new(engine));
        let adapter = EngineAdapter::new(Box::new(StubFetcher::ok()), EngineConfig::default());

        let err = adapter
            .convert_one(&mut session, &source(&tmp, "a.mp4", b"v"), &mut |_| {})
            .unwrap_err();
        assert!(matches!(err, ConvertError::EmptyOutput));
        assert_eq!(probe.file_count(), 0);
    }

    #[test]
    fn test_convert_one_load_failure_surfaces_timeout_message() {
        let tmp = TempDir::new().unwrap();
        let (adapter, mut session, _) = setup(StubFetcher::failing(1));
        let err = adapter
            .convert_one(&mut session, &source(&tmp, "a.mp4", b"v"), &mut |_| {})
            .unwrap_err();
        assert!(matches!(err, ConvertError::Load(_)));
        assert_eq!(err.to_string(), TIMEOUT_MESSAGE);
        assert!(!session.is_loaded());
    }

    // --- convert_batch ---

    fn run_batch(
        adapter: &EngineAdapter,
        session: &mut EngineSession,
        queue: &mut ConversionQueue,
        withdrawn: &WithdrawnItems,
    ) -> (BatchSummary, Vec<ConversionEvent>) {
        let items = queue.pending();
        let mut events = Vec::new();
        let summary = adapter.convert_batch(session, &items, withdrawn, &mut |event| {
            queue.apply(&event).unwrap();
            assert!(queue.count(ConversionStatus::Converting) <= 1);
            events.push(event);
        });
        (summary, events)
    }

    #[test]
    fn test_batch_single_valid_file() {
        let tmp = TempDir::new().unwrap();
        let (adapter, mut session, _) = setup(StubFetcher::ok());
        let mut queue = ConversionQueue::new();
        queue.append([source(&tmp, "a.mp4", b"video")]);

        let (summary, _) = run_batch(&adapter, &mut session, &mut queue, &WithdrawnItems::new());

        assert_eq!(summary.completed, 1);
        let item = &queue.items()[0];
        assert_eq!(item.status, ConversionStatus::Completed);
        assert_eq!(item.progress, 100);
        assert!(item.result.as_ref().is_some_and(|b| !b.is_empty()));
    }

    #[rstest]
    #[case::valid_first(false)]
    #[case::corrupt_first(true)]
    fn test_batch_isolates_failures(#[case] corrupt_first: bool) {
        let tmp = TempDir::new().unwrap();
        let (adapter, mut session, _) = setup(StubFetcher::ok());
        let good = source(&tmp, "good.mp4", b"video");
        let bad = source(&tmp, "bad.mp4", &corrupt_bytes());
        let mut queue = ConversionQueue::new();
        if corrupt_first {
            queue.append([bad, good]);
        } else {
            queue.append([good, bad]);
        }

        let (summary, _) = run_batch(&adapter, &mut session, &mut queue, &WithdrawnItems::new());

        assert_eq!(summary.completed, 1);
        assert_eq!(summary.failed, 1);
        for item in queue.items() {
            if item.source.name() == "good.mp4" {
                assert_eq!(item.status, ConversionStatus::Completed);
                assert_eq!(item.result.as_ref().unwrap().bytes(), b"MP3:video");
            } else {
                assert_eq!(item.status, ConversionStatus::Error);
                assert!(item.error.as_ref().unwrap().contains("Invalid data"));
                assert!(item.result.is_none());
            }
        }
    }

    #[test]
    fn test_batch_events_are_sequential() {
        let tmp = TempDir::new().unwrap();
        let (adapter, mut session, _) = setup(StubFetcher::ok());
        let mut queue = ConversionQueue::new();
        let ids = queue.append([
            source(&tmp, "a.mp4", b"1"),
            source(&tmp, "b.mp4", b"2"),
            source(&tmp, "c.mp4", b"3"),
        ]);

        let (_, events) = run_batch(&adapter, &mut session, &mut queue, &WithdrawnItems::new());

        // Every item's events form a contiguous run: Started .. Completed
        let order: Vec<ItemId> = events
            .iter()
            .filter(|e| matches!(e, ConversionEvent::Started { .. }))
            .map(|e| e.id())
            .collect();
        assert_eq!(order, ids);
        let mut current = None;
        for event in &events {
            match event {
                ConversionEvent::Started { id } => {
                    assert!(current.is_none());
                    current = Some(*id);
                }
                ConversionEvent::Progress { id, .. } => assert_eq!(current, Some(*id)),
                ConversionEvent::Completed { id, .. } | ConversionEvent::Failed { id, .. } => {
                    assert_eq!(current.take(), Some(*id));
                }
            }
        }
    }

    #[test]
    fn test_batch_skips_finished_items() {
        let tmp = TempDir::new().unwrap();
        let (adapter, mut session, probe) = setup(StubFetcher::ok());
        let mut queue = ConversionQueue::new();
        queue.append([source(&tmp, "a.mp4", b"1"), source(&tmp, "b.mp4", b"2")]);

        run_batch(&adapter, &mut session, &mut queue, &WithdrawnItems::new());
        let snapshot = queue.items().to_vec();
        let summary = adapter.convert_batch(&mut session, &snapshot, &WithdrawnItems::new(), &mut |_| {
            panic!("finished items must not emit events")
        });

        assert_eq!(summary.skipped, 2);
        assert_eq!(probe.commands.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_batch_skips_items_removed_before_their_turn() {
        let tmp = TempDir::new().unwrap();
        let (adapter, mut session, probe) = setup(StubFetcher::ok());
        let mut queue = ConversionQueue::new();
        let ids = queue.append([
            source(&tmp, "a.mp4", b"1"),
            source(&tmp, "b.mp4", b"2"),
            source(&tmp, "c.mp4", b"3"),
        ]);
        let snapshot = queue.pending();
        let withdrawn = WithdrawnItems::new();

        // The user removes b while a is converting
        let mut events = Vec::new();
        let summary = adapter.convert_batch(&mut session, &snapshot, &withdrawn, &mut |event| {
            if let ConversionEvent::Started { id } = event {
                if id == ids[0] {
                    queue.remove_withdrawn(ids[1], &withdrawn).unwrap();
                }
            }
            queue.apply(&event).unwrap();
            events.push(event);
        });

        assert_eq!(summary.completed, 2);
        assert_eq!(summary.skipped, 1);
        assert!(events.iter().all(|e| e.id() != ids[1]));
        assert_eq!(probe.commands.lock().unwrap().len(), 2);
        let completed: Vec<_> = queue.completed().map(|i| i.id).collect();
        assert_eq!(completed, vec![ids[0], ids[2]]);
    }

    #[test]
    fn test_batch_refuses_removal_of_item_it_already_started() {
        let tmp = TempDir::new().unwrap();
        let (adapter, mut session, probe) = setup(StubFetcher::ok());
        let mut queue = ConversionQueue::new();
        let ids = queue.append([source(&tmp, "a.mp4", b"1"), source(&tmp, "b.mp4", b"2")]);
        let snapshot = queue.pending();
        let withdrawn = WithdrawnItems::new();

        // The UI tries to remove b after the worker started it but before
        // the Started event reached the queue
        let mut refused = None;
        let summary = adapter.convert_batch(&mut session, &snapshot, &withdrawn, &mut |event| {
            if event == (ConversionEvent::Started { id: ids[1] }) {
                refused = Some(queue.remove_withdrawn(ids[1], &withdrawn));
            }
            queue.apply(&event).unwrap();
        });

        assert_eq!(refused, Some(Err(QueueError::Busy(ids[1]))));
        assert_eq!(summary.completed, 2);
        assert_eq!(probe.commands.lock().unwrap().len(), 2);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.items()[1].status, ConversionStatus::Completed);
    }

    #[test]
    fn test_convert_one_reports_100_once_when_engine_stops_short() {
        let tmp = TempDir::new().unwrap();
        let engine = StubEngine::new(EngineProbe::default()).with_ratios(vec![0.4]);
        let mut session = EngineSession::new(Box::new(engine));
        let adapter = EngineAdapter::new(Box::new(StubFetcher::ok()), EngineConfig::default());

        let mut seen = Vec::new();
        adapter
            .convert_one(&mut session, &source(&tmp, "a.mp4", b"v"), &mut |p| {
                seen.push(p)
            })
            .unwrap();

        assert_eq!(seen, vec![0, 40, 100]);
    }

    #[test]
    fn test_batch_load_failure_fails_items_without_aborting() {
        let tmp = TempDir::new().unwrap();
        // The first resource fetch times out
        let (adapter, mut session, _) = setup(StubFetcher::failing(1));
        let mut queue = ConversionQueue::new();
        queue.append([source(&tmp, "a.mp4", b"1"), source(&tmp, "b.mp4", b"2")]);

        let (summary, _) = run_batch(&adapter, &mut session, &mut queue, &WithdrawnItems::new());

        // First item hits the timeout; the second retries the load and succeeds
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.completed, 1);
        assert_eq!(queue.items()[0].status, ConversionStatus::Error);
        assert_eq!(queue.items()[0].error.as_deref(), Some(TIMEOUT_MESSAGE));
        assert_eq!(queue.items()[1].status, ConversionStatus::Completed);
    }

    #[test]
    fn test_transcode_args() {
        assert_eq!(
            transcode_args("input.mp4", "output.mp3"),
            vec!["-i", "input.mp4", "-vn", "-acodec", "libmp3lame", "-q:a", "2", "output.mp3"]
        );
    }

    #[rstest]
    #[case(0.0, 0)]
    #[case(0.004, 0)]
    #[case(0.006, 1)]
    #[case(0.5, 50)]
    #[case(1.0, 100)]
    #[case(1.5, 100)]
    #[case(-0.2, 0)]
    fn test_to_percent(#[case] ratio: f64, #[case] expected: u8) {
        assert_eq!(to_percent(ratio), expected);
    }
}
