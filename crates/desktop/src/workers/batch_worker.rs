use std::sync::Arc;
use std::thread;

use crossbeam_channel::{Receiver, Sender};

use soundlift_core::conversion::domain::conversion_event::{BatchSummary, ConversionEvent};
use soundlift_core::conversion::domain::conversion_item::ConversionItem;
use soundlift_core::conversion::domain::withdrawn_items::WithdrawnItems;
use soundlift_core::engine::domain::engine_session::{lock_session, SharedSession};
use soundlift_core::pipeline::conversion_logger::ConversionLogger;
use soundlift_core::pipeline::engine_adapter::EngineAdapter;

/// Messages sent from the batch thread to the UI.
#[derive(Debug, Clone)]
pub enum BatchMessage {
    Event(ConversionEvent),
    Finished(BatchSummary),
}

/// Parameters for a batch run.
pub struct BatchParams {
    pub adapter: Arc<EngineAdapter>,
    pub session: SharedSession,
    /// Snapshot of the pending items, in queue order.
    pub items: Vec<ConversionItem>,
    pub withdrawn: WithdrawnItems,
    pub logger: Box<dyn ConversionLogger>,
}

/// Spawn a background batch worker. The session stays locked until the
/// whole batch is done, so a second batch waits for the first.
pub fn spawn(params: BatchParams) -> Receiver<BatchMessage> {
    let (tx, rx) = crossbeam_channel::unbounded::<BatchMessage>();

    thread::spawn(move || run_batch(&tx, params));

    rx
}

fn run_batch(tx: &Sender<BatchMessage>, mut params: BatchParams) {
    log::info!("Batch: converting {} item(s)", params.items.len());
    let logger = &mut params.logger;
    let summary = {
        let mut guard = lock_session(&params.session);
        params.adapter.convert_batch(
            &mut guard,
            &params.items,
            &params.withdrawn,
            &mut |event| {
                logger.record(&event);
                let _ = tx.send(BatchMessage::Event(event));
            },
        )
    };
    logger.summary();
    let _ = tx.send(BatchMessage::Finished(summary));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workers::fakes::{adapter, session, FakeFetcher, BROKEN};
    use soundlift_core::conversion::domain::conversion_item::ConversionStatus;
    use soundlift_core::conversion::domain::conversion_queue::ConversionQueue;
    use soundlift_core::pipeline::conversion_logger::NullConversionLogger;
    use soundlift_core::shared::source_file::SourceFile;
    use tempfile::TempDir;

    fn queue_of(dir: &TempDir, files: &[(&str, &[u8])]) -> ConversionQueue {
        let mut queue = ConversionQueue::new();
        queue.append(files.iter().map(|(name, data)| {
            let path = dir.path().join(name);
            std::fs::write(&path, data).unwrap();
            SourceFile::from_path(path)
        }));
        queue
    }

    fn run(queue: &mut ConversionQueue, withdrawn: WithdrawnItems) -> BatchSummary {
        let rx = spawn(BatchParams {
            adapter: adapter(FakeFetcher::Ok),
            session: session(),
            items: queue.pending(),
            withdrawn,
            logger: Box::new(NullConversionLogger),
        });
        let mut summary = None;
        for message in rx.iter() {
            match message {
                BatchMessage::Event(event) => queue.apply(&event).unwrap(),
                BatchMessage::Finished(s) => summary = Some(s),
            }
        }
        summary.expect("worker always finishes")
    }

    #[test]
    fn test_batch_converts_every_item() {
        let dir = TempDir::new().unwrap();
        let mut queue = queue_of(&dir, &[("a.mp4", b"one"), ("b.mkv", b"two")]);

        let summary = run(&mut queue, WithdrawnItems::new());

        assert_eq!(summary.completed, 2);
        assert_eq!(queue.count(ConversionStatus::Completed), 2);
        assert!(queue.items().iter().all(|i| i.progress == 100));
    }

    #[test]
    fn test_batch_failure_does_not_stop_later_items() {
        let dir = TempDir::new().unwrap();
        let mut queue = queue_of(&dir, &[("bad.mp4", BROKEN), ("good.mp4", b"ok")]);

        let summary = run(&mut queue, WithdrawnItems::new());

        assert_eq!((summary.completed, summary.failed), (1, 1));
        assert_eq!(queue.items()[0].status, ConversionStatus::Error);
        assert_eq!(queue.items()[1].status, ConversionStatus::Completed);
    }

    #[test]
    fn test_batch_skips_withdrawn_items() {
        let dir = TempDir::new().unwrap();
        let mut queue = queue_of(&dir, &[("a.mp4", b"one"), ("b.mp4", b"two")]);
        let withdrawn = WithdrawnItems::new();
        withdrawn.withdraw(queue.items()[0].id);

        let summary = run(&mut queue, withdrawn);

        assert_eq!(summary.skipped, 1);
        assert_eq!(queue.items()[0].status, ConversionStatus::Pending);
        assert_eq!(queue.items()[1].status, ConversionStatus::Completed);
    }
}
