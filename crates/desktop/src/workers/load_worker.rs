use std::sync::Arc;
use std::thread;

use crossbeam_channel::{Receiver, Sender};

use soundlift_core::engine::domain::engine_session::{lock_session, SharedSession};
use soundlift_core::pipeline::engine_adapter::{EngineAdapter, LoadProgress};

/// Messages sent from the load thread to the UI.
#[derive(Debug, Clone)]
pub enum LoadMessage {
    Progress(LoadProgress),
    Loaded,
    Failed(String),
}

/// Load the engine in the background. The last message is always
/// `Loaded` or `Failed`.
pub fn spawn(adapter: Arc<EngineAdapter>, session: SharedSession) -> Receiver<LoadMessage> {
    let (tx, rx) = crossbeam_channel::unbounded::<LoadMessage>();

    thread::spawn(move || run_load(&tx, &adapter, &session));

    rx
}

fn run_load(tx: &Sender<LoadMessage>, adapter: &EngineAdapter, session: &SharedSession) {
    let mut guard = lock_session(session);
    let result = adapter.load(&mut guard, &mut |progress| {
        let _ = tx.send(LoadMessage::Progress(progress));
    });

    let done = match result {
        Ok(()) => LoadMessage::Loaded,
        Err(e) => LoadMessage::Failed(e.user_message()),
    };
    let _ = tx.send(done);
}
