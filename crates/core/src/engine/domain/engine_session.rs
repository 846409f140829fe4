use std::sync::{Arc, Mutex, MutexGuard};

use super::media_engine::MediaEngine;

/// The single engine instance shared by every conversion.
///
/// Loaded once, reused for the rest of the process, and torn down only when
/// dropped. Adapter operations take `&mut EngineSession`, so at most one
/// command can run against the engine at a time.
pub struct EngineSession {
    engine: Box<dyn MediaEngine>,
    loaded: bool,
    last_error: Option<String>,
}

/// Session handle shared between the UI and background workers.
pub type SharedSession = Arc<Mutex<EngineSession>>;

impl EngineSession {
    pub fn new(engine: Box<dyn MediaEngine>) -> Self {
        Self {
            engine,
            loaded: false,
            last_error: None,
        }
    }

    pub fn into_shared(self) -> SharedSession {
        Arc::new(Mutex::new(self))
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// The most recent adapter-level error, for a global error line.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub(crate) fn mark_loaded(&mut self) {
        self.loaded = true;
    }

    pub(crate) fn set_error(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
    }

    pub(crate) fn clear_error(&mut self) {
        self.last_error = None;
    }

    pub(crate) fn engine_mut(&mut self) -> &mut dyn MediaEngine {
        self.engine.as_mut()
    }
}

/// Lock a shared session, recovering the guard if a worker panicked.
pub fn lock_session(session: &SharedSession) -> MutexGuard<'_, EngineSession> {
    session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
