use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use super::conversion_item::ItemId;

#[derive(Debug, Default)]
struct Claims {
    withdrawn: HashSet<ItemId>,
    started: HashSet<ItemId>,
}

/// Hand-off between the UI and a running batch over who owns each item.
///
/// The worker `claim`s an item right before starting it; the UI `withdraw`s
/// an item it wants to remove. Both go through one lock, so exactly one of
/// them wins for any item.
#[derive(Clone, Debug, Default)]
pub struct WithdrawnItems {
    claims: Arc<Mutex<Claims>>,
}

impl WithdrawnItems {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Claims> {
        self.claims.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Mark `id` as removed. Returns false if the batch already started it.
    pub fn withdraw(&self, id: ItemId) -> bool {
        let mut claims = self.lock();
        if claims.started.contains(&id) {
            return false;
        }
        claims.withdrawn.insert(id);
        true
    }

    /// Mark `id` as started. Returns false if it was withdrawn first.
    pub fn claim(&self, id: ItemId) -> bool {
        let mut claims = self.lock();
        if claims.withdrawn.contains(&id) {
            return false;
        }
        claims.started.insert(id);
        true
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.lock().withdrawn.contains(&id)
    }
}
