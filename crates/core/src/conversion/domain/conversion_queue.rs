use thiserror::Error;

use crate::shared::source_file::{is_compatible_video, SourceFile};

use super::conversion_event::ConversionEvent;
use super::conversion_item::{ConversionItem, ConversionStatus, ItemId, ItemUpdate};
use super::withdrawn_items::WithdrawnItems;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    #[error("no queued item {0}")]
    NotFound(ItemId),
    #[error("item {id} cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        id: ItemId,
        from: ConversionStatus,
        to: ConversionStatus,
    },
    #[error("item {0} is converting and cannot be removed")]
    Busy(ItemId),
}

/// Ordered list of submitted files and their conversion state.
#[derive(Debug, Default)]
pub struct ConversionQueue {
    items: Vec<ConversionItem>,
    next_id: u64,
}

impl ConversionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue every file that looks like video input; returns the new ids.
    /// Files that don't are dropped silently.
    pub fn append(&mut self, files: impl IntoIterator<Item = SourceFile>) -> Vec<ItemId> {
        let mut added = Vec::new();
        for file in files {
            if !is_compatible_video(&file) {
                log::debug!("Ignoring non-video file {}", file.name());
                continue;
            }
            self.next_id += 1;
            let id = ItemId(self.next_id);
            self.items.push(ConversionItem::new(id, file));
            added.push(id);
        }
        added
    }

    /// Merge a partial update into an item.
    ///
    /// The item is left untouched if the update would move its status
    /// backwards or modify a finished item.
    pub fn update(&mut self, id: ItemId, update: ItemUpdate) -> Result<(), QueueError> {
        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(QueueError::NotFound(id))?;

        let next = update.status.unwrap_or(item.status);
        let touches_fields =
            update.progress.is_some() || update.result.is_some() || update.error.is_some();
        if !item.status.can_become(next) || (item.status.is_terminal() && touches_fields) {
            return Err(QueueError::InvalidTransition {
                id,
                from: item.status,
                to: next,
            });
        }

        item.status = next;
        if let Some(progress) = update.progress {
            item.progress = progress.min(100);
        }
        if let Some(result) = update.result {
            item.result = Some(result);
        }
        if let Some(error) = update.error {
            item.error = Some(error);
        }
        Ok(())
    }

    /// Fold a batch event into the queue. Events for items the user has
    /// since removed are ignored.
    pub fn apply(&mut self, event: &ConversionEvent) -> Result<(), QueueError> {
        let update = match event {
            ConversionEvent::Started { .. } => ItemUpdate {
                status: Some(ConversionStatus::Converting),
                progress: Some(0),
                ..ItemUpdate::default()
            },
            ConversionEvent::Progress { percent, .. } => ItemUpdate::progress(*percent),
            ConversionEvent::Completed { result, .. } => ItemUpdate {
                status: Some(ConversionStatus::Completed),
                progress: Some(100),
                result: Some(result.clone()),
                error: None,
            },
            ConversionEvent::Failed { message, .. } => ItemUpdate {
                status: Some(ConversionStatus::Error),
                error: Some(message.clone()),
                ..ItemUpdate::default()
            },
        };
        match self.update(event.id(), update) {
            Err(QueueError::NotFound(id)) => {
                log::debug!("Dropping event for removed item {id}");
                Ok(())
            }
            other => other,
        }
    }

    /// Remove an item that is not currently converting.
    pub fn remove(&mut self, id: ItemId) -> Result<ConversionItem, QueueError> {
        let index = self
            .items
            .iter()
            .position(|i| i.id == id)
            .ok_or(QueueError::NotFound(id))?;
        if self.items[index].status == ConversionStatus::Converting {
            return Err(QueueError::Busy(id));
        }
        Ok(self.items.remove(index))
    }

    /// Remove an item while a batch may be running over a snapshot.
    ///
    /// Unfinished items must first be withdrawn from the batch; an item the
    /// batch has already claimed is `Busy` even if no `Started` event has
    /// reached the queue yet.
    pub fn remove_withdrawn(
        &mut self,
        id: ItemId,
        withdrawn: &WithdrawnItems,
    ) -> Result<ConversionItem, QueueError> {
        let item = self.get(id).ok_or(QueueError::NotFound(id))?;
        if item.status == ConversionStatus::Converting {
            return Err(QueueError::Busy(id));
        }
        if !item.status.is_terminal() && !withdrawn.withdraw(id) {
            return Err(QueueError::Busy(id));
        }
        self.remove(id)
    }

    /// Drop every completed or failed item.
    pub fn clear_finished(&mut self) {
        self.items.retain(|i| !i.status.is_terminal());
    }

    pub fn get(&self, id: ItemId) -> Option<&ConversionItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn items(&self) -> &[ConversionItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Snapshot of the items a batch run should process.
    pub fn pending(&self) -> Vec<ConversionItem> {
        self.items
            .iter()
            .filter(|i| i.status == ConversionStatus::Pending)
            .cloned()
            .collect()
    }

    /// Completed items that carry a result, in queue order.
    pub fn completed(&self) -> impl Iterator<Item = &ConversionItem> {
        self.items
            .iter()
            .filter(|i| i.status == ConversionStatus::Completed && i.result.is_some())
    }

    pub fn is_converting(&self) -> bool {
        self.items
            .iter()
            .any(|i| i.status == ConversionStatus::Converting)
    }

    pub fn count(&self, status: ConversionStatus) -> usize {
        self.items.iter().filter(|i| i.status == status).count()
    }
}
