use crate::shared::media_blob::MediaBlob;

use super::conversion_item::ItemId;

/// Status changes emitted while a batch runs, in the order they happen.
#[derive(Clone, Debug, PartialEq)]
pub enum ConversionEvent {
    Started { id: ItemId },
    Progress { id: ItemId, percent: u8 },
    Completed { id: ItemId, result: MediaBlob },
    Failed { id: ItemId, message: String },
}

impl ConversionEvent {
    pub fn id(&self) -> ItemId {
        match self {
            ConversionEvent::Started { id }
            | ConversionEvent::Progress { id, .. }
            | ConversionEvent::Completed { id, .. }
            | ConversionEvent::Failed { id, .. } => *id,
        }
    }
}

/// Outcome counts for one batch run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub completed: usize,
    pub failed: usize,
    /// Already finished or withdrawn before their turn.
    pub skipped: usize,
}
