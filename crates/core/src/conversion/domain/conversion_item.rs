use std::fmt;

use crate::shared::media_blob::MediaBlob;
use crate::shared::source_file::SourceFile;

/// Identifier of a queued item, unique for the lifetime of its queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle of a queued item.
///
/// `Pending -> Converting -> Completed | Error`. Completed and Error are
/// terminal; nothing ever returns to Pending.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConversionStatus {
    Pending,
    Converting,
    Completed,
    Error,
}

impl ConversionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, ConversionStatus::Completed | ConversionStatus::Error)
    }

    /// Whether moving from `self` to `next` follows the lifecycle.
    /// Staying in the same state is allowed so progress updates can be merged.
    pub fn can_become(self, next: ConversionStatus) -> bool {
        use ConversionStatus::*;
        matches!(
            (self, next),
            (Pending, Pending)
                | (Pending, Converting)
                | (Converting, Converting)
                | (Converting, Completed)
                | (Converting, Error)
                | (Completed, Completed)
                | (Error, Error)
        )
    }
}

impl fmt::Display for ConversionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionStatus::Pending => write!(f, "Waiting"),
            ConversionStatus::Converting => write!(f, "Converting"),
            ConversionStatus::Completed => write!(f, "Done"),
            ConversionStatus::Error => write!(f, "Failed"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConversionItem {
    pub id: ItemId,
    pub source: SourceFile,
    pub status: ConversionStatus,
    /// 0..=100
    pub progress: u8,
    pub result: Option<MediaBlob>,
    pub error: Option<String>,
}

impl ConversionItem {
    pub fn new(id: ItemId, source: SourceFile) -> Self {
        Self {
            id,
            source,
            status: ConversionStatus::Pending,
            progress: 0,
            result: None,
            error: None,
        }
    }
}

/// A partial update merged into an item; `None` fields are left unchanged.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ItemUpdate {
    pub status: Option<ConversionStatus>,
    pub progress: Option<u8>,
    pub result: Option<MediaBlob>,
    pub error: Option<String>,
}

impl ItemUpdate {
    pub fn status(status: ConversionStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn progress(progress: u8) -> Self {
        Self {
            progress: Some(progress),
            ..Self::default()
        }
    }
}
