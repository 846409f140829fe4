use std::sync::Arc;

use crate::shared::constants::MP3_MEDIA_TYPE;

/// An in-memory conversion result tagged with its media type.
///
/// The bytes are reference counted so results can travel through worker
/// channels and UI messages without copying the encoded audio.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaBlob {
    bytes: Arc<[u8]>,
    media_type: String,
}

impl MediaBlob {
    pub fn new(bytes: Vec<u8>, media_type: impl Into<String>) -> Self {
        Self {
            bytes: Arc::from(bytes),
            media_type: media_type.into(),
        }
    }

    pub fn mp3(bytes: Vec<u8>) -> Self {
        Self::new(bytes, MP3_MEDIA_TYPE)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
