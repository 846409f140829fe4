use std::time::Duration;

use thiserror::Error;

/// A remote engine resource held in memory, ready to hand to the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineResource {
    pub name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("timed out after {timeout:?} fetching {url}")]
    Timeout { url: String, timeout: Duration },
    #[error("server returned HTTP {status} for {url}")]
    Status { url: String, status: u16 },
    #[error("request failed for {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to read response from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: std::io::Error,
    },
    #[error("empty response from {url}")]
    Empty { url: String },
}

impl FetchError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Timeout { .. })
    }
}

/// Domain interface for retrieving engine resources over the network.
pub trait ResourceFetcher: Send + Sync {
    /// Fetch `url` fully into memory within `timeout`.
    ///
    /// `on_progress(downloaded, total)` is called as bytes arrive; `total` is
    /// 0 if the server didn't provide Content-Length.
    fn fetch(
        &self,
        url: &str,
        media_type: &str,
        timeout: Duration,
        on_progress: &mut dyn FnMut(u64, u64),
    ) -> Result<EngineResource, FetchError>;
}
