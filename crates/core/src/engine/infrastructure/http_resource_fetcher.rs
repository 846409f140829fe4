use std::io::{ErrorKind, Read};
use std::time::{Duration, Instant};

use crate::engine::domain::resource_fetcher::{EngineResource, FetchError, ResourceFetcher};

const READ_CHUNK: usize = 64 * 1024;

/// Fetches engine resources with a blocking reqwest client.
///
/// The timeout bounds the whole transfer: reqwest enforces it on the request,
/// and the body loop re-checks the deadline after every chunk so a slow but
/// steady trickle still gives up on time.
pub struct HttpResourceFetcher {
    use_system_proxy: bool,
}

impl HttpResourceFetcher {
    pub fn new() -> Self {
        Self {
            use_system_proxy: true,
        }
    }

    /// Connect directly, ignoring proxy environment variables.
    pub fn direct() -> Self {
        Self {
            use_system_proxy: false,
        }
    }

    fn client(&self, timeout: Duration) -> reqwest::Result<reqwest::blocking::Client> {
        let mut builder = reqwest::blocking::Client::builder().timeout(timeout);
        if !self.use_system_proxy {
            builder = builder.no_proxy();
        }
        builder.build()
    }
}

impl Default for HttpResourceFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceFetcher for HttpResourceFetcher {
    fn fetch(
        &self,
        url: &str,
        media_type: &str,
        timeout: Duration,
        on_progress: &mut dyn FnMut(u64, u64),
    ) -> Result<EngineResource, FetchError> {
        let started = Instant::now();
        let timed_out = || FetchError::Timeout {
            url: url.to_string(),
            timeout,
        };

        let client = self.client(timeout).map_err(|e| FetchError::Request {
            url: url.to_string(),
            source: e,
        })?;

        log::info!("Fetching {url}");
        let mut response = client.get(url).send().map_err(|e| {
            if e.is_timeout() || started.elapsed() >= timeout {
                timed_out()
            } else {
                FetchError::Request {
                    url: url.to_string(),
                    source: e,
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let total = response.content_length().unwrap_or(0);
        let mut bytes = Vec::with_capacity(total.min(256 * 1024 * 1024) as usize);
        let mut chunk = vec![0u8; READ_CHUNK];

        loop {
            if started.elapsed() >= timeout {
                return Err(timed_out());
            }
            let n = match response.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) if e.kind() == ErrorKind::TimedOut || started.elapsed() >= timeout => {
                    return Err(timed_out())
                }
                Err(e) => {
                    return Err(FetchError::Body {
                        url: url.to_string(),
                        source: e,
                    })
                }
            };
            bytes.extend_from_slice(&chunk[..n]);
            on_progress(bytes.len() as u64, total);
        }

        if bytes.is_empty() {
            return Err(FetchError::Empty {
                url: url.to_string(),
            });
        }

        let name = url
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or(url)
            .to_string();
        log::info!(
            "Fetched {name}: {} bytes in {:.1}s",
            bytes.len(),
            started.elapsed().as_secs_f64()
        );

        Ok(EngineResource {
            name,
            media_type: media_type.to_string(),
            bytes,
        })
    }
}
