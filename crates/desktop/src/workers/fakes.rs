//! In-memory engine and fetcher for worker tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use soundlift_core::engine::domain::engine_config::EngineConfig;
use soundlift_core::engine::domain::engine_session::{EngineSession, SharedSession};
use soundlift_core::engine::domain::media_engine::{EngineError, MediaEngine};
use soundlift_core::engine::domain::resource_fetcher::{
    EngineResource, FetchError, ResourceFetcher,
};
use soundlift_core::pipeline::engine_adapter::EngineAdapter;

/// Input starting with these bytes fails to convert.
pub const BROKEN: &[u8] = b"BROKEN";

#[derive(Default)]
pub struct FakeEngine {
    files: HashMap<String, Vec<u8>>,
}

impl MediaEngine for FakeEngine {
    fn load(&mut self, _: &EngineResource, _: &EngineResource) -> Result<(), EngineError> {
        Ok(())
    }

    fn write_file(&mut self, name: &str, data: &[u8]) -> Result<(), EngineError> {
        self.files.insert(name.to_string(), data.to_vec());
        Ok(())
    }

    fn exec(
        &mut self,
        args: &[String],
        on_progress: &mut dyn FnMut(f64),
    ) -> Result<(), EngineError> {
        let input = self.files.get(&args[1]).cloned().unwrap_or_default();
        if input.starts_with(BROKEN) {
            return Err(EngineError::Exec("Invalid data found".into()));
        }
        on_progress(0.5);
        on_progress(1.0);
        let output = args.last().cloned().unwrap_or_default();
        self.files.insert(output, input);
        Ok(())
    }

    fn read_file(&mut self, name: &str) -> Result<Vec<u8>, EngineError> {
        self.files
            .get(name)
            .cloned()
            .ok_or_else(|| EngineError::Exec(format!("{name} missing")))
    }

    fn delete_file(&mut self, name: &str) -> Result<(), EngineError> {
        self.files.remove(name);
        Ok(())
    }
}

pub enum FakeFetcher {
    Ok,
    TimedOut,
}

impl ResourceFetcher for FakeFetcher {
    fn fetch(
        &self,
        url: &str,
        media_type: &str,
        timeout: Duration,
        on_progress: &mut dyn FnMut(u64, u64),
    ) -> Result<EngineResource, FetchError> {
        match self {
            FakeFetcher::Ok => {
                on_progress(1, 1);
                Ok(EngineResource {
                    name: url.to_string(),
                    media_type: media_type.to_string(),
                    bytes: vec![0],
                })
            }
            FakeFetcher::TimedOut => Err(FetchError::Timeout {
                url: url.to_string(),
                timeout,
            }),
        }
    }
}

pub fn adapter(fetcher: FakeFetcher) -> Arc<EngineAdapter> {
    Arc::new(EngineAdapter::new(Box::new(fetcher), EngineConfig::default()))
}

pub fn session() -> SharedSession {
    EngineSession::new(Box::new(FakeEngine::default())).into_shared()
}
