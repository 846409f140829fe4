//! Stub engine and fetcher shared by adapter and worker tests.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tempfile::TempDir;

use crate::engine::domain::media_engine::{EngineError, MediaEngine};
use crate::engine::domain::resource_fetcher::{EngineResource, FetchError, ResourceFetcher};
use crate::shared::source_file::SourceFile;

/// Input bytes starting with this marker make the stub engine fail.
pub const CORRUPT_MARKER: &[u8] = b"CORRUPT";

/// Counters and state a test can inspect after the engine moved into a session.
#[derive(Clone, Default)]
pub struct EngineProbe {
    pub loads: Arc<AtomicUsize>,
    pub files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    pub commands: Arc<Mutex<Vec<Vec<String>>>>,
}

impl EngineProbe {
    pub fn file_count(&self) -> usize {
        self.files.lock().unwrap().len()
    }
}

/// In-memory engine: "transcodes" by prefixing the input with `MP3:`.
pub struct StubEngine {
    probe: EngineProbe,
    ratios: Vec<f64>,
    empty_output: bool,
}

impl StubEngine {
    pub fn new(probe: EngineProbe) -> Self {
        Self {
            probe,
            ratios: vec![0.25, 0.5, 1.0],
            empty_output: false,
        }
    }

    pub fn with_ratios(mut self, ratios: Vec<f64>) -> Self {
        self.ratios = ratios;
        self
    }

    pub fn with_empty_output(mut self) -> Self {
        self.empty_output = true;
        self
    }
}

impl MediaEngine for StubEngine {
    fn load(&mut self, _: &EngineResource, _: &EngineResource) -> Result<(), EngineError> {
        self.probe.loads.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn write_file(&mut self, name: &str, data: &[u8]) -> Result<(), EngineError> {
        self.probe
            .files
            .lock()
            .unwrap()
            .insert(name.to_string(), data.to_vec());
        Ok(())
    }

    fn exec(
        &mut self,
        args: &[String],
        on_progress: &mut dyn FnMut(f64),
    ) -> Result<(), EngineError> {
        self.probe.commands.lock().unwrap().push(args.to_vec());
        let input = args
            .windows(2)
            .find(|p| p[0] == "-i")
            .map(|p| p[1].clone())
            .ok_or_else(|| EngineError::Exec("no input".into()))?;
        let output = args.last().cloned().unwrap_or_default();

        let mut files = self.probe.files.lock().unwrap();
        let data = files
            .get(&input)
            .cloned()
            .ok_or_else(|| EngineError::Exec(format!("{input}: No such file")))?;
        if data.starts_with(CORRUPT_MARKER) {
            return Err(EngineError::Exec(format!(
                "{input}: Invalid data found when processing input"
            )));
        }
        for ratio in &self.ratios {
            on_progress(*ratio);
        }
        let encoded = if self.empty_output {
            Vec::new()
        } else {
            [b"MP3:".as_slice(), &data].concat()
        };
        files.insert(output, encoded);
        Ok(())
    }

    fn read_file(&mut self, name: &str) -> Result<Vec<u8>, EngineError> {
        self.probe
            .files
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| EngineError::Io {
                name: name.to_string(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
    }

    fn delete_file(&mut self, name: &str) -> Result<(), EngineError> {
        self.probe
            .files
            .lock()
            .unwrap()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| EngineError::Io {
                name: name.to_string(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
    }
}

/// Fetcher that times out for the first `failures` calls, then succeeds.
pub struct StubFetcher {
    pub calls: Arc<AtomicUsize>,
    failures: usize,
}

impl StubFetcher {
    pub fn ok() -> Self {
        Self::failing(0)
    }

    pub fn failing(failures: usize) -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            failures,
        }
    }
}

impl ResourceFetcher for StubFetcher {
    fn fetch(
        &self,
        url: &str,
        media_type: &str,
        timeout: Duration,
        on_progress: &mut dyn FnMut(u64, u64),
    ) -> Result<EngineResource, FetchError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            return Err(FetchError::Timeout {
                url: url.to_string(),
                timeout,
            });
        }
        on_progress(4, 8);
        on_progress(8, 8);
        Ok(EngineResource {
            name: url.rsplit('/').next().unwrap_or(url).to_string(),
            media_type: media_type.to_string(),
            bytes: b"binary".to_vec(),
        })
    }
}

/// Write a source file into `dir` and return its handle.
pub fn source(dir: &TempDir, name: &str, contents: &[u8]) -> SourceFile {
    let path: PathBuf = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    SourceFile::from_path(path)
}
