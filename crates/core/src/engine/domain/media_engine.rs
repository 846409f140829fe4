use thiserror::Error;

use super::resource_fetcher::EngineResource;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("the converter is not loaded")]
    NotLoaded,
    #[error("failed to start the converter: {0}")]
    Load(String),
    #[error("invalid virtual file name: {0:?}")]
    InvalidName(String),
    #[error("virtual file {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("conversion failed: {0}")]
    Exec(String),
}

/// Domain interface for the external media-processing engine.
///
/// An engine owns a session-scoped virtual filesystem: inputs are written
/// into it by name, a command transforms them, and outputs are read back.
/// Implementations hold mutable, non-reentrant state, so every method takes
/// `&mut self` and callers must run one command at a time.
pub trait MediaEngine: Send {
    /// Materialise the fetched glue and payload resources and make the
    /// engine ready to run commands.
    fn load(&mut self, glue: &EngineResource, payload: &EngineResource)
        -> Result<(), EngineError>;

    fn write_file(&mut self, name: &str, data: &[u8]) -> Result<(), EngineError>;

    /// Run a command. `on_progress` receives the engine's native progress
    /// ratio in `[0.0, 1.0]`.
    fn exec(&mut self, args: &[String], on_progress: &mut dyn FnMut(f64))
        -> Result<(), EngineError>;

    fn read_file(&mut self, name: &str) -> Result<Vec<u8>, EngineError>;

    fn delete_file(&mut self, name: &str) -> Result<(), EngineError>;
}
