pub mod engine_config;
pub mod engine_session;
pub mod media_engine;
pub mod resource_fetcher;
