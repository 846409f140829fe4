pub mod http_resource_fetcher;
pub mod process_engine;
pub mod progress_parser;
