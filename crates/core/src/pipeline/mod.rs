pub mod conversion_logger;
pub mod engine_adapter;
