pub mod conversion;
pub mod engine;
pub mod pipeline;
pub mod shared;

#[cfg(test)]
pub(crate) mod test_support;
