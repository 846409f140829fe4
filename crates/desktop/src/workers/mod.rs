pub mod batch_worker;
pub mod load_worker;

#[cfg(test)]
pub(crate) mod fakes;
