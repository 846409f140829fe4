pub mod catalog;
pub mod converter;
