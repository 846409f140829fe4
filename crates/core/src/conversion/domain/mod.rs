pub mod catalog;
pub mod conversion_event;
pub mod conversion_item;
pub mod conversion_queue;
pub mod withdrawn_items;
