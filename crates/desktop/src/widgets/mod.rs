pub mod catalog_card;
pub mod drop_zone;
pub mod hover_button;
pub mod queue_row;
