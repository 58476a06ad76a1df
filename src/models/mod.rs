pub mod catalog_state;
pub mod product;
pub mod shop;
pub mod toggle_entry;
pub mod town;
pub mod user;
