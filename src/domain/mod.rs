pub mod catalog_state;
pub mod facet;
pub mod filter;
pub mod product;
pub mod shop;
pub mod toggle;
pub mod town;
pub mod user;
