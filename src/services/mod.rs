pub use pushkind_common::services::errors::{ServiceError, ServiceResult};

pub mod catalog;
pub mod facets;
pub mod filters;
pub mod pagination;
pub mod query;
pub mod toggles;
pub mod towns;
