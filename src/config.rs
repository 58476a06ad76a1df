use std::env;

/// Page size used when `CATALOG_PAGE_SIZE` is missing or invalid.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Catalog settings shared with request handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Products per catalog page.
    pub page_size: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl CatalogConfig {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: if page_size == 0 {
                DEFAULT_PAGE_SIZE
            } else {
                page_size
            },
        }
    }

    /// Read `CATALOG_PAGE_SIZE` from the environment.
    pub fn from_env() -> Self {
        Self::from_value(env::var("CATALOG_PAGE_SIZE").ok().as_deref())
    }

    fn from_value(value: Option<&str>) -> Self {
        match value.map(|raw| raw.trim().parse::<usize>()) {
            Some(Ok(page_size)) => Self::new(page_size),
            Some(Err(err)) => {
                log::warn!("Ignoring invalid CATALOG_PAGE_SIZE: {err}");
                Self::default()
            }
            None => Self::default(),
        }
    }
}
