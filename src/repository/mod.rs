use pushkind_common::db::{DbConnection, DbPool};
use pushkind_common::repository::errors::RepositoryResult;

use crate::domain::catalog_state::CatalogStateScope;
use crate::domain::facet::FacetValues;
use crate::domain::product::{NewProduct, Product, ProductListQuery};
use crate::domain::shop::{NewShop, Shop};
use crate::domain::toggle::{ToggleEntry, ToggleKey, ToggleKind, ToggleOutcome, VariantSnapshot};
use crate::domain::town::{NewTown, Town};
use crate::domain::user::{NewUser, User};

pub mod catalog_state;
pub mod facet;
pub mod product;
pub mod shop;
pub mod toggle;
pub mod town;
pub mod user;

#[cfg(test)]
pub mod mock;

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Catalog reads over active products joined with their shops.
pub trait ProductReader {
    fn get_product_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Product>>;
    /// Load the given products regardless of their active flag. Unknown ids
    /// are skipped.
    fn get_products_by_ids(&self, ids: &[i32], hub_id: i32) -> RepositoryResult<Vec<Product>>;
    /// Return the total match count together with the requested page.
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
}

pub trait ProductWriter {
    fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
}

pub trait ShopWriter {
    fn create_shop(&self, new_shop: &NewShop) -> RepositoryResult<Shop>;
}

/// Distinct-value enumeration used to build filter options.
pub trait FacetReader {
    /// Raw brand, shop and category values of active products whose shop
    /// trades in one of `towns`.
    fn list_facet_values(&self, hub_id: i32, towns: &[String]) -> RepositoryResult<FacetValues>;
}

pub trait TownReader {
    fn list_towns(&self, hub_id: i32) -> RepositoryResult<Vec<Town>>;
    fn get_town_by_name(&self, name: &str, hub_id: i32) -> RepositoryResult<Option<Town>>;
}

pub trait TownWriter {
    fn create_town(&self, new_town: &NewTown) -> RepositoryResult<Town>;
    fn delete_town(&self, town_id: i32, hub_id: i32) -> RepositoryResult<()>;
}

pub trait UserReader {
    fn get_user_by_email(&self, email: &str, hub_id: i32) -> RepositoryResult<Option<User>>;
}

pub trait UserWriter {
    fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
}

/// Read access to the wishlist and booking ledgers.
pub trait ToggleReader {
    fn list_toggle_entries(
        &self,
        hub_id: i32,
        kind: ToggleKind,
        user_sub: &str,
    ) -> RepositoryResult<Vec<ToggleEntry>>;
    fn is_toggled(&self, key: &ToggleKey) -> RepositoryResult<bool>;
}

/// Write access to the wishlist and booking ledgers.
pub trait ToggleWriter {
    /// Remove the entry for `key` when present, otherwise create it with
    /// `snapshot`. Must be atomic with respect to other writers.
    fn toggle_entry(
        &self,
        key: &ToggleKey,
        snapshot: &VariantSnapshot,
    ) -> RepositoryResult<ToggleOutcome>;
}

/// Read access to per-shopper catalog state (filter layers, paging cursor).
pub trait CatalogStateReader {
    fn get_catalog_state(
        &self,
        scope: &CatalogStateScope,
        key: &str,
    ) -> RepositoryResult<Option<String>>;
}

/// Write access to per-shopper catalog state. `put` replaces any previous
/// value of the key.
pub trait CatalogStateWriter {
    fn put_catalog_state(
        &self,
        scope: &CatalogStateScope,
        key: &str,
        value: &str,
    ) -> RepositoryResult<()>;
    fn delete_catalog_state(&self, scope: &CatalogStateScope, key: &str) -> RepositoryResult<()>;
}
