use mockall::mock;

use super::{
    CatalogStateReader, CatalogStateWriter, FacetReader, ProductReader, ToggleReader,
    ToggleWriter, TownReader, TownWriter, UserReader,
};
use crate::domain::{
    catalog_state::CatalogStateScope,
    facet::FacetValues,
    product::{Product, ProductListQuery},
    toggle::{ToggleEntry, ToggleKey, ToggleKind, ToggleOutcome, VariantSnapshot},
    town::{NewTown, Town},
    user::User,
};
use pushkind_common::repository::errors::RepositoryResult;

mock! {
    pub ProductReader {}

    impl ProductReader for ProductReader {
        fn get_product_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Product>>;
        fn get_products_by_ids(&self, ids: &[i32], hub_id: i32) -> RepositoryResult<Vec<Product>>;
        fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
    }
}

mock! {
    pub FacetReader {}

    impl FacetReader for FacetReader {
        fn list_facet_values(&self, hub_id: i32, towns: &[String]) -> RepositoryResult<FacetValues>;
    }
}

mock! {
    pub TownReader {}

    impl TownReader for TownReader {
        fn list_towns(&self, hub_id: i32) -> RepositoryResult<Vec<Town>>;
        fn get_town_by_name(&self, name: &str, hub_id: i32) -> RepositoryResult<Option<Town>>;
    }
}

mock! {
    pub TownWriter {}

    impl TownWriter for TownWriter {
        fn create_town(&self, new_town: &NewTown) -> RepositoryResult<Town>;
        fn delete_town(&self, town_id: i32, hub_id: i32) -> RepositoryResult<()>;
    }
}

mock! {
    pub UserReader {}

    impl UserReader for UserReader {
        fn get_user_by_email(&self, email: &str, hub_id: i32) -> RepositoryResult<Option<User>>;
    }
}

mock! {
    pub ToggleReader {}

    impl ToggleReader for ToggleReader {
        fn list_toggle_entries(&self, hub_id: i32, kind: ToggleKind, user_sub: &str) -> RepositoryResult<Vec<ToggleEntry>>;
        fn is_toggled(&self, key: &ToggleKey) -> RepositoryResult<bool>;
    }
}

mock! {
    pub ToggleWriter {}

    impl ToggleWriter for ToggleWriter {
        fn toggle_entry(&self, key: &ToggleKey, snapshot: &VariantSnapshot) -> RepositoryResult<ToggleOutcome>;
    }
}

mock! {
    pub CatalogStateRepo {}

    impl CatalogStateReader for CatalogStateRepo {
        fn get_catalog_state(&self, scope: &CatalogStateScope, key: &str) -> RepositoryResult<Option<String>>;
    }

    impl CatalogStateWriter for CatalogStateRepo {
        fn put_catalog_state(&self, scope: &CatalogStateScope, key: &str, value: &str) -> RepositoryResult<()>;
        fn delete_catalog_state(&self, scope: &CatalogStateScope, key: &str) -> RepositoryResult<()>;
    }
}
