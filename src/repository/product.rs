use diesel::dsl::{InnerJoin, IntoBoxed};
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use pushkind_common::repository::errors::RepositoryResult;

use crate::{
    domain::filter::SortKey,
    domain::product::{NewProduct as DomainNewProduct, Product as DomainProduct, ProductListQuery},
    models::product::{NewProduct as DbNewProduct, Product as DbProduct},
    models::shop::Shop as DbShop,
    repository::{DieselRepository, ProductReader, ProductWriter},
    schema::{products, shops},
};

type CatalogQuery = IntoBoxed<'static, InnerJoin<products::table, shops::table>, Sqlite>;

/// Build the filtered product ⋈ shop query shared by the count and the page.
fn catalog_query(query: &ProductListQuery) -> CatalogQuery {
    let mut items = products::table
        .inner_join(shops::table)
        .filter(products::hub_id.eq(query.hub_id))
        .filter(products::is_active.eq(true))
        .filter(shops::town.eq_any(query.towns.clone()))
        .into_boxed::<Sqlite>();

    if !query.brands.is_empty() {
        items = items.filter(products::brand.eq_any(query.brands.clone()));
    }

    if !query.shops.is_empty() {
        items = items.filter(shops::name.eq_any(query.shops.clone()));
    }

    if !query.categories.is_empty() {
        items = items.filter(products::category.eq_any(query.categories.clone()));
    }

    if let Some(category) = query.category.as_ref() {
        items = items.filter(products::category.eq(category.clone()));
    }

    if let Some(bounds) = query.price {
        items = items.filter(products::price.ge(bounds.min));
        if let Some(max) = bounds.max {
            items = items.filter(products::price.le(max));
        }
    }

    if let Some(term) = query.search.as_ref() {
        // Both sides are lowercased in Rust; SQLite LIKE folds ASCII only.
        let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
        items = items.filter(products::search_name.like(pattern).escape('\\'));
    }

    items
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

impl ProductReader for DieselRepository {
    fn get_product_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<DomainProduct>> {
        let mut conn = self.conn()?;
        let product = products::table
            .inner_join(shops::table)
            .filter(products::id.eq(id))
            .filter(products::hub_id.eq(hub_id))
            .first::<(DbProduct, DbShop)>(&mut conn)
            .optional()?;

        Ok(product.map(DomainProduct::from))
    }

    fn get_products_by_ids(
        &self,
        ids: &[i32],
        hub_id: i32,
    ) -> RepositoryResult<Vec<DomainProduct>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.conn()?;
        let rows = products::table
            .inner_join(shops::table)
            .filter(products::hub_id.eq(hub_id))
            .filter(products::id.eq_any(ids.to_vec()))
            .load::<(DbProduct, DbShop)>(&mut conn)?;

        Ok(rows.into_iter().map(DomainProduct::from).collect())
    }

    fn list_products(
        &self,
        query: ProductListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainProduct>)> {
        let mut conn = self.conn()?;

        let total = catalog_query(&query)
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let mut items = catalog_query(&query);

        items = match query.sort {
            SortKey::RatingDesc => items.order((products::rating.desc(), products::id.asc())),
            SortKey::NewestFirst => {
                items.order((products::created_at.desc(), products::id.asc()))
            }
            SortKey::PriceAsc => items.order((products::price.asc(), products::id.asc())),
            SortKey::PriceDesc => items.order((products::price.desc(), products::id.asc())),
        };

        if let Some(pagination) = &query.pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            let limit = pagination.per_page as i64;
            items = items.offset(offset).limit(limit);
        }

        let rows = items.load::<(DbProduct, DbShop)>(&mut conn)?;

        Ok((total, rows.into_iter().map(DomainProduct::from).collect()))
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(&self, new_product: &DomainNewProduct) -> RepositoryResult<DomainProduct> {
        let mut conn = self.conn()?;
        let db_new = DbNewProduct::from(new_product);

        let created = diesel::insert_into(products::table)
            .values(&db_new)
            .get_result::<DbProduct>(&mut conn)?;

        let shop = shops::table
            .find(created.shop_id)
            .first::<DbShop>(&mut conn)?;

        Ok(DomainProduct::from((created, shop)))
    }
}
