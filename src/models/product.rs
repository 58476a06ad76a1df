use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::product::{NewProduct as DomainNewProduct, Product as DomainProduct};
use crate::models::shop::Shop;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(belongs_to(Shop))]
#[diesel(table_name = crate::schema::products)]
pub struct Product {
    pub id: i32,
    pub hub_id: i32,
    pub shop_id: i32,
    pub name: String,
    /// Lowercased `name`; SQLite `LIKE` only folds ASCII.
    pub search_name: String,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub price: i64,
    pub original_price: Option<i64>,
    pub image_url: Option<String>,
    pub rating: f64,
    pub review_count: i32,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct<'a> {
    pub hub_id: i32,
    pub shop_id: i32,
    pub name: &'a str,
    pub search_name: String,
    pub brand: Option<&'a str>,
    pub category: Option<&'a str>,
    pub price: i64,
    pub original_price: Option<i64>,
    pub image_url: Option<&'a str>,
    pub rating: f64,
    pub review_count: i32,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<(Product, Shop)> for DomainProduct {
    fn from((product, shop): (Product, Shop)) -> Self {
        Self {
            id: product.id,
            hub_id: product.hub_id,
            shop_id: product.shop_id,
            shop_name: shop.name,
            town: shop.town,
            name: product.name,
            brand: product.brand,
            category: product.category,
            price: product.price,
            original_price: product.original_price,
            image_url: product.image_url,
            rating: product.rating,
            review_count: product.review_count,
            is_active: product.is_active,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewProduct> for NewProduct<'a> {
    fn from(value: &'a DomainNewProduct) -> Self {
        Self {
            hub_id: value.hub_id,
            shop_id: value.shop_id,
            name: value.name.as_str(),
            search_name: value.name.to_lowercase(),
            brand: value.brand.as_deref(),
            category: value.category.as_deref(),
            price: value.price,
            original_price: value.original_price,
            image_url: value.image_url.as_deref(),
            rating: value.rating,
            review_count: value.review_count,
            is_active: value.is_active,
            created_at: value.created_at,
            updated_at: value.created_at,
        }
    }
}
