use chrono::NaiveDateTime;
use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Serialize};

use crate::domain::filter::{PriceBounds, SortKey};

/// Domain representation of a product listed by a shop.
///
/// `shop_name` and `town` are read through the owning shop; products have no
/// town of their own.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Product {
    /// Unique identifier of the product.
    pub id: i32,
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Identifier of the shop selling the product.
    pub shop_id: i32,
    /// Name of the owning shop.
    pub shop_name: String,
    /// Town of the owning shop.
    pub town: String,
    /// Human-readable name of the product.
    pub name: String,
    /// Optional brand label.
    pub brand: Option<String>,
    /// Optional category label.
    pub category: Option<String>,
    /// Current price as an integer amount in the catalog currency unit.
    pub price: i64,
    /// Price before discount, never lower than `price` when present.
    pub original_price: Option<i64>,
    /// Optional cover image location.
    pub image_url: Option<String>,
    /// Average rating between 0 and 5.
    pub rating: f64,
    /// Number of reviews behind `rating`.
    pub review_count: i32,
    /// Inactive products never appear in catalog queries.
    pub is_active: bool,
    /// Timestamp for when the product record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the product record.
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new product for a shop.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub hub_id: i32,
    pub shop_id: i32,
    pub name: String,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub price: i64,
    pub original_price: Option<i64>,
    pub image_url: Option<String>,
    pub rating: f64,
    pub review_count: i32,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

impl NewProduct {
    /// Build an active, unrated product payload stamped with the current time.
    pub fn new(hub_id: i32, shop_id: i32, name: impl Into<String>, price: i64) -> Self {
        let now = chrono::Local::now().naive_utc();
        Self {
            hub_id,
            shop_id,
            name: name.into(),
            brand: None,
            category: None,
            price,
            original_price: None,
            image_url: None,
            rating: 0.0,
            review_count: 0,
            is_active: true,
            created_at: now,
        }
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_original_price(mut self, original_price: i64) -> Self {
        self.original_price = Some(original_price);
        self
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    /// Attach the review summary, clamping the rating into `0.0..=5.0`.
    pub fn with_rating(mut self, rating: f64, review_count: i32) -> Self {
        self.rating = rating.clamp(0.0, 5.0);
        self.review_count = review_count.max(0);
        self
    }

    /// Override the creation timestamp (used by imports and fixtures).
    pub fn created_at(mut self, created_at: NaiveDateTime) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

/// Compiled catalog query over products joined with their shops.
///
/// Only active products are ever returned. Empty collections mean "no
/// restriction" on that dimension; `towns` is expected to be non-empty.
#[derive(Debug, Clone)]
pub struct ProductListQuery {
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Shop towns in scope.
    pub towns: Vec<String>,
    /// Accepted brands.
    pub brands: Vec<String>,
    /// Accepted shop names.
    pub shops: Vec<String>,
    /// Accepted categories from the multi-select facet.
    pub categories: Vec<String>,
    /// Exact category required by the selected tab.
    pub category: Option<String>,
    /// Inclusive price interval.
    pub price: Option<PriceBounds>,
    /// Case-insensitive substring matched against the product name.
    pub search: Option<String>,
    /// Primary ordering; ties are broken by product id.
    pub sort: SortKey,
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
}

impl ProductListQuery {
    /// Construct a query over the active products of `hub_id` in `towns`.
    pub fn new<I, S>(hub_id: i32, towns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            hub_id,
            towns: towns.into_iter().map(Into::into).collect(),
            brands: Vec::new(),
            shops: Vec::new(),
            categories: Vec::new(),
            category: None,
            price: None,
            search: None,
            sort: SortKey::default(),
            pagination: None,
        }
    }

    pub fn brands<I, S>(mut self, brands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.brands = brands.into_iter().map(Into::into).collect();
        self
    }

    pub fn shops<I, S>(mut self, shops: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.shops = shops.into_iter().map(Into::into).collect();
        self
    }

    pub fn categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Require an exact product category.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn price(mut self, bounds: PriceBounds) -> Self {
        self.price = Some(bounds);
        self
    }

    /// Filter the results by a search term applied to the product name.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
