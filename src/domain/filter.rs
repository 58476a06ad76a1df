use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a wire value does not name a known filter option.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} `{value}`")]
pub struct UnknownFilterValue {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownFilterValue {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Ordering applied to the catalog result set.
///
/// Every ordering is completed with the product id ascending so repeated
/// queries page through identical sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortKey {
    /// Highest rated first.
    #[default]
    #[serde(rename = "rating")]
    RatingDesc,
    /// Most recently created first.
    #[serde(rename = "createdAt")]
    NewestFirst,
    /// Cheapest first.
    #[serde(rename = "price")]
    PriceAsc,
    /// Most expensive first.
    #[serde(rename = "-price")]
    PriceDesc,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::RatingDesc => "rating",
            SortKey::NewestFirst => "createdAt",
            SortKey::PriceAsc => "price",
            SortKey::PriceDesc => "-price",
        }
    }
}

impl FromStr for SortKey {
    type Err = UnknownFilterValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "rating" => Ok(SortKey::RatingDesc),
            "createdAt" => Ok(SortKey::NewestFirst),
            "price" => Ok(SortKey::PriceAsc),
            "-price" => Ok(SortKey::PriceDesc),
            other => Err(UnknownFilterValue::new("sort order", other)),
        }
    }
}

/// Top-level category tab shown above the catalog.
///
/// A tab narrows the catalog to exactly one product category and is
/// independent from the multi-select categories facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryTab {
    Men,
    Women,
    Kids,
    Home,
    Beauty,
    Footwear,
    Accessories,
    Sports,
    Electronics,
}

impl CategoryTab {
    /// Tab identifier used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryTab::Men => "men",
            CategoryTab::Women => "women",
            CategoryTab::Kids => "kids",
            CategoryTab::Home => "home",
            CategoryTab::Beauty => "beauty",
            CategoryTab::Footwear => "footwear",
            CategoryTab::Accessories => "accessories",
            CategoryTab::Sports => "sports",
            CategoryTab::Electronics => "electronics",
        }
    }

    /// Product category name matched by this tab.
    pub fn category_name(&self) -> &'static str {
        match self {
            CategoryTab::Men => "Men's Clothing",
            CategoryTab::Women => "Women's Clothing",
            CategoryTab::Kids => "Kids Clothing",
            CategoryTab::Home => "Home & Living",
            CategoryTab::Beauty => "Beauty & Personal Care",
            CategoryTab::Footwear => "Footwear",
            CategoryTab::Accessories => "Accessories",
            CategoryTab::Sports => "Sports & Fitness",
            CategoryTab::Electronics => "Electronics",
        }
    }

    /// Parse a tab identifier, treating `all` and blank input as "no tab".
    pub fn parse(value: &str) -> Result<Option<Self>, UnknownFilterValue> {
        let tab = match value.trim().to_lowercase().as_str() {
            "" | "all" => return Ok(None),
            "men" => CategoryTab::Men,
            "women" => CategoryTab::Women,
            "kids" => CategoryTab::Kids,
            "home" => CategoryTab::Home,
            "beauty" => CategoryTab::Beauty,
            "footwear" => CategoryTab::Footwear,
            "accessories" => CategoryTab::Accessories,
            "sports" => CategoryTab::Sports,
            "electronics" => CategoryTab::Electronics,
            _ => return Err(UnknownFilterValue::new("category tab", value)),
        };
        Ok(Some(tab))
    }
}

/// Named price band offered by the filter panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PriceBucket {
    #[serde(rename = "0-500")]
    UpTo500,
    #[serde(rename = "501-1000")]
    From501To1000,
    #[serde(rename = "1001-1500")]
    From1001To1500,
    #[serde(rename = "1501-2000")]
    From1501To2000,
    #[serde(rename = "2001-3000")]
    From2001To3000,
    #[serde(rename = "3000+")]
    Above3000,
}

impl PriceBucket {
    pub const ALL: [PriceBucket; 6] = [
        PriceBucket::UpTo500,
        PriceBucket::From501To1000,
        PriceBucket::From1001To1500,
        PriceBucket::From1501To2000,
        PriceBucket::From2001To3000,
        PriceBucket::Above3000,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PriceBucket::UpTo500 => "0-500",
            PriceBucket::From501To1000 => "501-1000",
            PriceBucket::From1001To1500 => "1001-1500",
            PriceBucket::From1501To2000 => "1501-2000",
            PriceBucket::From2001To3000 => "2001-3000",
            PriceBucket::Above3000 => "3000+",
        }
    }

    /// Inclusive lower bound and optional inclusive upper bound of the band.
    pub fn bounds(&self) -> (i64, Option<i64>) {
        match self {
            PriceBucket::UpTo500 => (0, Some(500)),
            PriceBucket::From501To1000 => (501, Some(1000)),
            PriceBucket::From1001To1500 => (1001, Some(1500)),
            PriceBucket::From1501To2000 => (1501, Some(2000)),
            PriceBucket::From2001To3000 => (2001, Some(3000)),
            PriceBucket::Above3000 => (3000, None),
        }
    }
}

impl fmt::Display for PriceBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PriceBucket {
    type Err = UnknownFilterValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        PriceBucket::ALL
            .into_iter()
            .find(|bucket| bucket.label() == trimmed)
            .ok_or_else(|| UnknownFilterValue::new("price range", value))
    }
}

/// Shopper-entered price bounds. Either side may be left open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CustomPrice {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl CustomPrice {
    /// Whether the shopper entered at least one bound.
    pub fn is_set(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }
}

/// Inclusive price interval applied to the catalog query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBounds {
    pub min: i64,
    /// `None` means unbounded above.
    pub max: Option<i64>,
}

impl PriceBounds {
    pub fn contains(&self, price: i64) -> bool {
        price >= self.min && self.max.is_none_or(|max| price <= max)
    }
}

/// One of the three filter layers kept per shopper session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterLayer {
    /// Filters driving the live result set.
    Applied,
    /// In-progress edits inside the filter panel.
    Draft,
    /// Snapshot remembered across catalog visits.
    Persisted,
}

impl FromStr for FilterLayer {
    type Err = UnknownFilterValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "applied" => Ok(FilterLayer::Applied),
            "draft" => Ok(FilterLayer::Draft),
            "persisted" => Ok(FilterLayer::Persisted),
            other => Err(UnknownFilterValue::new("filter layer", other)),
        }
    }
}

/// Mutation of a single filter dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "dimension", content = "value", rename_all = "snake_case")]
pub enum FilterChange {
    Search(Option<String>),
    Category(Option<CategoryTab>),
    Categories(BTreeSet<String>),
    Brands(BTreeSet<String>),
    Shops(BTreeSet<String>),
    Towns(BTreeSet<String>),
    PriceRanges(BTreeSet<PriceBucket>),
    MinPrice(Option<i64>),
    MaxPrice(Option<i64>),
    Sort(SortKey),
}

/// Complete filter selection of a shopper.
///
/// Multi-select dimensions are OR-ed internally and AND-ed with each other.
/// An empty set places no restriction on its dimension, except `towns`,
/// which must hold at least one town before the catalog can be queried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    /// Free text matched against product names.
    pub search: Option<String>,
    /// Selected category tab.
    pub category: Option<CategoryTab>,
    /// Categories picked in the filter panel.
    pub categories: BTreeSet<String>,
    pub brands: BTreeSet<String>,
    /// Shop names. Only meaningful within the current town set.
    pub shops: BTreeSet<String>,
    pub towns: BTreeSet<String>,
    pub price_ranges: BTreeSet<PriceBucket>,
    /// Custom bounds win over `price_ranges` whenever either side is set.
    pub custom_price: CustomPrice,
    pub sort: SortKey,
    /// 1-based page of the result set.
    pub page: usize,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search: None,
            category: None,
            categories: BTreeSet::new(),
            brands: BTreeSet::new(),
            shops: BTreeSet::new(),
            towns: BTreeSet::new(),
            price_ranges: BTreeSet::new(),
            custom_price: CustomPrice::default(),
            sort: SortKey::default(),
            page: 1,
        }
    }
}

impl FilterState {
    /// Default selection: a single town and nothing else.
    pub fn for_town(town: impl Into<String>) -> Self {
        let mut state = Self::default();
        state.towns.insert(town.into());
        state
    }

    /// Whether anything beyond the town scope and default sort is selected.
    pub fn has_active_filters(&self) -> bool {
        self.search.is_some()
            || self.category.is_some()
            || !self.categories.is_empty()
            || !self.brands.is_empty()
            || !self.shops.is_empty()
            || !self.price_ranges.is_empty()
            || self.custom_price.is_set()
            || self.sort != SortKey::default()
    }

    /// Compare two selections ignoring the page number.
    pub fn same_selection(&self, other: &FilterState) -> bool {
        let mut left = self.clone();
        left.page = other.page;
        &left == other
    }

    /// Overwrite one dimension. Does not touch `page`.
    pub fn set(&mut self, change: FilterChange) {
        match change {
            FilterChange::Search(term) => self.search = term,
            FilterChange::Category(tab) => self.category = tab,
            FilterChange::Categories(values) => self.categories = values,
            FilterChange::Brands(values) => self.brands = values,
            FilterChange::Shops(values) => self.shops = values,
            FilterChange::Towns(values) => self.towns = values,
            FilterChange::PriceRanges(values) => self.price_ranges = values,
            FilterChange::MinPrice(min) => self.custom_price.min = min,
            FilterChange::MaxPrice(max) => self.custom_price.max = max,
            FilterChange::Sort(sort) => self.sort = sort,
        }
    }
}
