use std::collections::BTreeSet;

use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::facet::FacetDimension;
use crate::domain::filter::{
    CategoryTab, FilterChange, PriceBucket, SortKey, UnknownFilterValue,
};
use crate::forms::{sanitize_inline_text, sanitize_optional};

/// Maximum accepted length of a search phrase.
const SEARCH_MAX_LEN: u64 = 128;
/// Maximum number of values selected in one multi-select dimension.
const SELECTION_MAX_LEN: u64 = 100;

pub type CatalogFormResult<T> = Result<T, CatalogFormError>;

/// Errors raised while reading catalog filter input.
#[derive(Debug, Error)]
pub enum CatalogFormError {
    #[error(transparent)]
    UnknownValue(#[from] UnknownFilterValue),
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
}

/// Price bound as sent by clients: a number or the raw text of an input box.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    Number(i64),
    Text(String),
}

impl PriceInput {
    /// Text that is not a whole number leaves the bound unset.
    fn into_bound(self) -> Option<i64> {
        match self {
            PriceInput::Number(value) => Some(value),
            PriceInput::Text(text) => text.trim().parse().ok(),
        }
    }
}

/// Raw single-dimension filter edit.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "dimension", content = "value", rename_all = "snake_case")]
pub enum FilterChangeForm {
    Search(Option<String>),
    Category(Option<String>),
    Categories(Vec<String>),
    Brands(Vec<String>),
    Shops(Vec<String>),
    Towns(Vec<String>),
    PriceRanges(Vec<String>),
    MinPrice(Option<PriceInput>),
    MaxPrice(Option<PriceInput>),
    Sort(String),
}

impl FilterChangeForm {
    pub fn into_change(self) -> CatalogFormResult<FilterChange> {
        let change = match self {
            FilterChangeForm::Search(term) => FilterChange::Search(sanitize_search(term)?),
            FilterChangeForm::Category(tab) => {
                let tab = match tab.as_deref() {
                    Some(value) => CategoryTab::parse(value)?,
                    None => None,
                };
                FilterChange::Category(tab)
            }
            FilterChangeForm::Categories(values) => {
                FilterChange::Categories(sanitize_selection(values)?)
            }
            FilterChangeForm::Brands(values) => FilterChange::Brands(sanitize_selection(values)?),
            FilterChangeForm::Shops(values) => FilterChange::Shops(sanitize_selection(values)?),
            FilterChangeForm::Towns(values) => FilterChange::Towns(sanitize_selection(values)?),
            FilterChangeForm::PriceRanges(values) => {
                let buckets = Selection::checked(values)?
                    .iter()
                    .map(|value| value.parse::<PriceBucket>())
                    .collect::<Result<BTreeSet<_>, _>>()?;
                FilterChange::PriceRanges(buckets)
            }
            FilterChangeForm::MinPrice(bound) => {
                FilterChange::MinPrice(bound.and_then(PriceInput::into_bound))
            }
            FilterChangeForm::MaxPrice(bound) => {
                FilterChange::MaxPrice(bound.and_then(PriceInput::into_bound))
            }
            FilterChangeForm::Sort(value) => FilterChange::Sort(value.parse::<SortKey>()?),
        };

        Ok(change)
    }
}

/// Query parameters accepted when entering the catalog.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CatalogEntryQuery {
    /// Search phrase typed outside the catalog.
    #[validate(length(max = SEARCH_MAX_LEN))]
    pub search: Option<String>,
    /// Category picked from a landing link, matched as a categories facet.
    pub category: Option<String>,
}

impl CatalogEntryQuery {
    /// Filter edits implied by the entry link. Blank parameters are ignored.
    pub fn into_changes(self) -> CatalogFormResult<Vec<FilterChange>> {
        self.validate()?;
        let mut changes = Vec::new();

        if let Some(term) = sanitize_optional(self.search.as_deref()) {
            changes.push(FilterChange::Search(Some(term)));
        }
        if let Some(category) = sanitize_optional(self.category.as_deref()) {
            changes.push(FilterChange::Categories(BTreeSet::from([category])));
        }

        Ok(changes)
    }
}

/// Parameters of the facet endpoint: `?towns=` (comma separated) and an
/// optional option search `?dimension=brands&q=ni`.
#[derive(Debug, Default, Deserialize)]
pub struct FacetsQuery {
    pub towns: Option<String>,
    pub dimension: Option<FacetDimension>,
    pub q: Option<String>,
}

impl FacetsQuery {
    /// `None` when the parameter is missing or names no town.
    pub fn towns(&self) -> Option<BTreeSet<String>> {
        let towns = sanitize_set(
            self.towns
                .as_deref()
                .unwrap_or_default()
                .split(',')
                .map(str::to_string),
        );
        (!towns.is_empty()).then_some(towns)
    }

    /// Option search, present only when both a dimension and a non-blank
    /// term are given.
    pub fn option_search(&self) -> Option<(FacetDimension, String)> {
        let term = sanitize_optional(self.q.as_deref())?;
        self.dimension.map(|dimension| (dimension, term))
    }
}

/// `?generation=` parameter of the "load more" endpoint.
#[derive(Debug, Deserialize)]
pub struct NextPageQuery {
    pub generation: u64,
}

/// Town selected in the header switcher.
#[derive(Debug, Deserialize)]
pub struct SwitchTownForm {
    pub town: String,
}

#[derive(Validate)]
struct SearchPhrase {
    #[validate(length(max = SEARCH_MAX_LEN))]
    term: Option<String>,
}

#[derive(Validate)]
struct Selection {
    #[validate(length(max = SELECTION_MAX_LEN))]
    values: Vec<String>,
}

impl Selection {
    fn checked(values: Vec<String>) -> CatalogFormResult<Vec<String>> {
        let selection = Selection { values };
        selection.validate()?;
        Ok(selection.values)
    }
}

fn sanitize_search(term: Option<String>) -> CatalogFormResult<Option<String>> {
    let phrase = SearchPhrase {
        term: sanitize_optional(term.as_deref()),
    };
    phrase.validate()?;
    Ok(phrase.term)
}

fn sanitize_selection(values: Vec<String>) -> CatalogFormResult<BTreeSet<String>> {
    Ok(sanitize_set(Selection::checked(values)?))
}

fn sanitize_set<I>(values: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = String>,
{
    values
        .into_iter()
        .map(|value| sanitize_inline_text(&value))
        .filter(|value| !value.is_empty())
        .collect()
}
