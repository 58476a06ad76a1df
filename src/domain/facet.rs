use serde::{Deserialize, Serialize};

/// Distinct raw values read from the catalog for one town scope.
///
/// Values come straight from storage and may contain blanks or repeats.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FacetValues {
    pub brands: Vec<Option<String>>,
    pub shops: Vec<String>,
    pub categories: Vec<Option<String>>,
}

/// Filter dimension that offers a list of options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacetDimension {
    Brands,
    Shops,
    Categories,
    Towns,
}

/// Option lists offered by the filter panel.
///
/// Brand, shop and category lists are scoped to the town set only, never to
/// sibling selections. Every list is sorted and free of duplicates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FacetOptions {
    pub brands: Vec<String>,
    pub shops: Vec<String>,
    pub categories: Vec<String>,
    /// All towns of the hub, offered for town switching.
    pub towns: Vec<String>,
}

impl FacetOptions {
    pub fn options(&self, dimension: FacetDimension) -> &[String] {
        match dimension {
            FacetDimension::Brands => &self.brands,
            FacetDimension::Shops => &self.shops,
            FacetDimension::Categories => &self.categories,
            FacetDimension::Towns => &self.towns,
        }
    }

    /// Options of `dimension` containing `term`, ignoring case.
    pub fn matching(&self, dimension: FacetDimension, term: &str) -> Vec<&str> {
        let needle = term.trim().to_lowercase();
        self.options(dimension)
            .iter()
            .filter(|option| needle.is_empty() || option.to_lowercase().contains(&needle))
            .map(String::as_str)
            .collect()
    }

    /// Copy of the options with the `dimension` list narrowed to `term`.
    pub fn narrowed(&self, dimension: FacetDimension, term: &str) -> FacetOptions {
        let matching: Vec<String> = self
            .matching(dimension, term)
            .into_iter()
            .map(str::to_string)
            .collect();

        let mut options = self.clone();
        match dimension {
            FacetDimension::Brands => options.brands = matching,
            FacetDimension::Shops => options.shops = matching,
            FacetDimension::Categories => options.categories = matching,
            FacetDimension::Towns => options.towns = matching,
        }
        options
    }
}
