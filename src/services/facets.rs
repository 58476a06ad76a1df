use std::collections::BTreeSet;

use dashmap::DashMap;
use pushkind_common::repository::errors::RepositoryResult;
use serde::{Deserialize, Serialize};

use crate::domain::facet::{FacetOptions, FacetValues};
use crate::domain::town::Town;
use crate::repository::{FacetReader, TownReader};

/// Facet options together with the town scope they were built for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetView {
    pub towns: BTreeSet<String>,
    pub options: FacetOptions,
    /// Set when the options come from an earlier successful load because the
    /// latest rebuild failed.
    #[serde(default)]
    pub stale: bool,
}

/// Trim, drop blanks, deduplicate and sort.
fn normalize<I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    values
        .into_iter()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Turn raw distinct values into the option lists offered to shoppers.
pub fn build_facet_options(values: FacetValues, towns: Vec<Town>) -> FacetOptions {
    let FacetValues {
        brands,
        shops,
        categories,
    } = values;

    FacetOptions {
        brands: normalize(brands.into_iter().flatten()),
        shops: normalize(shops),
        categories: normalize(categories.into_iter().flatten()),
        towns: normalize(towns.into_iter().map(|town| town.name)),
    }
}

/// Load facet options for `towns`.
///
/// Options depend on the town set only; other selected filters never narrow
/// them.
pub fn load_facet_options<R>(
    repo: &R,
    hub_id: i32,
    towns: &BTreeSet<String>,
) -> RepositoryResult<FacetView>
where
    R: FacetReader + TownReader + ?Sized,
{
    let scope: Vec<String> = towns.iter().cloned().collect();
    let values = if scope.is_empty() {
        FacetValues::default()
    } else {
        repo.list_facet_values(hub_id, &scope)?
    };
    let all_towns = repo.list_towns(hub_id)?;

    Ok(FacetView {
        towns: towns.clone(),
        options: build_facet_options(values, all_towns),
        stale: false,
    })
}

const FACET_CACHE_CAPACITY: usize = 512;

/// Last successfully built options per hub and town set.
#[derive(Debug, Default)]
pub struct FacetCache {
    entries: DashMap<(i32, BTreeSet<String>), FacetOptions>,
}

impl FacetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, hub_id: i32, towns: &BTreeSet<String>) -> Option<FacetOptions> {
        self.entries
            .get(&(hub_id, towns.clone()))
            .map(|entry| entry.value().clone())
    }

    pub fn store(&self, hub_id: i32, towns: &BTreeSet<String>, options: FacetOptions) {
        let key = (hub_id, towns.clone());
        if self.entries.len() >= FACET_CACHE_CAPACITY && !self.entries.contains_key(&key) {
            self.entries.clear();
        }
        self.entries.insert(key, options);
    }
}

/// Facet options for `towns`, never failing.
///
/// With `refresh` unset a cached build is reused when one exists. When the
/// build fails the last good options for the same scope are served and
/// flagged stale; without any the lists are empty.
pub fn facet_view<R>(
    repo: &R,
    cache: &FacetCache,
    hub_id: i32,
    towns: &BTreeSet<String>,
    refresh: bool,
) -> FacetView
where
    R: FacetReader + TownReader + ?Sized,
{
    let cached = cache.get(hub_id, towns);
    if let Some(options) = cached.as_ref().filter(|_| !refresh) {
        return FacetView {
            towns: towns.clone(),
            options: options.clone(),
            stale: false,
        };
    }

    match load_facet_options(repo, hub_id, towns) {
        Ok(view) => {
            cache.store(hub_id, towns, view.options.clone());
            view
        }
        Err(err) => {
            log::warn!("Failed to build facet options for hub {hub_id}: {err}");
            FacetView {
                towns: towns.clone(),
                options: cached.unwrap_or_default(),
                stale: true,
            }
        }
    }
}
