//! Three-layer filter state kept per shopper.
//!
//! The applied layer drives the live catalog, the draft layer collects edits
//! inside the filter panel and the persisted layer is the snapshot restored
//! when the shopper comes back to the catalog. Every transition that changes
//! the applied selection resets pagination and bumps the generation counter,
//! which lets page loads issued for an older selection be recognised and
//! dropped.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::filter::{FilterChange, FilterLayer, FilterState};

/// The applied selection cannot be committed without a town.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no town is selected and no default town is known")]
pub struct TownUnresolved;

/// Outcome of a committed transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterTransition {
    /// Generation of the applied selection after the transition.
    pub generation: u64,
    /// Whether the town set differs from the one before the transition.
    /// Facet options must be rebuilt when set.
    pub towns_changed: bool,
}

/// Serializable form of a [`FilterMachine`] as stored between requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSnapshot {
    pub applied: Option<FilterState>,
    pub draft: Option<FilterState>,
    pub persisted: Option<FilterState>,
    pub generation: u64,
}

#[derive(Debug, Clone)]
pub struct FilterMachine {
    applied: FilterState,
    draft: FilterState,
    persisted: Option<FilterState>,
    generation: u64,
    default_town: Option<String>,
}

impl FilterMachine {
    /// Rebuild the machine from stored layers.
    ///
    /// The working applied layer wins, then the persisted snapshot, then the
    /// default town alone. A selection without towns picks up the default
    /// town once it is known.
    pub fn restore(snapshot: FilterSnapshot, default_town: Option<String>) -> Self {
        let default_town = default_town
            .map(|town| town.trim().to_string())
            .filter(|town| !town.is_empty());

        let FilterSnapshot {
            applied,
            draft,
            persisted,
            generation,
        } = snapshot;

        let mut applied = applied
            .or_else(|| persisted.clone())
            .unwrap_or_default();
        if applied.towns.is_empty() {
            applied.towns.extend(default_town.iter().cloned());
        }
        let draft = draft.unwrap_or_else(|| applied.clone());

        Self {
            applied,
            draft,
            persisted,
            generation,
            default_town,
        }
    }

    pub fn snapshot(&self) -> FilterSnapshot {
        FilterSnapshot {
            applied: Some(self.applied.clone()),
            draft: Some(self.draft.clone()),
            persisted: self.persisted.clone(),
            generation: self.generation,
        }
    }

    pub fn applied(&self) -> &FilterState {
        &self.applied
    }

    pub fn draft(&self) -> &FilterState {
        &self.draft
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn default_town(&self) -> Option<&str> {
        self.default_town.as_deref()
    }

    /// Whether the applied selection is scoped to at least one town.
    pub fn is_resolved(&self) -> bool {
        !self.applied.towns.is_empty()
    }

    pub fn state(&self, layer: FilterLayer) -> Option<&FilterState> {
        match layer {
            FilterLayer::Applied => Some(&self.applied),
            FilterLayer::Draft => Some(&self.draft),
            FilterLayer::Persisted => self.persisted.as_ref(),
        }
    }

    /// Start a fresh catalog visit from the persisted snapshot.
    pub fn reenter(&mut self) -> FilterTransition {
        let previous = self.applied.towns.clone();
        let mut next = match (&self.persisted, &self.default_town) {
            (Some(persisted), _) => persisted.clone(),
            (None, Some(town)) => FilterState::for_town(town.clone()),
            (None, None) => FilterState::default(),
        };
        if next.towns.is_empty() {
            next.towns.extend(self.default_town.iter().cloned());
        }
        next.page = 1;

        self.applied = next;
        self.draft = self.applied.clone();
        self.generation += 1;

        FilterTransition {
            generation: self.generation,
            towns_changed: previous != self.applied.towns,
        }
    }

    /// Copy the applied selection into the draft.
    pub fn open_filter_panel(&mut self) -> &FilterState {
        self.draft = self.applied.clone();
        &self.draft
    }

    /// Edit one draft dimension. The applied selection is untouched.
    pub fn set_draft(&mut self, change: FilterChange) -> &FilterState {
        self.draft.set(change);
        &self.draft
    }

    /// Commit the draft as the new applied selection.
    pub fn apply_filters(&mut self) -> Result<FilterTransition, TownUnresolved> {
        let next = self.draft.clone();
        self.commit(next, true)
    }

    /// Change one dimension of the applied selection without the panel.
    pub fn apply_direct(&mut self, change: FilterChange) -> Result<FilterTransition, TownUnresolved> {
        let mut next = self.applied.clone();
        next.set(change);
        self.commit(next, false)
    }

    /// Reset every layer to the default town alone.
    pub fn clear_all(&mut self) -> Result<FilterTransition, TownUnresolved> {
        let town = self.default_town.clone().ok_or(TownUnresolved)?;
        let previous = std::mem::take(&mut self.applied.towns);

        self.applied = FilterState::for_town(town);
        self.draft = self.applied.clone();
        self.persisted = Some(self.applied.clone());
        self.generation += 1;

        Ok(FilterTransition {
            generation: self.generation,
            towns_changed: previous != self.applied.towns,
        })
    }

    /// Scope the catalog to `town` and remember it as the default.
    pub fn switch_town(&mut self, town: impl Into<String>) -> Result<FilterTransition, TownUnresolved> {
        let town = town.into().trim().to_string();
        if town.is_empty() {
            return Err(TownUnresolved);
        }
        self.default_town = Some(town.clone());

        let mut next = self.applied.clone();
        next.towns.clear();
        next.towns.insert(town);
        self.commit(next, true)
    }

    /// Move the applied selection to the following page. The generation is
    /// unchanged.
    pub fn advance_page(&mut self) -> usize {
        self.applied.page += 1;
        self.applied.page
    }

    fn commit(&mut self, mut next: FilterState, sync_draft: bool) -> Result<FilterTransition, TownUnresolved> {
        if next.towns.is_empty() {
            let town = self.default_town.clone().ok_or(TownUnresolved)?;
            next.towns.insert(town);
        }

        let towns_changed = next.towns != self.applied.towns;
        if towns_changed {
            // Shops belong to towns; a new town scope invalidates the pick.
            next.shops.clear();
            self.draft.shops.clear();
        }
        next.page = 1;

        self.applied = next;
        self.persisted = Some(self.applied.clone());
        if sync_draft {
            self.draft = self.applied.clone();
        }
        self.generation += 1;

        Ok(FilterTransition {
            generation: self.generation,
            towns_changed,
        })
    }
}
