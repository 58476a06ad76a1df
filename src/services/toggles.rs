//! Wishlist and booking ledgers.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};

use dashmap::DashMap;
use pushkind_common::domain::auth::AuthenticatedUser;

use crate::domain::product::Product;
use crate::domain::toggle::{ToggleItem, ToggleKey, ToggleKind, ToggleOutcome};
use crate::forms::toggles::ToggleForm;
use crate::repository::{ProductReader, ToggleReader, ToggleWriter};
use crate::services::{ServiceError, ServiceResult};

/// Serializes toggles of the same ledger key within this process.
///
/// The storage layer performs each flip in one transaction; the lock keeps
/// concurrent flips of one key from contending on it.
#[derive(Debug, Default)]
pub struct ToggleLocks {
    locks: DashMap<ToggleKey, Arc<Mutex<()>>>,
}

impl ToggleLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding the lock of `key`.
    pub fn run<T>(&self, key: &ToggleKey, f: impl FnOnce() -> T) -> T {
        let lock = self.locks.entry(key.clone()).or_default().value().clone();

        let result = {
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            f()
        };

        drop(lock);
        self.locks
            .remove_if(key, |_, held| Arc::strong_count(held) == 1);

        result
    }

    /// Number of keys currently tracked.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Flip the membership of `product_id` in the shopper's `kind` ledger.
///
/// The variant in `form` is recorded only when the entry is created. A flip
/// of an existing entry removes it regardless of the submitted variant.
pub fn toggle_product<R>(
    repo: &R,
    locks: &ToggleLocks,
    user: &AuthenticatedUser,
    kind: ToggleKind,
    product_id: i32,
    form: ToggleForm,
) -> ServiceResult<ToggleOutcome>
where
    R: ProductReader + ToggleWriter + ?Sized,
{
    let snapshot = form
        .into_snapshot()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    if repo
        .get_product_by_id(product_id, user.hub_id)
        .map_err(ServiceError::from)?
        .is_none()
    {
        return Err(ServiceError::NotFound);
    }

    let key = ToggleKey::new(user.hub_id, kind, user.sub.as_str(), product_id);
    let outcome = locks
        .run(&key, || repo.toggle_entry(&key, &snapshot))
        .map_err(ServiceError::from)?;

    log::debug!(
        "{kind} entry for product {product_id} {outcome:?} by {}",
        user.sub
    );

    Ok(outcome)
}

/// Whether `product_id` is in the shopper's `kind` ledger.
pub fn is_toggled<R>(
    repo: &R,
    user: &AuthenticatedUser,
    kind: ToggleKind,
    product_id: i32,
) -> ServiceResult<bool>
where
    R: ToggleReader + ?Sized,
{
    let key = ToggleKey::new(user.hub_id, kind, user.sub.as_str(), product_id);
    repo.is_toggled(&key).map_err(ServiceError::from)
}

/// Ledger entries of the shopper, newest first, joined with current product
/// data. Entries whose product no longer exists are skipped.
pub fn list_toggle_items<R>(
    repo: &R,
    user: &AuthenticatedUser,
    kind: ToggleKind,
) -> ServiceResult<Vec<ToggleItem>>
where
    R: ProductReader + ToggleReader + ?Sized,
{
    let entries = repo
        .list_toggle_entries(user.hub_id, kind, &user.sub)
        .map_err(ServiceError::from)?;
    if entries.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i32> = entries.iter().map(|entry| entry.product_id).collect();
    let products: HashMap<i32, Product> = repo
        .get_products_by_ids(&ids, user.hub_id)
        .map_err(ServiceError::from)?
        .into_iter()
        .map(|product| (product.id, product))
        .collect();

    let booked: HashSet<i32> = match kind {
        ToggleKind::Wishlist => repo
            .list_toggle_entries(user.hub_id, ToggleKind::Booking, &user.sub)
            .map_err(ServiceError::from)?
            .into_iter()
            .map(|entry| entry.product_id)
            .collect(),
        ToggleKind::Booking => HashSet::new(),
    };

    let items = entries
        .into_iter()
        .filter_map(|entry| {
            let product = products.get(&entry.product_id)?.clone();
            Some(ToggleItem {
                entry_id: entry.id,
                is_booked: booked.contains(&entry.product_id),
                product,
                snapshot: entry.snapshot,
                created_at: entry.created_at,
            })
        })
        .collect();

    Ok(items)
}
