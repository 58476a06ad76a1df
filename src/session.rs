//! Per-shopper key-value persistence used by the catalog filter engine.
//!
//! The web service keeps the values in the database through [`StoredSession`]
//! so the cookie only carries the identity. Embedders and tests can use
//! [`MemorySessionStore`].

use dashmap::DashMap;
use pushkind_common::domain::auth::AuthenticatedUser;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::domain::catalog_state::CatalogStateScope;
use crate::repository::{CatalogStateReader, CatalogStateWriter};

/// Errors raised by a [`SessionStore`].
#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("failed to read session value `{key}`: {message}")]
    Read { key: String, message: String },
    #[error("failed to write session value `{key}`: {message}")]
    Write { key: String, message: String },
    #[error("malformed session value: {0}")]
    Decode(#[from] serde_json::Error),
}

/// String key-value storage scoped to one shopper session.
pub trait SessionStore {
    fn load_value(&self, key: &str) -> Result<Option<String>, SessionStoreError>;
    fn save_value(&self, key: &str, value: String) -> Result<(), SessionStoreError>;
    fn remove_value(&self, key: &str);
}

/// Session values of one shopper kept in the catalog state repository.
pub struct StoredSession<'a, R: ?Sized> {
    repo: &'a R,
    scope: CatalogStateScope,
}

impl<'a, R: ?Sized> StoredSession<'a, R> {
    pub fn new(repo: &'a R, user: &AuthenticatedUser) -> Self {
        Self {
            repo,
            scope: CatalogStateScope::from(user),
        }
    }
}

impl<R> SessionStore for StoredSession<'_, R>
where
    R: CatalogStateReader + CatalogStateWriter + ?Sized,
{
    fn load_value(&self, key: &str) -> Result<Option<String>, SessionStoreError> {
        self.repo
            .get_catalog_state(&self.scope, key)
            .map_err(|err| SessionStoreError::Read {
                key: key.to_string(),
                message: err.to_string(),
            })
    }

    fn save_value(&self, key: &str, value: String) -> Result<(), SessionStoreError> {
        self.repo
            .put_catalog_state(&self.scope, key, &value)
            .map_err(|err| SessionStoreError::Write {
                key: key.to_string(),
                message: err.to_string(),
            })
    }

    fn remove_value(&self, key: &str) {
        if let Err(err) = self.repo.delete_catalog_state(&self.scope, key) {
            log::warn!("Failed to remove session value {key}: {err}");
        }
    }
}

/// In-process session storage.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    values: DashMap<String, String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }
}

impl SessionStore for MemorySessionStore {
    fn load_value(&self, key: &str) -> Result<Option<String>, SessionStoreError> {
        Ok(self.values.get(key).map(|value| value.clone()))
    }

    fn save_value(&self, key: &str, value: String) -> Result<(), SessionStoreError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn remove_value(&self, key: &str) {
        self.values.remove(key);
    }
}

/// Read and decode a JSON value stored under `key`.
pub fn load_json<T, S>(store: &S, key: &str) -> Result<Option<T>, SessionStoreError>
where
    T: DeserializeOwned,
    S: SessionStore + ?Sized,
{
    match store.load_value(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Encode `value` as JSON and store it under `key`.
pub fn save_json<T, S>(store: &S, key: &str, value: &T) -> Result<(), SessionStoreError>
where
    T: Serialize + ?Sized,
    S: SessionStore + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    store.save_value(key, raw)
}
