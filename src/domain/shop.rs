use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A merchant's storefront. Shops belong to exactly one town.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Shop {
    pub id: i32,
    pub hub_id: i32,
    pub name: String,
    /// Town the shop trades in. Products inherit it.
    pub town: String,
    pub is_verified: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Payload required to register a shop.
#[derive(Debug, Clone)]
pub struct NewShop {
    pub hub_id: i32,
    pub name: String,
    pub town: String,
    pub is_verified: bool,
}

impl NewShop {
    pub fn new(hub_id: i32, name: impl Into<String>, town: impl Into<String>) -> Self {
        Self {
            hub_id,
            name: name.into(),
            town: town.into(),
            is_verified: false,
        }
    }

    pub fn verified(mut self) -> Self {
        self.is_verified = true;
        self
    }
}
