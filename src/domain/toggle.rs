use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::filter::UnknownFilterValue;
use crate::domain::product::Product;

/// The two independent per-shopper product sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleKind {
    Wishlist,
    Booking,
}

impl ToggleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToggleKind::Wishlist => "wishlist",
            ToggleKind::Booking => "booking",
        }
    }
}

impl fmt::Display for ToggleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToggleKind {
    type Err = UnknownFilterValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "wishlist" => Ok(ToggleKind::Wishlist),
            "booking" => Ok(ToggleKind::Booking),
            other => Err(UnknownFilterValue {
                kind: "ledger",
                value: other.to_string(),
            }),
        }
    }
}

/// Variant picked by the shopper when toggling. Stored as-is and never
/// re-validated against the product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantSnapshot {
    pub size: Option<String>,
    pub variant: Option<String>,
    pub color: Option<String>,
}

/// Ledger entry identity: one membership per shopper and product.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ToggleKey {
    pub hub_id: i32,
    pub kind: ToggleKind,
    pub user_sub: String,
    pub product_id: i32,
}

impl ToggleKey {
    pub fn new(hub_id: i32, kind: ToggleKind, user_sub: impl Into<String>, product_id: i32) -> Self {
        Self {
            hub_id,
            kind,
            user_sub: user_sub.into(),
            product_id,
        }
    }
}

/// Stored ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToggleEntry {
    pub id: i32,
    pub hub_id: i32,
    pub kind: ToggleKind,
    pub user_sub: String,
    pub product_id: i32,
    pub snapshot: VariantSnapshot,
    pub created_at: NaiveDateTime,
}

/// Result of flipping a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleOutcome {
    Added,
    Removed,
}

/// Ledger entry joined with the product as it is now.
#[derive(Debug, Clone, Serialize)]
pub struct ToggleItem {
    pub entry_id: i32,
    pub product: Product,
    /// Variant captured when the entry was created.
    pub snapshot: VariantSnapshot,
    /// Whether the product also sits in the booking ledger. Only filled for
    /// wishlist listings.
    pub is_booked: bool,
    pub created_at: NaiveDateTime,
}
