use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::toggle::{
    ToggleEntry as DomainToggleEntry, ToggleKey, ToggleKind, VariantSnapshot,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::toggle_entries)]
pub struct ToggleEntry {
    pub id: i32,
    pub hub_id: i32,
    pub kind: String,
    pub user_sub: String,
    pub product_id: i32,
    pub size: Option<String>,
    pub variant: Option<String>,
    pub color: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::toggle_entries)]
pub struct NewToggleEntry<'a> {
    pub hub_id: i32,
    pub kind: &'a str,
    pub user_sub: &'a str,
    pub product_id: i32,
    pub size: Option<&'a str>,
    pub variant: Option<&'a str>,
    pub color: Option<&'a str>,
}

impl<'a> NewToggleEntry<'a> {
    pub fn new(key: &'a ToggleKey, snapshot: &'a VariantSnapshot) -> Self {
        Self {
            hub_id: key.hub_id,
            kind: key.kind.as_str(),
            user_sub: key.user_sub.as_str(),
            product_id: key.product_id,
            size: snapshot.size.as_deref(),
            variant: snapshot.variant.as_deref(),
            color: snapshot.color.as_deref(),
        }
    }
}

impl ToggleEntry {
    /// Convert a row loaded from the ledger of `kind`.
    ///
    /// Rows are always read filtered by kind, so the stored text is not
    /// parsed again.
    pub fn into_domain(self, kind: ToggleKind) -> DomainToggleEntry {
        DomainToggleEntry {
            id: self.id,
            hub_id: self.hub_id,
            kind,
            user_sub: self.user_sub,
            product_id: self.product_id,
            snapshot: VariantSnapshot {
                size: self.size,
                variant: self.variant,
                color: self.color,
            },
            created_at: self.created_at,
        }
    }
}
