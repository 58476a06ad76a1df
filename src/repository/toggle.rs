use diesel::dsl::{exists, select};
use diesel::prelude::*;
use pushkind_common::repository::errors::RepositoryResult;

use crate::domain::toggle::{
    ToggleEntry as DomainToggleEntry, ToggleKey, ToggleKind, ToggleOutcome, VariantSnapshot,
};
use crate::models::toggle_entry::{NewToggleEntry, ToggleEntry as DbToggleEntry};
use crate::repository::{DieselRepository, ToggleReader, ToggleWriter};

impl ToggleReader for DieselRepository {
    fn list_toggle_entries(
        &self,
        hub_id: i32,
        kind: ToggleKind,
        user_sub: &str,
    ) -> RepositoryResult<Vec<DomainToggleEntry>> {
        use crate::schema::toggle_entries;

        let mut conn = self.conn()?;
        let rows = toggle_entries::table
            .filter(toggle_entries::hub_id.eq(hub_id))
            .filter(toggle_entries::kind.eq(kind.as_str()))
            .filter(toggle_entries::user_sub.eq(user_sub))
            .order((toggle_entries::created_at.desc(), toggle_entries::id.desc()))
            .load::<DbToggleEntry>(&mut conn)?;

        Ok(rows.into_iter().map(|row| row.into_domain(kind)).collect())
    }

    fn is_toggled(&self, key: &ToggleKey) -> RepositoryResult<bool> {
        use crate::schema::toggle_entries;

        let mut conn = self.conn()?;
        let found = select(exists(
            toggle_entries::table
                .filter(toggle_entries::hub_id.eq(key.hub_id))
                .filter(toggle_entries::kind.eq(key.kind.as_str()))
                .filter(toggle_entries::user_sub.eq(key.user_sub.as_str()))
                .filter(toggle_entries::product_id.eq(key.product_id)),
        ))
        .get_result::<bool>(&mut conn)?;

        Ok(found)
    }
}

impl ToggleWriter for DieselRepository {
    fn toggle_entry(
        &self,
        key: &ToggleKey,
        snapshot: &VariantSnapshot,
    ) -> RepositoryResult<ToggleOutcome> {
        use crate::schema::toggle_entries;

        let mut conn = self.conn()?;

        // IMMEDIATE takes the write lock up front so a concurrent flip of the
        // same key cannot read the same "absent" state.
        let outcome = conn.immediate_transaction::<_, diesel::result::Error, _>(|conn| {
            let target = toggle_entries::table
                .filter(toggle_entries::hub_id.eq(key.hub_id))
                .filter(toggle_entries::kind.eq(key.kind.as_str()))
                .filter(toggle_entries::user_sub.eq(key.user_sub.as_str()))
                .filter(toggle_entries::product_id.eq(key.product_id));

            if diesel::delete(target).execute(conn)? > 0 {
                return Ok(ToggleOutcome::Removed);
            }

            diesel::insert_into(toggle_entries::table)
                .values(NewToggleEntry::new(key, snapshot))
                .execute(conn)?;

            Ok(ToggleOutcome::Added)
        })?;

        Ok(outcome)
    }
}
