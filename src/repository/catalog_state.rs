use diesel::prelude::*;
use pushkind_common::repository::errors::RepositoryResult;

use crate::domain::catalog_state::CatalogStateScope;
use crate::models::catalog_state::NewCatalogState;
use crate::repository::{CatalogStateReader, CatalogStateWriter, DieselRepository};

impl CatalogStateReader for DieselRepository {
    fn get_catalog_state(
        &self,
        scope: &CatalogStateScope,
        key: &str,
    ) -> RepositoryResult<Option<String>> {
        use crate::schema::catalog_sessions;

        let mut conn = self.conn()?;
        let value = catalog_sessions::table
            .filter(catalog_sessions::hub_id.eq(scope.hub_id))
            .filter(catalog_sessions::user_sub.eq(scope.user_sub.as_str()))
            .filter(catalog_sessions::state_key.eq(key))
            .select(catalog_sessions::state_value)
            .first::<String>(&mut conn)
            .optional()?;

        Ok(value)
    }
}

impl CatalogStateWriter for DieselRepository {
    fn put_catalog_state(
        &self,
        scope: &CatalogStateScope,
        key: &str,
        value: &str,
    ) -> RepositoryResult<()> {
        use crate::schema::catalog_sessions;

        let mut conn = self.conn()?;
        let now = chrono::Local::now().naive_utc();

        diesel::insert_into(catalog_sessions::table)
            .values(NewCatalogState::new(scope, key, value, now))
            .on_conflict((
                catalog_sessions::hub_id,
                catalog_sessions::user_sub,
                catalog_sessions::state_key,
            ))
            .do_update()
            .set((
                catalog_sessions::state_value.eq(value),
                catalog_sessions::updated_at.eq(now),
            ))
            .execute(&mut conn)?;

        Ok(())
    }

    fn delete_catalog_state(&self, scope: &CatalogStateScope, key: &str) -> RepositoryResult<()> {
        use crate::schema::catalog_sessions;

        let mut conn = self.conn()?;
        let target = catalog_sessions::table
            .filter(catalog_sessions::hub_id.eq(scope.hub_id))
            .filter(catalog_sessions::user_sub.eq(scope.user_sub.as_str()))
            .filter(catalog_sessions::state_key.eq(key));

        diesel::delete(target).execute(&mut conn)?;

        Ok(())
    }
}
