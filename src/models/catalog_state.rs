use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::catalog_state::CatalogStateScope;

#[derive(Insertable)]
#[diesel(table_name = crate::schema::catalog_sessions)]
pub struct NewCatalogState<'a> {
    pub hub_id: i32,
    pub user_sub: &'a str,
    pub state_key: &'a str,
    pub state_value: &'a str,
    pub updated_at: NaiveDateTime,
}

impl<'a> NewCatalogState<'a> {
    pub fn new(
        scope: &'a CatalogStateScope,
        key: &'a str,
        value: &'a str,
        updated_at: NaiveDateTime,
    ) -> Self {
        Self {
            hub_id: scope.hub_id,
            user_sub: scope.user_sub.as_str(),
            state_key: key,
            state_value: value,
            updated_at,
        }
    }
}
