use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::town::{NewTown as DomainNewTown, Town as DomainTown};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::towns)]
pub struct Town {
    pub id: i32,
    pub hub_id: i32,
    pub name: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::towns)]
pub struct NewTown<'a> {
    pub hub_id: i32,
    pub name: &'a str,
    pub updated_at: NaiveDateTime,
}

impl From<Town> for DomainTown {
    fn from(value: Town) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            name: value.name,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewTown> for NewTown<'a> {
    fn from(value: &'a DomainNewTown) -> Self {
        Self {
            hub_id: value.hub_id,
            name: value.name.as_str(),
            updated_at: value.updated_at,
        }
    }
}
