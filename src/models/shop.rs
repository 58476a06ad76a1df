use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::shop::{NewShop as DomainNewShop, Shop as DomainShop};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::shops)]
pub struct Shop {
    pub id: i32,
    pub hub_id: i32,
    pub name: String,
    pub town: String,
    pub is_verified: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::shops)]
pub struct NewShop<'a> {
    pub hub_id: i32,
    pub name: &'a str,
    pub town: &'a str,
    pub is_verified: bool,
}

impl From<Shop> for DomainShop {
    fn from(value: Shop) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            name: value.name,
            town: value.town,
            is_verified: value.is_verified,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewShop> for NewShop<'a> {
    fn from(value: &'a DomainNewShop) -> Self {
        Self {
            hub_id: value.hub_id,
            name: value.name.as_str(),
            town: value.town.as_str(),
            is_verified: value.is_verified,
        }
    }
}
