use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Admin-managed town. Names are unique per hub and compared case-sensitively.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Town {
    pub id: i32,
    pub hub_id: i32,
    pub name: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Payload required to add a town to a hub.
#[derive(Debug, Clone)]
pub struct NewTown {
    pub hub_id: i32,
    pub name: String,
    pub updated_at: NaiveDateTime,
}

impl NewTown {
    pub fn new(hub_id: i32, name: impl Into<String>) -> Self {
        Self {
            hub_id,
            name: name.into(),
            updated_at: Local::now().naive_utc(),
        }
    }
}
