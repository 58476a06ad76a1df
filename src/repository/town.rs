use diesel::prelude::*;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::domain::town::{NewTown as DomainNewTown, Town as DomainTown};
use crate::models::town::{NewTown as DbNewTown, Town as DbTown};
use crate::repository::{DieselRepository, TownReader, TownWriter};

impl TownReader for DieselRepository {
    fn list_towns(&self, hub_id: i32) -> RepositoryResult<Vec<DomainTown>> {
        use crate::schema::towns;

        let mut conn = self.conn()?;
        let towns = towns::table
            .filter(towns::hub_id.eq(hub_id))
            .order(towns::name.asc())
            .load::<DbTown>(&mut conn)?;

        Ok(towns.into_iter().map(DomainTown::from).collect())
    }

    fn get_town_by_name(&self, name: &str, hub_id: i32) -> RepositoryResult<Option<DomainTown>> {
        use crate::schema::towns;

        let mut conn = self.conn()?;
        let town = towns::table
            .filter(towns::name.eq(name))
            .filter(towns::hub_id.eq(hub_id))
            .first::<DbTown>(&mut conn)
            .optional()?;

        Ok(town.map(Into::into))
    }
}

impl TownWriter for DieselRepository {
    fn create_town(&self, new_town: &DomainNewTown) -> RepositoryResult<DomainTown> {
        use crate::schema::towns;

        let mut conn = self.conn()?;
        let insertable = DbNewTown::from(new_town);

        let created = diesel::insert_into(towns::table)
            .values(&insertable)
            .get_result::<DbTown>(&mut conn)?;

        Ok(created.into())
    }

    fn delete_town(&self, town_id: i32, hub_id: i32) -> RepositoryResult<()> {
        use crate::schema::towns;

        let mut conn = self.conn()?;
        let target = towns::table
            .filter(towns::id.eq(town_id))
            .filter(towns::hub_id.eq(hub_id));

        let deleted = diesel::delete(target).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
