use diesel::prelude::*;
use pushkind_common::repository::errors::RepositoryResult;

use crate::domain::facet::FacetValues;
use crate::repository::{DieselRepository, FacetReader};
use crate::schema::{products, shops};

impl FacetReader for DieselRepository {
    fn list_facet_values(&self, hub_id: i32, towns: &[String]) -> RepositoryResult<FacetValues> {
        if towns.is_empty() {
            return Ok(FacetValues::default());
        }

        let mut conn = self.conn()?;
        let towns = towns.to_vec();

        let scope = || {
            products::table
                .inner_join(shops::table)
                .filter(products::hub_id.eq(hub_id))
                .filter(products::is_active.eq(true))
                .filter(shops::town.eq_any(towns.clone()))
        };

        let brands = scope()
            .select(products::brand)
            .distinct()
            .load::<Option<String>>(&mut conn)?;

        let shops = scope()
            .select(shops::name)
            .distinct()
            .load::<String>(&mut conn)?;

        let categories = scope()
            .select(products::category)
            .distinct()
            .load::<Option<String>>(&mut conn)?;

        Ok(FacetValues {
            brands,
            shops,
            categories,
        })
    }
}
