use diesel::prelude::*;
use pushkind_common::repository::errors::RepositoryResult;

use crate::domain::shop::{NewShop as DomainNewShop, Shop as DomainShop};
use crate::models::shop::{NewShop as DbNewShop, Shop as DbShop};
use crate::repository::{DieselRepository, ShopWriter};

impl ShopWriter for DieselRepository {
    fn create_shop(&self, new_shop: &DomainNewShop) -> RepositoryResult<DomainShop> {
        use crate::schema::shops;

        let mut conn = self.conn()?;
        let insertable = DbNewShop::from(new_shop);

        let created = diesel::insert_into(shops::table)
            .values(&insertable)
            .get_result::<DbShop>(&mut conn)?;

        Ok(created.into())
    }
}
