//! Helpers for integration tests.
#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use pushkind_common::db::{DbPool, establish_connection_pool};
use pushkind_common::domain::auth::AuthenticatedUser;
use tempfile::TempDir;

use pushkind_market::SERVICE_ACCESS_ROLE;
use pushkind_market::domain::product::{NewProduct, Product};
use pushkind_market::domain::shop::{NewShop, Shop};
use pushkind_market::domain::town::{NewTown, Town};
use pushkind_market::domain::user::{NewUser, User};
use pushkind_market::repository::{
    DieselRepository, ProductWriter, ShopWriter, TownWriter, UserWriter,
};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!(); // assumes migrations/ exists

/// Temporary database used in integration tests. The file lives in its own
/// directory, removed together with the WAL side files on drop.
pub struct TestDb {
    _dir: TempDir,
    path: String,
    pool: DbPool,
}

impl TestDb {
    pub fn new(filename: &str) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temporary directory.");
        let path = dir.path().join(filename).to_string_lossy().into_owned();

        let pool = establish_connection_pool(&path).expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Migrations failed");
        TestDb {
            _dir: dir,
            path,
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn repo(&self) -> DieselRepository {
        DieselRepository::new(self.pool())
    }
}

pub fn datetime(day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, day)
        .and_then(|date| date.and_hms_opt(12, 0, 0))
        .expect("valid date")
}

pub fn shopper(hub_id: i32) -> AuthenticatedUser {
    AuthenticatedUser {
        sub: "shopper-1".into(),
        email: "shopper@example.com".into(),
        hub_id,
        name: "Shopper".into(),
        roles: vec![],
        exp: 0,
    }
}

pub fn admin(hub_id: i32) -> AuthenticatedUser {
    AuthenticatedUser {
        sub: "admin-1".into(),
        email: "admin@example.com".into(),
        hub_id,
        name: "Admin".into(),
        roles: vec![SERVICE_ACCESS_ROLE.to_string()],
        exp: 0,
    }
}

pub fn seed_town(repo: &DieselRepository, hub_id: i32, name: &str) -> Town {
    repo.create_town(&NewTown::new(hub_id, name))
        .expect("create town")
}

pub fn seed_shop(repo: &DieselRepository, hub_id: i32, name: &str, town: &str) -> Shop {
    repo.create_shop(&NewShop::new(hub_id, name, town))
        .expect("create shop")
}

pub fn seed_product(repo: &DieselRepository, product: NewProduct) -> Product {
    repo.create_product(&product).expect("create product")
}

pub fn seed_user(repo: &DieselRepository, hub_id: i32, email: &str, town: Option<&str>) -> User {
    let mut new_user = NewUser::new(hub_id, "Shopper".to_string(), email.to_string());
    if let Some(town) = town {
        new_user = new_user.with_town(town);
    }
    repo.create_user(&new_user).expect("create user")
}
