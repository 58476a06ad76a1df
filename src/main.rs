use std::env;

use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use dotenvy::dotenv;
use pushkind_common::db::establish_connection_pool;
use pushkind_common::middleware::RedirectUnauthorized;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::logout;

use pushkind_market::config::CatalogConfig;
use pushkind_market::repository::DieselRepository;
use pushkind_market::routes::catalog::{
    apply_direct_filter, apply_filters, clear_filters, edit_draft, open_filters, show_catalog,
    show_current_page, show_facets, show_filter_state, show_next_page, switch_town,
};
use pushkind_market::routes::toggles::{
    show_booking_status, show_bookings, show_wishlist, show_wishlist_status, toggle_booking,
    toggle_wishlist,
};
use pushkind_market::routes::towns::{add_town, delete_town, show_towns};
use pushkind_market::services::facets::FacetCache;
use pushkind_market::services::toggles::ToggleLocks;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let database_url = env::var("DATABASE_URL").unwrap_or("app.db".to_string());
    let port = env::var("PORT").unwrap_or("8080".to_string());
    let port = port.parse::<u16>().unwrap_or(8080);
    let address = env::var("ADDRESS").unwrap_or("127.0.0.1".to_string());

    let secret = env::var("SECRET_KEY");
    let secret_key = match &secret {
        Ok(key) => Key::from(key.as_bytes()),
        Err(_) => Key::generate(),
    };

    let auth_service_url = match env::var("AUTH_SERVICE_URL") {
        Ok(auth_service_url) => auth_service_url,
        Err(_) => {
            log::error!("AUTH_SERVICE_URL environment variable not set");
            std::process::exit(1);
        }
    };

    let common_config = CommonServerConfig {
        secret: secret.unwrap_or_default(),
        auth_service_url,
    };
    let catalog_config = CatalogConfig::from_env();

    let domain = env::var("DOMAIN").unwrap_or("localhost".to_string());

    let pool = match establish_connection_pool(&database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    // Shared by all workers.
    let toggle_locks = web::Data::new(ToggleLocks::new());
    let facet_cache = web::Data::new(FacetCache::new());

    log::info!(
        "Starting catalog on {address}:{port} with {} products per page",
        catalog_config.page_size
    );

    HttpServer::new(move || {
        App::new()
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(format!(".{domain}")))
                    .build(),
            )
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(
                web::scope("")
                    .wrap(RedirectUnauthorized)
                    .service(show_catalog)
                    .service(show_current_page)
                    .service(show_next_page)
                    .service(show_filter_state)
                    .service(open_filters)
                    .service(edit_draft)
                    .service(apply_filters)
                    .service(apply_direct_filter)
                    .service(clear_filters)
                    .service(switch_town)
                    .service(show_facets)
                    .service(toggle_wishlist)
                    .service(toggle_booking)
                    .service(show_wishlist)
                    .service(show_bookings)
                    .service(show_wishlist_status)
                    .service(show_booking_status)
                    .service(show_towns)
                    .service(add_town)
                    .service(delete_town)
                    .service(logout),
            )
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(common_config.clone()))
            .app_data(web::Data::new(catalog_config))
            .app_data(toggle_locks.clone())
            .app_data(facet_cache.clone())
    })
    .bind((address, port))?
    .run()
    .await
}
