use actix_web::{HttpResponse, Responder, get, post, web};
use pushkind_common::domain::auth::AuthenticatedUser;
use serde_json::json;

use crate::config::CatalogConfig;
use crate::domain::filter::FilterLayer;
use crate::forms::catalog::{
    CatalogEntryQuery, FacetsQuery, FilterChangeForm, NextPageQuery, SwitchTownForm,
};
use crate::repository::DieselRepository;
use crate::routes::service_error_response;
use crate::services::catalog as catalog_service;
use crate::services::facets::FacetCache;
use crate::services::pagination::NextPage;
use crate::session::StoredSession;

#[get("/v1/catalog")]
/// Start a catalog visit. Optional `search` and `category` parameters are
/// applied on top of the remembered filters.
pub async fn show_catalog(
    params: web::Query<CatalogEntryQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    facets: web::Data<FacetCache>,
    config: web::Data<CatalogConfig>,
) -> impl Responder {
    let session = StoredSession::new(repo.get_ref(), &user);
    match catalog_service::enter_catalog(
        repo.get_ref(),
        &session,
        facets.get_ref(),
        config.get_ref(),
        &user,
        params.into_inner(),
    ) {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(err) => service_error_response(err, "load catalog"),
    }
}

#[get("/v1/catalog/page")]
/// Reload the current page of the applied filters.
pub async fn show_current_page(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    facets: web::Data<FacetCache>,
    config: web::Data<CatalogConfig>,
) -> impl Responder {
    let session = StoredSession::new(repo.get_ref(), &user);
    match catalog_service::current_page(
        repo.get_ref(),
        &session,
        facets.get_ref(),
        config.get_ref(),
        &user,
    ) {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(err) => service_error_response(err, "load catalog page"),
    }
}

#[get("/v1/catalog/next")]
/// Load the following page. Requests for an outdated generation get
/// `204 No Content`.
pub async fn show_next_page(
    params: web::Query<NextPageQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    config: web::Data<CatalogConfig>,
) -> impl Responder {
    let session = StoredSession::new(repo.get_ref(), &user);
    match catalog_service::load_next_page(
        repo.get_ref(),
        &session,
        config.get_ref(),
        &user,
        params.generation,
    ) {
        Ok(NextPage::Stale) => HttpResponse::NoContent().finish(),
        Ok(next) => HttpResponse::Ok().json(next),
        Err(err) => service_error_response(err, "load next catalog page"),
    }
}

#[get("/v1/catalog/filters/{layer}")]
pub async fn show_filter_state(
    layer: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let session = StoredSession::new(repo.get_ref(), &user);
    let layer = match layer.parse::<FilterLayer>() {
        Ok(layer) => layer,
        Err(err) => return HttpResponse::BadRequest().json(json!({ "error": err.to_string() })),
    };

    match catalog_service::get_filter_state(repo.get_ref(), &session, &user, layer) {
        Ok(state) => HttpResponse::Ok().json(state),
        Err(err) => service_error_response(err, "read filter state"),
    }
}

#[post("/v1/catalog/filters/open")]
pub async fn open_filters(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let session = StoredSession::new(repo.get_ref(), &user);
    match catalog_service::open_filter_panel(repo.get_ref(), &session, &user) {
        Ok(draft) => HttpResponse::Ok().json(draft),
        Err(err) => service_error_response(err, "open filter panel"),
    }
}

#[post("/v1/catalog/filters/draft")]
pub async fn edit_draft(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<FilterChangeForm>,
) -> impl Responder {
    let session = StoredSession::new(repo.get_ref(), &user);
    match catalog_service::set_draft_filter(repo.get_ref(), &session, &user, form.into_inner()) {
        Ok(draft) => HttpResponse::Ok().json(draft),
        Err(err) => service_error_response(err, "edit draft filters"),
    }
}

#[post("/v1/catalog/filters/apply")]
pub async fn apply_filters(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    facets: web::Data<FacetCache>,
    config: web::Data<CatalogConfig>,
) -> impl Responder {
    let session = StoredSession::new(repo.get_ref(), &user);
    match catalog_service::apply_filters(
        repo.get_ref(),
        &session,
        facets.get_ref(),
        config.get_ref(),
        &user,
    ) {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(err) => service_error_response(err, "apply filters"),
    }
}

#[post("/v1/catalog/filters/direct")]
pub async fn apply_direct_filter(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    facets: web::Data<FacetCache>,
    config: web::Data<CatalogConfig>,
    form: web::Json<FilterChangeForm>,
) -> impl Responder {
    let session = StoredSession::new(repo.get_ref(), &user);
    match catalog_service::apply_direct_filter(
        repo.get_ref(),
        &session,
        facets.get_ref(),
        config.get_ref(),
        &user,
        form.into_inner(),
    ) {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(err) => service_error_response(err, "apply filter"),
    }
}

#[post("/v1/catalog/filters/clear")]
pub async fn clear_filters(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    facets: web::Data<FacetCache>,
    config: web::Data<CatalogConfig>,
) -> impl Responder {
    let session = StoredSession::new(repo.get_ref(), &user);
    match catalog_service::clear_filters(
        repo.get_ref(),
        &session,
        facets.get_ref(),
        config.get_ref(),
        &user,
    ) {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(err) => service_error_response(err, "clear filters"),
    }
}

#[post("/v1/catalog/town")]
pub async fn switch_town(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    facets: web::Data<FacetCache>,
    config: web::Data<CatalogConfig>,
    form: web::Json<SwitchTownForm>,
) -> impl Responder {
    let session = StoredSession::new(repo.get_ref(), &user);
    match catalog_service::switch_town(
        repo.get_ref(),
        &session,
        facets.get_ref(),
        config.get_ref(),
        &user,
        form.into_inner(),
    ) {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(err) => service_error_response(err, "switch town"),
    }
}

#[get("/v1/catalog/facets")]
/// Filter options for `?towns=a,b`, or for the applied towns. `?dimension=`
/// with `?q=` narrows one option list.
pub async fn show_facets(
    params: web::Query<FacetsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    facets: web::Data<FacetCache>,
) -> impl Responder {
    let session = StoredSession::new(repo.get_ref(), &user);
    match catalog_service::load_facets(
        repo.get_ref(),
        &session,
        facets.get_ref(),
        &user,
        params.into_inner(),
    ) {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(err) => service_error_response(err, "load facets"),
    }
}
