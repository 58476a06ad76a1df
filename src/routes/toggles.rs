use actix_web::{HttpResponse, Responder, get, post, web};
use pushkind_common::domain::auth::AuthenticatedUser;
use serde_json::json;

use crate::domain::toggle::ToggleKind;
use crate::forms::toggles::ToggleForm;
use crate::repository::DieselRepository;
use crate::routes::service_error_response;
use crate::services::toggles::{self as toggle_service, ToggleLocks};

fn toggle(
    kind: ToggleKind,
    product_id: i32,
    user: &AuthenticatedUser,
    repo: &DieselRepository,
    locks: &ToggleLocks,
    form: ToggleForm,
) -> HttpResponse {
    match toggle_service::toggle_product(repo, locks, user, kind, product_id, form) {
        Ok(outcome) => HttpResponse::Ok().json(json!({
            "product_id": product_id,
            "outcome": outcome,
        })),
        Err(err) => service_error_response(err, &format!("toggle {kind} entry")),
    }
}

fn list(kind: ToggleKind, user: &AuthenticatedUser, repo: &DieselRepository) -> HttpResponse {
    match toggle_service::list_toggle_items(repo, user, kind) {
        Ok(items) => HttpResponse::Ok().json(items),
        Err(err) => service_error_response(err, &format!("list {kind} entries")),
    }
}

fn status(
    kind: ToggleKind,
    product_id: i32,
    user: &AuthenticatedUser,
    repo: &DieselRepository,
) -> HttpResponse {
    match toggle_service::is_toggled(repo, user, kind, product_id) {
        Ok(active) => HttpResponse::Ok().json(json!({
            "product_id": product_id,
            "active": active,
        })),
        Err(err) => service_error_response(err, &format!("read {kind} entry")),
    }
}

#[post("/v1/wishlist/{product_id}")]
/// Add the product to the wishlist, or remove it when already present.
pub async fn toggle_wishlist(
    product_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    locks: web::Data<ToggleLocks>,
    form: web::Json<ToggleForm>,
) -> impl Responder {
    toggle(
        ToggleKind::Wishlist,
        product_id.into_inner(),
        &user,
        repo.get_ref(),
        locks.get_ref(),
        form.into_inner(),
    )
}

#[post("/v1/bookings/{product_id}")]
/// Book the product, or cancel the booking when already present.
pub async fn toggle_booking(
    product_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    locks: web::Data<ToggleLocks>,
    form: web::Json<ToggleForm>,
) -> impl Responder {
    toggle(
        ToggleKind::Booking,
        product_id.into_inner(),
        &user,
        repo.get_ref(),
        locks.get_ref(),
        form.into_inner(),
    )
}

#[get("/v1/wishlist")]
pub async fn show_wishlist(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    list(ToggleKind::Wishlist, &user, repo.get_ref())
}

#[get("/v1/bookings")]
pub async fn show_bookings(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    list(ToggleKind::Booking, &user, repo.get_ref())
}

#[get("/v1/wishlist/{product_id}")]
pub async fn show_wishlist_status(
    product_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    status(ToggleKind::Wishlist, product_id.into_inner(), &user, repo.get_ref())
}

#[get("/v1/bookings/{product_id}")]
pub async fn show_booking_status(
    product_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    status(ToggleKind::Booking, product_id.into_inner(), &user, repo.get_ref())
}
