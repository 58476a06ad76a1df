use actix_web::{HttpResponse, Responder, delete, get, post, web};
use pushkind_common::domain::auth::AuthenticatedUser;

use crate::forms::towns::AddTownForm;
use crate::repository::DieselRepository;
use crate::routes::service_error_response;
use crate::services::towns as town_service;

#[get("/v1/towns")]
pub async fn show_towns(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match town_service::list_towns(repo.get_ref(), &user) {
        Ok(towns) => HttpResponse::Ok().json(towns),
        Err(err) => service_error_response(err, "list towns"),
    }
}

#[post("/v1/towns")]
/// Requires the role stored in `crate::SERVICE_ACCESS_ROLE`.
pub async fn add_town(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<AddTownForm>,
) -> impl Responder {
    match town_service::create_town(repo.get_ref(), &user, form.into_inner()) {
        Ok(town) => HttpResponse::Created().json(town),
        Err(err) => service_error_response(err, "create town"),
    }
}

#[delete("/v1/towns/{town_id}")]
/// Requires the role stored in `crate::SERVICE_ACCESS_ROLE`.
pub async fn delete_town(
    town_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match town_service::delete_town(repo.get_ref(), &user, town_id.into_inner()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => service_error_response(err, "delete town"),
    }
}
