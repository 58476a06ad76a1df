use actix_web::HttpResponse;
use serde_json::json;

use crate::services::ServiceError;

pub mod catalog;
pub mod toggles;
pub mod towns;

/// Map a service failure onto a JSON API response.
fn service_error_response(err: ServiceError, action: &str) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => HttpResponse::Unauthorized().finish(),
        ServiceError::NotFound => HttpResponse::NotFound().finish(),
        ServiceError::Conflict => HttpResponse::Conflict().finish(),
        ServiceError::Form(message) => HttpResponse::BadRequest().json(json!({ "error": message })),
        err => {
            log::error!("Failed to {action}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
