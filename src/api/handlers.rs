use actix_web::{HttpResponse, Responder};

use crate::models::response::ErrorResponse;

pub mod plan;

/// Fallback for every unrouted path.
pub async fn not_found() -> impl Responder {
    HttpResponse::NotFound().json(ErrorResponse::new("Not found"))
}
