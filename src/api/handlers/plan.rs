use actix_web::{post, web, HttpResponse, Responder};
use log::{debug, error};
use serde_json::Value;

use crate::{
    logic::planner::{PlanError, Planner},
    models::{
        request::PlanRequest,
        response::{ErrorResponse, PlanResponse},
    },
};

/// POST /plan
/// Computes a coverage path for the submitted grid.
#[utoipa::path(
    tag = "plan",
    request_body = crate::models::request::PlanRequestBody,
    responses(
        (status = 200, description = "Planning finished (found may be false)", body = PlanResponse),
        (status = 400, description = "Invalid JSON, parameters or start coordinate", body = ErrorResponse),
        (status = 500, description = "Planning engine failure", body = ErrorResponse),
    )
)]
#[post("/plan")]
pub async fn post_plan(planner: web::Data<Planner>, body: web::Json<Value>) -> impl Responder {
    let request = match PlanRequest::from_value(body.into_inner()) {
        Ok(request) => request,
        Err(e) => {
            debug!("rejected plan request: {e}");
            return HttpResponse::BadRequest().json(ErrorResponse::new(e.to_string()));
        }
    };

    match planner.plan(request).await {
        Ok(outcome) => HttpResponse::Ok().json(PlanResponse::from(&outcome.result)),
        Err(PlanError::Request(e)) => {
            debug!("rejected plan request: {e}");
            HttpResponse::BadRequest().json(ErrorResponse::new(e.to_string()))
        }
        Err(e) => {
            error!("planning failed: {e}");
            HttpResponse::InternalServerError().json(ErrorResponse::new("Internal server error"))
        }
    }
}
