use actix_web::{error::InternalError, web, HttpResponse};
use log::debug;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{
    handlers::{not_found, plan::post_plan},
    openapi::ApiDoc,
};
use crate::config::MAX_PAYLOAD_BYTES;
use crate::models::response::ErrorResponse;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(post_plan)
        .default_service(web::to(not_found));
}

/// Swagger UI at `/swagger-ui/` and the document at `/api-docs/openapi.json`.
pub fn configure_docs(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );
}

/// Bodies are parsed as JSON whatever their content type; unparsable bodies
/// answer 400 `{"error": "Invalid JSON"}`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(MAX_PAYLOAD_BYTES)
        .content_type_required(false)
        .error_handler(|err, _req| {
            debug!("invalid JSON body: {err}");
            InternalError::from_response(
                err,
                HttpResponse::BadRequest().json(ErrorResponse::new("Invalid JSON")),
            )
            .into()
        })
}
