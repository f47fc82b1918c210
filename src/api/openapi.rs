use utoipa::OpenApi;

use crate::models::{
    request::PlanRequestBody,
    response::{ErrorResponse, PlanResponse},
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Coverage Planner API",
        description = "Grid coverage-path planning: submit an occupancy grid and receive a tour that visits every reachable free cell and returns to the start, biased toward high-value cells.",
        version = "1.0.0",
    ),
    paths(crate::api::handlers::plan::post_plan),
    components(schemas(PlanRequestBody, PlanResponse, ErrorResponse)),
    tags(
        (name = "plan", description = "Coverage planning"),
    )
)]
pub struct ApiDoc;
