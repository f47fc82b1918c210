use log::{error, warn};
use serde_json::Value;

use crate::logic::planner::{PlanError, Planner};
use crate::models::{request::PlanRequest, response::OccupancyGridMessage};

/// Plans one inbound message. The payload is either the request object or a
/// JSON string encoding it. Returns `None` when nothing should be published;
/// the reason is logged.
pub async fn handle_request(planner: &Planner, payload: Value) -> Option<OccupancyGridMessage> {
    let payload = match payload {
        Value::String(raw) => match serde_json::from_str(&raw) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("dropping plan request with invalid JSON: {e}");
                return None;
            }
        },
        other => other,
    };

    let request = match PlanRequest::from_value(payload) {
        Ok(request) => request,
        Err(e) => {
            warn!("dropping invalid plan request: {e}");
            return None;
        }
    };

    match planner.plan(request).await {
        Ok(outcome) => Some(OccupancyGridMessage::project(&outcome.grid, &outcome.result)),
        Err(PlanError::Request(e)) => {
            warn!("dropping invalid plan request: {e}");
            None
        }
        Err(e) => {
            error!("planning failed: {e}");
            None
        }
    }
}
