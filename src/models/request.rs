use serde::Deserialize;
use serde_json::Value;
use serde_with::{serde_as, DisplayFromStr, PickFirst};
use thiserror::Error;
use utoipa::ToSchema;

/// Ordering heuristic handed to the planning engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Heuristic {
    Manhattan,
    Chebyshev,
    #[default]
    Vertical,
    Horizontal,
}

impl Heuristic {
    /// Case-insensitive lookup; anything unrecognised falls back to `Vertical`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "manhattan" => Heuristic::Manhattan,
            "chebyshev" => Heuristic::Chebyshev,
            "horizontal" => Heuristic::Horizontal,
            _ => Heuristic::Vertical,
        }
    }
}

/// Rejections raised while turning an inbound payload into a grid.
/// The display strings are the `error` values returned over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("Invalid parameters")]
    InvalidParameters,
    #[error("start coordinate required")]
    MissingStart,
    #[error("start out of bounds")]
    StartOutOfBounds,
}

/// Raw planning request as received on either transport.
///
/// Numeric fields accept JSON numbers or numeric strings. `start` and
/// `obstacles` stay loosely typed so that malformed coordinates can be told
/// apart from malformed parameters.
#[serde_as]
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PlanRequestBody {
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub rows: i64,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub cols: i64,
    /// `[row, col]` of the start cell.
    #[schema(value_type = Option<Vec<i64>>)]
    pub start: Option<Value>,
    /// `[[row, col], ...]`; malformed or out-of-bounds entries are ignored,
    /// and anything other than an array counts as no obstacles.
    #[schema(value_type = Option<Vec<Vec<i64>>>)]
    pub obstacles: Option<Value>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub orientation: Option<i64>,
    /// One of manhattan, chebyshev, vertical, horizontal (default vertical).
    #[schema(value_type = Option<String>)]
    pub heuristic: Option<Value>,
}

/// A request whose parameters have been checked. Coordinates stay signed
/// until the grid is built; bounds are the grid builder's concern.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanRequest {
    pub rows: usize,
    pub cols: usize,
    pub start: (i64, i64),
    pub obstacles: Vec<(i64, i64)>,
    pub orientation: i64,
    pub heuristic: Heuristic,
}

impl PlanRequest {
    pub fn from_value(value: Value) -> Result<Self, RequestError> {
        let body: PlanRequestBody =
            serde_json::from_value(value).map_err(|_| RequestError::InvalidParameters)?;
        Self::try_from(body)
    }
}

impl TryFrom<PlanRequestBody> for PlanRequest {
    type Error = RequestError;

    fn try_from(body: PlanRequestBody) -> Result<Self, Self::Error> {
        let rows = positive(body.rows).ok_or(RequestError::InvalidParameters)?;
        let cols = positive(body.cols).ok_or(RequestError::InvalidParameters)?;
        let start = body
            .start
            .as_ref()
            .and_then(coordinate_pair)
            .ok_or(RequestError::MissingStart)?;
        let obstacles = match body.obstacles {
            Some(Value::Array(cells)) => cells.iter().filter_map(coordinate_pair).collect(),
            _ => Vec::new(),
        };
        let heuristic = match body.heuristic {
            Some(Value::String(raw)) => Heuristic::parse(&raw),
            _ => Heuristic::default(),
        };

        Ok(Self {
            rows,
            cols,
            start,
            obstacles,
            orientation: body.orientation.unwrap_or(0),
            heuristic,
        })
    }
}

fn positive(n: i64) -> Option<usize> {
    usize::try_from(n).ok().filter(|n| *n > 0)
}

fn coordinate_pair(value: &Value) -> Option<(i64, i64)> {
    match value.as_array()?.as_slice() {
        [r, c] => Some((r.as_i64()?, c.as_i64()?)),
        _ => None,
    }
}
