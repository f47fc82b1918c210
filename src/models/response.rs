use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::engine::PlanResult;
use crate::models::{grid::OccupancyGrid, grid::CellState, Coordinate};

/// Occupancy value for obstacle cells.
pub const OCCUPIED: i8 = 100;
/// Occupancy value for cells visited by the planned path.
pub const VISITED: i8 = 50;
pub const UNOCCUPIED: i8 = 0;

/// HTTP projection of a planning result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PlanResponse {
    pub found: bool,
    pub steps: usize,
    pub cost: f64,
    /// Ordered `[row, col]` pairs.
    #[schema(value_type = Vec<Vec<usize>>)]
    pub path: Vec<Coordinate>,
}

impl From<&PlanResult> for PlanResponse {
    fn from(result: &PlanResult) -> Self {
        Self {
            found: result.found,
            steps: result.steps,
            cost: result.cost,
            path: result.path.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapMetaData {
    pub width: usize,
    pub height: usize,
    pub resolution: f64,
}

/// Messaging projection, shaped like `nav_msgs/OccupancyGrid`.
///
/// `found` rides alongside the grid so subscribers do not have to infer
/// success from an empty path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupancyGridMessage {
    pub info: MapMetaData,
    /// Row-major cell occupancy: 100 obstacle, 50 on path, 0 otherwise.
    pub data: Vec<i8>,
    pub found: bool,
}

impl OccupancyGridMessage {
    /// Projects `result` over the base (unmasked) grid it was planned on.
    pub fn project(grid: &OccupancyGrid, result: &PlanResult) -> Self {
        let mut data: Vec<i8> = grid
            .iter()
            .map(|(_, state)| match state {
                CellState::Obstacle => OCCUPIED,
                CellState::Free | CellState::Start => UNOCCUPIED,
            })
            .collect();

        for at in &result.path {
            if at.row() >= grid.rows || at.col() >= grid.cols {
                continue;
            }
            let cell = &mut data[at.row() * grid.cols + at.col()];
            if *cell == UNOCCUPIED {
                *cell = VISITED;
            }
        }

        Self {
            info: MapMetaData {
                width: grid.cols,
                height: grid.rows,
                resolution: 1.0,
            },
            data,
            found: result.found,
        }
    }
}
