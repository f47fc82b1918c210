//! Planning engine seam.
//!
//! The orchestrator only sees [`PlanningEngine`]; [`CoverageEngine`] is the
//! implementation shipped with the service.

use thiserror::Error;

use crate::models::{
    grid::{OccupancyGrid, ValueMatrix},
    request::Heuristic,
    Coordinate,
};

pub mod coverage;

pub use coverage::CoverageEngine;

/// Per-run settings handed to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanParams {
    /// Initial heading index: 0 up, 1 left, 2 down, 3 right (reduced modulo 4).
    pub orientation: i64,
    pub heuristic: Heuristic,
    /// Close the tour back at the start cell.
    pub return_home: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanResult {
    pub found: bool,
    pub steps: usize,
    pub cost: f64,
    pub path: Vec<Coordinate>,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("grid has no start cell")]
    MissingStart,
    #[error("value matrix is {values_rows}x{values_cols} but grid is {rows}x{cols}")]
    DimensionMismatch {
        rows: usize,
        cols: usize,
        values_rows: usize,
        values_cols: usize,
    },
    #[error("planning engine failure: {0}")]
    Internal(String),
}

/// A coverage-path planner. Implementations hold no state between calls.
pub trait PlanningEngine: Send + Sync {
    fn plan(
        &self,
        grid: &OccupancyGrid,
        values: &ValueMatrix,
        params: &PlanParams,
    ) -> Result<PlanResult, EngineError>;
}
