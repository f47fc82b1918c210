use std::sync::Arc;

use log::{debug, trace, warn};
use thiserror::Error;

use crate::config::Config;
use crate::engine::{CoverageEngine, EngineError, PlanParams, PlanResult, PlanningEngine};
use crate::logic::{
    grid_builder::build_grid,
    strategy::run_strategy,
    values::{ValueSource, ValuesClient},
};
use crate::models::{
    grid::{OccupancyGrid, ValueMatrix, DEFAULT_VALUE_THRESHOLD},
    request::{PlanRequest, RequestError},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannerConfig {
    /// Free cells valued below this are excluded from the preferred attempt.
    pub value_threshold: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            value_threshold: DEFAULT_VALUE_THRESHOLD,
        }
    }
}

#[derive(Debug, Error)]
pub enum PlanError {
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("planning task aborted: {0}")]
    Aborted(String),
}

/// The planned result together with the base grid it covers.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanOutcome {
    pub grid: OccupancyGrid,
    pub result: PlanResult,
}

/// Orchestrates one planning request: grid construction, value acquisition
/// and the preferred/fallback strategy. Holds no per-request state, so a
/// single instance is shared by every concurrent request.
#[derive(Clone)]
pub struct Planner {
    config: PlannerConfig,
    values: Arc<dyn ValueSource>,
    engine: Arc<dyn PlanningEngine>,
}

impl Planner {
    pub fn new(
        config: PlannerConfig,
        values: Arc<dyn ValueSource>,
        engine: Arc<dyn PlanningEngine>,
    ) -> Self {
        Self {
            config,
            values,
            engine,
        }
    }

    /// Planner backed by the HTTP valuation client and the built-in engine.
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let values = ValuesClient::new(config.values_url.clone(), config.values_timeout)?;
        Ok(Self::new(
            PlannerConfig::default(),
            Arc::new(values),
            Arc::new(CoverageEngine),
        ))
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub async fn plan(&self, request: PlanRequest) -> Result<PlanOutcome, PlanError> {
        let grid = build_grid(&request)?;
        debug!(
            "planning {}x{} grid from {:?} ({} obstacles, {:?})",
            grid.rows,
            grid.cols,
            request.start,
            request.obstacles.len(),
            request.heuristic
        );
        trace!("base grid: {:?}", grid.codes());

        let mut values = self.values.fetch(grid.rows, grid.cols).await;
        if !values.matches(&grid) {
            warn!(
                "value source returned {}x{} for a {}x{} grid, using zero values",
                values.rows, values.cols, grid.rows, grid.cols
            );
            values = ValueMatrix::zeros(grid.rows, grid.cols);
        }

        let params = PlanParams {
            orientation: request.orientation,
            heuristic: request.heuristic,
            return_home: true,
        };
        let engine = Arc::clone(&self.engine);
        let threshold = self.config.value_threshold;
        let (grid, result) = tokio::task::spawn_blocking(move || {
            let result = run_strategy(engine.as_ref(), &grid, &values, &params, threshold);
            (grid, result)
        })
        .await
        .map_err(|e| PlanError::Aborted(e.to_string()))?;

        Ok(PlanOutcome {
            grid,
            result: result?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{grid::CellState, request::Heuristic, Coordinate};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedValues {
        value: f64,
        shape: Option<(usize, usize)>,
        calls: AtomicUsize,
    }

    impl FixedValues {
        fn new(value: f64) -> Self {
            Self {
                value,
                shape: None,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ValueSource for FixedValues {
        async fn fetch(&self, rows: usize, cols: usize) -> ValueMatrix {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let (rows, cols) = self.shape.unwrap_or((rows, cols));
            ValueMatrix {
                rows,
                cols,
                values: vec![vec![self.value; cols]; rows],
            }
        }
    }

    struct PanickingEngine;

    impl PlanningEngine for PanickingEngine {
        fn plan(
            &self,
            _grid: &OccupancyGrid,
            _values: &ValueMatrix,
            _params: &PlanParams,
        ) -> Result<PlanResult, EngineError> {
            panic!("engine exploded");
        }
    }

    fn request(rows: usize, cols: usize, start: (i64, i64)) -> PlanRequest {
        PlanRequest {
            rows,
            cols,
            start,
            obstacles: vec![],
            orientation: 0,
            heuristic: Heuristic::Vertical,
        }
    }

    #[actix_web::test]
    async fn test_out_of_bounds_start_skips_value_fetch() {
        let values = Arc::new(FixedValues::new(1.0));
        let planner = Planner::new(PlannerConfig::default(), values.clone(), Arc::new(PanickingEngine));
        let err = planner.plan(request(2, 2, (2, 2))).await.unwrap_err();
        assert!(matches!(err, PlanError::Request(RequestError::StartOutOfBounds)));
        assert_eq!(values.calls.load(Ordering::SeqCst), 0);
    }

    #[actix_web::test]
    async fn test_engine_panic_is_contained() {
        let planner = Planner::new(
            PlannerConfig::default(),
            Arc::new(FixedValues::new(1.0)),
            Arc::new(PanickingEngine),
        );
        let err = planner.plan(request(2, 2, (0, 0))).await.unwrap_err();
        assert!(matches!(err, PlanError::Aborted(_)));
    }

    #[actix_web::test]
    async fn test_misshapen_values_are_replaced_with_zeros() {
        let values = FixedValues {
            shape: Some((5, 5)),
            ..FixedValues::new(1.0)
        };
        let planner = Planner::new(PlannerConfig::default(), Arc::new(values), Arc::new(CoverageEngine));
        let outcome = planner.plan(request(2, 2, (0, 0))).await.unwrap();
        assert!(outcome.result.found);
        assert_eq!(outcome.grid.get(Coordinate(0, 0)), Some(CellState::Start));
    }

    #[actix_web::test]
    async fn test_threshold_comes_from_config() {
        // Values of 0.3 are below a 0.5 threshold: the preferred grid is
        // fully masked, so the fallback decides the result.
        let planner = Planner::new(
            PlannerConfig {
                value_threshold: 0.5,
            },
            Arc::new(FixedValues::new(0.3)),
            Arc::new(CoverageEngine),
        );
        assert_eq!(planner.config().value_threshold, 0.5);
        let outcome = planner.plan(request(1, 3, (0, 0))).await.unwrap();
        assert!(outcome.result.found);
        assert_eq!(outcome.result.path.last(), Some(&Coordinate(0, 0)));
    }
}
