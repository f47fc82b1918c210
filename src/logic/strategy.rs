//! Two-attempt planning strategy.
//!
//! The first attempt runs on the preferred grid (low-value cells masked as
//! obstacles). Only when it finds no coverage does a second attempt run on
//! the unmasked grid.

use log::debug;

use crate::engine::{EngineError, PlanParams, PlanResult, PlanningEngine};
use crate::models::grid::{OccupancyGrid, ValueMatrix};

#[derive(Debug, Clone, PartialEq)]
pub enum Attempt {
    Preferred,
    Fallback,
    Done(PlanResult),
}

impl Attempt {
    /// Transition after an engine run: a preferred result without coverage
    /// moves on to the fallback; any other result is final.
    pub fn advance(self, result: PlanResult) -> Attempt {
        match self {
            Attempt::Preferred if !result.found => Attempt::Fallback,
            Attempt::Preferred | Attempt::Fallback => Attempt::Done(result),
            done @ Attempt::Done(_) => done,
        }
    }
}

pub fn run_strategy(
    engine: &dyn PlanningEngine,
    grid: &OccupancyGrid,
    values: &ValueMatrix,
    params: &PlanParams,
    threshold: f64,
) -> Result<PlanResult, EngineError> {
    let preferred = grid.preferred(values, threshold);
    let mut attempt = Attempt::Preferred;
    loop {
        let target = match attempt {
            Attempt::Preferred => &preferred,
            Attempt::Fallback => {
                debug!("no coverage on preferred cells, retrying on the full grid");
                grid
            }
            Attempt::Done(result) => return Ok(result),
        };
        attempt = attempt.advance(engine.plan(target, values, params)?);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::CoverageEngine;
    use crate::models::{grid::CellState, grid::DEFAULT_VALUE_THRESHOLD, request::Heuristic, Coordinate};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned results and records the grids it was asked to plan.
    struct ScriptedEngine {
        results: Mutex<VecDeque<Result<PlanResult, EngineError>>>,
        seen: Mutex<Vec<OccupancyGrid>>,
    }

    impl ScriptedEngine {
        fn new(results: Vec<Result<PlanResult, EngineError>>) -> Self {
            Self {
                results: Mutex::new(results.into()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.seen.lock().unwrap().len()
        }
    }

    impl PlanningEngine for ScriptedEngine {
        fn plan(
            &self,
            grid: &OccupancyGrid,
            _values: &ValueMatrix,
            _params: &PlanParams,
        ) -> Result<PlanResult, EngineError> {
            self.seen.lock().unwrap().push(grid.clone());
            self.results
                .lock()
                .unwrap()
                .pop_front()
                .expect("engine called more often than scripted")
        }
    }

    fn outcome(found: bool, steps: usize) -> PlanResult {
        PlanResult {
            found,
            steps,
            cost: steps as f64,
            path: vec![Coordinate(0, 0); steps + 1],
        }
    }

    fn params() -> PlanParams {
        PlanParams {
            orientation: 0,
            heuristic: Heuristic::Vertical,
            return_home: true,
        }
    }

    fn base_grid() -> OccupancyGrid {
        let mut grid = OccupancyGrid::new(2, 2);
        grid.set(Coordinate(0, 0), CellState::Start);
        grid
    }

    #[test]
    fn test_advance_transitions() {
        assert_eq!(Attempt::Preferred.advance(outcome(false, 0)), Attempt::Fallback);
        assert_eq!(
            Attempt::Preferred.advance(outcome(true, 3)),
            Attempt::Done(outcome(true, 3))
        );
        assert_eq!(
            Attempt::Fallback.advance(outcome(false, 1)),
            Attempt::Done(outcome(false, 1))
        );
        assert_eq!(
            Attempt::Done(outcome(true, 2)).advance(outcome(false, 0)),
            Attempt::Done(outcome(true, 2))
        );
    }

    #[test]
    fn test_preferred_success_skips_fallback() {
        let engine = ScriptedEngine::new(vec![Ok(outcome(true, 4))]);
        let values = ValueMatrix::from_rows(vec![vec![0.5, 0.05], vec![0.5, 0.5]]).unwrap();
        let grid = base_grid();

        let result = run_strategy(&engine, &grid, &values, &params(), DEFAULT_VALUE_THRESHOLD).unwrap();

        assert_eq!(result, outcome(true, 4));
        assert_eq!(engine.calls(), 1, "Fallback must not run after a preferred success");
        let seen = engine.seen.lock().unwrap();
        assert_eq!(seen[0].get(Coordinate(0, 1)), Some(CellState::Obstacle));
    }

    #[test]
    fn test_preferred_failure_returns_fallback_result() {
        let engine = ScriptedEngine::new(vec![Ok(outcome(false, 0)), Ok(outcome(false, 7))]);
        let grid = base_grid();
        let values = ValueMatrix::zeros(2, 2);

        let result = run_strategy(&engine, &grid, &values, &params(), DEFAULT_VALUE_THRESHOLD).unwrap();

        assert_eq!(result, outcome(false, 7));
        assert_eq!(engine.calls(), 2);
        let seen = engine.seen.lock().unwrap();
        assert_eq!(seen[0], grid.preferred(&values, DEFAULT_VALUE_THRESHOLD));
        assert_eq!(seen[1], grid, "Fallback must plan on the unmasked grid");
    }

    #[test]
    fn test_engine_error_propagates() {
        let engine = ScriptedEngine::new(vec![Err(EngineError::Internal("boom".into()))]);
        let err = run_strategy(
            &engine,
            &base_grid(),
            &ValueMatrix::zeros(2, 2),
            &params(),
            DEFAULT_VALUE_THRESHOLD,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::Internal(_)));
        assert_eq!(engine.calls(), 1);
    }

    #[test]
    fn test_zero_values_fall_back_to_full_coverage() {
        let grid = base_grid();
        let values = ValueMatrix::zeros(2, 2);
        let result =
            run_strategy(&CoverageEngine, &grid, &values, &params(), DEFAULT_VALUE_THRESHOLD).unwrap();
        let direct = CoverageEngine.plan(&grid, &values, &params()).unwrap();
        assert!(result.found, "Fully masked grid must not pass as a one-cell success");
        assert_eq!(result, direct);
        assert_eq!(result.steps, 4);
    }
}
