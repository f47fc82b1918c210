use std::collections::{HashMap, HashSet, VecDeque};

use log::debug;

use crate::engine::{EngineError, PlanParams, PlanResult, PlanningEngine};
use crate::models::{
    grid::{OccupancyGrid, ValueMatrix},
    request::Heuristic,
    Coordinate,
};

/// Extra cost of a quarter turn on top of the unit move cost.
pub const TURN_COST: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Heading {
    Up,
    Left,
    Down,
    Right,
}

impl Heading {
    const ALL: [Heading; 4] = [Heading::Up, Heading::Left, Heading::Down, Heading::Right];

    fn from_orientation(orientation: i64) -> Self {
        Self::ALL[orientation.rem_euclid(4) as usize]
    }

    fn index(self) -> usize {
        match self {
            Heading::Up => 0,
            Heading::Left => 1,
            Heading::Down => 2,
            Heading::Right => 3,
        }
    }

    fn delta(self) -> (isize, isize) {
        match self {
            Heading::Up => (-1, 0),
            Heading::Left => (0, -1),
            Heading::Down => (1, 0),
            Heading::Right => (0, 1),
        }
    }

    /// Quarter turns needed to face `other`: 0, 1 or 2.
    fn turns_to(self, other: Heading) -> u32 {
        match (other.index() + 4 - self.index()) % 4 {
            0 => 0,
            2 => 2,
            _ => 1,
        }
    }

    /// All headings, starting with `self` and rotating counter-clockwise.
    fn rotation(self) -> impl Iterator<Item = Heading> {
        (0..4).map(move |i| Self::ALL[(self.index() + i) % 4])
    }

    fn between(from: Coordinate, to: Coordinate) -> Self {
        if to.row() < from.row() {
            Heading::Up
        } else if to.row() > from.row() {
            Heading::Down
        } else if to.col() < from.col() {
            Heading::Left
        } else {
            Heading::Right
        }
    }
}

/// Greedy 4-connected coverage planner.
///
/// Walks to the unvisited neighbour closest to the start cell under the
/// requested heuristic, preferring fewer turns and then higher cell value.
/// When boxed in it takes the shortest route to the nearest unvisited cell.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoverageEngine;

impl PlanningEngine for CoverageEngine {
    fn plan(
        &self,
        grid: &OccupancyGrid,
        values: &ValueMatrix,
        params: &PlanParams,
    ) -> Result<PlanResult, EngineError> {
        if !values.matches(grid) {
            return Err(EngineError::DimensionMismatch {
                rows: grid.rows,
                cols: grid.cols,
                values_rows: values.rows,
                values_cols: values.cols,
            });
        }
        let home = grid.start().ok_or(EngineError::MissingStart)?;
        Ok(CoverageSearch::new(grid, values, home, params).run(params.return_home))
    }
}

struct CoverageSearch<'a> {
    grid: &'a OccupancyGrid,
    values: &'a ValueMatrix,
    heuristic: Heuristic,
    home: Coordinate,
    position: Coordinate,
    heading: Heading,
    visited: Vec<bool>,
    remaining: usize,
    path: Vec<Coordinate>,
    cost: f64,
}

impl<'a> CoverageSearch<'a> {
    fn new(
        grid: &'a OccupancyGrid,
        values: &'a ValueMatrix,
        home: Coordinate,
        params: &PlanParams,
    ) -> Self {
        let traversable = grid.iter().filter(|(at, _)| grid.is_traversable(*at)).count();
        let mut visited = vec![false; grid.rows * grid.cols];
        visited[home.row() * grid.cols + home.col()] = true;
        Self {
            grid,
            values,
            heuristic: params.heuristic,
            home,
            position: home,
            heading: Heading::from_orientation(params.orientation),
            visited,
            remaining: traversable.saturating_sub(1),
            path: vec![home],
            cost: 0.0,
        }
    }

    fn run(mut self, return_home: bool) -> PlanResult {
        if self.remaining == 0 {
            debug!("no free cell to cover besides the start");
            return self.finish(false);
        }

        while self.remaining > 0 {
            if let Some(next) = self.best_neighbour() {
                self.step(next);
                continue;
            }
            match self.route_to(|at| !self.is_visited(at)) {
                Some(route) => route.into_iter().for_each(|at| self.step(at)),
                None => break,
            }
        }

        let found = self.remaining == 0;
        if found && return_home && self.position != self.home {
            let home = self.home;
            if let Some(route) = self.route_to(|at| at == home) {
                route.into_iter().for_each(|at| self.step(at));
            }
        }
        self.finish(found)
    }

    fn finish(self, found: bool) -> PlanResult {
        PlanResult {
            found,
            steps: self.path.len() - 1,
            cost: self.cost,
            path: self.path,
        }
    }

    fn is_visited(&self, at: Coordinate) -> bool {
        self.visited[at.row() * self.grid.cols + at.col()]
    }

    fn distance(&self, at: Coordinate) -> usize {
        let dr = at.row().abs_diff(self.home.row());
        let dc = at.col().abs_diff(self.home.col());
        match self.heuristic {
            Heuristic::Manhattan => dr + dc,
            Heuristic::Chebyshev => dr.max(dc),
            Heuristic::Vertical => dc,
            Heuristic::Horizontal => dr,
        }
    }

    fn neighbour(&self, at: Coordinate, heading: Heading) -> Option<Coordinate> {
        let (dr, dc) = heading.delta();
        let next = Coordinate(
            at.row().checked_add_signed(dr)?,
            at.col().checked_add_signed(dc)?,
        );
        self.grid.is_traversable(next).then_some(next)
    }

    fn best_neighbour(&self) -> Option<Coordinate> {
        Heading::ALL
            .iter()
            .filter_map(|&h| self.neighbour(self.position, h).map(|at| (h, at)))
            .filter(|(_, at)| !self.is_visited(*at))
            .min_by(|(ha, a), (hb, b)| {
                self.distance(*a)
                    .cmp(&self.distance(*b))
                    .then(self.heading.turns_to(*ha).cmp(&self.heading.turns_to(*hb)))
                    .then(self.values.get(*b).total_cmp(&self.values.get(*a)))
            })
            .map(|(_, at)| at)
    }

    /// Shortest route (excluding the current cell) to the first cell
    /// satisfying `goal`, searched breadth-first.
    fn route_to(&self, goal: impl Fn(Coordinate) -> bool) -> Option<Vec<Coordinate>> {
        let mut parent: HashMap<Coordinate, Coordinate> = HashMap::new();
        let mut seen = HashSet::from([self.position]);
        let mut queue = VecDeque::from([self.position]);

        while let Some(at) = queue.pop_front() {
            if at != self.position && goal(at) {
                let mut route = vec![at];
                let mut current = at;
                while let Some(&prev) = parent.get(&current) {
                    if prev == self.position {
                        break;
                    }
                    route.push(prev);
                    current = prev;
                }
                route.reverse();
                return Some(route);
            }
            for heading in self.heading.rotation() {
                if let Some(next) = self.neighbour(at, heading) {
                    if seen.insert(next) {
                        parent.insert(next, at);
                        queue.push_back(next);
                    }
                }
            }
        }
        None
    }

    fn step(&mut self, next: Coordinate) {
        let heading = Heading::between(self.position, next);
        self.cost += 1.0 + TURN_COST * f64::from(self.heading.turns_to(heading));
        self.heading = heading;
        self.position = next;
        self.path.push(next);

        let idx = next.row() * self.grid.cols + next.col();
        if !self.visited[idx] {
            self.visited[idx] = true;
            self.remaining -= 1;
        }
    }
}
