use crate::models::{Coordinate, Matrix};

/// Cells whose value falls below this are masked out of the preferred attempt.
pub const DEFAULT_VALUE_THRESHOLD: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    Free,
    Obstacle,
    Start,
}

impl CellState {
    /// Integer marker used on the wire: 0 free, 1 obstacle, 2 start.
    pub fn code(self) -> u8 {
        match self {
            CellState::Free => 0,
            CellState::Obstacle => 1,
            CellState::Start => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OccupancyGrid {
    pub rows: usize,
    pub cols: usize,
    pub cells: Matrix<CellState>,
}

impl OccupancyGrid {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![vec![CellState::Free; cols]; rows],
        }
    }

    pub fn contains(&self, row: i64, col: i64) -> bool {
        row >= 0 && col >= 0 && (row as u64) < self.rows as u64 && (col as u64) < self.cols as u64
    }

    pub fn get(&self, at: Coordinate) -> Option<CellState> {
        self.cells.get(at.row()).and_then(|r| r.get(at.col())).copied()
    }

    pub fn set(&mut self, at: Coordinate, state: CellState) {
        if let Some(cell) = self.cells.get_mut(at.row()).and_then(|r| r.get_mut(at.col())) {
            *cell = state;
        }
    }

    /// True for every in-bounds cell that is not an obstacle.
    pub fn is_traversable(&self, at: Coordinate) -> bool {
        matches!(self.get(at), Some(CellState::Free | CellState::Start))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coordinate, CellState)> + '_ {
        self.cells.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .map(move |(c, state)| (Coordinate(r, c), *state))
        })
    }

    /// Location of the first start cell in row-major order.
    pub fn start(&self) -> Option<Coordinate> {
        self.iter()
            .find(|(_, state)| *state == CellState::Start)
            .map(|(at, _)| at)
    }

    pub fn count(&self, state: CellState) -> usize {
        self.iter().filter(|(_, s)| *s == state).count()
    }

    /// Derives the grid used by the preferred attempt: every free cell whose
    /// value is below `threshold` becomes an obstacle. Start and existing
    /// obstacles are left untouched.
    pub fn preferred(&self, values: &ValueMatrix, threshold: f64) -> OccupancyGrid {
        let mut masked = self.clone();
        for (at, state) in self.iter() {
            if state == CellState::Free && values.get(at) < threshold {
                masked.set(at, CellState::Obstacle);
            }
        }
        masked
    }

    pub fn codes(&self) -> Matrix<u8> {
        self.cells
            .iter()
            .map(|row| row.iter().map(|s| s.code()).collect())
            .collect()
    }
}

/// Per-cell desirability scores, same shape as the grid they describe.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueMatrix {
    pub rows: usize,
    pub cols: usize,
    pub values: Matrix<f64>,
}

impl ValueMatrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            values: vec![vec![0.0; cols]; rows],
        }
    }

    /// Builds a matrix from row-major data. Returns `None` for ragged input.
    pub fn from_rows(values: Matrix<f64>) -> Option<Self> {
        let rows = values.len();
        let cols = values.first().map_or(0, Vec::len);
        if values.iter().any(|row| row.len() != cols) {
            return None;
        }
        Some(Self { rows, cols, values })
    }

    /// Value at `at`, or 0.0 outside the matrix.
    pub fn get(&self, at: Coordinate) -> f64 {
        self.values
            .get(at.row())
            .and_then(|r| r.get(at.col()))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn matches(&self, grid: &OccupancyGrid) -> bool {
        self.rows == grid.rows && self.cols == grid.cols
    }
}
