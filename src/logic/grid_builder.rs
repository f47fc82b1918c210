use crate::models::{
    grid::{CellState, OccupancyGrid},
    request::{PlanRequest, RequestError},
    Coordinate,
};

/// Upper bound on `rows * cols` accepted from a request.
pub const MAX_GRID_CELLS: usize = 1_000_000;

/// Builds the occupancy grid for a validated request.
///
/// Obstacles outside the grid are dropped silently; a start outside the grid
/// is rejected. The start cell is marked last, so it wins over an obstacle
/// declared on the same cell.
pub fn build_grid(request: &PlanRequest) -> Result<OccupancyGrid, RequestError> {
    match request.rows.checked_mul(request.cols) {
        Some(cells) if cells <= MAX_GRID_CELLS => {}
        _ => return Err(RequestError::InvalidParameters),
    }

    let mut grid = OccupancyGrid::new(request.rows, request.cols);
    let (start_row, start_col) = request.start;
    if !grid.contains(start_row, start_col) {
        return Err(RequestError::StartOutOfBounds);
    }

    for &(r, c) in &request.obstacles {
        if grid.contains(r, c) {
            grid.set(Coordinate(r as usize, c as usize), CellState::Obstacle);
        }
    }
    grid.set(
        Coordinate(start_row as usize, start_col as usize),
        CellState::Start,
    );
    Ok(grid)
}
