use crate::grid::Grid;
use crate::types::{Cell, Direction};

/// Non-finite and negative deltas become zero, large ones are capped.
pub(super) fn sanitize_dt(dt: f64, max: f64) -> f64 {
    if !dt.is_finite() {
        return 0.0;
    }
    dt.clamp(0.0, max)
}

pub(super) fn adversary_id(index: usize) -> String {
    format!("adversary_{}", index + 1)
}

/// Neighbor cell for path searches, wrapping through the tunnel row. Walls
/// and out-of-bounds cells yield `None`.
pub(super) fn walkable_neighbor(grid: &Grid, cell: Cell, dir: Direction) -> Option<Cell> {
    let mut next = dir.step_cell(cell);
    if next.row == grid.tunnel_row() {
        if next.col < 0 {
            next.col = grid.cols() - 1;
        } else if next.col >= grid.cols() {
            next.col = 0;
        }
    }
    grid.is_open(next.row, next.col).then_some(next)
}
