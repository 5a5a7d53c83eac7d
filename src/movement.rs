//! Grid-aligned movement shared by the player and the adversaries.
//!
//! Turning and advancing are separate steps: a buffered turn is applied only
//! once the mover is within [`ALIGNMENT_TOLERANCE`] of the cell centerline
//! and the neighbor cell is open, and advancing tests the full step with a
//! single [`Grid::can_occupy`] query.

use crate::constants::ALIGNMENT_TOLERANCE;
use crate::grid::{cell_center, cell_index, Grid};
use crate::types::{Cell, Direction, Vec2};

#[derive(Clone, Debug)]
pub struct Mover {
    pub pos: Vec2,
    pub dir: Direction,
    pub desired_dir: Direction,
    pub speed_multiplier: f64,
}

impl Mover {
    pub fn new(pos: Vec2, speed_multiplier: f64) -> Self {
        Self {
            pos,
            dir: Direction::None,
            desired_dir: Direction::None,
            speed_multiplier,
        }
    }

    pub fn cell(&self) -> Cell {
        Cell::new(cell_index(self.pos.y), cell_index(self.pos.x))
    }

    pub fn cell_center(&self) -> Vec2 {
        let cell = self.cell();
        Vec2::new(cell_center(cell.col), cell_center(cell.row))
    }

    /// One movement update at `speed` px/s.
    pub fn step(&mut self, grid: &Grid, speed: f64, dt: f64) {
        let cell = self.cell();
        let center = self.cell_center();

        if self.desired_dir != Direction::None && self.desired_dir != self.dir {
            self.attempt_turn(grid, cell, center);
        }
        self.attempt_advance(grid, center, speed, dt);
    }

    pub fn is_aligned_for(&self, dir: Direction, center: Vec2) -> bool {
        if dir.is_horizontal() {
            return (self.pos.y - center.y).abs() < ALIGNMENT_TOLERANCE;
        }
        if dir.is_vertical() {
            return (self.pos.x - center.x).abs() < ALIGNMENT_TOLERANCE;
        }
        false
    }

    /// Perpendicular offset from the current cell's centerline.
    pub fn off_axis_error(&self) -> f64 {
        let center = self.cell_center();
        if self.dir.is_horizontal() {
            return (self.pos.y - center.y).abs();
        }
        if self.dir.is_vertical() {
            return (self.pos.x - center.x).abs();
        }
        0.0
    }

    fn attempt_turn(&mut self, grid: &Grid, cell: Cell, center: Vec2) {
        let next = self.desired_dir.step_cell(cell);
        if !self.is_aligned_for(self.desired_dir, center) || !grid.is_cell_open_or_tunnel(next) {
            return;
        }
        if self.desired_dir.is_horizontal() {
            self.pos.y = center.y;
        } else {
            self.pos.x = center.x;
        }
        self.dir = self.desired_dir;
    }

    fn attempt_advance(&mut self, grid: &Grid, center: Vec2, speed: f64, dt: f64) {
        if self.dir == Direction::None {
            return;
        }
        let candidate = self.pos.offset(self.dir, speed * dt);
        if grid.can_occupy(candidate.x, candidate.y) {
            self.pos = candidate;
            self.snap_if_close(center);
        } else {
            self.dir = Direction::None;
        }
    }

    fn snap_if_close(&mut self, center: Vec2) {
        if self.dir.is_horizontal() && (self.pos.y - center.y).abs() < ALIGNMENT_TOLERANCE {
            self.pos.y = center.y;
        }
        if self.dir.is_vertical() && (self.pos.x - center.x).abs() < ALIGNMENT_TOLERANCE {
            self.pos.x = center.x;
        }
    }

    /// Teleports through the side tunnel once the mover has fully left the
    /// grid on the tunnel row. Direction is preserved.
    pub fn wrap_tunnel(&mut self, grid: &Grid) {
        let cell = self.cell();
        if cell.row != grid.tunnel_row() {
            return;
        }
        let last = grid.cols() - 1;
        if cell.col < 0 {
            let target = if grid.is_open(cell.row, last) { last } else { 0 };
            self.pos.x = cell_center(target);
        } else if cell.col > last {
            let target = if grid.is_open(cell.row, 0) { 0 } else { last };
            self.pos.x = cell_center(target);
        }
    }

    pub fn can_move(&self, grid: &Grid, dir: Direction) -> bool {
        if dir == Direction::None {
            return false;
        }
        grid.is_cell_open_or_tunnel(dir.step_cell(self.cell()))
    }
}

/// Period-based frame alternation for renderers.
#[derive(Clone, Debug)]
pub struct AnimationClock {
    period: f64,
    frames: u8,
    timer: f64,
    frame: u8,
}

impl AnimationClock {
    pub fn new(period: f64, frames: u8) -> Self {
        Self {
            period,
            frames: frames.max(1),
            timer: 0.0,
            frame: 0,
        }
    }

    pub fn tick(&mut self, dt: f64) {
        self.timer += dt;
        if self.timer > self.period {
            self.frame = (self.frame + 1) % self.frames;
            self.timer = 0.0;
        }
    }

    pub fn frame(&self) -> u8 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{BASE_SPEED, CELL_SIZE, DEFAULT_FRAME_DELTA, TUNNEL_ROW};
    use crate::grid::center_of;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    fn mover_at(row: i32, col: i32) -> Mover {
        Mover::new(center_of(Cell::new(row, col)), 1.0)
    }

    #[test]
    fn idle_mover_does_not_move() {
        let grid = Grid::default_layout();
        let mut mover = mover_at(1, 1);
        mover.step(&grid, BASE_SPEED, DEFAULT_FRAME_DELTA);
        assert_eq!(mover.pos, center_of(Cell::new(1, 1)));
        assert_eq!(mover.dir, Direction::None);
    }

    #[test]
    fn buffered_turn_applies_and_advances() {
        let grid = Grid::default_layout();
        let mut mover = mover_at(1, 1);
        mover.desired_dir = Direction::Right;
        mover.step(&grid, BASE_SPEED, DEFAULT_FRAME_DELTA);
        assert_eq!(mover.dir, Direction::Right);
        assert!(approx_eq(mover.pos.x, 62.0, 1e-9));
        assert_eq!(mover.pos.y, 60.0);
    }

    #[test]
    fn turn_into_wall_is_ignored() {
        let grid = Grid::default_layout();
        let mut mover = mover_at(1, 1);
        mover.desired_dir = Direction::Up;
        mover.step(&grid, BASE_SPEED, DEFAULT_FRAME_DELTA);
        assert_eq!(mover.dir, Direction::None);
        assert_eq!(mover.pos, center_of(Cell::new(1, 1)));
    }

    #[test]
    fn queued_turn_waits_for_alignment() {
        let grid = Grid::default_layout();
        // moving right along row 1 toward column 4, which opens downward
        let mut mover = mover_at(1, 2);
        mover.dir = Direction::Right;
        mover.desired_dir = Direction::Down;
        let mut turned_at = None;
        for _ in 0..120 {
            mover.step(&grid, BASE_SPEED, DEFAULT_FRAME_DELTA);
            if mover.dir == Direction::Down {
                turned_at = Some(mover.pos);
                break;
            }
        }
        let turned_at = turned_at.expect("turn applied");
        assert_eq!(turned_at.x, cell_center(4));
    }

    #[test]
    fn blocked_advance_stops_without_bounce() {
        let grid = Grid::default_layout();
        let mut mover = mover_at(1, 10);
        mover.desired_dir = Direction::Right;
        for _ in 0..120 {
            mover.step(&grid, BASE_SPEED, DEFAULT_FRAME_DELTA);
        }
        assert_eq!(mover.dir, Direction::None);
        assert_eq!(mover.cell(), Cell::new(1, 11));
        assert!(mover.pos.x <= cell_center(11) + 2.0);
    }

    #[test]
    fn perpendicular_axis_stays_on_centerline_while_moving() {
        let grid = Grid::default_layout();
        let mut mover = mover_at(1, 1);
        let script = [
            Direction::Right,
            Direction::Down,
            Direction::Left,
            Direction::Up,
            Direction::Right,
        ];
        for (idx, dir) in script.iter().cycle().take(40).enumerate() {
            mover.desired_dir = *dir;
            for _ in 0..(17 + idx % 7) {
                mover.step(&grid, BASE_SPEED * 1.25, DEFAULT_FRAME_DELTA);
                if mover.dir != Direction::None {
                    assert!(mover.off_axis_error() < ALIGNMENT_TOLERANCE);
                }
            }
        }
    }

    #[test]
    fn large_step_into_wall_fails_whole_step() {
        let grid = Grid::default_layout();
        let mut mover = mover_at(1, 10);
        mover.dir = Direction::Right;
        // one step larger than the remaining clearance
        mover.step(&grid, BASE_SPEED, 1.5 * CELL_SIZE / BASE_SPEED);
        assert_eq!(mover.dir, Direction::None);
        assert_eq!(mover.pos, center_of(Cell::new(1, 10)));
    }

    #[test]
    fn wrap_tunnel_teleports_to_opposite_edge() {
        let grid = Grid::default_layout();
        let mut mover = mover_at(TUNNEL_ROW, 0);
        mover.dir = Direction::Left;
        mover.pos.x = -1.0;
        mover.wrap_tunnel(&grid);
        assert_eq!(mover.pos.x, cell_center(grid.cols() - 1));
        assert_eq!(mover.dir, Direction::Left);

        mover.pos.x = grid.pixel_width() + 1.0;
        mover.wrap_tunnel(&grid);
        assert_eq!(mover.pos.x, cell_center(0));
    }

    #[test]
    fn wrap_tunnel_falls_back_to_same_edge_when_far_side_closed() {
        let grid = Grid::from_tiles(&["####", "...#", "####"]).with_tunnel_row(1);
        let mut mover = mover_at(1, 0);
        mover.pos.x = -1.0;
        mover.wrap_tunnel(&grid);
        assert_eq!(mover.pos.x, cell_center(0));
    }

    #[test]
    fn walking_left_through_tunnel_reappears_on_right() {
        let grid = Grid::default_layout();
        let mut mover = mover_at(TUNNEL_ROW, 1);
        mover.desired_dir = Direction::Left;
        let mut wrapped = false;
        for _ in 0..60 {
            mover.step(&grid, BASE_SPEED, DEFAULT_FRAME_DELTA);
            mover.wrap_tunnel(&grid);
            if mover.pos.x > grid.pixel_width() / 2.0 {
                wrapped = true;
                break;
            }
        }
        assert!(wrapped);
        assert_eq!(mover.dir, Direction::Left);
    }

    #[test]
    fn animation_clock_cycles_frames() {
        let mut clock = AnimationClock::new(0.1, 3);
        for _ in 0..7 {
            clock.tick(1.0 / 60.0);
        }
        assert_eq!(clock.frame(), 1);
        for _ in 0..14 {
            clock.tick(1.0 / 60.0);
        }
        assert_eq!(clock.frame(), 0);
    }
}
