//! Direction selection for adversaries. Every chooser here only proposes a
//! desired direction; the shared movement step decides when it applies.

use rand::Rng;

use crate::constants::{AMBUSH_DISTANCE, FLEE_SAMPLE_STRIDE, INTERSECTION_TOLERANCE, PATROL_REROLL_SECS};
use crate::grid::{center_of, Grid};
use crate::movement::Mover;
use crate::types::{Cell, Direction, Vec2};

/// Horizontal delta taking the short way through the side tunnel when the
/// direct route is longer than half the grid.
pub fn wrap_delta(dx: f64, width: f64) -> f64 {
    if dx.abs() <= width / 2.0 {
        return dx;
    }
    if dx > 0.0 {
        dx - width
    } else {
        dx + width
    }
}

pub fn wrap_aware_delta(from: Vec2, to: Vec2, width: f64) -> (f64, f64) {
    (wrap_delta(to.x - from.x, width), to.y - from.y)
}

/// Axis directions that reduce the delta, strongest axis first. Inserted as
/// right, left, down, up so ties keep that order.
pub fn ranked_candidates(dx: f64, dy: f64) -> Vec<Direction> {
    let mut ranked: Vec<(Direction, f64)> = Vec::with_capacity(2);
    if dx > 0.0 {
        ranked.push((Direction::Right, dx.abs()));
    }
    if dx < 0.0 {
        ranked.push((Direction::Left, dx.abs()));
    }
    if dy > 0.0 {
        ranked.push((Direction::Down, dy.abs()));
    }
    if dy < 0.0 {
        ranked.push((Direction::Up, dy.abs()));
    }
    // sort_by is stable
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.into_iter().map(|(dir, _)| dir).collect()
}

/// Picks the best open direction for the given delta: no reversal first,
/// then reversal allowed, then the fixed fallback order.
pub fn steer(mover: &Mover, grid: &Grid, dx: f64, dy: f64) -> Option<Direction> {
    let reverse = mover.dir.opposite();
    let candidates = ranked_candidates(dx, dy);

    candidates
        .iter()
        .copied()
        .find(|&dir| dir != reverse && mover.can_move(grid, dir))
        .or_else(|| {
            candidates
                .iter()
                .copied()
                .find(|&dir| mover.can_move(grid, dir))
        })
        .or_else(|| {
            Direction::FALLBACK_ORDER
                .iter()
                .copied()
                .find(|&dir| mover.can_move(grid, dir))
        })
}

pub fn toward(mover: &Mover, grid: &Grid, target: Vec2) -> Option<Direction> {
    let (dx, dy) = wrap_aware_delta(mover.pos, target, grid.pixel_width());
    steer(mover, grid, dx, dy)
}

/// Open cell on a coarse sampling lattice farthest from `threat`. Falls back
/// to `own` when no sampled cell beats it.
pub fn flee_target(grid: &Grid, own: Vec2, threat: Vec2) -> Vec2 {
    let mut best = own;
    let mut best_distance = 0.0;
    for row in (0..grid.rows()).step_by(FLEE_SAMPLE_STRIDE) {
        for col in (0..grid.cols()).step_by(FLEE_SAMPLE_STRIDE) {
            if !grid.is_open(row, col) {
                continue;
            }
            let candidate = center_of(Cell::new(row, col));
            let distance = candidate.distance(threat);
            if distance > best_distance {
                best_distance = distance;
                best = candidate;
            }
        }
    }
    best
}

/// Flee by pursuing the farthest point. The raw delta is used: the flee
/// target always lies inside the grid.
pub fn away_from(mover: &Mover, grid: &Grid, threat: Vec2) -> (Option<Direction>, Vec2) {
    let target = flee_target(grid, mover.pos, threat);
    let dir = steer(mover, grid, target.x - mover.pos.x, target.y - mover.pos.y);
    (dir, target)
}

/// Point `AMBUSH_DISTANCE` ahead of the player along their facing.
pub fn ambush_point(player_pos: Vec2, player_dir: Direction) -> Vec2 {
    player_pos.offset(player_dir, AMBUSH_DISTANCE)
}

pub fn is_at_intersection(mover: &Mover, grid: &Grid) -> bool {
    let center = mover.cell_center();
    if (mover.pos.x - center.x).abs() > INTERSECTION_TOLERANCE
        || (mover.pos.y - center.y).abs() > INTERSECTION_TOLERANCE
    {
        return false;
    }
    let reverse = mover.dir.opposite();
    let exits = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ]
    .iter()
    .filter(|&&dir| dir != reverse && mover.can_move(grid, dir))
    .count();
    exits >= 2
}

pub fn should_recalculate(mover: &Mover, grid: &Grid) -> bool {
    if mover.dir == Direction::None || !mover.can_move(grid, mover.dir) {
        return true;
    }
    is_at_intersection(mover, grid)
}

/// Wandering state for long-range patrol and far-away fleeing.
#[derive(Clone, Debug)]
pub struct Patrol {
    dir: Direction,
    timer: f64,
}

impl Default for Patrol {
    fn default() -> Self {
        Self {
            dir: Direction::Right,
            timer: 0.0,
        }
    }
}

impl Patrol {
    pub fn tick(&mut self, dt: f64) {
        self.timer += dt;
    }

    /// Keeps the current wander direction unless the re-roll interval has
    /// passed or the mover is stopped or blocked.
    pub fn choose<R: Rng>(&mut self, mover: &Mover, grid: &Grid, rng: &mut R) -> Direction {
        let blocked = mover.dir == Direction::None || !mover.can_move(grid, mover.dir);
        if self.timer >= PATROL_REROLL_SECS || blocked {
            self.timer = 0.0;
            let reverse = mover.dir.opposite();
            let mut options: Vec<Direction> = Direction::FALLBACK_ORDER
                .iter()
                .copied()
                .filter(|&dir| dir != reverse && mover.can_move(grid, dir))
                .collect();
            if options.is_empty() {
                options = Direction::FALLBACK_ORDER
                    .iter()
                    .copied()
                    .filter(|&dir| mover.can_move(grid, dir))
                    .collect();
            }
            if !options.is_empty() {
                self.dir = options[rng.random_range(0..options.len())];
            }
        }
        self.dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{MAZE_COLS, TUNNEL_ROW};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn mover_at(row: i32, col: i32, dir: Direction) -> Mover {
        let mut mover = Mover::new(center_of(Cell::new(row, col)), 1.0);
        mover.dir = dir;
        mover
    }

    #[test]
    fn wrap_delta_takes_short_way_through_tunnel() {
        let width = 1000.0;
        assert_eq!(wrap_delta(600.0, width), -400.0);
        assert_eq!(wrap_delta(-600.0, width), 400.0);
        assert_eq!(wrap_delta(500.0, width), 500.0);
        assert_eq!(wrap_delta(-120.0, width), -120.0);
    }

    #[test]
    fn wrap_aware_delta_leaves_vertical_alone() {
        let (dx, dy) = wrap_aware_delta(Vec2::new(20.0, 20.0), Vec2::new(980.0, 500.0), 1000.0);
        assert_eq!(dx, -40.0);
        assert_eq!(dy, 480.0);
    }

    #[test]
    fn candidates_sorted_by_magnitude_with_stable_ties() {
        assert_eq!(
            ranked_candidates(10.0, -40.0),
            vec![Direction::Up, Direction::Right]
        );
        assert_eq!(
            ranked_candidates(-30.0, 30.0),
            vec![Direction::Left, Direction::Down]
        );
        assert!(ranked_candidates(0.0, 0.0).is_empty());
    }

    #[test]
    fn steer_avoids_reversal_when_possible() {
        let grid = Grid::default_layout();
        // row 1 col 4: open left, right and down
        let mover = mover_at(1, 4, Direction::Right);
        // target is behind and below, horizontal delta dominates
        assert_eq!(steer(&mover, &grid, -200.0, 40.0), Some(Direction::Down));
    }

    #[test]
    fn steer_reverses_when_only_candidate_is_behind() {
        let grid = Grid::default_layout();
        // row 3 col 1 is a vertical corridor, only up and down are open
        let mover = mover_at(3, 1, Direction::Down);
        assert_eq!(steer(&mover, &grid, 0.0, -80.0), Some(Direction::Up));
    }

    #[test]
    fn steer_uses_fallback_order_when_candidates_blocked() {
        let grid = Grid::default_layout();
        // target straight up into the top wall
        let mover = mover_at(1, 1, Direction::None);
        assert_eq!(steer(&mover, &grid, 0.0, -40.0), Some(Direction::Right));
    }

    #[test]
    fn toward_prefers_tunnel_when_shorter() {
        let grid = Grid::default_layout();
        let mover = mover_at(TUNNEL_ROW, 1, Direction::None);
        let target = center_of(Cell::new(TUNNEL_ROW, MAZE_COLS - 2));
        assert_eq!(toward(&mover, &grid, target), Some(Direction::Left));
    }

    #[test]
    fn flee_target_is_far_sampled_open_cell() {
        let grid = Grid::default_layout();
        let threat = center_of(Cell::new(1, 1));
        let target = flee_target(&grid, threat, threat);
        let cell = grid.cell_at(target);
        assert_eq!(cell.row % 2, 0);
        assert_eq!(cell.col % 2, 0);
        assert!(grid.is_open(cell.row, cell.col));
        assert!(target.distance(threat) > 700.0);
    }

    #[test]
    fn flee_target_falls_back_to_own_position() {
        let grid = Grid::from_tiles(&["###", "#.#", "###"]);
        let own = center_of(Cell::new(1, 1));
        assert_eq!(flee_target(&grid, own, Vec2::new(0.0, 0.0)), own);
    }

    #[test]
    fn ambush_point_projects_ahead_of_player() {
        let player = Vec2::new(300.0, 260.0);
        assert_eq!(ambush_point(player, Direction::Left), Vec2::new(100.0, 260.0));
        assert_eq!(ambush_point(player, Direction::None), player);
    }

    #[test]
    fn corridor_cell_is_not_an_intersection() {
        let grid = Grid::default_layout();
        // row 1 col 2: only left and right are open
        let mover = mover_at(1, 2, Direction::Right);
        assert!(!is_at_intersection(&mover, &grid));
        assert!(!should_recalculate(&mover, &grid));

        // row 1 col 4 branches downward
        let junction = mover_at(1, 4, Direction::Right);
        assert!(is_at_intersection(&junction, &grid));
    }

    #[test]
    fn off_center_is_never_an_intersection() {
        let grid = Grid::default_layout();
        let mut mover = mover_at(1, 4, Direction::Right);
        mover.pos.x += 3.5;
        assert!(!is_at_intersection(&mover, &grid));
    }

    #[test]
    fn stopped_or_blocked_always_recalculates() {
        let grid = Grid::default_layout();
        assert!(should_recalculate(&mover_at(1, 2, Direction::None), &grid));
        assert!(should_recalculate(&mover_at(1, 1, Direction::Up), &grid));
    }

    #[test]
    fn patrol_keeps_direction_until_reroll() {
        let grid = Grid::default_layout();
        let mut rng = StdRng::seed_from_u64(7);
        let mut patrol = Patrol::default();
        let mover = mover_at(1, 2, Direction::Right);
        assert_eq!(patrol.choose(&mover, &grid, &mut rng), Direction::Right);
        patrol.tick(2.0);
        // corridor heading right: left is the reverse, so right is the only option
        assert_eq!(patrol.choose(&mover, &grid, &mut rng), Direction::Right);
    }

    #[test]
    fn patrol_reroll_picks_open_non_reverse_direction() {
        let grid = Grid::default_layout();
        let mut rng = StdRng::seed_from_u64(11);
        let mover = mover_at(1, 4, Direction::Right);
        for _ in 0..20 {
            let mut patrol = Patrol::default();
            patrol.tick(PATROL_REROLL_SECS);
            let dir = patrol.choose(&mover, &grid, &mut rng);
            assert!(matches!(dir, Direction::Right | Direction::Down));
        }
    }

    #[test]
    fn patrol_allows_reverse_in_dead_end() {
        let grid = Grid::from_tiles(&["###", "#.#", "#.#", "###"]).with_tunnel_row(-1);
        let mut rng = StdRng::seed_from_u64(3);
        let mut patrol = Patrol::default();
        let mover = mover_at(2, 1, Direction::Down);
        assert_eq!(patrol.choose(&mover, &grid, &mut rng), Direction::Up);
    }
}
