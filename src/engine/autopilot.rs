use std::collections::{HashSet, VecDeque};

use super::*;

use super::utils::walkable_neighbor;

/// Cells within this Chebyshev distance of a pursuing adversary are avoided
/// when another route exists.
const DANGER_RADIUS: i32 = 1;

impl GameEngine {
    /// Input for the headless driver: first step of a breadth-first path to
    /// the nearest uncollected pellet. `None` keeps the current buffered turn.
    pub fn autopilot_direction(&self) -> Option<Direction> {
        let start = self.player.cell();
        if !self.grid.is_open(start.row, start.col) {
            return None;
        }

        let targets: HashSet<Cell> = self
            .session
            .remaining_pellets()
            .map(|pellet| pellet.cell)
            .collect();
        if targets.is_empty() {
            return None;
        }
        if targets.contains(&start) && self.player.dir() != Direction::None {
            return Some(self.player.dir());
        }

        let danger = self.danger_cells();
        first_step(&self.grid, start, &targets, &danger)
            .or_else(|| first_step(&self.grid, start, &targets, &HashSet::new()))
    }

    fn danger_cells(&self) -> HashSet<Cell> {
        let mut cells = HashSet::new();
        for adversary in &self.adversaries {
            if adversary.state() != AdversaryState::Pursuing {
                continue;
            }
            let center = self.grid.cell_at(adversary.pos());
            for dr in -DANGER_RADIUS..=DANGER_RADIUS {
                for dc in -DANGER_RADIUS..=DANGER_RADIUS {
                    cells.insert(Cell::new(center.row + dr, center.col + dc));
                }
            }
        }
        cells
    }
}

fn first_step(
    grid: &Grid,
    start: Cell,
    targets: &HashSet<Cell>,
    blocked: &HashSet<Cell>,
) -> Option<Direction> {
    let mut visited = HashSet::from([start]);
    let mut queue: VecDeque<(Cell, Direction)> = VecDeque::new();

    for dir in Direction::FALLBACK_ORDER {
        let Some(next) = walkable_neighbor(grid, start, dir) else {
            continue;
        };
        if blocked.contains(&next) || !visited.insert(next) {
            continue;
        }
        if targets.contains(&next) {
            return Some(dir);
        }
        queue.push_back((next, dir));
    }

    while let Some((cell, first)) = queue.pop_front() {
        for dir in Direction::FALLBACK_ORDER {
            let Some(next) = walkable_neighbor(grid, cell, dir) else {
                continue;
            };
            if blocked.contains(&next) || !visited.insert(next) {
                continue;
            }
            if targets.contains(&next) {
                return Some(first);
            }
            queue.push_back((next, first));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use crate::engine::{EngineOptions, GameEngine};
    use crate::grid::{center_of, Grid};
    use crate::session::SessionState;
    use crate::types::{Cell, Direction};

    fn engine_with_single_token(token: Cell) -> GameEngine {
        let mut engine = GameEngine::new(Grid::default_layout(), EngineOptions::default());
        let mut session = SessionState::new();
        session.add_token(token);
        engine.session = session;
        engine.player.mover.pos = center_of(Cell::new(1, 1));
        for adversary in engine.adversaries.iter_mut() {
            adversary.mover.pos = center_of(Cell::new(11, 23));
        }
        engine
    }

    #[test]
    fn heads_toward_nearest_pellet() {
        let engine = engine_with_single_token(Cell::new(1, 5));
        assert_eq!(engine.autopilot_direction(), Some(Direction::Right));
    }

    #[test]
    fn detours_around_pursuing_adversary() {
        let mut engine = engine_with_single_token(Cell::new(1, 5));
        engine.adversaries[0].mover.pos = center_of(Cell::new(1, 3));
        assert_eq!(engine.autopilot_direction(), Some(Direction::Down));
    }

    #[test]
    fn fleeing_adversary_is_not_avoided() {
        let mut engine = engine_with_single_token(Cell::new(1, 5));
        engine.adversaries[0].mover.pos = center_of(Cell::new(1, 3));
        engine.adversaries[0].frighten();
        assert_eq!(engine.autopilot_direction(), Some(Direction::Right));
    }

    #[test]
    fn no_pellets_means_no_input() {
        let mut engine = engine_with_single_token(Cell::new(1, 5));
        engine.session = SessionState::new();
        assert_eq!(engine.autopilot_direction(), None);
    }
}
