use crate::collectibles::{place_pellets, Pellet};
use crate::grid::Grid;
use crate::types::{Cell, PelletKind, PelletView, Vec2};

/// What one proximity sweep picked up.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PickupReport {
    pub tokens: Vec<Cell>,
    pub power_pellets: Vec<Cell>,
    pub points: u32,
}

impl PickupReport {
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty() && self.power_pellets.is_empty()
    }
}

/// Score and pellet bookkeeping for one level. The score itself carries
/// across levels through [`SessionState::next_level`].
#[derive(Clone, Debug, Default)]
pub struct SessionState {
    score: u32,
    pellets: Vec<Pellet>,
    tokens_total: u32,
    tokens_collected: u32,
    power_collected: u32,
    pending_power_pickups: u32,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_level(grid: &Grid, spawn: Cell) -> Self {
        let mut session = Self::new();
        session.load_pellets(grid, spawn);
        session
    }

    /// Fresh pellets for the next level, same score.
    pub fn next_level(&self, grid: &Grid, spawn: Cell) -> Self {
        let mut session = Self::for_level(grid, spawn);
        session.score = self.score;
        session
    }

    fn load_pellets(&mut self, grid: &Grid, spawn: Cell) {
        for pellet in place_pellets(grid, spawn) {
            match pellet.kind {
                PelletKind::Token => self.add_token(pellet.cell),
                PelletKind::Power => self.add_power_pellet(pellet.cell),
            }
        }
    }

    pub fn add_token(&mut self, cell: Cell) {
        self.pellets.push(Pellet::new(cell, PelletKind::Token));
        self.tokens_total += 1;
    }

    pub fn add_power_pellet(&mut self, cell: Cell) {
        self.pellets.push(Pellet::new(cell, PelletKind::Power));
    }

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn tokens_total(&self) -> u32 {
        self.tokens_total
    }

    pub fn tokens_collected(&self) -> u32 {
        self.tokens_collected
    }

    pub fn power_collected(&self) -> u32 {
        self.power_collected
    }

    pub fn is_won(&self) -> bool {
        self.tokens_collected == self.tokens_total
    }

    /// Collects every pellet within reach of `pos`. Already collected pellets
    /// are skipped, so repeated sweeps never double count.
    pub fn collect_at(&mut self, pos: Vec2) -> PickupReport {
        let mut report = PickupReport::default();
        for pellet in self.pellets.iter_mut() {
            if !pellet.try_collect(pos) {
                continue;
            }
            report.points += pellet.points();
            match pellet.kind {
                PelletKind::Token => report.tokens.push(pellet.cell),
                PelletKind::Power => report.power_pellets.push(pellet.cell),
            }
        }

        self.tokens_collected += report.tokens.len() as u32;
        self.power_collected += report.power_pellets.len() as u32;
        self.pending_power_pickups += report.power_pellets.len() as u32;
        self.add_score(report.points);
        report
    }

    /// Power pickups since the previous call. The frame loop uses this to
    /// notify adversaries exactly once per pickup.
    pub fn drain_power_pickups(&mut self) -> u32 {
        std::mem::take(&mut self.pending_power_pickups)
    }

    pub fn remaining_pellets(&self) -> impl Iterator<Item = &Pellet> + '_ {
        self.pellets.iter().filter(|pellet| !pellet.collected)
    }

    pub fn pellet_views(&self) -> Vec<PelletView> {
        self.remaining_pellets().map(Pellet::view).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::center_of;

    #[test]
    fn single_token_pickup_wins() {
        let mut session = SessionState::new();
        session.add_token(Cell::new(5, 10));
        let report = session.collect_at(center_of(Cell::new(5, 10)));
        assert_eq!(report.tokens, vec![Cell::new(5, 10)]);
        assert_eq!(session.score(), 10);
        assert_eq!(session.tokens_collected(), session.tokens_total());
        assert!(session.is_won());
    }

    #[test]
    fn repeated_sweep_does_not_double_count() {
        let mut session = SessionState::new();
        session.add_token(Cell::new(5, 10));
        session.add_token(Cell::new(5, 12));
        let pos = center_of(Cell::new(5, 10));
        session.collect_at(pos);
        let second = session.collect_at(pos);
        assert!(second.is_empty());
        assert_eq!(session.score(), 10);
        assert_eq!(session.tokens_collected(), 1);
        assert!(!session.is_won());
    }

    #[test]
    fn power_pickups_drain_once() {
        let mut session = SessionState::new();
        session.add_token(Cell::new(1, 1));
        session.add_power_pellet(Cell::new(1, 1));
        let report = session.collect_at(center_of(Cell::new(1, 1)));
        assert_eq!(report.points, 60);
        assert_eq!(session.drain_power_pickups(), 1);
        assert_eq!(session.drain_power_pickups(), 0);
        assert_eq!(session.power_collected(), 1);
    }

    #[test]
    fn power_pellets_do_not_count_toward_win() {
        let mut session = SessionState::new();
        session.add_token(Cell::new(3, 3));
        session.add_power_pellet(Cell::new(1, 1));
        session.collect_at(center_of(Cell::new(3, 3)));
        assert!(session.is_won());
        assert_eq!(session.pellet_views().len(), 1);
    }

    #[test]
    fn next_level_keeps_score_and_resets_pellets() {
        let grid = Grid::default_layout();
        let spawn = Cell::new(9, 12);
        let mut session = SessionState::for_level(&grid, spawn);
        let total = session.tokens_total();
        assert!(total > 100);
        session.add_score(1234);

        let next = session.next_level(&grid, spawn);
        assert_eq!(next.score(), 1234);
        assert_eq!(next.tokens_collected(), 0);
        assert_eq!(next.tokens_total(), total);
    }
}
