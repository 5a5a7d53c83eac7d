use rand::Rng;
use tracing::debug;

use crate::constants::{
    BONUS_KINDS, BONUS_PICKUP_DISTANCE, BONUS_POINTS, BONUS_POPUP_SECS, BONUS_SPAWN_INTERVAL_SECS,
    BONUS_VISIBLE_SECS, POWER_PELLET_PICKUP_DISTANCE, POWER_PELLET_POINTS, TOKEN_PICKUP_DISTANCE,
    TOKEN_POINTS,
};
use crate::grid::{center_of, Grid};
use crate::types::{BonusView, Cell, PelletKind, PelletView, Vec2};

#[derive(Clone, Debug)]
pub struct Pellet {
    pub cell: Cell,
    pub kind: PelletKind,
    pub collected: bool,
}

impl Pellet {
    pub fn new(cell: Cell, kind: PelletKind) -> Self {
        Self {
            cell,
            kind,
            collected: false,
        }
    }

    pub fn pos(&self) -> Vec2 {
        center_of(self.cell)
    }

    pub fn points(&self) -> u32 {
        match self.kind {
            PelletKind::Token => TOKEN_POINTS,
            PelletKind::Power => POWER_PELLET_POINTS,
        }
    }

    pub fn pickup_distance(&self) -> f64 {
        match self.kind {
            PelletKind::Token => TOKEN_PICKUP_DISTANCE,
            PelletKind::Power => POWER_PELLET_PICKUP_DISTANCE,
        }
    }

    /// Marks the pellet collected when `pos` is within reach. A pellet is
    /// collected at most once.
    pub fn try_collect(&mut self, pos: Vec2) -> bool {
        if self.collected || self.pos().distance(pos) > self.pickup_distance() {
            return false;
        }
        self.collected = true;
        true
    }

    pub fn view(&self) -> PelletView {
        PelletView {
            row: self.cell.row,
            col: self.cell.col,
            kind: self.kind,
        }
    }
}

/// Tokens on every open cell outside the spawn neighborhood, power pellets on
/// the four inner corners.
pub fn place_pellets(grid: &Grid, spawn: Cell) -> Vec<Pellet> {
    let mut pellets: Vec<Pellet> = grid
        .open_cells()
        .filter(|cell| cell.chebyshev(spawn) > 1)
        .map(|cell| Pellet::new(cell, PelletKind::Token))
        .collect();

    let last_row = grid.rows() - 2;
    let last_col = grid.cols() - 2;
    for corner in [
        Cell::new(1, 1),
        Cell::new(1, last_col),
        Cell::new(last_row, 1),
        Cell::new(last_row, last_col),
    ] {
        if grid.is_open(corner.row, corner.col) {
            pellets.push(Pellet::new(corner, PelletKind::Power));
        }
    }
    pellets
}

#[derive(Clone, Debug, PartialEq)]
pub enum BonusEvent {
    Spawned { kind: u8, pos: Vec2 },
    Expired,
}

/// Timed bonus item. The pickup popup is purely presentational and never
/// holds back the next spawn countdown.
#[derive(Clone, Debug)]
pub struct BonusItem {
    active: bool,
    kind: u8,
    pos: Vec2,
    spawn_timer: f64,
    visible_timer: f64,
    popup: Option<(Vec2, f64)>,
}

impl Default for BonusItem {
    fn default() -> Self {
        Self {
            active: false,
            kind: 0,
            pos: Vec2::default(),
            spawn_timer: BONUS_SPAWN_INTERVAL_SECS,
            visible_timer: 0.0,
            popup: None,
        }
    }
}

impl BonusItem {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn kind(&self) -> u8 {
        self.kind
    }

    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    pub fn popup_at(&self) -> Option<Vec2> {
        self.popup.map(|(pos, _)| pos)
    }

    pub fn update<R: Rng>(&mut self, grid: &Grid, dt: f64, rng: &mut R) -> Option<BonusEvent> {
        if let Some((pos, remaining)) = self.popup {
            let remaining = remaining - dt;
            self.popup = (remaining > 0.0).then_some((pos, remaining));
        }

        if self.active {
            self.visible_timer += dt;
            if self.visible_timer >= BONUS_VISIBLE_SECS {
                self.active = false;
                self.spawn_timer = BONUS_SPAWN_INTERVAL_SECS;
                return Some(BonusEvent::Expired);
            }
            return None;
        }

        self.spawn_timer -= dt;
        if self.spawn_timer > 0.0 {
            return None;
        }
        self.spawn_timer = BONUS_SPAWN_INTERVAL_SECS;
        self.spawn(grid, rng)
    }

    fn spawn<R: Rng>(&mut self, grid: &Grid, rng: &mut R) -> Option<BonusEvent> {
        let cells: Vec<Cell> = grid.open_cells().collect();
        if cells.is_empty() {
            return None;
        }
        self.kind = rng.random_range(0..BONUS_KINDS);
        let cell = cells[rng.random_range(0..cells.len())];
        self.pos = center_of(cell);
        self.active = true;
        self.visible_timer = 0.0;
        debug!(kind = self.kind, row = cell.row, col = cell.col, "bonus item spawned");
        Some(BonusEvent::Spawned {
            kind: self.kind,
            pos: self.pos,
        })
    }

    /// Returns the points earned when the player reaches an active item.
    pub fn try_collect(&mut self, player: Vec2) -> Option<u32> {
        if !self.active || self.pos.distance(player) > BONUS_PICKUP_DISTANCE {
            return None;
        }
        self.active = false;
        self.spawn_timer = BONUS_SPAWN_INTERVAL_SECS;
        self.popup = Some((self.pos, BONUS_POPUP_SECS));
        Some(BONUS_POINTS)
    }

    pub fn view(&self) -> BonusView {
        BonusView {
            active: self.active,
            kind: self.kind,
            x: self.pos.x,
            y: self.pos.y,
            popup_at: self.popup_at(),
        }
    }
}
