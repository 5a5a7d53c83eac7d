use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::adversary::Adversary;
use crate::collectibles::{BonusEvent, BonusItem};
use crate::constants::{
    get_difficulty_multiplier, get_flee_duration, next_level, CAPTURE_POINTS, COLLISION_DISTANCE,
    MAX_FRAME_DELTA, PENALTY_DURATION_SECS,
};
use crate::grid::Grid;
use crate::player::Player;
use crate::session::SessionState;
use crate::types::{
    AdversaryState, Cell, Difficulty, Direction, GameConfig, GameEvent, Outcome, SessionSummary,
    Snapshot,
};

mod autopilot;
mod collisions;
mod spawn_system;
mod utils;

use self::utils::sanitize_dt;

#[derive(Clone, Debug)]
pub struct EngineOptions {
    pub difficulty: Difficulty,
    pub seed: u64,
    pub level: u32,
    pub endless: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            seed: 0,
            level: 1,
            endless: false,
        }
    }
}

#[derive(Clone, Debug, Default)]
struct RunStats {
    levels_cleared: u32,
    tokens_collected: u32,
    tokens_total: u32,
    power_pellets_collected: u32,
    captures: u32,
    bonuses_collected: u32,
}

/// One game session: a level's grid, its entities and the frame loop that
/// ties them together. Every call to [`GameEngine::step`] is infallible.
#[derive(Clone, Debug)]
pub struct GameEngine {
    pub config: GameConfig,

    grid: Grid,
    rng: StdRng,
    player: Player,
    player_spawn: Cell,
    adversaries: Vec<Adversary>,
    session: SessionState,
    bonus: BonusItem,
    events: Vec<GameEvent>,
    outcome: Option<Outcome>,
    stats: RunStats,

    tick_counter: u64,
    elapsed_secs: f64,
}

impl GameEngine {
    pub fn new(grid: Grid, options: EngineOptions) -> Self {
        let speed_multiplier = get_difficulty_multiplier(options.difficulty);
        let config = GameConfig {
            difficulty: options.difficulty,
            speed_multiplier,
            level: options.level.max(1),
            endless: options.endless,
            seed: options.seed,
            flee_duration_secs: get_flee_duration(speed_multiplier),
            penalty_duration_secs: PENALTY_DURATION_SECS,
        };

        let (player, player_spawn, adversaries) = spawn_system::spawn_entities(&grid, &config);
        let session = SessionState::for_level(&grid, player_spawn);
        info!(
            level = config.level,
            difficulty = ?config.difficulty,
            seed = config.seed,
            tokens = session.tokens_total(),
            "session started"
        );

        Self {
            config,
            grid,
            rng: StdRng::seed_from_u64(options.seed),
            player,
            player_spawn,
            adversaries,
            session,
            bonus: BonusItem::default(),
            events: Vec::new(),
            outcome: None,
            stats: RunStats::default(),
            tick_counter: 0,
            elapsed_secs: 0.0,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_spawn(&self) -> Cell {
        self.player_spawn
    }

    pub fn adversaries(&self) -> &[Adversary] {
        &self.adversaries
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn bonus(&self) -> &BonusItem {
        &self.bonus
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn is_ended(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn level(&self) -> u32 {
        self.config.level
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_secs
    }

    pub fn tick(&self) -> u64 {
        self.tick_counter
    }

    /// Advances the simulation by one frame. `dt` is clamped to
    /// `[0, MAX_FRAME_DELTA]`; a `None` input keeps the buffered turn.
    pub fn step(&mut self, dt: f64, input: Option<Direction>) {
        if self.outcome.is_some() {
            return;
        }
        let dt = sanitize_dt(dt, MAX_FRAME_DELTA);
        self.tick_counter += 1;
        self.elapsed_secs += dt;

        self.player.boosted = self
            .adversaries
            .iter()
            .any(|adversary| adversary.state() == AdversaryState::Fleeing);
        self.player.set_input(input);
        self.player.update(&self.grid, dt);

        self.collect_pellets();
        self.notify_power_pickups();
        self.update_adversaries(dt);
        self.update_bonus(dt);
        self.collect_bonus();
        self.resolve_adversary_collisions();
        self.check_victory();
    }

    fn collect_pellets(&mut self) {
        let report = self.session.collect_at(self.player.pos());
        if report.is_empty() {
            return;
        }
        self.stats.tokens_collected += report.tokens.len() as u32;
        self.stats.power_pellets_collected += report.power_pellets.len() as u32;
        for cell in report.tokens {
            self.events.push(GameEvent::PelletCollected {
                row: cell.row,
                col: cell.col,
            });
        }
        for cell in report.power_pellets {
            self.events.push(GameEvent::PowerPelletCollected {
                row: cell.row,
                col: cell.col,
            });
        }
    }

    /// Every adversary that is not captured or penalized starts (or
    /// restarts) fleeing once per power pickup.
    fn notify_power_pickups(&mut self) {
        if self.session.drain_power_pickups() == 0 {
            return;
        }
        for adversary in self.adversaries.iter_mut() {
            let from = adversary.state();
            if !adversary.frighten() {
                continue;
            }
            self.events.push(GameEvent::AdversaryFrightened {
                adversary_id: adversary.id.clone(),
            });
            if from != AdversaryState::Fleeing {
                self.events.push(GameEvent::AdversaryTransition {
                    adversary_id: adversary.id.clone(),
                    from,
                    to: AdversaryState::Fleeing,
                });
            }
        }
    }

    fn update_adversaries(&mut self, dt: f64) {
        let player_pos = self.player.pos();
        let player_dir = self.player.dir();
        for adversary in self.adversaries.iter_mut() {
            let change = adversary.update(&self.grid, player_pos, player_dir, dt, &mut self.rng);
            if let Some(change) = change {
                self.events.push(GameEvent::AdversaryTransition {
                    adversary_id: adversary.id.clone(),
                    from: change.from,
                    to: change.to,
                });
            }
        }
    }

    fn update_bonus(&mut self, dt: f64) {
        match self.bonus.update(&self.grid, dt, &mut self.rng) {
            Some(BonusEvent::Spawned { kind, pos }) => {
                self.events.push(GameEvent::BonusSpawned {
                    kind,
                    x: pos.x,
                    y: pos.y,
                });
            }
            Some(BonusEvent::Expired) => self.events.push(GameEvent::BonusExpired),
            None => {}
        }
    }

    fn check_victory(&mut self) {
        if self.outcome.is_some() || !self.session.is_won() {
            return;
        }
        self.outcome = Some(Outcome::Victory);
        self.stats.levels_cleared += 1;
        self.events.push(GameEvent::Victory);
        info!(
            level = self.config.level,
            score = self.session.score(),
            elapsed_secs = self.elapsed_secs,
            "level cleared"
        );
    }

    /// Loads the next level after a victory: entities, pellets and the bonus
    /// item start over, the score carries across.
    pub fn advance_level(&mut self, grid: Grid) {
        self.stats.tokens_total += self.session.tokens_total();
        self.config.level = next_level(self.config.level);

        let (player, player_spawn, adversaries) = spawn_system::spawn_entities(&grid, &self.config);
        self.session = self.session.next_level(&grid, player_spawn);
        self.grid = grid;
        self.player = player;
        self.player_spawn = player_spawn;
        self.adversaries = adversaries;
        self.bonus = BonusItem::default();
        self.outcome = None;
        debug!(
            level = self.config.level,
            tokens = self.session.tokens_total(),
            "level advanced"
        );
    }

    pub fn build_snapshot(&mut self, include_events: bool) -> Snapshot {
        let snapshot = Snapshot {
            tick: self.tick_counter,
            elapsed_secs: self.elapsed_secs,
            level: self.config.level,
            score: self.session.score(),
            tokens_collected: self.session.tokens_collected(),
            tokens_total: self.session.tokens_total(),
            player: self.player.view(),
            adversaries: self
                .adversaries
                .iter()
                .map(|adversary| adversary.view())
                .collect(),
            pellets: self.session.pellet_views(),
            bonus: self.bonus.view(),
            outcome: self.outcome,
            events: if include_events {
                self.events.clone()
            } else {
                Vec::new()
            },
        };
        if include_events {
            self.events.clear();
        }
        snapshot
    }

    pub fn build_summary(&self) -> SessionSummary {
        SessionSummary {
            outcome: self.outcome,
            level: self.config.level,
            levels_cleared: self.stats.levels_cleared,
            score: self.session.score(),
            tokens_collected: self.stats.tokens_collected,
            tokens_total: self.stats.tokens_total + self.session.tokens_total(),
            power_pellets_collected: self.stats.power_pellets_collected,
            captures: self.stats.captures,
            bonuses_collected: self.stats.bonuses_collected,
            duration_secs: self.elapsed_secs,
            ticks: self.tick_counter,
        }
    }
}
