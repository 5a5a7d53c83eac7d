mod lifecycle;
pub mod steering;

use rand::Rng;
use tracing::debug;

use crate::constants::{
    ADVERSARY_ANIMATION_FRAMES, ADVERSARY_ANIMATION_PERIOD, BASE_SPEED, CAPTURED_SPEED_MULTIPLIER,
    FLEE_TRIGGER_DISTANCE, FORCE_MOVE_DISTANCE, FORCE_MOVE_MIN_DELTA, HOME_ARRIVAL_DISTANCE,
    LOCK_ON_DISTANCE,
};
use crate::grid::Grid;
use crate::movement::{AnimationClock, Mover};
use crate::types::{AdversaryState, AdversaryView, Archetype, Direction, Vec2};

pub use lifecycle::Lifecycle;
use steering::Patrol;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub from: AdversaryState,
    pub to: AdversaryState,
}

#[derive(Clone, Debug)]
pub struct Adversary {
    pub id: String,
    pub archetype: Archetype,
    pub mover: Mover,
    pub home: Vec2,
    lifecycle: Lifecycle,
    patrol: Patrol,
    flee_target: Option<Vec2>,
    flee_duration: f64,
    penalty_duration: f64,
    animation: AnimationClock,
}

impl Adversary {
    pub fn new(
        id: impl Into<String>,
        archetype: Archetype,
        pos: Vec2,
        home: Vec2,
        speed_multiplier: f64,
        flee_duration: f64,
        penalty_duration: f64,
    ) -> Self {
        Self {
            id: id.into(),
            archetype,
            mover: Mover::new(pos, speed_multiplier),
            home,
            lifecycle: Lifecycle::Pursuing,
            patrol: Patrol::default(),
            flee_target: None,
            flee_duration,
            penalty_duration,
            animation: AnimationClock::new(ADVERSARY_ANIMATION_PERIOD, ADVERSARY_ANIMATION_FRAMES),
        }
    }

    pub fn state(&self) -> AdversaryState {
        self.lifecycle.state()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn pos(&self) -> Vec2 {
        self.mover.pos
    }

    pub fn interactable(&self) -> bool {
        self.lifecycle.interactable()
    }

    pub fn is_flashing(&self) -> bool {
        self.lifecycle.is_flashing()
    }

    pub fn flee_target(&self) -> Option<Vec2> {
        self.flee_target
    }

    pub fn speed(&self) -> f64 {
        let base = BASE_SPEED * self.mover.speed_multiplier;
        if self.lifecycle == Lifecycle::Captured {
            return base * CAPTURED_SPEED_MULTIPLIER;
        }
        base
    }

    /// Power pickup notification. Returns whether the agent is now fleeing
    /// because of it.
    pub fn frighten(&mut self) -> bool {
        let next = self.lifecycle.frightened(self.flee_duration);
        if next.state() != AdversaryState::Fleeing {
            return false;
        }
        self.lifecycle = next;
        self.flee_target = None;
        true
    }

    /// Collision while fleeing. A no-op in every other state.
    pub fn capture(&mut self) -> bool {
        let next = self.lifecycle.captured();
        if next == self.lifecycle {
            return false;
        }
        self.lifecycle = next;
        self.flee_target = None;
        true
    }

    /// Runs one frame of timers, AI and movement. Returns the life-cycle
    /// change caused by a timer expiry or arriving home, if any.
    pub fn update<R: Rng>(
        &mut self,
        grid: &Grid,
        player_pos: Vec2,
        player_dir: Direction,
        dt: f64,
        rng: &mut R,
    ) -> Option<Transition> {
        let from = self.state();
        self.lifecycle = self.lifecycle.tick(dt, self.penalty_duration);

        match self.lifecycle {
            Lifecycle::Pursuing => {
                self.patrol.tick(dt);
                self.pursue(grid, player_pos, player_dir, dt, rng);
            }
            Lifecycle::Fleeing { .. } => {
                self.patrol.tick(dt);
                self.flee(grid, player_pos, dt, rng);
            }
            Lifecycle::Captured => self.return_home(dt),
            Lifecycle::Penalized { .. } => {}
        }
        self.animation.tick(dt);

        let to = self.state();
        if from == to {
            return None;
        }
        debug!(adversary = %self.id, ?from, ?to, "adversary state changed");
        Some(Transition { from, to })
    }

    fn pursue<R: Rng>(
        &mut self,
        grid: &Grid,
        player_pos: Vec2,
        player_dir: Direction,
        dt: f64,
        rng: &mut R,
    ) {
        let distance = self.mover.pos.distance(player_pos);

        if steering::should_recalculate(&self.mover, grid) {
            let choice = if distance < LOCK_ON_DISTANCE {
                steering::toward(&self.mover, grid, player_pos)
            } else {
                match self.archetype {
                    Archetype::Patrol => Some(self.patrol.choose(&self.mover, grid, rng)),
                    Archetype::Ambush => {
                        let ambush = steering::ambush_point(player_pos, player_dir);
                        steering::toward(&self.mover, grid, ambush)
                    }
                }
            };
            if let Some(dir) = choice {
                self.mover.desired_dir = dir;
            }
        }

        let speed = self.speed();
        self.mover.step(grid, speed, dt);

        if distance < FORCE_MOVE_DISTANCE && self.mover.dir == Direction::None {
            self.force_move(player_pos, speed * dt);
        }
        self.mover.wrap_tunnel(grid);
    }

    /// Nudges a stuck agent straight at a player it is touching, bypassing
    /// the alignment rules for this frame.
    fn force_move(&mut self, player_pos: Vec2, amount: f64) {
        let dx = player_pos.x - self.mover.pos.x;
        let dy = player_pos.y - self.mover.pos.y;
        if dx.abs() > dy.abs() && dx.abs() > FORCE_MOVE_MIN_DELTA {
            self.mover.pos.x += amount.copysign(dx);
        } else if dy.abs() > FORCE_MOVE_MIN_DELTA {
            self.mover.pos.y += amount.copysign(dy);
        }
    }

    fn flee<R: Rng>(&mut self, grid: &Grid, player_pos: Vec2, dt: f64, rng: &mut R) {
        if steering::should_recalculate(&self.mover, grid) {
            let distance = self.mover.pos.distance(player_pos);
            let choice = if distance < FLEE_TRIGGER_DISTANCE {
                let (dir, target) = steering::away_from(&self.mover, grid, player_pos);
                self.flee_target = Some(target);
                dir
            } else {
                Some(self.patrol.choose(&self.mover, grid, rng))
            };
            if let Some(dir) = choice {
                self.mover.desired_dir = dir;
            }
        }

        let speed = self.speed();
        self.mover.step(grid, speed, dt);
        self.mover.wrap_tunnel(grid);
    }

    /// Straight line home through walls. Arrival parks the agent for its
    /// penalty.
    fn return_home(&mut self, dt: f64) {
        let dx = self.home.x - self.mover.pos.x;
        let dy = self.home.y - self.mover.pos.y;
        let distance = (dx * dx + dy * dy).sqrt();

        if distance < HOME_ARRIVAL_DISTANCE {
            self.mover.pos = self.home;
            self.mover.dir = Direction::None;
            self.mover.desired_dir = Direction::None;
            self.lifecycle = self.lifecycle.arrived_home();
            return;
        }

        let travel = (self.speed() * dt).min(distance);
        self.mover.pos.x += dx / distance * travel;
        self.mover.pos.y += dy / distance * travel;

        let facing = if dx.abs() > dy.abs() {
            if dx > 0.0 {
                Direction::Right
            } else {
                Direction::Left
            }
        } else if dy > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        };
        self.mover.dir = facing;
        self.mover.desired_dir = facing;
    }

    pub fn view(&self) -> AdversaryView {
        AdversaryView {
            id: self.id.clone(),
            x: self.mover.pos.x,
            y: self.mover.pos.y,
            dir: self.mover.dir,
            state: self.state(),
            archetype: self.archetype,
            flashing: self.is_flashing(),
            anim_frame: self.animation.frame(),
        }
    }
}
