use crate::constants::{
    BASE_SPEED, PLAYER_ANIMATION_FRAMES, PLAYER_ANIMATION_PERIOD, PLAYER_BOOST_MULTIPLIER,
};
use crate::grid::Grid;
use crate::movement::{AnimationClock, Mover};
use crate::types::{Cell, Direction, PlayerView, Vec2};

#[derive(Clone, Debug)]
pub struct Player {
    pub mover: Mover,
    pub boosted: bool,
    animation: AnimationClock,
}

impl Player {
    pub fn new(pos: Vec2, speed_multiplier: f64) -> Self {
        Self {
            mover: Mover::new(pos, speed_multiplier),
            boosted: false,
            animation: AnimationClock::new(PLAYER_ANIMATION_PERIOD, PLAYER_ANIMATION_FRAMES),
        }
    }

    /// `None` keeps whatever turn is already buffered.
    pub fn set_input(&mut self, input: Option<Direction>) {
        if let Some(dir) = input {
            self.mover.desired_dir = dir;
        }
    }

    pub fn speed(&self) -> f64 {
        let boost = if self.boosted {
            PLAYER_BOOST_MULTIPLIER
        } else {
            1.0
        };
        BASE_SPEED * self.mover.speed_multiplier * boost
    }

    pub fn update(&mut self, grid: &Grid, dt: f64) {
        let speed = self.speed();
        self.mover.step(grid, speed, dt);
        self.mover.wrap_tunnel(grid);
        if self.mover.dir != Direction::None {
            self.animation.tick(dt);
        }
    }

    pub fn pos(&self) -> Vec2 {
        self.mover.pos
    }

    pub fn dir(&self) -> Direction {
        self.mover.dir
    }

    pub fn cell(&self) -> Cell {
        self.mover.cell()
    }

    pub fn view(&self) -> PlayerView {
        PlayerView {
            x: self.mover.pos.x,
            y: self.mover.pos.y,
            dir: self.mover.dir,
            boosted: self.boosted,
            anim_frame: self.animation.frame(),
        }
    }
}
