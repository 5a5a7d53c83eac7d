use crate::types::Difficulty;

pub const MAZE_ROWS: i32 = 13;
pub const MAZE_COLS: i32 = 25;
pub const CELL_SIZE: f64 = 40.0;
pub const TUNNEL_ROW: i32 = 6;

pub const BASE_SPEED: f64 = 120.0;
pub const ALIGNMENT_TOLERANCE: f64 = 4.0;
pub const INTERSECTION_TOLERANCE: f64 = 3.0;
pub const RADIUS_OFFSET: f64 = 2.0;

pub const MAX_FRAME_DELTA: f64 = 1.0 / 30.0;
pub const DEFAULT_FRAME_DELTA: f64 = 1.0 / 60.0;
/// Slack applied when comparing accumulated frame time against a duration.
pub const TIMER_EPSILON: f64 = 1e-9;

pub const TOKEN_POINTS: u32 = 10;
pub const POWER_PELLET_POINTS: u32 = 50;
pub const TOKEN_PICKUP_DISTANCE: f64 = 15.0;
pub const POWER_PELLET_PICKUP_DISTANCE: f64 = 20.0;

pub const PLAYER_BOOST_MULTIPLIER: f64 = 1.1;
pub const PLAYER_ANIMATION_PERIOD: f64 = 0.1;
pub const PLAYER_ANIMATION_FRAMES: u8 = 3;

pub const FLEE_DURATION_SECS: f64 = 15.0;
pub const FLEE_WARNING_WINDOW_SECS: f64 = 3.0;
pub const FLASH_PERIOD_SECS: f64 = 0.33;
pub const FLASH_ON_AFTER_SECS: f64 = 0.167;
pub const PENALTY_DURATION_SECS: f64 = 3.0;
pub const CAPTURED_SPEED_MULTIPLIER: f64 = 1.5;
pub const HOME_ARRIVAL_DISTANCE: f64 = 5.0;

pub const LOCK_ON_DISTANCE: f64 = 150.0;
pub const AMBUSH_DISTANCE: f64 = 200.0;
pub const FLEE_TRIGGER_DISTANCE: f64 = 100.0;
pub const FORCE_MOVE_DISTANCE: f64 = 25.0;
pub const FORCE_MOVE_MIN_DELTA: f64 = 1.0;
pub const PATROL_REROLL_SECS: f64 = 2.0;
pub const FLEE_SAMPLE_STRIDE: usize = 2;
pub const ADVERSARY_ANIMATION_PERIOD: f64 = 0.2;
pub const ADVERSARY_ANIMATION_FRAMES: u8 = 2;

pub const COLLISION_DISTANCE: f64 = 20.0;
pub const CAPTURE_POINTS: u32 = 400;

pub const BONUS_SPAWN_INTERVAL_SECS: f64 = 30.0;
pub const BONUS_VISIBLE_SECS: f64 = 20.0;
pub const BONUS_POPUP_SECS: f64 = 1.0;
pub const BONUS_POINTS: u32 = 200;
pub const BONUS_PICKUP_DISTANCE: f64 = 15.0;
pub const BONUS_KINDS: u8 = 4;

pub const LEVEL_COUNT: u32 = 5;
pub const HIGH_SCORE_LIMIT: usize = 10;
pub const HIGH_SCORE_NAME_LEN: usize = 3;

pub fn get_difficulty_multiplier(difficulty: Difficulty) -> f64 {
    match difficulty {
        Difficulty::Easy => 0.75,
        Difficulty::Medium => 1.0,
        Difficulty::Hard => 1.25,
        Difficulty::Crazy => 2.0,
    }
}

/// Flee window shrinks as the game speeds up.
pub fn get_flee_duration(speed_multiplier: f64) -> f64 {
    if speed_multiplier <= 0.0 {
        return FLEE_DURATION_SECS;
    }
    FLEE_DURATION_SECS / speed_multiplier
}

pub fn next_level(level: u32) -> u32 {
    if level >= LEVEL_COUNT {
        return 1;
    }
    level + 1
}
