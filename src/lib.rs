pub mod adversary;
pub mod collectibles;
pub mod constants;
pub mod engine;
pub mod error;
pub mod grid;
pub mod layout;
pub mod movement;
pub mod player;
pub mod score_store;
pub mod session;
pub mod types;

pub use engine::{EngineOptions, GameEngine};
pub use error::{LayoutError, ScoreStoreError};
pub use grid::Grid;
