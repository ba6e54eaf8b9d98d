//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Timed effects run on the tick clock, never wall time
//! - No rendering or platform dependencies

pub mod collision;
pub mod factory;
pub mod physics;
pub mod powerups;
pub mod scheduler;
pub mod state;
pub mod tick;

pub use powerups::PowerUps;
pub use scheduler::{ScheduledAction, Scheduler};
pub use state::{
    Ball, GameEvent, GameState, GameStatus, Paddle, PowerUp, PowerUpId, PowerUpKind, ReseedReason, Side, Snapshot,
};
pub use tick::{Game, TickInput};
