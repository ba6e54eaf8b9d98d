//! Bounce Pong - a paddle-vs-AI Pong variant
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, AI, power-ups, game loop)
//! - `config`: Difficulty tables and board/mechanics tuning
//! - `highscores`: Leaderboard that receives finished runs
//!
//! Rendering, input devices and storage are left to the embedding frontend.

pub mod config;
pub mod highscores;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use config::{ConfigError, Difficulty, DifficultyConfig, GameConfig, PowerUpConfig};
pub use highscores::{HighScores, NoopSink, ScoreSink};
pub use sim::{Game, GameEvent, GameStatus, Snapshot, TickInput};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate (one tick per display frame)
    pub const TICK_RATE_HZ: u32 = 60;

    /// Max simulation ticks per rendered frame (prevents spiral of death)
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Longest wall-clock gap fed to the accumulator in one frame (ms)
    pub const MAX_FRAME_MS: f64 = 100.0;

    /// Board dimensions
    pub const BOARD_WIDTH: f32 = 800.0;
    pub const BOARD_HEIGHT: f32 = 400.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 12.0;
    pub const PADDLE_HEIGHT: f32 = 80.0;
    pub const PLAYER_PADDLE_SPEED: f32 = 8.0;

    /// Ball defaults
    pub const BALL_SIZE: f32 = 16.0;
    pub const BALL_START_SPEED: f32 = 10.0;

    /// Extra vertical velocity per unit of hit position (angle control)
    pub const HIT_ANGLE_MULTIPLIER: f32 = 2.0;
    /// Share of the per-hit speed increase applied on AI returns
    pub const AI_HIT_SPEED_FRACTION: f32 = 0.3;

    /// Collision tolerances (pixels added to every edge)
    pub const PADDLE_TOLERANCE: f32 = 3.0;
    pub const POWER_UP_TOLERANCE: f32 = 2.0;
}

/// Convert a duration in milliseconds to a whole number of ticks.
///
/// Rounds to nearest; any non-zero duration lasts at least one tick.
#[inline]
pub fn ms_to_ticks(ms: u32, tick_rate_hz: u32) -> u64 {
    if ms == 0 {
        return 0;
    }
    let ticks = (ms as u64 * tick_rate_hz as u64 + 500) / 1000;
    ticks.max(1)
}

/// Wall-clock time to feed the tick accumulator for one frame (ms).
///
/// The first frame, a clock that went backwards, or a non-finite timestamp
/// count as a single tick; long stalls are capped at `MAX_FRAME_MS`.
pub fn frame_dt(last_ms: Option<f64>, now_ms: f64, tick_ms: f64) -> f64 {
    match last_ms {
        Some(last) if last.is_finite() && now_ms.is_finite() => {
            (now_ms - last).clamp(0.0, consts::MAX_FRAME_MS)
        }
        _ => tick_ms,
    }
}
