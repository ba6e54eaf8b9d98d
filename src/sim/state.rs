//! Game state and core simulation types
//!
//! Positions are board-relative pixels with the origin at the top-left corner.
//! The player defends the left edge, the AI the right edge.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::Difficulty;

/// Which paddle a value refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Player,
    Ai,
}

impl Side {
    /// Horizontal direction pointing away from this side's paddle
    pub fn outward(self) -> f32 {
        match self {
            Side::Player => 1.0,
            Side::Ai => -1.0,
        }
    }
}

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GameStatus {
    /// No run in progress
    #[default]
    Menu,
    /// Active gameplay
    Playing,
    /// Run suspended; timers keep running
    Paused,
    /// Run ended, score handed to the leaderboard
    GameOver,
    /// Viewing the leaderboard after a run
    Leaderboard,
}

/// The ball. `pos` is its center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Side of the square bounding box
    pub size: f32,
}

impl Ball {
    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Zero or non-finite velocity (or position) can't be simulated
    pub fn is_degenerate(&self) -> bool {
        !self.vel.is_finite() || !self.pos.is_finite() || self.vel == Vec2::ZERO
    }
}

/// A paddle. Player and AI share this shape; x is fixed per side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    /// Top edge
    pub y: f32,
    pub height: f32,
    pub width: f32,
    /// Max travel per tick (player) or tracking gain (AI)
    pub speed: f32,
    /// Height restored when a resize effect expires
    pub base_height: f32,
}

impl Paddle {
    pub fn center(&self) -> f32 {
        self.y + self.height / 2.0
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    SpeedUp,
    SlowDown,
    PaddleGrow,
    PaddleShrink,
    ExtraLife,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 5] = [
        PowerUpKind::SpeedUp,
        PowerUpKind::SlowDown,
        PowerUpKind::PaddleGrow,
        PowerUpKind::PaddleShrink,
        PowerUpKind::ExtraLife,
    ];

    /// Display name (presentation only)
    pub fn name(&self) -> &'static str {
        match self {
            PowerUpKind::SpeedUp => "Speed Up",
            PowerUpKind::SlowDown => "Slow Down",
            PowerUpKind::PaddleGrow => "Paddle Grow",
            PowerUpKind::PaddleShrink => "Paddle Shrink",
            PowerUpKind::ExtraLife => "Extra Life",
        }
    }

    /// Display icon (presentation only)
    pub fn icon(&self) -> &'static str {
        match self {
            PowerUpKind::SpeedUp => "⚡",
            PowerUpKind::SlowDown => "🐌",
            PowerUpKind::PaddleGrow => "📏",
            PowerUpKind::PaddleShrink => "📐",
            PowerUpKind::ExtraLife => "❤️",
        }
    }

    /// Resize effects are undone on expiry; speed effects are bookkeeping only
    pub fn resizes_paddle(&self) -> bool {
        matches!(self, PowerUpKind::PaddleGrow | PowerUpKind::PaddleShrink)
    }
}

/// Opaque power-up identity, unique within a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PowerUpId(pub u32);

/// A power-up, either waiting on the board or in effect after collection.
///
/// An active power-up keeps the id of the board power-up it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: PowerUpId,
    pub kind: PowerUpKind,
    /// Center of the square footprint
    pub pos: Vec2,
    pub size: f32,
    /// Tick at which it appeared (board) or was collected (active)
    pub created_tick: u64,
    pub duration_ms: u32,
}

impl PowerUp {
    /// Milliseconds left before expiry at tick `now`
    pub fn remaining_ms(&self, now: u64, tick_rate_hz: u32) -> u32 {
        let elapsed_ms = now.saturating_sub(self.created_tick) * 1000 / tick_rate_hz.max(1) as u64;
        (self.duration_ms as u64).saturating_sub(elapsed_ms) as u32
    }
}

/// Run-level state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub status: GameStatus,
    /// Successful player returns (a hit count)
    pub player_score: u64,
    pub difficulty: Difficulty,
    pub extra_lives: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            status: GameStatus::Menu,
            player_score: 0,
            difficulty: Difficulty::default(),
            extra_lives: 0,
        }
    }
}

/// Why the ball was replaced mid-rally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReseedReason {
    DegenerateVelocity,
    Stuck,
}

/// Notifications for the presentation layer, drained once per frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    StatusChanged { from: GameStatus, to: GameStatus },
    PaddleHit { side: Side, speed: f32 },
    PointScored { score: u64 },
    PowerUpSpawned { id: PowerUpId, kind: PowerUpKind },
    PowerUpCollected { id: PowerUpId, kind: PowerUpKind },
    PowerUpExpired { id: PowerUpId },
    EffectExpired { id: PowerUpId, kind: PowerUpKind },
    ExtraLifeConsumed { remaining: u32 },
    BallServed,
    BallReseeded { reason: ReseedReason },
    GameOver { score: u64, difficulty: Difficulty },
}

/// Read-only view of everything the renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub state: GameState,
    pub ball: Ball,
    pub player: Paddle,
    pub ai: Paddle,
    pub power_ups: Vec<PowerUp>,
    pub active_power_ups: Vec<PowerUp>,
    /// True for a short window after an extra life is spent
    pub extra_life_notice: bool,
    /// Ball is parked waiting for the post-point serve
    pub serving: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ball_degenerate() {
        let mut ball = Ball {
            pos: Vec2::new(400.0, 200.0),
            vel: Vec2::new(3.0, 4.0),
            size: 16.0,
        };
        assert!(!ball.is_degenerate());
        assert_eq!(ball.speed(), 5.0);

        ball.vel = Vec2::ZERO;
        assert!(ball.is_degenerate());

        ball.vel = Vec2::new(f32::NAN, 1.0);
        assert!(ball.is_degenerate());
    }

    #[test]
    fn test_power_up_remaining() {
        let pu = PowerUp {
            id: PowerUpId(1),
            kind: PowerUpKind::SpeedUp,
            pos: Vec2::ZERO,
            size: 32.0,
            created_tick: 100,
            duration_ms: 10_000,
        };
        assert_eq!(pu.remaining_ms(100, 60), 10_000);
        assert_eq!(pu.remaining_ms(160, 60), 9_000);
        assert_eq!(pu.remaining_ms(100_000, 60), 0);
    }

    #[test]
    fn test_side_outward() {
        assert_eq!(Side::Player.outward(), 1.0);
        assert_eq!(Side::Ai.outward(), -1.0);
    }
}
