//! Entity construction from config + difficulty

use glam::Vec2;
use rand::Rng;

use super::state::{Ball, Paddle, Side};
use crate::config::{Difficulty, GameConfig};

/// Vertical jitter applied to the serve position
const SERVE_Y_JITTER: f32 = 100.0;

/// Serve speed for a difficulty (horizontal component of a fresh ball),
/// never above the difficulty's speed cap
pub fn serve_speed(config: &GameConfig, difficulty: Difficulty) -> f32 {
    let table = difficulty.config();
    (config.initial_ball_speed * table.difficulty_multiplier).min(table.max_ball_speed)
}

/// Fresh ball near the board center heading toward `toward`'s paddle
pub fn new_ball<R: Rng>(config: &GameConfig, difficulty: Difficulty, toward: Side, rng: &mut R) -> Ball {
    let speed = serve_speed(config, difficulty);
    let radius = config.ball_size / 2.0;

    let jitter = (rng.random::<f32>() - 0.5) * SERVE_Y_JITTER;
    let y = (config.board_height / 2.0 + jitter).clamp(radius, config.board_height - radius);
    let vy = (rng.random::<f32>() - 0.5) * config.serve_vertical_range;

    // Heading toward a side means moving against that side's outward direction
    let mut vel = Vec2::new(-toward.outward() * speed, vy);
    let max = difficulty.config().max_ball_speed;
    if vel.length() > max {
        vel *= max / vel.length();
    }

    Ball {
        pos: Vec2::new(config.board_width / 2.0, y),
        vel,
        size: config.ball_size,
    }
}

/// Fresh ball with a random serve direction
pub fn new_ball_random<R: Rng>(config: &GameConfig, difficulty: Difficulty, rng: &mut R) -> Ball {
    let toward = if rng.random::<bool>() { Side::Player } else { Side::Ai };
    new_ball(config, difficulty, toward, rng)
}

/// Paddle centered vertically at its base height
pub fn new_paddle(config: &GameConfig, side: Side, difficulty: Difficulty) -> Paddle {
    let speed = match side {
        Side::Player => config.player_paddle_speed,
        Side::Ai => difficulty.config().ai_speed,
    };
    Paddle {
        y: (config.board_height - config.paddle_height) / 2.0,
        height: config.paddle_height,
        width: config.paddle_width,
        speed,
        base_height: config.paddle_height,
    }
}
