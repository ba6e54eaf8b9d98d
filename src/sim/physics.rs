//! Ball motion, wall bounces, paddle-hit response and AI tracking

use super::state::{Ball, Paddle, Side};
use crate::config::{DifficultyConfig, GameConfig};

/// Move the ball one tick along its velocity.
///
/// Horizontal position is clamped to the board but never bounced; leaving
/// through a side edge is resolved by scoring.
pub fn advance_ball(ball: &Ball, config: &GameConfig) -> Ball {
    let mut next = *ball;
    next.pos += next.vel;
    next.pos.x = next.pos.x.clamp(0.0, config.board_width);
    next
}

/// Reflect off the top/bottom walls. Returns true if a wall was hit.
///
/// The vertical velocity is forced away from the wall rather than negated so a
/// ball resting on the boundary can't re-trigger on the next tick.
pub fn bounce_walls(ball: &mut Ball, config: &GameConfig) -> bool {
    let top = ball.radius();
    let bottom = config.board_height - ball.radius();

    if ball.pos.y <= top {
        ball.pos.y = top;
        ball.vel.y = ball.vel.y.abs();
        true
    } else if ball.pos.y >= bottom {
        ball.pos.y = bottom;
        ball.vel.y = -ball.vel.y.abs();
        true
    } else {
        false
    }
}

/// Where the ball's center will be vertically when it reaches the AI paddle plane.
///
/// Balls moving away from the AI are simply tracked at their current height.
pub fn predict_intercept_y(ball: &Ball, config: &GameConfig) -> f32 {
    let radius = ball.radius();
    let predicted = if ball.vel.x > 0.0 {
        let distance = config.board_width - config.paddle_width - ball.pos.x;
        let time_to_reach = distance.max(0.0) / ball.vel.x.abs();
        ball.pos.y + ball.vel.y * time_to_reach
    } else {
        ball.pos.y
    };
    predicted.clamp(radius, config.board_height - radius)
}

/// Damped proportional move of the AI paddle center toward the predicted intercept
pub fn advance_ai(ai: &Paddle, ball: &Ball, config: &GameConfig, difficulty: &DifficultyConfig) -> Paddle {
    let target = predict_intercept_y(ball, config);
    let difference = target - ai.center();
    let movement = difference * difficulty.ai_speed * difficulty.ai_reaction;

    let mut next = *ai;
    next.y = config.clamp_paddle_y(ai.y + movement, ai.height);
    next
}

/// Move the player paddle center toward the ball, at most `speed` per tick
pub fn advance_autopilot(player: &Paddle, ball: &Ball, config: &GameConfig) -> Paddle {
    let difference = ball.pos.y - player.center();
    let step = difference.clamp(-player.speed, player.speed);

    let mut next = *player;
    next.y = config.clamp_paddle_y(player.y + step, player.height);
    next
}

/// Normalized contact point: -0.5 at the top edge, 0 at center, +0.5 at the bottom edge
pub fn hit_position(ball: &Ball, paddle: &Paddle) -> f32 {
    ((ball.pos.y - paddle.y) / paddle.height - 0.5).clamp(-0.5, 0.5)
}

/// Ball speed after a return from `side`
pub fn next_speed(current: f32, side: Side, config: &GameConfig, difficulty: &DifficultyConfig) -> f32 {
    let increase = match side {
        Side::Player => difficulty.ball_speed_increase,
        Side::Ai => difficulty.ball_speed_increase * config.ai_hit_speed_fraction,
    };
    (current + increase).min(difficulty.max_ball_speed)
}

/// Bounce the ball off `side`'s paddle.
///
/// Sends the ball away from the paddle, adds vertical deflection proportional
/// to the hit position, then rescales the velocity to the new speed without
/// changing its direction.
pub fn apply_paddle_hit(
    ball: &Ball,
    paddle: &Paddle,
    side: Side,
    config: &GameConfig,
    difficulty: &DifficultyConfig,
) -> Ball {
    let mut next = *ball;

    next.vel.x = side.outward() * next.vel.x.abs();
    next.vel.y += hit_position(ball, paddle) * config.hit_angle_multiplier;

    let current = next.vel.length();
    if current > f32::EPSILON {
        let speed = next_speed(current, side, config, difficulty);
        next.vel *= speed / current;
    }

    // Keep the ball in front of the paddle face
    let radius = next.radius();
    match side {
        Side::Player => {
            let face = config.paddle_x(Side::Player) + paddle.width;
            next.pos.x = next.pos.x.max(face + radius);
        }
        Side::Ai => {
            let face = config.paddle_x(Side::Ai);
            next.pos.x = next.pos.x.min(face - radius);
        }
    }

    next
}
