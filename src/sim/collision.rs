//! Collision detection
//!
//! Pure overlap predicates between the ball and paddles / power-ups. The ball
//! is treated as a square box centered on its position. Hit detection is
//! deliberately generous: a tolerance is added to every edge of both shapes,
//! and fast balls are additionally checked along their swept path and a couple
//! of ticks ahead so they can't tunnel through a paddle between ticks.

use glam::Vec2;

use super::state::{Ball, Paddle, PowerUp};

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Rect {
    /// Square of side `size` centered on `center`
    pub fn centered(center: Vec2, size: f32) -> Self {
        let half = size / 2.0;
        Self {
            left: center.x - half,
            right: center.x + half,
            top: center.y - half,
            bottom: center.y + half,
        }
    }

    /// Smallest rect containing both
    pub fn union(&self, other: &Rect) -> Self {
        Self {
            left: self.left.min(other.left),
            right: self.right.max(other.right),
            top: self.top.min(other.top),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Inclusive overlap test with `tolerance` added to each edge of both rects
    pub fn touches(&self, other: &Rect, tolerance: f32) -> bool {
        self.right + tolerance >= other.left - tolerance
            && self.left - tolerance <= other.right + tolerance
            && self.bottom + tolerance >= other.top - tolerance
            && self.top - tolerance <= other.bottom + tolerance
    }

    /// Strict overlap test with `tolerance` added to each edge of both rects
    pub fn overlaps(&self, other: &Rect, tolerance: f32) -> bool {
        self.right + tolerance > other.left - tolerance
            && self.left - tolerance < other.right + tolerance
            && self.bottom + tolerance > other.top - tolerance
            && self.top - tolerance < other.bottom + tolerance
    }
}

/// Bounding box of the ball
pub fn ball_rect(ball: &Ball) -> Rect {
    Rect::centered(ball.pos, ball.size)
}

/// Rectangle of a paddle whose left edge sits at `paddle_x`
pub fn paddle_rect(paddle: &Paddle, paddle_x: f32) -> Rect {
    Rect {
        left: paddle_x,
        right: paddle_x + paddle.width,
        top: paddle.y,
        bottom: paddle.y + paddle.height,
    }
}

/// Ball touches the paddle at its current position
pub fn paddle_collision(ball: &Ball, paddle: &Paddle, paddle_x: f32, tolerance: f32) -> bool {
    ball_rect(ball).touches(&paddle_rect(paddle, paddle_x), tolerance)
}

/// The box swept by the ball between `prev` and `current` touches the paddle
pub fn paddle_collision_swept(prev: &Ball, current: &Ball, paddle: &Paddle, paddle_x: f32) -> bool {
    let swept = ball_rect(prev).union(&ball_rect(current));
    swept.touches(&paddle_rect(paddle, paddle_x), 0.0)
}

/// The ball will touch the paddle `lookahead_ticks` from now at its current velocity
pub fn paddle_collision_predictive(
    ball: &Ball,
    paddle: &Paddle,
    paddle_x: f32,
    tolerance: f32,
    lookahead_ticks: f32,
) -> bool {
    let predicted = Ball {
        pos: ball.pos + ball.vel * lookahead_ticks,
        ..*ball
    };
    paddle_collision(&predicted, paddle, paddle_x, tolerance)
}

/// Any of the current, swept or predictive checks reports contact
pub fn paddle_collision_comprehensive(
    prev: &Ball,
    current: &Ball,
    paddle: &Paddle,
    paddle_x: f32,
    tolerance: f32,
    lookahead_ticks: f32,
) -> bool {
    paddle_collision(current, paddle, paddle_x, tolerance)
        || paddle_collision_swept(prev, current, paddle, paddle_x)
        || paddle_collision_predictive(current, paddle, paddle_x, tolerance, lookahead_ticks)
}

/// Ball overlaps the power-up's square footprint
pub fn power_up_collision(ball: &Ball, power_up: &PowerUp, tolerance: f32) -> bool {
    ball_rect(ball).overlaps(&Rect::centered(power_up.pos, power_up.size), tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{PowerUpId, PowerUpKind};

    fn ball_at(x: f32, y: f32, vx: f32) -> Ball {
        Ball {
            pos: Vec2::new(x, y),
            vel: Vec2::new(vx, 0.0),
            size: 16.0,
        }
    }

    fn paddle() -> Paddle {
        Paddle {
            y: 160.0,
            height: 80.0,
            width: 12.0,
            speed: 8.0,
            base_height: 80.0,
        }
    }

    #[test]
    fn test_paddle_collision_direct() {
        // Paddle spans x 0..12; ball left edge at 12 touches the face
        assert!(paddle_collision(&ball_at(20.0, 200.0, -5.0), &paddle(), 0.0, 3.0));
        // Clear of the paddle
        assert!(!paddle_collision(&ball_at(60.0, 200.0, -5.0), &paddle(), 0.0, 3.0));
    }

    #[test]
    fn test_paddle_collision_tolerance() {
        // Ball left edge at 17: gap of 5 is bridged by 3 + 3 tolerance
        let ball = ball_at(25.0, 200.0, -5.0);
        assert!(!paddle_collision(&ball, &paddle(), 0.0, 0.0));
        assert!(paddle_collision(&ball, &paddle(), 0.0, 3.0));
    }

    #[test]
    fn test_paddle_collision_vertical_miss() {
        // Ball well below the paddle
        let ball = ball_at(10.0, 300.0, -5.0);
        assert!(!paddle_collision(&ball, &paddle(), 0.0, 3.0));
    }

    #[test]
    fn test_swept_catches_tunneling() {
        // 60 px per tick jumps clean over the paddle plane
        let prev = ball_at(40.0, 200.0, -60.0);
        let current = ball_at(-20.0, 200.0, -60.0);
        let far_paddle = Paddle { y: 190.0, height: 20.0, ..paddle() };
        let paddle_x = 10.0;
        let thin = Paddle { width: 2.0, ..far_paddle };

        assert!(!paddle_collision(&current, &thin, paddle_x, 3.0));
        assert!(paddle_collision_swept(&prev, &current, &thin, paddle_x));
        assert!(paddle_collision_comprehensive(&prev, &current, &thin, paddle_x, 3.0, 2.0));
    }

    #[test]
    fn test_predictive_looks_ahead() {
        let ball = ball_at(50.0, 200.0, -15.0);
        assert!(!paddle_collision(&ball, &paddle(), 0.0, 3.0));
        assert!(paddle_collision_predictive(&ball, &paddle(), 0.0, 3.0, 2.0));
        // Moving away never predicts contact
        let away = ball_at(50.0, 200.0, 15.0);
        assert!(!paddle_collision_predictive(&away, &paddle(), 0.0, 3.0, 2.0));
    }

    #[test]
    fn test_power_up_collision() {
        let pu = PowerUp {
            id: PowerUpId(1),
            kind: PowerUpKind::ExtraLife,
            pos: Vec2::new(400.0, 200.0),
            size: 32.0,
            created_tick: 0,
            duration_ms: 15_000,
        };
        assert!(power_up_collision(&ball_at(420.0, 200.0, 5.0), &pu, 2.0));
        // Edges 8 + 16 = 24 apart plus 4 px of tolerance
        assert!(power_up_collision(&ball_at(427.0, 200.0, 5.0), &pu, 2.0));
        assert!(!power_up_collision(&ball_at(428.0, 200.0, 5.0), &pu, 2.0));
    }
}
