//! Power-up spawning, collection and expiry
//!
//! Board power-ups wait to be hit by the ball. Collecting one applies its
//! effect immediately and, for timed kinds, records an active power-up with the
//! same id; the game loop schedules the matching expiry. Every removal is keyed
//! by id and is a no-op when the id is already gone.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::power_up_collision;
use super::state::{Ball, Paddle, PowerUp, PowerUpId, PowerUpKind};
use crate::config::{GameConfig, PowerUpConfig};

/// Entities a collected power-up may modify
pub struct EffectTargets<'a> {
    pub ball: &'a mut Ball,
    pub player: &'a mut Paddle,
    pub extra_lives: &'a mut u32,
    /// Speed ceiling of the current difficulty
    pub max_ball_speed: f32,
}

/// Result of a successful collection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collected {
    pub id: PowerUpId,
    pub kind: PowerUpKind,
    /// Set when an active effect was registered and needs an expiry
    pub effect_ms: Option<u32>,
}

/// Whether reaching `score` should offer a new power-up
pub fn is_spawn_score(score: u64, config: &PowerUpConfig) -> bool {
    let first = config.first_spawn_score;
    score == first || (score > first && (score - first).checked_rem(config.spawn_interval) == Some(0))
}

/// Board and active power-ups for one run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PowerUps {
    /// Waiting to be collected (at most one)
    pub board: Vec<PowerUp>,
    /// In effect
    pub active: Vec<PowerUp>,
    next_id: u32,
}

impl PowerUps {
    pub fn new() -> Self {
        Self {
            board: Vec::new(),
            active: Vec::new(),
            next_id: 1,
        }
    }

    /// Place a random power-up inside the spawn margin, unless one is already waiting
    pub fn spawn<R: Rng>(&mut self, now: u64, config: &GameConfig, rng: &mut R) -> Option<PowerUp> {
        if !self.board.is_empty() {
            return None;
        }

        let pc = &config.power_ups;
        let kind = PowerUpKind::ALL[rng.random_range(0..PowerUpKind::ALL.len())];
        let x = pc.spawn_margin + rng.random::<f32>() * (config.board_width - 2.0 * pc.spawn_margin);
        let y = pc.spawn_margin + rng.random::<f32>() * (config.board_height - 2.0 * pc.spawn_margin);

        let id = PowerUpId(self.next_id);
        self.next_id += 1;

        let power_up = PowerUp {
            id,
            kind,
            pos: Vec2::new(x, y),
            size: pc.size,
            created_tick: now,
            duration_ms: pc.board_timeout_ms,
        };
        log::debug!("Spawned {:?} power-up {:?} at ({:.0}, {:.0})", kind, id, x, y);
        self.board.push(power_up.clone());
        Some(power_up)
    }

    /// Ids of board power-ups the ball currently overlaps
    pub fn touching(&self, ball: &Ball, tolerance: f32) -> Vec<PowerUpId> {
        self.board
            .iter()
            .filter(|pu| power_up_collision(ball, pu, tolerance))
            .map(|pu| pu.id)
            .collect()
    }

    /// Remove an uncollected power-up. Returns false if it was already gone.
    pub fn expire_board(&mut self, id: PowerUpId) -> bool {
        let before = self.board.len();
        self.board.retain(|pu| pu.id != id);
        self.board.len() != before
    }

    /// Collect a board power-up and apply its effect.
    ///
    /// Returns `None` (and changes nothing) if the id is not on the board or
    /// has already been turned into an active effect.
    pub fn collect(
        &mut self,
        id: PowerUpId,
        now: u64,
        mut targets: EffectTargets<'_>,
        config: &GameConfig,
    ) -> Option<Collected> {
        if self.active.iter().any(|a| a.id == id) {
            return None;
        }
        let index = self.board.iter().position(|pu| pu.id == id)?;
        let power_up = self.board.remove(index);

        let pc = &config.power_ups;
        let effect_ms = match power_up.kind {
            PowerUpKind::SpeedUp => {
                targets.ball.vel *= pc.speed_up_factor;
                let speed = targets.ball.speed();
                if speed > targets.max_ball_speed {
                    targets.ball.vel *= targets.max_ball_speed / speed;
                }
                Some(pc.speed_effect_ms)
            }
            PowerUpKind::SlowDown => {
                targets.ball.vel *= pc.slow_down_factor;
                Some(pc.speed_effect_ms)
            }
            PowerUpKind::PaddleGrow => {
                let height = (targets.player.height * pc.grow_factor).min(pc.max_paddle_height);
                resize_paddle(targets.player, height, config);
                Some(pc.paddle_effect_ms)
            }
            PowerUpKind::PaddleShrink => {
                let height = (targets.player.height * pc.shrink_factor).max(pc.min_paddle_height);
                resize_paddle(targets.player, height, config);
                Some(pc.paddle_effect_ms)
            }
            PowerUpKind::ExtraLife => {
                *targets.extra_lives += 1;
                None
            }
        };

        if let Some(duration_ms) = effect_ms {
            self.active.push(PowerUp {
                created_tick: now,
                duration_ms,
                ..power_up.clone()
            });
        }
        log::debug!("Collected {:?} power-up {:?}", power_up.kind, id);

        Some(Collected {
            id,
            kind: power_up.kind,
            effect_ms,
        })
    }

    /// End an active effect, restoring the player paddle for resize kinds.
    /// Returns the kind that expired, or `None` if it was already gone.
    pub fn expire_effect(&mut self, id: PowerUpId, player: &mut Paddle, config: &GameConfig) -> Option<PowerUpKind> {
        let index = self.active.iter().position(|a| a.id == id)?;
        let effect = self.active.remove(index);
        if effect.kind.resizes_paddle() {
            resize_paddle(player, player.base_height, config);
        }
        Some(effect.kind)
    }

}

/// Change paddle height and keep it on the board
fn resize_paddle(paddle: &mut Paddle, height: f32, config: &GameConfig) {
    paddle.height = height;
    paddle.y = config.clamp_paddle_y(paddle.y, height);
}
