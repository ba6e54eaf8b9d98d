//! Game configuration
//!
//! Per-difficulty tuning lives in a fixed table keyed by [`Difficulty`];
//! board dimensions and mechanics constants live in [`GameConfig`], which can
//! be overridden from JSON by the embedding frontend.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Difficulty levels, fixed for the duration of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    /// All difficulties, easiest first
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Expert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Expert => "Expert",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" | "normal" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            "expert" | "insane" => Some(Difficulty::Expert),
            _ => None,
        }
    }

    /// Menu label
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Beginner",
            Difficulty::Medium => "Normal",
            Difficulty::Hard => "Challenging",
            Difficulty::Expert => "Insane",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Gentle start, slow & steady",
            Difficulty::Medium => "Balanced challenge, smooth progression",
            Difficulty::Hard => "Fast-paced, gets wild quickly",
            Difficulty::Expert => "Lightning fast, pure chaos!",
        }
    }

    /// Tuning constants for this difficulty
    pub const fn config(self) -> DifficultyConfig {
        match self {
            Difficulty::Easy => DifficultyConfig {
                ai_speed: 3.0,
                ai_reaction: 0.08,
                ball_speed_increase: 1.2,
                max_ball_speed: 16.0,
                difficulty_multiplier: 0.8,
            },
            Difficulty::Medium => DifficultyConfig {
                ai_speed: 4.0,
                ai_reaction: 0.1,
                ball_speed_increase: 1.6,
                max_ball_speed: 20.0,
                difficulty_multiplier: 1.0,
            },
            Difficulty::Hard => DifficultyConfig {
                ai_speed: 5.0,
                ai_reaction: 0.1,
                ball_speed_increase: 2.2,
                max_ball_speed: 24.0,
                difficulty_multiplier: 1.3,
            },
            Difficulty::Expert => DifficultyConfig {
                ai_speed: 6.0,
                ai_reaction: 0.12,
                ball_speed_increase: 3.0,
                max_ball_speed: 32.0,
                difficulty_multiplier: 1.6,
            },
        }
    }
}

/// Immutable per-difficulty tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyConfig {
    /// AI tracking gain
    pub ai_speed: f32,
    /// AI smoothing factor (fraction of the remaining gap closed per tick, per unit of speed)
    pub ai_reaction: f32,
    /// Ball speed added on each player return
    pub ball_speed_increase: f32,
    /// Hard cap on ball speed after any hit
    pub max_ball_speed: f32,
    /// Scales the serve speed
    pub difficulty_multiplier: f32,
}

/// Power-up tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpConfig {
    /// Side of the square footprint
    pub size: f32,
    /// Uncollected power-ups vanish after this long
    pub board_timeout_ms: u32,
    /// Keep spawns this far away from every board edge
    pub spawn_margin: f32,
    /// Score at which the first power-up appears
    pub first_spawn_score: u64,
    /// Score interval between later spawns
    pub spawn_interval: u64,

    pub speed_up_factor: f32,
    pub slow_down_factor: f32,
    pub speed_effect_ms: u32,

    pub grow_factor: f32,
    pub shrink_factor: f32,
    pub max_paddle_height: f32,
    pub min_paddle_height: f32,
    pub paddle_effect_ms: u32,
}

impl Default for PowerUpConfig {
    fn default() -> Self {
        Self {
            size: 32.0,
            board_timeout_ms: 15_000,
            spawn_margin: 50.0,
            first_spawn_score: 2,
            spawn_interval: 5,

            speed_up_factor: 1.5,
            slow_down_factor: 0.7,
            speed_effect_ms: 10_000,

            grow_factor: 1.3,
            shrink_factor: 0.8,
            max_paddle_height: 200.0,
            min_paddle_height: 40.0,
            paddle_effect_ms: 15_000,
        }
    }
}

/// Board dimensions and mechanics constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Board ===
    pub board_width: f32,
    pub board_height: f32,

    // === Entities ===
    pub ball_size: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub player_paddle_speed: f32,
    /// Serve speed before the difficulty multiplier
    pub initial_ball_speed: f32,

    // === Mechanics ===
    pub tick_rate_hz: u32,
    pub paddle_tolerance: f32,
    pub power_up_tolerance: f32,
    pub hit_angle_multiplier: f32,
    pub ai_hit_speed_fraction: f32,
    /// Max vertical serve speed is half of this
    pub serve_vertical_range: f32,
    /// Ticks of look-ahead for the predictive paddle check
    pub lookahead_ticks: f32,
    pub ball_reset_delay_ms: u32,
    pub extra_life_save_scale: f32,
    pub extra_life_notice_ms: u32,
    pub stuck_timeout_ms: u32,
    pub stuck_epsilon: f32,

    pub power_ups: PowerUpConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_width: BOARD_WIDTH,
            board_height: BOARD_HEIGHT,

            ball_size: BALL_SIZE,
            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            player_paddle_speed: PLAYER_PADDLE_SPEED,
            initial_ball_speed: BALL_START_SPEED,

            tick_rate_hz: TICK_RATE_HZ,
            paddle_tolerance: PADDLE_TOLERANCE,
            power_up_tolerance: POWER_UP_TOLERANCE,
            hit_angle_multiplier: HIT_ANGLE_MULTIPLIER,
            ai_hit_speed_fraction: AI_HIT_SPEED_FRACTION,
            serve_vertical_range: 2.0,
            lookahead_ticks: 2.0,
            ball_reset_delay_ms: 1_000,
            extra_life_save_scale: 0.7,
            extra_life_notice_ms: 3_000,
            stuck_timeout_ms: 2_000,
            stuck_epsilon: 0.5,

            power_ups: PowerUpConfig::default(),
        }
    }
}

/// Configuration rejected before a game is built from it
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl GameConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the config describes a playable board
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be a positive number, got {value}"),
                })
            }
        }

        fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be zero or a positive number, got {value}"),
                })
            }
        }

        positive("board_width", self.board_width)?;
        positive("board_height", self.board_height)?;
        positive("ball_size", self.ball_size)?;
        positive("paddle_width", self.paddle_width)?;
        positive("paddle_height", self.paddle_height)?;
        positive("player_paddle_speed", self.player_paddle_speed)?;
        positive("initial_ball_speed", self.initial_ball_speed)?;
        positive("power_ups.size", self.power_ups.size)?;
        positive("power_ups.speed_up_factor", self.power_ups.speed_up_factor)?;
        positive("power_ups.slow_down_factor", self.power_ups.slow_down_factor)?;
        positive("power_ups.grow_factor", self.power_ups.grow_factor)?;
        positive("power_ups.shrink_factor", self.power_ups.shrink_factor)?;
        positive("power_ups.min_paddle_height", self.power_ups.min_paddle_height)?;

        non_negative("paddle_tolerance", self.paddle_tolerance)?;
        non_negative("power_up_tolerance", self.power_up_tolerance)?;
        non_negative("hit_angle_multiplier", self.hit_angle_multiplier)?;
        non_negative("ai_hit_speed_fraction", self.ai_hit_speed_fraction)?;
        non_negative("serve_vertical_range", self.serve_vertical_range)?;
        non_negative("lookahead_ticks", self.lookahead_ticks)?;
        non_negative("extra_life_save_scale", self.extra_life_save_scale)?;
        non_negative("stuck_epsilon", self.stuck_epsilon)?;

        if self.tick_rate_hz == 0 {
            return Err(ConfigError::Invalid {
                field: "tick_rate_hz",
                reason: "must be at least 1".into(),
            });
        }
        if self.paddle_height >= self.board_height {
            return Err(ConfigError::Invalid {
                field: "paddle_height",
                reason: format!(
                    "{} does not fit a board of height {}",
                    self.paddle_height, self.board_height
                ),
            });
        }
        if self.ball_size >= self.board_height || self.paddle_width * 2.0 >= self.board_width {
            return Err(ConfigError::Invalid {
                field: "ball_size",
                reason: "ball and paddles must fit inside the board".into(),
            });
        }
        if self.power_ups.spawn_margin * 2.0 >= self.board_width.min(self.board_height) {
            return Err(ConfigError::Invalid {
                field: "power_ups.spawn_margin",
                reason: "leaves no room to spawn".into(),
            });
        }
        if self.power_ups.min_paddle_height > self.power_ups.max_paddle_height
            || self.power_ups.max_paddle_height >= self.board_height
        {
            return Err(ConfigError::Invalid {
                field: "power_ups.max_paddle_height",
                reason: "paddle bounds must satisfy min <= max < board_height".into(),
            });
        }
        if self.paddle_height < self.power_ups.min_paddle_height
            || self.paddle_height > self.power_ups.max_paddle_height
        {
            return Err(ConfigError::Invalid {
                field: "paddle_height",
                reason: format!(
                    "{} is outside the power-up bounds [{}, {}]",
                    self.paddle_height, self.power_ups.min_paddle_height, self.power_ups.max_paddle_height
                ),
            });
        }
        if self.power_ups.spawn_interval == 0 {
            return Err(ConfigError::Invalid {
                field: "power_ups.spawn_interval",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Duration helper bound to this config's tick rate
    pub fn ticks(&self, ms: u32) -> u64 {
        crate::ms_to_ticks(ms, self.tick_rate_hz)
    }

    /// Left edge of the paddle on the given side
    pub fn paddle_x(&self, side: crate::sim::Side) -> f32 {
        match side {
            crate::sim::Side::Player => 0.0,
            crate::sim::Side::Ai => self.board_width - self.paddle_width,
        }
    }

    /// Clamp a paddle top edge into `[0, board_height - height]`
    pub fn clamp_paddle_y(&self, y: f32, height: f32) -> f32 {
        let max = (self.board_height - height).max(0.0);
        if y.is_nan() {
            return max / 2.0;
        }
        y.clamp(0.0, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_parse() {
        assert_eq!(Difficulty::from_str("EXPERT"), Some(Difficulty::Expert));
        assert_eq!(Difficulty::from_str("med"), Some(Difficulty::Medium));
        assert_eq!(Difficulty::from_str("nightmare"), None);
        for d in Difficulty::ALL {
            assert_eq!(Difficulty::from_str(d.as_str()), Some(d));
        }
    }

    #[test]
    fn test_difficulty_table_is_monotonic() {
        for pair in Difficulty::ALL.windows(2) {
            let (easier, harder) = (pair[0].config(), pair[1].config());
            assert!(harder.ball_speed_increase >= easier.ball_speed_increase);
            assert!(harder.max_ball_speed >= easier.max_ball_speed);
            assert!(harder.difficulty_multiplier >= easier.difficulty_multiplier);
            assert!(harder.ai_speed >= easier.ai_speed);
        }
    }

    #[test]
    fn test_from_json_partial_overrides() {
        let config = GameConfig::from_json(r#"{ "board_width": 1000, "power_ups": { "size": 20 } }"#)
            .unwrap();
        assert_eq!(config.board_width, 1000.0);
        assert_eq!(config.board_height, BOARD_HEIGHT);
        assert_eq!(config.power_ups.size, 20.0);
        assert_eq!(config.power_ups.board_timeout_ms, 15_000);
    }

    #[test]
    fn test_from_json_rejects_bad_values() {
        let err = GameConfig::from_json(r#"{ "paddle_height": 500 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "paddle_height", .. }));

        let err = GameConfig::from_json(r#"{ "ball_size": -1 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "ball_size", .. }));

        let err = GameConfig::from_json("not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validate_rejects_bad_mechanics() {
        let err = GameConfig::from_json(r#"{ "lookahead_ticks": -2 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "lookahead_ticks", .. }));

        let err = GameConfig::from_json(r#"{ "paddle_tolerance": -1 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "paddle_tolerance", .. }));

        let err = GameConfig::from_json(r#"{ "power_ups": { "speed_up_factor": 0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "power_ups.speed_up_factor", .. }));

        let err = GameConfig::from_json(r#"{ "power_ups": { "min_paddle_height": 0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "power_ups.min_paddle_height", .. }));

        // NaN cannot come through JSON
        let config = GameConfig {
            hit_angle_multiplier: f32::NAN,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "hit_angle_multiplier", .. })
        ));

        // Zero tolerance is a strict overlap test
        assert!(GameConfig::from_json(r#"{ "paddle_tolerance": 0 }"#).is_ok());
    }

    #[test]
    fn test_validate_paddle_inside_power_up_bounds() {
        // Grow would shrink a paddle that starts above the max
        let err = GameConfig::from_json(r#"{ "paddle_height": 250, "board_height": 600 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "paddle_height", .. }));

        let err = GameConfig::from_json(r#"{ "paddle_height": 30 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "paddle_height", .. }));

        assert!(GameConfig::from_json(r#"{ "paddle_height": 200 }"#).is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_spawn_interval() {
        let err = GameConfig::from_json(r#"{ "power_ups": { "spawn_interval": 0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "power_ups.spawn_interval", .. }));
    }

    #[test]
    fn test_clamp_paddle_y() {
        let config = GameConfig::default();
        assert_eq!(config.clamp_paddle_y(-50.0, 80.0), 0.0);
        assert_eq!(config.clamp_paddle_y(1000.0, 80.0), 320.0);
        assert_eq!(config.clamp_paddle_y(100.0, 80.0), 100.0);
        assert_eq!(config.clamp_paddle_y(f32::NAN, 80.0), 160.0);
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }
}
