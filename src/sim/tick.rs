//! Fixed timestep game loop and run state machine
//!
//! `Game` owns every entity of the current run and advances it one tick at a
//! time. Commands from the presentation layer (start, pause, paddle position)
//! mutate it between ticks; the renderer reads a [`Snapshot`] after each tick.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision;
use super::factory;
use super::physics;
use super::powerups::{EffectTargets, PowerUps, is_spawn_score};
use super::scheduler::{ScheduledAction, Scheduler};
use super::state::{Ball, GameEvent, GameState, GameStatus, Paddle, PowerUp, ReseedReason, Side, Snapshot};
use crate::config::{ConfigError, Difficulty, GameConfig};
use crate::highscores::{NoopSink, ScoreSink};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer height the player paddle should center on
    pub player_y: Option<f32>,
    /// Pause toggle
    pub pause: bool,
    /// Attract mode - the player paddle follows the ball by itself
    pub autopilot: bool,
}

/// How the side-edge check ended the tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rally {
    Continues,
    /// Ball got past the AI and waits for the serve
    Parked,
    Over,
}

/// One game session: the current run plus everything needed to start the next
pub struct Game<S: ScoreSink = NoopSink> {
    config: GameConfig,
    seed: u64,
    rng: Pcg32,
    state: GameState,
    ball: Ball,
    player: Paddle,
    ai: Paddle,
    power_ups: PowerUps,
    scheduler: Scheduler,
    events: Vec<GameEvent>,
    /// Scheduler clock; advances on every tick while a run exists
    now: u64,
    /// Ball is parked until the serve fires
    serving: bool,
    extra_life_notice: bool,
    notice_until: u64,
    stuck_anchor: Vec2,
    stuck_ticks: u64,
    sink: S,
}

impl Game<NoopSink> {
    /// Game that discards finished scores
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_sink(config, seed, NoopSink)
    }
}

impl<S: ScoreSink> Game<S> {
    /// Game that reports every finished run to `sink`.
    ///
    /// The config is validated here; a game never runs on a rejected one.
    pub fn with_sink(config: GameConfig, seed: u64, sink: S) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut rng = Pcg32::seed_from_u64(seed);
        let difficulty = Difficulty::default();
        let ball = factory::new_ball_random(&config, difficulty, &mut rng);
        let player = factory::new_paddle(&config, Side::Player, difficulty);
        let ai = factory::new_paddle(&config, Side::Ai, difficulty);

        Ok(Self {
            seed,
            rng,
            state: GameState::default(),
            stuck_anchor: ball.pos,
            ball,
            player,
            ai,
            power_ups: PowerUps::new(),
            scheduler: Scheduler::new(),
            events: Vec::new(),
            now: 0,
            serving: false,
            extra_life_notice: false,
            notice_until: 0,
            stuck_ticks: 0,
            sink,
            config,
        })
    }

    // === Read access ===

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn status(&self) -> GameStatus {
        self.state.status
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn player(&self) -> &Paddle {
        &self.player
    }

    pub fn ai(&self) -> &Paddle {
        &self.ai
    }

    pub fn power_ups(&self) -> &[PowerUp] {
        &self.power_ups.board
    }

    pub fn active_power_ups(&self) -> &[PowerUp] {
        &self.power_ups.active
    }

    /// Ticks elapsed on the scheduler clock
    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn is_serving(&self) -> bool {
        self.serving
    }

    pub fn extra_life_notice(&self) -> bool {
        self.extra_life_notice
    }

    /// Delayed actions still queued for this run
    pub fn pending_actions(&self) -> usize {
        self.scheduler.pending()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Copy of everything the renderer needs
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.now,
            state: self.state.clone(),
            ball: self.ball,
            player: self.player,
            ai: self.ai,
            power_ups: self.power_ups.board.clone(),
            active_power_ups: self.power_ups.active.clone(),
            extra_life_notice: self.extra_life_notice,
            serving: self.serving,
        }
    }

    /// Take all notifications raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // === Commands ===

    /// Begin a fresh run. Anything left from a previous run is discarded.
    pub fn start_game(&mut self, difficulty: Difficulty) {
        log::info!("Starting {} game (seed {})", difficulty.as_str(), self.seed);
        self.reset_entities(difficulty);
        self.state.difficulty = difficulty;
        self.transition(GameStatus::Playing);
    }

    /// Play again at the same difficulty after a run ended
    pub fn restart(&mut self) -> bool {
        match self.state.status {
            GameStatus::GameOver | GameStatus::Leaderboard => {
                self.start_game(self.state.difficulty);
                true
            }
            other => {
                log::warn!("Ignoring restart while {:?}", other);
                false
            }
        }
    }

    /// Playing <-> Paused. Pending timers keep running while paused.
    pub fn pause_toggle(&mut self) -> bool {
        match self.state.status {
            GameStatus::Playing => {
                self.transition(GameStatus::Paused);
                true
            }
            GameStatus::Paused => {
                self.transition(GameStatus::Playing);
                true
            }
            other => {
                log::warn!("Ignoring pause toggle while {:?}", other);
                false
            }
        }
    }

    /// Abandon whatever is going on and return to the menu
    pub fn reset_to_menu(&mut self) {
        let difficulty = self.state.difficulty;
        self.reset_entities(Difficulty::default());
        self.state.difficulty = difficulty;
        self.transition(GameStatus::Menu);
    }

    /// Explicit status change, used for leaderboard navigation.
    ///
    /// Only moves that make sense from the current status are accepted;
    /// anything else is logged and ignored.
    pub fn set_status(&mut self, to: GameStatus) -> bool {
        use GameStatus::*;

        let from = self.state.status;
        match (from, to) {
            _ if from == to => true,
            (_, Menu) => {
                self.reset_to_menu();
                true
            }
            (Playing, Paused) | (Paused, Playing) => self.pause_toggle(),
            (Playing | Paused, GameOver) => {
                self.end_run();
                true
            }
            (GameOver, Leaderboard) | (Leaderboard, GameOver) => {
                self.transition(to);
                true
            }
            (GameOver | Leaderboard, Playing) => self.restart(),
            _ => {
                log::warn!("Rejected status change {:?} -> {:?}", from, to);
                false
            }
        }
    }

    /// Center the player paddle on `pointer_y`, clamped to the board
    pub fn update_player_paddle_position(&mut self, pointer_y: f32) {
        let top = pointer_y - self.player.height / 2.0;
        self.player.y = self.config.clamp_paddle_y(top, self.player.height);
    }

    /// Apply one tick's worth of input, then advance
    pub fn step(&mut self, input: &TickInput) {
        if let Some(y) = input.player_y {
            self.update_player_paddle_position(y);
        }
        if input.pause {
            self.pause_toggle();
        }
        if input.autopilot && self.state.status == GameStatus::Playing {
            self.player = physics::advance_autopilot(&self.player, &self.ball, &self.config);
        }
        self.tick();
    }

    /// Advance by one tick.
    ///
    /// Delayed actions fire whenever a run exists, paused or not; the
    /// simulation itself only runs while playing.
    pub fn tick(&mut self) {
        if self.state.status == GameStatus::Menu {
            return;
        }
        self.now += 1;
        self.run_scheduled();

        if self.state.status == GameStatus::Playing {
            self.simulate();
        }
    }

    // === Tick body ===

    fn simulate(&mut self) {
        let difficulty = self.state.difficulty.config();

        self.ai = physics::advance_ai(&self.ai, &self.ball, &self.config, &difficulty);

        if self.serving {
            return;
        }
        if self.ball.is_degenerate() {
            self.reseed_ball(ReseedReason::DegenerateVelocity);
            return;
        }

        let prev = self.ball;
        self.ball = physics::advance_ball(&prev, &self.config);
        physics::bounce_walls(&mut self.ball, &self.config);

        let player_hit = self.resolve_paddle_hit(&prev, Side::Player);
        let ai_hit = !player_hit && self.resolve_paddle_hit(&prev, Side::Ai);

        if self.resolve_edges(player_hit, ai_hit) != Rally::Continues {
            return;
        }

        self.collect_power_ups();
        self.check_stuck();
    }

    fn resolve_paddle_hit(&mut self, prev: &Ball, side: Side) -> bool {
        // Only balls heading into the paddle can hit it
        if self.ball.vel.x * side.outward() >= 0.0 {
            return false;
        }

        let paddle = match side {
            Side::Player => self.player,
            Side::Ai => self.ai,
        };
        let hit = collision::paddle_collision_comprehensive(
            prev,
            &self.ball,
            &paddle,
            self.config.paddle_x(side),
            self.config.paddle_tolerance,
            self.config.lookahead_ticks,
        );
        if !hit {
            return false;
        }

        let difficulty = self.state.difficulty.config();
        self.ball = physics::apply_paddle_hit(&self.ball, &paddle, side, &self.config, &difficulty);
        self.emit(GameEvent::PaddleHit {
            side,
            speed: self.ball.speed(),
        });

        if side == Side::Player {
            self.award_point();
        }
        true
    }

    fn resolve_edges(&mut self, player_hit: bool, ai_hit: bool) -> Rally {
        if !player_hit && self.ball.pos.x <= 0.0 {
            if self.state.extra_lives > 0 {
                self.save_with_extra_life();
                return Rally::Continues;
            }
            self.end_run();
            return Rally::Over;
        }

        // The return that beat the AI already scored on the paddle hit
        if !ai_hit && self.ball.pos.x >= self.config.board_width {
            self.serving = true;
            let fire_at = self.now + self.config.ticks(self.config.ball_reset_delay_ms);
            self.scheduler.schedule(fire_at, ScheduledAction::ServeBall);
            return Rally::Parked;
        }

        Rally::Continues
    }

    fn save_with_extra_life(&mut self) {
        self.state.extra_lives -= 1;

        let scale = self.config.extra_life_save_scale;
        self.ball.pos = Vec2::new(self.config.board_width / 2.0, self.config.board_height / 2.0);
        self.ball.vel = Vec2::new(-Side::Player.outward() * self.ball.vel.x.abs() * scale, self.ball.vel.y * scale);
        self.reset_stuck_tracker();

        self.extra_life_notice = true;
        self.notice_until = self.now + self.config.ticks(self.config.extra_life_notice_ms);
        self.scheduler
            .schedule(self.notice_until, ScheduledAction::ClearExtraLifeNotice);

        log::debug!("Extra life used, {} left", self.state.extra_lives);
        self.emit(GameEvent::ExtraLifeConsumed {
            remaining: self.state.extra_lives,
        });
    }

    fn award_point(&mut self) {
        self.state.player_score += 1;
        let score = self.state.player_score;
        self.emit(GameEvent::PointScored { score });

        if is_spawn_score(score, &self.config.power_ups) {
            if let Some(power_up) = self.power_ups.spawn(self.now, &self.config, &mut self.rng) {
                let fire_at = self.now + self.config.ticks(power_up.duration_ms);
                self.scheduler
                    .schedule(fire_at, ScheduledAction::ExpireBoardPowerUp(power_up.id));
                self.emit(GameEvent::PowerUpSpawned {
                    id: power_up.id,
                    kind: power_up.kind,
                });
            }
        }
    }

    fn collect_power_ups(&mut self) {
        for id in self.power_ups.touching(&self.ball, self.config.power_up_tolerance) {
            let targets = EffectTargets {
                ball: &mut self.ball,
                player: &mut self.player,
                extra_lives: &mut self.state.extra_lives,
                max_ball_speed: self.state.difficulty.config().max_ball_speed,
            };
            let Some(collected) = self.power_ups.collect(id, self.now, targets, &self.config) else {
                continue;
            };

            if let Some(effect_ms) = collected.effect_ms {
                let fire_at = self.now + self.config.ticks(effect_ms);
                self.scheduler.schedule(fire_at, ScheduledAction::ExpireEffect(id));
            }
            self.emit(GameEvent::PowerUpCollected {
                id,
                kind: collected.kind,
            });
        }
    }

    fn check_stuck(&mut self) {
        if self.ball.pos.distance(self.stuck_anchor) > self.config.stuck_epsilon {
            self.reset_stuck_tracker();
            return;
        }
        self.stuck_ticks += 1;
        if self.stuck_ticks >= self.config.ticks(self.config.stuck_timeout_ms) {
            self.reseed_ball(ReseedReason::Stuck);
        }
    }

    fn run_scheduled(&mut self) {
        for action in self.scheduler.take_due(self.now) {
            match action {
                ScheduledAction::ExpireBoardPowerUp(id) => {
                    if self.power_ups.expire_board(id) {
                        log::debug!("Power-up {:?} timed out", id);
                        self.emit(GameEvent::PowerUpExpired { id });
                    }
                }
                ScheduledAction::ExpireEffect(id) => {
                    if let Some(kind) = self.power_ups.expire_effect(id, &mut self.player, &self.config) {
                        log::debug!("{:?} effect {:?} ended", kind, id);
                        self.emit(GameEvent::EffectExpired { id, kind });
                    }
                }
                ScheduledAction::ServeBall => self.serve_ball(),
                ScheduledAction::ClearExtraLifeNotice => {
                    if self.now >= self.notice_until {
                        self.extra_life_notice = false;
                    }
                }
            }
        }
    }

    // === Helpers ===

    fn serve_ball(&mut self) {
        if !self.serving {
            return;
        }
        self.ball = factory::new_ball_random(&self.config, self.state.difficulty, &mut self.rng);
        self.serving = false;
        self.reset_stuck_tracker();
        log::debug!("Ball served at {:?}", self.ball.vel);
        self.emit(GameEvent::BallServed);
    }

    fn reseed_ball(&mut self, reason: ReseedReason) {
        log::warn!("Reseeding ball ({:?}) at {:?} / {:?}", reason, self.ball.pos, self.ball.vel);
        self.ball = factory::new_ball_random(&self.config, self.state.difficulty, &mut self.rng);
        self.reset_stuck_tracker();
        self.emit(GameEvent::BallReseeded { reason });
    }

    fn reset_stuck_tracker(&mut self) {
        self.stuck_anchor = self.ball.pos;
        self.stuck_ticks = 0;
    }

    /// Terminal miss (or forfeit): hand the score to the sink exactly once
    fn end_run(&mut self) {
        if !matches!(self.state.status, GameStatus::Playing | GameStatus::Paused) {
            return;
        }
        let score = self.state.player_score;
        let difficulty = self.state.difficulty;
        log::info!("Game over: {} points on {}", score, difficulty.as_str());

        self.transition(GameStatus::GameOver);
        self.sink.save_score(score, difficulty);
        self.emit(GameEvent::GameOver { score, difficulty });
    }

    /// Fresh entities and an empty timer queue
    fn reset_entities(&mut self, difficulty: Difficulty) {
        self.scheduler.cancel_all();
        self.power_ups = PowerUps::new();
        self.state = GameState {
            difficulty,
            ..GameState::default()
        };
        self.ball = factory::new_ball_random(&self.config, difficulty, &mut self.rng);
        self.player = factory::new_paddle(&self.config, Side::Player, difficulty);
        self.ai = factory::new_paddle(&self.config, Side::Ai, difficulty);
        self.serving = false;
        self.extra_life_notice = false;
        self.notice_until = 0;
        self.reset_stuck_tracker();
    }

    fn transition(&mut self, to: GameStatus) {
        let from = self.state.status;
        self.state.status = to;
        if from != to {
            log::info!("Status {:?} -> {:?}", from, to);
        }
        self.emit(GameEvent::StatusChanged { from, to });
    }

    fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}
