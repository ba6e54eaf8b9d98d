//! Browser binding
//!
//! Thin wrapper the page script drives: forward pointer/keyboard commands,
//! call `frame` from `requestAnimationFrame`, render from `snapshot_json`.
//! The leaderboard is exchanged as JSON so the page can keep it in storage.

use wasm_bindgen::prelude::*;

use crate::consts::MAX_SUBSTEPS;
use crate::highscores::HighScores;
use crate::sim::{Game, GameStatus, TickInput};
use crate::{Difficulty, GameConfig, frame_dt};

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        return;
    }
    log::info!("Bounce Pong starting...");
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_difficulty(name: &str) -> Result<Difficulty, JsValue> {
    Difficulty::from_str(name).ok_or_else(|| JsValue::from_str(&format!("unknown difficulty '{name}'")))
}

fn parse_status(name: &str) -> Option<GameStatus> {
    match name.to_ascii_lowercase().as_str() {
        "menu" => Some(GameStatus::Menu),
        "playing" => Some(GameStatus::Playing),
        "paused" => Some(GameStatus::Paused),
        "gameover" | "game_over" => Some(GameStatus::GameOver),
        "leaderboard" => Some(GameStatus::Leaderboard),
        _ => None,
    }
}

#[wasm_bindgen]
pub struct WasmGame {
    game: Game<HighScores>,
    /// Unsimulated time carried between frames (ms)
    accumulator: f64,
    last_time: Option<f64>,
    /// Latest pointer height, applied on the next tick
    pointer_y: Option<f32>,
    pause_requested: bool,
}

#[wasm_bindgen]
impl WasmGame {
    /// New session. `config_json` may be empty for the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str, leaderboard_json: &str) -> Result<WasmGame, JsValue> {
        let config = if config_json.trim().is_empty() {
            GameConfig::default()
        } else {
            GameConfig::from_json(config_json).map_err(js_error)?
        };
        let scores = if leaderboard_json.trim().is_empty() {
            HighScores::new()
        } else {
            HighScores::from_json(leaderboard_json).unwrap_or_else(|e| {
                log::warn!("Discarding unreadable leaderboard: {}", e);
                HighScores::new()
            })
        };

        let seed = js_sys::Date::now() as u64;
        log::info!("Session seed {}", seed);
        Ok(WasmGame {
            game: Game::with_sink(config, seed, scores).map_err(js_error)?,
            accumulator: 0.0,
            last_time: None,
            pointer_y: None,
            pause_requested: false,
        })
    }

    pub fn start_game(&mut self, difficulty: &str) -> Result<(), JsValue> {
        let difficulty = parse_difficulty(difficulty)?;
        self.game.start_game(difficulty);
        self.accumulator = 0.0;
        Ok(())
    }

    pub fn restart(&mut self) -> bool {
        self.game.restart()
    }

    /// Queue a pause toggle for the next tick
    pub fn pause_toggle(&mut self) {
        self.pause_requested = true;
    }

    pub fn reset_to_menu(&mut self) {
        self.game.reset_to_menu();
    }

    pub fn set_status(&mut self, status: &str) -> bool {
        match parse_status(status) {
            Some(status) => self.game.set_status(status),
            None => {
                log::warn!("Unknown status '{}'", status);
                false
            }
        }
    }

    /// Pointer height in board coordinates; last write before a tick wins
    pub fn update_player_paddle_position(&mut self, pointer_y: f32) {
        self.pointer_y = Some(pointer_y);
    }

    /// Run as many fixed ticks as the elapsed time allows. Returns ticks run.
    pub fn frame(&mut self, time_ms: f64) -> u32 {
        let tick_ms = 1000.0 / self.game.config().tick_rate_hz as f64;
        self.accumulator += frame_dt(self.last_time, time_ms, tick_ms);
        if time_ms.is_finite() {
            self.last_time = Some(time_ms);
        }

        let mut substeps = 0;
        while self.accumulator >= tick_ms && substeps < MAX_SUBSTEPS {
            self.tick();
            self.accumulator -= tick_ms;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS {
            self.accumulator = 0.0;
        }
        substeps
    }

    /// Advance exactly one tick with the pending input
    pub fn tick(&mut self) {
        let input = TickInput {
            player_y: self.pointer_y.take(),
            pause: std::mem::take(&mut self.pause_requested),
            autopilot: false,
        };
        self.game.step(&input);
    }

    pub fn status(&self) -> String {
        format!("{:?}", self.game.status())
    }

    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.game.snapshot()).map_err(js_error)
    }

    /// Notifications since the last call, as a JSON array
    pub fn drain_events_json(&mut self) -> Result<String, JsValue> {
        serde_json::to_string(&self.game.drain_events()).map_err(js_error)
    }

    pub fn leaderboard_json(&self) -> Result<String, JsValue> {
        self.game.sink().to_json().map_err(js_error)
    }

    pub fn set_player_name(&mut self, name: &str) {
        self.game.sink_mut().set_player_name(name);
    }

    pub fn clear_leaderboard(&mut self) {
        self.game.sink_mut().clear();
    }

    /// Rank the given score would get, 0 if it would not make the board
    pub fn potential_rank(&self, score: u64) -> u32 {
        self.game.sink().potential_rank(score).map(|r| r as u32).unwrap_or(0)
    }
}
