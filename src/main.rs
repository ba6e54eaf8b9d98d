//! Bounce Pong headless runner
//!
//! Plays one game with the autopilot on the player paddle and prints the
//! final snapshot. The browser build drives the simulation through
//! `bounce_pong::wasm::WasmGame` instead.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::fs;
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::Parser;

    use bounce_pong::sim::GameEvent;
    use bounce_pong::{Difficulty, Game, GameConfig, GameStatus, HighScores, TickInput};

    #[derive(Parser, Debug)]
    #[command(about = "Run a headless Bounce Pong game on autopilot", version)]
    struct Args {
        /// easy, medium, hard or expert
        #[arg(long, default_value = "medium", value_parser = parse_difficulty)]
        difficulty: Difficulty,
        /// RNG seed; the same seed replays the same game
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Stop after this many ticks even if the game is still running
        #[arg(long, default_value_t = 60 * 60 * 5)]
        ticks: u64,
        /// JSON file overriding the default board and mechanics
        #[arg(long)]
        config: Option<PathBuf>,
        /// Nickname recorded on the leaderboard
        #[arg(long, default_value = "Autopilot")]
        name: String,
    }

    fn parse_difficulty(s: &str) -> Result<Difficulty, String> {
        Difficulty::from_str(s).ok_or_else(|| format!("unknown difficulty '{s}'"))
    }

    fn load_config(path: Option<&PathBuf>) -> Result<GameConfig> {
        let Some(path) = path else {
            return Ok(GameConfig::default());
        };
        let json = fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
        let config = GameConfig::from_json(&json).with_context(|| format!("parse config {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn run() -> Result<()> {
        env_logger::init();
        let args = Args::parse();
        let config = load_config(args.config.as_ref())?;

        log::info!("Bounce Pong (native) starting...");

        let mut scores = HighScores::new();
        scores.set_player_name(&args.name);
        let mut game = Game::with_sink(config, args.seed, scores)?;
        game.start_game(args.difficulty);

        let input = TickInput {
            autopilot: true,
            ..TickInput::default()
        };
        for _ in 0..args.ticks {
            game.step(&input);
            for event in game.drain_events() {
                match &event {
                    GameEvent::PaddleHit { .. } | GameEvent::PointScored { .. } => log::trace!("{:?}", event),
                    _ => log::info!("[tick {}] {:?}", game.now(), event),
                }
            }
            if game.status() == GameStatus::GameOver {
                break;
            }
        }

        if game.status() == GameStatus::Playing {
            log::info!("Tick limit reached, ending run");
            game.set_status(GameStatus::GameOver);
        }

        println!("{}", serde_json::to_string_pretty(&game.snapshot())?);
        println!("{}", serde_json::to_string_pretty(&game.sink().entries)?);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is WasmGame, this is just to satisfy the compiler
}
