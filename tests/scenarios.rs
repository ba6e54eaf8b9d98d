use bounce_pong::sim::GameEvent;
use bounce_pong::{Difficulty, Game, GameConfig, GameStatus, HighScores, TickInput};

fn autopilot() -> TickInput {
    TickInput {
        autopilot: true,
        ..TickInput::default()
    }
}

/// Hold the player paddle against the top wall until the run ends
fn play_until_over(game: &mut Game<HighScores>, limit: u64) -> bool {
    let input = TickInput {
        player_y: Some(0.0),
        ..TickInput::default()
    };
    for _ in 0..limit {
        game.step(&input);
        if game.status() == GameStatus::GameOver {
            return true;
        }
    }
    false
}

#[test]
fn test_same_seed_same_game() {
    let mut a = Game::new(GameConfig::default(), 2024).unwrap();
    let mut b = Game::new(GameConfig::default(), 2024).unwrap();
    a.start_game(Difficulty::Hard);
    b.start_game(Difficulty::Hard);

    for _ in 0..3000 {
        a.step(&autopilot());
        b.step(&autopilot());
        assert_eq!(a.snapshot(), b.snapshot());
    }
    assert_eq!(a.drain_events(), b.drain_events());
}

#[test]
fn test_menu_is_idle() {
    let mut game = Game::new(GameConfig::default(), 5).unwrap();
    for _ in 0..50 {
        game.step(&autopilot());
    }
    assert_eq!(game.status(), GameStatus::Menu);
    assert_eq!(game.now(), 0);
}

#[test]
fn test_pause_keeps_clock_running() {
    let mut game = Game::new(GameConfig::default(), 9).unwrap();
    game.start_game(Difficulty::Medium);
    game.step(&TickInput {
        pause: true,
        ..TickInput::default()
    });
    assert_eq!(game.status(), GameStatus::Paused);

    let frozen = *game.ball();
    let start = game.now();
    for _ in 0..120 {
        game.tick();
    }
    assert_eq!(*game.ball(), frozen);
    assert_eq!(game.now(), start + 120);
}

#[test]
fn test_full_run_reaches_leaderboard() {
    let mut scores = HighScores::new();
    scores.set_player_name("tester");
    let mut game = Game::with_sink(GameConfig::default(), 77, scores).unwrap();
    game.start_game(Difficulty::Easy);

    assert!(play_until_over(&mut game, 100_000), "a parked paddle eventually misses");
    let final_score = game.state().player_score;

    let entries = &game.sink().entries;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].score, final_score);
    assert_eq!(entries[0].difficulty, Difficulty::Easy);
    assert_eq!(entries[0].nickname, "tester");

    let events = game.drain_events();
    let overs = events.iter().filter(|e| matches!(e, GameEvent::GameOver { .. })).count();
    assert_eq!(overs, 1);

    // Idle ticks after the end never save again
    for _ in 0..200 {
        game.tick();
    }
    assert_eq!(game.sink().entries.len(), 1);

    assert!(game.set_status(GameStatus::Leaderboard));
    assert!(game.restart());
    assert_eq!(game.status(), GameStatus::Playing);
    assert_eq!(game.state().difficulty, Difficulty::Easy);
    assert_eq!(game.state().player_score, 0);
}

#[test]
fn test_second_run_saves_separately() {
    let mut game = Game::with_sink(GameConfig::default(), 31, HighScores::new()).unwrap();
    game.start_game(Difficulty::Medium);
    assert!(play_until_over(&mut game, 100_000));

    game.start_game(Difficulty::Expert);
    assert!(play_until_over(&mut game, 100_000));

    let difficulties: Vec<Difficulty> = game.sink().entries.iter().map(|e| e.difficulty).collect();
    assert_eq!(difficulties.len(), 2);
    assert!(difficulties.contains(&Difficulty::Medium));
    assert!(difficulties.contains(&Difficulty::Expert));
}

#[test]
fn test_autopilot_keeps_rally_alive() {
    let mut game = Game::new(GameConfig::default(), 3).unwrap();
    game.start_game(Difficulty::Easy);
    for _ in 0..600 {
        game.step(&autopilot());
    }
    assert_ne!(game.status(), GameStatus::Menu);
    assert!(game.drain_events().iter().any(|e| matches!(e, GameEvent::PaddleHit { .. })));
}

#[test]
fn test_reset_to_menu_discards_run() {
    let mut game = Game::new(GameConfig::default(), 8).unwrap();
    game.start_game(Difficulty::Hard);
    for _ in 0..300 {
        game.step(&autopilot());
    }

    game.reset_to_menu();
    assert_eq!(game.status(), GameStatus::Menu);
    assert_eq!(game.state().player_score, 0);
    assert!(game.power_ups().is_empty());
    assert!(game.active_power_ups().is_empty());
    assert_eq!(game.pending_actions(), 0);
    assert_eq!(game.player().height, game.config().paddle_height);
}

#[test]
fn test_snapshot_and_events_serialize() {
    let mut game = Game::new(GameConfig::default(), 11).unwrap();
    game.start_game(Difficulty::Medium);
    for _ in 0..100 {
        game.step(&autopilot());
    }

    let json = serde_json::to_string(&game.snapshot()).unwrap();
    assert!(json.contains("\"player_score\""));
    let events = serde_json::to_string(&game.drain_events()).unwrap();
    assert!(events.contains("StatusChanged"));
}

#[test]
fn test_custom_config_board() {
    let config = GameConfig::from_json(r#"{"board_width": 1000.0, "board_height": 500.0}"#).unwrap();
    let mut game = Game::new(config, 4).unwrap();
    game.start_game(Difficulty::Medium);
    assert_eq!(game.ai().y, 250.0 - game.ai().height / 2.0);

    game.update_player_paddle_position(10_000.0);
    assert_eq!(game.player().y, 500.0 - game.player().height);
}
