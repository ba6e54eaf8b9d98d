use proptest::prelude::*;

use glam::Vec2;

use bounce_pong::sim::physics::apply_paddle_hit;
use bounce_pong::sim::{Ball, Paddle, Side};
use bounce_pong::{Difficulty, Game, GameConfig, GameStatus, TickInput};

fn difficulty() -> impl Strategy<Value = Difficulty> {
    prop_oneof![
        Just(Difficulty::Easy),
        Just(Difficulty::Medium),
        Just(Difficulty::Hard),
        Just(Difficulty::Expert),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn paddles_stay_on_board(seed in any::<u64>(), difficulty in difficulty(), pointer in prop::collection::vec(-500.0f32..900.0, 1..60)) {
        let mut game = Game::new(GameConfig::default(), seed).unwrap();
        game.start_game(difficulty);
        let height = game.config().board_height;

        for i in 0..1500usize {
            let input = TickInput {
                player_y: Some(pointer[i % pointer.len()]),
                ..TickInput::default()
            };
            game.step(&input);

            for paddle in [game.player(), game.ai()] {
                prop_assert!(paddle.y >= 0.0);
                prop_assert!(paddle.y <= height - paddle.height + 1e-3);
            }
        }
    }

    #[test]
    fn ball_never_exceeds_max_speed(seed in any::<u64>(), difficulty in difficulty()) {
        let mut game = Game::new(GameConfig::default(), seed).unwrap();
        game.start_game(difficulty);
        let max = difficulty.config().max_ball_speed;

        for _ in 0..3000 {
            game.step(&TickInput { autopilot: true, ..TickInput::default() });
            prop_assert!(game.ball().speed() <= max + 1e-3, "speed {}", game.ball().speed());
            if game.status() == GameStatus::GameOver {
                break;
            }
        }
    }

    #[test]
    fn score_and_board_limits(seed in any::<u64>(), difficulty in difficulty()) {
        let mut game = Game::new(GameConfig::default(), seed).unwrap();
        game.start_game(difficulty);
        let mut last_score = 0;

        for _ in 0..3000 {
            game.step(&TickInput { autopilot: true, ..TickInput::default() });
            let score = game.state().player_score;
            prop_assert!(score >= last_score);
            last_score = score;
            prop_assert!(game.power_ups().len() <= 1);
            if game.status() == GameStatus::GameOver {
                break;
            }
        }
    }

    #[test]
    fn replay_is_deterministic(seed in any::<u64>(), difficulty in difficulty(), ticks in 1usize..800) {
        let run = || {
            let mut game = Game::new(GameConfig::default(), seed).unwrap();
            game.start_game(difficulty);
            for _ in 0..ticks {
                game.step(&TickInput { autopilot: true, ..TickInput::default() });
            }
            game.snapshot()
        };
        prop_assert_eq!(run(), run());
    }

    #[test]
    fn any_pointer_is_clamped(pointer in any::<f32>()) {
        let mut game = Game::new(GameConfig::default(), 1).unwrap();
        game.start_game(Difficulty::Medium);
        game.update_player_paddle_position(pointer);
        let paddle = game.player();
        prop_assert!(paddle.y >= 0.0);
        prop_assert!(paddle.y <= game.config().board_height - paddle.height);
    }

    #[test]
    fn harder_difficulty_is_never_slower(vx in 4.0f32..12.0, vy in -3.0f32..3.0, hits in 1usize..30) {
        let config = GameConfig::default();
        let paddle = Paddle { y: 160.0, height: 80.0, width: 12.0, speed: 8.0, base_height: 80.0 };

        let speed_after = |difficulty: Difficulty| {
            let table = difficulty.config();
            // Center hits: no deflection, only the speed law applies
            let mut ball = Ball { pos: Vec2::new(20.0, 200.0), vel: Vec2::new(-vx, vy), size: 16.0 };
            for i in 0..hits {
                let side = if i % 2 == 0 { Side::Player } else { Side::Ai };
                ball = apply_paddle_hit(&ball, &paddle, side, &config, &table);
            }
            ball.speed()
        };

        for pair in Difficulty::ALL.windows(2) {
            prop_assert!(speed_after(pair[1]) + 1e-3 >= speed_after(pair[0]));
        }
    }
}
