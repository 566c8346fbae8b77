use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tempfile::TempDir;

use power_snake::game::{
    CollisionKind, Direction, FOOD_POINTS, GameConfig, GameEngine, Phase, Position, PowerUp,
    PowerUpKind, SessionState, Snake,
};
use power_snake::session::{GameOverReason, Session, SessionEvent};
use power_snake::storage::HighScoreStore;

/// 10x10 board with every random spawn disabled, so only scripted entities
/// appear
fn quiet_config() -> GameConfig {
    let mut config = GameConfig::small();
    config.initial_obstacles = 0;
    config.powerup_on_food_chance = 0.0;
    config.obstacle_on_food_chance = 0.0;
    config.ambient_powerup_chance = 0.0;
    config
}

fn quiet_engine(seed: u64) -> GameEngine<StdRng> {
    GameEngine::with_rng(quiet_config(), StdRng::seed_from_u64(seed))
}

fn running_state(engine: &mut GameEngine<StdRng>) -> SessionState {
    let mut state = engine.new_session().unwrap();
    state.phase = Phase::Running;
    state
}

fn at(x: i32, y: i32) -> Position {
    Position::new(x, y)
}

const T0: Duration = Duration::ZERO;

#[test]
fn stepwise_growth_turning_and_self_collision() {
    let mut engine = quiet_engine(42);
    let mut state = running_state(&mut engine);
    state.snake = Snake::new(at(5, 5), Direction::Right);
    state.food = at(6, 5);

    engine.tick(&mut state, T0).unwrap();
    assert_eq!(state.score, FOOD_POINTS);
    assert_eq!(state.snake.body, vec![at(6, 5), at(5, 5)]);

    state.food = at(7, 5);
    engine.tick(&mut state, T0).unwrap();
    assert_eq!(state.score, 2 * FOOD_POINTS);
    assert_eq!(state.snake.body, vec![at(7, 5), at(6, 5), at(5, 5)]);

    state.food = at(7, 4);
    assert!(engine.steer(&mut state, Direction::Up));
    engine.tick(&mut state, T0).unwrap();
    assert_eq!(state.score, 3 * FOOD_POINTS);
    assert_eq!(state.snake.len(), 4);

    // walk the head around a 2x2 loop back into its own tail
    state.food = at(0, 0);
    assert!(engine.steer(&mut state, Direction::Left));
    engine.tick(&mut state, T0).unwrap();
    assert_eq!(state.snake.head(), at(6, 4));
    assert_eq!(state.phase, Phase::Running);

    assert!(engine.steer(&mut state, Direction::Down));
    let outcome = engine.tick(&mut state, T0).unwrap();

    assert!(outcome.fatal.is_some());
    assert_eq!(state.phase, Phase::Over);
    assert_eq!(state.score, 3 * FOOD_POINTS, "a fatal tick must not score");
    assert_eq!(state.snake.len(), 4, "a fatal tick must not move the snake");
}

#[test]
fn shield_carries_the_snake_through_one_obstacle_only() {
    let mut engine = quiet_engine(7);
    let mut state = running_state(&mut engine);
    state.snake = Snake::new(at(2, 2), Direction::Right);
    state.food = at(0, 0);
    state.obstacles = vec![at(4, 2), at(6, 2)];
    state.power_ups = vec![PowerUp {
        position: at(3, 2),
        kind: PowerUpKind::Shield,
        expires_at: Duration::from_secs(10),
    }];

    let outcome = engine.tick(&mut state, T0).unwrap();
    assert_eq!(outcome.collected, Some(PowerUpKind::Shield));
    assert!(state.modifiers.shield_armed());

    // first obstacle: absorbed, the snake moves onto the cell
    let outcome = engine.tick(&mut state, T0).unwrap();
    assert!(outcome.shield_consumed);
    assert_eq!(outcome.fatal, None);
    assert_eq!(state.snake.head(), at(4, 2));
    assert!(state.has_obstacle(at(4, 2)), "the obstacle must survive");
    assert_eq!(state.phase, Phase::Running);

    engine.tick(&mut state, T0).unwrap();
    assert_eq!(state.snake.head(), at(5, 2));

    // second obstacle: the shield is spent
    let outcome = engine.tick(&mut state, T0).unwrap();
    assert_eq!(outcome.fatal, Some(CollisionKind::Obstacle));
    assert_eq!(state.phase, Phase::Over);
}

#[test]
fn speed_effect_holds_for_six_seconds_of_session_time() {
    let mut engine = quiet_engine(3);
    let mut state = running_state(&mut engine);
    state.snake = Snake::new(at(1, 1), Direction::Right);
    state.food = at(0, 5);
    state.power_ups = vec![PowerUp {
        position: at(2, 1),
        kind: PowerUpKind::Speed,
        expires_at: Duration::from_secs(12),
    }];

    let collected_at = Duration::from_secs(2);
    let outcome = engine.tick(&mut state, collected_at).unwrap();
    assert_eq!(outcome.collected, Some(PowerUpKind::Speed));
    assert_eq!(state.modifiers.multiplier(), 2.0);
    assert_eq!(state.modifiers.label(), Some(PowerUpKind::Speed));

    engine.expire_due(&mut state, Duration::from_millis(7_999));
    assert_eq!(state.modifiers.multiplier(), 2.0, "reverted a tick early");

    engine.expire_due(&mut state, Duration::from_secs(8));
    assert_eq!(state.modifiers.multiplier(), 1.0);
    assert_eq!(state.modifiers.label(), None);
}

#[test]
fn uncollected_power_up_vanishes_after_its_ttl() {
    let mut engine = quiet_engine(9);
    let mut state = running_state(&mut engine);
    state.snake = Snake::new(at(1, 1), Direction::Right);
    state.food = at(0, 5);
    state.power_ups = vec![PowerUp {
        position: at(8, 8),
        kind: PowerUpKind::Slow,
        expires_at: Duration::from_secs(10),
    }];

    engine.expire_due(&mut state, Duration::from_secs(9));
    assert_eq!(state.power_ups.len(), 1);

    engine.expire_due(&mut state, Duration::from_secs(10));
    assert!(state.power_ups.is_empty());
    assert_eq!(
        state.modifiers.multiplier(),
        1.0,
        "an uncollected power-up must never apply its effect"
    );
}

#[test]
fn high_score_survives_across_sessions_on_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scores.json");

    let mut session = Session::with_rng(
        quiet_config(),
        HighScoreStore::new(&path),
        StdRng::seed_from_u64(1),
    )
    .unwrap();
    assert_eq!(session.high_score(), 0);

    session.start();
    {
        let state = session.state_mut();
        state.snake = Snake::new(at(5, 5), Direction::Right);
        state.food = at(0, 0);
        state.obstacles = vec![at(6, 5)];
        state.score = 40;
    }
    let events = session.advance();
    assert_eq!(
        events,
        vec![SessionEvent::GameOver {
            final_score: 40,
            new_high_score: true,
            reason: GameOverReason::Obstacle,
        }]
    );

    // a later session reads the record back from the same file
    let session = Session::with_rng(
        quiet_config(),
        HighScoreStore::new(&path),
        StdRng::seed_from_u64(2),
    )
    .unwrap();
    assert_eq!(session.high_score(), 40);
}

#[test]
fn game_over_is_acknowledged_into_a_fresh_board() {
    let mut session = Session::with_rng(
        quiet_config(),
        HighScoreStore::disabled(),
        StdRng::seed_from_u64(8),
    )
    .unwrap();

    session.start();
    {
        let state = session.state_mut();
        state.snake = Snake::new(at(5, 5), Direction::Right);
        state.food = at(0, 0);
        state.obstacles = vec![at(6, 5)];
        state.score = 20;
    }
    session.advance();
    assert_eq!(session.phase(), Phase::Over);

    assert!(session.acknowledge());
    assert_eq!(session.phase(), Phase::Idle);
    assert_eq!(session.state().score, 0);
    assert_eq!(session.state().snake.len(), 1);

    // and the next game starts clean from there
    assert!(session.start());
    assert_eq!(session.phase(), Phase::Running);
}
