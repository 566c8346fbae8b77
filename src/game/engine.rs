use std::collections::HashSet;
use std::time::Duration;

use log::debug;
use rand::Rng;
use rand::rngs::ThreadRng;

use super::config::GameConfig;
use super::direction::Direction;
use super::grid::{Grid, Position};
use super::power::{PowerUp, PowerUpKind, UNCOLLECTED_TTL};
use super::spawn::{self, SpawnExhausted};
use super::state::{Phase, SessionState, Snake};

/// Points for eating food
pub const FOOD_POINTS: u32 = 10;

/// What the snake ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionKind {
    SelfCollision,
    Obstacle,
}

/// What one tick did, reported back to the caller before it returns
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TickOutcome {
    /// Points gained this tick
    pub score_delta: u32,
    pub ate_food: bool,
    /// Power-up collected this tick, if any
    pub collected: Option<PowerUpKind>,
    /// A collision was absorbed by the shield
    pub shield_consumed: bool,
    /// The collision that ended the session, if one did
    pub fatal: Option<CollisionKind>,
}

/// The game rules: owns the RNG and config, advances a session state one
/// tick at a time
///
/// Generic over the RNG so tests can drive it with a seeded one.
pub struct GameEngine<R = ThreadRng> {
    grid: Grid,
    config: GameConfig,
    rng: R,
}

impl GameEngine {
    /// An engine backed by the thread-local RNG
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, rand::thread_rng())
    }
}

impl<R: Rng> GameEngine<R> {
    pub fn with_rng(config: GameConfig, rng: R) -> Self {
        let grid = Grid::new(config.grid_cols, config.grid_rows);
        Self { grid, config, rng }
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Seed a fresh board: a one-segment snake at the center heading right,
    /// one food, and the configured number of obstacles
    pub fn new_session(&mut self) -> Result<SessionState, SpawnExhausted> {
        let snake = Snake::new(self.grid.center(), Direction::Right);

        let mut taken: HashSet<Position> = snake.body.iter().copied().collect();
        let food = spawn::random_empty_position(&mut self.rng, self.grid, &taken)?;
        taken.insert(food);

        let mut obstacles = Vec::with_capacity(self.config.initial_obstacles);
        for _ in 0..self.config.initial_obstacles {
            let pos = spawn::random_empty_position(&mut self.rng, self.grid, &taken)?;
            taken.insert(pos);
            obstacles.push(pos);
        }

        Ok(SessionState::new(snake, food, obstacles))
    }

    /// Request a heading change; reversing straight back is silently ignored
    pub fn steer(&self, state: &mut SessionState, direction: Direction) -> bool {
        if !matches!(state.phase, Phase::Running | Phase::Paused) {
            return false;
        }
        if state.snake.direction.is_opposite(direction) {
            return false;
        }
        state.snake.direction = direction;
        true
    }

    /// Advance the session one tick at session time `now`
    ///
    /// An error means the mandatory food respawn found no free cell; the
    /// board state is frozen as it was mid-tick and the caller decides how
    /// to end the session.
    pub fn tick(
        &mut self,
        state: &mut SessionState,
        now: Duration,
    ) -> Result<TickOutcome, SpawnExhausted> {
        let mut outcome = TickOutcome::default();

        if state.phase != Phase::Running {
            return Ok(outcome);
        }

        let new_head = self.grid.wrap(state.snake.head().step(state.snake.direction));

        // Collisions are resolved before the head is committed
        if let Some(kind) = self.check_collision(state, new_head) {
            if state.modifiers.shield_armed() {
                state.modifiers.consume_shield();
                outcome.shield_consumed = true;
                // the move finishes; the snake passes through the cell
            } else {
                state.phase = Phase::Over;
                outcome.fatal = Some(kind);
                return Ok(outcome);
            }
        }

        state.snake.advance(new_head);

        if new_head == state.food {
            state.score += FOOD_POINTS;
            outcome.score_delta += FOOD_POINTS;
            outcome.ate_food = true;

            state.food = self.respawn_food(state)?;

            if self.chance(self.config.powerup_on_food_chance) {
                self.spawn_power_up(state, now);
            }
            if self.chance(self.config.obstacle_on_food_chance) {
                self.spawn_obstacle(state);
            }
        } else {
            state.snake.shrink_tail();
        }

        // At most one pickup per tick, oldest spawn first
        if let Some(idx) = state
            .power_ups
            .iter()
            .position(|p| p.position == new_head)
        {
            let power_up = state.power_ups.remove(idx);
            let bonus = state.modifiers.apply(power_up.kind, now);
            state.score += bonus;
            outcome.score_delta += bonus;
            outcome.collected = Some(power_up.kind);
        }

        if self.chance(self.config.ambient_powerup_chance) {
            self.spawn_power_up(state, now);
        }

        Ok(outcome)
    }

    /// Remove timed-out power-ups and revert expired effects
    pub fn expire_due(&self, state: &mut SessionState, now: Duration) {
        state.power_ups.retain(|p| p.expires_at > now);
        state.modifiers.expire_due(now);
    }

    fn check_collision(&self, state: &SessionState, pos: Position) -> Option<CollisionKind> {
        // the whole body counts, including the tail that would move away
        if state.snake.occupies(pos) {
            return Some(CollisionKind::SelfCollision);
        }
        if state.has_obstacle(pos) {
            return Some(CollisionKind::Obstacle);
        }
        None
    }

    fn respawn_food(&mut self, state: &SessionState) -> Result<Position, SpawnExhausted> {
        spawn::random_empty_position(&mut self.rng, self.grid, &state.occupied_cells())
    }

    fn spawn_power_up(&mut self, state: &mut SessionState, now: Duration) {
        match spawn::random_empty_position(&mut self.rng, self.grid, &state.occupied_cells()) {
            Ok(position) => {
                let kind = PowerUpKind::ALL[self.rng.gen_range(0..PowerUpKind::ALL.len())];
                state.power_ups.push(PowerUp {
                    position,
                    kind,
                    expires_at: now + UNCOLLECTED_TTL,
                });
            }
            Err(SpawnExhausted) => debug!("no free cell for a power-up, skipping spawn"),
        }
    }

    fn spawn_obstacle(&mut self, state: &mut SessionState) {
        match spawn::random_empty_position(&mut self.rng, self.grid, &state.occupied_cells()) {
            Ok(position) => state.obstacles.push(position),
            Err(SpawnExhausted) => debug!("no free cell for an obstacle, skipping spawn"),
        }
    }

    fn chance(&mut self, probability: f64) -> bool {
        probability > 0.0 && self.rng.gen_bool(probability.clamp(0.0, 1.0))
    }
}
