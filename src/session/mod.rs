//! Session lifecycle around the game engine
//!
//! A [`Session`] owns the engine, the board, the pause-aware clock and the
//! high-score record. It exposes the lifecycle transitions as methods whose
//! invalid uses are no-ops, and reports everything observable as
//! [`SessionEvent`] values instead of acting on the outside world itself.

use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, info, warn};
use rand::Rng;
use rand::rngs::ThreadRng;

use crate::game::{
    CollisionKind, Direction, GameConfig, GameEngine, Grid, Phase, PowerUpKind, SessionState,
    SpawnExhausted,
    speed::{MAX_DIFFICULTY, MIN_DIFFICULTY, tick_interval},
};
use crate::storage::HighScoreStore;

pub mod clock;
pub mod runner;

pub use clock::GameClock;
pub use runner::SessionRunner;

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    SelfCollision,
    Obstacle,
    /// No free cell was left to respawn food on
    BoardFull,
}

impl From<CollisionKind> for GameOverReason {
    fn from(kind: CollisionKind) -> Self {
        match kind {
            CollisionKind::SelfCollision => GameOverReason::SelfCollision,
            CollisionKind::Obstacle => GameOverReason::Obstacle,
        }
    }
}

/// Observable things a session does, in the order they happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    ShieldConsumed,
    PowerUpCollected(PowerUpKind),
    Scored { delta: u32, total: u32 },
    GameOver {
        final_score: u32,
        new_high_score: bool,
        reason: GameOverReason,
    },
}

/// Read-only snapshot handed to the renderer
pub struct SessionView<'a> {
    pub state: &'a SessionState,
    pub grid: Grid,
    pub high_score: u32,
    pub base_speed: u16,
    pub multiplier: f64,
    pub tick_period: Duration,
    pub session_time: Duration,
}

/// One player session: engine, board, clock and the high-score record
pub struct Session<R: Rng = ThreadRng> {
    engine: GameEngine<R>,
    state: SessionState,
    clock: GameClock,
    store: HighScoreStore,
    high_score: u32,
    base_speed: u16,
}

impl Session {
    /// Session backed by the thread-local RNG
    pub fn new(config: GameConfig, store: HighScoreStore) -> Result<Self> {
        Self::with_rng(config, store, rand::thread_rng())
    }
}

impl<R: Rng> Session<R> {
    pub fn with_rng(config: GameConfig, store: HighScoreStore, rng: R) -> Result<Self> {
        config.validate()?;
        let base_speed = config.difficulty;

        let mut engine = GameEngine::with_rng(config, rng);
        let state = engine
            .new_session()
            .context("Failed to seed the initial board")?;

        let high_score = store.load().unwrap_or_else(|err| {
            warn!("could not read the high score, starting from 0: {err:#}");
            0
        });

        Ok(Self {
            engine,
            state,
            clock: GameClock::new(),
            store,
            high_score,
            base_speed,
        })
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Direct access to the board, for scripted setups
    pub fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn base_speed(&self) -> u16 {
        self.base_speed
    }

    /// Begin play; valid from a fresh board or a finished one
    pub fn start(&mut self) -> bool {
        match self.state.phase {
            Phase::Idle => {
                self.state.phase = Phase::Running;
                self.clock.resume();
                info!("session started at speed {}", self.base_speed);
                true
            }
            Phase::Over => {
                self.reinit();
                if self.state.phase != Phase::Idle {
                    return false;
                }
                self.state.phase = Phase::Running;
                self.clock.resume();
                info!("session restarted at speed {}", self.base_speed);
                true
            }
            Phase::Running | Phase::Paused => false,
        }
    }

    /// Suspend ticking without losing the board; only valid while running
    pub fn pause(&mut self) -> bool {
        if self.state.phase != Phase::Running {
            return false;
        }
        self.state.phase = Phase::Paused;
        self.clock.pause();
        info!("session paused");
        true
    }

    /// Continue a paused session
    pub fn resume(&mut self) -> bool {
        if self.state.phase != Phase::Paused {
            return false;
        }
        self.state.phase = Phase::Running;
        self.clock.resume();
        info!("session resumed");
        true
    }

    /// Space-bar behavior: running pauses, paused resumes
    pub fn toggle_pause(&mut self) -> bool {
        match self.state.phase {
            Phase::Running => self.pause(),
            Phase::Paused => self.resume(),
            Phase::Idle | Phase::Over => false,
        }
    }

    /// Clear a finished game back to a fresh idle board
    pub fn acknowledge(&mut self) -> bool {
        if self.state.phase != Phase::Over {
            return false;
        }
        self.reinit();
        true
    }

    /// Request a heading change for the next tick
    pub fn steer(&mut self, direction: Direction) -> bool {
        self.engine.steer(&mut self.state, direction)
    }

    /// Nudge the base speed, clamped to its range; reports whether it changed
    pub fn adjust_speed(&mut self, delta: i16) -> bool {
        let speed = (i32::from(self.base_speed) + i32::from(delta))
            .clamp(i32::from(MIN_DIFFICULTY), i32::from(MAX_DIFFICULTY)) as u16;
        if speed == self.base_speed {
            return false;
        }
        self.base_speed = speed;
        info!("base speed set to {speed}");
        true
    }

    /// Current time between ticks
    pub fn tick_period(&self) -> Duration {
        tick_interval(self.base_speed, self.state.modifiers.multiplier())
    }

    /// Real-time delay until the next power-up or effect deadline
    ///
    /// `None` while the clock is stopped; a stopped clock holds every
    /// deadline where it is.
    pub fn next_deadline_in(&self) -> Option<Duration> {
        if self.state.phase != Phase::Running {
            return None;
        }
        let deadline = self.state.next_deadline()?;
        Some(deadline.saturating_sub(self.clock.now()))
    }

    /// Run one tick at the current session time
    pub fn advance(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if self.state.phase != Phase::Running {
            return events;
        }

        let now = self.clock.now();
        self.engine.expire_due(&mut self.state, now);

        match self.engine.tick(&mut self.state, now) {
            Ok(outcome) => {
                if outcome.shield_consumed {
                    info!("shield absorbed a collision");
                    events.push(SessionEvent::ShieldConsumed);
                }
                if let Some(kind) = outcome.collected {
                    debug!("collected a {} power-up", kind.label());
                    events.push(SessionEvent::PowerUpCollected(kind));
                }
                if outcome.score_delta > 0 {
                    events.push(SessionEvent::Scored {
                        delta: outcome.score_delta,
                        total: self.state.score,
                    });
                }
                if let Some(kind) = outcome.fatal {
                    events.push(self.finish(kind.into()));
                }
            }
            Err(SpawnExhausted) => {
                events.push(self.finish(GameOverReason::BoardFull));
            }
        }
        events
    }

    /// Apply due power-up and effect timers without moving the snake
    pub fn expire_due(&mut self) {
        if self.state.phase != Phase::Running {
            return;
        }
        self.engine.expire_due(&mut self.state, self.clock.now());
    }

    /// Freeze the board in `Over`, settle the high score, report the outcome
    fn finish(&mut self, reason: GameOverReason) -> SessionEvent {
        self.state.phase = Phase::Over;
        self.clock.pause();

        let final_score = self.state.score;
        let new_high_score = final_score > self.high_score;
        if new_high_score {
            self.high_score = final_score;
            if let Err(err) = self.store.save(final_score) {
                warn!("could not persist the high score: {err:#}");
            }
        }

        info!("game over ({reason:?}), final score {final_score}");
        SessionEvent::GameOver {
            final_score,
            new_high_score,
            reason,
        }
    }

    fn reinit(&mut self) {
        match self.engine.new_session() {
            Ok(state) => {
                self.state = state;
                self.clock.reset();
            }
            Err(err) => warn!("could not reseed the board: {err}"),
        }
    }

    /// Snapshot for the renderer
    pub fn view(&self) -> SessionView<'_> {
        SessionView {
            state: &self.state,
            grid: self.engine.grid(),
            high_score: self.high_score,
            base_speed: self.base_speed,
            multiplier: self.state.modifiers.multiplier(),
            tick_period: self.tick_period(),
            session_time: self.clock.now(),
        }
    }
}
