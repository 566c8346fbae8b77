//! Core rules of the game
//!
//! Everything in this module is synchronous and free of I/O. The session
//! layer owns the timers and feeds ticks in; the engine reports what each
//! tick did through [`TickOutcome`].

pub mod config;
pub mod direction;
pub mod engine;
pub mod grid;
pub mod power;
pub mod spawn;
pub mod speed;
pub mod state;

// Re-export commonly used types
pub use config::{ConfigError, GameConfig};
pub use direction::Direction;
pub use engine::{CollisionKind, FOOD_POINTS, GameEngine, TickOutcome};
pub use grid::{Grid, Position};
pub use power::{Modifiers, PowerUp, PowerUpKind};
pub use spawn::SpawnExhausted;
pub use state::{Phase, SessionState, Snake};
