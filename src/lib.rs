//! Power Snake - snake on a wrap-around grid with timed power-ups
//!
//! This library provides:
//! - Core game rules (game module): grid, spawning, power-up effects, tick engine
//! - Session lifecycle (session module): start/pause/game-over, pause-aware clock,
//!   and the async terminal runner
//! - Peripherals: keyboard mapping (input), ratatui drawing (render),
//!   the JSON high-score file (storage) and header counters (metrics)

pub mod game;
pub mod input;
pub mod metrics;
pub mod render;
pub mod session;
pub mod storage;
