use std::collections::HashSet;
use std::time::Duration;

use super::direction::Direction;
use super::grid::Position;
use super::power::{Modifiers, PowerUp};

/// The player-controlled snake
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, head at index 0
    pub body: Vec<Position>,
    /// Heading applied on the next tick
    pub direction: Direction,
}

impl Snake {
    /// A one-segment snake at `head`, facing `direction`
    pub fn new(head: Position, direction: Direction) -> Self {
        Self {
            body: vec![head],
            direction,
        }
    }

    /// The head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Check if any segment covers `pos`, tail included
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Put a new head in front; the caller decides whether the tail follows
    pub fn advance(&mut self, new_head: Position) {
        self.body.insert(0, new_head);
    }

    /// Drop the tail segment
    pub fn shrink_tail(&mut self) {
        self.body.pop();
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Lifecycle phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Fresh board, not yet ticking
    Idle,
    Running,
    Paused,
    /// Finished; waiting to be acknowledged
    Over,
}

/// Complete state of one play session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub snake: Snake,
    pub food: Position,
    pub obstacles: Vec<Position>,
    pub power_ups: Vec<PowerUp>,
    pub modifiers: Modifiers,
    pub score: u32,
    pub phase: Phase,
}

impl SessionState {
    /// A fresh idle board
    pub fn new(snake: Snake, food: Position, obstacles: Vec<Position>) -> Self {
        Self {
            snake,
            food,
            obstacles,
            power_ups: Vec::new(),
            modifiers: Modifiers::new(),
            score: 0,
            phase: Phase::Idle,
        }
    }

    /// Check if an obstacle blocks `pos`
    pub fn has_obstacle(&self, pos: Position) -> bool {
        self.obstacles.contains(&pos)
    }

    /// Set of cells nothing may spawn on
    pub fn occupied_cells(&self) -> HashSet<Position> {
        let mut taken: HashSet<Position> = self.snake.body.iter().copied().collect();
        taken.insert(self.food);
        taken.extend(self.obstacles.iter().copied());
        taken.extend(self.power_ups.iter().map(|p| p.position));
        taken
    }

    /// Earliest upcoming timer among uncollected power-ups and effect reversals
    pub fn next_deadline(&self) -> Option<Duration> {
        let pickup = self.power_ups.iter().map(|p| p.expires_at).min();
        let effect = self.modifiers.next_deadline();
        match (pickup, effect) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (deadline, None) => deadline,
            (None, deadline) => deadline,
        }
    }
}
