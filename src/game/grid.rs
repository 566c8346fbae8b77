use serde::{Deserialize, Serialize};

use super::direction::Direction;

/// A cell coordinate on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset by a raw delta, without wrapping
    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Offset one cell in a direction, without wrapping
    pub fn step(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.offset(dx, dy)
    }
}

/// Toroidal playing field: leaving one edge re-enters from the opposite edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub cols: i32,
    pub rows: i32,
}

impl Grid {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols: cols as i32,
            rows: rows as i32,
        }
    }

    /// Map any position back onto the torus
    pub fn wrap(&self, pos: Position) -> Position {
        Position {
            x: pos.x.rem_euclid(self.cols),
            y: pos.y.rem_euclid(self.rows),
        }
    }

    /// Check if a position lies within canonical bounds
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.cols && pos.y >= 0 && pos.y < self.rows
    }

    /// The center cell, rounded toward the origin
    pub fn center(&self) -> Position {
        Position::new(self.cols / 2, self.rows / 2)
    }

    /// Iterate over every cell in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Position> {
        let (cols, rows) = (self.cols, self.rows);
        (0..rows).flat_map(move |y| (0..cols).map(move |x| Position::new(x, y)))
    }

    /// Total number of cells
    pub fn cell_count(&self) -> usize {
        (self.cols * self.rows) as usize
    }
}
