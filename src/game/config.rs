use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::speed::{MAX_DIFFICULTY, MIN_DIFFICULTY};

/// Smallest grid edge a session can be seeded on
pub const MIN_GRID_EDGE: usize = 4;

/// A configuration that cannot seed a playable session
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("grid {cols}x{rows} is too small, each edge must be at least {MIN_GRID_EDGE}")]
    GridTooSmall { cols: usize, rows: usize },
    #[error("grid {cols}x{rows} cannot hold the snake, food and {obstacles} obstacles")]
    TooManyObstacles {
        cols: usize,
        rows: usize,
        obstacles: usize,
    },
    #[error("difficulty {0} is outside {MIN_DIFFICULTY}..={MAX_DIFFICULTY}")]
    DifficultyOutOfRange(u16),
    #[error("{name} chance {value} is outside 0.0..=1.0")]
    ChanceOutOfRange { name: &'static str, value: f64 },
}

/// Tunable parameters for a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Width of the grid in cells
    pub grid_cols: usize,
    /// Height of the grid in cells
    pub grid_rows: usize,
    /// Obstacles seeded at the start of every game
    pub initial_obstacles: usize,
    /// Base speed, 1 (slowest) to 25 (fastest)
    pub difficulty: u16,
    /// Chance that eating food also spawns a power-up
    pub powerup_on_food_chance: f64,
    /// Chance that eating food also spawns an obstacle
    pub obstacle_on_food_chance: f64,
    /// Chance that any tick spawns a power-up
    pub ambient_powerup_chance: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_cols: 20,
            grid_rows: 20,
            initial_obstacles: 6,
            difficulty: 10,
            powerup_on_food_chance: 0.35,
            obstacle_on_food_chance: 0.25,
            ambient_powerup_chance: 0.08,
        }
    }
}

impl GameConfig {
    /// Create a configuration with a custom grid size
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            grid_cols: cols,
            grid_rows: rows,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Check the configuration can seed a session
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_cols < MIN_GRID_EDGE || self.grid_rows < MIN_GRID_EDGE {
            return Err(ConfigError::GridTooSmall {
                cols: self.grid_cols,
                rows: self.grid_rows,
            });
        }
        // the seeded board needs the snake, the food and every obstacle,
        // plus at least one free cell for the first respawn
        if self.grid_cols * self.grid_rows < self.initial_obstacles + 3 {
            return Err(ConfigError::TooManyObstacles {
                cols: self.grid_cols,
                rows: self.grid_rows,
                obstacles: self.initial_obstacles,
            });
        }
        if !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&self.difficulty) {
            return Err(ConfigError::DifficultyOutOfRange(self.difficulty));
        }
        for (name, value) in [
            ("powerup_on_food", self.powerup_on_food_chance),
            ("obstacle_on_food", self.obstacle_on_food_chance),
            ("ambient_powerup", self.ambient_powerup_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ChanceOutOfRange { name, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GameConfig::default();
        assert_eq!(config.grid_cols, 20);
        assert_eq!(config.grid_rows, 20);
        assert_eq!(config.initial_obstacles, 6);
        assert_eq!(config.difficulty, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_small_config_is_valid() {
        assert!(GameConfig::small().validate().is_ok());
    }

    #[test]
    fn test_tiny_grid_rejected() {
        let config = GameConfig::new(3, 20);
        assert_eq!(
            config.validate(),
            Err(ConfigError::GridTooSmall { cols: 3, rows: 20 })
        );
    }

    #[test]
    fn test_overfull_grid_rejected() {
        let mut config = GameConfig::new(4, 4);
        config.initial_obstacles = 14;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TooManyObstacles { .. })
        ));
    }

    #[test]
    fn test_difficulty_range() {
        let mut config = GameConfig::default();
        config.difficulty = 26;
        assert_eq!(
            config.validate(),
            Err(ConfigError::DifficultyOutOfRange(26))
        );
        config.difficulty = 0;
        assert!(config.validate().is_err());
        config.difficulty = 25;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_chance_range() {
        let mut config = GameConfig::default();
        config.ambient_powerup_chance = 1.2;
        assert_eq!(
            config.validate(),
            Err(ConfigError::ChanceOutOfRange {
                name: "ambient_powerup",
                value: 1.2,
            })
        );

        config.ambient_powerup_chance = -0.1;
        assert!(config.validate().is_err());
    }
}
