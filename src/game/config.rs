use serde::{Deserialize, Serialize};

/// Configuration for the game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,

    // Rewards (for RL). The trained-policy semantics depend on these exact
    // values; change them and saved models stop being comparable.
    /// Reward for eating food
    pub food_reward: f32,
    /// Penalty for dying or stalling out
    pub death_penalty: f32,

    /// Episodes are cut off once the frame counter exceeds this factor
    /// times the snake length
    pub stall_factor: u32,

    /// Resample food until it lands off the snake body.
    ///
    /// Off by default: plain uniform placement may drop food onto the body,
    /// where it is unreachable until the snake moves away. That matches the
    /// behavior trained models were produced under.
    pub resample_food_on_snake: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 32,
            grid_height: 20,
            food_reward: 20.0,
            death_penalty: -10.0,
            stall_factor: 200,
            resample_food_on_snake: false,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), String> {
        if self.grid_width < 2 || self.grid_height < 2 {
            return Err(format!(
                "grid must be at least 2x2, got {}x{}",
                self.grid_width, self.grid_height
            ));
        }

        if self.stall_factor == 0 {
            return Err("stall_factor must be at least 1".to_string());
        }

        Ok(())
    }
}
