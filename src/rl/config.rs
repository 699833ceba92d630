//! Q-learning hyperparameter configuration

use serde::{Deserialize, Serialize};

/// Hyperparameters for the Q-learning agent
///
/// The defaults are the values the policy was tuned under; gamma and the
/// reward constants in [`GameConfig`](crate::game::GameConfig) together
/// define the value scale a saved model expects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Learning rate for the Adam optimizer
    ///
    /// Default: 1e-3
    pub learning_rate: f64,

    /// Discount factor for future rewards (gamma)
    ///
    /// Default: 0.9
    pub gamma: f32,

    /// Transitions per batched (long-memory) update
    ///
    /// Default: 1000
    pub batch_size: usize,

    /// Replay memory capacity
    ///
    /// Default: 100_000
    pub memory_capacity: usize,

    /// Games over which exploration decays to zero
    ///
    /// Exploration probability is
    /// `max(0, exploration_games - games_played) / exploration_denominator`,
    /// so with the defaults the agent starts at 80/200 = 40% random actions
    /// and acts fully greedily from game 80 on.
    ///
    /// Default: 80
    pub exploration_games: u32,

    /// Denominator of the exploration schedule
    ///
    /// Default: 200
    pub exploration_denominator: u32,
}

impl AgentConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), String> {
        if self.learning_rate <= 0.0 {
            return Err(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            ));
        }

        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(format!("gamma must be in [0, 1], got {}", self.gamma));
        }

        if self.batch_size == 0 {
            return Err("batch_size must be at least 1".to_string());
        }

        if self.memory_capacity == 0 {
            return Err("memory_capacity must be at least 1".to_string());
        }

        if self.exploration_denominator == 0 {
            return Err("exploration_denominator must be at least 1".to_string());
        }

        if self.exploration_games > self.exploration_denominator {
            return Err(format!(
                "exploration_games ({}) cannot exceed exploration_denominator ({})",
                self.exploration_games, self.exploration_denominator
            ));
        }

        Ok(())
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            learning_rate: 1e-3,
            gamma: 0.9,
            batch_size: 1000,
            memory_capacity: 100_000,
            exploration_games: 80,
            exploration_denominator: 200,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AgentConfig::default();
        assert_eq!(config.learning_rate, 1e-3);
        assert_eq!(config.gamma, 0.9);
        assert_eq!(config.batch_size, 1000);
        assert_eq!(config.memory_capacity, 100_000);
        assert_eq!(config.exploration_games, 80);
        assert_eq!(config.exploration_denominator, 200);
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(AgentConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validation_negative_learning_rate() {
        let mut config = AgentConfig::default();
        config.learning_rate = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_gamma_out_of_range() {
        let mut config = AgentConfig::default();
        config.gamma = 1.5;
        assert!(config.validate().is_err());

        config.gamma = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_batch_size() {
        let mut config = AgentConfig::default();
        config.batch_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_capacity() {
        let mut config = AgentConfig::default();
        config.memory_capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_exploration_bounds() {
        let mut config = AgentConfig::default();
        config.exploration_denominator = 0;
        assert!(config.validate().is_err());

        config.exploration_denominator = 50;
        config.exploration_games = 80;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_custom_config() {
        let config = AgentConfig {
            learning_rate: 5e-4,
            batch_size: 128,
            ..Default::default()
        };
        assert_eq!(config.learning_rate, 5e-4);
        assert_eq!(config.batch_size, 128);
        assert_eq!(config.gamma, 0.9); // From default
        assert!(config.validate().is_ok());
    }
}
