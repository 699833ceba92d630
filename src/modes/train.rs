//! Training mode for the Q-learning agent
//!
//! Runs the online training loop: every environment step feeds one
//! short-memory update and lands in replay memory; every episode end
//! triggers a batched update, advances the exploration schedule, emits a
//! telemetry line, and saves the model whenever the record score improves.
//!
//! # Example
//!
//! ```rust,ignore
//! use q_snake::modes::{TrainConfig, TrainMode};
//! use q_snake::rl::{default_device, TrainingBackend};
//! use std::path::PathBuf;
//!
//! let mut config = TrainConfig::new(PathBuf::from("models/q_snake.mpk"));
//! config.num_episodes = Some(500);
//!
//! let mut train_mode = TrainMode::<TrainingBackend>::new(config, default_device());
//! train_mode.run()?;
//! ```

use anyhow::{Context, Result};
use burn::tensor::backend::AutodiffBackend;
use std::path::PathBuf;

use crate::game::GameConfig;
use crate::metrics::TrainingStats;
use crate::rl::{
    save_model, AgentConfig, QAgent, QNetworkConfig, SnakeEnvironment, Transition,
};

/// Configuration for training mode
#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// Episodes to train before stopping; None trains until the process is
    /// killed
    pub num_episodes: Option<usize>,

    /// Path the model is saved to on new records and at shutdown
    pub save_path: PathBuf,

    /// Print a statistics summary every N episodes (0 disables it)
    pub log_frequency: usize,

    /// Game configuration (grid size, rewards)
    pub game_config: GameConfig,

    /// Q-learning hyperparameters
    pub agent_config: AgentConfig,

    /// Seed for the engine's food placement; None draws from entropy
    pub seed: Option<u64>,
}

impl TrainConfig {
    /// Create a training configuration with defaults: unbounded episodes on
    /// the standard grid
    pub fn new(save_path: PathBuf) -> Self {
        Self {
            num_episodes: None,
            save_path,
            log_frequency: 50,
            game_config: GameConfig::default(),
            agent_config: AgentConfig::default(),
            seed: None,
        }
    }
}

/// Training mode
///
/// Owns the whole training session: agent, environment, statistics and the
/// record score. Nothing here is global, so independent sessions can run
/// back to back (or in tests) without contaminating each other.
pub struct TrainMode<B: AutodiffBackend> {
    /// Q-learning agent being trained
    agent: QAgent<B>,

    /// Snake environment for experience collection
    env: SnakeEnvironment,

    /// Training statistics tracker
    stats: TrainingStats,

    /// Training configuration
    config: TrainConfig,

    /// Best score seen so far; strictly beating it triggers a save
    best_score: u32,
}

impl<B: AutodiffBackend> TrainMode<B> {
    /// Create a new training mode
    pub fn new(config: TrainConfig, device: B::Device) -> Self {
        config
            .game_config
            .validate()
            .expect("Invalid game configuration");

        let network_config = QNetworkConfig::new();
        let network = network_config.init::<B>(&device);
        let agent = QAgent::new(network, network_config, config.agent_config.clone(), device);

        let env = match config.seed {
            Some(seed) => SnakeEnvironment::with_seed(config.game_config.clone(), seed),
            None => SnakeEnvironment::new(config.game_config.clone()),
        };

        // 100-episode rolling window for the periodic summaries
        let stats = TrainingStats::new(100);

        Self {
            agent,
            env,
            stats,
            config,
            best_score: 0,
        }
    }

    /// Run the training loop
    ///
    /// Blocks until the episode budget is exhausted; with no budget it only
    /// returns on error, and external termination is the expected way out.
    pub fn run(&mut self) -> Result<()> {
        self.print_header();

        let mut state = self.env.reset();

        loop {
            // One environment step: act, observe, learn, remember
            let action = self.agent.select_action(&state);
            let result = self.env.step(action);
            let next_state = self.env.observe();

            let transition = Transition {
                state,
                action,
                reward: result.reward,
                next_state,
                done: result.terminated,
            };

            let loss = self
                .agent
                .train_short_memory(&transition)
                .context("short-memory update failed")?;
            self.stats.record_update(loss);
            self.agent.remember(transition);

            state = next_state;

            if result.terminated {
                // The terminal step never reaches the frame counter, so add
                // it back when counting episode length
                let episode_steps = self.env.state().frame as usize + 1;

                state = self.env.reset();
                self.agent.increment_games();

                if let Some(loss) = self
                    .agent
                    .train_long_memory()
                    .context("batched replay update failed")?
                {
                    self.stats.record_update(loss);
                }

                self.stats.record_episode(result.score, episode_steps);

                // Record saves happen after the batched update so the saved
                // weights include everything learned from this episode
                if result.score > self.best_score {
                    self.best_score = result.score;
                    self.save_model()
                        .context("failed to save record-scoring model")?;
                }

                let episode = self.stats.total_episodes();
                println!(
                    "game {:>6}  score {:>3}  record {:>3}  mean {:>7.2}",
                    episode,
                    result.score,
                    self.best_score,
                    self.stats.mean_score_all()
                );

                if self.config.log_frequency > 0 && episode % self.config.log_frequency == 0 {
                    println!("{}", self.stats.format_summary());
                }

                if let Some(limit) = self.config.num_episodes {
                    if episode >= limit {
                        break;
                    }
                }
            }
        }

        self.save_model().context("failed to save final model")?;

        println!("\nTraining complete!");
        println!("Model saved to: {:?}", self.config.save_path);
        println!("{}", self.stats.format_summary());

        Ok(())
    }

    /// Save the current model alongside session metadata
    fn save_model(&self) -> Result<()> {
        save_model(
            &self.agent,
            &self.config.game_config,
            self.best_score,
            &self.config.save_path,
        )
    }

    /// Get the training statistics
    pub fn stats(&self) -> &TrainingStats {
        &self.stats
    }

    /// Best score achieved this session
    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    /// Print training header information
    fn print_header(&self) {
        println!("{}", "=".repeat(70));
        println!("Q-Learning Training - q_snake");
        println!("{}", "=".repeat(70));
        match self.config.num_episodes {
            Some(n) => println!("Episodes: {}", n),
            None => println!("Episodes: unbounded (stop with Ctrl+C)"),
        }
        println!(
            "Game Config: {}x{} grid",
            self.config.game_config.grid_width, self.config.game_config.grid_height
        );
        println!("Agent Config:");
        println!(
            "  Learning rate: {}",
            self.config.agent_config.learning_rate
        );
        println!("  Gamma: {}", self.config.agent_config.gamma);
        println!("  Batch size: {}", self.config.agent_config.batch_size);
        println!(
            "  Memory capacity: {}",
            self.config.agent_config.memory_capacity
        );
        println!(
            "  Exploration: {}/{} decaying to zero",
            self.config.agent_config.exploration_games,
            self.config.agent_config.exploration_denominator
        );
        println!("Save path: {:?}", self.config.save_path);
        println!("{}", "=".repeat(70));
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rl::{default_device, TrainingBackend};
    use tempfile::TempDir;

    #[test]
    fn test_train_config_creation() {
        let config = TrainConfig::new(PathBuf::from("test.mpk"));
        assert_eq!(config.num_episodes, None);
        assert_eq!(config.save_path, PathBuf::from("test.mpk"));
        assert_eq!(config.log_frequency, 50);
    }

    #[test]
    fn test_train_mode_creation() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = TrainConfig::new(temp_dir.path().join("model.mpk"));
        config.game_config = GameConfig::small();

        let train_mode = TrainMode::<TrainingBackend>::new(config, default_device());
        assert_eq!(train_mode.best_score(), 0);
        assert_eq!(train_mode.stats().total_episodes(), 0);
    }

    #[test]
    fn test_run_bounded_episodes() {
        let temp_dir = TempDir::new().unwrap();
        let save_path = temp_dir.path().join("model.mpk");

        let mut config = TrainConfig::new(save_path.clone());
        config.game_config = GameConfig::small();
        config.num_episodes = Some(2);
        config.log_frequency = 0;
        config.seed = Some(11);

        let mut train_mode = TrainMode::<TrainingBackend>::new(config, default_device());
        train_mode.run().unwrap();

        assert_eq!(train_mode.stats().total_episodes(), 2);
        assert!(train_mode.stats().total_steps() > 0);
        assert!(save_path.exists());
        assert!(save_path.with_extension("meta.json").exists());
    }
}
