use super::features::{encode_state, StateFeatures};
use crate::game::{Action, GameConfig, GameEngine, GameState, StepResult};

/// Snake environment for reinforcement learning
///
/// Wraps the game engine behind the standard reset/observe/step surface the
/// agent trains against. Entirely headless: no event loop, no rendering,
/// nothing that could block a training run.
pub struct SnakeEnvironment {
    engine: GameEngine,
    state: GameState,
}

impl SnakeEnvironment {
    /// Create a new Snake environment
    pub fn new(config: GameConfig) -> Self {
        let mut engine = GameEngine::new(config);
        let state = engine.reset();
        Self { engine, state }
    }

    /// Create an environment with deterministic food placement
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        let mut engine = GameEngine::with_seed(config, seed);
        let state = engine.reset();
        Self { engine, state }
    }

    /// Reset the environment and return the initial observation
    pub fn reset(&mut self) -> StateFeatures {
        self.state = self.engine.reset();
        encode_state(&self.state)
    }

    /// Encode the current state without stepping
    pub fn observe(&self) -> StateFeatures {
        encode_state(&self.state)
    }

    /// Advance the game one tick with a relative action
    pub fn step(&mut self, action: Action) -> StepResult {
        self.engine.step(&mut self.state, action)
    }

    /// Current game state, for display and inspection
    pub fn state(&self) -> &GameState {
        &self.state
    }
}
