//! Deep Q-learning agent
//!
//! Couples the Q-network with epsilon-greedy action selection, the replay
//! memory, and the two update paths: a one-transition update after every
//! environment step and a batched update at the end of each episode.

use anyhow::{ensure, Result};
use burn::{
    module::AutodiffModule,
    optim::{adaptor::OptimizerAdaptor, Adam, AdamConfig, GradientsParams, Optimizer},
    tensor::{backend::AutodiffBackend, ElementConversion, Tensor, TensorData},
};
use rand::Rng;

use super::config::AgentConfig;
use super::features::{StateFeatures, STATE_DIM};
use super::memory::{ReplayMemory, Transition};
use super::network::{QNetwork, QNetworkConfig};
use crate::game::{Action, NUM_ACTIONS};

/// Q-learning agent
///
/// Owns the network, the optimizer and the replay memory for the lifetime
/// of the training run. All methods run on the caller's thread; nothing here
/// is re-entrant, and a concurrent caller would have to serialize every
/// update since both the memory and the parameters are mutated in place.
pub struct QAgent<B: AutodiffBackend> {
    /// Value network being trained
    network: QNetwork<B>,

    /// Adam optimizer for the network parameters
    optim: OptimizerAdaptor<Adam, QNetwork<B>, B>,

    /// Architecture of `network`, kept for persistence
    network_config: QNetworkConfig,

    /// Q-learning hyperparameters
    config: AgentConfig,

    /// Bounded FIFO of past transitions
    memory: ReplayMemory,

    /// Completed episodes; drives the exploration schedule
    games_played: u32,

    /// Device for tensor operations
    device: B::Device,
}

impl<B: AutodiffBackend> QAgent<B> {
    /// Create a new agent around an initialized network
    pub fn new(
        network: QNetwork<B>,
        network_config: QNetworkConfig,
        config: AgentConfig,
        device: B::Device,
    ) -> Self {
        config.validate().expect("Invalid agent configuration");

        let optim = AdamConfig::new().init();
        let memory = ReplayMemory::new(config.memory_capacity);

        Self {
            network,
            optim,
            network_config,
            config,
            memory,
            games_played: 0,
            device,
        }
    }

    /// Pick an action for the given state with the epsilon-greedy policy
    ///
    /// Exploration probability decays linearly with completed games and hits
    /// zero once `exploration_games` episodes have been played; from then on
    /// every call returns the greedy action.
    pub fn select_action(&self, state: &StateFeatures) -> Action {
        let epsilon = self
            .config
            .exploration_games
            .saturating_sub(self.games_played);

        let mut rng = rand::thread_rng();
        if rng.gen_range(0..self.config.exploration_denominator) < epsilon {
            Action::ALL[rng.gen_range(0..NUM_ACTIONS)]
        } else {
            self.greedy_action(state)
        }
    }

    /// The action with the highest estimated value, ties to the first
    /// occurring maximum
    pub fn greedy_action(&self, state: &StateFeatures) -> Action {
        let network = self.network.valid();
        let input = Tensor::from_data(
            TensorData::new(state.to_vec(), [1, STATE_DIM]),
            &self.device,
        );

        let values = network.forward(input).into_data();
        let values = values
            .as_slice::<f32>()
            .expect("Q-values convert to f32 slice");

        let mut best = 0;
        for (idx, &value) in values.iter().enumerate() {
            if value > values[best] {
                best = idx;
            }
        }

        Action::from_index(best).expect("argmax stays inside the action space")
    }

    /// Append a transition to the replay memory
    ///
    /// Unconditional: every observed step is remembered, whether or not it
    /// was also used for a short-memory update.
    pub fn remember(&mut self, transition: Transition) {
        self.memory.push(transition);
    }

    /// One gradient step on exactly the just-observed transition
    pub fn train_short_memory(&mut self, transition: &Transition) -> Result<f32> {
        self.train_step(std::slice::from_ref(transition))
    }

    /// One batched gradient step on transitions sampled from replay memory
    ///
    /// Samples up to `batch_size` transitions; with fewer stored, everything
    /// available is used. Returns None when the memory is empty (nothing to
    /// learn from yet).
    pub fn train_long_memory(&mut self) -> Result<Option<f32>> {
        if self.memory.is_empty() {
            return Ok(None);
        }

        let batch = self.memory.sample(self.config.batch_size);
        self.train_step(&batch).map(Some)
    }

    /// Q-learning update over a batch of transitions
    ///
    /// Targets follow the one-step rule: `r` for terminal transitions,
    /// `r + gamma * max_j Q(s', j)` otherwise. Every other action slot keeps
    /// the network's own detached prediction, so only the taken action's
    /// estimate feels the loss. Bootstrapping reads the live network — there
    /// is no separate target network.
    fn train_step(&mut self, batch: &[Transition]) -> Result<f32> {
        let n = batch.len();

        let states: Vec<f32> = batch.iter().flat_map(|t| t.state).collect();
        let next_states: Vec<f32> = batch.iter().flat_map(|t| t.next_state).collect();

        // Detached forward passes for the target assembly
        let frozen = self.network.valid();

        let predictions = frozen
            .forward(Tensor::from_data(
                TensorData::new(states.clone(), [n, STATE_DIM]),
                &self.device,
            ))
            .into_data();
        let mut targets = predictions
            .to_vec::<f32>()
            .expect("predictions convert to f32 vec");

        let next_values = frozen
            .forward(Tensor::from_data(
                TensorData::new(next_states, [n, STATE_DIM]),
                &self.device,
            ))
            .into_data();
        let next_values = next_values
            .to_vec::<f32>()
            .expect("next-state values convert to f32 vec");

        for (i, transition) in batch.iter().enumerate() {
            let mut q_new = transition.reward;
            if !transition.done {
                let row = &next_values[i * NUM_ACTIONS..(i + 1) * NUM_ACTIONS];
                let max_next = row.iter().copied().fold(f32::NEG_INFINITY, f32::max);
                q_new += self.config.gamma * max_next;
            }
            targets[i * NUM_ACTIONS + transition.action.index()] = q_new;
        }

        // Gradient pass: squared error between prediction and target
        let states: Tensor<B, 2> =
            Tensor::from_data(TensorData::new(states, [n, STATE_DIM]), &self.device);
        let targets: Tensor<B, 2> =
            Tensor::from_data(TensorData::new(targets, [n, NUM_ACTIONS]), &self.device);

        let predictions = self.network.forward(states);
        let diff = predictions - targets;
        let loss = (diff.clone() * diff).mean();

        let loss_value = loss.clone().into_scalar().elem::<f32>();
        ensure!(
            loss_value.is_finite(),
            "training diverged: non-finite loss {}",
            loss_value
        );

        let grads = loss.backward();
        let grads = GradientsParams::from_grads(grads, &self.network);
        self.network = self
            .optim
            .step(self.config.learning_rate, self.network.clone(), grads);

        Ok(loss_value)
    }

    /// Number of completed episodes
    pub fn games_played(&self) -> u32 {
        self.games_played
    }

    /// Record a completed episode, advancing the exploration schedule
    pub fn increment_games(&mut self) {
        self.games_played += 1;
    }

    /// Get a reference to the value network
    pub fn network(&self) -> &QNetwork<B> {
        &self.network
    }

    /// Get the network architecture
    pub fn network_config(&self) -> &QNetworkConfig {
        &self.network_config
    }

    /// Get a reference to the agent configuration
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Get a reference to the replay memory
    pub fn memory(&self) -> &ReplayMemory {
        &self.memory
    }
}
