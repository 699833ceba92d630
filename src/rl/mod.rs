//! Reinforcement learning core for Snake
//!
//! Provides:
//! - 11-value relative state encoding (danger, heading, food placement)
//! - Bounded replay memory with uniform sampling
//! - Q-value network and one-step TD updates (short and batched)
//! - Epsilon-greedy agent with a linearly decaying schedule
//! - Headless environment wrapper and model persistence

pub mod agent;
pub mod backend;
pub mod config;
pub mod environment;
pub mod features;
pub mod memory;
pub mod network;
pub mod persistence;

pub use agent::QAgent;
pub use backend::{default_device, InferenceBackend, TrainingBackend};
pub use config::AgentConfig;
pub use environment::SnakeEnvironment;
pub use features::{encode_state, StateFeatures, STATE_DIM};
pub use memory::{ReplayMemory, Transition};
pub use network::{QNetwork, QNetworkConfig};
pub use persistence::{load_network, save_model, ModelMetadata};
