//! q_snake - Snake trained with deep Q-learning
//!
//! This library provides:
//! - Core game logic (game module): grid, collision and step semantics
//! - Q-learning infrastructure (rl module): state encoding, replay memory,
//!   value network, epsilon-greedy agent, persistence
//! - TUI rendering and keyboard input (render, input modules)
//! - Execution modes (modes module): train, human play, visualize

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod rl;
