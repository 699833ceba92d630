//! Bounded experience replay for Q-learning
//!
//! Stores recent transitions and hands out uniform random minibatches so
//! batched updates are decorrelated from strict episode order. Pure storage:
//! no learning logic lives here.

use std::collections::VecDeque;

use rand::seq::index;

use super::features::StateFeatures;
use crate::game::Action;

/// One environment step as seen by the learner
///
/// Immutable once created; the replay memory owns it after `push` and the
/// agent only ever holds a transient copy for the short-memory update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub state: StateFeatures,
    pub action: Action,
    pub reward: f32,
    pub next_state: StateFeatures,
    pub done: bool,
}

/// Bounded FIFO buffer of transitions with uniform random sampling
pub struct ReplayMemory {
    buffer: VecDeque<Transition>,
    capacity: usize,
}

impl ReplayMemory {
    /// Create a memory holding at most `capacity` transitions
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a transition, evicting the oldest once at capacity
    pub fn push(&mut self, transition: Transition) {
        if self.buffer.len() == self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(transition);
    }

    /// Number of stored transitions
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Maximum number of transitions kept
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Draw up to `k` transitions uniformly without replacement
    ///
    /// With fewer than `k` stored, everything is returned instead — a short
    /// buffer degrades the batch, it is not an error. The buffer itself is
    /// never mutated by sampling.
    pub fn sample(&self, k: usize) -> Vec<Transition> {
        let mut rng = rand::thread_rng();

        if self.buffer.len() > k {
            index::sample(&mut rng, self.buffer.len(), k)
                .iter()
                .map(|i| self.buffer[i])
                .collect()
        } else {
            self.buffer.iter().copied().collect()
        }
    }

    /// Iterate transitions oldest-first
    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        self.buffer.iter()
    }
}
