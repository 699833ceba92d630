//! Q-value network for the Snake agent
//!
//! A small fully connected network mapping the 11-value state encoding to
//! one value estimate per relative action:
//!
//! ```text
//! Input: [batch, 11]
//!   ↓ Linear(11 → 256) + ReLU
//!   ↓ Linear(256 → 3)
//! Output: [batch, 3]   Q(s, straight) / Q(s, turn right) / Q(s, turn left)
//! ```
//!
//! Inference is deterministic for fixed parameters — no dropout or other
//! stochastic layers — which action selection and the TD targets both
//! depend on.

use burn::{
    module::Module,
    nn::{Linear, LinearConfig},
    tensor::{activation::relu, backend::Backend, Tensor},
};
use serde::{Deserialize, Serialize};

use super::features::STATE_DIM;
use crate::game::NUM_ACTIONS;

/// Configuration for the Q-network
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QNetworkConfig {
    /// Input dimension (the encoded state length)
    pub state_dim: usize,

    /// Width of the hidden layer
    pub hidden_dim: usize,

    /// Output dimension (the action space size)
    pub num_actions: usize,
}

impl QNetworkConfig {
    /// Default architecture: 11 → 256 → 3
    pub fn new() -> Self {
        Self {
            state_dim: STATE_DIM,
            hidden_dim: 256,
            num_actions: NUM_ACTIONS,
        }
    }

    /// Initialize a Q-network from this configuration
    pub fn init<B: Backend>(&self, device: &B::Device) -> QNetwork<B> {
        QNetwork {
            fc1: LinearConfig::new(self.state_dim, self.hidden_dim).init(device),
            fc2: LinearConfig::new(self.hidden_dim, self.num_actions).init(device),
        }
    }
}

impl Default for QNetworkConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// The value function approximator
///
/// Generic over the Burn backend so the same module trains under
/// `Autodiff<NdArray>` and runs inference on plain `NdArray`.
#[derive(Module, Debug)]
pub struct QNetwork<B: Backend> {
    fc1: Linear<B>,
    fc2: Linear<B>,
}

impl<B: Backend> QNetwork<B> {
    /// Forward pass: per-action value estimates for a batch of states
    ///
    /// `state` has shape `[batch, STATE_DIM]`; the result has shape
    /// `[batch, NUM_ACTIONS]`.
    pub fn forward(&self, state: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = self.fc1.forward(state);
        let x = relu(x);
        self.fc2.forward(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::ndarray::{NdArray, NdArrayDevice};
    use burn::backend::Autodiff;
    use burn::tensor::{Distribution, TensorData};

    type TestBackend = NdArray<f32>;
    type TestAutodiffBackend = Autodiff<NdArray<f32>>;

    #[test]
    fn test_forward_pass_shapes() {
        let device = NdArrayDevice::default();
        let network = QNetworkConfig::new().init::<TestBackend>(&device);

        for batch_size in [1, 4, 32] {
            let state = Tensor::zeros([batch_size, STATE_DIM], &device);
            let values = network.forward(state);
            assert_eq!(values.dims(), [batch_size, NUM_ACTIONS]);
        }
    }

    #[test]
    fn test_inference_is_deterministic() {
        let device = NdArrayDevice::default();
        let network = QNetworkConfig::new().init::<TestBackend>(&device);

        let state = Tensor::random([2, STATE_DIM], Distribution::Uniform(0.0, 1.0), &device);
        let first = network.forward(state.clone()).into_data();
        let second = network.forward(state).into_data();

        assert_eq!(
            first.as_slice::<f32>().unwrap(),
            second.as_slice::<f32>().unwrap()
        );
    }

    #[test]
    fn test_batch_consistency() {
        let device = NdArrayDevice::default();
        let network = QNetworkConfig::new().init::<TestBackend>(&device);

        let single = Tensor::ones([1, STATE_DIM], &device);
        let values_single = network.forward(single.clone()).into_data();

        let batch = Tensor::cat(vec![single.clone(), single.clone(), single], 0);
        let values_batch = network.forward(batch).into_data();

        let single_vals = values_single.as_slice::<f32>().unwrap();
        let batch_vals = values_batch.as_slice::<f32>().unwrap();

        for j in 0..NUM_ACTIONS {
            let diff = (single_vals[j] - batch_vals[j]).abs();
            assert!(diff < 1e-5, "batch element 0 diverges at {}: {}", j, diff);
        }
    }

    #[test]
    fn test_output_finite() {
        let device = NdArrayDevice::default();
        let network = QNetworkConfig::new().init::<TestBackend>(&device);

        let state = Tensor::random([8, STATE_DIM], Distribution::Uniform(0.0, 1.0), &device);
        let values: TensorData = network.forward(state).into_data();

        for &val in values.as_slice::<f32>().unwrap() {
            assert!(val.is_finite(), "Q-values should be finite, got: {}", val);
        }
    }

    #[test]
    fn test_gradient_flow() {
        let device = NdArrayDevice::default();
        let network = QNetworkConfig::new().init::<TestAutodiffBackend>(&device);

        let state = Tensor::ones([1, STATE_DIM], &device).require_grad();
        let values = network.forward(state.clone());
        let loss = values.sum();
        let gradients = loss.backward();

        let state_grad = state.grad(&gradients);
        assert!(
            state_grad.is_some(),
            "Gradients should flow back to the input state"
        );
    }

    #[test]
    fn test_custom_hidden_dim() {
        let device = NdArrayDevice::default();
        let config = QNetworkConfig {
            hidden_dim: 16,
            ..QNetworkConfig::new()
        };
        let network = config.init::<TestBackend>(&device);

        let state = Tensor::zeros([2, STATE_DIM], &device);
        assert_eq!(network.forward(state).dims(), [2, NUM_ACTIONS]);
    }
}
