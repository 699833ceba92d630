//! Backend type aliases and device management
//!
//! Convenient type aliases for the Burn backends used in training and
//! inference, plus a helper for device selection.
//!
//! The NdArray CPU backend is plenty for this workload: an 11-value state
//! vector through two small linear layers. A GPU backend (Wgpu) could be
//! swapped in later, but nothing here would benefit from it today.

use burn::backend::{
    ndarray::{NdArray, NdArrayDevice},
    Autodiff,
};

/// Backend type for training (with autodiff)
///
/// Used wherever gradients are needed: the Q-learning updates and anything
/// that owns the optimizer.
pub type TrainingBackend = Autodiff<NdArray<f32>>;

/// Backend type for inference (without autodiff)
///
/// Used for running trained models; cheaper since no gradient bookkeeping
/// happens.
pub type InferenceBackend = NdArray<f32>;

/// Get the default device for computation
pub fn default_device() -> NdArrayDevice {
    NdArrayDevice::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_device() {
        let device = default_device();
        let _device_copy = device.clone();
    }
}
