//! Additional operations for the Burn deep learning framework
//!
//! This crate provides operations that are commonly used in deep learning but are not
//! yet available in the core Burn framework.

use burn::{prelude::*, tensor::ops::InterpolateMode};

mod resize;

// Convenient re-exports
pub use resize::{reconcile_size, resize_to_match};

/// Additional operations for Burn tensors
pub trait TensorExtraOps<B: Backend> {
    /// Resize the spatial axes so they equal `target` (`[height, width]`).
    ///
    /// Returns the tensor untouched when it already has the target size.
    fn resize_to_match(self, target: [usize; 2], mode: InterpolateMode) -> Self;
}

impl<B: Backend> TensorExtraOps<B> for Tensor<B, 4> {
    fn resize_to_match(self, target: [usize; 2], mode: InterpolateMode) -> Self {
        resize_to_match(self, target, mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::{
        backend::{ndarray::NdArray, Autodiff},
        tensor::Tensor,
    };

    type TestBackend = Autodiff<NdArray<f32>>;

    #[test]
    fn test_tensor_extra_ops() {
        let device = Default::default();
        let tensor = Tensor::<TestBackend, 4>::random(
            [2, 3, 30, 30],
            burn::tensor::Distribution::Normal(0.0, 1.0),
            &device,
        );

        let result = tensor.resize_to_match([31, 31], InterpolateMode::Nearest);
        assert_eq!(result.dims(), [2, 3, 31, 31]);
    }
}
