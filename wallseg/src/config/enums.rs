use burn::{prelude::*, tensor::ops::InterpolateMode};

/// Interpolation used when an upsampled map has to be reconciled with its skip connection.
///
/// Only the numerical output depends on this choice; shapes are identical either way.
#[derive(Config, Debug, PartialEq, Eq, Hash)]
pub enum InterpolationStrategy {
    /// Nearest-neighbour resampling. Differentiable on every backend.
    Nearest,
    /// Bilinear resampling, inference only.
    ///
    /// WARNING: Burn has no bilinear backward pass on some backends (ndarray among them).
    /// On an autodiff backend the decoder falls back to `Nearest` and logs a warning
    /// when the model is built.
    Bilinear,
}

impl Default for InterpolationStrategy {
    fn default() -> Self {
        Self::Nearest
    }
}

impl InterpolationStrategy {
    /// The Burn interpolation mode for this strategy.
    pub const fn mode(&self) -> InterpolateMode {
        match self {
            Self::Nearest => InterpolateMode::Nearest,
            Self::Bilinear => InterpolateMode::Bilinear,
        }
    }

    /// The strategy actually used on backend `B`.
    ///
    /// `Bilinear` resolves to `Nearest` when `B` tracks gradients.
    pub fn resolve<B: Backend>(&self) -> Self {
        match self {
            Self::Bilinear if B::ad_enabled() => Self::Nearest,
            other => other.clone(),
        }
    }
}
