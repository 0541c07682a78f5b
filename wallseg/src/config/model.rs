use burn::prelude::*;

use super::{FeatureSchedule, InterpolationStrategy};
use crate::error::{UNetError, UNetResult};

/// Construction parameters for the U-Net.
///
/// Serializable through Burn's `Config` trait, so a configuration can be written with
/// `save` and read back with `load`.
#[derive(Config, Debug)]
pub struct ModelConfig {
    /// Channel depth of the input image (3 for RGB, 1 for greyscale).
    #[config(default = "3")]
    pub in_channels: usize,
    /// Number of classes predicted per pixel.
    #[config(default = "2")]
    pub num_classes: usize,
    /// Channel depth of each encoder stage, shallowest first.
    #[config(default = "vec![64, 128, 256, 512]")]
    pub features: Vec<usize>,
    /// Resampling used to reconcile upsampled maps with their skip connections.
    ///
    /// `Bilinear` is inference only; autodiff backends use `Nearest` instead.
    #[config(default = "InterpolationStrategy::Nearest")]
    pub interpolation: InterpolationStrategy,
}

impl ModelConfig {
    /// Checks the configuration for values that cannot produce a working network.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for a zero channel or class count, or for an
    /// invalid feature schedule.
    pub fn validate(&self) -> UNetResult<()> {
        self.schedule().map(|_| ())
    }

    /// Validates the configuration and returns its feature schedule.
    ///
    /// # Errors
    ///
    /// See [`ModelConfig::validate`].
    pub fn schedule(&self) -> UNetResult<FeatureSchedule> {
        if self.in_channels == 0 {
            return Err(UNetError::InvalidConfiguration {
                reason: "in_channels must be positive".to_string(),
            });
        }
        if self.num_classes == 0 {
            return Err(UNetError::InvalidConfiguration {
                reason: "num_classes must be positive".to_string(),
            });
        }

        FeatureSchedule::new(self.features.clone())
    }
}
