use burn::{
    nn::pool::{MaxPool2d, MaxPool2dConfig},
    prelude::*,
};

use super::{DoubleConv, DoubleConvConfig, SkipConnections};
use crate::config::StageDescriptor;

/// Configuration for the `Encoder` module.
#[derive(Config, Debug)]
pub struct EncoderConfig {
    /// Channel depth of the input image.
    in_channels: usize,
    /// Channel depth of each stage, shallowest first.
    features: Vec<usize>,
}

impl EncoderConfig {
    /// Creates the configuration from a stage plan.
    pub fn from_stages(stages: &[StageDescriptor]) -> Self {
        let in_channels = stages.first().map_or(0, |s| s.in_channels);
        let features = stages.iter().map(|s| s.out_channels).collect();

        Self::new(in_channels, features)
    }

    /// Initializes a new `Encoder` module.
    pub fn init<B: Backend>(&self, device: &Device<B>) -> Encoder<B> {
        let mut in_channels = self.in_channels;
        let mut stages = Vec::with_capacity(self.features.len());

        for &feature in &self.features {
            stages.push(DoubleConvConfig::new(in_channels, feature).init(device));
            in_channels = feature;
        }

        Encoder {
            stages,
            pool: MaxPool2dConfig::new([2, 2]).with_strides([2, 2]).init(),
        }
    }
}

/// The contracting half of the U-Net.
///
/// Every stage runs a `DoubleConv`, records the result as a skip connection and then
/// halves height and width with non-overlapping 2x2 max pooling.
#[derive(Module, Debug)]
pub struct Encoder<B: Backend> {
    stages: Vec<DoubleConv<B>>,
    pool: MaxPool2d,
}

impl<B: Backend> Encoder<B> {
    /// Returns the pooled output of the deepest stage and the recorded skip connections.
    pub fn forward(&self, x: Tensor<B, 4>) -> (Tensor<B, 4>, SkipConnections<B>) {
        let mut skips = SkipConnections::with_capacity(self.stages.len());
        let mut x = x;

        for stage in &self.stages {
            let features = stage.forward(x);
            x = self.pool.forward(features.clone());
            skips.push(features);
        }

        (x, skips)
    }

    /// Number of stages, and therefore of skip connections produced per pass.
    pub fn depth(&self) -> usize {
        self.stages.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FeatureSchedule;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn encoder_records_one_skip_per_stage() {
        let device = Default::default();
        let schedule = FeatureSchedule::new(vec![4, 8, 16]).unwrap();
        let encoder =
            EncoderConfig::from_stages(&schedule.encoder_stages(3)).init::<TestBackend>(&device);
        let x = Tensor::<TestBackend, 4>::random(
            [2, 3, 32, 32],
            burn::tensor::Distribution::Normal(0.0, 1.0),
            &device,
        );

        let (pooled, skips) = encoder.forward(x);

        assert_eq!(encoder.depth(), 3);
        assert_eq!(skips.len(), 3);
        assert_eq!(
            skips.shapes(),
            vec![[2, 4, 32, 32], [2, 8, 16, 16], [2, 16, 8, 8]]
        );
        assert_eq!(pooled.dims(), [2, 16, 4, 4]);
    }

    #[test]
    fn encoder_floors_odd_sizes_when_pooling() {
        let device = Default::default();
        let schedule = FeatureSchedule::new(vec![2, 2]).unwrap();
        let encoder =
            EncoderConfig::from_stages(&schedule.encoder_stages(1)).init::<TestBackend>(&device);
        let x = Tensor::<TestBackend, 4>::ones([1, 1, 13, 9], &device);

        let (pooled, skips) = encoder.forward(x);

        assert_eq!(skips.shapes(), vec![[1, 2, 13, 9], [1, 2, 6, 4]]);
        assert_eq!(pooled.dims(), [1, 2, 3, 2]);
    }
}
