//! # Decoder
//!
//! The expanding half of the U-Net. Each stage doubles the spatial size with a learned
//! transposed convolution, lines the result up with the mirrored skip connection,
//! concatenates the two along the channel axis and fuses them with a `DoubleConv`.

use burn::{
    module::Ignored,
    nn::conv::{ConvTranspose2d, ConvTranspose2dConfig},
    prelude::*,
};
use burn_extra_ops::{reconcile_size, TensorExtraOps};

use super::{DoubleConv, DoubleConvConfig, SkipConnections};
use crate::config::{InterpolationStrategy, StageDescriptor};
use crate::error::{UNetError, UNetResult};

/// Configuration for a single `DecoderStage`.
#[derive(Config, Debug)]
pub struct DecoderStageConfig {
    /// Index of the encoder stage whose skip connection this stage consumes.
    index: usize,
    /// Channel depth of the stage (the schedule value).
    features: usize,
}

impl DecoderStageConfig {
    /// Initializes a new `DecoderStage` module.
    pub fn init<B: Backend>(&self, device: &Device<B>) -> DecoderStage<B> {
        let up = ConvTranspose2dConfig::new([self.features * 2, self.features], [2, 2])
            .with_stride([2, 2])
            .init(device);
        let fuse = DoubleConvConfig::new(self.features * 2, self.features).init(device);

        DecoderStage {
            index: self.index,
            up,
            fuse,
        }
    }
}

/// Upsample, reconcile, concatenate, fuse.
#[derive(Module, Debug)]
pub struct DecoderStage<B: Backend> {
    index: usize,
    up: ConvTranspose2d<B>,
    fuse: DoubleConv<B>,
}

impl<B: Backend> DecoderStage<B> {
    pub fn forward(
        &self,
        x: Tensor<B, 4>,
        skip: Tensor<B, 4>,
        interpolation: &InterpolationStrategy,
    ) -> Tensor<B, 4> {
        let x = self.up.forward(x);

        let [_, _, up_h, up_w] = x.dims();
        let [_, _, skip_h, skip_w] = skip.dims();
        let x = match reconcile_size([up_h, up_w], [skip_h, skip_w]) {
            Some(target) => {
                tracing::debug!(
                    stage = self.index,
                    from = ?[up_h, up_w],
                    to = ?target,
                    "reconciling upsampled map with skip connection"
                );
                x.resize_to_match(target, interpolation.resolve::<B>().mode())
            }
            None => x,
        };

        let x = Tensor::cat(vec![skip, x], 1);
        self.fuse.forward(x)
    }

    /// Index of the encoder stage this decoder stage is paired with.
    pub const fn index(&self) -> usize {
        self.index
    }
}

/// Configuration for the `Decoder` module.
#[derive(Config, Debug)]
pub struct DecoderConfig {
    /// Channel depth of each encoder stage, shallowest first.
    features: Vec<usize>,
    /// Resampling used when an upsampled map and its skip connection disagree in size.
    #[config(default = "InterpolationStrategy::Nearest")]
    interpolation: InterpolationStrategy,
}

impl DecoderConfig {
    /// Creates the configuration from a decoder stage plan (deepest stage first).
    pub fn from_stages(stages: &[StageDescriptor]) -> Self {
        let mut features: Vec<_> = stages.iter().map(|s| s.out_channels).collect();
        features.reverse();

        Self::new(features)
    }

    /// Initializes a new `Decoder` module.
    pub fn init<B: Backend>(&self, device: &Device<B>) -> Decoder<B> {
        if self.interpolation.resolve::<B>() != self.interpolation {
            tracing::warn!(
                requested = ?self.interpolation,
                "bilinear reconciliation has no backward pass, using nearest on autodiff backend"
            );
        }

        let stages = self
            .features
            .iter()
            .enumerate()
            .rev()
            .map(|(index, &features)| DecoderStageConfig::new(index, features).init(device))
            .collect();

        Decoder {
            stages,
            interpolation: Ignored(self.interpolation.clone()),
        }
    }
}

/// The expanding half of the U-Net, deepest stage first.
#[derive(Module, Debug)]
pub struct Decoder<B: Backend> {
    stages: Vec<DecoderStage<B>>,
    interpolation: Ignored<InterpolationStrategy>,
}

impl<B: Backend> Decoder<B> {
    /// Rebuilds full resolution from the bottleneck output, draining `skips`.
    ///
    /// # Errors
    ///
    /// Returns `SkipCountMismatch` if `skips` does not hold exactly one map per stage.
    /// A size disagreement between an upsampled map and its skip connection is not an
    /// error; it is resolved by resizing.
    pub fn forward(
        &self,
        x: Tensor<B, 4>,
        mut skips: SkipConnections<B>,
    ) -> UNetResult<Tensor<B, 4>> {
        if skips.len() != self.stages.len() {
            return Err(UNetError::SkipCountMismatch {
                expected: self.stages.len(),
                actual: skips.len(),
            });
        }

        let mut x = x;
        for stage in &self.stages {
            let Some((index, skip)) = skips.pop() else {
                return Err(UNetError::SkipCountMismatch {
                    expected: self.stages.len(),
                    actual: 0,
                });
            };
            debug_assert_eq!(index, stage.index(), "decoder stage paired with wrong skip");

            x = stage.forward(x, skip, &self.interpolation.0);
        }

        Ok(x)
    }

    /// Number of stages, and therefore of skip connections consumed per pass.
    pub fn depth(&self) -> usize {
        self.stages.len()
    }

    /// Pairing order of the stages: the encoder index each consumes, in execution order.
    pub fn stage_indices(&self) -> Vec<usize> {
        self.stages.iter().map(DecoderStage::index).collect()
    }
}
