//! # U-Net Model Implementation
//!
//! This module defines the `UNet` model: a symmetric encoder-decoder with skip
//! connections that maps an image to per-pixel class scores.
//!
//! ## Core Components
//!
//! - `UNetConfig`: A configuration struct to initialize the `UNet` model.
//! - `UNet`: The main model struct, which runs encoder, bottleneck, decoder and output
//!   head strictly in that order.
//!
//! Output height and width always equal input height and width, including inputs whose
//! sides are not divisible by `2^N`; the decoder resizes upsampled maps onto their skip
//! connections whenever pooling has dropped a row or column.

use burn::{
    module::Ignored,
    nn::conv::{Conv2d, Conv2dConfig},
    prelude::*,
};

use super::{
    Decoder, DecoderConfig, DoubleConv, DoubleConvConfig, Encoder, EncoderConfig, SkipConnections,
};
use crate::{
    config::{FeatureSchedule, ModelConfig},
    error::{UNetError, UNetResult},
};

/// Configuration for the `UNet` model.
#[derive(Config, Debug)]
pub struct UNetConfig {
    /// The detailed model configuration.
    pub model: ModelConfig,
}

impl UNetConfig {
    /// Initializes a `UNet` model with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `device` - The device to create the model on.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the configuration is invalid. Nothing is
    /// allocated in that case.
    pub fn init<B: Backend>(&self, device: &Device<B>) -> UNetResult<UNet<B>> {
        let schedule = self.model.schedule()?;

        let encoder_stages = schedule.encoder_stages(self.model.in_channels);
        let decoder_stages = schedule.decoder_stages();
        tracing::debug!(
            encoder = ?encoder_stages,
            decoder = ?decoder_stages,
            bottleneck = schedule.bottleneck_channels(),
            "building U-Net"
        );

        let encoder = EncoderConfig::from_stages(&encoder_stages).init(device);
        let bottleneck =
            DoubleConvConfig::new(schedule.last(), schedule.bottleneck_channels()).init(device);
        let decoder = DecoderConfig::from_stages(&decoder_stages)
            .with_interpolation(self.model.interpolation.clone())
            .init(device);
        let head = Conv2dConfig::new([schedule.first(), self.model.num_classes], [1, 1])
            .init(device);

        Ok(UNet {
            encoder,
            bottleneck,
            decoder,
            head,
            in_channels: self.model.in_channels,
            num_classes: self.model.num_classes,
            schedule: Ignored(schedule),
        })
    }
}

/// The U-Net segmentation model.
#[derive(Module, Debug)]
pub struct UNet<B: Backend> {
    /// Contracting path; records a skip connection per stage.
    encoder: Encoder<B>,
    /// `DoubleConv` at the coarsest resolution, doubling channel depth.
    bottleneck: DoubleConv<B>,
    /// Expanding path; consumes the skip connections deepest first.
    decoder: Decoder<B>,
    /// 1x1 convolution producing one score per class.
    head: Conv2d<B>,
    in_channels: usize,
    num_classes: usize,
    schedule: Ignored<FeatureSchedule>,
}

impl<B: Backend> UNet<B> {
    /// Performs the full forward pass.
    ///
    /// # Arguments
    ///
    /// * `x` - The input tensor of shape `[B, in_channels, H, W]`.
    ///
    /// # Returns
    ///
    /// Unnormalized class scores of shape `[B, num_classes, H, W]`.
    ///
    /// # Errors
    ///
    /// Returns `ChannelMismatch` or `InputTooSmall` before any stage runs if the input
    /// cannot be processed.
    pub fn forward(&self, x: Tensor<B, 4>) -> UNetResult<Tensor<B, 4>> {
        let (x, skips) = self.encode(x)?;
        let x = self.forward_bottleneck(x);
        let x = self.decode(x, skips)?;

        Ok(self.head.forward(x))
    }

    /// Predicts a class index for every pixel.
    ///
    /// Returns an integer tensor of shape `[B, H, W]`.
    ///
    /// # Errors
    ///
    /// See [`UNet::forward`].
    pub fn predict(&self, x: Tensor<B, 4>) -> UNetResult<Tensor<B, 3, Int>> {
        let scores = self.forward(x)?;
        Ok(scores.argmax(1).squeeze(1))
    }

    /// Runs the encoder, returning the pooled deepest map and the skip connections.
    ///
    /// # Errors
    ///
    /// See [`UNet::forward`].
    pub fn encode(&self, x: Tensor<B, 4>) -> UNetResult<(Tensor<B, 4>, SkipConnections<B>)> {
        self.check_input(&x)?;
        Ok(self.encoder.forward(x))
    }

    /// Runs the bottleneck on the pooled output of the encoder.
    pub fn forward_bottleneck(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        self.bottleneck.forward(x)
    }

    /// Runs the decoder, draining `skips`. The output head is not applied.
    ///
    /// # Errors
    ///
    /// Returns `SkipCountMismatch` if `skips` was not produced by this model's encoder.
    pub fn decode(&self, x: Tensor<B, 4>, skips: SkipConnections<B>) -> UNetResult<Tensor<B, 4>> {
        self.decoder.forward(x, skips)
    }

    fn check_input(&self, x: &Tensor<B, 4>) -> UNetResult<()> {
        let [_, channels, height, width] = x.dims();

        if channels != self.in_channels {
            return Err(UNetError::ChannelMismatch {
                expected: self.in_channels,
                actual: channels,
            });
        }

        let minimum = self.schedule.0.min_input_size();
        if height < minimum || width < minimum {
            return Err(UNetError::InputTooSmall {
                height,
                width,
                minimum,
            });
        }

        Ok(())
    }

    pub const fn in_channels(&self) -> usize {
        self.in_channels
    }

    pub const fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// The feature schedule the model was built from.
    pub fn schedule(&self) -> &FeatureSchedule {
        &self.schedule.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InterpolationStrategy;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    fn small_config(in_channels: usize, num_classes: usize) -> UNetConfig {
        UNetConfig::new(
            ModelConfig::new()
                .with_in_channels(in_channels)
                .with_num_classes(num_classes)
                .with_features(vec![4, 8, 16, 32]),
        )
    }

    fn random(shape: [usize; 4]) -> Tensor<TestBackend, 4> {
        Tensor::random(
            shape,
            burn::tensor::Distribution::Normal(0.0, 1.0),
            &Default::default(),
        )
    }

    #[test]
    fn output_matches_input_shape_for_default_schedule() {
        let device = Default::default();
        let config = UNetConfig::new(
            ModelConfig::new()
                .with_in_channels(1)
                .with_num_classes(1),
        );
        let model = config.init::<TestBackend>(&device).unwrap();

        let preds = model.forward(random([3, 1, 160, 160])).unwrap();

        assert_eq!(preds.dims(), [3, 1, 160, 160]);
    }

    #[test]
    fn non_divisible_input_is_reconciled() {
        let device = Default::default();
        let model = small_config(3, 2).init::<TestBackend>(&device).unwrap();

        let (x, skips) = model.encode(random([1, 3, 161, 161])).unwrap();
        assert_eq!(
            skips.shapes(),
            vec![[1, 4, 161, 161], [1, 8, 80, 80], [1, 16, 40, 40], [1, 32, 20, 20]]
        );

        let x = model.forward_bottleneck(x);
        let x = model.decode(x, skips).unwrap();
        assert_eq!(x.dims(), [1, 4, 161, 161]);

        let preds = model.forward(random([1, 3, 161, 161])).unwrap();
        assert_eq!(preds.dims(), [1, 2, 161, 161]);
    }

    #[test]
    fn rectangular_odd_input_keeps_its_shape() {
        let device = Default::default();
        let config = UNetConfig::new(
            ModelConfig::new()
                .with_in_channels(3)
                .with_num_classes(3)
                .with_features(vec![4, 8, 16])
                .with_interpolation(InterpolationStrategy::Bilinear),
        );
        let model = config.init::<TestBackend>(&device).unwrap();

        let preds = model.forward(random([2, 3, 37, 50])).unwrap();

        assert_eq!(preds.dims(), [2, 3, 37, 50]);
    }

    #[test]
    fn non_divisible_input_supports_backward() {
        type AutodiffBackend = burn::backend::Autodiff<NdArray>;
        let device = Default::default();

        for interpolation in [InterpolationStrategy::Nearest, InterpolationStrategy::Bilinear] {
            let model = small_config(3, 2)
                .model
                .with_interpolation(interpolation);
            let model = UNetConfig::new(model)
                .init::<AutodiffBackend>(&device)
                .unwrap();
            let x = Tensor::<AutodiffBackend, 4>::random(
                [1, 3, 161, 161],
                burn::tensor::Distribution::Normal(0.0, 1.0),
                &device,
            )
            .require_grad();

            let preds = model.forward(x.clone()).unwrap();
            assert_eq!(preds.dims(), [1, 2, 161, 161]);

            let grads = preds.sum().backward();
            let grad = x.grad(&grads).unwrap();
            assert_eq!(grad.dims(), [1, 3, 161, 161]);
        }
    }

    #[test]
    fn class_count_only_changes_channel_depth() {
        let device = Default::default();
        let x = random([2, 3, 32, 48]);

        for num_classes in [1, 2, 5] {
            let model = small_config(3, num_classes)
                .init::<TestBackend>(&device)
                .unwrap();
            let preds = model.forward(x.clone()).unwrap();
            assert_eq!(preds.dims(), [2, num_classes, 32, 48]);
        }
    }

    #[test]
    fn bottleneck_doubles_deepest_feature_depth() {
        let device = Default::default();
        let model = small_config(3, 2).init::<TestBackend>(&device).unwrap();

        let (x, skips) = model.encode(random([1, 3, 64, 64])).unwrap();
        let x = model.forward_bottleneck(x);

        assert_eq!(skips.len(), 4);
        assert_eq!(x.dims(), [1, 64, 4, 4]);
        assert_eq!(x.dims()[1], model.schedule().bottleneck_channels());
    }

    #[test]
    fn predict_returns_class_indices() {
        let device = Default::default();
        let model = small_config(3, 4).init::<TestBackend>(&device).unwrap();

        let classes = model.predict(random([2, 3, 16, 16])).unwrap();

        assert_eq!(classes.dims(), [2, 16, 16]);
        let max = classes.clone().max().into_scalar();
        let min = classes.min().into_scalar();
        assert!(min >= 0 && max < 4);
    }

    #[test]
    fn input_smaller_than_minimum_is_rejected() {
        let device = Default::default();
        let model = small_config(3, 2).init::<TestBackend>(&device).unwrap();

        match model.forward(random([1, 3, 15, 64])) {
            Err(UNetError::InputTooSmall {
                height,
                width,
                minimum,
            }) => {
                assert_eq!((height, width, minimum), (15, 64, 16));
            }
            other => panic!("Expected InputTooSmall error, got {other:?}"),
        }
    }

    #[test]
    fn wrong_channel_count_is_rejected() {
        let device = Default::default();
        let model = small_config(1, 2).init::<TestBackend>(&device).unwrap();

        match model.forward(random([1, 3, 32, 32])) {
            Err(UNetError::ChannelMismatch { expected, actual }) => {
                assert_eq!((expected, actual), (1, 3));
            }
            other => panic!("Expected ChannelMismatch error, got {other:?}"),
        }
    }

    #[test]
    fn invalid_configuration_fails_at_construction() {
        let device = Default::default();

        for model in [
            ModelConfig::new().with_features(vec![]),
            ModelConfig::new().with_in_channels(0),
            ModelConfig::new().with_num_classes(0),
            ModelConfig::new().with_features(vec![16, 0]),
        ] {
            let result = UNetConfig::new(model).init::<TestBackend>(&device);
            assert!(matches!(
                result,
                Err(UNetError::InvalidConfiguration { .. })
            ));
        }
    }
}
