use burn::{
    nn::{
        conv::{Conv2d, Conv2dConfig},
        BatchNorm, BatchNormConfig, PaddingConfig2d, Relu,
    },
    prelude::*,
};

/// Configuration for the `DoubleConv` module.
#[derive(Config, Debug)]
pub struct DoubleConvConfig {
    /// Number of input channels.
    in_channels: usize,
    /// Number of output channels.
    out_channels: usize,
}

impl DoubleConvConfig {
    /// Initializes a new `DoubleConv` module.
    pub fn init<B: Backend>(&self, device: &Device<B>) -> DoubleConv<B> {
        // Kernel 3, stride 1, padding 1 keeps height and width unchanged.
        let conv_in = Conv2dConfig::new([self.in_channels, self.out_channels], [3, 3])
            .with_stride([1, 1])
            .with_padding(PaddingConfig2d::Explicit(1, 1))
            .with_bias(false)
            .init(device);
        let conv_out = Conv2dConfig::new([self.out_channels, self.out_channels], [3, 3])
            .with_stride([1, 1])
            .with_padding(PaddingConfig2d::Explicit(1, 1))
            .with_bias(false)
            .init(device);

        DoubleConv {
            conv_in,
            bn_in: BatchNormConfig::new(self.out_channels).init(device),
            conv_out,
            bn_out: BatchNormConfig::new(self.out_channels).init(device),
            relu: Relu::new(),
        }
    }
}

/// Two 3x3 convolutions, each followed by batch normalization and ReLU.
#[derive(Module, Debug)]
pub struct DoubleConv<B: Backend> {
    conv_in: Conv2d<B>,
    bn_in: BatchNorm<B, 2>,
    conv_out: Conv2d<B>,
    bn_out: BatchNorm<B, 2>,
    relu: Relu,
}

impl<B: Backend> DoubleConv<B> {
    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        let x = self.conv_in.forward(x);
        let x = self.bn_in.forward(x);
        let x = self.relu.forward(x);
        let x = self.conv_out.forward(x);
        let x = self.bn_out.forward(x);

        self.relu.forward(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn double_conv_preserves_spatial_size() {
        let device = Default::default();
        let block = DoubleConvConfig::new(3, 8).init::<TestBackend>(&device);

        for [h, w] in [[16, 16], [17, 23], [1, 1], [5, 40]] {
            let x = Tensor::<TestBackend, 4>::random(
                [2, 3, h, w],
                burn::tensor::Distribution::Normal(0.0, 1.0),
                &device,
            );
            assert_eq!(block.forward(x).dims(), [2, 8, h, w]);
        }
    }

    #[test]
    fn double_conv_output_is_non_negative() {
        let device = Default::default();
        let block = DoubleConvConfig::new(1, 4).init::<TestBackend>(&device);
        let x = Tensor::<TestBackend, 4>::random(
            [1, 1, 8, 8],
            burn::tensor::Distribution::Normal(0.0, 1.0),
            &device,
        );

        let min = block.forward(x).min().into_scalar();
        assert!(min >= 0.0);
    }
}
