use burn::{
    nn::{
        conv::{Conv2d, Conv2dConfig},
        Linear, LinearConfig, PaddingConfig2d, Relu,
    },
    prelude::*,
};

use super::Encoder;

/// Small convolutional encoder for 28x28 images.
///
/// `[B, C, 28, 28] -> [B, 32, 14, 14] -> [B, 64, 7, 7] -> [B, num_features]`
#[derive(Module, Debug)]
pub struct MnistCnnEncoder<B: Backend> {
    conv1: Conv2d<B>,
    conv2: Conv2d<B>,
    fc: Linear<B>,
    relu: Relu,
}

impl<B: Backend> Encoder<B> for MnistCnnEncoder<B> {
    fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 2> {
        let x = self.relu.forward(self.conv1.forward(x));
        let x = self.relu.forward(self.conv2.forward(x));
        self.fc.forward(x.flatten(1, 3))
    }
}

#[derive(Config, Debug)]
pub struct MnistCnnEncoderConfig {
    in_channels: usize,
    num_features: usize,
    #[config(default = 32)]
    base_channels: usize,
}

impl MnistCnnEncoderConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> MnistCnnEncoder<B> {
        let c = self.base_channels;
        MnistCnnEncoder {
            conv1: Conv2dConfig::new([self.in_channels, c], [3, 3])
                .with_stride([2, 2])
                .with_padding(PaddingConfig2d::Explicit(1, 1))
                .init(device),
            conv2: Conv2dConfig::new([c, c * 2], [3, 3])
                .with_stride([2, 2])
                .with_padding(PaddingConfig2d::Explicit(1, 1))
                .init(device),
            fc: LinearConfig::new(c * 2 * 7 * 7, self.num_features).init(device),
            relu: Relu::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    #[test]
    fn encodes_28x28_images() {
        let device = Default::default();
        let encoder = MnistCnnEncoderConfig::new(1, 256).init::<NdArray>(&device);

        let z = encoder.forward(Tensor::zeros([2, 1, 28, 28], &device));

        assert_eq!(z.dims(), [2, 256]);
    }
}
