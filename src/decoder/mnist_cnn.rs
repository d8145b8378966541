use burn::{
    nn::{
        conv::{ConvTranspose2d, ConvTranspose2dConfig},
        Linear, LinearConfig, Relu,
    },
    prelude::*,
};

use crate::activation::Activation;

use super::Decoder;

/// Small transposed-convolution decoder producing 28x28 images.
///
/// `[B, num_features] -> [B, 64, 7, 7] -> [B, 32, 14, 14] -> [B, C, 28, 28]`
#[derive(Module, Debug)]
pub struct MnistCnnDecoder<B: Backend> {
    fc: Linear<B>,
    convt1: ConvTranspose2d<B>,
    convt2: ConvTranspose2d<B>,
    relu: Relu,
    activation: Activation,
    base_channels: usize,
}

impl<B: Backend> Decoder<B> for MnistCnnDecoder<B> {
    fn forward(&self, x: Tensor<B, 2>) -> Tensor<B, 4> {
        let [batch, _] = x.dims();
        let x = self.relu.forward(self.fc.forward(x));
        let x = x.reshape([batch, self.base_channels * 2, 7, 7]);

        let x = self.relu.forward(self.convt1.forward(x));
        self.activation.forward(self.convt2.forward(x))
    }
}

#[derive(Config, Debug)]
pub struct MnistCnnDecoderConfig {
    num_features: usize,
    out_channels: usize,
    #[config(default = 32)]
    base_channels: usize,
    #[config(default = "Activation::Identity")]
    activation: Activation,
}

impl MnistCnnDecoderConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> MnistCnnDecoder<B> {
        let c = self.base_channels;
        let upsample = |channels: [usize; 2]| {
            ConvTranspose2dConfig::new(channels, [3, 3])
                .with_stride([2, 2])
                .with_padding([1, 1])
                .with_padding_out([1, 1])
                .init(device)
        };

        MnistCnnDecoder {
            fc: LinearConfig::new(self.num_features, c * 2 * 7 * 7).init(device),
            convt1: upsample([c * 2, c]),
            convt2: upsample([c, self.out_channels]),
            relu: Relu::new(),
            activation: self.activation,
            base_channels: c,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    #[test]
    fn decodes_to_28x28() {
        let device = Default::default();
        let decoder = MnistCnnDecoderConfig::new(256, 1)
            .with_activation(Activation::Sigmoid)
            .init::<NdArray>(&device);

        let image = decoder.forward(Tensor::ones([2, 256], &device));

        assert_eq!(image.dims(), [2, 1, 28, 28]);
        let max = image.max().into_scalar();
        assert!(max <= 1.0);
    }
}
