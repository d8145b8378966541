use burn::{
    nn::{
        conv::{Conv2d, Conv2dConfig},
        Linear, LinearConfig, PaddingConfig2d, Relu,
    },
    prelude::*,
    tensor::ops::{InterpolateMode, InterpolateOptions},
};

use crate::{
    activation::Activation,
    conv2drelu::{Conv2dReLU, Conv2dReLUConfig},
};

use super::Decoder;

/// Nearest-neighbour x2 upsampling followed by two convolutions.
#[derive(Module, Debug)]
pub struct DecoderBlock<B: Backend> {
    conv1: Conv2dReLU<B>,
    conv2: Conv2dReLU<B>,
}

impl<B: Backend> DecoderBlock<B> {
    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        let [_, _, height, width] = x.dims();
        let x = burn::tensor::module::interpolate(
            x,
            [height * 2, width * 2],
            InterpolateOptions::new(InterpolateMode::Nearest),
        );

        let x = self.conv1.forward(x);
        self.conv2.forward(x)
    }
}

#[derive(Config, Debug)]
pub struct DecoderBlockConfig {
    in_channels: usize,
    out_channels: usize,
    use_batchnorm: bool,
}

impl DecoderBlockConfig {
    /// Returns the initialized model.
    pub fn init<B: Backend>(&self, device: &B::Device) -> DecoderBlock<B> {
        DecoderBlock {
            conv1: Conv2dReLUConfig::new(self.in_channels, self.out_channels)
                .with_use_batchnorm(self.use_batchnorm)
                .init(device),
            conv2: Conv2dReLUConfig::new(self.out_channels, self.out_channels)
                .with_use_batchnorm(self.use_batchnorm)
                .init(device),
        }
    }
}

/// Projects the latent vector onto a small feature map and upsamples it to full resolution.
#[derive(Module, Debug)]
pub struct UpsamplingDecoder<B: Backend> {
    fc: Linear<B>,
    relu: Relu,
    blocks: Vec<DecoderBlock<B>>,
    head: Conv2d<B>,
    activation: Activation,
    base_channels: usize,
    base_size: usize,
}

impl<B: Backend> Decoder<B> for UpsamplingDecoder<B> {
    fn forward(&self, x: Tensor<B, 2>) -> Tensor<B, 4> {
        let [batch, _] = x.dims();
        let x = self.relu.forward(self.fc.forward(x));
        let x = x.reshape([batch, self.base_channels, self.base_size, self.base_size]);

        let x = self.blocks.iter().fold(x, |x, block| block.forward(x));

        self.activation.forward(self.head.forward(x))
    }
}

#[derive(Config, Debug)]
pub struct UpsamplingDecoderConfig {
    num_features: usize,
    out_channels: usize,
    /// Side length of the feature map the latent vector is projected onto.
    base_size: usize,
    /// Channels of the projected feature map followed by the output channels of each block.
    #[config(default = "vec![512, 256, 128, 64, 32, 16]")]
    decoder_channels: Vec<usize>,
    #[config(default = false)]
    use_batchnorm: bool,
    #[config(default = "Activation::Identity")]
    activation: Activation,
}

impl UpsamplingDecoderConfig {
    /// Decoder for 128x128 images: 4 -> 8 -> 16 -> 32 -> 64 -> 128.
    pub fn decoder128(in_features: usize, num_features: usize) -> Self {
        Self::new(num_features, in_features, 4)
    }

    /// Decoder for 224x224 RGB images: 7 -> 14 -> 28 -> 56 -> 112 -> 224.
    pub fn decoder224(num_features: usize) -> Self {
        Self::new(num_features, 3, 7)
    }

    /// Side length of the images produced by the decoder.
    pub fn resolution(&self) -> usize {
        self.base_size << self.decoder_channels.len().saturating_sub(1)
    }

    pub fn init<B: Backend>(&self, device: &B::Device) -> UpsamplingDecoder<B> {
        let (Some(&base_channels), Some(&last_channels)) =
            (self.decoder_channels.first(), self.decoder_channels.last())
        else {
            panic!("UpsamplingDecoder needs at least the channels of the projected feature map");
        };

        let blocks = self
            .decoder_channels
            .windows(2)
            .map(|v| match v {
                [in_ch, out_ch] => {
                    DecoderBlockConfig::new(*in_ch, *out_ch, self.use_batchnorm).init(device)
                }
                _ => unreachable!(),
            })
            .collect();

        UpsamplingDecoder {
            fc: LinearConfig::new(
                self.num_features,
                base_channels * self.base_size * self.base_size,
            )
            .init(device),
            relu: Relu::new(),
            blocks,
            head: Conv2dConfig::new([last_channels, self.out_channels], [3, 3])
                .with_padding(PaddingConfig2d::Explicit(1, 1))
                .init(device),
            activation: self.activation,
            base_channels,
            base_size: self.base_size,
        }
    }
}
