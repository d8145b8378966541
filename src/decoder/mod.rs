pub mod mnist_cnn;
pub mod upsampling;

use burn::prelude::*;

use crate::activation::Activation;

use self::{
    mnist_cnn::{MnistCnnDecoder, MnistCnnDecoderConfig},
    upsampling::{UpsamplingDecoder, UpsamplingDecoderConfig},
};

/// Maps latent vectors `[batch, num_features]` to images `[batch, channels, height, width]`.
pub trait Decoder<B: Backend> {
    fn forward(&self, x: Tensor<B, 2>) -> Tensor<B, 4>;
}

/// Spatial decoder, chosen by output resolution rather than by backbone.
#[derive(Module, Debug)]
pub enum SpatialDecoder<B: Backend> {
    MnistCnn(MnistCnnDecoder<B>),
    Upsampling(UpsamplingDecoder<B>),
}

impl<B: Backend> SpatialDecoder<B> {
    /// Build the decoder for `resolution`, or `None` when no spatial decoder exists for it.
    pub fn for_resolution(
        resolution: usize,
        in_features: usize,
        num_features: usize,
        activation: Activation,
        device: &B::Device,
    ) -> Option<Self> {
        let decoder = match resolution {
            28 => Self::MnistCnn(
                MnistCnnDecoderConfig::new(num_features, in_features)
                    .with_activation(activation)
                    .init(device),
            ),
            128 => Self::Upsampling(
                UpsamplingDecoderConfig::decoder128(in_features, num_features)
                    .with_activation(activation)
                    .init(device),
            ),
            224 => Self::Upsampling(
                UpsamplingDecoderConfig::decoder224(num_features)
                    .with_activation(activation)
                    .init(device),
            ),
            _ => return None,
        };
        Some(decoder)
    }
}

impl<B: Backend> Decoder<B> for SpatialDecoder<B> {
    fn forward(&self, x: Tensor<B, 2>) -> Tensor<B, 4> {
        match self {
            Self::MnistCnn(decoder) => decoder.forward(x),
            Self::Upsampling(decoder) => decoder.forward(x),
        }
    }
}
