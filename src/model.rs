use burn::prelude::*;

use crate::{
    activation::Activation,
    bottleneck::{Bottleneck, BottleneckConfig},
    decoder::{Decoder, SpatialDecoder},
    encoder::{Backbone, BackboneEncoder, Encoder},
};

/// Image autoencoder: backbone encoder, bottleneck, resolution-matched decoder.
#[derive(Module, Debug)]
pub struct AutoEncoder<B: Backend> {
    pub encoder: BackboneEncoder<B>,
    pub pre_decode: Bottleneck<B>,
    /// `None` when the resolution has no spatial decoder.
    pub decoder: Option<SpatialDecoder<B>>,
    num_features: usize,
}

impl<B: Backend> AutoEncoder<B> {
    /// Encode images `[B, C, H, W]` into latent vectors `[B, num_features]`.
    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 2> {
        self.encoder.forward(x)
    }

    /// Bottleneck followed by the spatial decoder.
    ///
    /// Without a spatial decoder the bottleneck output is returned as `[B, num_features, 1, 1]`.
    pub fn decode(&self, z: Tensor<B, 2>) -> Tensor<B, 4> {
        let z = self.pre_decode.forward(z);
        match self.decoder {
            Some(ref decoder) => decoder.forward(z),
            None => {
                let [batch, features] = z.dims();
                z.reshape([batch, features, 1, 1])
            }
        }
    }

    pub fn reconstruct(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        let z = self.forward(x);
        self.decode(z)
    }

    pub fn num_features(&self) -> usize {
        self.num_features
    }
}

#[derive(Config, Debug)]
pub struct AutoEncoderConfig {
    /// Number of image channels.
    pub in_features: usize,
    pub backbone: Backbone,
    #[config(default = 28)]
    pub resolution: usize,
    #[config(default = "Activation::Identity")]
    pub output_activation: Activation,
}

impl AutoEncoderConfig {
    /// Same as [`AutoEncoderConfig::new`] with the backbone given by name.
    pub fn from_names(in_features: usize, backbone: &str, resolution: usize) -> crate::Result<Self> {
        Ok(Self::new(in_features, backbone.parse()?).with_resolution(resolution))
    }

    pub fn num_features(&self) -> usize {
        self.backbone.num_features()
    }

    pub fn init<B: Backend>(&self, device: &B::Device) -> AutoEncoder<B> {
        let num_features = self.num_features();
        tracing::debug!(
            backbone = %self.backbone,
            in_features = self.in_features,
            resolution = self.resolution,
            num_features,
            "building autoencoder"
        );

        let encoder = self.backbone.init(self.in_features, self.resolution, device);
        let pre_decode = BottleneckConfig::new(num_features).init(device);
        let decoder = SpatialDecoder::for_resolution(
            self.resolution,
            self.in_features,
            num_features,
            self.output_activation,
            device,
        );
        if decoder.is_none() {
            tracing::warn!(
                resolution = self.resolution,
                "no spatial decoder for this resolution, reconstructions are bottleneck outputs"
            );
        }

        AutoEncoder {
            encoder,
            pre_decode,
            decoder,
            num_features,
        }
    }
}
