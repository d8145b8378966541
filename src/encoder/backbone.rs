use core::{fmt, str::FromStr};

use burn::prelude::*;

use crate::{Error, Result};

use super::{
    alexnet::{AlexNet, AlexNetConfig},
    encoder128::{Encoder128, Encoder128Config},
    flatten::FlattenEncoder,
    mnist_cnn::{MnistCnnEncoder, MnistCnnEncoderConfig},
    resnet::{ResNet, ResNetConfig},
    vit::{RegisteredVit, RegisteredVitConfig},
    Encoder,
};

/// Encoder architecture, selected by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Backbone {
    /// Register-augmented vision transformer, 28x28 input only.
    #[serde(rename = "vit")]
    Vit,
    #[serde(rename = "resnet18")]
    ResNet18,
    #[serde(rename = "128")]
    Encoder128,
    #[serde(rename = "alexnet")]
    AlexNet,
    #[serde(rename = "mnist_cnn")]
    MnistCnn,
    /// No learned encoder, the image is flattened as is.
    #[serde(rename = "none")]
    None,
}

impl Backbone {
    pub const ALL: [Backbone; 6] = [
        Self::Vit,
        Self::ResNet18,
        Self::Encoder128,
        Self::AlexNet,
        Self::MnistCnn,
        Self::None,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Vit => "vit",
            Self::ResNet18 => "resnet18",
            Self::Encoder128 => "128",
            Self::AlexNet => "alexnet",
            Self::MnistCnn => "mnist_cnn",
            Self::None => "none",
        }
    }

    /// Latent width produced by this backbone. Fixed per backbone.
    pub fn num_features(&self) -> usize {
        match self {
            Self::Vit => 256,
            Self::ResNet18 => 512,
            Self::Encoder128 => 256,
            Self::AlexNet => 256,
            Self::MnistCnn => 256,
            // 1x28x28
            Self::None => 784,
        }
    }

    /// Build the encoder for images of `in_features` channels at `resolution`.
    pub fn init<B: Backend>(
        &self,
        in_features: usize,
        resolution: usize,
        device: &B::Device,
    ) -> BackboneEncoder<B> {
        match self {
            Self::Vit => BackboneEncoder::Vit(
                RegisteredVitConfig::new(in_features)
                    .with_hidden_dim(self.num_features())
                    .init(device),
            ),
            Self::ResNet18 => BackboneEncoder::ResNet(
                ResNetConfig::resnet18([in_features, resolution, resolution]).init(device),
            ),
            Self::Encoder128 => BackboneEncoder::Encoder128(
                Encoder128Config::new(in_features, self.num_features()).init(device),
            ),
            Self::AlexNet => BackboneEncoder::AlexNet(AlexNetConfig::new(in_features).init(device)),
            Self::MnistCnn => BackboneEncoder::MnistCnn(
                MnistCnnEncoderConfig::new(in_features, self.num_features()).init(device),
            ),
            Self::None => BackboneEncoder::Flatten(FlattenEncoder::new()),
        }
    }
}

impl fmt::Display for Backbone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Backbone {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|backbone| backbone.name() == s)
            .ok_or_else(|| Error::UnsupportedBackbone(s.to_string()))
    }
}

/// One constructed encoder per [`Backbone`] variant.
#[derive(Module, Debug)]
pub enum BackboneEncoder<B: Backend> {
    Vit(RegisteredVit<B>),
    ResNet(ResNet<B>),
    Encoder128(Encoder128<B>),
    AlexNet(AlexNet<B>),
    MnistCnn(MnistCnnEncoder<B>),
    Flatten(FlattenEncoder),
}

impl<B: Backend> Encoder<B> for BackboneEncoder<B> {
    fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 2> {
        match self {
            Self::Vit(encoder) => encoder.forward(x),
            Self::ResNet(encoder) => encoder.forward(x),
            Self::Encoder128(encoder) => encoder.forward(x),
            Self::AlexNet(encoder) => encoder.forward(x),
            Self::MnistCnn(encoder) => encoder.forward(x),
            Self::Flatten(encoder) => Encoder::<B>::forward(encoder, x),
        }
    }
}
