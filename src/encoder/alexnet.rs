use burn::{
    nn::{
        conv::{Conv2d, Conv2dConfig},
        pool::{AdaptiveAvgPool2d, AdaptiveAvgPool2dConfig, MaxPool2d, MaxPool2dConfig},
        PaddingConfig2d, Relu,
    },
    prelude::*,
};

use super::Encoder;

/// AlexNet feature stack used as an encoder.
///
/// The stem is a 3x3 stride 1 convolution so small images survive the three max-pools,
/// pooling is adapted to 1x1 and the classifier is replaced by a flatten.
#[derive(Module, Debug)]
pub struct AlexNet<B: Backend> {
    conv1: Conv2d<B>,
    conv2: Conv2d<B>,
    conv3: Conv2d<B>,
    conv4: Conv2d<B>,
    conv5: Conv2d<B>,
    maxpool: MaxPool2d,
    avgpool: AdaptiveAvgPool2d,
    relu: Relu,
}

impl<B: Backend> Encoder<B> for AlexNet<B> {
    fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 2> {
        let x = self.relu.forward(self.conv1.forward(x));
        let x = self.maxpool.forward(x);

        let x = self.relu.forward(self.conv2.forward(x));
        let x = self.maxpool.forward(x);

        let x = self.relu.forward(self.conv3.forward(x));
        let x = self.relu.forward(self.conv4.forward(x));
        let x = self.relu.forward(self.conv5.forward(x));
        let x = self.maxpool.forward(x);

        // [B, 256, H, W] -> [B, 256, 1, 1] -> [B, 256]
        self.avgpool.forward(x).flatten(1, 3)
    }
}

#[derive(Config, Debug)]
pub struct AlexNetConfig {
    in_channels: usize,
}

impl AlexNetConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> AlexNet<B> {
        let conv = |channels: [usize; 2], kernel: usize, padding: usize| {
            Conv2dConfig::new(channels, [kernel, kernel])
                .with_padding(PaddingConfig2d::Explicit(padding, padding))
                .init(device)
        };

        AlexNet {
            conv1: conv([self.in_channels, 64], 3, 1),
            conv2: conv([64, 192], 5, 2),
            conv3: conv([192, 384], 3, 1),
            conv4: conv([384, 256], 3, 1),
            conv5: conv([256, 256], 3, 1),
            maxpool: MaxPool2dConfig::new([3, 3]).with_strides([2, 2]).init(),
            avgpool: AdaptiveAvgPool2dConfig::new([1, 1]).init(),
            relu: Relu::new(),
        }
    }
}
