use core::f64::consts::SQRT_2;

use burn::{
    module::Module,
    nn::{
        conv::{Conv2d, Conv2dConfig},
        pool::{AdaptiveAvgPool2d, AdaptiveAvgPool2dConfig, MaxPool2d, MaxPool2dConfig},
        BatchNorm, BatchNormConfig, Initializer, PaddingConfig2d, Relu,
    },
    tensor::{backend::Backend, Device, Tensor},
};

use crate::encoder::Encoder;

use super::block::{LayerBlock, LayerBlockConfig};

/// Below this input size the stem keeps full resolution (3x3 stride 1 conv, no max-pool).
const SMALL_INPUT: usize = 64;

/// ResNet feature extractor without the classification layer.
/// Derived from [torchivision.models.resnet.ResNet](https://github.com/pytorch/vision/blob/main/torchvision/models/resnet.py)
#[derive(Module, Debug)]
pub struct ResNet<B: Backend> {
    conv1: Conv2d<B>,
    bn1: BatchNorm<B, 2>,
    relu: Relu,
    maxpool: Option<MaxPool2d>,
    layer1: LayerBlock<B>,
    layer2: LayerBlock<B>,
    layer3: LayerBlock<B>,
    layer4: LayerBlock<B>,
    avgpool: AdaptiveAvgPool2d,
}

impl<B: Backend> Encoder<B> for ResNet<B> {
    fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 2> {
        // Stem
        let x = self.conv1.forward(x);
        let x = self.bn1.forward(x);
        let mut x = self.relu.forward(x);
        if let Some(ref maxpool) = self.maxpool {
            x = maxpool.forward(x);
        }

        // Residual blocks
        let x = self.layer1.forward(x);
        let x = self.layer2.forward(x);
        let x = self.layer3.forward(x);
        let x = self.layer4.forward(x);

        // [B, 512, H, W] -> [B, 512]
        self.avgpool.forward(x).flatten(1, 3)
    }
}

/// [ResNet](ResNet) configuration.
#[derive(Clone)]
pub struct ResNetConfig {
    conv1: Conv2dConfig,
    bn1: BatchNormConfig,
    maxpool: Option<MaxPool2dConfig>,
    layer1: LayerBlockConfig,
    layer2: LayerBlockConfig,
    layer3: LayerBlockConfig,
    layer4: LayerBlockConfig,
    avgpool: AdaptiveAvgPool2dConfig,
}

impl ResNetConfig {
    /// Create a ResNet with basic residual blocks for inputs of shape `[channels, height, width]`.
    pub fn new(blocks: [usize; 4], input_shape: [usize; 3]) -> Self {
        let [in_channels, height, width] = input_shape;

        let (conv1, maxpool) = if height.min(width) < SMALL_INPUT {
            // 3x3 conv, 64
            let conv1 = Conv2dConfig::new([in_channels, 64], [3, 3])
                .with_padding(PaddingConfig2d::Explicit(1, 1))
                .with_bias(false);
            (conv1, None)
        } else {
            // 7x7 conv, 64, /2 followed by 3x3 maxpool, /2
            let conv1 = Conv2dConfig::new([in_channels, 64], [7, 7])
                .with_stride([2, 2])
                .with_padding(PaddingConfig2d::Explicit(3, 3))
                .with_bias(false);
            let maxpool = MaxPool2dConfig::new([3, 3])
                .with_strides([2, 2])
                .with_padding(PaddingConfig2d::Explicit(1, 1));
            (conv1, Some(maxpool))
        };
        let bn1 = BatchNormConfig::new(64);

        let layer1 = LayerBlockConfig::new(blocks[0], 64, 64, 1);
        let layer2 = LayerBlockConfig::new(blocks[1], 64, 128, 2);
        let layer3 = LayerBlockConfig::new(blocks[2], 128, 256, 2);
        let layer4 = LayerBlockConfig::new(blocks[3], 256, 512, 2);

        // Average pooling [B, 512, H, W] -> [B, 512, 1, 1]
        let avgpool = AdaptiveAvgPool2dConfig::new([1, 1]);

        Self {
            conv1,
            bn1,
            maxpool,
            layer1,
            layer2,
            layer3,
            layer4,
            avgpool,
        }
    }

    pub fn resnet18(input_shape: [usize; 3]) -> Self {
        Self::new([2, 2, 2, 2], input_shape)
    }

    /// Initialize a new [ResNet](ResNet) module.
    pub fn init<B: Backend>(&self, device: &Device<B>) -> ResNet<B> {
        // Conv initializer
        let initializer = Initializer::KaimingNormal {
            gain: SQRT_2, // recommended value for ReLU
            fan_out_only: true,
        };

        ResNet {
            conv1: self
                .conv1
                .clone()
                .with_initializer(initializer)
                .init(device),
            bn1: self.bn1.init(device),
            relu: Relu::new(),
            maxpool: self.maxpool.as_ref().map(MaxPool2dConfig::init),
            layer1: self.layer1.init(device),
            layer2: self.layer2.init(device),
            layer3: self.layer3.init(device),
            layer4: self.layer4.init(device),
            avgpool: self.avgpool.init(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    #[test]
    fn small_inputs_skip_the_maxpool_stem() {
        let device = Default::default();
        let resnet = ResNetConfig::resnet18([1, 28, 28]).init::<NdArray>(&device);

        assert!(resnet.maxpool.is_none());
        assert_eq!(
            resnet.forward(Tensor::zeros([2, 1, 28, 28], &device)).dims(),
            [2, 512]
        );
    }

    #[test]
    fn large_inputs_use_the_imagenet_stem() {
        let device = Default::default();
        let resnet = ResNetConfig::resnet18([3, 128, 128]).init::<NdArray>(&device);

        assert!(resnet.maxpool.is_some());
        assert_eq!(
            resnet.forward(Tensor::zeros([1, 3, 128, 128], &device)).dims(),
            [1, 512]
        );
    }
}
