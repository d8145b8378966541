use core::f64::consts::SQRT_2;

use burn::{
    nn::{
        conv::{Conv2d, Conv2dConfig},
        BatchNorm, BatchNormConfig, Initializer, PaddingConfig2d, Relu,
    },
    prelude::*,
};

/// 1x1 projection applied to the identity branch when the shape changes.
#[derive(Module, Debug)]
pub struct Downsample<B: Backend> {
    conv: Conv2d<B>,
    bn: BatchNorm<B, 2>,
}

impl<B: Backend> Downsample<B> {
    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        self.bn.forward(self.conv.forward(x))
    }
}

/// Two 3x3 convolutions with a residual connection.
#[derive(Module, Debug)]
pub struct BasicBlock<B: Backend> {
    conv1: Conv2d<B>,
    bn1: BatchNorm<B, 2>,
    relu: Relu,
    conv2: Conv2d<B>,
    bn2: BatchNorm<B, 2>,
    downsample: Option<Downsample<B>>,
}

impl<B: Backend> BasicBlock<B> {
    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        let identity = match self.downsample {
            Some(ref downsample) => downsample.forward(x.clone()),
            None => x.clone(),
        };

        let out = self.relu.forward(self.bn1.forward(self.conv1.forward(x)));
        let out = self.bn2.forward(self.conv2.forward(out));

        self.relu.forward(out + identity)
    }
}

#[derive(Config, Debug)]
pub struct BasicBlockConfig {
    in_channels: usize,
    out_channels: usize,
    stride: usize,
}

impl BasicBlockConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> BasicBlock<B> {
        let initializer = Initializer::KaimingNormal {
            gain: SQRT_2,
            fan_out_only: true,
        };

        let downsample = (self.stride != 1 || self.in_channels != self.out_channels).then(|| {
            Downsample {
                conv: Conv2dConfig::new([self.in_channels, self.out_channels], [1, 1])
                    .with_stride([self.stride, self.stride])
                    .with_bias(false)
                    .with_initializer(initializer.clone())
                    .init(device),
                bn: BatchNormConfig::new(self.out_channels).init(device),
            }
        });

        BasicBlock {
            conv1: Conv2dConfig::new([self.in_channels, self.out_channels], [3, 3])
                .with_stride([self.stride, self.stride])
                .with_padding(PaddingConfig2d::Explicit(1, 1))
                .with_bias(false)
                .with_initializer(initializer.clone())
                .init(device),
            bn1: BatchNormConfig::new(self.out_channels).init(device),
            relu: Relu::new(),
            conv2: Conv2dConfig::new([self.out_channels, self.out_channels], [3, 3])
                .with_padding(PaddingConfig2d::Explicit(1, 1))
                .with_bias(false)
                .with_initializer(initializer)
                .init(device),
            bn2: BatchNormConfig::new(self.out_channels).init(device),
            downsample,
        }
    }
}

/// A stage of residual blocks; only the first block may change stride or width.
#[derive(Module, Debug)]
pub struct LayerBlock<B: Backend> {
    blocks: Vec<BasicBlock<B>>,
}

impl<B: Backend> LayerBlock<B> {
    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        self.blocks.iter().fold(x, |x, block| block.forward(x))
    }
}

#[derive(Config, Debug)]
pub struct LayerBlockConfig {
    num_blocks: usize,
    in_channels: usize,
    out_channels: usize,
    stride: usize,
}

impl LayerBlockConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> LayerBlock<B> {
        let blocks = (0..self.num_blocks)
            .map(|idx| {
                if idx == 0 {
                    BasicBlockConfig::new(self.in_channels, self.out_channels, self.stride)
                } else {
                    BasicBlockConfig::new(self.out_channels, self.out_channels, 1)
                }
                .init(device)
            })
            .collect();

        LayerBlock { blocks }
    }
}
