use burn::{
    nn::{
        conv::{Conv2d, Conv2dConfig},
        BatchNorm, BatchNormConfig, PaddingConfig2d, Relu,
    },
    prelude::*,
};

/// Convolution, optional batch norm, ReLU.
///
/// Shared by the strided stages of [`Encoder128`](crate::encoder::encoder128::Encoder128)
/// (stride 2, batch norm) and the upsampling blocks of
/// [`UpsamplingDecoder`](crate::decoder::upsampling::UpsamplingDecoder) (stride 1, no batch norm).
#[derive(Module, Debug)]
pub struct Conv2dReLU<B: Backend> {
    conv: Conv2d<B>,
    batchnorm: Option<BatchNorm<B, 2>>,
    relu: Relu,
}

impl<B: Backend> Conv2dReLU<B> {
    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        let x = self.conv.forward(x);
        let x = match &self.batchnorm {
            Some(batchnorm) => batchnorm.forward(x),
            None => x,
        };
        self.relu.forward(x)
    }
}

/// 3x3 kernel with padding 1 unless overridden, so only `stride` changes the spatial size.
#[derive(Config, Debug)]
pub struct Conv2dReLUConfig {
    in_channels: usize,
    out_channels: usize,
    #[config(default = "[3, 3]")]
    kernel_size: [usize; 2],
    #[config(default = "PaddingConfig2d::Explicit(1, 1)")]
    padding: PaddingConfig2d,
    #[config(default = "[1, 1]")]
    stride: [usize; 2],
    #[config(default = false)]
    use_batchnorm: bool,
}

impl Conv2dReLUConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> Conv2dReLU<B> {
        Conv2dReLU {
            conv: Conv2dConfig::new([self.in_channels, self.out_channels], self.kernel_size)
                .with_stride(self.stride)
                .with_padding(self.padding.clone())
                .with_bias(!self.use_batchnorm)
                .init(device),
            batchnorm: self
                .use_batchnorm
                .then(|| BatchNormConfig::new(self.out_channels).init(device)),
            relu: Relu::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    #[test]
    fn stride_alone_sets_the_output_size() {
        let device = Default::default();
        let strided = Conv2dReLUConfig::new(3, 8)
            .with_stride([2, 2])
            .with_use_batchnorm(true)
            .init::<NdArray>(&device);

        let y = strided.forward(Tensor::ones([1, 3, 16, 16], &device));

        assert_eq!(y.dims(), [1, 8, 8, 8]);
        assert!(y.min().into_scalar() >= 0.0);
    }
}
