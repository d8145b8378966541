use burn::{
    nn::{Linear, LinearConfig},
    prelude::*,
};

use crate::conv2drelu::{Conv2dReLU, Conv2dReLUConfig};

use super::Encoder;

/// Strided convolutional encoder for 128x128 images.
///
/// Each stage halves the spatial size: 128 -> 64 -> 32 -> 16 -> 8 -> 4.
#[derive(Module, Debug)]
pub struct Encoder128<B: Backend> {
    stages: Vec<Conv2dReLU<B>>,
    fc: Linear<B>,
}

impl<B: Backend> Encoder<B> for Encoder128<B> {
    fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 2> {
        let x = self
            .stages
            .iter()
            .fold(x, |x, stage| stage.forward(x));
        self.fc.forward(x.flatten(1, 3))
    }
}

#[derive(Config, Debug)]
pub struct Encoder128Config {
    in_channels: usize,
    num_features: usize,
    #[config(default = "vec![32, 64, 128, 256, 256]")]
    channels: Vec<usize>,
    #[config(default = 128)]
    resolution: usize,
}

impl Encoder128Config {
    pub fn init<B: Backend>(&self, device: &B::Device) -> Encoder128<B> {
        let stages = std::iter::once(self.in_channels)
            .chain(self.channels.iter().copied())
            .zip(self.channels.iter().copied())
            .map(|(in_ch, out_ch)| {
                Conv2dReLUConfig::new(in_ch, out_ch)
                    .with_stride([2, 2])
                    .with_use_batchnorm(true)
                    .init(device)
            })
            .collect();

        let side = self.resolution >> self.channels.len();
        let last = self.channels.last().copied().unwrap_or(self.in_channels);

        Encoder128 {
            stages,
            fc: LinearConfig::new(last * side * side, self.num_features).init(device),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    #[test]
    fn encodes_128x128_images() {
        let device = Default::default();
        let encoder = Encoder128Config::new(3, 256).init::<NdArray>(&device);

        let z = encoder.forward(Tensor::zeros([1, 3, 128, 128], &device));

        assert_eq!(z.dims(), [1, 256]);
    }
}
