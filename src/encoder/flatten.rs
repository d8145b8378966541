use burn::prelude::*;

use super::Encoder;

/// Parameter-free encoder that flattens the image into a vector of
/// `channels * height * width` features.
#[derive(Module, Clone, Debug, Default)]
pub struct FlattenEncoder;

impl FlattenEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl<B: Backend> Encoder<B> for FlattenEncoder {
    fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 2> {
        x.flatten(1, 3)
    }
}
