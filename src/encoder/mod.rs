pub mod alexnet;
pub mod encoder128;
pub mod flatten;
pub mod mnist_cnn;
pub mod resnet;
pub mod vit;

mod backbone;
pub use backbone::*;

use burn::{
    module::Module,
    tensor::{backend::Backend, Tensor},
};

/// Maps an image batch `[batch, channels, height, width]` to latent vectors `[batch, num_features]`.
pub trait Encoder<B: Backend>: Module<B> {
    fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 2>;
}
