use burn::{
    module::Param,
    nn::{
        conv::{Conv2d, Conv2dConfig},
        transformer::{TransformerEncoder, TransformerEncoderConfig, TransformerEncoderInput},
        Initializer, LayerNorm, LayerNormConfig,
    },
    prelude::*,
};

use super::Encoder;

/// Vision transformer with register tokens.
///
/// Patches are embedded by a strided convolution, prefixed with a class token and
/// position-embedded. Register tokens are appended after the position embedding and
/// dropped at the output. The classification head is removed, so the encoder returns
/// the normalized class token `[B, hidden_dim]`.
#[derive(Module, Debug)]
pub struct RegisteredVit<B: Backend> {
    conv_proj: Conv2d<B>,
    class_token: Param<Tensor<B, 3>>,
    registers: Param<Tensor<B, 3>>,
    pos_embedding: Param<Tensor<B, 3>>,
    encoder: TransformerEncoder<B>,
    norm: LayerNorm<B>,
}

impl<B: Backend> Encoder<B> for RegisteredVit<B> {
    fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 2> {
        let batch = x.dims()[0];

        // [B, C, H, W] -> [B, D, H/p, W/p] -> [B, N, D]
        let x = self.conv_proj.forward(x).flatten::<3>(2, 3).swap_dims(1, 2);

        let class_token = self.class_token.val().repeat_dim(0, batch);
        let x = Tensor::cat(vec![class_token, x], 1);
        let x = x + self.pos_embedding.val().repeat_dim(0, batch);

        let registers = self.registers.val().repeat_dim(0, batch);
        let x = Tensor::cat(vec![x, registers], 1);

        let x = self.encoder.forward(TransformerEncoderInput::new(x));
        let x = self.norm.forward(x);

        let [_, _, hidden_dim] = x.dims();
        x.slice([0..batch, 0..1, 0..hidden_dim])
            .reshape([batch, hidden_dim])
    }
}

#[derive(Config, Debug)]
pub struct RegisteredVitConfig {
    in_channels: usize,
    #[config(default = 28)]
    image_size: usize,
    #[config(default = 7)]
    patch_size: usize,
    #[config(default = 6)]
    num_layers: usize,
    #[config(default = 4)]
    num_heads: usize,
    #[config(default = 256)]
    hidden_dim: usize,
    #[config(default = 4)]
    num_registers: usize,
    #[config(default = 1024)]
    mlp_dim: usize,
    #[config(default = 0.0)]
    dropout: f64,
}

impl RegisteredVitConfig {
    fn num_patches(&self) -> usize {
        let side = self.image_size / self.patch_size;
        side * side
    }

    pub fn init<B: Backend>(&self, device: &B::Device) -> RegisteredVit<B> {
        let token_init = Initializer::Normal {
            mean: 0.0,
            std: 0.02,
        };

        RegisteredVit {
            conv_proj: Conv2dConfig::new(
                [self.in_channels, self.hidden_dim],
                [self.patch_size, self.patch_size],
            )
            .with_stride([self.patch_size, self.patch_size])
            .init(device),
            class_token: Initializer::Zeros.init([1, 1, self.hidden_dim], device),
            registers: token_init.init([1, self.num_registers, self.hidden_dim], device),
            pos_embedding: token_init.init([1, self.num_patches() + 1, self.hidden_dim], device),
            encoder: TransformerEncoderConfig::new(
                self.hidden_dim,
                self.mlp_dim,
                self.num_heads,
                self.num_layers,
            )
            .with_dropout(self.dropout)
            .with_norm_first(true)
            .init(device),
            norm: LayerNormConfig::new(self.hidden_dim)
                .with_epsilon(1e-6)
                .init(device),
        }
    }
}
