use burn::{
    nn::{Linear, LinearConfig, Relu},
    prelude::*,
};

/// Feature-to-feature transform applied between the encoder and the spatial decoder.
///
/// `num_features -> 1024 -> ReLU -> 512 -> ReLU -> num_features`
#[derive(Module, Debug)]
pub struct Bottleneck<B: Backend> {
    fc1: Linear<B>,
    fc2: Linear<B>,
    fc3: Linear<B>,
    relu: Relu,
}

impl<B: Backend> Bottleneck<B> {
    pub fn forward(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = self.relu.forward(self.fc1.forward(x));
        let x = self.relu.forward(self.fc2.forward(x));
        self.fc3.forward(x)
    }
}

#[derive(Config, Debug)]
pub struct BottleneckConfig {
    num_features: usize,
    #[config(default = 1024)]
    hidden_features: usize,
    #[config(default = 512)]
    inner_features: usize,
}

impl BottleneckConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> Bottleneck<B> {
        Bottleneck {
            fc1: LinearConfig::new(self.num_features, self.hidden_features).init(device),
            fc2: LinearConfig::new(self.hidden_features, self.inner_features).init(device),
            fc3: LinearConfig::new(self.inner_features, self.num_features).init(device),
            relu: Relu::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    #[test]
    fn preserves_feature_width() {
        let device = Default::default();
        let bottleneck = BottleneckConfig::new(256).init::<NdArray>(&device);

        let x = Tensor::zeros([3, 256], &device);

        assert_eq!(bottleneck.forward(x).dims(), [3, 256]);
    }
}
