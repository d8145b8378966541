use burn::{
    module::Module,
    tensor::{activation, backend::Backend, Tensor},
};

/// Activation applied to the last layer of a spatial decoder.
///
/// `Sigmoid` suits images normalized to `[0, 1]`, `Tanh` suits `[-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Module, serde::Serialize, serde::Deserialize)]
pub enum Activation {
    Identity,
    Sigmoid,
    Tanh,
}

impl Activation {
    pub fn forward<B: Backend>(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        match self {
            Self::Identity => x,
            Self::Sigmoid => activation::sigmoid(x),
            Self::Tanh => activation::tanh(x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn sigmoid_maps_into_unit_interval() {
        let device = Default::default();
        let x = Tensor::<TestBackend, 4>::from_floats([[[[-50.0, 0.0, 50.0]]]], &device);

        let y: Vec<f32> = Activation::Sigmoid.forward(x).into_data().to_vec().unwrap();

        assert!(y.iter().all(|v| (0.0..=1.0).contains(v)));
        assert!((y[1] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn identity_is_passthrough() {
        let device = Default::default();
        let x = Tensor::<TestBackend, 4>::from_floats([[[[-2.0, 3.0]]]], &device);

        Activation::Identity
            .forward(x.clone())
            .into_data()
            .assert_eq(&x.into_data(), true);
    }
}
