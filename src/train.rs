use burn::{
    nn::loss::{MseLoss, Reduction},
    prelude::*,
};

use crate::{AutoEncoder, Error, Result};

/// Training step shared by every model family driven by the same training loop.
///
/// The argument list is fixed so the loop can treat models interchangeably.
/// Each implementation documents which arguments it requires to be `None`;
/// supplying one of them yields [`Error::UnexpectedInput`] before anything is computed.
/// The returned loss is not back-propagated and no parameter is updated.
pub trait TrainStep<B: Backend> {
    /// Signal a model may be distilled from.
    type Teacher;

    fn train_step(
        &self,
        img1: Tensor<B, 4>,
        img2: Option<Tensor<B, 4>>,
        actions: Option<Tensor<B, 3>>,
        teacher: Option<&Self::Teacher>,
        epoch: usize,
    ) -> Result<Tensor<B, 1>>;
}

/// Single-image reconstruction: `img2`, `actions` and `teacher` must be `None`.
/// The loss is the mean squared error between `reconstruct(img1)` and `img1`.
impl<B: Backend> TrainStep<B> for AutoEncoder<B> {
    type Teacher = AutoEncoder<B>;

    fn train_step(
        &self,
        img1: Tensor<B, 4>,
        img2: Option<Tensor<B, 4>>,
        actions: Option<Tensor<B, 3>>,
        teacher: Option<&Self::Teacher>,
        epoch: usize,
    ) -> Result<Tensor<B, 1>> {
        if img2.is_some() {
            return Err(Error::UnexpectedInput("img2"));
        }
        if actions.is_some() {
            return Err(Error::UnexpectedInput("actions"));
        }
        if teacher.is_some() {
            return Err(Error::UnexpectedInput("teacher"));
        }

        let preds = self.reconstruct(img1.clone());
        let loss = MseLoss::new().forward(preds, img1, Reduction::Mean);
        tracing::trace!(epoch, "autoencoder train step");

        Ok(loss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{encoder::Backbone, AutoEncoderConfig};
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    fn mnist_model(device: &<TestBackend as Backend>::Device) -> AutoEncoder<TestBackend> {
        AutoEncoderConfig::new(1, Backbone::MnistCnn).init(device)
    }

    #[test]
    fn rejects_second_image() {
        let device = Default::default();
        let model = mnist_model(&device);
        let img = Tensor::zeros([1, 1, 28, 28], &device);

        let err = model
            .train_step(img.clone(), Some(img), None, None, 0)
            .unwrap_err();

        assert_eq!(err, Error::UnexpectedInput("img2"));
        assert_eq!(
            err.to_string(),
            "img2 should be None for AutoEncoder::train_step()"
        );
    }

    #[test]
    fn rejects_before_running_the_model() {
        let device = Default::default();
        let model = mnist_model(&device);
        // Reconstructing a 5x5 image would panic in the encoder's linear layer.
        let img = Tensor::zeros([1, 1, 5, 5], &device);

        let err = model
            .train_step(img.clone(), Some(img), None, None, 0)
            .unwrap_err();

        assert_eq!(err, Error::UnexpectedInput("img2"));
    }

    #[test]
    fn rejects_actions_and_teacher() {
        let device = Default::default();
        let model = mnist_model(&device);
        let teacher = mnist_model(&device);
        let img = Tensor::zeros([1, 1, 28, 28], &device);
        let actions = Tensor::zeros([1, 4, 2], &device);

        let err = model
            .train_step(img.clone(), None, Some(actions), None, 0)
            .unwrap_err();
        assert_eq!(err, Error::UnexpectedInput("actions"));

        let err = model
            .train_step(img, None, None, Some(&teacher), 0)
            .unwrap_err();
        assert_eq!(err, Error::UnexpectedInput("teacher"));
    }
}
