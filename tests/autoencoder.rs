use approx::assert_relative_eq;
use autoencoder_models_burn::{
    activation::Activation, encoder::Backbone, train::TrainStep, AutoEncoderConfig,
};
use burn::{
    backend::{Autodiff, NdArray},
    prelude::*,
    tensor::Distribution,
};

type TestBackend = NdArray;

fn random_images<B: Backend>(shape: [usize; 4], device: &B::Device) -> Tensor<B, 4> {
    Tensor::random(shape, Distribution::Uniform(0.0, 1.0), device)
}

#[test]
fn every_backbone_produces_its_latent_width() {
    let device = Default::default();
    let cases = [
        (Backbone::Vit, 1, 28, 256),
        (Backbone::ResNet18, 1, 28, 512),
        (Backbone::Encoder128, 3, 128, 256),
        (Backbone::AlexNet, 1, 28, 256),
        (Backbone::MnistCnn, 1, 28, 256),
        (Backbone::None, 1, 28, 784),
    ];

    for (backbone, in_features, resolution, num_features) in cases {
        let model = AutoEncoderConfig::new(in_features, backbone)
            .with_resolution(resolution)
            .init::<TestBackend>(&device);
        let x = random_images([2, in_features, resolution, resolution], &device);

        assert_eq!(model.num_features(), num_features, "{backbone}");
        assert_eq!(model.forward(x).dims(), [2, num_features], "{backbone}");
    }
}

#[test]
fn reconstruction_keeps_the_image_shape() {
    let device = Default::default();
    let cases = [
        ("mnist_cnn", 1, 28),
        ("none", 1, 28),
        ("128", 3, 128),
        ("resnet18", 3, 224),
    ];

    for (backbone, in_features, resolution) in cases {
        let model = AutoEncoderConfig::from_names(in_features, backbone, resolution)
            .unwrap()
            .init::<TestBackend>(&device);
        let shape = [1, in_features, resolution, resolution];

        assert_eq!(
            model.reconstruct(random_images(shape, &device)).dims(),
            shape,
            "{backbone}"
        );
    }
}

#[test]
fn every_supported_pairing_reconstructs_the_input_shape() {
    let device = Default::default();
    let cases = [
        (Backbone::Vit, 1, 28),
        (Backbone::MnistCnn, 1, 28),
        (Backbone::None, 1, 28),
        (Backbone::AlexNet, 1, 28),
        (Backbone::AlexNet, 3, 128),
        (Backbone::AlexNet, 3, 224),
        (Backbone::ResNet18, 1, 28),
        (Backbone::ResNet18, 3, 128),
        (Backbone::ResNet18, 3, 224),
        (Backbone::Encoder128, 3, 128),
    ];

    for (backbone, in_features, resolution) in cases {
        let model = AutoEncoderConfig::new(in_features, backbone)
            .with_resolution(resolution)
            .init::<TestBackend>(&device);
        let shape = [2, in_features, resolution, resolution];

        assert_eq!(
            model.reconstruct(random_images(shape, &device)).dims(),
            shape,
            "{backbone} at {resolution}"
        );
    }
}

#[test]
fn train_step_returns_reconstruction_mse() {
    let device = Default::default();
    let model = AutoEncoderConfig::from_names(1, "mnist_cnn", 28)
        .unwrap()
        .with_output_activation(Activation::Sigmoid)
        .init::<TestBackend>(&device);
    let img = random_images([4, 1, 28, 28], &device);

    let loss = model.train_step(img.clone(), None, None, None, 0).unwrap();
    assert_eq!(loss.dims(), [1]);
    let loss: f32 = loss.into_scalar();

    let expected: f32 = (model.reconstruct(img.clone()) - img)
        .powf_scalar(2.0)
        .mean()
        .into_scalar();

    assert!(loss >= 0.0);
    assert_relative_eq!(loss, expected, max_relative = 1e-5);
}

#[test]
fn train_step_loss_reaches_the_input() {
    type AutodiffBackend = Autodiff<NdArray>;

    let device = Default::default();
    let model = AutoEncoderConfig::new(1, Backbone::MnistCnn).init::<AutodiffBackend>(&device);
    let img = random_images::<AutodiffBackend>([2, 1, 28, 28], &device).require_grad();

    let loss = model.train_step(img.clone(), None, None, None, 3).unwrap();
    let grads = loss.backward();

    let grad = img.grad(&grads).expect("input should receive a gradient");
    assert_eq!(grad.dims(), [2, 1, 28, 28]);
}
