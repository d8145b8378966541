use thiserror::Error;

/// Errors raised while configuring or stepping an autoencoder.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The backbone name does not match any known encoder.
    #[error("Backbone {0} not supported")]
    UnsupportedBackbone(String),

    /// An argument of the shared training step that this model does not consume was supplied.
    #[error("{0} should be None for AutoEncoder::train_step()")]
    UnexpectedInput(&'static str),
}

pub type Result<T> = core::result::Result<T, Error>;
