mod conv2drelu;
mod error;
pub use error::{Error, Result};

pub mod activation;
pub mod bottleneck;
pub mod decoder;
pub mod encoder;
pub mod train;

mod model;
pub use model::*;
