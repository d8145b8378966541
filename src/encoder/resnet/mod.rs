mod block;
mod resnet;

pub use resnet::*;
