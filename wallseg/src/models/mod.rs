//! # Model Architectures
//!
//! - `unet`: Defines the `UNet` model, which composes encoder, bottleneck, decoder and
//!   output head into one forward pass.
//! - `modules`: The building blocks: `DoubleConv`, the encoder and decoder stacks, and
//!   the skip connection container that links them.

pub mod modules;
pub mod unet;

pub use modules::*;
pub use unet::*;
