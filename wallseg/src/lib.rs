//! # wallseg
//!
//! A U-Net for semantic segmentation of walls in indoor scenes, built using the Burn
//! deep learning framework.
//!
//! ## Modules
//!
//! - `config`: The model configuration and the feature schedule that every stage of
//!   the network is derived from.
//! - `error`: Defines the custom error types used throughout the crate.
//! - `models`: Implements the architecture: `DoubleConv`, the encoder and decoder
//!   stacks, skip connections and the composed `UNet`.
//! - `dataset` (feature `dataset`): Produces (image, mask) pairs from ADE20K scenes
//!   that contain walls.
//!
//! ## Key Components
//!
//! - `UNet`: The main model struct.
//! - `ModelConfig`: The primary configuration struct that drives the model's construction.
//! - `UNetError`: The enum for all model errors.
//!
//! Training, losses and metrics belong to the caller; the model only defines the
//! forward pass and owns the learned parameters.

mod config;
mod error;
mod models;

#[cfg(feature = "dataset")]
pub mod dataset;

#[doc(inline)]
pub use config::{FeatureSchedule, InterpolationStrategy, ModelConfig, StageDescriptor};
#[doc(inline)]
pub use error::{UNetError, UNetResult};
#[doc(inline)]
pub use models::{
    Decoder, DecoderConfig, DecoderStage, DecoderStageConfig, DoubleConv, DoubleConvConfig,
    Encoder, EncoderConfig, SkipConnections, UNet, UNetConfig, UNetRecord,
};
