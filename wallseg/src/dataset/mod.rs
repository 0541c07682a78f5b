//! Dataset collaborator: produces (image, mask) pairs for an external training harness.
//!
//! - `scene`: parses ADE20K scene categories and lists the indoor scenes with walls
//! - `ade20k`: collects and loads image/annotation pairs restricted to those scenes
//! - `batcher`: stacks raw samples into tensors
//! - `error`: dataset error types

mod ade20k;
mod batcher;
pub mod error;
mod scene;

pub use ade20k::{
    DatasetConfig, SegmentationItem, Split, WallSceneDataset, ADE20K_DIR, ADE20K_WALL_CLASS,
};
pub use batcher::{SegmentationBatch, SegmentationBatcher};
pub use error::{DatasetError, DatasetResult};
pub use scene::{SceneIndex, WALL_SCENES};
