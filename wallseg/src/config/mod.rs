//! Configuration module for the wall segmentation U-Net.
//!
//! - `model`: the serializable model configuration
//! - `enums`: enumeration types used in configurations
//! - `schedule`: the validated feature schedule and the stage plan derived from it

pub mod enums;
pub mod model;
pub mod schedule;

pub use enums::InterpolationStrategy;
pub use model::ModelConfig;
pub use schedule::{FeatureSchedule, StageDescriptor};
