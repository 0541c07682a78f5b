//! # Feature Schedule
//!
//! The ordered list of channel depths that determines how many stages the U-Net has
//! and how wide each stage is. Both halves of the network are derived from this one
//! list, so the stage descriptors it produces are the single source of truth for
//! layer construction.

use crate::error::{UNetError, UNetResult};

/// Channel plan for one encoder or decoder stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageDescriptor {
    /// Position of the stage in the schedule. A decoder stage shares the index of the
    /// encoder stage whose skip connection it consumes.
    pub index: usize,
    /// Channel depth entering the stage's `DoubleConv`.
    pub in_channels: usize,
    /// Channel depth leaving the stage (the schedule value).
    pub out_channels: usize,
}

/// A validated, non-empty sequence of positive channel depths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchedule {
    features: Vec<usize>,
}

impl FeatureSchedule {
    /// Validates `features` and wraps it.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the list is empty, contains a zero, or is so
    /// deep that `2^N` does not fit in a `usize`.
    pub fn new(features: Vec<usize>) -> UNetResult<Self> {
        if features.is_empty() {
            return Err(UNetError::InvalidConfiguration {
                reason: "Feature schedule must not be empty".to_string(),
            });
        }
        if let Some(position) = features.iter().position(|&f| f == 0) {
            return Err(UNetError::InvalidConfiguration {
                reason: format!("Feature schedule entry {position} must be positive"),
            });
        }
        if features.len() >= usize::BITS as usize {
            return Err(UNetError::InvalidConfiguration {
                reason: format!(
                    "Feature schedule has {} stages, at most {} are supported",
                    features.len(),
                    usize::BITS - 1
                ),
            });
        }
        if features.last().and_then(|last| last.checked_mul(2)).is_none() {
            return Err(UNetError::InvalidConfiguration {
                reason: "Bottleneck channel depth overflows".to_string(),
            });
        }

        Ok(Self { features })
    }

    /// Number of encoder (and decoder) stages, `N`.
    pub fn depth(&self) -> usize {
        self.features.len()
    }

    /// The raw channel depths, in encoder order.
    pub fn features(&self) -> &[usize] {
        &self.features
    }

    /// Channel depth of the first stage, which is also the decoder's final depth.
    pub fn first(&self) -> usize {
        self.features[0]
    }

    /// Channel depth of the deepest encoder stage.
    pub fn last(&self) -> usize {
        self.features[self.features.len() - 1]
    }

    /// Channel depth produced by the bottleneck.
    pub fn bottleneck_channels(&self) -> usize {
        self.last() * 2
    }

    /// Smallest height or width that survives `N` rounds of 2x2 pooling.
    pub fn min_input_size(&self) -> usize {
        1 << self.depth()
    }

    /// Encoder stages in execution order.
    pub fn encoder_stages(&self, in_channels: usize) -> Vec<StageDescriptor> {
        let mut current = in_channels;

        self.features
            .iter()
            .enumerate()
            .map(|(index, &feature)| {
                let stage = StageDescriptor {
                    index,
                    in_channels: current,
                    out_channels: feature,
                };
                current = feature;
                stage
            })
            .collect()
    }

    /// Decoder stages in execution order, deepest first.
    ///
    /// Each stage upsamples from `2 * feature` to `feature` channels, concatenates the
    /// skip connection (another `feature` channels) and fuses back to `feature`.
    pub fn decoder_stages(&self) -> Vec<StageDescriptor> {
        self.features
            .iter()
            .enumerate()
            .rev()
            .map(|(index, &feature)| StageDescriptor {
                index,
                in_channels: feature * 2,
                out_channels: feature,
            })
            .collect()
    }

    /// Spatial size of every skip connection for an input of `[height, width]`,
    /// in encoder order.
    ///
    /// Pooling floors odd sizes, which is exactly where the decoder's reconciliation
    /// step has work to do.
    pub fn skip_sizes(&self, height: usize, width: usize) -> Vec<[usize; 2]> {
        let mut size = [height, width];

        (0..self.depth())
            .map(|_| {
                let current = size;
                size = [size[0] / 2, size[1] / 2];
                current
            })
            .collect()
    }

    /// Spatial size at the bottleneck for an input of `[height, width]`.
    pub fn bottleneck_size(&self, height: usize, width: usize) -> [usize; 2] {
        [height >> self.depth(), width >> self.depth()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_schedule() -> FeatureSchedule {
        FeatureSchedule::new(vec![64, 128, 256, 512]).unwrap()
    }

    #[test]
    fn empty_schedule_is_rejected() {
        match FeatureSchedule::new(vec![]) {
            Err(UNetError::InvalidConfiguration { reason }) => {
                assert!(reason.contains("must not be empty"));
            }
            other => panic!("Expected InvalidConfiguration error, got {other:?}"),
        }
    }

    #[test]
    fn zero_entry_is_rejected() {
        match FeatureSchedule::new(vec![64, 0, 256]) {
            Err(UNetError::InvalidConfiguration { reason }) => {
                assert!(reason.contains("entry 1"));
            }
            other => panic!("Expected InvalidConfiguration error, got {other:?}"),
        }
    }

    #[test]
    fn bottleneck_doubles_last_entry() {
        let schedule = default_schedule();
        assert_eq!(schedule.depth(), 4);
        assert_eq!(schedule.first(), 64);
        assert_eq!(schedule.bottleneck_channels(), 1024);
    }

    #[test]
    fn min_input_size_is_two_to_the_depth() {
        assert_eq!(default_schedule().min_input_size(), 16);
        assert_eq!(FeatureSchedule::new(vec![8]).unwrap().min_input_size(), 2);
    }

    #[test]
    fn encoder_stages_chain_channel_depths() {
        let stages = default_schedule().encoder_stages(1);

        let channels: Vec<_> = stages
            .iter()
            .map(|s| (s.index, s.in_channels, s.out_channels))
            .collect();
        assert_eq!(
            channels,
            vec![(0, 1, 64), (1, 64, 128), (2, 128, 256), (3, 256, 512)]
        );
    }

    #[test]
    fn decoder_stages_mirror_encoder_in_reverse() {
        let stages = default_schedule().decoder_stages();

        let channels: Vec<_> = stages
            .iter()
            .map(|s| (s.index, s.in_channels, s.out_channels))
            .collect();
        assert_eq!(
            channels,
            vec![(3, 1024, 512), (2, 512, 256), (1, 256, 128), (0, 128, 64)]
        );
    }

    #[test]
    fn skip_sizes_floor_odd_dimensions() {
        let schedule = default_schedule();

        assert_eq!(
            schedule.skip_sizes(161, 161),
            vec![[161, 161], [80, 80], [40, 40], [20, 20]]
        );
        assert_eq!(schedule.bottleneck_size(161, 161), [10, 10]);
        assert_eq!(schedule.bottleneck_size(160, 96), [10, 6]);
    }
}
