//! # Skip Connections
//!
//! Ordered storage for the encoder maps that the decoder fuses back in. Maps are
//! pushed shallowest first while encoding and popped deepest first while decoding,
//! so each map is handed over exactly once, to the stage that mirrors its producer.

use burn::prelude::*;

/// The pre-pooling encoder maps of a single forward pass, keyed by stage index.
#[derive(Debug, Clone)]
pub struct SkipConnections<B: Backend> {
    maps: Vec<Tensor<B, 4>>,
}

impl<B: Backend> SkipConnections<B> {
    /// Creates an empty container with room for `depth` maps.
    pub fn with_capacity(depth: usize) -> Self {
        Self {
            maps: Vec::with_capacity(depth),
        }
    }

    /// Records the map produced by the next encoder stage.
    pub fn push(&mut self, map: Tensor<B, 4>) {
        self.maps.push(map);
    }

    /// Hands over the most recently recorded map together with its stage index.
    pub fn pop(&mut self) -> Option<(usize, Tensor<B, 4>)> {
        let map = self.maps.pop()?;
        Some((self.maps.len(), map))
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    /// Shapes of the stored maps in encoder order.
    pub fn shapes(&self) -> Vec<[usize; 4]> {
        self.maps.iter().map(Tensor::dims).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn skip_connections_pop_in_reverse_creation_order() {
        let device = Default::default();
        let mut skips = SkipConnections::<TestBackend>::with_capacity(3);

        for (channels, size) in [(4, 32), (8, 16), (16, 8)] {
            skips.push(Tensor::zeros([1, channels, size, size], &device));
        }
        assert_eq!(skips.len(), 3);
        assert_eq!(
            skips.shapes(),
            vec![[1, 4, 32, 32], [1, 8, 16, 16], [1, 16, 8, 8]]
        );

        let order: Vec<_> = std::iter::from_fn(|| skips.pop())
            .map(|(index, map)| (index, map.dims()[1]))
            .collect();

        assert_eq!(order, vec![(2, 16), (1, 8), (0, 4)]);
        assert!(skips.is_empty());
        assert!(skips.pop().is_none());
    }
}
