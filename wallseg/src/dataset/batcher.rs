use std::marker::PhantomData;

use burn::{
    data::dataloader::batcher::Batcher,
    tensor::{backend::Backend, Int, Tensor, TensorData},
};

use super::SegmentationItem;

/// A batch of images and their per-pixel class masks.
#[derive(Debug, Clone)]
pub struct SegmentationBatch<B: Backend> {
    /// Images with shape `[B, 3, H, W]`.
    pub images: Tensor<B, 4>,
    /// Class indices with shape `[B, H, W]`.
    pub masks: Tensor<B, 3, Int>,
}

/// Batcher implementation for converting vectors of `SegmentationItem` into a
/// `SegmentationBatch`.
///
/// Items arrive as raw data; tensors are created here, on the device the data loader
/// asks for.
#[derive(Clone, Default)]
pub struct SegmentationBatcher<B: Backend> {
    _phantom: PhantomData<B>,
}

impl<B: Backend> SegmentationBatcher<B> {
    /// Create a new segmentation batcher.
    pub const fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<B: Backend> Batcher<B, SegmentationItem, SegmentationBatch<B>> for SegmentationBatcher<B> {
    fn batch(&self, items: Vec<SegmentationItem>, device: &B::Device) -> SegmentationBatch<B> {
        let mut images = Vec::with_capacity(items.len());
        let mut masks = Vec::with_capacity(items.len());

        for item in items {
            let image = Tensor::<B, 3>::from_data(
                TensorData::new(item.image, [item.height, item.width, 3]),
                device,
            )
            .permute([2, 0, 1]); // HWC to CHW

            let mask = Tensor::<B, 2, Int>::from_data(
                TensorData::new(item.mask, [item.height, item.width]),
                device,
            );

            images.push(image);
            masks.push(mask);
        }

        SegmentationBatch {
            images: Tensor::stack(images, 0),
            masks: Tensor::stack(masks, 0),
        }
    }
}
