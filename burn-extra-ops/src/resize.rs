//! # Spatial Reconciliation
//!
//! Helpers for forcing one feature map onto the spatial grid of another, as needed
//! when an upsampled map comes back one pixel short of the skip connection it is
//! about to be concatenated with.

use burn::{
    prelude::*,
    tensor::{
        module::interpolate,
        ops::{InterpolateMode, InterpolateOptions},
    },
};

/// Decides whether a map of size `source` must be resized to line up with `target`.
///
/// Both arguments are `[height, width]`. Returns the size to resize to, or `None`
/// when the sizes already agree.
pub const fn reconcile_size(source: [usize; 2], target: [usize; 2]) -> Option<[usize; 2]> {
    if source[0] == target[0] && source[1] == target[1] {
        None
    } else {
        Some(target)
    }
}

/// Resizes the height and width of `x` to exactly `target`.
///
/// Batch and channel axes are preserved. Tensors already at the target size are
/// returned as-is, so the common case costs nothing.
pub fn resize_to_match<B: Backend>(
    x: Tensor<B, 4>,
    target: [usize; 2],
    mode: InterpolateMode,
) -> Tensor<B, 4> {
    let [_, _, h, w] = x.dims();

    match reconcile_size([h, w], target) {
        Some(size) => interpolate(x, size, InterpolateOptions::new(mode)),
        None => x,
    }
}
