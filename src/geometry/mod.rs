//! Rectangles in image pixel coordinates.
//!
//! [`BBox`] is what callers hand in: four floating-point numbers, corners in
//! any order, no clamping. [`PixelSpan`] is what the drawing code works with:
//! the same box cast to integers, ordered, inclusive on both ends.

mod bbox;
mod span;

pub use bbox::BBox;
pub use span::PixelSpan;

use crate::error::RegionKitError;

/// Rejects the first region with a NaN or infinite coordinate.
///
/// Every drawing entry point calls this before casting coordinates.
pub fn ensure_finite(regions: &[BBox]) -> Result<(), RegionKitError> {
    match regions.iter().position(|bbox| !bbox.is_finite()) {
        Some(index) => Err(RegionKitError::InvalidRegion {
            index,
            message: format!("non-finite coordinates {:?}", regions[index]),
        }),
        None => Ok(()),
    }
}

/// Saturating conversion for drawing coordinates.
pub(crate) fn saturate_i32(value: i64) -> i32 {
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}
