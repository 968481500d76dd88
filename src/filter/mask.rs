//! Binary region masks.

use image::{GrayImage, Luma};
use imageproc::definitions::Image;
use imageproc::drawing::draw_filled_rect_mut;
use log::debug;

use crate::color::PaintPixel;
use crate::error::RegionKitError;
use crate::geometry::{ensure_finite, BBox};

/// Mask value for pixels inside a region.
pub const MASK_ON: u8 = 255;

/// Builds a `width` x `height` mask that is 255 inside the union of
/// `regions` and 0 elsewhere.
///
/// Regions are filled one after another, so overlaps simply fill again;
/// a later region never clears an earlier one.
pub fn build_mask(width: u32, height: u32, regions: &[BBox]) -> Result<GrayImage, RegionKitError> {
    ensure_finite(regions)?;

    let mut mask = GrayImage::new(width, height);
    let mut filled = 0usize;
    for span in regions.iter().filter_map(BBox::to_span) {
        if let Some(rect) = span.clip(width, height) {
            draw_filled_rect_mut(&mut mask, rect, Luma([MASK_ON]));
            filled += 1;
        }
    }
    debug!(
        "built {}x{} mask from {} region(s), {} inside the image",
        width,
        height,
        regions.len(),
        filled
    );

    Ok(mask)
}

/// Per-pixel select: `replacement` where `mask` is nonzero, `source` elsewhere.
///
/// The single mask channel applies to every channel of the pixel, so a pixel
/// is either copied whole from `source` or whole from `replacement`.
pub(crate) fn select_by_mask<P: PaintPixel>(
    source: &Image<P>,
    replacement: &Image<P>,
    mask: &GrayImage,
) -> Image<P> {
    debug_assert_eq!(source.dimensions(), replacement.dimensions());
    debug_assert_eq!(source.dimensions(), mask.dimensions());

    let mut out = source.clone();
    for ((dst, repl), m) in out.pixels_mut().zip(replacement.pixels()).zip(mask.pixels()) {
        if m.0[0] != 0 {
            *dst = *repl;
        }
    }
    out
}
