//! Shared helpers for unit tests.

use image::{Luma, Rgb};
use imageproc::definitions::Image;
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

use crate::annotate::{GlyphParams, GlyphRenderer, TextExtent};
use crate::color::{Color, PaintPixel};

/// Fixed-metric "font": every character is an `advance` x `height` block.
///
/// Drawing fills the whole measured extent, which makes text placement
/// visible pixel for pixel.
pub struct BlockGlyphs {
    pub advance: u32,
    pub height: u32,
}

impl BlockGlyphs {
    pub fn new(advance: u32, height: u32) -> Self {
        Self { advance, height }
    }
}

impl GlyphRenderer for BlockGlyphs {
    fn measure(&self, text: &str, params: GlyphParams) -> TextExtent {
        let chars = text.chars().count() as u32;
        if chars == 0 {
            return TextExtent::default();
        }
        TextExtent {
            width: chars * self.advance + params.thickness.saturating_sub(1),
            height: self.height,
        }
    }

    fn draw<P: PaintPixel>(
        &self,
        image: &mut Image<P>,
        x: i32,
        y: i32,
        text: &str,
        params: GlyphParams,
        color: Color,
    ) {
        let extent = self.measure(text, params);
        if extent.width == 0 || extent.height == 0 {
            return;
        }
        draw_filled_rect_mut(
            image,
            Rect::at(x, y).of_size(extent.width, extent.height),
            P::from_color(color),
        );
    }
}

/// A `width` x `height` 3-channel image filled with `value`.
pub fn solid_rgb(width: u32, height: u32, value: [u8; 3]) -> Image<Rgb<u8>> {
    Image::from_pixel(width, height, Rgb(value))
}

/// A 3-channel image with a distinct value at every pixel.
pub fn gradient_rgb(width: u32, height: u32) -> Image<Rgb<u8>> {
    Image::from_fn(width, height, |x, y| {
        Rgb([(x * 7 % 256) as u8, (y * 5 % 256) as u8, ((x + y) * 3 % 256) as u8])
    })
}

/// A 1-channel image with a distinct value at every pixel.
pub fn gradient_gray(width: u32, height: u32) -> Image<Luma<u8>> {
    Image::from_fn(width, height, |x, y| Luma([((x * 11 + y * 3) % 256) as u8]))
}
