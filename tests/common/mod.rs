#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use imageproc::definitions::Image;
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use regionkit::annotate::{GlyphParams, GlyphRenderer, TextExtent};
use regionkit::color::{Color, PaintPixel};

/// DejaVu Sans, checked in under `tests/fixtures` with its license.
pub fn fixture_font() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("DejaVuSans.ttf")
}

/// Glyph renderer with fixed metrics that paints each string as one block.
pub struct BlockGlyphs {
    pub advance: u32,
    pub height: u32,
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
        if extent.width > 0 {
            draw_filled_rect_mut(
                image,
                Rect::at(x, y).of_size(extent.width, extent.height),
                P::from_color(color),
            );
        }
    }
}

pub fn write_solid_png(path: &Path, width: u32, height: u32, rgb: [u8; 3]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    RgbImage::from_pixel(width, height, Rgb(rgb))
        .save(path)
        .expect("write png file");
}

/// Writes `count` solid frames named `frame{i}.png`, with frame `i` having
/// value `i * 20` in every channel.
pub fn write_frame_dir(dir: &Path, count: u32, width: u32, height: u32) {
    for i in 0..count {
        let value = (i * 20) as u8;
        write_solid_png(&dir.join(format!("frame{i}.png")), width, height, [value; 3]);
    }
}
