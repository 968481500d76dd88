//! Text measurement and rendering.
//!
//! Placement logic only needs two things from a font: how big a string is
//! and a way to paint it. [`GlyphRenderer`] is that seam; [`FontRenderer`]
//! implements it over a TrueType/OpenType font via imageproc.

use std::fs;
use std::path::Path;

use ab_glyph::{point, Font, FontArc, GlyphId, PxScale, ScaleFont};
use imageproc::definitions::Image;
use imageproc::drawing::draw_text_mut;

use crate::color::{Color, PaintPixel};
use crate::error::RegionKitError;

/// Pixel height of text rendered at `font_scale == 1.0`.
pub const BASE_PIXEL_HEIGHT: f32 = 30.0;

/// Scale and stroke weight for one piece of text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphParams {
    pub font_scale: f32,
    pub thickness: u32,
}

/// Rendered size of a string, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextExtent {
    pub width: u32,
    pub height: u32,
}

/// Measures and paints text.
///
/// `draw` places the top-left corner of the text's extent at `(x, y)` and
/// must clip anything outside the image.
pub trait GlyphRenderer {
    fn measure(&self, text: &str, params: GlyphParams) -> TextExtent;

    fn draw<P: PaintPixel>(
        &self,
        image: &mut Image<P>,
        x: i32,
        y: i32,
        text: &str,
        params: GlyphParams,
        color: Color,
    );
}

/// A [`GlyphRenderer`] backed by an outline font.
///
/// The measured height is at least the font's line height (ascent to
/// descent), so strings at one scale share a height and descenders fit.
/// Thickness above 1 is emulated by over-striking the text at one-pixel
/// horizontal offsets, so each extra unit widens the text by one pixel.
#[derive(Clone)]
pub struct FontRenderer {
    font: FontArc,
}

impl FontRenderer {
    /// Loads a font from raw TTF/OTF bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, RegionKitError> {
        let font = FontArc::try_from_vec(bytes).map_err(|e| RegionKitError::Font(e.to_string()))?;
        Ok(Self { font })
    }

    /// Loads a font file from disk.
    pub fn from_file(path: &Path) -> Result<Self, RegionKitError> {
        let bytes = fs::read(path).map_err(RegionKitError::Io)?;
        let font = FontArc::try_from_vec(bytes)
            .map_err(|e| RegionKitError::Font(format!("{}: {}", path.display(), e)))?;
        Ok(Self { font })
    }

    fn px_scale(params: GlyphParams) -> PxScale {
        PxScale::from(params.font_scale * BASE_PIXEL_HEIGHT)
    }

    /// Pixel box painted by `draw_text_mut` for `text` drawn at `(0, 0)`,
    /// widened to cover the line height and the summed advance.
    fn ink_box(&self, text: &str, scale: PxScale) -> InkBox {
        let font = self.font.as_scaled(scale);
        let mut ink = InkBox {
            left: 0,
            top: 0,
            right: 0,
            bottom: (font.ascent() - font.descent()).ceil() as i32,
        };

        // Mirrors draw_text_mut's layout, including kerning being added
        // after the current glyph is positioned.
        let mut caret = 0f32;
        let mut last: Option<GlyphId> = None;
        for c in text.chars() {
            let id = font.glyph_id(c);
            let glyph = id.with_scale_and_position(scale, point(caret, font.ascent()));
            caret += font.h_advance(id);
            if let Some(outlined) = font.outline_glyph(glyph) {
                if let Some(last) = last {
                    caret += font.kern(id, last);
                }
                last = Some(id);
                let bounds = outlined.px_bounds();
                ink.left = ink.left.min(bounds.min.x.round() as i32);
                ink.top = ink.top.min(bounds.min.y.round() as i32);
                ink.right = ink.right.max(bounds.max.x.round() as i32);
                ink.bottom = ink.bottom.max(bounds.max.y.round() as i32);
            }
        }
        ink.right = ink.right.max(caret.ceil() as i32);
        ink
    }
}

/// Half-open pixel box; `left` and `top` are never positive.
#[derive(Clone, Copy, Debug)]
struct InkBox {
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
}

impl GlyphRenderer for FontRenderer {
    fn measure(&self, text: &str, params: GlyphParams) -> TextExtent {
        if text.is_empty() {
            return TextExtent::default();
        }
        let ink = self.ink_box(text, Self::px_scale(params));
        let extra = params.thickness.saturating_sub(1);
        TextExtent {
            width: (ink.right - ink.left).max(0) as u32 + extra,
            height: (ink.bottom - ink.top).max(0) as u32,
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
        if text.is_empty() {
            return;
        }
        let scale = Self::px_scale(params);
        let ink = self.ink_box(text, scale);
        let x = x.saturating_sub(ink.left);
        let y = y.saturating_sub(ink.top);
        let pixel = P::from_color(color);
        for dx in 0..params.thickness.max(1) as i32 {
            draw_text_mut(image, pixel, x.saturating_add(dx), y, scale, &self.font, text);
        }
    }
}
