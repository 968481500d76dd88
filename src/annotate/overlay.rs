//! Corner-anchored stacks of text lines.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use image::RgbImage;
use serde::{Deserialize, Serialize};

use super::text::{GlyphParams, GlyphRenderer, TextExtent};
use crate::color::{swap_red_blue_mut, Color};
use crate::error::RegionKitError;
use crate::frame_io::save_image;

/// Horizontal inset of every line from the left or right image edge.
pub const LINE_INSET: i32 = 10;

/// The image corner a text stack is anchored to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Corner {
    #[default]
    UpperLeft,
    UpperRight,
    LowerLeft,
    LowerRight,
}

impl Corner {
    pub fn is_upper(self) -> bool {
        matches!(self, Corner::UpperLeft | Corner::UpperRight)
    }

    pub fn is_left(self) -> bool {
        matches!(self, Corner::UpperLeft | Corner::LowerLeft)
    }
}

impl FromStr for Corner {
    type Err = RegionKitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.replace('-', "_").as_str() {
            "upper_left" => Ok(Corner::UpperLeft),
            "upper_right" => Ok(Corner::UpperRight),
            "lower_left" => Ok(Corner::LowerLeft),
            "lower_right" => Ok(Corner::LowerRight),
            _ => Err(RegionKitError::UnknownVariant {
                kind: "corner",
                value: s.to_string(),
            }),
        }
    }
}

/// Font, color and spacing for overlay text.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayStyle {
    pub font_scale: f32,
    pub color: Color,
    pub line_spacing: u32,
    pub thickness: u32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self::with_font_scale(1.0)
    }
}

impl OverlayStyle {
    /// Default style at the given scale; thickness follows the scale, minimum 2.
    pub fn with_font_scale(font_scale: f32) -> Self {
        Self {
            font_scale,
            color: Color::NEON_GREEN,
            line_spacing: 10,
            thickness: (font_scale as u32).max(2),
        }
    }

    pub fn glyph_params(&self) -> GlyphParams {
        GlyphParams {
            font_scale: self.font_scale,
            thickness: self.thickness,
        }
    }
}

/// Where one line of the stack is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinePlacement {
    /// Left edge of the text.
    pub x: i32,
    /// Bottom of the text; the line's top is `baseline - extent.height`.
    pub baseline: i32,
    pub extent: TextExtent,
}

impl LinePlacement {
    pub fn top(&self) -> i32 {
        self.baseline - self.extent.height as i32
    }
}

/// Placement of a whole text stack.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OverlayLayout {
    pub lines: Vec<LinePlacement>,
    /// Sum of `line_height + line_spacing` over all lines.
    pub total_height: u32,
    /// Widest line. Reported for callers; placement does not use it.
    pub max_width: u32,
}

/// Computes line positions for a stack of text anchored at `corner`.
///
/// Upper stacks start at y = 0, lower stacks at
/// `image_height - total_height`. Before each line is placed, the cursor
/// advances by that line's height plus the spacing, so the first baseline
/// sits one line below the start. Left stacks are inset by [`LINE_INSET`];
/// right stacks align each line on its own width.
pub fn layout_lines<R, S>(
    renderer: &R,
    lines: &[S],
    image_width: u32,
    image_height: u32,
    corner: Corner,
    style: &OverlayStyle,
) -> OverlayLayout
where
    R: GlyphRenderer,
    S: AsRef<str>,
{
    let params = style.glyph_params();
    let extents: Vec<TextExtent> = lines
        .iter()
        .map(|line| renderer.measure(line.as_ref(), params))
        .collect();

    let total_height: u32 = extents.iter().map(|e| e.height + style.line_spacing).sum();
    let max_width = extents.iter().map(|e| e.width).max().unwrap_or(0);

    let mut cursor: i32 = if corner.is_upper() {
        0
    } else {
        image_height as i32 - total_height as i32
    };

    let placements = extents
        .into_iter()
        .map(|extent| {
            let x = if corner.is_left() {
                LINE_INSET
            } else {
                image_width as i32 - extent.width as i32 - LINE_INSET
            };
            cursor += (extent.height + style.line_spacing) as i32;
            LinePlacement {
                x,
                baseline: cursor,
                extent,
            }
        })
        .collect();

    OverlayLayout {
        lines: placements,
        total_height,
        max_width,
    }
}

/// Draws `lines` at `corner` in place, then converts `image` to display order.
///
/// `image` is expected in drawing (blue, green, red) order; on return it is
/// in RGB order.
pub fn overlay_text_mut<R, S>(
    image: &mut RgbImage,
    lines: &[S],
    corner: Corner,
    renderer: &R,
    style: &OverlayStyle,
) -> OverlayLayout
where
    R: GlyphRenderer,
    S: AsRef<str>,
{
    let (width, height) = image.dimensions();
    let layout = layout_lines(renderer, lines, width, height, corner, style);
    let params = style.glyph_params();

    for (line, placement) in lines.iter().zip(&layout.lines) {
        renderer.draw(
            image,
            placement.x,
            placement.top(),
            line.as_ref(),
            params,
            style.color,
        );
    }

    swap_red_blue_mut(image);
    layout
}

/// Returns a display-order copy of `image` with `lines` drawn at `corner`.
pub fn overlay_text<R, S>(
    image: &RgbImage,
    lines: &[S],
    corner: Corner,
    renderer: &R,
    style: &OverlayStyle,
) -> RgbImage
where
    R: GlyphRenderer,
    S: AsRef<str>,
{
    let mut out = image.clone();
    overlay_text_mut(&mut out, lines, corner, renderer, style);
    out
}

/// Like [`overlay_text`], and also saves the display-order result.
///
/// Returns the image together with the path actually written, which
/// differs from `path` when `auto_index` is set.
pub fn overlay_text_to_file<R, S>(
    image: &RgbImage,
    lines: &[S],
    corner: Corner,
    renderer: &R,
    style: &OverlayStyle,
    path: &Path,
    auto_index: bool,
) -> Result<(RgbImage, PathBuf), RegionKitError>
where
    R: GlyphRenderer,
    S: AsRef<str>,
{
    let out = overlay_text(image, lines, corner, renderer, style);
    let written = save_image(&out, path, auto_index)?;
    Ok((out, written))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{solid_rgb, BlockGlyphs};
    use image::Rgb;

    fn thin_style() -> OverlayStyle {
        OverlayStyle {
            thickness: 1,
            ..OverlayStyle::default()
        }
    }

    #[test]
    fn upper_left_starts_one_line_down() {
        let glyphs = BlockGlyphs::new(6, 10);
        let layout = layout_lines(&glyphs, &["ab", "abcd"], 200, 100, Corner::UpperLeft, &thin_style());

        assert_eq!(layout.total_height, 40);
        assert_eq!(layout.lines[0].x, 10);
        assert_eq!(layout.lines[0].baseline, 20);
        assert_eq!(layout.lines[0].top(), 10);
        assert_eq!(layout.lines[1].baseline, 40);
    }

    #[test]
    fn lower_right_aligns_each_line_on_its_own_width() {
        let glyphs = BlockGlyphs::new(6, 10);
        let layout = layout_lines(&glyphs, &["ab", "abcd"], 200, 100, Corner::LowerRight, &thin_style());

        assert_eq!(layout.lines[0].x, 200 - 12 - 10);
        assert_eq!(layout.lines[1].x, 200 - 24 - 10);
        assert_eq!(layout.lines[0].baseline, 80);
        assert_eq!(layout.lines[1].baseline, 100);
    }

    #[test]
    fn max_width_is_reported_but_not_used_for_placement() {
        let glyphs = BlockGlyphs::new(6, 10);
        let layout = layout_lines(&glyphs, &["a", "abcdef"], 200, 100, Corner::UpperRight, &thin_style());
        assert_eq!(layout.max_width, 36);
        assert_eq!(layout.lines[0].x, 200 - 6 - 10);
    }

    #[test]
    fn lower_left_uses_image_height() {
        let glyphs = BlockGlyphs::new(6, 10);
        let layout = layout_lines(&glyphs, &["x"], 50, 30, Corner::LowerLeft, &thin_style());
        // start at 30 - 20 = 10, first baseline at 30
        assert_eq!(layout.lines[0].baseline, 30);
        assert_eq!(layout.lines[0].x, 10);
    }

    #[test]
    fn overlay_draws_and_returns_display_order() {
        let glyphs = BlockGlyphs::new(6, 10);
        // drawing-order blue-ish background: B=200, G=0, R=0
        let image = solid_rgb(100, 60, [200, 0, 0]);
        let out = overlay_text(&image, &["hi"], Corner::UpperLeft, &glyphs, &thin_style());

        // text block at x 10..=21, rows 10..=19, neon green in display order
        assert_eq!(out.get_pixel(10, 10), &Rgb([20, 255, 57]));
        assert_eq!(out.get_pixel(21, 19), &Rgb([20, 255, 57]));
        // untouched background is swapped to RGB
        assert_eq!(out.get_pixel(50, 50), &Rgb([0, 0, 200]));
        // caller's buffer is not modified by the copying form
        assert_eq!(image.get_pixel(10, 10), &Rgb([200, 0, 0]));
    }

    #[test]
    fn overlay_to_file_auto_indexes() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("annotated.png");
        let glyphs = BlockGlyphs::new(6, 10);
        let image = solid_rgb(40, 40, [0, 0, 0]);

        let (_, first) =
            overlay_text_to_file(&image, &["a"], Corner::UpperLeft, &glyphs, &thin_style(), &path, true)
                .unwrap();
        assert_eq!(first, dir.path().join("annotated_0.png"));
        let (_, second) =
            overlay_text_to_file(&image, &["a"], Corner::UpperLeft, &glyphs, &thin_style(), &path, true)
                .unwrap();
        assert_eq!(second, dir.path().join("annotated_1.png"));
    }

    #[test]
    fn corner_parsing() {
        assert_eq!("upper_left".parse::<Corner>().unwrap(), Corner::UpperLeft);
        assert_eq!("lower-right".parse::<Corner>().unwrap(), Corner::LowerRight);
        assert!("middle".parse::<Corner>().is_err());
    }

    #[test]
    fn default_thickness_follows_scale() {
        assert_eq!(OverlayStyle::with_font_scale(1.0).thickness, 2);
        assert_eq!(OverlayStyle::with_font_scale(3.5).thickness, 3);
    }
}
