//! Bounding-box outlines and labeled boxes.

use std::str::FromStr;

use imageproc::definitions::Image;
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use serde::{Deserialize, Serialize};

use super::text::{GlyphParams, GlyphRenderer, TextExtent};
use crate::color::{Color, PaintPixel};
use crate::error::RegionKitError;
use crate::geometry::{ensure_finite, saturate_i32, BBox, PixelSpan};

/// Vertical gap, in pixels, added under the label text inside its band.
pub const LABEL_BASELINE_GAP: u32 = 5;

/// Outline thickness and color for box drawing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxStyle {
    pub thickness: u32,
    pub color: Color,
}

impl Default for BoxStyle {
    fn default() -> Self {
        Self {
            thickness: 1,
            color: Color::RED,
        }
    }
}

/// Which side of a box its label goes on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextLocation {
    /// Label band sits on top of the box's top edge.
    #[default]
    Above,
    /// Label band hangs from the box's bottom edge.
    Below,
}

impl FromStr for TextLocation {
    type Err = RegionKitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" | "above" => Ok(TextLocation::Above),
            "down" | "below" => Ok(TextLocation::Below),
            other => Err(RegionKitError::UnknownVariant {
                kind: "text location",
                value: other.to_string(),
            }),
        }
    }
}

/// Font and placement settings for box labels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelStyle {
    pub font_scale: f32,
    pub font_thickness: u32,
    pub text_color: Color,
    pub location: TextLocation,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            font_scale: 0.5,
            font_thickness: 1,
            text_color: Color::WHITE,
            location: TextLocation::Above,
        }
    }
}

impl LabelStyle {
    pub fn glyph_params(&self) -> GlyphParams {
        GlyphParams {
            font_scale: self.font_scale,
            thickness: self.font_thickness,
        }
    }
}

/// A box with its class label and detection confidence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabeledBox {
    pub bbox: BBox,
    pub label: String,
    pub confidence: f64,
}

impl LabeledBox {
    pub fn new(bbox: BBox, label: impl Into<String>, confidence: f64) -> Self {
        Self {
            bbox,
            label: label.into(),
            confidence,
        }
    }

    /// The text drawn in the label band, e.g. `"person: 0.87"`.
    pub fn caption(&self) -> String {
        format!("{}: {:.2}", self.label, self.confidence)
    }

    /// Pairs parallel arrays of boxes, labels and confidences by index.
    ///
    /// # Errors
    ///
    /// Returns [`RegionKitError::LengthMismatch`] unless all three slices
    /// have the same length.
    pub fn zip<S: AsRef<str>>(
        boxes: &[BBox],
        labels: &[S],
        confidences: &[f64],
    ) -> Result<Vec<Self>, RegionKitError> {
        if boxes.len() != labels.len() || boxes.len() != confidences.len() {
            return Err(RegionKitError::LengthMismatch {
                boxes: boxes.len(),
                labels: labels.len(),
                confidences: confidences.len(),
            });
        }

        Ok(boxes
            .iter()
            .zip(labels)
            .zip(confidences)
            .map(|((bbox, label), confidence)| Self::new(*bbox, label.as_ref(), *confidence))
            .collect())
    }
}

/// Draws `thickness` nested one-pixel outlines centered on the span's edge.
///
/// An odd thickness spreads evenly to both sides. An even one puts the
/// extra ring outside, so thickness 2 covers the edge and the pixel just
/// outside it.
pub(crate) fn draw_outline_mut<P: PaintPixel>(
    image: &mut Image<P>,
    span: PixelSpan,
    thickness: u32,
    pixel: P,
) {
    let (width, height) = image.dimensions();
    let outer = i64::from(thickness / 2);
    for step in -outer..i64::from(thickness) - outer {
        let Some(ring) = span.inset(step) else {
            break;
        };
        if let Some(rect) = ring.outline_rect(width, height) {
            draw_hollow_rect_mut(image, rect, pixel);
        }
    }
}

/// Draws unfilled box outlines onto `image` in place.
///
/// Boxes that cover no pixels are skipped; boxes partly or fully outside the
/// image are clipped.
///
/// # Errors
///
/// Returns [`RegionKitError::InvalidRegion`] for a box with non-finite
/// coordinates. Nothing is drawn in that case.
pub fn draw_boxes_mut<P: PaintPixel>(
    image: &mut Image<P>,
    boxes: &[BBox],
    style: &BoxStyle,
) -> Result<(), RegionKitError> {
    ensure_finite(boxes)?;
    let pixel = P::from_color(style.color);
    for span in boxes.iter().filter_map(BBox::to_span) {
        draw_outline_mut(image, span, style.thickness, pixel);
    }
    Ok(())
}

/// Returns a copy of `image` with box outlines drawn on it.
pub fn draw_boxes<P: PaintPixel>(
    image: &Image<P>,
    boxes: &[BBox],
    style: &BoxStyle,
) -> Result<Image<P>, RegionKitError> {
    let mut out = image.clone();
    draw_boxes_mut(&mut out, boxes, style)?;
    Ok(out)
}

/// Where the label band for a box goes.
///
/// The band is as wide as the text and `LABEL_BASELINE_GAP` pixels taller.
/// Above the box its last row is the row just over the box's top edge;
/// below the box its first row is the row just under the bottom edge.
/// Returns `None` for empty text.
pub fn label_band(box_span: PixelSpan, text: TextExtent, location: TextLocation) -> Option<PixelSpan> {
    if text.width == 0 {
        return None;
    }
    let band_height = (text.height + LABEL_BASELINE_GAP) as i64;
    let x0 = box_span.x0;
    let x1 = x0 + text.width as i64 - 1;
    let (y0, y1) = match location {
        TextLocation::Above => (box_span.y0 - band_height, box_span.y0 - 1),
        TextLocation::Below => (box_span.y1 + 1, box_span.y1 + band_height),
    };
    Some(PixelSpan::from_corners((x0, y0), (x1, y1)))
}

/// Draws outlined boxes with a `"{label}: {confidence:.2}"` tag on each, in place.
///
/// Each tag sits on a filled band in the box's border color. The tag text
/// is drawn in the label style's text color at the band's top-left.
pub fn draw_annotated_boxes_mut<P, R>(
    image: &mut Image<P>,
    annotations: &[LabeledBox],
    renderer: &R,
    box_style: &BoxStyle,
    label_style: &LabelStyle,
) -> Result<(), RegionKitError>
where
    P: PaintPixel,
    R: GlyphRenderer,
{
    let boxes: Vec<BBox> = annotations.iter().map(|a| a.bbox).collect();
    ensure_finite(&boxes)?;

    let (width, height) = image.dimensions();
    let border = P::from_color(box_style.color);
    let params = label_style.glyph_params();

    for annotation in annotations {
        let Some(span) = annotation.bbox.to_span() else {
            continue;
        };
        draw_outline_mut(image, span, box_style.thickness, border);

        let caption = annotation.caption();
        let extent = renderer.measure(&caption, params);
        let Some(band) = label_band(span, extent, label_style.location) else {
            continue;
        };
        if let Some(rect) = band.clip(width, height) {
            draw_filled_rect_mut(image, rect, border);
        }
        renderer.draw(
            image,
            saturate_i32(band.x0),
            saturate_i32(band.y0),
            &caption,
            params,
            label_style.text_color,
        );
    }

    Ok(())
}

/// Returns a copy of `image` with labeled boxes drawn on it.
pub fn draw_annotated_boxes<P, R>(
    image: &Image<P>,
    annotations: &[LabeledBox],
    renderer: &R,
    box_style: &BoxStyle,
    label_style: &LabelStyle,
) -> Result<Image<P>, RegionKitError>
where
    P: PaintPixel,
    R: GlyphRenderer,
{
    let mut out = image.clone();
    draw_annotated_boxes_mut(&mut out, annotations, renderer, box_style, label_style)?;
    Ok(out)
}
