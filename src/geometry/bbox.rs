//! Rectangle type in XYXY image coordinates.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::span::PixelSpan;

/// An axis-aligned rectangle given by two corners (x1, y1) and (x2, y2).
///
/// Note: the corners are NOT required to be ordered. A box with x1 > x2 is
/// still a valid input to every drawing operation, which normalizes it when
/// converting to a [`PixelSpan`]. Validation can report such boxes as
/// warnings without refusing them.
#[derive(Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BBox {
    #[serde(rename = "xmin")]
    pub x1: f64,
    #[serde(rename = "ymin")]
    pub y1: f64,
    #[serde(rename = "xmax")]
    pub x2: f64,
    #[serde(rename = "ymax")]
    pub y2: f64,
}

impl BBox {
    /// Creates a new box from explicit corner coordinates.
    #[inline]
    pub fn from_xyxy(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Converts from XYWH format (x, y, width, height) where (x, y) is the top-left corner.
    #[inline]
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::from_xyxy(x, y, x + width, y + height)
    }

    /// Returns the width of the box.
    ///
    /// May be negative if the corners are swapped.
    #[inline]
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    /// Returns the height of the box.
    ///
    /// May be negative if the corners are swapped.
    #[inline]
    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// Returns the signed area of the box.
    #[inline]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Returns true if all coordinates are finite (not NaN or infinite).
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x1.is_finite() && self.y1.is_finite() && self.x2.is_finite() && self.y2.is_finite()
    }

    /// Returns true if the corners are ordered (x1 <= x2 and y1 <= y2).
    #[inline]
    pub fn is_ordered(&self) -> bool {
        self.x1 <= self.x2 && self.y1 <= self.y2
    }

    /// Casts the corners to integers and normalizes their order.
    ///
    /// Coordinates are truncated toward zero, the same way an integer cast
    /// of each coordinate would behave. Returns `None` when the integer box
    /// has zero width or zero height, since it covers no pixels. Callers
    /// should check [`is_finite`](Self::is_finite) first; non-finite values
    /// saturate.
    pub fn to_span(&self) -> Option<PixelSpan> {
        let (x1, y1) = (self.x1 as i64, self.y1 as i64);
        let (x2, y2) = (self.x2 as i64, self.y2 as i64);
        if x1 == x2 || y1 == y2 {
            return None;
        }
        Some(PixelSpan::from_corners((x1, y1), (x2, y2)))
    }
}

impl std::fmt::Debug for BBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BBox")
            .field("x1", &self.x1)
            .field("y1", &self.y1)
            .field("x2", &self.x2)
            .field("y2", &self.y2)
            .finish()
    }
}

impl From<[f64; 4]> for BBox {
    fn from(c: [f64; 4]) -> Self {
        Self::from_xyxy(c[0], c[1], c[2], c[3])
    }
}

impl From<[i32; 4]> for BBox {
    fn from(c: [i32; 4]) -> Self {
        Self::from_xyxy(c[0] as f64, c[1] as f64, c[2] as f64, c[3] as f64)
    }
}

/// Parses `"x1,y1,x2,y2"`.
impl FromStr for BBox {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(format!(
                "expected 4 comma-separated numbers (x1,y1,x2,y2), got {}",
                parts.len()
            ));
        }

        let mut coords = [0.0f64; 4];
        for (slot, part) in coords.iter_mut().zip(&parts) {
            *slot = part
                .parse::<f64>()
                .map_err(|e| format!("invalid coordinate '{part}': {e}"))?;
        }
        Ok(BBox::from(coords))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_from_xyxy() {
        let bbox = BBox::from_xyxy(10.0, 20.0, 100.0, 80.0);
        assert_eq!(bbox.x1, 10.0);
        assert_eq!(bbox.y1, 20.0);
        assert_eq!(bbox.x2, 100.0);
        assert_eq!(bbox.y2, 80.0);
    }

    #[test]
    fn test_bbox_from_xywh() {
        let bbox = BBox::from_xywh(10.0, 20.0, 90.0, 60.0);
        assert_eq!(bbox, BBox::from_xyxy(10.0, 20.0, 100.0, 80.0));
    }

    #[test]
    fn test_bbox_dimensions() {
        let bbox = BBox::from_xyxy(10.0, 20.0, 100.0, 80.0);
        assert_eq!(bbox.width(), 90.0);
        assert_eq!(bbox.height(), 60.0);
        assert_eq!(bbox.area(), 5400.0);
    }

    #[test]
    fn test_bbox_ordering() {
        assert!(BBox::from_xyxy(10.0, 20.0, 100.0, 80.0).is_ordered());
        assert!(!BBox::from_xyxy(100.0, 80.0, 10.0, 20.0).is_ordered());
    }

    #[test]
    fn test_span_truncates_and_normalizes() {
        let span = BBox::from_xyxy(20.9, 20.2, 10.7, 10.0).to_span();
        assert_eq!(span, Some(PixelSpan::from_corners((10, 10), (20, 20))));
    }

    #[test]
    fn test_zero_area_has_no_span() {
        assert_eq!(BBox::from_xyxy(0.0, 0.0, 0.0, 0.0).to_span(), None);
        assert_eq!(BBox::from_xyxy(5.0, 1.0, 5.9, 30.0).to_span(), None);
    }

    #[test]
    fn test_parse_from_str() {
        let bbox: BBox = "10, 20,30.5,40".parse().unwrap();
        assert_eq!(bbox, BBox::from_xyxy(10.0, 20.0, 30.5, 40.0));
        assert!("1,2,3".parse::<BBox>().is_err());
        assert!("1,2,3,x".parse::<BBox>().is_err());
    }

    #[test]
    fn test_serde_uses_min_max_names() {
        let bbox: BBox =
            serde_json::from_str(r#"{"xmin":1,"ymin":2,"xmax":3,"ymax":4}"#).unwrap();
        assert_eq!(bbox, BBox::from_xyxy(1.0, 2.0, 3.0, 4.0));
    }
}
