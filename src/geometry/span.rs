//! Inclusive integer pixel spans and their clipping to an image.

use imageproc::rect::Rect;

/// An inclusive integer rectangle: covers columns `x0..=x1` and rows `y0..=y1`.
///
/// Always ordered (`x0 <= x1`, `y0 <= y1`). May extend beyond the image; use
/// [`clip`](Self::clip) before filling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PixelSpan {
    pub x0: i64,
    pub y0: i64,
    pub x1: i64,
    pub y1: i64,
}

impl PixelSpan {
    /// Builds a span from two corners given in any order.
    pub fn from_corners(a: (i64, i64), b: (i64, i64)) -> Self {
        Self {
            x0: a.0.min(b.0),
            y0: a.1.min(b.1),
            x1: a.0.max(b.0),
            y1: a.1.max(b.1),
        }
    }

    /// Number of columns covered.
    #[inline]
    pub fn width(&self) -> i64 {
        self.x1.saturating_sub(self.x0).saturating_add(1)
    }

    /// Number of rows covered.
    #[inline]
    pub fn height(&self) -> i64 {
        self.y1.saturating_sub(self.y0).saturating_add(1)
    }

    /// Shrinks the span by `by` pixels on every side.
    ///
    /// Returns `None` once nothing is left.
    pub fn inset(&self, by: i64) -> Option<Self> {
        let inner = Self {
            x0: self.x0.saturating_add(by),
            y0: self.y0.saturating_add(by),
            x1: self.x1.saturating_sub(by),
            y1: self.y1.saturating_sub(by),
        };
        (inner.x0 <= inner.x1 && inner.y0 <= inner.y1).then_some(inner)
    }

    /// Intersects the span with a `width` x `height` image.
    ///
    /// Returns `None` when the span lies entirely outside the image.
    pub fn clip(&self, width: u32, height: u32) -> Option<Rect> {
        let x0 = self.x0.max(0);
        let y0 = self.y0.max(0);
        let x1 = self.x1.min(width as i64 - 1);
        let y1 = self.y1.min(height as i64 - 1);
        if x0 > x1 || y0 > y1 {
            return None;
        }
        Some(Rect::at(x0 as i32, y0 as i32).of_size((x1 - x0 + 1) as u32, (y1 - y0 + 1) as u32))
    }

    /// Clamps the span to one pixel beyond each image edge.
    ///
    /// Edges that fall outside the image stay outside, so an outline drawn
    /// from the result matches an outline drawn from the original span while
    /// keeping every coordinate within `i32`.
    pub fn outline_rect(&self, width: u32, height: u32) -> Option<Rect> {
        let (w, h) = (width as i64, height as i64);
        let x0 = self.x0.clamp(-1, w);
        let y0 = self.y0.clamp(-1, h);
        let x1 = self.x1.clamp(-1, w);
        let y1 = self.y1.clamp(-1, h);
        if (x0 == x1 && (x0 < 0 || x0 >= w)) || (y0 == y1 && (y0 < 0 || y0 >= h)) {
            return None;
        }
        Some(Rect::at(x0 as i32, y0 as i32).of_size((x1 - x0 + 1) as u32, (y1 - y0 + 1) as u32))
    }
}
