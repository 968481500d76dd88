//! Region filter: black out or blur rectangular regions of an image.
//!
//! The filter never patches regions one by one. It builds a full-size
//! replacement image (all black, or the whole image blurred), a full-size
//! binary mask of the union of all regions, and then takes each output pixel
//! from the replacement where the mask is set and from the source
//! elsewhere. Overlapping regions therefore need no special handling, and
//! there is no blending at region edges.
//!
//! # Example
//!
//! ```
//! use image::Rgb;
//! use imageproc::definitions::Image;
//! use regionkit::filter::{filter_regions, FilterOptions};
//! use regionkit::geometry::BBox;
//!
//! let image: Image<Rgb<u8>> = Image::from_pixel(100, 100, Rgb([255, 255, 255]));
//! let out = filter_regions(
//!     &image,
//!     &[BBox::from_xyxy(10.0, 10.0, 20.0, 20.0)],
//!     &FilterOptions::default(),
//! )
//! .unwrap();
//! assert_eq!(out.get_pixel(15, 15), &Rgb([0, 0, 0]));
//! assert_eq!(out.get_pixel(21, 15), &Rgb([255, 255, 255]));
//! ```

mod blur;
mod mask;

pub use blur::{
    effective_kernel_size, gaussian_blur, gaussian_kernel, sigma_for_kernel, DEFAULT_BLUR_RADIUS,
};
pub use mask::{build_mask, MASK_ON};

use std::fmt;
use std::str::FromStr;

use imageproc::definitions::Image;
use serde::{Deserialize, Serialize};

use crate::annotate::{draw_boxes_mut, BoxStyle};
use crate::color::{Color, PaintPixel};
use crate::error::RegionKitError;
use crate::geometry::{ensure_finite, BBox};

/// What filtered regions are replaced with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    /// Solid zero in every channel.
    #[default]
    Black,
    /// The matching pixels of a Gaussian-blurred copy of the image.
    Blur,
}

impl FromStr for FilterMode {
    type Err = RegionKitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "black" => Ok(FilterMode::Black),
            "blur" => Ok(FilterMode::Blur),
            other => Err(RegionKitError::UnknownVariant {
                kind: "filter mode",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterMode::Black => write!(f, "black"),
            FilterMode::Blur => write!(f, "blur"),
        }
    }
}

/// Options for [`filter_regions`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterOptions {
    pub mode: FilterMode,
    /// Blur kernel size; even values are rounded up to odd. Ignored in black mode.
    pub blur_radius: u32,
    /// Outline thickness drawn around each region afterwards; 0 draws none.
    pub border_thickness: u32,
    pub border_color: Color,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            mode: FilterMode::Black,
            blur_radius: DEFAULT_BLUR_RADIUS,
            border_thickness: 0,
            border_color: Color::RED,
        }
    }
}

impl FilterOptions {
    /// Black out regions, no border.
    pub fn black() -> Self {
        Self::default()
    }

    /// Blur regions with the given kernel size, no border.
    pub fn blur(radius: u32) -> Self {
        Self {
            mode: FilterMode::Blur,
            blur_radius: radius,
            ..Self::default()
        }
    }

    /// Adds an outline of `thickness` pixels in `color` around each region.
    pub fn with_border(mut self, thickness: u32, color: Color) -> Self {
        self.border_thickness = thickness;
        self.border_color = color;
        self
    }
}

/// Builds the full-size image whose pixels replace the masked ones.
///
/// Same dimensions and pixel type as `image`: a 1-channel source gives a
/// 1-channel replacement.
pub fn replacement_image<P: PaintPixel>(image: &Image<P>, options: &FilterOptions) -> Image<P> {
    match options.mode {
        FilterMode::Black => Image::new(image.width(), image.height()),
        FilterMode::Blur => gaussian_blur(image, effective_kernel_size(options.blur_radius)),
    }
}

/// Replaces the pixels inside `regions` with black or blurred pixels.
///
/// Regions may overlap, be given in any corner order, or extend past the
/// image (they are clipped); zero-area regions change nothing. When
/// `options.border_thickness > 0`, region outlines are drawn over the result
/// in `options.border_color`.
///
/// # Errors
///
/// Returns [`RegionKitError::InvalidRegion`] if any region has a non-finite
/// coordinate.
pub fn filter_regions<P: PaintPixel>(
    image: &Image<P>,
    regions: &[BBox],
    options: &FilterOptions,
) -> Result<Image<P>, RegionKitError> {
    ensure_finite(regions)?;

    let replacement = replacement_image(image, options);
    let mask = build_mask(image.width(), image.height(), regions)?;
    let mut out = mask::select_by_mask(image, &replacement, &mask);

    if options.border_thickness > 0 {
        let style = BoxStyle {
            thickness: options.border_thickness,
            color: options.border_color,
        };
        draw_boxes_mut(&mut out, regions, &style)?;
    }

    Ok(out)
}
