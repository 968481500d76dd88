//! Hex color decoding and channel-order helpers.
//!
//! Colors are kept in drawing order: a 3-channel buffer handed to the
//! annotators stores blue, green, red. [`swap_red_blue`] converts a buffer
//! between drawing order and display (RGB) order.

use std::fmt;
use std::str::FromStr;

use image::{Luma, Pixel, Rgb, RgbImage};
use serde::{Deserialize, Serialize};

use crate::error::RegionKitError;

/// A 3-channel color in drawing (blue, green, red) order.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub [u8; 3]);

impl Color {
    /// Pure red, `#FF0000`.
    pub const RED: Color = Color([0, 0, 255]);
    /// Pure white, `#FFFFFF`.
    pub const WHITE: Color = Color([255, 255, 255]);
    /// Neon green, `#14FF39`.
    pub const NEON_GREEN: Color = Color([57, 255, 20]);

    /// Creates a color from its three drawing-order components.
    #[inline]
    pub const fn new(c0: u8, c1: u8, c2: u8) -> Self {
        Self([c0, c1, c2])
    }

    /// Decodes a hex string such as `#FF0000` or `00ff00`.
    pub fn from_hex(hex: &str) -> Result<Self, RegionKitError> {
        let (c0, c1, c2) = hex_to_color(hex)?;
        Ok(Self::new(c0, c1, c2))
    }

    /// Encodes the color back to a `#RRGGBB` string.
    pub fn to_hex(&self) -> String {
        let [b, g, r] = self.0;
        format!("#{r:02X}{g:02X}{b:02X}")
    }

    /// Returns the components as a tuple, in drawing order.
    #[inline]
    pub fn channels(&self) -> (u8, u8, u8) {
        (self.0[0], self.0[1], self.0[2])
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color({})", self.to_hex())
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::RED
    }
}

impl FromStr for Color {
    type Err = RegionKitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

// Colors travel through config files as hex strings.
impl Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Color::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

/// Converts a hex color string to a reversed 3-tuple.
///
/// Leading `#` characters are stripped, the remaining digits are split into
/// three equal groups, each group is parsed as base 16, and the resulting
/// triple is returned in reverse order. `"#FF0000"` therefore decodes to
/// `(0, 0, 255)`.
///
/// # Errors
///
/// Returns [`RegionKitError::InvalidHexColor`] when the digit count is not 3
/// or 6, or when a character is not a hex digit.
pub fn hex_to_color(hex: &str) -> Result<(u8, u8, u8), RegionKitError> {
    let invalid = |reason: &str| RegionKitError::InvalidHexColor {
        input: hex.to_string(),
        reason: reason.to_string(),
    };

    let digits = hex.trim_start_matches('#');
    if digits.is_empty() {
        return Err(invalid("no hex digits"));
    }
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid("contains a non-hex character"));
    }
    if digits.len() != 3 && digits.len() != 6 {
        return Err(invalid("expected 3 or 6 hex digits"));
    }

    let group = digits.len() / 3;
    let mut parsed = [0u8; 3];
    for (slot, start) in parsed.iter_mut().zip((0..digits.len()).step_by(group)) {
        *slot = u8::from_str_radix(&digits[start..start + group], 16)
            .map_err(|e| invalid(&e.to_string()))?;
    }

    Ok((parsed[2], parsed[1], parsed[0]))
}

/// Pixel types the annotators and the region filter can paint on.
///
/// Implemented for 1-channel (`Luma<u8>`) and 3-channel (`Rgb<u8>`) pixels.
pub trait PaintPixel: Pixel<Subpixel = u8> {
    /// Builds a pixel of this type from a drawing-order color.
    fn from_color(color: Color) -> Self;
}

impl PaintPixel for Luma<u8> {
    /// Scalar images take the first component.
    fn from_color(color: Color) -> Self {
        Luma([color.0[0]])
    }
}

impl PaintPixel for Rgb<u8> {
    fn from_color(color: Color) -> Self {
        Rgb(color.0)
    }
}

/// Returns a copy of `image` with the first and third channels exchanged.
pub fn swap_red_blue(image: &RgbImage) -> RgbImage {
    let mut out = image.clone();
    swap_red_blue_mut(&mut out);
    out
}

/// Exchanges the first and third channels of every pixel in place.
pub fn swap_red_blue_mut(image: &mut RgbImage) {
    for pixel in image.pixels_mut() {
        pixel.0.swap(0, 2);
    }
}
