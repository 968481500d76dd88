//! Full-image Gaussian smoothing with an explicit kernel size.
//!
//! Both passes accumulate in `f32` and the result is rounded once, so a
//! flat image comes back unchanged. Edges repeat the border pixel.

use imageproc::definitions::Image;
use log::debug;

use crate::color::PaintPixel;

/// Default blur kernel size.
pub const DEFAULT_BLUR_RADIUS: u32 = 31;

/// Rounds an even kernel size up to the next odd one.
///
/// Gaussian kernels need a center tap, so `30` becomes `31`. Odd sizes are
/// returned unchanged.
pub fn effective_kernel_size(radius: u32) -> u32 {
    if radius % 2 == 0 {
        debug!("blur radius {} is even, using {}", radius, radius + 1);
        radius + 1
    } else {
        radius
    }
}

/// Standard deviation derived from the kernel size.
///
/// `0.3 * ((size - 1) * 0.5 - 1) + 0.8`, the usual choice when only a
/// kernel size is given.
pub fn sigma_for_kernel(size: u32) -> f32 {
    0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Normalized 1-D Gaussian taps for a kernel of `size`.
///
/// The spread always comes from `size`, but at most `max_half_width` taps
/// are kept on each side of the center. Pass `u32::MAX` for the full
/// kernel.
pub fn gaussian_kernel(size: u32, max_half_width: u32) -> Vec<f32> {
    let size = effective_kernel_size(size);
    let sigma = sigma_for_kernel(size);
    let half = (size / 2).min(max_half_width) as i64;
    let denom = 2.0 * sigma * sigma;

    let mut taps: Vec<f32> = (-half..=half)
        .map(|d| {
            let d = d as f32;
            (-(d * d) / denom).exp()
        })
        .collect();
    let sum: f32 = taps.iter().sum();
    for tap in &mut taps {
        *tap /= sum;
    }
    taps
}

/// Blurs the whole image with a `kernel_size` x `kernel_size` Gaussian.
///
/// An even size is corrected to the next odd one first. Taps that would
/// reach past the far side of the image from every pixel are dropped, so
/// very large sizes cost no more than an image-sized kernel.
pub fn gaussian_blur<P: PaintPixel>(image: &Image<P>, kernel_size: u32) -> Image<P> {
    let (width, height) = image.dimensions();
    let reach = width.max(height).saturating_sub(1);
    let kernel = gaussian_kernel(kernel_size, reach);
    if kernel.len() == 1 {
        return image.clone();
    }
    if (kernel.len() as u64) < u64::from(kernel_size | 1) {
        debug!(
            "blur kernel {} trimmed to {} taps for a {}x{} image",
            kernel_size,
            kernel.len(),
            width,
            height
        );
    }

    let (width, height) = (width as usize, height as usize);
    let channels = P::CHANNEL_COUNT as usize;
    let samples: Vec<f32> = image.as_raw().iter().map(|&v| f32::from(v)).collect();
    let rows = horizontal_pass(&samples, width, channels, &kernel);
    let smoothed = vertical_pass(&rows, width * channels, height, &kernel);

    let mut out = image.clone();
    let raw: &mut [u8] = &mut out;
    for (dst, value) in raw.iter_mut().zip(smoothed) {
        *dst = value.round().clamp(0.0, 255.0) as u8;
    }
    out
}

fn horizontal_pass(src: &[f32], width: usize, channels: usize, kernel: &[f32]) -> Vec<f32> {
    let half = (kernel.len() / 2) as isize;
    let last = width as isize - 1;
    let row_len = width * channels;
    let mut out = vec![0.0; src.len()];

    for (src_row, out_row) in src.chunks_exact(row_len).zip(out.chunks_exact_mut(row_len)) {
        for x in 0..width {
            for c in 0..channels {
                out_row[x * channels + c] = kernel
                    .iter()
                    .enumerate()
                    .map(|(i, k)| {
                        let sx = (x as isize + i as isize - half).clamp(0, last) as usize;
                        k * src_row[sx * channels + c]
                    })
                    .sum();
            }
        }
    }
    out
}

fn vertical_pass(src: &[f32], row_len: usize, height: usize, kernel: &[f32]) -> Vec<f32> {
    let half = (kernel.len() / 2) as isize;
    let last = height as isize - 1;
    let mut out = vec![0.0; src.len()];

    for (y, out_row) in out.chunks_exact_mut(row_len).enumerate() {
        for (i, k) in kernel.iter().enumerate() {
            let sy = (y as isize + i as isize - half).clamp(0, last) as usize;
            let src_row = &src[sy * row_len..(sy + 1) * row_len];
            for (o, s) in out_row.iter_mut().zip(src_row) {
                *o += k * s;
            }
        }
    }
    out
}
