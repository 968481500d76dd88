#![allow(dead_code)]

use image::Rgb;
use imageproc::definitions::Image;
use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};
use regionkit::geometry::BBox;

pub const MAX_SIDE: u32 = 48;

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Image dimensions between 1 and [`MAX_SIDE`].
pub fn arb_dims() -> BoxedStrategy<(u32, u32)> {
    (1..=MAX_SIDE, 1..=MAX_SIDE).boxed()
}

/// Whole-pixel boxes that may be unordered, degenerate, or reach past a
/// `MAX_SIDE` image on any side.
pub fn arb_bbox() -> BoxedStrategy<BBox> {
    let coord = -8i32..(MAX_SIDE as i32 + 8);
    (coord.clone(), coord.clone(), coord.clone(), coord)
        .prop_map(|(x1, y1, x2, y2)| BBox::from([x1, y1, x2, y2]))
        .boxed()
}

pub fn arb_regions(max: usize) -> BoxedStrategy<Vec<BBox>> {
    prop::collection::vec(arb_bbox(), 0..=max).boxed()
}

/// A `width` x `height` image with a value derived from `seed` at every pixel.
pub fn seeded_image(width: u32, height: u32, seed: u8) -> Image<Rgb<u8>> {
    Image::from_fn(width, height, |x, y| {
        Rgb([
            (x as u8).wrapping_mul(13).wrapping_add(seed),
            (y as u8).wrapping_mul(7).wrapping_add(seed),
            ((x + y) as u8).wrapping_add(seed).max(1),
        ])
    })
}

/// Reference membership test: is `(x, y)` inside the inclusive pixel range a
/// box covers, ignoring boxes that cover nothing?
pub fn covers(bbox: &BBox, x: u32, y: u32) -> bool {
    let x1 = bbox.x1.min(bbox.x2) as i64;
    let x2 = bbox.x1.max(bbox.x2) as i64;
    let y1 = bbox.y1.min(bbox.y2) as i64;
    let y2 = bbox.y1.max(bbox.y2) as i64;
    if x1 == x2 || y1 == y2 {
        return false;
    }
    (x1..=x2).contains(&(x as i64)) && (y1..=y2).contains(&(y as i64))
}
