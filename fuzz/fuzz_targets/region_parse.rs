//! Fuzz target for `x1,y1,x2,y2` region strings.
//!
//! Any region that parses is pushed through mask construction on a small
//! image, which must either succeed or reject it as non-finite.

#![no_main]

use libfuzzer_sys::fuzz_target;
use regionkit::filter::build_mask;
use regionkit::geometry::BBox;

fuzz_target!(|data: &[u8]| {
    if data.len() > 4096 {
        return;
    }

    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    let Ok(region) = input.parse::<BBox>() else {
        return;
    };

    let result = build_mask(64, 48, &[region]);
    assert_eq!(result.is_ok(), region.is_finite());
});
