use proptest::prelude::*;
use regionkit::color::{hex_to_color, Color};
use regionkit::filter::{build_mask, filter_regions, FilterOptions, MASK_ON};

mod proptest_helpers;

use proptest_helpers::{covers, seeded_image};

proptest! {
    #![proptest_config(proptest_helpers::proptest_config())]

    #[test]
    fn mask_is_exactly_the_union_of_regions(
        (width, height) in proptest_helpers::arb_dims(),
        regions in proptest_helpers::arb_regions(5),
    ) {
        let mask = build_mask(width, height, &regions).expect("finite regions");
        for (x, y, pixel) in mask.enumerate_pixels() {
            let expected = regions.iter().any(|r| covers(r, x, y));
            prop_assert_eq!(pixel.0[0] == MASK_ON, expected, "pixel ({}, {})", x, y);
        }
    }

    #[test]
    fn black_filter_is_idempotent(
        (width, height) in proptest_helpers::arb_dims(),
        regions in proptest_helpers::arb_regions(4),
        seed in any::<u8>(),
    ) {
        let image = seeded_image(width, height, seed);
        let once = filter_regions(&image, &regions, &FilterOptions::black()).expect("first pass");
        let twice = filter_regions(&once, &regions, &FilterOptions::black()).expect("second pass");
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn black_filter_only_changes_masked_pixels(
        (width, height) in proptest_helpers::arb_dims(),
        regions in proptest_helpers::arb_regions(4),
        seed in any::<u8>(),
    ) {
        let image = seeded_image(width, height, seed);
        let out = filter_regions(&image, &regions, &FilterOptions::black()).expect("filter");
        for (x, y, pixel) in out.enumerate_pixels() {
            if regions.iter().any(|r| covers(r, x, y)) {
                prop_assert_eq!(pixel.0, [0, 0, 0]);
            } else {
                prop_assert_eq!(pixel, image.get_pixel(x, y));
            }
        }
    }

    #[test]
    fn six_digit_hex_decodes_reversed(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
        let hex = format!("#{:02x}{:02X}{:02x}", r, g, b);
        prop_assert_eq!(hex_to_color(&hex).expect("valid hex"), (b, g, r));
        prop_assert_eq!(Color::from_hex(&hex).expect("valid hex").to_hex(), hex.to_uppercase());
    }

    #[test]
    fn hex_decoding_never_panics(input in ".{0,12}") {
        let _ = hex_to_color(&input);
    }
}
