//! Fuzz target for hex color decoding.
//!
//! Feeds arbitrary UTF-8 strings to the hex decoder and checks that every
//! accepted color re-encodes to a six-digit string.

#![no_main]

use libfuzzer_sys::fuzz_target;
use regionkit::color::Color;

fuzz_target!(|data: &[u8]| {
    if data.len() > 1024 {
        return;
    }

    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(color) = Color::from_hex(input) {
        assert_eq!(color.to_hex().len(), 7);
    }
});
