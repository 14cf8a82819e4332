//! Fuzz target for the byte-level UTF-8 decoder and line wrapper.
//!
//! Arbitrary bytes must never panic, and every wrapped line must fit the
//! box unless it holds a single oversized codepoint.

#![no_main]

use arbitrary::Arbitrary;
use epaper_ui::font::{MonoFont, TextMetrics};
use epaper_ui::text::{codepoints, decode_lossy, wrap_lines};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    bytes: &'a [u8],
    max_width: i16,
    advance: u8,
}

fuzz_target!(|input: Input<'_>| {
    let font = MonoFont::new(i32::from(input.advance % 32), 10, -2);
    let max_width = i32::from(input.max_width);

    let decoded = decode_lossy(input.bytes);
    assert_eq!(codepoints(input.bytes).count(), decoded.chars().count());

    let lines = wrap_lines(input.bytes, max_width, &font);
    let rejoined: String = lines.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(rejoined, decoded);
    for line in &lines {
        assert_eq!(line.width, font.width(&line.text));
        if max_width > 0 && line.width > max_width {
            assert_eq!(line.text.chars().count(), 1);
        }
    }
});
