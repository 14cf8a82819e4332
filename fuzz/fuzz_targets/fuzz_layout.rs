//! Fuzz target for text layout.
//!
//! Every placed line must sit inside the reported bounds.

#![no_main]

use arbitrary::Arbitrary;
use epaper_ui::bounds::layout_bytes;
use epaper_ui::font::{MonoFont, TextMetrics};
use epaper_ui::geometry::Rect;
use epaper_ui::label::{Align, TextShape};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    bytes: &'a [u8],
    x: i16,
    y: i16,
    max_width: u8,
    height: u8,
    align: u8,
}

fuzz_target!(|input: Input<'_>| {
    let font = MonoFont::new(8, 12, -3);
    let align = match input.align % 3 {
        0 => Align::Left,
        1 => Align::Center,
        _ => Align::Right,
    };
    let shape = TextShape::new("", None)
        .align(align)
        .max_width(u32::from(input.max_width))
        .height(u32::from(input.height));
    let layout = layout_bytes(
        i32::from(input.x),
        i32::from(input.y),
        input.bytes,
        &shape,
        &font,
        2,
    );
    for line in &layout.lines {
        let cell = Rect::new(
            line.x,
            line.baseline - font.ascent(),
            line.width.max(0) as u32,
            font.extent() as u32,
        );
        assert!(layout.bounds.contains_rect(&cell), "{cell:?} outside {:?}", layout.bounds);
    }
});
