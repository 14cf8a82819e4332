//! 1-bit bitmap payloads and mirroring.

use bitflags::bitflags;
use std::sync::Arc;

bitflags! {
    /// Mirror axes applied to a bitmap at draw time.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Mirror: u8 {
        /// Flip left/right.
        const HORIZONTAL = 0b01;
        /// Flip top/bottom.
        const VERTICAL = 0b10;
    }
}

/// Bits per pixel class of a bitmap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ColorDepth {
    /// Black/white, 1 bit per pixel, MSB first, rows padded to whole bytes.
    #[default]
    Mono,
    /// Reserved for black/white/red panels.
    ThreeColor,
    /// Reserved for 7-color ACeP panels.
    SevenColor,
}

/// Bitmap shape attributes.
///
/// `data` is shared, never copied into the label. Mirrored draws work on a
/// scratch copy made by [`mirror_bitmap`] for the duration of the draw.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BitmapShape {
    pub data: Option<Arc<[u8]>>,
    pub width: u32,
    pub height: u32,
    pub depth: ColorDepth,
    pub mirror: Mirror,
    pub invert: bool,
}

impl BitmapShape {
    #[must_use]
    pub fn new(data: impl Into<Arc<[u8]>>, width: u32, height: u32) -> Self {
        Self {
            data: Some(data.into()),
            width,
            height,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn mirrored(mut self, mirror: Mirror) -> Self {
        self.mirror = mirror;
        self
    }

    #[must_use]
    pub fn inverted(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    #[must_use]
    pub fn depth(mut self, depth: ColorDepth) -> Self {
        self.depth = depth;
        self
    }

    /// Bytes per packed row.
    #[must_use]
    pub const fn row_bytes(&self) -> usize {
        row_bytes(self.width)
    }
}

#[inline]
const fn row_bytes(width: u32) -> usize {
    (width as usize).div_ceil(8)
}

/// Reverse the bit order of a byte: `0b0110_0010` becomes `0b0100_0110`.
#[must_use]
pub const fn reverse_byte(b: u8) -> u8 {
    let b = (b & 0xF0) >> 4 | (b & 0x0F) << 4;
    let b = (b & 0xCC) >> 2 | (b & 0x33) << 2;
    (b & 0xAA) >> 1 | (b & 0x55) << 1
}

/// Produce a mirrored copy of a packed 1-bit row-major bitmap.
///
/// Vertical mirroring reorders rows. Horizontal mirroring reverses byte
/// order and bit order within each row; when `width` is not a multiple of 8
/// the row is mirrored pixel by pixel instead so the padding bits stay at
/// the end of the row. Padding bits are copied from the source row
/// unchanged, so mirroring twice on the same axes returns the input bytes.
///
/// Returns `None` if `src` is shorter than `row_bytes * height` or the
/// scratch buffer cannot be allocated.
#[must_use]
pub fn mirror_bitmap(src: &[u8], width: u32, height: u32, mirror: Mirror) -> Option<Vec<u8>> {
    let row_len = row_bytes(width);
    let total = row_len.checked_mul(height as usize)?;
    if src.len() < total {
        return None;
    }

    let mut dst = Vec::new();
    dst.try_reserve_exact(total).ok()?;
    dst.resize(total, 0);

    let h = height as usize;
    for y in 0..h {
        let src_y = if mirror.contains(Mirror::VERTICAL) {
            h - 1 - y
        } else {
            y
        };
        let src_row = &src[src_y * row_len..(src_y + 1) * row_len];
        let dst_row = &mut dst[y * row_len..(y + 1) * row_len];

        if !mirror.contains(Mirror::HORIZONTAL) {
            dst_row.copy_from_slice(src_row);
        } else if width % 8 == 0 {
            for (dst_byte, src_byte) in dst_row.iter_mut().zip(src_row.iter().rev()) {
                *dst_byte = reverse_byte(*src_byte);
            }
        } else {
            let w = width as usize;
            for x in 0..w {
                let sx = w - 1 - x;
                if src_row[sx / 8] & (0x80 >> (sx % 8)) != 0 {
                    dst_row[x / 8] |= 0x80 >> (x % 8);
                }
            }
            let padding = 0xFFu8 >> (width % 8);
            dst_row[row_len - 1] |= src_row[row_len - 1] & padding;
        }
    }
    Some(dst)
}
