//! Text decoding and line wrapping shared by bounds and rendering.
//!
//! Both the bounds calculator and the text renderer go through
//! [`wrap_lines`], so the rectangle that gets invalidated and the lines that
//! get drawn always come from the same wrap decision.

mod utf8;
mod wrap;

pub use utf8::{Codepoints, codepoints, decode_lossy};
pub use wrap::{WrappedLine, wrap_lines};
