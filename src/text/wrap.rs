//! Greedy codepoint wrapping.

use super::utf8::codepoints;
use crate::font::TextMetrics;

/// One line produced by [`wrap_lines`] with its measured width.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WrappedLine {
    pub text: String,
    pub width: i32,
}

/// Break `bytes` into lines no wider than `max_width` pixels.
///
/// Wrapping is word-free: codepoints are appended to the current line while
/// the measured width of `line + next` stays within `max_width`. The first
/// codepoint that would overflow closes the line and starts the next one.
/// A codepoint that is wider than `max_width` on its own still gets a line
/// to itself, so no input is ever lost. Widths are always measured on the
/// whole candidate line, never summed, so kerning fonts stay correct.
///
/// A non-positive `max_width` disables wrapping and yields a single line.
#[must_use]
pub fn wrap_lines(bytes: &[u8], max_width: i32, metrics: &dyn TextMetrics) -> Vec<WrappedLine> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_width = 0;

    for cp in codepoints(bytes) {
        let start = line.len();
        line.push_str(cp);
        let candidate_width = metrics.width(&line);

        if max_width > 0 && candidate_width > max_width && start > 0 {
            line.truncate(start);
            lines.push(WrappedLine {
                text: std::mem::take(&mut line),
                width: line_width,
            });
            line.push_str(cp);
            line_width = metrics.width(&line);
        } else {
            line_width = candidate_width;
        }
    }

    if !line.is_empty() {
        lines.push(WrappedLine {
            text: line,
            width: line_width,
        });
    }
    lines
}
