//! Codepoint-at-a-time UTF-8 decoding over raw bytes.
//!
//! Text can reach the panel from sources that are not guaranteed to be
//! valid UTF-8 (truncated network payloads, fixed-size buffers). The decoder
//! classifies each sequence by its leading byte:
//!
//! | Leading byte | Sequence length |
//! |--------------|-----------------|
//! | `0xxxxxxx`   | 1               |
//! | `110xxxxx`   | 2               |
//! | `1110xxxx`   | 3               |
//! | `11110xxx`   | 4               |
//!
//! A leading byte that matches none of these, or a sequence whose
//! continuation bytes are malformed, is skipped one byte at a time. A
//! multi-byte sequence cut off by the end of the input ends decoding: the
//! partial codepoint is dropped, never rendered.

/// Iterator over the codepoints of a byte string, as `&str` slices.
#[derive(Clone, Debug)]
pub struct Codepoints<'a> {
    bytes: &'a [u8],
    pos: usize,
}

/// Decode `bytes` codepoint by codepoint.
#[must_use]
pub fn codepoints(bytes: &[u8]) -> Codepoints<'_> {
    Codepoints { bytes, pos: 0 }
}

/// Concatenate every decodable codepoint of `bytes`.
#[must_use]
pub fn decode_lossy(bytes: &[u8]) -> String {
    codepoints(bytes).collect()
}

#[inline]
const fn sequence_len(lead: u8) -> Option<usize> {
    if lead & 0x80 == 0 {
        Some(1)
    } else if lead & 0xE0 == 0xC0 {
        Some(2)
    } else if lead & 0xF0 == 0xE0 {
        Some(3)
    } else if lead & 0xF8 == 0xF0 {
        Some(4)
    } else {
        None
    }
}

impl<'a> Iterator for Codepoints<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos < self.bytes.len() {
            let Some(len) = sequence_len(self.bytes[self.pos]) else {
                self.pos += 1;
                continue;
            };
            let end = self.pos + len;
            if end > self.bytes.len() {
                // Truncated trailing sequence.
                self.pos = self.bytes.len();
                return None;
            }
            match std::str::from_utf8(&self.bytes[self.pos..end]) {
                Ok(cp) => {
                    self.pos = end;
                    return Some(cp);
                }
                Err(_) => self.pos += 1,
            }
        }
        None
    }
}
