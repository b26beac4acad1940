// SPDX-License-Identifier: MIT
//
// Output charsets: code point → bytes, plus display width.
//
// Two encodings are supported. A single-byte dump writes each code point as
// one raw byte (a legacy codepage target); a UTF-8 dump transcodes and also
// reports how many terminal columns the glyph takes, so the serializer can
// skip the continuation cells a wide glyph owns.

use std::io::Write;

use unicode_width::UnicodeWidthChar;

use crate::error::Result;
use crate::output::OutputBuffer;

/// Byte written for code points the charset can't represent.
pub const REPLACEMENT: u8 = b'?';

/// The output charset selected for one dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputCharset {
    /// One raw byte per code point.
    #[default]
    SingleByte,
    /// Standard UTF-8.
    Utf8,
}

impl OutputCharset {
    /// Pick the charset for a codepage name. Anything that isn't UTF-8 is
    /// treated as a single-byte codepage.
    #[must_use]
    pub fn from_codepage(name: &str) -> Self {
        let name = name.trim();
        if name.eq_ignore_ascii_case("utf-8") || name.eq_ignore_ascii_case("utf8") {
            Self::Utf8
        } else {
            Self::SingleByte
        }
    }
}

/// Encoding strategy used by the row serializer.
pub trait Charset: Default {
    /// Append the bytes for `cp` and return its display width in cells.
    ///
    /// # Errors
    ///
    /// Propagates output buffer failures.
    fn encode<W: Write>(&self, out: &mut OutputBuffer<'_, W>, cp: u32) -> Result<usize>;
}

/// Single-byte output: code points up to 255 verbatim, `?` above.
#[derive(Debug, Default, Clone, Copy)]
pub struct SingleByte;

impl Charset for SingleByte {
    fn encode<W: Write>(&self, out: &mut OutputBuffer<'_, W>, cp: u32) -> Result<usize> {
        out.push(u8::try_from(cp).unwrap_or(REPLACEMENT))?;
        Ok(1)
    }
}

/// UTF-8 output.
#[derive(Debug, Default, Clone, Copy)]
pub struct Utf8;

impl Charset for Utf8 {
    fn encode<W: Write>(&self, out: &mut OutputBuffer<'_, W>, cp: u32) -> Result<usize> {
        match char::from_u32(cp) {
            Some(ch) => {
                let mut enc = [0u8; 4];
                out.push_bytes(ch.encode_utf8(&mut enc).as_bytes())?;
            }
            None => out.push(REPLACEMENT)?,
        }
        Ok(cell_width(cp))
    }
}

/// Terminal columns a code point occupies: 2 for wide and fullwidth
/// characters, 1 for everything else.
///
/// Zero-width and control characters count as 1 so a cursor always
/// advances.
#[must_use]
pub fn cell_width(cp: u32) -> usize {
    char::from_u32(cp)
        .and_then(UnicodeWidthChar::width)
        .map_or(1, |w| w.max(1))
}
