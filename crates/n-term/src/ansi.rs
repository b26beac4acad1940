// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Pure functions that write SGR color sequences to any `impl Write`. No
// state, no decisions about when to emit — that's the color trackers' job.
// This module just knows the byte-level encoding for each color mode.
//
// All functions return `io::Result` propagated from the underlying writer.

use std::io::{self, Write};

use crate::color::Rgb;

// ─── 16 Colors ───────────────────────────────────────────────────────────────

/// Set foreground and background from a packed 16-color byte.
///
/// Always starts with SGR 0 so the sequence is absolute, not relative to
/// whatever was active before. A zero (black) background is left to the
/// terminal default: `ESC[0;3Fm`. Otherwise both are set: `ESC[0;3F;4Bm`.
pub fn color16(w: &mut impl Write, packed: u8) -> io::Result<()> {
    let fg = packed & 7;
    let bg = (packed >> 4) & 7;
    if bg == 0 {
        write!(w, "\x1b[0;3{fg}m")
    } else {
        write!(w, "\x1b[0;3{fg};4{bg}m")
    }
}

// ─── 256 Colors ──────────────────────────────────────────────────────────────

/// Set the foreground to a 256-palette index (`ESC[38;5;Nm`).
#[inline]
pub fn fg256(w: &mut impl Write, idx: u8) -> io::Result<()> {
    write!(w, "\x1b[38;5;{idx}m")
}

/// Set the background to a 256-palette index (`ESC[48;5;Nm`).
#[inline]
pub fn bg256(w: &mut impl Write, idx: u8) -> io::Result<()> {
    write!(w, "\x1b[48;5;{idx}m")
}

// ─── True Color ──────────────────────────────────────────────────────────────

/// Set a 24-bit foreground (`ESC[38;2;R;G;Bm`).
#[inline]
pub fn fg_rgb(w: &mut impl Write, Rgb(r, g, b): Rgb) -> io::Result<()> {
    write!(w, "\x1b[38;2;{r};{g};{b}m")
}

/// Set a 24-bit background (`ESC[48;2;R;G;Bm`).
#[inline]
pub fn bg_rgb(w: &mut impl Write, Rgb(r, g, b): Rgb) -> io::Result<()> {
    write!(w, "\x1b[48;2;{r};{g};{b}m")
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::pack16;
    use pretty_assertions::assert_eq;

    fn emit(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn color16_black_background_omits_bg() {
        assert_eq!(emit(|w| color16(w, pack16(7, 0))), "\x1b[0;37m");
    }

    #[test]
    fn color16_with_background() {
        assert_eq!(emit(|w| color16(w, pack16(3, 4))), "\x1b[0;33;44m");
    }

    #[test]
    fn color16_ignores_high_bits() {
        assert_eq!(emit(|w| color16(w, 0xFF)), "\x1b[0;37;47m");
    }

    #[test]
    fn palette_sequences() {
        assert_eq!(emit(|w| fg256(w, 0)), "\x1b[38;5;0m");
        assert_eq!(emit(|w| bg256(w, 255)), "\x1b[48;5;255m");
    }

    #[test]
    fn rgb_sequences() {
        assert_eq!(emit(|w| fg_rgb(w, Rgb(255, 128, 0))), "\x1b[38;2;255;128;0m");
        assert_eq!(emit(|w| bg_rgb(w, Rgb::BLACK)), "\x1b[48;2;0;0;0m");
    }
}
