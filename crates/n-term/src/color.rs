// SPDX-License-Identifier: MIT
//
// Cell color descriptors and the xterm palette.
//
// A rendered cell carries its color in one of three shapes, matching the
// three color modes a dump can run in:
//
//   Packed16   one byte, foreground index in bits 0–2, background in bits 4–6
//   Indexed    two 256-palette indices
//   Rgb        two 24-bit triples
//
// The dump picks one mode per run. A descriptor whose shape differs from the
// run's mode is converted with the palette below, so a single grid can be
// written in any mode. Conversions are pure and deterministic: converting the
// same descriptor twice always yields the same value, which keeps the
// tracker's equality checks exact.

use std::fmt;

// ─── ColorMode ───────────────────────────────────────────────────────────────

/// Color granularity for one dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Glyphs only, no escapes.
    #[default]
    None,
    /// 8 foreground × 8 background colors.
    Ansi16,
    /// The xterm 256-color palette.
    Ansi256,
    /// 24-bit RGB.
    TrueColor,
}

impl ColorMode {
    /// Decode the numeric `document.dump.color_mode` option.
    ///
    /// 0 = none, 1 = 16 colors, 3 = 256 colors, 4 = true color. 2 (88 colors)
    /// has no dump encoding and is rejected along with anything else.
    #[must_use]
    pub const fn from_option(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::None),
            1 => Some(Self::Ansi16),
            3 => Some(Self::Ansi256),
            4 => Some(Self::TrueColor),
            _ => None,
        }
    }

    /// The numeric option value for this mode.
    #[must_use]
    pub const fn option_value(self) -> i64 {
        match self {
            Self::None => 0,
            Self::Ansi16 => 1,
            Self::Ansi256 => 3,
            Self::TrueColor => 4,
        }
    }

    /// Parse a user-facing mode name (`none`, `16`, `256`, `true`).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "none" | "mono" | "0" => Some(Self::None),
            "16" => Some(Self::Ansi16),
            "256" => Some(Self::Ansi256),
            "true" | "truecolor" | "24bit" => Some(Self::TrueColor),
            _ => None,
        }
    }
}

// ─── Rgb ─────────────────────────────────────────────────────────────────────

/// One 24-bit color channel value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Pure black.
    pub const BLACK: Self = Self(0, 0, 0);
    /// Pure white.
    pub const WHITE: Self = Self(255, 255, 255);

    /// Squared Euclidean distance in RGB space.
    #[inline]
    #[must_use]
    pub fn distance_sq(self, other: Self) -> u32 {
        let d = |a: u8, b: u8| {
            let v = i32::from(a) - i32::from(b);
            v.unsigned_abs() * v.unsigned_abs()
        };
        d(self.0, other.0) + d(self.1, other.1) + d(self.2, other.2)
    }
}

impl fmt::Debug for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

// ─── CellColor ───────────────────────────────────────────────────────────────

/// Packed 16-color value for white on black: the terminal's usual default.
pub const DEFAULT_PACKED16: u8 = 0x07;

/// Pack a 16-color foreground/background pair into one byte.
///
/// Only the low three bits of each index are kept.
#[inline]
#[must_use]
pub const fn pack16(fg: u8, bg: u8) -> u8 {
    (fg & 7) | ((bg & 7) << 4)
}

/// Color descriptor stored in every cell.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellColor {
    /// 16-color mode: `fg | bg << 4`.
    Packed16(u8),

    /// 256-color palette indices.
    Indexed {
        /// Foreground palette index.
        fg: u8,
        /// Background palette index.
        bg: u8,
    },

    /// 24-bit true color.
    Rgb {
        /// Foreground triple.
        fg: Rgb,
        /// Background triple.
        bg: Rgb,
    },
}

impl CellColor {
    /// White on black in 16-color form.
    pub const DEFAULT: Self = Self::Packed16(DEFAULT_PACKED16);

    /// A 16-color descriptor from separate indices.
    #[inline]
    #[must_use]
    pub const fn ansi16(fg: u8, bg: u8) -> Self {
        Self::Packed16(pack16(fg, bg))
    }

    /// A 256-color descriptor.
    #[inline]
    #[must_use]
    pub const fn indexed(fg: u8, bg: u8) -> Self {
        Self::Indexed { fg, bg }
    }

    /// A true-color descriptor.
    #[inline]
    #[must_use]
    pub const fn rgb(fg: Rgb, bg: Rgb) -> Self {
        Self::Rgb { fg, bg }
    }

    /// This descriptor as a packed 16-color byte.
    ///
    /// 256-color and RGB values snap to the nearest of the eight base colors.
    #[must_use]
    pub fn to_packed16(self) -> u8 {
        match self {
            Self::Packed16(packed) => packed,
            Self::Indexed { fg, bg } => pack16(
                palette::nearest_ansi8(palette::ansi256_to_rgb(fg)),
                palette::nearest_ansi8(palette::ansi256_to_rgb(bg)),
            ),
            Self::Rgb { fg, bg } => pack16(palette::nearest_ansi8(fg), palette::nearest_ansi8(bg)),
        }
    }

    /// This descriptor as a `(fg, bg)` pair of 256-palette indices.
    #[must_use]
    pub fn to_indexed(self) -> (u8, u8) {
        match self {
            Self::Packed16(packed) => (packed & 7, (packed >> 4) & 7),
            Self::Indexed { fg, bg } => (fg, bg),
            Self::Rgb { fg, bg } => (palette::nearest_ansi256(fg), palette::nearest_ansi256(bg)),
        }
    }

    /// This descriptor as a `(fg, bg)` pair of RGB triples.
    #[must_use]
    pub fn to_rgb(self) -> (Rgb, Rgb) {
        match self {
            Self::Packed16(packed) => (
                palette::ansi256_to_rgb(packed & 7),
                palette::ansi256_to_rgb((packed >> 4) & 7),
            ),
            Self::Indexed { fg, bg } => (palette::ansi256_to_rgb(fg), palette::ansi256_to_rgb(bg)),
            Self::Rgb { fg, bg } => (fg, bg),
        }
    }
}

impl Default for CellColor {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Debug for CellColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Packed16(packed) => {
                write!(f, "ansi16(fg={}, bg={})", packed & 7, (packed >> 4) & 7)
            }
            Self::Indexed { fg, bg } => write!(f, "ansi256(fg={fg}, bg={bg})"),
            Self::Rgb { fg, bg } => write!(f, "rgb(fg={fg:?}, bg={bg:?})"),
        }
    }
}

// ─── Palette ─────────────────────────────────────────────────────────────────

pub mod palette {
    //! The xterm 256-color palette and nearest-match lookups.
    //!
    //! - Colors 0–7: standard colors
    //! - Colors 8–15: bright variants
    //! - Colors 16–231: a 6×6×6 RGB cube
    //! - Colors 232–255: a 24-step grayscale ramp

    use super::Rgb;

    /// The standard ANSI-16 palette (xterm defaults).
    pub const ANSI16_RGB: [Rgb; 16] = [
        Rgb(0, 0, 0),       // 0: Black
        Rgb(128, 0, 0),     // 1: Red
        Rgb(0, 128, 0),     // 2: Green
        Rgb(128, 128, 0),   // 3: Yellow
        Rgb(0, 0, 128),     // 4: Blue
        Rgb(128, 0, 128),   // 5: Magenta
        Rgb(0, 128, 128),   // 6: Cyan
        Rgb(192, 192, 192), // 7: White
        Rgb(128, 128, 128), // 8: Bright Black
        Rgb(255, 0, 0),     // 9: Bright Red
        Rgb(0, 255, 0),     // 10: Bright Green
        Rgb(255, 255, 0),   // 11: Bright Yellow
        Rgb(0, 0, 255),     // 12: Bright Blue
        Rgb(255, 0, 255),   // 13: Bright Magenta
        Rgb(0, 255, 255),   // 14: Bright Cyan
        Rgb(255, 255, 255), // 15: Bright White
    ];

    /// Convert a 256-palette index to RGB.
    #[must_use]
    pub const fn ansi256_to_rgb(idx: u8) -> Rgb {
        match idx {
            0..=15 => ANSI16_RGB[idx as usize],

            16..=231 => {
                let idx = idx - 16;
                // The cube uses: 0, 95, 135, 175, 215, 255
                const fn level(i: u8) -> u8 {
                    if i == 0 { 0 } else { 55 + 40 * i }
                }
                Rgb(level(idx / 36), level((idx % 36) / 6), level(idx % 6))
            }

            232..=255 => {
                let v = 8 + 10 * (idx - 232);
                Rgb(v, v, v)
            }
        }
    }

    /// Nearest 256-palette index by RGB distance. Ties go to the lower index.
    #[must_use]
    pub fn nearest_ansi256(color: Rgb) -> u8 {
        nearest(color, 0..=255)
    }

    /// Nearest of the eight base colors (the ones a packed byte can hold).
    #[must_use]
    pub fn nearest_ansi8(color: Rgb) -> u8 {
        nearest(color, 0..=7)
    }

    fn nearest(color: Rgb, candidates: std::ops::RangeInclusive<u8>) -> u8 {
        let mut best_idx = 0;
        let mut best_dist = u32::MAX;
        for idx in candidates {
            let dist = color.distance_sq(ansi256_to_rgb(idx));
            if dist < best_dist {
                best_dist = dist;
                best_idx = idx;
            }
        }
        best_idx
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
