// SPDX-License-Identifier: MIT
//
// Cell — one character position of a rendered document.
//
// The renderer produces a grid of these and the dump walks it row by row.
// A cell holds a code point, the screen attribute bits the renderer set,
// and a color descriptor. The dump never mutates cells.
//
// Size: 12 bytes. A 200×10 000 line document is ~24 MB of cells, which is
// the renderer's concern, not ours.
//
// Wide characters (CJK, some emoji) occupy two columns. The first cell holds
// the code point; the second is a continuation cell (ch = 0). When the dump
// writes a wide glyph it skips the continuation cell that follows.

use crate::color::CellColor;

// ─── Screen Attributes ───────────────────────────────────────────────────────

bitflags::bitflags! {
    /// Attribute bits the renderer attaches to a cell.
    ///
    /// Only [`ScreenAttr::FRAME`] affects the dump; the rest are carried
    /// through untouched.
    ///
    /// ```
    /// use n_term::cell::ScreenAttr;
    ///
    /// let attr = ScreenAttr::FRAME | ScreenAttr::BOLD;
    /// assert!(attr.is_frame());
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct ScreenAttr: u8 {
        /// Excluded from text search.
        const UNSEARCHABLE = 0x01;
        /// Bold text.
        const BOLD         = 0x08;
        /// Italic text.
        const ITALIC       = 0x10;
        /// Underlined text.
        const UNDERLINE    = 0x20;
        /// Standout (reverse) text.
        const STANDOUT     = 0x40;
        /// Line-drawing glyph from the legacy frame range.
        const FRAME        = 0x80;
    }
}

impl ScreenAttr {
    /// Whether the cell holds line-drawing art.
    #[inline]
    #[must_use]
    pub const fn is_frame(self) -> bool {
        self.contains(Self::FRAME)
    }
}

// ─── Cell ────────────────────────────────────────────────────────────────────

/// A single document cell.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Code point to display.
    ///
    /// - `0` = continuation cell (second column of a wide character)
    /// - `1..=32` = blank (control characters and space)
    /// - Any other value = the glyph
    pub ch: u32,

    /// Screen attribute bits.
    pub attrs: ScreenAttr,

    /// Color descriptor; ignored in monochrome dumps.
    pub color: CellColor,
}

/// Continuation marker for the second column of a wide character.
const CONTINUATION: u32 = 0;

/// Default character for empty cells.
const SPACE: u32 = b' ' as u32;

impl Cell {
    /// An empty cell: space, default color, no attributes.
    pub const EMPTY: Self = Self {
        ch: SPACE,
        attrs: ScreenAttr::empty(),
        color: CellColor::DEFAULT,
    };

    /// A cell with a character and default styling.
    #[inline]
    #[must_use]
    pub const fn new(ch: char) -> Self {
        Self {
            ch: ch as u32,
            attrs: ScreenAttr::empty(),
            color: CellColor::DEFAULT,
        }
    }

    /// A cell from a raw code point, as a renderer with legacy glyph codes
    /// would produce it.
    #[inline]
    #[must_use]
    pub const fn from_code(ch: u32, attrs: ScreenAttr, color: CellColor) -> Self {
        Self { ch, attrs, color }
    }

    /// A frame cell holding a legacy line-drawing code (176–223).
    #[inline]
    #[must_use]
    pub const fn frame(code: u8, color: CellColor) -> Self {
        Self {
            ch: code as u32,
            attrs: ScreenAttr::FRAME,
            color,
        }
    }

    /// A continuation cell for the second column of a wide character.
    ///
    /// It takes the wide glyph's color so a background band stays intact.
    #[inline]
    #[must_use]
    pub const fn continuation(color: CellColor) -> Self {
        Self {
            ch: CONTINUATION,
            attrs: ScreenAttr::empty(),
            color,
        }
    }

    // ─── Queries ──────────────────────────────────────────────────────────

    /// Whether this is a continuation cell.
    #[inline]
    #[must_use]
    pub const fn is_continuation(self) -> bool {
        self.ch == CONTINUATION
    }

    // ─── Builders ─────────────────────────────────────────────────────────

    /// Set the color descriptor.
    #[inline]
    #[must_use]
    pub const fn with_color(self, color: CellColor) -> Self {
        Self { color, ..self }
    }

    /// Set the attribute bits.
    #[inline]
    #[must_use]
    pub const fn with_attrs(self, attrs: ScreenAttr) -> Self {
        Self { attrs, ..self }
    }
}

impl Default for Cell {
    #[inline]
    fn default() -> Self {
        Self::EMPTY
    }
}

impl std::fmt::Debug for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_continuation() {
            return write!(f, "Cell(continuation, {:?})", self.color);
        }
        match char::from_u32(self.ch) {
            Some(ch) => write!(f, "Cell({ch:?}")?,
            None => write!(f, "Cell(U+{:04X}", self.ch)?,
        }
        if !self.attrs.is_empty() {
            write!(f, ", {:?}", self.attrs)?;
        }
        if self.color != CellColor::DEFAULT {
            write!(f, ", {:?}", self.color)?;
        }
        write!(f, ")")
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
