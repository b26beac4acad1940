//! The document grid — what a renderer hands to the dump.
//!
//! A [`Document`] is an ordered list of rows, each an ordered list of
//! [`Cell`]s. Rows may have different lengths; the renderer only stores cells
//! up to the last one it touched. The dump reads the grid and never changes
//! it.
//!
//! [`Document::from_text`] is a minimal stand-in renderer for plain text: it
//! lays each line out cell by cell, expands tabs, and gives wide characters
//! a continuation cell the way a real renderer does.

use n_term::cell::Cell;
use n_term::color::CellColor;
use unicode_width::UnicodeWidthChar;

/// Tab stops every 8 columns.
pub const TAB_STOP: usize = 8;

/// A rendered document: rows of cells, top to bottom.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Document {
    rows: Vec<Vec<Cell>>,
}

impl Document {
    /// An empty document (height 0).
    #[must_use]
    pub const fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// A document from pre-rendered rows.
    #[must_use]
    pub const fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// Lay out plain text with one color for every cell.
    ///
    /// Lines split on `\n` (a trailing `\r` is dropped). Tabs expand to the
    /// next multiple of [`TAB_STOP`]. Zero-width characters are skipped.
    /// Wide characters take two cells: the glyph and a continuation cell.
    ///
    /// ```
    /// use n_document::Document;
    /// use n_term::color::CellColor;
    ///
    /// let doc = Document::from_text("a\tb\n中", CellColor::DEFAULT);
    /// assert_eq!(doc.height(), 2);
    /// assert_eq!(doc.row(0).map(<[_]>::len), Some(9));
    /// assert_eq!(doc.row(1).map(<[_]>::len), Some(2));
    /// ```
    #[must_use]
    pub fn from_text(text: &str, color: CellColor) -> Self {
        let mut lines: Vec<&str> = text.split('\n').collect();
        // A final newline ends the last line rather than starting a new one.
        if lines.len() > 1 && lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        let rows = lines
            .into_iter()
            .map(|line| layout_line(line.strip_suffix('\r').unwrap_or(line), color))
            .collect();
        Self { rows }
    }

    /// Number of rows.
    #[inline]
    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Whether the document has no rows.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Length of the longest row.
    #[must_use]
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// The cells of row `y`.
    #[inline]
    #[must_use]
    pub fn row(&self, y: usize) -> Option<&[Cell]> {
        self.rows.get(y).map(Vec::as_slice)
    }

    /// Iterate over rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(Vec::as_slice)
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Document({} rows, width {})", self.height(), self.width())
    }
}

fn layout_line(line: &str, color: CellColor) -> Vec<Cell> {
    let mut cells = Vec::with_capacity(line.len());
    for ch in line.chars() {
        if ch == '\t' {
            let stop = (cells.len() / TAB_STOP + 1) * TAB_STOP;
            cells.resize(stop, Cell::EMPTY.with_color(color));
            continue;
        }
        let width = ch.width().unwrap_or(1);
        if width == 0 {
            continue;
        }
        cells.push(Cell::new(ch).with_color(color));
        if width == 2 {
            cells.push(Cell::continuation(color));
        }
    }
    cells
}

// ─── Tests ──────────────────────────────────────────────────────────────────
