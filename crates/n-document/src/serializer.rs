//! Document dump — grid in, bytes out.
//!
//! One generic routine, [`RowSerializer`], walks a row cell by cell. It is
//! parameterised by a [`ColorTracker`] (which escapes to emit) and a
//! [`Charset`] (how to encode a glyph). [`dump_document`] picks the concrete
//! pair once from the [`DumpConfig`], so the per-cell loop never branches on
//! the mode.
//!
//! Per cell:
//!
//! 1. With color on, the tracker sees the cell first — even a blank one,
//!    since a space can carry a background.
//! 2. Frame cells in 176–223 become their ASCII stand-in.
//! 3. Blanks (≤ 32) are counted, not written.
//! 4. Before a glyph, the counted blanks go out as spaces; then the glyph,
//!    and any continuation cells it covers are skipped.
//!
//! After the last cell a colored row is padded out to the target width and
//! every row ends in `\n`. Blanks still counted at the end of a row are never
//! written: in monochrome that trims trailing space, with color the padding
//! covers them. A padded row with no cells first re-sends the color of the
//! last cell before it (the default color at the top), so its line still
//! sets its own color.
//!
//! The first write failure ends the dump. Nothing is retried.

use std::io::Write;

use n_term::cell::Cell;
use n_term::charset::{Charset, OutputCharset, SingleByte, Utf8};
use n_term::color::{CellColor, ColorMode};
use n_term::frame::dumb_frame_char;
use n_term::output::{
    Color16, Color256, ColorTracker, DEFAULT_CAPACITY, Mono, OutputBuffer, TrueColor,
};

use crate::document::Document;
use crate::error::Result;
use crate::options::DumpConfig;

const SPACE: u32 = b' ' as u32;

// ─── DumpStats ──────────────────────────────────────────────────────────────

/// What a finished dump produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DumpStats {
    /// Rows written.
    pub rows: usize,
    /// Bytes handed to the destination.
    pub bytes_written: usize,
    /// Color escape sequences emitted.
    pub color_changes: usize,
}

// ─── RowSerializer ──────────────────────────────────────────────────────────

/// Serializes rows for one color mode and one charset.
///
/// Holds the per-dump state: the tracker's last-emitted color, the color of
/// the last cell seen, and a count of escapes written. Create one per dump.
#[derive(Debug, Default)]
pub struct RowSerializer<C: ColorTracker, S: Charset> {
    tracker: C,
    charset: S,
    width: usize,
    carry: CellColor,
    color_changes: usize,
}

impl<C: ColorTracker, S: Charset> RowSerializer<C, S> {
    /// A serializer padding colored rows to `width` columns.
    #[must_use]
    pub fn new(width: usize) -> Self {
        Self {
            tracker: C::default(),
            charset: S::default(),
            width,
            carry: CellColor::DEFAULT,
            color_changes: 0,
        }
    }

    /// Color escapes emitted so far.
    #[inline]
    #[must_use]
    pub const fn color_changes(&self) -> usize {
        self.color_changes
    }

    /// Write one row, newline included.
    ///
    /// # Errors
    ///
    /// Any output buffer failure; the row may be partly written.
    pub fn write_row<W: Write>(
        &mut self,
        out: &mut OutputBuffer<'_, W>,
        row: &[Cell],
    ) -> Result<()> {
        self.tracker.begin_row();

        // An empty row has no cell to set its color; padding it carries the
        // previous row's last color so the line stays self-contained.
        if C::ENABLED && row.is_empty() && self.width > 0 {
            self.color_changes += self.tracker.apply(out, self.carry)?;
        }

        let mut white = 0;
        let mut col = 0;
        let mut x = 0;

        while x < row.len() {
            let cell = row[x];

            if C::ENABLED {
                self.color_changes += self.tracker.apply(out, cell.color)?;
                self.carry = cell.color;
            }

            let glyph = if cell.attrs.is_frame() {
                dumb_frame_char(cell.ch).map_or(cell.ch, u32::from)
            } else {
                cell.ch
            };

            if glyph <= SPACE {
                white += 1;
                x += 1;
                continue;
            }

            out.push_spaces(white)?;
            col += white;
            white = 0;

            let cells = self.charset.encode(out, glyph)?;
            col += cells;
            // A wide glyph owns the continuation cells after it.
            x += cells;
        }

        if C::ENABLED {
            out.push_spaces(self.width.saturating_sub(col))?;
        }

        out.push(b'\n')?;
        Ok(())
    }
}

// ─── Entry points ───────────────────────────────────────────────────────────

/// Dump `doc` to `dest` using the 64 KB default buffer.
///
/// # Errors
///
/// [`DumpError::Write`](crate::DumpError::Write) on the first failed write.
/// `dest` may then hold a truncated document.
pub fn dump_document<W: Write>(
    doc: &Document,
    dest: &mut W,
    config: &DumpConfig,
) -> Result<DumpStats> {
    dump_document_buffered(doc, dest, config, DEFAULT_CAPACITY)
}

/// Dump `doc` to `dest`, flushing every `capacity` bytes.
///
/// # Errors
///
/// See [`dump_document`].
pub fn dump_document_buffered<W: Write>(
    doc: &Document,
    dest: &mut W,
    config: &DumpConfig,
    capacity: usize,
) -> Result<DumpStats> {
    log::debug!(
        "dumping {} rows: width {}, {:?}, {:?}",
        doc.height(),
        config.width,
        config.color_mode,
        config.charset
    );
    let stats = match config.color_mode {
        ColorMode::None => with_charset::<W, Mono>(doc, dest, config, capacity),
        ColorMode::Ansi16 => with_charset::<W, Color16>(doc, dest, config, capacity),
        ColorMode::Ansi256 => with_charset::<W, Color256>(doc, dest, config, capacity),
        ColorMode::TrueColor => with_charset::<W, TrueColor>(doc, dest, config, capacity),
    }?;
    log::debug!(
        "dump done: {} bytes, {} color changes",
        stats.bytes_written,
        stats.color_changes
    );
    Ok(stats)
}

fn with_charset<W: Write, C: ColorTracker>(
    doc: &Document,
    dest: &mut W,
    config: &DumpConfig,
    capacity: usize,
) -> Result<DumpStats> {
    match config.charset {
        OutputCharset::SingleByte => {
            dump_with::<W, C, SingleByte>(doc, dest, config.width, capacity)
        }
        OutputCharset::Utf8 => dump_with::<W, C, Utf8>(doc, dest, config.width, capacity),
    }
}

fn dump_with<W: Write, C: ColorTracker, S: Charset>(
    doc: &Document,
    dest: &mut W,
    width: usize,
    capacity: usize,
) -> Result<DumpStats> {
    let mut out = OutputBuffer::with_capacity(dest, capacity);
    let mut serializer = RowSerializer::<C, S>::new(width);
    for row in doc.rows() {
        serializer.write_row(&mut out, row)?;
    }
    let bytes_written = out.finish()?;
    Ok(DumpStats {
        rows: doc.height(),
        bytes_written,
        color_changes: serializer.color_changes(),
    })
}

// ─── Tests ──────────────────────────────────────────────────────────────────
