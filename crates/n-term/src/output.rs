// SPDX-License-Identifier: MIT
//
// Output buffering and stateful color emission.
//
// Two components work together to keep a dump small and its I/O cheap:
//
//   OutputBuffer — accumulates bytes in a bounded buffer and hands them to the
//   destination in as few writes as possible. A whole document usually fits,
//   so there's one write at the end; a huge one is written in 64 KB blocks.
//   A short write is fatal and poisons the buffer so nothing further reaches
//   the destination.
//
//   ColorTracker — remembers the color it last emitted and skips the escape
//   when the next cell's color is the same. If every cell of a row is white
//   on black, the row gets exactly one escape at its start and nothing else.
//   The state resets at each row start, so every line sets its own color.
//
// The tracker state only ever holds a color after its escape was appended
// successfully, so "last emitted" is always the truth about the destination.

use std::io::{self, Write};

use crate::ansi;
use crate::color::{CellColor, Rgb};
use crate::error::{Error, Result};

// ─── hard_write ──────────────────────────────────────────────────────────────

/// Write all of `bytes`, looping over partial writes.
///
/// Interrupted writes are retried. A zero-length write ends the attempt with
/// [`Error::ShortWrite`]; any other destination error ends it with
/// [`Error::Destination`], which keeps the OS error as its source.
///
/// # Errors
///
/// Fails when the destination stops accepting bytes before all are written.
pub fn hard_write(w: &mut impl Write, mut bytes: &[u8]) -> Result<()> {
    let expected = bytes.len();
    let mut written = 0;
    while !bytes.is_empty() {
        match w.write(bytes) {
            Ok(0) => return Err(Error::ShortWrite { expected, written }),
            Ok(n) => {
                written += n;
                bytes = &bytes[n..];
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(source) => {
                return Err(Error::Destination {
                    expected,
                    written,
                    source,
                });
            }
        }
    }
    Ok(())
}

// ─── OutputBuffer ────────────────────────────────────────────────────────────

/// Default capacity: 64 KB, well above any single row's worst case.
pub const DEFAULT_CAPACITY: usize = 65_536;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Open,
    Finished,
    Poisoned,
}

/// A bounded byte buffer in front of a borrowed destination.
///
/// Appends never grow the buffer past its capacity: the append that fills it
/// flushes it. [`finish`](Self::finish) flushes the remainder exactly once.
/// If the buffer is dropped without `finish` (a panic unwinding through the
/// dump, say), the drop makes one best-effort flush.
pub struct OutputBuffer<'a, W: Write> {
    dest: &'a mut W,
    buf: Vec<u8>,
    capacity: usize,
    flushed: usize,
    state: State,
}

impl<'a, W: Write> OutputBuffer<'a, W> {
    /// A buffer with the default capacity (64 KB).
    #[must_use]
    pub fn new(dest: &'a mut W) -> Self {
        Self::with_capacity(dest, DEFAULT_CAPACITY)
    }

    /// A buffer that flushes every `capacity` bytes (minimum 1).
    #[must_use]
    pub fn with_capacity(dest: &'a mut W, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            dest,
            buf: Vec::with_capacity(capacity),
            capacity,
            flushed: 0,
            state: State::Open,
        }
    }

    /// Bytes waiting in the buffer.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing is waiting in the buffer.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The pending bytes (for testing and debugging).
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    fn check_open(&self) -> Result<()> {
        match self.state {
            State::Open => Ok(()),
            State::Finished | State::Poisoned => Err(Error::Poisoned),
        }
    }

    /// Append one byte.
    ///
    /// # Errors
    ///
    /// Fails if the buffer is poisoned, or if the append filled the buffer
    /// and the resulting flush was short.
    #[inline]
    pub fn push(&mut self, byte: u8) -> Result<()> {
        self.push_bytes(&[byte])
    }

    /// Append a byte slice, flushing each time the buffer fills.
    ///
    /// # Errors
    ///
    /// See [`push`](Self::push).
    pub fn push_bytes(&mut self, mut bytes: &[u8]) -> Result<()> {
        self.check_open()?;
        while !bytes.is_empty() {
            let room = self.capacity - self.buf.len();
            let (head, tail) = bytes.split_at(room.min(bytes.len()));
            self.buf.extend_from_slice(head);
            bytes = tail;
            if self.buf.len() == self.capacity {
                self.flush_buffer()?;
            }
        }
        Ok(())
    }

    /// Append `count` spaces.
    ///
    /// # Errors
    ///
    /// See [`push`](Self::push).
    pub fn push_spaces(&mut self, count: usize) -> Result<()> {
        for _ in 0..count {
            self.push(b' ')?;
        }
        Ok(())
    }

    /// Hand the pending bytes to the destination.
    fn flush_buffer(&mut self) -> Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        let expected = self.buf.len();
        if let Err(e) = hard_write(self.dest, &self.buf) {
            self.state = State::Poisoned;
            log::warn!("{e}");
            return Err(e);
        }
        log::trace!("flushed {expected} bytes");
        self.flushed += expected;
        self.buf.clear();
        Ok(())
    }

    /// Flush everything still pending and close the buffer.
    ///
    /// Returns the total number of bytes written to the destination.
    ///
    /// # Errors
    ///
    /// Fails on a short write, a failing destination `flush`, or if the
    /// buffer was already poisoned or finished.
    pub fn finish(&mut self) -> Result<usize> {
        self.check_open()?;
        self.flush_buffer()?;
        if let Err(e) = self.dest.flush() {
            self.state = State::Poisoned;
            return Err(e.into());
        }
        self.state = State::Finished;
        Ok(self.flushed)
    }
}

impl<W: Write> Write for OutputBuffer<'_, W> {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.push_bytes(buf).map_err(io::Error::other)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // Intentionally a no-op. Flushing happens when the buffer fills
        // and in finish().
        Ok(())
    }
}

impl<W: Write> Drop for OutputBuffer<'_, W> {
    fn drop(&mut self) {
        if self.state == State::Open && !self.buf.is_empty() {
            if let Err(e) = self.flush_buffer() {
                log::warn!("dropping unfinished output buffer: {e}");
            }
        }
    }
}

// ─── ColorTracker ────────────────────────────────────────────────────────────

/// Per-mode color state: compare a cell's color with what was last emitted
/// and write an escape only on change.
///
/// Implementations hold values, never references into the grid, so equality
/// is by value.
pub trait ColorTracker: Default {
    /// Whether this mode emits color at all. Monochrome dumps skip the
    /// tracker and the right-margin padding.
    const ENABLED: bool;

    /// Forget the last-emitted color so the next cell re-establishes it.
    fn begin_row(&mut self);

    /// Emit whatever escapes `color` needs. Returns how many were written.
    ///
    /// # Errors
    ///
    /// Propagates output buffer failures.
    fn apply<W: Write>(
        &mut self,
        out: &mut OutputBuffer<'_, W>,
        color: CellColor,
    ) -> Result<usize>;
}

/// No color: glyphs only.
#[derive(Debug, Default)]
pub struct Mono;

impl ColorTracker for Mono {
    const ENABLED: bool = false;

    fn begin_row(&mut self) {}

    fn apply<W: Write>(
        &mut self,
        _out: &mut OutputBuffer<'_, W>,
        _color: CellColor,
    ) -> Result<usize> {
        Ok(0)
    }
}

/// 16 colors: one packed byte, one combined escape.
#[derive(Debug, Default)]
pub struct Color16 {
    last: Option<u8>,
}

impl ColorTracker for Color16 {
    const ENABLED: bool = true;

    fn begin_row(&mut self) {
        self.last = None;
    }

    fn apply<W: Write>(
        &mut self,
        out: &mut OutputBuffer<'_, W>,
        color: CellColor,
    ) -> Result<usize> {
        let packed = color.to_packed16();
        if self.last == Some(packed) {
            return Ok(0);
        }
        ansi::color16(out, packed)?;
        self.last = Some(packed);
        Ok(1)
    }
}

/// 256 colors: foreground and background tracked independently.
#[derive(Debug, Default)]
#[allow(clippy::struct_field_names)] // The `last_` prefix IS the semantic grouping.
pub struct Color256 {
    last_fg: Option<u8>,
    last_bg: Option<u8>,
}

impl ColorTracker for Color256 {
    const ENABLED: bool = true;

    fn begin_row(&mut self) {
        self.last_fg = None;
        self.last_bg = None;
    }

    fn apply<W: Write>(
        &mut self,
        out: &mut OutputBuffer<'_, W>,
        color: CellColor,
    ) -> Result<usize> {
        let (fg, bg) = color.to_indexed();
        let mut emitted = 0;
        if self.last_fg != Some(fg) {
            ansi::fg256(out, fg)?;
            self.last_fg = Some(fg);
            emitted += 1;
        }
        if self.last_bg != Some(bg) {
            ansi::bg256(out, bg)?;
            self.last_bg = Some(bg);
            emitted += 1;
        }
        Ok(emitted)
    }
}

/// 24-bit color: each triple compared byte for byte.
#[derive(Debug, Default)]
#[allow(clippy::struct_field_names)]
pub struct TrueColor {
    last_fg: Option<Rgb>,
    last_bg: Option<Rgb>,
}

impl ColorTracker for TrueColor {
    const ENABLED: bool = true;

    fn begin_row(&mut self) {
        self.last_fg = None;
        self.last_bg = None;
    }

    fn apply<W: Write>(
        &mut self,
        out: &mut OutputBuffer<'_, W>,
        color: CellColor,
    ) -> Result<usize> {
        let (fg, bg) = color.to_rgb();
        let mut emitted = 0;
        if self.last_fg != Some(fg) {
            ansi::fg_rgb(out, fg)?;
            self.last_fg = Some(fg);
            emitted += 1;
        }
        if self.last_bg != Some(bg) {
            ansi::bg_rgb(out, bg)?;
            self.last_bg = Some(bg);
            emitted += 1;
        }
        Ok(emitted)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// A destination that accepts at most `limit` bytes in total.
    struct Limited {
        data: Vec<u8>,
        limit: usize,
        calls: usize,
    }

    impl Limited {
        fn new(limit: usize) -> Self {
            Self {
                data: Vec::new(),
                limit,
                calls: 0,
            }
        }
    }

    impl Write for Limited {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.calls += 1;
            let n = buf.len().min(self.limit - self.data.len());
            self.data.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// A destination that fails its first `failures` writes with `kind`,
    /// then accepts everything.
    struct Failing {
        data: Vec<u8>,
        kind: io::ErrorKind,
        failures: usize,
        calls: usize,
    }

    impl Failing {
        fn new(kind: io::ErrorKind, failures: usize) -> Self {
            Self {
                data: Vec::new(),
                kind,
                failures,
                calls: 0,
            }
        }
    }

    impl Write for Failing {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.calls += 1;
            if self.calls <= self.failures {
                return Err(io::Error::new(self.kind, "pipe closed"));
            }
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// A destination that takes at most two bytes per call.
    struct Trickle(Vec<u8>);

    impl Write for Trickle {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let n = buf.len().min(2);
            self.0.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn tracked<T: ColorTracker>(colors: &[CellColor]) -> (String, usize) {
        let mut dest = Vec::new();
        let mut out = OutputBuffer::new(&mut dest);
        let mut tracker = T::default();
        let mut count = 0;
        for &color in colors {
            count += tracker.apply(&mut out, color).unwrap();
        }
        out.finish().unwrap();
        drop(out);
        (String::from_utf8(dest).unwrap(), count)
    }

    // ── hard_write ──────────────────────────────────────────────────────

    #[test]
    fn hard_write_loops_over_partial_writes() {
        let mut dest = Trickle(Vec::new());
        hard_write(&mut dest, b"hello").unwrap();
        assert_eq!(dest.0, b"hello");
    }

    #[test]
    fn hard_write_reports_short_count() {
        let mut dest = Limited::new(3);
        assert!(matches!(
            hard_write(&mut dest, b"hello"),
            Err(Error::ShortWrite {
                expected: 5,
                written: 3
            })
        ));
    }

    #[test]
    fn hard_write_retries_interrupted() {
        let mut dest = Failing::new(io::ErrorKind::Interrupted, 2);
        hard_write(&mut dest, b"ok").unwrap();
        assert_eq!(dest.data, b"ok");
    }

    #[test]
    fn destination_error_is_kept_as_source() {
        let mut dest = Failing::new(io::ErrorKind::BrokenPipe, usize::MAX);
        let mut out = OutputBuffer::new(&mut dest);
        out.push_bytes(b"hello").unwrap();
        let err = out.finish().unwrap_err();
        assert!(matches!(
            &err,
            Error::Destination {
                expected: 5,
                written: 0,
                source,
            } if source.kind() == io::ErrorKind::BrokenPipe
        ));
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("pipe closed"));
        assert!(matches!(out.push(b'!'), Err(Error::Poisoned)));
        drop(out);
        assert_eq!(dest.calls, 1);
    }

    // ── OutputBuffer ────────────────────────────────────────────────────

    #[test]
    fn new_buffer_is_empty() {
        let mut dest = Vec::new();
        let out = OutputBuffer::new(&mut dest);
        assert!(out.is_empty());
        assert_eq!(out.len(), 0);
    }

    #[test]
    fn nothing_reaches_destination_before_finish() {
        let mut dest = Vec::new();
        {
            let mut out = OutputBuffer::new(&mut dest);
            out.push_bytes(b"frame data").unwrap();
            assert_eq!(out.as_bytes(), b"frame data");
            assert_eq!(out.finish().unwrap(), 10);
        }
        assert_eq!(dest, b"frame data");
    }

    #[test]
    fn full_buffer_flushes_early() {
        let mut dest = Vec::new();
        let mut out = OutputBuffer::with_capacity(&mut dest, 4);
        out.push_bytes(b"abcdef").unwrap();
        assert_eq!(out.as_bytes(), b"ef");
        assert_eq!(out.finish().unwrap(), 6);
        drop(out);
        assert_eq!(dest, b"abcdef");
    }

    #[test]
    fn write_trait_appends() {
        let mut dest = Vec::new();
        let mut out = OutputBuffer::new(&mut dest);
        write!(out, "hello {}", 42).unwrap();
        assert_eq!(out.as_bytes(), b"hello 42");
    }

    #[test]
    fn push_spaces_appends_spaces() {
        let mut dest = Vec::new();
        let mut out = OutputBuffer::new(&mut dest);
        out.push_spaces(3).unwrap();
        out.push(b'x').unwrap();
        assert_eq!(out.as_bytes(), b"   x");
    }

    #[test]
    fn short_write_fails_and_poisons() {
        let mut dest = Limited::new(3);
        let mut out = OutputBuffer::new(&mut dest);
        out.push_bytes(b"hello").unwrap();
        let err = out.finish().unwrap_err();
        assert!(matches!(
            err,
            Error::ShortWrite {
                expected: 5,
                written: 3
            }
        ));
        assert!(matches!(out.push(b'!'), Err(Error::Poisoned)));
        assert!(matches!(out.finish(), Err(Error::Poisoned)));
        drop(out);
        // One write attempt made it through (partially); nothing after.
        assert_eq!(dest.data, b"hel");
        assert_eq!(dest.calls, 2);
    }

    #[test]
    fn short_write_through_write_trait_keeps_kind() {
        let mut dest = Limited::new(1);
        let mut out = OutputBuffer::with_capacity(&mut dest, 2);
        let err: Error = write!(out, "abc").unwrap_err().into();
        assert!(matches!(err, Error::ShortWrite { .. }));
    }

    #[test]
    fn finish_twice_is_an_error() {
        let mut dest = Vec::new();
        let mut out = OutputBuffer::new(&mut dest);
        out.finish().unwrap();
        assert!(out.finish().is_err());
    }

    #[test]
    fn drop_flushes_unfinished_buffer() {
        let mut dest = Vec::new();
        {
            let mut out = OutputBuffer::new(&mut dest);
            out.push_bytes(b"partial").unwrap();
        }
        assert_eq!(dest, b"partial");
    }

    // ── ColorTracker ────────────────────────────────────────────────────

    #[test]
    fn mono_never_emits() {
        let (out, count) = tracked::<Mono>(&[CellColor::DEFAULT, CellColor::ansi16(1, 2)]);
        assert_eq!(out, "");
        assert_eq!(count, 0);
    }

    #[test]
    fn color16_skips_repeats() {
        let white = CellColor::ansi16(7, 0);
        let (out, count) = tracked::<Color16>(&[white, white, white]);
        assert_eq!(out, "\x1b[0;37m");
        assert_eq!(count, 1);
    }

    #[test]
    fn color16_emits_on_change() {
        let (out, count) =
            tracked::<Color16>(&[CellColor::ansi16(7, 0), CellColor::ansi16(1, 4)]);
        assert_eq!(out, "\x1b[0;37m\x1b[0;31;44m");
        assert_eq!(count, 2);
    }

    #[test]
    fn color256_tracks_channels_independently() {
        let (out, count) = tracked::<Color256>(&[
            CellColor::indexed(10, 20),
            CellColor::indexed(10, 21), // bg only
            CellColor::indexed(11, 21), // fg only
            CellColor::indexed(11, 21), // nothing
        ]);
        assert_eq!(
            out,
            "\x1b[38;5;10m\x1b[48;5;20m\x1b[48;5;21m\x1b[38;5;11m"
        );
        assert_eq!(count, 4);
    }

    #[test]
    fn true_color_compares_exact_bytes() {
        let a = CellColor::rgb(Rgb(1, 2, 3), Rgb::BLACK);
        let b = CellColor::rgb(Rgb(1, 2, 4), Rgb::BLACK);
        let (out, count) = tracked::<TrueColor>(&[a, a, b]);
        assert_eq!(
            out,
            "\x1b[38;2;1;2;3m\x1b[48;2;0;0;0m\x1b[38;2;1;2;4m"
        );
        assert_eq!(count, 3);
    }

    #[test]
    fn begin_row_forces_re_emit() {
        let mut dest = Vec::new();
        let mut out = OutputBuffer::new(&mut dest);
        let mut tracker = Color16::default();
        let white = CellColor::DEFAULT;
        assert_eq!(tracker.apply(&mut out, white).unwrap(), 1);
        assert_eq!(tracker.apply(&mut out, white).unwrap(), 0);
        tracker.begin_row();
        assert_eq!(tracker.apply(&mut out, white).unwrap(), 1);
    }

    #[test]
    fn failed_emit_leaves_state_untouched() {
        let mut dest = Limited::new(0);
        let mut out = OutputBuffer::with_capacity(&mut dest, 1);
        let mut tracker = Color16::default();
        assert!(tracker.apply(&mut out, CellColor::DEFAULT).is_err());
        assert_eq!(tracker.last, None);
    }
}
