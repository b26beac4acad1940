// SPDX-License-Identifier: MIT
//
// n-term — Terminal output primitives for n-dump.
//
// The building blocks a document dump is made of: the cell and color model a
// renderer fills in, the SGR escapes for each color mode, the trackers that
// only emit an escape when a color actually changes, the single-byte and
// UTF-8 encoders, the legacy frame-glyph table, and a bounded output buffer
// that treats any short write as fatal. Every byte sent to the destination
// is accounted for. Every escape code is earned.

pub mod ansi;
pub mod cell;
pub mod charset;
pub mod color;
pub mod error;
pub mod frame;
pub mod output;

pub use error::{Error, Result};
