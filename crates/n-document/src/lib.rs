//! n-document — the document grid and its dump serializer.
//!
//! A renderer fills a [`Document`] with cells; [`dump_document`] writes it
//! to any `io::Write` as plain or colored text. Configuration comes from an
//! [`OptionSource`] resolved into a [`DumpConfig`] before the first row.
//!
//! ```
//! use n_document::{Document, DumpConfig, dump_document};
//! use n_term::color::CellColor;
//!
//! let doc = Document::from_text("hello\nworld", CellColor::DEFAULT);
//! let mut out = Vec::new();
//! dump_document(&doc, &mut out, &DumpConfig::default()).unwrap();
//! assert_eq!(out, b"hello\nworld\n");
//! ```

pub mod document;
pub mod error;
pub mod options;
pub mod serializer;

pub use document::Document;
pub use error::{DumpError, Result};
pub use options::{DumpConfig, OptionSource, OptionTable};
pub use serializer::{DumpStats, RowSerializer, dump_document, dump_document_buffered};
