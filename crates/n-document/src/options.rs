//! Dump options — where width, color mode, and charset come from.
//!
//! The dump reads its configuration once, before the first row, through the
//! [`OptionSource`] trait. Anything that can answer "what is the integer
//! value of option X" can drive it: the bundled [`OptionTable`], a config
//! file layer, a test stub.
//!
//! # Options
//!
//! | Name                       | Type    | Default    |
//! |----------------------------|---------|------------|
//! | `document.dump.width`      | integer | 80         |
//! | `document.dump.color_mode` | integer | 0 (none)   |
//! | `document.dump.codepage`   | string  | `us-ascii` |
//!
//! Color modes: 0 = none, 1 = 16 colors, 3 = 256 colors, 4 = true color.
//!
//! # Assignment syntax
//!
//! [`OptionTable::apply`] takes `name=value`. The `document.dump.` prefix
//! may be left off, and color modes may be given by name (`none`, `16`,
//! `256`, `true`).

use std::collections::HashMap;

use n_term::charset::OutputCharset;
use n_term::color::ColorMode;

use crate::error::{DumpError, Result};

/// Target line width.
pub const WIDTH: &str = "document.dump.width";
/// Color mode selector.
pub const COLOR_MODE: &str = "document.dump.color_mode";
/// Output codepage name.
pub const CODEPAGE: &str = "document.dump.codepage";

/// Default target line width.
pub const DEFAULT_WIDTH: usize = 80;
/// Default output codepage.
pub const DEFAULT_CODEPAGE: &str = "us-ascii";

const PREFIX: &str = "document.dump.";

// ─── OptionSource ───────────────────────────────────────────────────────────

/// Read access to configuration values.
pub trait OptionSource {
    /// The integer value of `name`, if set.
    fn int(&self, name: &str) -> Option<i64>;

    /// The string value of `name`, if set. Sources that only know integers
    /// can leave this out.
    fn string(&self, _name: &str) -> Option<&str> {
        None
    }
}

// ─── OptionTable ────────────────────────────────────────────────────────────

/// An in-memory option store, seeded with the defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionTable {
    ints: HashMap<String, i64>,
    strings: HashMap<String, String>,
}

impl OptionTable {
    /// A table holding the default value of every dump option.
    #[must_use]
    pub fn new() -> Self {
        let mut table = Self {
            ints: HashMap::new(),
            strings: HashMap::new(),
        };
        table.set_int(WIDTH, i64::try_from(DEFAULT_WIDTH).unwrap_or(i64::MAX));
        table.set_int(COLOR_MODE, ColorMode::None.option_value());
        table.set_string(CODEPAGE, DEFAULT_CODEPAGE);
        table
    }

    /// Set an integer option.
    pub fn set_int(&mut self, name: &str, value: i64) {
        self.ints.insert(name.to_string(), value);
    }

    /// Set a string option.
    pub fn set_string(&mut self, name: &str, value: &str) {
        self.strings.insert(name.to_string(), value.to_string());
    }

    /// Apply one `name=value` assignment.
    ///
    /// # Errors
    ///
    /// [`DumpError::UnknownOption`] for a name that isn't a dump option or a
    /// missing `=`; [`DumpError::InvalidOption`] for a value of the wrong
    /// shape.
    pub fn apply(&mut self, assignment: &str) -> Result<()> {
        let (name, value) = parse_assignment(assignment)
            .ok_or_else(|| DumpError::UnknownOption(assignment.trim().to_string()))?;
        let name = canonical_name(name);
        let invalid = || DumpError::InvalidOption {
            name: name.clone(),
            value: value.to_string(),
        };

        match name.as_str() {
            WIDTH => {
                let width: i64 = value.parse().map_err(|_| invalid())?;
                if width < 0 {
                    return Err(invalid());
                }
                self.set_int(WIDTH, width);
            }
            COLOR_MODE => {
                let mode = value
                    .parse::<i64>()
                    .ok()
                    .and_then(ColorMode::from_option)
                    .or_else(|| ColorMode::from_name(value))
                    .ok_or_else(invalid)?;
                self.set_int(COLOR_MODE, mode.option_value());
            }
            CODEPAGE => {
                if value.is_empty() {
                    return Err(invalid());
                }
                self.set_string(CODEPAGE, value);
            }
            _ => return Err(DumpError::UnknownOption(name)),
        }
        log::debug!("option {name} = {value}");
        Ok(())
    }
}

impl Default for OptionTable {
    fn default() -> Self {
        Self::new()
    }
}

impl OptionSource for OptionTable {
    fn int(&self, name: &str) -> Option<i64> {
        self.ints.get(name).copied()
    }

    fn string(&self, name: &str) -> Option<&str> {
        self.strings.get(name).map(String::as_str)
    }
}

/// Split `name=value` into trimmed halves.
#[must_use]
pub fn parse_assignment(arg: &str) -> Option<(&str, &str)> {
    let (name, value) = arg.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name, value.trim()))
}

fn canonical_name(name: &str) -> String {
    if name.starts_with(PREFIX) {
        name.to_string()
    } else {
        format!("{PREFIX}{name}")
    }
}

// ─── DumpConfig ─────────────────────────────────────────────────────────────

/// Configuration for one dump, resolved before the first row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DumpConfig {
    /// Rows are padded to this many columns when a color mode is active.
    pub width: usize,
    /// Color granularity.
    pub color_mode: ColorMode,
    /// Output encoding.
    pub charset: OutputCharset,
}

impl DumpConfig {
    /// Read all three settings from `source`, falling back to the defaults
    /// for anything unset.
    ///
    /// # Errors
    ///
    /// [`DumpError::InvalidOption`] for a negative width or an unsupported
    /// color mode number.
    pub fn resolve(source: &impl OptionSource) -> Result<Self> {
        let width = match source.int(WIDTH) {
            Some(value) => usize::try_from(value).map_err(|_| DumpError::InvalidOption {
                name: WIDTH.to_string(),
                value: value.to_string(),
            })?,
            None => DEFAULT_WIDTH,
        };

        let color_mode = match source.int(COLOR_MODE) {
            Some(value) => ColorMode::from_option(value).ok_or_else(|| DumpError::InvalidOption {
                name: COLOR_MODE.to_string(),
                value: value.to_string(),
            })?,
            None => ColorMode::None,
        };

        let charset = source
            .string(CODEPAGE)
            .map_or(OutputCharset::SingleByte, OutputCharset::from_codepage);

        Ok(Self {
            width,
            color_mode,
            charset,
        })
    }
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            color_mode: ColorMode::None,
            charset: OutputCharset::SingleByte,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
