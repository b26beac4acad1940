// SPDX-License-Identifier: MIT
//
// n-dump — write a document to stdout as plain or colored text.
//
// This is the binary that wires the crates together:
//
//   n-document → grid, options, row serializer
//   n-term     → cells, colors, escapes, charsets, buffered output
//
// Input is plain text from a file or stdin, laid out by the document's
// minimal text renderer. The dump itself is the same one a full renderer
// would call:
//
//   args → OptionTable → DumpConfig ─┐
//   text → Document::from_text ──────┴→ dump_document → stdout
//
// Logging goes to stderr through env_logger; set RUST_LOG=debug to see it.

use std::env;
use std::fs;
use std::io::{self, Read};
use std::process;

use n_document::{Document, DumpConfig, DumpError, OptionTable, dump_document};
use n_term::color::CellColor;
use thiserror::Error;

const USAGE: &str = "\
usage: n-dump [options] [FILE]

Dump FILE (or stdin) to stdout.

options:
  -w, --width N          pad colored rows to N columns (default 80)
  -c, --color MODE       none, 16, 256, or true (default none)
  -e, --codepage NAME    output codepage; utf-8 for UTF-8 (default us-ascii)
  -o, --option NAME=VAL  set any document.dump.* option
      --fg N             foreground palette index for the text (0-255)
      --bg N             background palette index for the text (0-255)
  -h, --help             show this help";

// ─── Errors ─────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error("{path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Dump(#[from] DumpError),
}

// ─── Arguments ──────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct Args {
    options: OptionTable,
    fg: Option<u8>,
    bg: Option<u8>,
    path: Option<String>,
    help: bool,
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, CliError> {
        let mut parsed = Self::default();

        while let Some(arg) = args.next() {
            let mut value = |flag: &str| {
                args.next()
                    .ok_or_else(|| CliError::Usage(format!("{flag} needs a value")))
            };
            match arg.as_str() {
                "-h" | "--help" => parsed.help = true,
                "-w" | "--width" => parsed.options.apply(&format!("width={}", value(&arg)?))?,
                "-c" | "--color" => parsed.options.apply(&format!("color_mode={}", value(&arg)?))?,
                "-e" | "--codepage" => parsed.options.apply(&format!("codepage={}", value(&arg)?))?,
                "-o" | "--option" => parsed.options.apply(&value(&arg)?)?,
                "--fg" => parsed.fg = Some(palette_index(&arg, &value(&arg)?)?),
                "--bg" => parsed.bg = Some(palette_index(&arg, &value(&arg)?)?),
                "-" => parsed.set_path(arg)?,
                flag if flag.starts_with('-') => {
                    return Err(CliError::Usage(format!("unknown option {flag}")));
                }
                _ => parsed.set_path(arg)?,
            }
        }

        Ok(parsed)
    }

    fn set_path(&mut self, path: String) -> Result<(), CliError> {
        if self.path.is_some() {
            return Err(CliError::Usage("only one input file is allowed".to_string()));
        }
        self.path = Some(path);
        Ok(())
    }

    /// The color every cell of the text gets.
    fn text_color(&self) -> CellColor {
        match (self.fg, self.bg) {
            (None, None) => CellColor::DEFAULT,
            (fg, bg) => CellColor::indexed(fg.unwrap_or(7), bg.unwrap_or(0)),
        }
    }
}

fn palette_index(flag: &str, value: &str) -> Result<u8, CliError> {
    value
        .parse()
        .map_err(|_| CliError::Usage(format!("{flag}: {value:?} is not a palette index (0-255)")))
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn read_input(path: Option<&str>) -> Result<String, CliError> {
    let bytes = match path {
        None | Some("-") => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf).map_err(|source| CliError::Read {
                path: "<stdin>".to_string(),
                source,
            })?;
            buf
        }
        Some(path) => fs::read(path).map_err(|source| CliError::Read {
            path: path.to_string(),
            source,
        })?,
    };
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn run() -> Result<(), CliError> {
    let args = Args::parse(env::args().skip(1))?;
    if args.help {
        println!("{USAGE}");
        return Ok(());
    }

    let config = DumpConfig::resolve(&args.options)?;
    let text = read_input(args.path.as_deref())?;
    let doc = Document::from_text(&text, args.text_color());
    log::debug!("read {} bytes into {doc:?}", text.len());

    let stdout = io::stdout();
    let mut dest = stdout.lock();
    let stats = dump_document(&doc, &mut dest, &config)?;
    log::info!(
        "wrote {} rows, {} bytes, {} color changes",
        stats.rows,
        stats.bytes_written,
        stats.color_changes
    );
    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("n-dump: {e}");
        if matches!(e, CliError::Usage(_)) {
            eprintln!("\n{USAGE}");
        }
        process::exit(1);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
