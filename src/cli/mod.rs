//! # Command-Line Interface
//!
//! Flags, output formatting and the startup sequence.
//!
//! ## Flags
//!
//! | Flag | Effect |
//! |------|--------|
//! | `-v`, `--version` | Print name and version, then quit |
//! | `--quit` | Quit right after parsing (argument check) |
//! | `--disable-opengl` | Persist `use_opengl = false` in preferences |
//! | `--export-map` | Export `[format] <source> <target>` and exit |
//! | `--list-formats` | List registered writers |
//!
//! ## Exit Codes
//!
//! - `0` - success, help, version and `--quit`
//! - `1` - export failures and unexpected errors
//! - `2` - malformed arguments
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the requested action.

mod app;
mod command;
mod export_cmd;
mod formats_cmd;
mod output;

pub use app::{run, run_from, APP_NAME};
pub use command::{parse, CommandError, ParsedCommand};
pub use output::{Output, OutputFormat};
