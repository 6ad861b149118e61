//! # Storage Layer
//!
//! Persistence helpers shared by the writers and the CLI.
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Preferences | TOML | `<config dir>/config.toml` |
//! | Exported maps | Writer-defined | target path given on the command line |
//!
//! ## Concurrency Safety
//!
//! - Built-in writers replace targets atomically (temp file + rename) under
//!   an exclusive `fs2` lock, see [`write_atomic`]
//!
//! ## Key Types
//!
//! - [`Preferences`] - Persistent user settings
//! - [`PreferencesStore`] - Reads and writes `config.toml`

mod atomic;
mod preferences;

pub use atomic::write_atomic;
pub use preferences::{Preferences, PreferencesError, PreferencesStore, PREFERENCES_FILE};
