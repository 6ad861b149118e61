//! # Plugin System
//!
//! Output formats are provided by writers behind the [`MapWriter`] trait.
//!
//! ## Writer Sources
//!
//! | Source | Location | Examples |
//! |--------|----------|----------|
//! | Built-in | compiled in | `tmx`, `json`, `csv` |
//! | Plugin | `mapeditor-writer-{name}` executables | `mapeditor-writer-lua` |
//!
//! ## Plugin Discovery
//!
//! Plugins are discovered in two locations:
//! 1. Plugin directories (`--plugin-dir`, then `plugin_dirs` in preferences)
//! 2. `$PATH` - System-wide plugins
//!
//! ## Protocol
//!
//! ```text
//! CLI                              Plugin Binary
//!  │                                   │
//!  ├── Spawn: mapeditor-writer-lua --manifest
//!  │   Stdout: {"name": "lua", "version": "0.1.0", "name_filters": ["Lua files (*.lua)"]}
//!  │                                   │
//!  ├── Spawn: mapeditor-writer-lua     │
//!  ├── Stdin: {"operation": "write", "params": {"target": "...", "map": {...}}}
//!  └── Stdout: {"success": true}
//! ```
//!
//! The plugin must exit with status 0; a reply followed by a failing exit
//! status counts as a failed write. Plugin stderr is passed through.
//!
//! ## Key Types
//!
//! - [`MapWriter`] - One output format
//! - [`WriterRegistry`] - The writers available to an export
//! - [`PluginLoader`] - Discovers and executes plugins
//! - [`ExternalWriter`] - A [`MapWriter`] backed by a plugin

mod builtin;
mod external;
mod loader;
mod protocol;
mod registry;
mod writer;

pub use builtin::{builtin_writers, CsvWriter, JsonWriter, TmxWriter};
pub use external::ExternalWriter;
pub use loader::{PluginInfo, PluginLoader, PLUGIN_PREFIX};
pub use protocol::{PluginManifest, PluginRequest, PluginResponse};
pub use registry::{SkippedPlugin, WriterRegistry};
pub use writer::{MapWriter, WriteError};
