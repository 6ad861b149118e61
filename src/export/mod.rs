//! # Headless Export
//!
//! Converts one map file into another format without starting the editor.
//!
//! ```text
//! positional args ──► resolve() ──► Resolution { source, target, writer }
//!                                        │
//!                   MapReader ◄── ExportPipeline::run ──► MapWriter::write
//! ```
//!
//! ## Key Types
//!
//! - [`resolve`] - Picks exactly one writer from the registry
//! - [`ExportPipeline`] - Loads, writes and releases the map
//! - [`ExportError`] - Every user-facing failure, all exiting with 1

mod error;
mod pipeline;
mod resolver;

pub use error::ExportError;
pub use pipeline::{ExportPipeline, ExportSummary};
pub use resolver::{complete_suffix, resolve, Resolution};
