//! Map editor - headless export for tile maps
//!
//! Converts a map file into another format without starting the editor.
//! The output format is chosen among the registered writers, either by an
//! explicit format filter or by the target file's complete suffix.

pub mod domain;
pub mod format;
pub mod storage;
pub mod plugin;
pub mod export;
pub mod cli;

pub use domain::{Layer, Map, Tileset};
pub use export::{resolve, ExportError, ExportPipeline};
pub use plugin::{MapWriter, WriterRegistry};
