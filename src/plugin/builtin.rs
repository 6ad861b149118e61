//! Built-in writers (no plugin binary required)

use std::path::Path;

use super::writer::{MapWriter, WriteError};
use crate::domain::Map;
use crate::format::{self, EncodeError};
use crate::storage::write_atomic;

fn encode_to(path: &Path, encoded: Result<Vec<u8>, EncodeError>) -> Result<(), WriteError> {
    let bytes = encoded?;
    write_atomic(path, &bytes).map_err(|source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes TMX documents
#[derive(Debug, Default)]
pub struct TmxWriter;

impl MapWriter for TmxWriter {
    fn name(&self) -> &str {
        "tmx"
    }

    fn name_filters(&self) -> Vec<String> {
        vec!["Tiled map files (*.tmx)".to_string()]
    }

    fn write(&self, map: &Map, path: &Path) -> Result<(), WriteError> {
        encode_to(path, format::write_tmx(map))
    }
}

/// Writes JSON documents
#[derive(Debug, Default)]
pub struct JsonWriter;

impl MapWriter for JsonWriter {
    fn name(&self) -> &str {
        "json"
    }

    fn name_filters(&self) -> Vec<String> {
        vec!["Json files (*.json)".to_string()]
    }

    fn write(&self, map: &Map, path: &Path) -> Result<(), WriteError> {
        encode_to(path, format::write_json(map))
    }
}

/// Writes the tile layers as CSV
#[derive(Debug, Default)]
pub struct CsvWriter;

impl MapWriter for CsvWriter {
    fn name(&self) -> &str {
        "csv"
    }

    fn name_filters(&self) -> Vec<String> {
        vec!["CSV files (*.csv)".to_string()]
    }

    fn write(&self, map: &Map, path: &Path) -> Result<(), WriteError> {
        encode_to(path, format::write_csv(map))
    }
}

/// Returns the built-in writers in registration order
pub fn builtin_writers() -> Vec<Box<dyn MapWriter>> {
    vec![Box::new(TmxWriter), Box::new(JsonWriter), Box::new(CsvWriter)]
}
