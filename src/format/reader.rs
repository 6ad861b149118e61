//! Map readers

use std::fs;
use std::path::Path;

use super::error::ReadError;
use super::{json, tmx};
use crate::domain::Map;

/// Turns a file on disk into a [`Map`]
pub trait MapReader {
    fn read_map(&self, path: &Path) -> Result<Map, ReadError>;
}

/// Reads `*.json` maps as JSON and everything else as TMX
#[derive(Debug, Clone, Copy, Default)]
pub struct FileMapReader;

impl FileMapReader {
    pub fn new() -> Self {
        Self
    }

    fn is_json(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false)
    }
}

impl MapReader for FileMapReader {
    fn read_map(&self, path: &Path) -> Result<Map, ReadError> {
        let bytes = fs::read(path).map_err(|source| ReadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if Self::is_json(path) {
            json::read_json(&bytes)
        } else {
            tmx::read_tmx(&bytes)
        }
    }
}
