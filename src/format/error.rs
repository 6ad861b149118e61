//! Codec errors

use std::path::PathBuf;

use thiserror::Error;

/// Why a map file could not be turned into a [`crate::domain::Map`]
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed XML: {0}")]
    Xml(String),

    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid map: {0}")]
    Invalid(String),

    #[error("Unsupported map feature: {0}")]
    Unsupported(String),
}

/// Why a map could not be encoded into a target format
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("XML encoding failed: {0}")]
    Xml(String),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Map has no tile layers to export")]
    NoTileLayers,
}
