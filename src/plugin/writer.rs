//! Map writer capability
//!
//! A writer serializes a [`Map`] to one output format. Writers advertise
//! the files they accept through name filters such as
//! `"Tiled map files (*.tmx)"`.

use std::path::Path;

use thiserror::Error;

use crate::domain::Map;
use crate::format::EncodeError;

#[derive(Debug, Error)]
pub enum WriteError {
    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error("Failed to write {}: {source}", .path.display())]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Plugin '{plugin}' failed: {message}")]
    Plugin { plugin: String, message: String },
}

/// A registered output format
pub trait MapWriter {
    /// Short identifier, used to disable the writer in preferences
    fn name(&self) -> &str;

    /// Name filters describing the files this writer produces
    fn name_filters(&self) -> Vec<String>;

    /// Writes the map to `path`
    fn write(&self, map: &Map, path: &Path) -> Result<(), WriteError>;
}

impl std::fmt::Debug for dyn MapWriter + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapWriter")
            .field("name", &self.name())
            .field("name_filters", &self.name_filters())
            .finish()
    }
}
