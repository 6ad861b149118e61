//! Writers backed by plugin executables

use std::path::{Path, PathBuf};

use anyhow::Result;

use super::loader::{PluginInfo, PluginLoader};
use super::protocol::{PluginManifest, PluginRequest};
use super::writer::{MapWriter, WriteError};
use crate::domain::Map;
use crate::format::EncodeError;

/// A writer plugin, described by its manifest
#[derive(Debug, Clone)]
pub struct ExternalWriter {
    manifest: PluginManifest,
    path: PathBuf,
}

impl ExternalWriter {
    /// Loads the manifest of a discovered plugin
    pub fn load(info: &PluginInfo) -> Result<Self> {
        let manifest = PluginLoader::load_manifest(&info.path)?;
        Ok(Self::new(manifest, info.path.clone()))
    }

    pub fn new(manifest: PluginManifest, path: impl Into<PathBuf>) -> Self {
        Self {
            manifest,
            path: path.into(),
        }
    }

    fn failure(&self, message: impl Into<String>) -> WriteError {
        WriteError::Plugin {
            plugin: self.manifest.name.clone(),
            message: message.into(),
        }
    }
}

impl MapWriter for ExternalWriter {
    fn name(&self) -> &str {
        &self.manifest.name
    }

    fn name_filters(&self) -> Vec<String> {
        self.manifest.name_filters.clone()
    }

    fn write(&self, map: &Map, path: &Path) -> Result<(), WriteError> {
        let map_json = serde_json::to_value(map).map_err(EncodeError::from)?;
        let request = PluginRequest::new(
            "write",
            serde_json::json!({
                "target": path.display().to_string(),
                "map": map_json,
            }),
        );

        let response = PluginLoader::invoke(&self.path, &request)
            .map_err(|e| self.failure(format!("{:#}", e)))?;

        if !response.success {
            return Err(self.failure(
                response.error.unwrap_or_else(|| "Unknown error".to_string()),
            ));
        }

        Ok(())
    }
}
