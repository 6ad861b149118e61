//! User preferences
//!
//! Preferences are stored in `config.toml` inside the preferences directory:
//! `--config-dir`, `$MAPEDITOR_CONFIG_DIR`, or the platform config directory
//! (e.g. `~/.config/mapeditor/config.toml`).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File name of the preferences file inside the preferences directory
pub const PREFERENCES_FILE: &str = "config.toml";

#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("Could not determine the preferences directory")]
    NoConfigDir,

    #[error("Failed to parse preferences: {0}")]
    Parse(String),
}

/// Persistent user preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Use hardware accelerated rendering in the editor
    pub use_opengl: bool,

    /// Extra directories searched for writer plugins
    pub plugin_dirs: Vec<PathBuf>,

    /// Writer names that must not be registered
    pub disabled_plugins: Vec<String>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            use_opengl: true,
            plugin_dirs: Vec::new(),
            disabled_plugins: Vec::new(),
        }
    }
}

impl Preferences {
    /// Returns true if the writer with this name has been disabled
    pub fn is_disabled(&self, writer_name: &str) -> bool {
        self.disabled_plugins
            .iter()
            .any(|name| name.eq_ignore_ascii_case(writer_name))
    }
}

/// Loads and saves [`Preferences`] in a directory
#[derive(Debug, Clone)]
pub struct PreferencesStore {
    path: PathBuf,
}

impl PreferencesStore {
    /// Creates a store for `config.toml` in the given directory
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(PREFERENCES_FILE),
        }
    }

    /// Creates a store in the platform config directory
    pub fn platform_default() -> Result<Self> {
        let dirs = ProjectDirs::from("org", "mapeditor", "mapeditor")
            .ok_or(PreferencesError::NoConfigDir)?;
        Ok(Self::in_dir(dirs.config_dir()))
    }

    /// Creates a store for an explicit directory, or the platform default
    pub fn resolve(dir: Option<&Path>) -> Result<Self> {
        match dir {
            Some(dir) => Ok(Self::in_dir(dir)),
            None => Self::platform_default(),
        }
    }

    /// Returns the path of the preferences file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads preferences, falling back to defaults when the file is missing
    pub fn load(&self) -> Result<Preferences> {
        if !self.path.exists() {
            return Ok(Preferences::default());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read preferences: {}", self.path.display()))?;

        toml::from_str(&content)
            .map_err(|e| PreferencesError::Parse(e.to_string()))
            .with_context(|| format!("Failed to load preferences: {}", self.path.display()))
    }

    /// Saves preferences, creating the directory if needed
    pub fn save(&self, preferences: &Preferences) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).with_context(|| {
                format!("Failed to create preferences directory: {}", dir.display())
            })?;
        }

        let content =
            toml::to_string_pretty(preferences).context("Failed to serialize preferences")?;

        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write preferences: {}", self.path.display()))
    }
}
