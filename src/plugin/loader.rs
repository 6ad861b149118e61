//! Plugin discovery and loading
//!
//! Writer plugins are executables named `mapeditor-writer-*`, discovered from:
//! 1. The configured plugin directories, in order
//! 2. PATH

use std::collections::BTreeMap;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use anyhow::{Context, Result};

use super::protocol::{PluginManifest, PluginRequest, PluginResponse};

/// File name prefix of writer plugin executables
pub const PLUGIN_PREFIX: &str = "mapeditor-writer-";

/// Information about a discovered plugin
#[derive(Debug, Clone)]
pub struct PluginInfo {
    /// Executable file name
    pub name: String,

    /// Path to the plugin executable
    pub path: PathBuf,
}

/// Plugin loader and executor
pub struct PluginLoader {
    /// Discovered plugins, ordered by name
    plugins: BTreeMap<String, PluginInfo>,

    /// Plugin directories searched before PATH
    plugin_dirs: Vec<PathBuf>,

    /// Whether PATH is searched
    search_path: bool,
}

impl PluginLoader {
    /// Creates a new plugin loader
    pub fn new() -> Self {
        Self {
            plugins: BTreeMap::new(),
            plugin_dirs: Vec::new(),
            search_path: true,
        }
    }

    /// Adds a plugin directory to search
    pub fn add_plugin_dir(&mut self, dir: impl Into<PathBuf>) {
        self.plugin_dirs.push(dir.into());
    }

    /// Enables or disables searching PATH
    pub fn search_path(&mut self, enabled: bool) {
        self.search_path = enabled;
    }

    /// Discovers all available plugins
    pub fn discover(&mut self) -> Result<()> {
        self.plugins.clear();

        for dir in &self.plugin_dirs.clone() {
            self.scan_directory(dir)?;
        }

        if self.search_path {
            if let Ok(path_var) = std::env::var("PATH") {
                for dir in std::env::split_paths(&path_var) {
                    self.scan_directory(&dir)?;
                }
            }
        }

        Ok(())
    }

    /// Scans a directory for plugins
    fn scan_directory(&mut self, dir: &Path) -> Result<()> {
        if !dir.is_dir() {
            return Ok(());
        }

        let entries = match std::fs::read_dir(dir) {
            Ok(e) => e,
            Err(_) => return Ok(()), // Ignore unreadable directories
        };

        for entry in entries.flatten() {
            let path = entry.path();

            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if name.starts_with(PLUGIN_PREFIX) && Self::is_executable(&path) {
                    // First found wins
                    self.plugins
                        .entry(name.to_string())
                        .or_insert_with(|| PluginInfo {
                            name: name.to_string(),
                            path: path.clone(),
                        });
                }
            }
        }

        Ok(())
    }

    /// Checks if a file is executable
    fn is_executable(path: &Path) -> bool {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Ok(meta) = path.metadata() {
                return meta.is_file() && meta.permissions().mode() & 0o111 != 0;
            }
        }

        #[cfg(windows)]
        {
            if let Some(ext) = path.extension() {
                return ext == "exe" || ext == "bat" || ext == "cmd";
            }
        }

        false
    }

    /// Lists all discovered plugins, ordered by name
    pub fn list(&self) -> Vec<&PluginInfo> {
        self.plugins.values().collect()
    }

    /// Loads the manifest from a plugin
    pub fn load_manifest(path: &Path) -> Result<PluginManifest> {
        let output = Command::new(path)
            .arg("--manifest")
            .output()
            .with_context(|| format!("Failed to execute plugin: {}", path.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Plugin returned error: {}", stderr.trim());
        }

        let manifest: PluginManifest = serde_json::from_slice(&output.stdout)
            .with_context(|| format!("Failed to parse plugin manifest: {}", path.display()))?;

        Ok(manifest)
    }

    /// Sends one request to the plugin at `path` and reads its response
    ///
    /// The plugin's stderr is passed through. The child is always waited
    /// on, and a non-zero exit status fails the call even after a reply.
    pub fn invoke(path: &Path, request: &PluginRequest) -> Result<PluginResponse> {
        let mut child = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| format!("Failed to spawn plugin: {}", path.display()))?;

        let exchanged = Self::exchange(&mut child, request);

        let status = child
            .wait()
            .with_context(|| format!("Failed to wait for plugin: {}", path.display()))?;
        let response = exchanged?;

        if !status.success() {
            anyhow::bail!("Plugin exited with {}", status);
        }

        Ok(response)
    }

    /// Writes the request and reads the first response line
    fn exchange(child: &mut Child, request: &PluginRequest) -> Result<PluginResponse> {
        // stdin is closed when dropped
        {
            let mut stdin = child
                .stdin
                .take()
                .ok_or_else(|| anyhow::anyhow!("Failed to open plugin stdin"))?;
            let request_json =
                serde_json::to_string(request).context("Failed to serialize request")?;
            writeln!(stdin, "{}", request_json).context("Failed to write to plugin")?;
        }

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| anyhow::anyhow!("Failed to open plugin stdout"))?;
        let mut reader = BufReader::new(stdout);

        let mut response_line = String::new();
        reader
            .read_line(&mut response_line)
            .context("Failed to read plugin response")?;
        if response_line.trim().is_empty() {
            anyhow::bail!("No response from plugin");
        }

        // Drain trailing output so the plugin never blocks on a full pipe
        io::copy(&mut reader, &mut io::sink()).context("Failed to read plugin output")?;

        serde_json::from_str(&response_line).context("Failed to parse plugin response")
    }
}

impl Default for PluginLoader {
    fn default() -> Self {
        Self::new()
    }
}
