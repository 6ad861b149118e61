//! Plugin protocol types
//!
//! Writer plugins communicate via JSON messages over stdin/stdout.
//! Each plugin must support the `--manifest` flag to declare its formats.

use serde::{Deserialize, Serialize};

/// Plugin manifest declaring the formats a writer plugin produces
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginManifest {
    /// Writer name (e.g., "lua")
    pub name: String,

    /// Plugin version
    pub version: String,

    /// Human-readable description
    #[serde(default)]
    pub description: String,

    /// Name filters, e.g. "Lua files (*.lua)"
    pub name_filters: Vec<String>,
}

/// A message sent to a plugin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginRequest {
    /// The operation to perform
    pub operation: String,

    /// Operation-specific parameters
    pub params: serde_json::Value,
}

impl PluginRequest {
    pub fn new(operation: impl Into<String>, params: impl Into<serde_json::Value>) -> Self {
        Self {
            operation: operation.into(),
            params: params.into(),
        }
    }
}

/// A response from a plugin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginResponse {
    /// Whether the operation succeeded
    pub success: bool,

    /// Result data (if success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    /// Error message (if failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
