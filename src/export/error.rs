//! Export failures

use std::path::PathBuf;

use thiserror::Error;

use crate::format::ReadError;
use crate::plugin::WriteError;

/// Every way a headless export can fail
///
/// All variants are user-facing and end the invocation with exit code 1.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Export syntax is --export-map [format] <source file> <target file>")]
    InsufficientArguments,

    #[error("Non-unique file extension. Can't determine correct export format.")]
    AmbiguousFormat {
        suffix: String,
        candidates: Vec<String>,
    },

    #[error("No exporter found for target file.")]
    NoWriterFound { target: PathBuf },

    #[error("Failed to load source map.")]
    SourceLoadFailed {
        path: PathBuf,
        #[source]
        source: ReadError,
    },

    #[error("Failed to export map to target file.")]
    ExportWriteFailed {
        path: PathBuf,
        #[source]
        source: WriteError,
    },
}

impl ExportError {
    /// Process exit status for this failure
    pub fn exit_code(&self) -> u8 {
        1
    }

    /// Stable identifier for machine-readable output
    pub fn kind(&self) -> &'static str {
        match self {
            ExportError::InsufficientArguments => "insufficient_arguments",
            ExportError::AmbiguousFormat { .. } => "ambiguous_format",
            ExportError::NoWriterFound { .. } => "no_writer_found",
            ExportError::SourceLoadFailed { .. } => "source_load_failed",
            ExportError::ExportWriteFailed { .. } => "export_write_failed",
        }
    }
}
