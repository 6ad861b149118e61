//! Export pipeline
//!
//! One export moves through `Idle → Loading → Loaded → Writing` and ends in
//! `Succeeded` or `Failed`. The map is owned by the pipeline from load
//! until release and is dropped before the write result is inspected, on
//! both terminal paths. A pipeline is consumed by [`ExportPipeline::run`],
//! so an attempt can never re-enter `Loading`.

use std::path::Path;

use super::error::ExportError;
use super::resolver::Resolution;
use crate::format::MapReader;
use crate::plugin::MapWriter;

/// What a successful export wrote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    pub layers: usize,
    pub tilesets: usize,
}

/// Loads one map and writes it through one writer
pub struct ExportPipeline<'a> {
    reader: &'a dyn MapReader,
}

impl<'a> ExportPipeline<'a> {
    pub fn new(reader: &'a dyn MapReader) -> Self {
        Self { reader }
    }

    /// Runs the export for a resolved writer
    pub fn run_resolved(self, resolution: &Resolution<'_>) -> Result<ExportSummary, ExportError> {
        self.run(&resolution.source, &resolution.target, resolution.writer)
    }

    /// Reads `source` and writes it to `target` through `writer`
    pub fn run(
        self,
        source: &Path,
        target: &Path,
        writer: &dyn MapWriter,
    ) -> Result<ExportSummary, ExportError> {
        let map = self
            .reader
            .read_map(source)
            .map_err(|source_err| ExportError::SourceLoadFailed {
                path: source.to_path_buf(),
                source: source_err,
            })?;

        let summary = ExportSummary {
            layers: map.layers.len(),
            tilesets: map.tilesets.len(),
        };

        let written = writer.write(&map, target);

        // Release the map and its tilesets whatever the outcome
        drop(map);

        written.map_err(|write_err| ExportError::ExportWriteFailed {
            path: target.to_path_buf(),
            source: write_err,
        })?;

        Ok(summary)
    }
}
