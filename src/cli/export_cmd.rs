//! Headless map export (`--export-map`)

use std::process::ExitCode;

use super::output::Output;
use crate::export::{resolve, ExportError, ExportPipeline};
use crate::format::FileMapReader;
use crate::plugin::WriterRegistry;

/// Runs one export and maps the outcome to a process exit code
pub fn run<S: AsRef<str>>(files: &[S], registry: &WriterRegistry, output: &Output) -> ExitCode {
    match export(files, registry, output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(output, &err);
            ExitCode::from(err.exit_code())
        }
    }
}

fn export<S: AsRef<str>>(
    files: &[S],
    registry: &WriterRegistry,
    output: &Output,
) -> Result<(), ExportError> {
    output.verbose_ctx(
        "export",
        &format!("Resolving writer among {} registered", registry.len()),
    );

    let resolution = resolve(files, registry)?;
    output.verbose_ctx(
        "export",
        &format!(
            "Using writer '{}' ({}) for {}",
            resolution.writer.name(),
            match &resolution.filter {
                Some(filter) => format!("filter '{}'", filter),
                None => "matched by suffix".to_string(),
            },
            resolution.target.display()
        ),
    );

    let reader = FileMapReader::new();
    output.verbose_ctx("export", &format!("Loading {}", resolution.source.display()));
    let summary = ExportPipeline::new(&reader).run_resolved(&resolution)?;

    output.verbose_ctx(
        "export",
        &format!(
            "Wrote {} layer(s) and {} tileset(s) to {}",
            summary.layers,
            summary.tilesets,
            resolution.target.display()
        ),
    );

    if output.is_json() {
        output.data(&serde_json::json!({
            "success": true,
            "source": resolution.source.display().to_string(),
            "target": resolution.target.display().to_string(),
            "writer": resolution.writer.name(),
            "layers": summary.layers,
            "tilesets": summary.tilesets,
        }));
    }

    Ok(())
}

fn report(output: &Output, err: &ExportError) {
    let cause = match err {
        ExportError::InsufficientArguments => None,
        ExportError::AmbiguousFormat { suffix, candidates } => Some(format!(
            "Suffix '{}' is accepted by: {}",
            suffix,
            candidates.join(", ")
        )),
        ExportError::NoWriterFound { target } => {
            Some(format!("Target: {}", target.display()))
        }
        ExportError::SourceLoadFailed { source, .. } => Some(source.to_string()),
        ExportError::ExportWriteFailed { source, .. } => Some(source.to_string()),
    };

    output.failure(err.kind(), &err.to_string(), cause.as_deref());
}
