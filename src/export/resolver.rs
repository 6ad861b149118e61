//! Writer resolution
//!
//! Picks the one writer an export goes through. Positional arguments are
//! `[format] <source> <target>`:
//!
//! - with a format filter, a writer matches when one of its name filters
//!   equals the filter (case-insensitive). The last matching writer wins.
//! - without one, a writer matches when one of its name filters contains
//!   the complete suffix of the target (case-insensitive). A second match
//!   is an error.

use std::path::{Path, PathBuf};

use super::error::ExportError;
use crate::plugin::{MapWriter, WriterRegistry};

/// The writer and paths chosen for an export
#[derive(Debug)]
pub struct Resolution<'r> {
    /// Format filter given on the command line, if any
    pub filter: Option<String>,
    pub source: PathBuf,
    pub target: PathBuf,
    pub writer: &'r dyn MapWriter,
}

/// Returns everything after the first dot of the file name
///
/// `maps/level1.tmx.bak` gives `tmx.bak`; a name without a dot gives an
/// empty string.
pub fn complete_suffix(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy())
        .and_then(|name| name.split_once('.').map(|(_, suffix)| suffix.to_string()))
        .unwrap_or_default()
}

fn accepts_filter(name_filters: &[String], filter: &str) -> bool {
    let filter = filter.to_lowercase();
    name_filters.iter().any(|f| f.to_lowercase() == filter)
}

fn accepts_suffix(name_filters: &[String], suffix: &str) -> bool {
    let suffix = suffix.to_lowercase();
    name_filters.iter().any(|f| f.to_lowercase().contains(&suffix))
}

/// Resolves the positional export arguments against the registry
pub fn resolve<'r, S: AsRef<str>>(
    args: &[S],
    registry: &'r WriterRegistry,
) -> Result<Resolution<'r>, ExportError> {
    let (filter, source, target) = match args {
        [source, target] => (None, source.as_ref(), target.as_ref()),
        [filter, source, target, ..] => (Some(filter.as_ref()), source.as_ref(), target.as_ref()),
        _ => return Err(ExportError::InsufficientArguments),
    };

    let target_path = PathBuf::from(target);
    let suffix = complete_suffix(&target_path);

    let mut chosen: Option<&'r dyn MapWriter> = None;

    for writer in registry.writers() {
        let name_filters = writer.name_filters();

        match filter {
            Some(filter) => {
                if accepts_filter(&name_filters, filter) {
                    chosen = Some(writer);
                }
            }
            None => {
                if accepts_suffix(&name_filters, &suffix) {
                    if let Some(first) = chosen {
                        return Err(ExportError::AmbiguousFormat {
                            suffix,
                            candidates: vec![first.name().to_string(), writer.name().to_string()],
                        });
                    }
                    chosen = Some(writer);
                }
            }
        }
    }

    let writer = chosen.ok_or(ExportError::NoWriterFound {
        target: target_path.clone(),
    })?;

    Ok(Resolution {
        filter: filter.map(str::to_string),
        source: PathBuf::from(source),
        target: target_path,
        writer,
    })
}
