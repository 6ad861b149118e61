//! Export format listing (`--list-formats`)

use super::output::Output;
use crate::plugin::WriterRegistry;

pub fn list(registry: &WriterRegistry, output: &Output) {
    if output.is_json() {
        let items: Vec<_> = registry
            .writers()
            .map(|writer| {
                serde_json::json!({
                    "name": writer.name(),
                    "name_filters": writer.name_filters(),
                })
            })
            .collect();
        output.data(&items);
    } else if registry.is_empty() {
        println!("No export formats available.");
        println!();
        println!("Writer plugins are discovered from:");
        println!("  - --plugin-dir and plugin_dirs in config.toml");
        println!("  - PATH (executables starting with 'mapeditor-writer-')");
    } else {
        println!("Available export formats:");
        println!("{:<16} NAME FILTERS", "NAME");
        println!("{}", "-".repeat(60));
        for writer in registry.writers() {
            println!("{:<16} {}", writer.name(), writer.name_filters().join("; "));
        }
    }
}
