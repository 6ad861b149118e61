//! Writer registry
//!
//! Populated once at startup (built-ins first, then plugins) and only read
//! afterwards. Iteration order is registration order.

use super::builtin::builtin_writers;
use super::external::ExternalWriter;
use super::loader::PluginLoader;
use super::writer::MapWriter;

/// A plugin that was discovered but could not be registered
#[derive(Debug)]
pub struct SkippedPlugin {
    pub name: String,
    pub reason: anyhow::Error,
}

/// Ordered collection of the available writers
#[derive(Default)]
pub struct WriterRegistry {
    writers: Vec<Box<dyn MapWriter>>,
}

impl WriterRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in writers
    pub fn with_builtin_writers() -> Self {
        Self {
            writers: builtin_writers(),
        }
    }

    /// Appends a writer
    pub fn register(&mut self, writer: Box<dyn MapWriter>) {
        self.writers.push(writer);
    }

    /// Registers every discovered plugin whose manifest loads
    pub fn load_plugins(&mut self, loader: &PluginLoader) -> Vec<SkippedPlugin> {
        let mut skipped = Vec::new();

        for info in loader.list() {
            match ExternalWriter::load(info) {
                Ok(writer) => self.register(Box::new(writer)),
                Err(reason) => skipped.push(SkippedPlugin {
                    name: info.name.clone(),
                    reason,
                }),
            }
        }

        skipped
    }

    /// Removes writers matching the predicate, returning their names
    pub fn remove_where(&mut self, mut disabled: impl FnMut(&str) -> bool) -> Vec<String> {
        let mut removed = Vec::new();
        self.writers.retain(|writer| {
            if disabled(writer.name()) {
                removed.push(writer.name().to_string());
                false
            } else {
                true
            }
        });
        removed
    }

    /// Iterates over the writers in registration order
    pub fn writers(&self) -> impl Iterator<Item = &dyn MapWriter> + '_ {
        self.writers.iter().map(|w| w.as_ref())
    }

    pub fn len(&self) -> usize {
        self.writers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writers.is_empty()
    }
}
