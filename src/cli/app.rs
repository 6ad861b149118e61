//! Main CLI application flow

use std::ffi::OsString;
use std::process::ExitCode;

use anyhow::Result;

use super::command::{self, CommandError, ParsedCommand};
use super::output::Output;
use super::{export_cmd, formats_cmd};
use crate::plugin::{PluginLoader, WriterRegistry};
use crate::storage::{Preferences, PreferencesStore};

/// Name printed by `--version`
pub const APP_NAME: &str = "mapeditor";

/// Main entry point for the CLI
pub fn run() -> Result<ExitCode> {
    run_from(std::env::args_os())
}

/// Runs the CLI with explicit arguments, including the program name
pub fn run_from<I, T>(args: I) -> Result<ExitCode>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cmd = match command::parse(args) {
        Ok(cmd) => cmd,
        Err(err @ CommandError::HelpRequested(_)) => {
            print!("{}", err.render());
            return Ok(ExitCode::from(err.exit_code()));
        }
        Err(err @ CommandError::MalformedArguments(_)) => {
            eprint!("{}", err.render());
            return Ok(ExitCode::from(err.exit_code()));
        }
    };

    let output = Output::new(cmd.output_format, cmd.verbose);

    if cmd.disable_opengl {
        disable_opengl(&cmd, &output)?;
    }

    if cmd.show_version {
        if output.is_json() {
            output.data(&serde_json::json!({
                "name": APP_NAME,
                "version": env!("CARGO_PKG_VERSION"),
            }));
        } else {
            println!("{} {}", APP_NAME, env!("CARGO_PKG_VERSION"));
        }
    }
    if cmd.quit_requested() {
        return Ok(ExitCode::SUCCESS);
    }

    let store = PreferencesStore::resolve(cmd.config_dir.as_deref())?;
    let preferences = store.load()?;
    output.verbose_ctx(
        "preferences",
        &format!("Loaded preferences from {}", store.path().display()),
    );

    let registry = build_registry(&cmd, &preferences, &output)?;

    if cmd.list_formats {
        formats_cmd::list(&registry, &output);
        return Ok(ExitCode::SUCCESS);
    }

    if cmd.export_requested {
        return Ok(export_cmd::run(&cmd.files, &registry, &output));
    }

    output.warn(
        "The interactive editor is not part of this build. \
         Use --export-map [format] <source file> <target file> to convert a map.",
    );
    Ok(ExitCode::SUCCESS)
}

/// Persists `use_opengl = false`; takes effect even when quitting early
fn disable_opengl(cmd: &ParsedCommand, output: &Output) -> Result<()> {
    let store = PreferencesStore::resolve(cmd.config_dir.as_deref())?;
    let mut preferences = store.load()?;
    if preferences.use_opengl {
        preferences.use_opengl = false;
        store.save(&preferences)?;
    }
    output.verbose_ctx("preferences", "Disabled hardware accelerated rendering");
    Ok(())
}

/// Registers built-in writers, then discovered plugins, minus disabled ones
fn build_registry(
    cmd: &ParsedCommand,
    preferences: &Preferences,
    output: &Output,
) -> Result<WriterRegistry> {
    let mut registry = WriterRegistry::with_builtin_writers();

    let mut loader = PluginLoader::new();
    for dir in cmd.plugin_dirs.iter().chain(&preferences.plugin_dirs) {
        loader.add_plugin_dir(dir);
    }
    loader.discover()?;
    output.verbose_ctx(
        "plugins",
        &format!("Discovered {} plugin(s)", loader.list().len()),
    );

    for skipped in registry.load_plugins(&loader) {
        output.warn(&format!(
            "Ignoring plugin {}: {:#}",
            skipped.name, skipped.reason
        ));
    }

    for name in registry.remove_where(|name| preferences.is_disabled(name)) {
        output.verbose_ctx("plugins", &format!("Writer '{}' is disabled", name));
    }

    Ok(registry)
}
