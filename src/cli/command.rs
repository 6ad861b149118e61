//! Command-line parsing
//!
//! Parsing is pure: it never prints or touches the filesystem. Positional
//! arguments are kept raw; only the export resolver gives them meaning.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::Parser;
use thiserror::Error;

use super::output::OutputFormat;

/// Parsed process arguments
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "mapeditor")]
#[command(about = "Tile map editor (headless export)")]
#[command(disable_version_flag = true)]
pub struct ParsedCommand {
    /// Display the version
    #[arg(short = 'v', long = "version", overrides_with = "show_version")]
    pub show_version: bool,

    /// Only check validity of arguments
    #[arg(long, overrides_with = "quit")]
    pub quit: bool,

    /// Disable hardware accelerated rendering
    #[arg(long = "disable-opengl", overrides_with = "disable_opengl")]
    pub disable_opengl: bool,

    /// Export the specified map file to target
    #[arg(long = "export-map", overrides_with = "export_requested")]
    pub export_requested: bool,

    /// List the available export formats
    #[arg(long = "list-formats", overrides_with = "list_formats")]
    pub list_formats: bool,

    /// Additional directory to search for writer plugins
    #[arg(long = "plugin-dir", value_name = "DIR")]
    pub plugin_dirs: Vec<PathBuf>,

    /// Directory holding config.toml
    #[arg(long = "config-dir", value_name = "DIR", env = "MAPEDITOR_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Output format for messages and listings
    #[arg(long = "output-format", default_value = "text")]
    pub output_format: OutputFormat,

    /// Enable verbose output for debugging
    #[arg(long, overrides_with = "verbose")]
    pub verbose: bool,

    /// Files to open; with --export-map: [format] <source file> <target file>
    #[arg(value_name = "FILE")]
    pub files: Vec<String>,
}

impl ParsedCommand {
    /// Returns true if the process should exit right after parsing
    pub fn quit_requested(&self) -> bool {
        self.quit || self.show_version
    }
}

#[derive(Debug, Error)]
pub enum CommandError {
    /// Help was requested; holds the rendered help text
    #[error("{0}")]
    HelpRequested(String),

    #[error("Malformed arguments: {0}")]
    MalformedArguments(#[source] clap::Error),
}

impl CommandError {
    /// Process exit status for this outcome
    pub fn exit_code(&self) -> u8 {
        match self {
            CommandError::HelpRequested(_) => 0,
            CommandError::MalformedArguments(_) => 2,
        }
    }

    /// Text to show the user
    pub fn render(&self) -> String {
        match self {
            CommandError::HelpRequested(help) => help.clone(),
            CommandError::MalformedArguments(err) => err.render().to_string(),
        }
    }
}

/// Parses process arguments, including the program name
pub fn parse<I, T>(args: I) -> Result<ParsedCommand, CommandError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    ParsedCommand::try_parse_from(args).map_err(|err| match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            CommandError::HelpRequested(err.render().to_string())
        }
        _ => CommandError::MalformedArguments(err),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(args: &[&str]) -> ParsedCommand {
        let mut full = vec!["mapeditor"];
        full.extend_from_slice(args);
        parse(full).unwrap()
    }

    #[test]
    fn no_arguments() {
        let cmd = parse_ok(&[]);

        assert!(!cmd.export_requested);
        assert!(!cmd.quit_requested());
        assert!(cmd.files.is_empty());
        assert_eq!(cmd.output_format, OutputFormat::Text);
    }

    #[test]
    fn export_with_positional_files() {
        let cmd = parse_ok(&["--export-map", "TMX files", "a.tmx", "b.out"]);

        assert!(cmd.export_requested);
        assert_eq!(cmd.files, vec!["TMX files", "a.tmx", "b.out"]);
    }

    #[test]
    fn flags_may_follow_files() {
        let cmd = parse_ok(&["a.tmx", "--export-map", "b.json"]);

        assert!(cmd.export_requested);
        assert_eq!(cmd.files, vec!["a.tmx", "b.json"]);
    }

    #[test]
    fn version_requests_quit() {
        assert!(parse_ok(&["-v"]).quit_requested());
        assert!(parse_ok(&["--version"]).show_version);
    }

    #[test]
    fn repeated_switches_are_harmless() {
        let cmd = parse_ok(&["-v", "--version", "--quit", "--quit"]);

        assert!(cmd.show_version);
        assert!(cmd.quit);
    }

    #[test]
    fn quit_only() {
        let cmd = parse_ok(&["--quit"]);

        assert!(cmd.quit_requested());
        assert!(!cmd.show_version);
    }

    #[test]
    fn disable_opengl() {
        assert!(parse_ok(&["--disable-opengl"]).disable_opengl);
    }

    #[test]
    fn plugin_dirs_accumulate() {
        let cmd = parse_ok(&["--plugin-dir", "/a", "--plugin-dir", "/b"]);
        assert_eq!(cmd.plugin_dirs, vec![PathBuf::from("/a"), PathBuf::from("/b")]);
    }

    #[test]
    fn unknown_flag_is_malformed() {
        let err = parse(["mapeditor", "--bogus"]).unwrap_err();

        assert!(matches!(err, CommandError::MalformedArguments(_)));
        assert_eq!(err.exit_code(), 2);
        assert!(err.render().contains("--bogus"));
    }

    #[test]
    fn help_is_an_early_exit() {
        let err = parse(["mapeditor", "--help"]).unwrap_err();

        assert!(matches!(err, CommandError::HelpRequested(_)));
        assert_eq!(err.exit_code(), 0);
        assert!(err.render().contains("--export-map"));
    }
}
