//! Library interface for the `stylegate` CLI.
//!
//! This crate exposes the CLI's argument parser and command structure as a library,
//! primarily for documentation generation and testing. The actual entry point is
//! in `main.rs`.
//!
//! # Structure
//!
//! - [`Cli`] - The root argument parser (clap derive)
//! - [`Commands`] - Available subcommands
//! - [`commands`] - Command implementations
//!
//! # Documentation Generation
//!
//! The [`command()`] function returns the clap `Command` for generating man pages
//! and shell completions via `xtask`.

pub mod commands;

use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

/// Color output preference.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect terminal capabilities automatically.
    #[default]
    Auto,
    /// Always emit colors.
    Always,
    /// Never emit colors.
    Never,
}

impl ColorChoice {
    /// Configure global color output based on this choice.
    ///
    /// Call this once at startup to set the color mode.
    pub fn apply(self) {
        match self {
            Self::Auto => {} // owo-colors auto-detects by default
            Self::Always => owo_colors::set_override(true),
            Self::Never => owo_colors::set_override(false),
        }
    }
}

const ENV_HELP: &str = "\
ENVIRONMENT VARIABLES:
    RUST_LOG               Log filter (e.g., debug, stylegate=trace)
    STYLEGATE_LOG_PATH     Explicit log file path
    STYLEGATE_LOG_DIR      Log directory
    STYLEGATE_TEST_GREP    Only run tests whose name matches this filter
    STYLEGATE_<KEY>        Override any config key (nested keys use __)
    BROWSER                Program used to open coverage reports
";
/// Command-line interface definition for stylegate.
#[derive(Parser)]
#[command(name = "stylegate")]
#[command(about = "Build gate for lint, doc-comment style rules, tests, and coverage", long_about = None)]
#[command(version, arg_required_else_help = true)]
#[command(after_long_help = ENV_HELP)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Print only the version number (for scripting)
    #[arg(long)]
    pub version_only: bool,

    /// Path to configuration file (overrides discovery)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Run as if started in DIR
    #[arg(short = 'C', long, global = true)]
    pub chdir: Option<PathBuf>,

    /// Only print errors (suppresses warnings/info)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// More detail (repeatable; e.g. -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Colorize output
    #[arg(long, global = true, value_enum, default_value_t)]
    pub color: ColorChoice,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,
}

/// Available subcommands for the CLI.
#[derive(Subcommand)]
pub enum Commands {
    /// Run the external linter over the configured files
    Lint(commands::lint::LintArgs),

    /// Scan files for doc-comment style violations
    Scan(commands::scan::ScanArgs),

    /// Lint, then scan for style violations
    CheckStyle(commands::check_style::CheckStyleArgs),

    /// Run every module's tests
    Test(commands::test::TestArgs),

    /// Run the tests of a single module
    TestModule(commands::test::TestModuleArgs),

    /// Run the tests under the coverage instrumenter
    Coverage(commands::coverage::CoverageArgs),

    /// Open a file (such as a coverage report) in the platform viewer
    Show(commands::coverage::ShowArgs),

    /// Check style, then run the tests
    #[command(visible_alias = "default")]
    All(commands::all::AllArgs),

    /// List the active style rules
    Rules(commands::rules::RulesArgs),

    /// Show package information
    Info(commands::info::InfoArgs),
}

/// Returns the clap command for documentation generation
pub fn command() -> clap::Command {
    Cli::command()
}
