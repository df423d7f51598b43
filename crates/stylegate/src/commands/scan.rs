//! Scan command: the doc-comment style scan on its own.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use tracing::{debug, instrument};

use stylegate_core::config::Config;
use stylegate_core::pipeline::Pipeline;
use stylegate_core::scanner::ScanMode;
use stylegate_core::tools::CommandRunner;

use super::{CliReporter, print_ok};

/// Arguments for the `scan` subcommand.
#[derive(Args, Debug, Default)]
pub struct ScanArgs {
    /// Files to scan, relative to the project root (default: configured style files)
    pub files: Vec<Utf8PathBuf>,

    /// Report the first match of each rule, or every match
    #[arg(long, value_enum)]
    pub mode: Option<ScanMode>,
}

/// Scan files and fail if any style rule matches.
#[instrument(name = "cmd_scan", skip_all, fields(files = args.files.len()))]
pub fn cmd_scan(
    args: ScanArgs,
    global_json: bool,
    config: &Config,
    root: &Utf8Path,
    runner: &mut dyn CommandRunner,
) -> anyhow::Result<()> {
    debug!(mode = ?args.mode, "executing scan command");

    let mut config = config.clone();
    if let Some(mode) = args.mode {
        config.style.mode = mode;
    }

    let mut reporter = CliReporter::new(global_json);
    let result = Pipeline::new(&config, root, runner).style_scan(&args.files, &mut reporter);
    reporter.finish()?;
    let summary = result?;
    print_ok(global_json, &format!("{} file(s) follow the style rules", summary.files));
    Ok(())
}
