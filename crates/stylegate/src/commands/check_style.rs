//! Check-style command: lint, then the style scan.

use camino::Utf8Path;
use clap::Args;
use tracing::{debug, instrument};

use stylegate_core::config::Config;
use stylegate_core::pipeline::Pipeline;
use stylegate_core::tools::CommandRunner;

use super::{CliReporter, print_ok};

/// Arguments for the `check-style` subcommand.
#[derive(Args, Debug, Default)]
pub struct CheckStyleArgs {}

/// Run the linter and the style scan. Both run even if the linter fails.
#[instrument(name = "cmd_check_style", skip_all)]
pub fn cmd_check_style(
    _args: CheckStyleArgs,
    global_json: bool,
    config: &Config,
    root: &Utf8Path,
    runner: &mut dyn CommandRunner,
) -> anyhow::Result<()> {
    debug!(root = %root, "executing check-style command");
    let mut reporter = CliReporter::new(global_json);
    let result = Pipeline::new(config, root, runner).check_style(&mut reporter);
    reporter.finish()?;
    result?;
    print_ok(global_json, "lint and style checks passed");
    Ok(())
}
