//! Lint command.

use camino::Utf8Path;
use clap::Args;
use tracing::{debug, instrument};

use stylegate_core::config::Config;
use stylegate_core::pipeline::Pipeline;
use stylegate_core::tools::CommandRunner;

use super::print_ok;

/// Arguments for the `lint` subcommand.
#[derive(Args, Debug, Default)]
pub struct LintArgs {}

/// Run the external linter over the configured lint files.
#[instrument(name = "cmd_lint", skip_all)]
pub fn cmd_lint(
    _args: LintArgs,
    global_json: bool,
    config: &Config,
    root: &Utf8Path,
    runner: &mut dyn CommandRunner,
) -> anyhow::Result<()> {
    debug!(program = %config.lint.program, "executing lint command");
    Pipeline::new(config, root, runner).lint()?;
    print_ok(global_json, "lint passed");
    Ok(())
}
