//! The default run: check style, then test.

use camino::Utf8Path;
use clap::Args;
use tracing::{debug, instrument};

use stylegate_core::config::Config;
use stylegate_core::pipeline::Pipeline;
use stylegate_core::tools::CommandRunner;

use super::test::TestRunArgs;
use super::{CliReporter, print_ok};

/// Arguments for the `all` subcommand.
#[derive(Args, Debug, Default)]
pub struct AllArgs {
    #[command(flatten)]
    run: TestRunArgs,
}

/// Check style, then run the tests. Tests are skipped when style fails.
#[instrument(name = "cmd_all", skip_all)]
pub fn cmd_all(
    args: AllArgs,
    global_json: bool,
    config: &Config,
    root: &Utf8Path,
    runner: &mut dyn CommandRunner,
) -> anyhow::Result<()> {
    let config = args.run.apply(config);
    debug!(root = %root, "executing default run");
    let mut reporter = CliReporter::new(global_json);
    let result = Pipeline::new(&config, root, runner).default_run(&mut reporter);
    reporter.finish()?;
    result?;
    print_ok(global_json, "style checks and tests passed");
    Ok(())
}
