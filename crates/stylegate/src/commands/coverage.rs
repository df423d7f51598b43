//! Coverage and show commands.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use tracing::{debug, instrument};

use stylegate_core::config::Config;
use stylegate_core::pipeline::{Pipeline, viewer_for};
use stylegate_core::tools::CommandRunner;

use super::print_ok;
use super::test::TestRunArgs;

/// Arguments for the `coverage` subcommand.
#[derive(Args, Debug, Default)]
pub struct CoverageArgs {
    /// Report format passed to the instrumenter (default: from config)
    #[arg(long, value_name = "FMT")]
    pub report: Option<String>,

    /// Open the HTML report when done
    #[arg(long, conflicts_with = "upload")]
    pub open: bool,

    /// Upload the lcov data to the coverage service when done
    #[arg(long)]
    pub upload: bool,

    #[command(flatten)]
    run: TestRunArgs,
}

/// Arguments for the `show` subcommand.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// File to open
    pub file: Utf8PathBuf,
}

/// The viewer for this platform, honoring `BROWSER`.
fn platform_viewer() -> Option<String> {
    let browser = std::env::var("BROWSER").ok();
    viewer_for(browser.as_deref(), std::env::consts::OS)
}

/// Run the tests under coverage, then optionally open or upload the report.
#[instrument(name = "cmd_coverage", skip_all, fields(open = args.open, upload = args.upload))]
pub fn cmd_coverage(
    args: CoverageArgs,
    global_json: bool,
    config: &Config,
    root: &Utf8Path,
    runner: &mut dyn CommandRunner,
) -> anyhow::Result<()> {
    let config = &args.run.apply(config);
    let report = match args.report {
        Some(ref fmt) => fmt.as_str(),
        None if args.upload => config.coverage.upload_report.as_str(),
        None => config.coverage.report.as_str(),
    };
    debug!(report, "executing coverage command");

    let mut pipeline = Pipeline::new(config, root, runner);
    pipeline.coverage(Some(report))?;

    if args.upload {
        pipeline.upload()?;
        print_ok(global_json, "coverage uploaded");
    } else if args.open {
        let html = config.coverage.html_report_path(root);
        pipeline.open(&html, platform_viewer().as_deref())?;
    } else {
        print_ok(
            global_json,
            &format!("coverage written to {}", root.join(&config.coverage.output_dir)),
        );
    }
    Ok(())
}

/// Open a file in the platform viewer.
#[instrument(name = "cmd_show", skip_all, fields(file = %args.file))]
pub fn cmd_show(
    args: ShowArgs,
    config: &Config,
    root: &Utf8Path,
    runner: &mut dyn CommandRunner,
) -> anyhow::Result<()> {
    let viewer = platform_viewer();
    debug!(viewer = ?viewer, "executing show command");
    Pipeline::new(config, root, runner).open(&args.file, viewer.as_deref())?;
    Ok(())
}
