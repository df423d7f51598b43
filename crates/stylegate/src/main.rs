//! stylegate CLI
#![deny(unsafe_code)]

use anyhow::Context;
use clap::Parser;
use owo_colors::OwoColorize;
use stylegate::{Cli, Commands, commands};
use stylegate_core::config::ConfigLoader;
use stylegate_core::error::CheckError;
use stylegate_core::tools::SystemRunner;
use tracing::debug;

mod observability;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli.color.apply();

    if cli.version_only {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // arg_required_else_help ensures we have --version-only or a subcommand
    let Some(command) = cli.command else {
        return Ok(());
    };

    if let Some(ref dir) = cli.chdir {
        std::env::set_current_dir(dir)
            .with_context(|| format!("failed to change directory to {}", dir.display()))?;
    }

    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let cwd = camino::Utf8PathBuf::try_from(cwd).map_err(|e| {
        anyhow::anyhow!(
            "current directory is not valid UTF-8: {}",
            e.into_path_buf().display()
        )
    })?;
    let mut loader = ConfigLoader::new().with_project_search(&cwd);
    if let Some(ref config_path) = cli.config {
        let config_path = camino::Utf8PathBuf::try_from(config_path.clone()).map_err(|e| {
            anyhow::anyhow!(
                "config path is not valid UTF-8: {}",
                e.into_path_buf().display()
            )
        })?;
        loader = loader.with_file(&config_path);
    }
    let (config, config_sources) = loader.load().context("failed to load configuration")?;
    let root = config_sources.project_root(&cwd);

    let obs_config = observability::ObservabilityConfig::from_env_with_overrides(
        config
            .log_dir
            .as_ref()
            .map(|dir| dir.as_std_path().to_path_buf()),
    );
    let env_filter = observability::env_filter(cli.quiet, cli.verbose, config.log_level.as_str());
    let guard = observability::init_observability(&obs_config, env_filter)
        .context("failed to initialize logging/tracing")?;

    debug!(
        verbose = cli.verbose,
        quiet = cli.quiet,
        json = cli.json,
        color = ?cli.color,
        chdir = ?cli.chdir,
        root = %root,
        "CLI initialized"
    );

    let mut runner = SystemRunner;
    let json = cli.json;

    // Execute command
    let result = match command {
        Commands::Lint(args) => commands::lint::cmd_lint(args, json, &config, &root, &mut runner),
        Commands::Scan(args) => commands::scan::cmd_scan(args, json, &config, &root, &mut runner),
        Commands::CheckStyle(args) => {
            commands::check_style::cmd_check_style(args, json, &config, &root, &mut runner)
        }
        Commands::Test(args) => commands::test::cmd_test(args, json, &config, &root, &mut runner),
        Commands::TestModule(args) => {
            commands::test::cmd_test_module(args, json, &config, &root, &mut runner)
        }
        Commands::Coverage(args) => {
            commands::coverage::cmd_coverage(args, json, &config, &root, &mut runner)
        }
        Commands::Show(args) => commands::coverage::cmd_show(args, &config, &root, &mut runner),
        Commands::All(args) => commands::all::cmd_all(args, json, &config, &root, &mut runner),
        Commands::Rules(args) => commands::rules::cmd_rules(args, json, &config),
        Commands::Info(args) => {
            commands::info::cmd_info(args, json, &config, &config_sources, &root)
        }
    };

    let Err(err) = result else {
        return Ok(());
    };
    tracing::error!(error = %err, "fatal error");
    eprintln!("{} {err:#}", "error:".red().bold());
    let code = err
        .downcast_ref::<CheckError>()
        .map_or(1, CheckError::exit_code);
    // process::exit skips destructors; flush the file log first.
    drop(guard);
    std::process::exit(code)
}
