//! Info command implementation

use camino::Utf8Path;
use clap::Args;
use stylegate_core::config::{Config, ConfigSources};
use stylegate_core::scanner::ScanMode;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

/// Arguments for the `info` subcommand.
#[derive(Args, Debug, Default)]
pub struct InfoArgs {
    // No subcommand-specific arguments; uses global --json flag
}

#[derive(Serialize)]
struct PackageInfo {
    name: &'static str,
    version: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    repository: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    homepage: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    license: &'static str,
}

impl PackageInfo {
    const fn new() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            description: env!("CARGO_PKG_DESCRIPTION"),
            repository: env!("CARGO_PKG_REPOSITORY"),
            homepage: env!("CARGO_PKG_HOMEPAGE"),
            license: env!("CARGO_PKG_LICENSE"),
        }
    }
}

#[derive(Serialize)]
struct ConfigInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    config_file: Option<String>,
    project_root: String,
    log_level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    log_dir: Option<String>,
    style_files: Vec<String>,
    scan_mode: ScanMode,
    custom_rules: usize,
    lint_program: String,
    test_program: String,
    test_timeout_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    test_grep: Option<String>,
    coverage_program: String,
    coverage_dir: String,
}

impl ConfigInfo {
    fn from_config(config: &Config, sources: &ConfigSources, root: &Utf8Path) -> Self {
        Self {
            config_file: sources.primary_file().map(|p| p.to_string()),
            project_root: root.to_string(),
            log_level: config.log_level.as_str().to_string(),
            log_dir: config.log_dir.as_ref().map(|p| p.to_string()),
            style_files: config.style.files.clone(),
            scan_mode: config.style.mode,
            custom_rules: config.style.rules.len(),
            lint_program: config.lint.program.clone(),
            test_program: config.test.program.clone(),
            test_timeout_ms: config.test.timeout_ms,
            test_grep: config.test.grep.clone(),
            coverage_program: config.coverage.program.clone(),
            coverage_dir: config.coverage.output_dir.to_string(),
        }
    }
}

#[derive(Serialize)]
struct FullInfo {
    #[serde(flatten)]
    package: PackageInfo,
    config: ConfigInfo,
}

/// Print package information
///
/// # Arguments
/// * `global_json` - Global `--json` flag from CLI
/// * `config` - Loaded configuration
/// * `sources` - Config source metadata from loading
/// * `root` - Project root that file patterns resolve against
#[instrument(name = "cmd_info", skip_all, fields(json_output))]
pub fn cmd_info(
    _args: InfoArgs,
    global_json: bool,
    config: &Config,
    sources: &ConfigSources,
    root: &Utf8Path,
) -> anyhow::Result<()> {
    let info = PackageInfo::new();

    debug!(json_output = global_json, "executing info command");

    let config_info = ConfigInfo::from_config(config, sources, root);
    let full_info = FullInfo {
        package: info,
        config: config_info,
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&full_info)?);
    } else {
        println!(
            "{} {}",
            full_info.package.name.bold(),
            full_info.package.version.green()
        );
        if !full_info.package.description.is_empty() {
            println!("{}", full_info.package.description);
        }
        if !full_info.package.license.is_empty() {
            println!("{}: {}", "License".dimmed(), full_info.package.license);
        }
        if !full_info.package.repository.is_empty() {
            println!(
                "{}: {}",
                "Repository".dimmed(),
                full_info.package.repository.cyan()
            );
        }
        if !full_info.package.homepage.is_empty() {
            println!(
                "{}: {}",
                "Homepage".dimmed(),
                full_info.package.homepage.cyan()
            );
        }

        // Configuration section
        println!();
        println!("{}", "Configuration".bold().underline());
        if let Some(ref path) = full_info.config.config_file {
            println!("{}: {}", "Config file".dimmed(), path.cyan());
        } else {
            println!("{}: {}", "Config file".dimmed(), "none loaded".yellow());
        }
        println!("{}: {}", "Log level".dimmed(), full_info.config.log_level);
        if let Some(ref dir) = full_info.config.log_dir {
            println!("{}: {}", "Log directory".dimmed(), dir);
        }

        println!("{}: {}", "Project root".dimmed(), full_info.config.project_root);

        let cfg = &full_info.config;
        println!();
        println!("{}", "Style".bold().underline());
        println!("{}: {}", "Files".dimmed(), cfg.style_files.join(", "));
        println!("{}: {:?}", "Mode".dimmed(), cfg.scan_mode);
        println!("{}: {}", "Custom rules".dimmed(), cfg.custom_rules);

        println!();
        println!("{}", "Tools".bold().underline());
        println!("{}: {}", "Linter".dimmed(), cfg.lint_program);
        println!(
            "{}: {} ({} ms timeout)",
            "Test runner".dimmed(),
            cfg.test_program,
            cfg.test_timeout_ms
        );
        if let Some(ref grep) = cfg.test_grep {
            println!("{}: {}", "Test filter".dimmed(), grep);
        }
        println!(
            "{}: {} -> {}",
            "Coverage".dimmed(),
            cfg.coverage_program,
            cfg.coverage_dir
        );
    }

    Ok(())
}
