//! Rules command: list the active style rules.

use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use stylegate_core::config::Config;
use stylegate_core::rules::RuleRegistry;

/// Arguments for the `rules` subcommand.
#[derive(Args, Debug, Default)]
pub struct RulesArgs {}

/// Print the rule registry in evaluation order.
#[instrument(name = "cmd_rules", skip_all)]
pub fn cmd_rules(_args: RulesArgs, global_json: bool, config: &Config) -> anyhow::Result<()> {
    let registry = RuleRegistry::with_custom(&config.style.rules)?;
    let rules = registry.describe();
    debug!(count = rules.len(), "executing rules command");

    if global_json {
        println!("{}", serde_json::to_string_pretty(&rules)?);
        return Ok(());
    }

    for (idx, rule) in rules.iter().enumerate() {
        let origin = if rule.builtin { "builtin" } else { "config" };
        println!(
            "{:>2}. {} {}",
            idx + 1,
            rule.message,
            format!("[{origin}]").dimmed()
        );
        println!("    {}", rule.pattern.cyan());
    }
    Ok(())
}
