//! Command implementations.

use anyhow::Context;
use camino::Utf8Path;
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;

use stylegate_core::locate::LineInfo;
use stylegate_core::report::{
    CollectingReporter, Outcome, Reporter, Violation, format_diagnostic,
};
use stylegate_core::scanner::Match;

pub mod all;
pub mod check_style;
pub mod coverage;
pub mod info;
pub mod lint;
pub mod rules;
pub mod scan;

/// Prints one line per violation, `<file>: <message>: <line>: <line text>`,
/// with the message in red.
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    count: usize,
}

impl ConsoleReporter {
    /// Create a reporter that has printed nothing yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of violations printed.
    pub const fn count(&self) -> usize {
        self.count
    }
}

fn console_line(file: &Utf8Path, found: &Match, line: &LineInfo) -> String {
    let text = format_diagnostic(&found.message, line);
    // Color only the message; the rest of the line is plain.
    let rest = &text[found.message.len()..];
    format!(
        "{file}: {}{rest}",
        found
            .message
            .if_supports_color(Stream::Stdout, |m| m.red())
    )
}

impl Reporter for ConsoleReporter {
    fn report(&mut self, file: &Utf8Path, found: &Match, line: &LineInfo) {
        println!("{}", console_line(file, found, line));
        self.count += 1;
    }
}

/// Console or JSON reporting, picked from the global `--json` flag.
#[derive(Debug)]
pub enum CliReporter {
    /// Print diagnostics as they are found.
    Console(ConsoleReporter),
    /// Collect diagnostics and print one JSON document at the end.
    Json(CollectingReporter),
}

#[derive(Serialize)]
struct StyleOutput<'a> {
    outcome: Outcome,
    violations: &'a [Violation],
}

impl CliReporter {
    /// Pick the reporter for the output mode.
    pub fn new(json: bool) -> Self {
        if json {
            Self::Json(CollectingReporter::new())
        } else {
            Self::Console(ConsoleReporter::new())
        }
    }

    /// Flush collected output. Console output is already printed.
    pub fn finish(self) -> anyhow::Result<()> {
        if let Self::Json(collected) = self {
            let violations = collected.violations();
            let output = StyleOutput {
                outcome: violations.iter().map(|_| Outcome::Fail).collect(),
                violations,
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&output).context("failed to serialize report")?
            );
        }
        Ok(())
    }
}

impl Reporter for CliReporter {
    fn report(&mut self, file: &Utf8Path, found: &Match, line: &LineInfo) {
        match self {
            Self::Console(r) => r.report(file, found, line),
            Self::Json(r) => r.report(file, found, line),
        }
    }
}

/// Print a one-line success marker unless JSON output was requested.
pub fn print_ok(global_json: bool, what: &str) {
    if !global_json {
        println!(
            "{} {what}",
            "OK:".if_supports_color(Stream::Stdout, |s| s.green())
        );
    }
}
