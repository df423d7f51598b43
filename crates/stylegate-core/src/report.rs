//! Violation reporting and outcome aggregation.
//!
//! A [`Reporter`] receives every located match as soon as it is found, so a
//! run prints all of its violations before it is declared failed. Whether the
//! run failed is tracked separately by folding [`Outcome`]s: the orchestrator
//! owns a fresh fold per run, so repeated runs never share state.

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;

use crate::locate::LineInfo;
use crate::scanner::Match;

/// Pass/fail result of a run or a part of one.
///
/// Combining is associative and `Fail` absorbs `Pass`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Nothing was reported.
    #[default]
    Pass,
    /// At least one violation was reported.
    Fail,
}

impl Outcome {
    /// Combine two outcomes.
    #[must_use]
    pub const fn combine(self, other: Self) -> Self {
        match (self, other) {
            (Self::Pass, Self::Pass) => Self::Pass,
            _ => Self::Fail,
        }
    }

    /// Returns `true` for [`Outcome::Fail`].
    pub const fn is_fail(self) -> bool {
        matches!(self, Self::Fail)
    }
}

impl FromIterator<Outcome> for Outcome {
    fn from_iter<I: IntoIterator<Item = Outcome>>(iter: I) -> Self {
        iter.into_iter().fold(Self::Pass, Self::combine)
    }
}

/// A single reported style violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// The file containing the violation.
    pub file: Utf8PathBuf,
    /// The rule's message.
    pub message: String,
    /// 1-based line number.
    pub line: usize,
    /// Full text of the offending line.
    pub line_text: String,
    /// The exact matched text.
    pub matched: String,
}

impl Violation {
    /// Build a violation from a match and its located line.
    pub fn new(file: &Utf8Path, found: &Match, line: &LineInfo) -> Self {
        Self {
            file: file.to_path_buf(),
            message: found.message.clone(),
            line: line.line_number,
            line_text: line.line_text.clone(),
            matched: found.matched.clone(),
        }
    }
}

/// Format a diagnostic as `<message>: <line>: <line text>`.
pub fn format_diagnostic(message: &str, line: &LineInfo) -> String {
    format!("{message}: {}: {}", line.line_number, line.line_text)
}

/// Receives each style violation as it is found.
pub trait Reporter {
    /// Emit one diagnostic for `found` at `line` in `file`.
    fn report(&mut self, file: &Utf8Path, found: &Match, line: &LineInfo);
}

/// Reporter that keeps every violation in memory.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    violations: Vec<Violation>,
}

impl CollectingReporter {
    /// Create an empty reporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Violations collected so far, in report order.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Consume the reporter and return its violations.
    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }
}

impl Reporter for CollectingReporter {
    fn report(&mut self, file: &Utf8Path, found: &Match, line: &LineInfo) {
        self.violations.push(Violation::new(file, found, line));
    }
}
