//! Style-check orchestration.
//!
//! Reads each target file in order, scans it with the rule registry, locates
//! and reports every match, then decides pass or fail once all files are
//! done. A file that cannot be read aborts the run: skipping it could hide
//! real violations.

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::{CheckError, CheckResult};
use crate::locate::locate;
use crate::report::{Outcome, Reporter};
use crate::rules::Rule;
use crate::scanner::{ScanMode, scan};

/// Aggregate result of one style-check run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StyleSummary {
    /// Number of files scanned.
    pub files: usize,
    /// Number of violations reported.
    pub violations: usize,
    /// Pass if nothing was reported.
    pub outcome: Outcome,
}

impl StyleSummary {
    /// Convert a failed run into [`CheckError::StyleViolations`].
    pub const fn into_result(self) -> CheckResult<Self> {
        match self.outcome {
            Outcome::Pass => Ok(self),
            Outcome::Fail => Err(CheckError::StyleViolations {
                count: self.violations,
            }),
        }
    }
}

/// Scan `files` (relative to `root`) and report every violation.
///
/// Returns the summary whether or not violations were found; only a read
/// failure is an error here.
#[instrument(skip_all, fields(files = files.len(), rules = rules.len()))]
pub fn scan_files(
    root: &Utf8Path,
    files: &[Utf8PathBuf],
    rules: &[Rule],
    mode: ScanMode,
    reporter: &mut dyn Reporter,
) -> CheckResult<StyleSummary> {
    let mut outcome = Outcome::Pass;
    let mut violations = 0;

    for file in files {
        let path = root.join(file);
        let text = std::fs::read_to_string(&path)
            .map_err(|source| CheckError::Read { path, source })?;

        let matches = scan(&text, rules, mode);
        debug!(file = %file, matches = matches.len(), "scanned file");
        for found in &matches {
            let line = locate(&text, found.offset);
            reporter.report(file, found, &line);
            outcome = outcome.combine(Outcome::Fail);
            violations += 1;
        }
    }

    Ok(StyleSummary {
        files: files.len(),
        violations,
        outcome,
    })
}

/// Run the style check and fail if any violation was reported.
pub fn run_style_check(
    root: &Utf8Path,
    files: &[Utf8PathBuf],
    rules: &[Rule],
    mode: ScanMode,
    reporter: &mut dyn Reporter,
) -> CheckResult<StyleSummary> {
    scan_files(root, files, rules, mode, reporter)?.into_result()
}
