//! Build pipeline stages.
//!
//! The step set is small and fixed: lint, style scan, test, coverage, and
//! report (open or upload). Each stage is a method on [`Pipeline`]; composed
//! operations such as [`Pipeline::check_style`] are ordinary control flow.
//! External tools run through the pipeline's [`CommandRunner`] with the
//! project root as their working directory.

use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::config::Config;
use crate::error::{CheckError, CheckResult};
use crate::files::FileSet;
use crate::report::Reporter;
use crate::rules::RuleRegistry;
use crate::style_check::{StyleSummary, scan_files};
use crate::tools::{CommandRunner, Invocation, run_checked};

/// A named pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    /// External linter.
    Lint,
    /// Doc-comment style scan.
    StyleScan,
    /// External test runner.
    Test,
    /// Instrumented test run.
    Coverage,
    /// Opening or uploading a coverage report.
    Report,
}

impl Stage {
    /// Stage name as used in logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lint => "lint",
            Self::StyleScan => "style-scan",
            Self::Test => "test",
            Self::Coverage => "coverage",
            Self::Report => "report",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which test files a test run loads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestSelection {
    /// Every module's tests.
    All,
    /// One module's tests.
    Module(String),
}

/// Pick the program used to open a report.
///
/// An explicit override (the `BROWSER` environment variable) wins; otherwise
/// the platform opener for `os` (as in [`std::env::consts::OS`]) is used.
pub fn viewer_for(override_program: Option<&str>, os: &str) -> Option<String> {
    if let Some(program) = override_program.filter(|p| !p.trim().is_empty()) {
        return Some(program.to_string());
    }
    match os {
        "linux" => Some("xdg-open".to_string()),
        "macos" => Some("open".to_string()),
        "windows" => Some("explorer.exe".to_string()),
        _ => None,
    }
}

/// Runs pipeline stages for one project.
pub struct Pipeline<'a> {
    config: &'a Config,
    root: Utf8PathBuf,
    runner: &'a mut dyn CommandRunner,
}

impl<'a> Pipeline<'a> {
    /// Create a pipeline rooted at `root`.
    pub fn new(config: &'a Config, root: impl Into<Utf8PathBuf>, runner: &'a mut dyn CommandRunner) -> Self {
        Self {
            config,
            root: root.into(),
            runner,
        }
    }

    /// The project root that patterns and tools are resolved against.
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    fn invocation(&self, program: &str) -> Invocation {
        Invocation::new(program).current_dir(&self.root)
    }

    fn expand(&self, patterns: &[String]) -> CheckResult<Vec<Utf8PathBuf>> {
        FileSet::new(patterns)?.expand(&self.root)
    }

    /// Run the external linter over the configured lint files.
    ///
    /// Nothing is run when the patterns select no files.
    #[instrument(skip_all, fields(stage = %Stage::Lint))]
    pub fn lint(&mut self) -> CheckResult<()> {
        let lint = &self.config.lint;
        let files = self.expand(&lint.files)?;
        if files.is_empty() {
            warn!("no files matched the lint patterns");
            return Ok(());
        }
        let invocation = self
            .invocation(&lint.program)
            .args(lint.args.iter().cloned())
            .args(files.iter().map(ToString::to_string));
        run_checked(&mut *self.runner, &invocation)
    }

    /// Run the style scan over `files`, or the configured style files when
    /// `files` is empty, failing if any violation is reported.
    #[instrument(skip_all, fields(stage = %Stage::StyleScan))]
    pub fn style_scan(
        &mut self,
        files: &[Utf8PathBuf],
        reporter: &mut dyn Reporter,
    ) -> CheckResult<StyleSummary> {
        let style = &self.config.style;
        let registry = RuleRegistry::with_custom(&style.rules)?;
        let targets = if files.is_empty() {
            self.expand(&style.files)?
        } else {
            files.to_vec()
        };
        if targets.is_empty() {
            warn!("no files matched the style patterns");
        }
        let summary = scan_files(&self.root, &targets, registry.rules(), style.mode, reporter)?;
        info!(
            files = summary.files,
            violations = summary.violations,
            outcome = ?summary.outcome,
            "style scan finished"
        );
        summary.into_result()
    }

    /// Lint, then style scan. Both always run; failures are combined.
    pub fn check_style(&mut self, reporter: &mut dyn Reporter) -> CheckResult<StyleSummary> {
        match (self.lint(), self.style_scan(&[], reporter)) {
            (Ok(()), Ok(summary)) => Ok(summary),
            (Err(err), Ok(_)) | (Ok(()), Err(err)) => Err(err),
            (Err(lint), Err(scan)) => Err(CheckError::Combined(vec![lint, scan])),
        }
    }

    /// Build the test runner invocation for `selection`.
    pub fn test_invocation(&self, selection: &TestSelection) -> CheckResult<Invocation> {
        let test = &self.config.test;
        let patterns = match selection {
            TestSelection::All => test.files.clone(),
            TestSelection::Module(name) => {
                validate_module_name(name)?;
                test.module_files
                    .iter()
                    .map(|p| p.replace("{module}", name))
                    .collect()
            }
        };
        let files = self.expand(&patterns)?;
        if files.is_empty() {
            warn!(?selection, "no test files matched");
        }

        let mut invocation = self
            .invocation(&test.program)
            .args(test.args.iter().cloned())
            .arg("--timeout")
            .arg(test.timeout_ms.to_string());
        if let Some(ref grep) = test.grep {
            invocation = invocation.arg("--grep").arg(grep.clone());
        }
        Ok(invocation
            .args(test.setup.iter().cloned())
            .args(files.iter().map(ToString::to_string)))
    }

    /// Run the test runner.
    #[instrument(skip_all, fields(stage = %Stage::Test, ?selection))]
    pub fn test(&mut self, selection: &TestSelection) -> CheckResult<()> {
        let invocation = self.test_invocation(selection)?;
        run_checked(&mut *self.runner, &invocation)
    }

    /// The default run: check style, then test. Stops after a failed style check.
    pub fn default_run(&mut self, reporter: &mut dyn Reporter) -> CheckResult<()> {
        self.check_style(reporter)?;
        self.test(&TestSelection::All)
    }

    /// Remove the coverage output directory.
    ///
    /// The directory must resolve to a path strictly inside the project
    /// root; the root itself and anything outside it are never removed.
    pub fn clean(&self) -> CheckResult<()> {
        let dir = self.root.join(&self.config.coverage.output_dir);
        if !dir.exists() {
            return Ok(());
        }
        let canonical = |path: &Utf8Path| {
            path.canonicalize_utf8().map_err(|source| CheckError::Io {
                path: path.to_path_buf(),
                source,
            })
        };
        let root = canonical(&self.root)?;
        let target = canonical(&dir)?;
        if target == root || !target.starts_with(&root) {
            warn!(dir = %target, root = %root, "coverage output is not inside the project");
            return Err(CheckError::UnsafeClean { path: target, root });
        }
        info!(dir = %target, "removing coverage output");
        std::fs::remove_dir_all(&target).map_err(|source| CheckError::Io { path: target, source })
    }

    /// Run the whole test suite under the coverage instrumenter.
    ///
    /// The output directory is cleaned first. `report` overrides the
    /// configured report format.
    #[instrument(skip_all, fields(stage = %Stage::Coverage))]
    pub fn coverage(&mut self, report: Option<&str>) -> CheckResult<()> {
        self.clean()?;
        let coverage = &self.config.coverage;
        let tests = self.test_invocation(&TestSelection::All)?;

        let mut invocation = self
            .invocation(&coverage.program)
            .args(coverage.args.iter().cloned())
            .arg("--dir")
            .arg(coverage.output_dir.to_string());
        for pattern in &coverage.exclude {
            invocation = invocation.arg("-x").arg(pattern.clone());
        }
        let invocation = invocation
            .arg("--report")
            .arg(report.unwrap_or(coverage.report.as_str()))
            .arg(tests.program)
            .arg("--")
            .args(tests.args);
        run_checked(&mut *self.runner, &invocation)
    }

    /// Pipe the lcov data file into the coverage upload client.
    #[instrument(skip_all, fields(stage = %Stage::Report))]
    pub fn upload(&mut self) -> CheckResult<()> {
        let coverage = &self.config.coverage;
        let lcov = coverage.lcov_path(&self.root);
        let invocation = self
            .invocation(&coverage.upload.program)
            .args(coverage.upload.args.iter().cloned())
            .stdin_from(&lcov);
        run_checked(&mut *self.runner, &invocation)
    }

    /// Open `file` with `viewer`.
    ///
    /// Viewing is a convenience: a missing viewer or a failed launch is
    /// logged, not returned.
    #[instrument(skip_all, fields(stage = %Stage::Report, file = %file))]
    pub fn open(&mut self, file: &Utf8Path, viewer: Option<&str>) -> CheckResult<()> {
        let Some(viewer) = viewer else {
            warn!("no viewer available on this platform; set BROWSER to choose one");
            return Ok(());
        };
        let invocation = self.invocation(viewer).arg(file.to_string());
        if let Err(err) = run_checked(&mut *self.runner, &invocation) {
            warn!(error = %err, "could not open file");
        }
        Ok(())
    }
}

fn validate_module_name(name: &str) -> CheckResult<()> {
    let invalid = name.is_empty()
        || name.contains(['/', '\\'])
        || name == "."
        || name == "..";
    if invalid {
        return Err(CheckError::InvalidModule {
            name: name.to_string(),
        });
    }
    Ok(())
}
