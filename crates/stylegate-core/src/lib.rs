//! Core library for stylegate.
//!
//! This crate holds the doc-comment style scanner and the build pipeline
//! that drives the external linter, test runner, and coverage tools. The
//! `stylegate` CLI is a thin layer over it.
//!
//! # Modules
//!
//! - [`rules`] - Style rules and the ordered rule registry
//! - [`scanner`] - Apply rules to a text
//! - [`locate`] - Map a byte offset to its line
//! - [`report`] - Violations and reporters
//! - [`style_check`] - Scan a file set and decide pass or fail
//! - [`files`] - Glob-based target file expansion
//! - [`tools`] - External command invocation
//! - [`pipeline`] - Lint, scan, test, coverage, and report stages
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//!
//! # Quick Start
//!
//! ```no_run
//! use stylegate_core::{CollectingReporter, ConfigLoader, Pipeline, SystemRunner};
//!
//! let (config, _sources) = ConfigLoader::new()
//!     .with_project_search(".")
//!     .load()
//!     .expect("Failed to load configuration");
//!
//! let mut runner = SystemRunner;
//! let mut reporter = CollectingReporter::new();
//! let result = Pipeline::new(&config, ".", &mut runner).style_scan(&[], &mut reporter);
//! for v in reporter.violations() {
//!     println!("{}:{}: {}", v.file, v.line, v.message);
//! }
//! assert!(result.is_ok());
//! ```
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod files;
pub mod locate;
pub mod pipeline;
pub mod report;
pub mod rules;
pub mod scanner;
pub mod style_check;
pub mod tools;

pub use config::{Config, ConfigLoader, ConfigSources, LogLevel};
pub use error::{CheckError, CheckResult, ConfigError, ConfigResult};
pub use locate::{LineInfo, locate};
pub use pipeline::{Pipeline, Stage, TestSelection, viewer_for};
pub use report::{CollectingReporter, Outcome, Reporter, Violation, format_diagnostic};
pub use rules::{Rule, RuleInfo, RuleRegistry, builtin_rules};
pub use scanner::{Match, ScanMode, scan};
pub use style_check::{StyleSummary, run_style_check, scan_files};
pub use tools::{CommandRunner, Invocation, SystemRunner, ToolExit};
