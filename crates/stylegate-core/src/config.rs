//! Configuration loading and discovery.
//!
//! Configuration is layered with figment. Sources, lowest precedence first:
//! 1. Built-in defaults (the `node_modules/gh-*` module layout)
//! 2. User config: `~/.config/stylegate/config.<ext>`
//! 3. Project config, found by walking up from the working directory
//! 4. Explicit files (`--config`)
//! 5. `STYLEGATE_*` environment variables (`__` separates nested keys,
//!    e.g. `STYLEGATE_TEST__TIMEOUT_MS=120000`)
//!
//! # Project config files
//! - `.stylegate.<ext>` (lower precedence)
//! - `stylegate.<ext>` (higher precedence)
//!
//! Where `<ext>` is one of `toml`, `yaml`, `yml`, `json`. The walk stops at
//! the first directory holding any of them, or at a `.git` boundary.
//!
//! # Example
//! ```toml
//! log_level = "debug"
//!
//! [style]
//! files = ["lib/**/*.js", "!lib/vendor/**"]
//! mode = "all-occurrences"
//!
//! [[style.rules]]
//! pattern = '@callback \s'
//! message = "@callback should be followed by 1 space"
//!
//! [test]
//! timeout_ms = 120000
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::scanner::ScanMode;

/// Per-test timeout handed to the test runner, in milliseconds.
pub const DEFAULT_TEST_TIMEOUT_MS: u64 = 60_000;

/// An extra style rule declared in configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct CustomRule {
    /// Regular expression locating the defect.
    pub pattern: String,
    /// Fixed message reported for every match.
    pub message: String,
}

/// Settings for the doc-comment style scan.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct StyleConfig {
    /// Files to scan. Entries starting with `!` exclude.
    pub files: Vec<String>,
    /// Whether each rule reports its first match or every match per file.
    pub mode: ScanMode,
    /// Rules appended after the built-in registry.
    pub rules: Vec<CustomRule>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            files: strings(&[
                "node_modules/gh-*/**/*.js",
                "!node_modules/gh-*/node_modules/**/*.js",
            ]),
            mode: ScanMode::FirstMatch,
            rules: Vec::new(),
        }
    }
}

/// Settings for the external linter.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct LintConfig {
    /// Linter executable.
    pub program: String,
    /// Arguments placed before the file list.
    pub args: Vec<String>,
    /// Files to lint. Entries starting with `!` exclude.
    pub files: Vec<String>,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            program: "node_modules/.bin/jshint".to_string(),
            args: Vec::new(),
            files: strings(&[
                "Gruntfile.js",
                "node_modules/gh-*/lib/**/*.js",
                "node_modules/gh-*/tests/**/*.js",
                "node_modules/gh-*/config/**/*.js",
            ]),
        }
    }
}

/// Settings for the external test runner.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct TestConfig {
    /// Test runner executable.
    pub program: String,
    /// Arguments placed before the timeout, filter, and file list.
    pub args: Vec<String>,
    /// Files always loaded first (global setup).
    pub setup: Vec<String>,
    /// Test files for a full run.
    pub files: Vec<String>,
    /// Test files for a single module; `{module}` is replaced by its name.
    pub module_files: Vec<String>,
    /// Per-test timeout in milliseconds.
    pub timeout_ms: u64,
    /// Only run tests whose name matches this filter.
    pub grep: Option<String>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            program: "node_modules/.bin/mocha".to_string(),
            args: strings(&["--reporter", "spec", "--slow", "500"]),
            setup: strings(&["node_modules/gh-tests/runner/beforeTests.js"]),
            files: strings(&["node_modules/gh-*/tests/**/*.js"]),
            module_files: strings(&["node_modules/{module}/tests/**/*.js"]),
            timeout_ms: DEFAULT_TEST_TIMEOUT_MS,
            grep: None,
        }
    }
}

/// A plain external program with fixed arguments.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ToolConfig {
    /// Executable.
    pub program: String,
    /// Arguments.
    pub args: Vec<String>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            program: "node_modules/coveralls/bin/coveralls.js".to_string(),
            args: Vec::new(),
        }
    }
}

/// Settings for coverage instrumentation and reporting.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct CoverageConfig {
    /// Instrumenter executable; it wraps the test runner.
    pub program: String,
    /// Arguments placed before the output directory and exclusions.
    pub args: Vec<String>,
    /// Directory the instrumenter writes reports into. Cleaned before each run.
    pub output_dir: Utf8PathBuf,
    /// Default report format.
    pub report: String,
    /// Report format used when uploading.
    pub upload_report: String,
    /// Paths left out of coverage accounting, passed verbatim.
    pub exclude: Vec<String>,
    /// HTML report entry point, relative to `output_dir`.
    pub html_report: Utf8PathBuf,
    /// lcov data file, relative to `output_dir`.
    pub lcov_file: Utf8PathBuf,
    /// Coverage upload service client; receives the lcov file on stdin.
    pub upload: ToolConfig,
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            program: "node_modules/.bin/istanbul".to_string(),
            args: strings(&["cover", "--verbose", "--no-default-excludes"]),
            output_dir: Utf8PathBuf::from("target"),
            report: "lcov".to_string(),
            upload_report: "lcovonly".to_string(),
            exclude: strings(&[
                "node_modules/gh-*/tests/**",
                "node_modules/gh-*/lib/test/**",
                "node_modules/gh-*/config/**",
                "node_modules/gh-*/node_modules/**",
                "Gruntfile.js",
            ]),
            html_report: Utf8PathBuf::from("lcov-report/index.html"),
            lcov_file: Utf8PathBuf::from("lcov.info"),
            upload: ToolConfig::default(),
        }
    }
}

impl CoverageConfig {
    /// Path of the HTML report under `root`.
    pub fn html_report_path(&self, root: &Utf8Path) -> Utf8PathBuf {
        root.join(&self.output_dir).join(&self.html_report)
    }

    /// Path of the lcov data file under `root`.
    pub fn lcov_path(&self, root: &Utf8Path) -> Utf8PathBuf {
        root.join(&self.output_dir).join(&self.lcov_file)
    }
}

/// The configuration for stylegate.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Log level for the application (e.g., "debug", "info", "warn", "error").
    pub log_level: LogLevel,
    /// Directory for log files. File logging is off when unset.
    pub log_dir: Option<Utf8PathBuf>,
    /// Doc-comment style scan.
    pub style: StyleConfig,
    /// External linter.
    pub lint: LintConfig,
    /// External test runner.
    pub test: TestConfig,
    /// Coverage instrumentation, report, and upload.
    pub coverage: CoverageConfig,
}

/// Log level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Verbose output for debugging and development.
    Debug,
    /// Standard operational information (default).
    #[default]
    Info,
    /// Warnings about potential issues.
    Warn,
    /// Errors that indicate failures.
    Error,
}

impl LogLevel {
    /// Returns the log level as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Metadata about which configuration sources were loaded.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigSources {
    /// Project config files found by walking up, ordered low→high precedence.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub project_files: Vec<Utf8PathBuf>,
    /// User config file from XDG config directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_file: Option<Utf8PathBuf>,
    /// Explicit config files loaded (e.g., from `--config` flag).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub explicit_files: Vec<Utf8PathBuf>,
}

impl ConfigSources {
    /// Returns the highest-precedence config file that was loaded.
    ///
    /// Precedence: explicit files > project files > user file.
    pub fn primary_file(&self) -> Option<&Utf8Path> {
        self.explicit_files
            .last()
            .map(Utf8PathBuf::as_path)
            .or_else(|| self.project_files.last().map(Utf8PathBuf::as_path))
            .or(self.user_file.as_deref())
    }

    /// Directory that file patterns are resolved against.
    ///
    /// This is the directory holding the project config, or `cwd` when no
    /// project config was found.
    pub fn project_root(&self, cwd: &Utf8Path) -> Utf8PathBuf {
        self.project_files
            .last()
            .and_then(|p| p.parent())
            .map_or_else(|| cwd.to_path_buf(), Utf8Path::to_path_buf)
    }
}

/// Supported configuration file extensions (in order of preference).
const CONFIG_EXTENSIONS: &[&str] = &["toml", "yaml", "yml", "json"];

/// Application name for XDG directory lookup and config file names.
const APP_NAME: &str = "stylegate";

/// Builder for loading configuration from multiple sources.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    project_search_root: Option<Utf8PathBuf>,
    include_user_config: bool,
    boundary_marker: Option<String>,
    explicit_files: Vec<Utf8PathBuf>,
}

impl ConfigLoader {
    /// Create a new config loader with default settings.
    pub fn new() -> Self {
        Self {
            project_search_root: None,
            include_user_config: true,
            boundary_marker: Some(".git".to_string()),
            explicit_files: Vec::new(),
        }
    }

    /// Set the starting directory for project config search.
    pub fn with_project_search<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.project_search_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set whether to include user config from `~/.config/stylegate/`.
    pub const fn with_user_config(mut self, include: bool) -> Self {
        self.include_user_config = include;
        self
    }

    /// Stop the upward search at a directory containing `marker`. Default is `.git`.
    pub fn with_boundary_marker<S: Into<String>>(mut self, marker: S) -> Self {
        self.boundary_marker = Some(marker.into());
        self
    }

    /// Disable boundary marker (search all the way to filesystem root).
    pub fn without_boundary_marker(mut self) -> Self {
        self.boundary_marker = None;
        self
    }

    /// Add an explicit config file. Later files take precedence.
    pub fn with_file<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.explicit_files.push(path.as_ref().to_path_buf());
        self
    }

    /// Load configuration, merging all discovered sources.
    #[tracing::instrument(skip(self), fields(search_root = ?self.project_search_root))]
    pub fn load(self) -> ConfigResult<(Config, ConfigSources)> {
        tracing::debug!("loading configuration");
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        let mut sources = ConfigSources::default();

        if self.include_user_config
            && let Some(user_config) = self.find_user_config()
        {
            figment = Self::merge_file(figment, &user_config);
            sources.user_file = Some(user_config);
        }

        if let Some(ref root) = self.project_search_root {
            let project_configs = self.find_project_configs(root);
            for pc in &project_configs {
                figment = Self::merge_file(figment, pc);
            }
            sources.project_files = project_configs;
        }

        for file in &self.explicit_files {
            figment = Self::merge_file(figment, file);
        }
        sources.explicit_files = self.explicit_files;

        figment = figment.merge(Env::prefixed("STYLEGATE_").lowercase(true).split("__"));

        let config: Config = figment
            .extract()
            .map_err(|e| ConfigError::Deserialize(Box::new(e)))?;
        tracing::info!(
            log_level = config.log_level.as_str(),
            custom_rules = config.style.rules.len(),
            "configuration loaded"
        );
        Ok((config, sources))
    }

    /// Load configuration, returning an error if no config file is found.
    pub fn load_or_error(self) -> ConfigResult<(Config, ConfigSources)> {
        let has_user = self.include_user_config && self.find_user_config().is_some();
        let has_project = self
            .project_search_root
            .as_ref()
            .is_some_and(|root| !self.find_project_configs(root).is_empty());
        let has_explicit = !self.explicit_files.is_empty();

        if !has_user && !has_project && !has_explicit {
            return Err(ConfigError::NotFound);
        }

        self.load()
    }

    /// Walk up from `start` and return the config files of the closest
    /// directory that has any, dotfiles first.
    fn find_project_configs(&self, start: &Utf8Path) -> Vec<Utf8PathBuf> {
        let mut current = Some(start.to_path_buf());

        while let Some(dir) = current {
            let mut found = Vec::new();
            for prefix in [".", ""] {
                for ext in CONFIG_EXTENSIONS {
                    let candidate = dir.join(format!("{prefix}{APP_NAME}.{ext}"));
                    if candidate.is_file() {
                        found.push(candidate);
                    }
                }
            }

            if !found.is_empty() {
                return found;
            }

            // Checked after the config files so a config next to the marker is found.
            if let Some(ref marker) = self.boundary_marker
                && dir.join(marker).exists()
                && dir != start
            {
                break;
            }

            current = dir.parent().map(Utf8Path::to_path_buf);
        }

        Vec::new()
    }

    fn find_user_config(&self) -> Option<Utf8PathBuf> {
        let config_dir = user_config_dir()?;
        CONFIG_EXTENSIONS
            .iter()
            .map(|ext| config_dir.join(format!("config.{ext}")))
            .find(|path| path.is_file())
    }

    /// Merge a config file into the figment, detecting format from extension.
    fn merge_file(figment: Figment, path: &Utf8Path) -> Figment {
        match path.extension() {
            Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path.as_str())),
            Some("json") => figment.merge(Json::file_exact(path.as_str())),
            _ => figment.merge(Toml::file_exact(path.as_str())),
        }
    }
}

/// Get the user config directory path.
///
/// Returns `~/.config/stylegate/` on Linux, `~/Library/Application Support/stylegate/`
/// on macOS, and equivalent on other platforms.
pub fn user_config_dir() -> Option<Utf8PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("", "", APP_NAME)?;
    Utf8PathBuf::from_path_buf(proj_dirs.config_dir().to_path_buf()).ok()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}
