//! Error types for stylegate-core.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// Configuration file not found after searching all locations.
    #[error("no configuration file found")]
    NotFound,
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while running a build step.
#[derive(Error, Debug)]
pub enum CheckError {
    /// A target file could not be read. Fatal for the style check.
    #[error("failed to read {path}")]
    Read {
        /// The file that could not be read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A file glob in the configuration is malformed.
    #[error("invalid glob pattern `{pattern}`")]
    Pattern {
        /// The offending pattern.
        pattern: String,
        /// Why the pattern was rejected.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A directory could not be removed or created.
    #[error("failed to prepare {path}")]
    Io {
        /// The directory being prepared.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A directory to be cleaned is the project root or lies outside it.
    #[error("refusing to remove {path}: not a directory inside {root}")]
    UnsafeClean {
        /// The directory that would have been removed.
        path: Utf8PathBuf,
        /// The project root it must be inside.
        root: Utf8PathBuf,
    },

    /// A module name that cannot select test files.
    #[error("invalid module name `{name}`")]
    InvalidModule {
        /// The rejected name.
        name: String,
    },

    /// A configured style rule has an invalid regular expression.
    #[error("invalid style rule pattern `{pattern}`")]
    InvalidRule {
        /// The offending regular expression.
        pattern: String,
        /// The compile error from the regex engine.
        #[source]
        source: regex::Error,
    },

    /// The style scan recorded at least one violation.
    #[error("style rule validation failed ({count} violation(s))")]
    StyleViolations {
        /// Total number of reported violations.
        count: usize,
    },

    /// An external tool could not be started.
    #[error("failed to run {tool}")]
    ToolSpawn {
        /// The program that failed to start.
        tool: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An external tool exited unsuccessfully.
    #[error("{tool} exited with {}", describe_exit(.code))]
    ToolFailed {
        /// The program that failed.
        tool: String,
        /// Exit code, if the process was not killed by a signal.
        code: Option<i32>,
    },

    /// Several independent steps failed in one run.
    #[error("{}", join_failures(.0))]
    Combined(Vec<CheckError>),
}

impl CheckError {
    /// Merge a list of step failures into a single error.
    ///
    /// Returns `None` for an empty list and the error itself for a single entry.
    pub fn combine(mut failures: Vec<Self>) -> Option<Self> {
        match failures.len() {
            0 => None,
            1 => failures.pop(),
            _ => Some(Self::Combined(failures)),
        }
    }

    /// Exit code to propagate from this failure.
    ///
    /// Tool failures forward the tool's own code; everything else maps to 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ToolFailed { code: Some(code), .. } if *code != 0 => *code,
            Self::Combined(failures) => failures.first().map_or(1, Self::exit_code),
            _ => 1,
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    code.map_or_else(|| "a signal".to_string(), |c| format!("exit code {c}"))
}

fn join_failures(failures: &[CheckError]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type alias using [`CheckError`].
pub type CheckResult<T> = Result<T, CheckError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combine_empty_is_none() {
        assert!(CheckError::combine(Vec::new()).is_none());
    }

    #[test]
    fn combine_single_unwraps() {
        let err = CheckError::combine(vec![CheckError::StyleViolations { count: 2 }]).unwrap();
        assert!(matches!(err, CheckError::StyleViolations { count: 2 }));
    }

    #[test]
    fn combined_message_lists_every_failure() {
        let err = CheckError::combine(vec![
            CheckError::ToolFailed {
                tool: "jshint".to_string(),
                code: Some(2),
            },
            CheckError::StyleViolations { count: 1 },
        ])
        .unwrap();
        let msg = err.to_string();
        assert!(msg.contains("jshint exited with exit code 2"), "{msg}");
        assert!(msg.contains("style rule validation failed"), "{msg}");
    }

    #[test]
    fn tool_exit_code_is_forwarded() {
        let err = CheckError::ToolFailed {
            tool: "mocha".to_string(),
            code: Some(3),
        };
        assert_eq!(err.exit_code(), 3);
        let killed = CheckError::ToolFailed {
            tool: "mocha".to_string(),
            code: None,
        };
        assert_eq!(killed.exit_code(), 1);
        assert_eq!(CheckError::StyleViolations { count: 1 }.exit_code(), 1);
    }
}
