//! External tool invocation.
//!
//! Collaborators (linter, test runner, coverage instrumenter, uploader,
//! report viewer) are opaque programs. Every call goes through a
//! [`CommandRunner`] so the pipeline can be exercised without spawning
//! processes. Calls block until the child exits.

use std::fmt;
use std::fs::File;
use std::process::{Command, Stdio};

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;

use crate::error::{CheckError, CheckResult};

/// A fully-resolved external command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
    /// Program to execute.
    pub program: String,
    /// Arguments, in order.
    pub args: Vec<String>,
    /// File whose contents are piped to the child's stdin.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdin: Option<Utf8PathBuf>,
    /// Working directory for the child.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cwd: Option<Utf8PathBuf>,
}

impl Invocation {
    /// Create an invocation of `program` with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            stdin: None,
            cwd: None,
        }
    }

    /// Append one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Pipe the contents of `path` into the child's stdin.
    #[must_use]
    pub fn stdin_from(mut self, path: impl AsRef<Utf8Path>) -> Self {
        self.stdin = Some(path.as_ref().to_path_buf());
        self
    }

    /// Run the child in `dir`.
    #[must_use]
    pub fn current_dir(mut self, dir: impl AsRef<Utf8Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        if let Some(ref stdin) = self.stdin {
            write!(f, " < {stdin}")?;
        }
        Ok(())
    }
}

/// Exit status of a finished tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolExit {
    /// Exit code, or `None` when the process was killed by a signal.
    pub code: Option<i32>,
}

impl ToolExit {
    /// A successful exit.
    pub const SUCCESS: Self = Self { code: Some(0) };

    /// Returns `true` for exit code 0.
    pub const fn success(self) -> bool {
        matches!(self.code, Some(0))
    }
}

/// Executes external commands.
pub trait CommandRunner {
    /// Run `invocation` to completion and report how it exited.
    fn run(&mut self, invocation: &Invocation) -> CheckResult<ToolExit>;
}

/// Run `invocation` and turn a non-zero exit into [`CheckError::ToolFailed`].
pub fn run_checked(runner: &mut dyn CommandRunner, invocation: &Invocation) -> CheckResult<()> {
    tracing::info!(command = %invocation, "running external tool");
    let exit = runner.run(invocation)?;
    if exit.success() {
        Ok(())
    } else {
        tracing::warn!(tool = %invocation.program, code = ?exit.code, "external tool failed");
        Err(CheckError::ToolFailed {
            tool: invocation.program.clone(),
            code: exit.code,
        })
    }
}

/// Runs commands as child processes, inheriting stdout and stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&mut self, invocation: &Invocation) -> CheckResult<ToolExit> {
        let spawn_error = |source| CheckError::ToolSpawn {
            tool: invocation.program.clone(),
            source,
        };
        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args);
        if let Some(ref dir) = invocation.cwd {
            command.current_dir(dir);
        }
        if let Some(ref path) = invocation.stdin {
            let file = File::open(path).map_err(|source| CheckError::Read {
                path: path.clone(),
                source,
            })?;
            command.stdin(Stdio::from(file));
        }
        let status = command.status().map_err(spawn_error)?;
        Ok(ToolExit {
            code: status.code(),
        })
    }
}
