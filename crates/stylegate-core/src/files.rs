//! Target file expansion.
//!
//! File lists are written as glob patterns relative to the project root.
//! A pattern prefixed with `!` removes matching paths from the set, so
//! `["lib/**/*.js", "!lib/vendor/**"]` selects every script outside
//! `lib/vendor`. Order follows the include patterns; duplicates are dropped.

use std::collections::HashSet;

use camino::{Utf8Path, Utf8PathBuf};
use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::error::{CheckError, CheckResult};

/// A compiled set of include and exclude patterns.
#[derive(Debug)]
pub struct FileSet {
    includes: Vec<String>,
    excludes: GlobSet,
}

impl FileSet {
    /// Compile a pattern list. Entries starting with `!` are excludes.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> CheckResult<Self> {
        let mut includes = Vec::new();
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let pattern = pattern.as_ref();
            if let Some(negated) = pattern.strip_prefix('!') {
                let glob = Glob::new(negated).map_err(|e| CheckError::Pattern {
                    pattern: pattern.to_string(),
                    source: Box::new(e),
                })?;
                builder.add(glob);
            } else {
                includes.push(pattern.to_string());
            }
        }
        let excludes = builder.build().map_err(|e| CheckError::Pattern {
            pattern: patterns
                .iter()
                .map(AsRef::as_ref)
                .filter(|p| p.starts_with('!'))
                .collect::<Vec<_>>()
                .join(", "),
            source: Box::new(e),
        })?;
        Ok(Self { includes, excludes })
    }

    /// Returns `true` if `relative` is removed by an exclude pattern.
    pub fn is_excluded(&self, relative: &Utf8Path) -> bool {
        self.excludes.is_match(relative.as_std_path())
    }

    /// Expand the patterns against `root`, returning existing files.
    ///
    /// Returned paths are relative to `root` when the patterns are.
    pub fn expand(&self, root: &Utf8Path) -> CheckResult<Vec<Utf8PathBuf>> {
        let mut seen = HashSet::new();
        let mut files = Vec::new();
        // Only the pattern is glob syntax; the root is matched literally.
        let base = Utf8PathBuf::from(glob::Pattern::escape(root.as_str()));
        for pattern in &self.includes {
            let absolute = base.join(pattern);
            let entries = glob::glob(absolute.as_str()).map_err(|e| CheckError::Pattern {
                pattern: pattern.clone(),
                source: Box::new(e),
            })?;
            for entry in entries {
                let path = match entry {
                    Ok(path) => path,
                    Err(e) => {
                        tracing::warn!(pattern = %pattern, error = %e, "skipping unreadable path");
                        continue;
                    }
                };
                if !path.is_file() {
                    continue;
                }
                let Ok(path) = Utf8PathBuf::from_path_buf(path) else {
                    tracing::warn!(pattern = %pattern, "skipping non UTF-8 path");
                    continue;
                };
                let relative = path
                    .strip_prefix(root)
                    .map(Utf8Path::to_path_buf)
                    .unwrap_or(path);
                if self.is_excluded(&relative) {
                    continue;
                }
                if seen.insert(relative.clone()) {
                    files.push(relative);
                }
            }
        }
        tracing::debug!(count = files.len(), "expanded file patterns");
        Ok(files)
    }
}
