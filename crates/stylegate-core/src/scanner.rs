//! Rule scanner.
//!
//! Applies a rule registry to a body of text and returns the located matches.
//! By default each rule contributes at most its first match in the text,
//! which answers "does this defect appear anywhere in the file". The
//! [`ScanMode::AllOccurrences`] mode reports every non-overlapping match.

use serde::{Deserialize, Serialize};

use crate::rules::Rule;

/// How many matches each rule may contribute per file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ScanMode {
    /// The first match of each rule (default).
    #[default]
    FirstMatch,
    /// Every non-overlapping match of each rule.
    AllOccurrences,
}

/// One located occurrence of a rule's pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
    /// The message of the rule that matched.
    pub message: String,
    /// Byte offset of the start of the match.
    pub offset: usize,
    /// The exact matched text.
    pub matched: String,
}

/// Scan `text` with `rules`, returning matches in rule order.
///
/// Within a rule, matches are ordered by offset. The function is pure: the
/// same inputs always produce the same matches.
pub fn scan(text: &str, rules: &[Rule], mode: ScanMode) -> Vec<Match> {
    let mut matches = Vec::new();
    for rule in rules {
        let to_match = |m: regex::Match<'_>| Match {
            message: rule.message().to_string(),
            offset: m.start(),
            matched: m.as_str().to_string(),
        };
        match mode {
            ScanMode::FirstMatch => matches.extend(rule.pattern().find(text).map(to_match)),
            ScanMode::AllOccurrences => matches.extend(rule.pattern().find_iter(text).map(to_match)),
        }
    }
    matches
}
