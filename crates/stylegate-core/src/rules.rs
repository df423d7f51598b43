//! Doc-comment style rule registry.
//!
//! A rule is plain data: a regular expression that finds one style defect and
//! the fixed message reported when it does. The built-in registry checks the
//! tag spacing conventions for `@param`, `@return`, and `@throws`. Projects
//! can append their own rules from configuration; they run after the
//! built-ins, in the order they are declared.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::config::CustomRule;
use crate::error::{CheckError, CheckResult};

/// A compiled style rule.
#[derive(Debug, Clone)]
pub struct Rule {
    pattern: Regex,
    message: String,
}

impl Rule {
    /// Compile a rule from a pattern and its violation message.
    pub fn new(pattern: &str, message: impl Into<String>) -> CheckResult<Self> {
        let compiled = Regex::new(pattern).map_err(|source| CheckError::InvalidRule {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            pattern: compiled,
            message: message.into(),
        })
    }

    /// The compiled pattern.
    pub const fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// The message reported for every match of this rule.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Serializable view of a rule, used by `rules --json`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RuleInfo {
    /// Regular expression source.
    pub pattern: String,
    /// Violation message.
    pub message: String,
    /// Whether the rule ships with stylegate or came from configuration.
    pub builtin: bool,
}

/// The built-in rules as `(pattern, message)` pairs, in evaluation order.
pub const BUILTIN_RULES: &[(&str, &str)] = &[
    (r"@param (\S|\s\s)", "@param should be followed by 2 spaces"),
    (r"@return \s", "@return should be followed by 1 space"),
    (r"@returns", "Use @return instead of @returns"),
    (r"@throws \s", "@throws should be followed by 1 space"),
];

static BUILTIN: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    BUILTIN_RULES
        .iter()
        .map(|(pattern, message)| Rule {
            pattern: Regex::new(pattern).expect("built-in rule pattern should compile"),
            message: (*message).to_string(),
        })
        .collect()
});

/// The built-in doc-comment rules.
pub fn builtin_rules() -> &'static [Rule] {
    &BUILTIN
}

/// An ordered rule registry: built-ins first, then configured extras.
#[derive(Debug, Clone)]
pub struct RuleRegistry {
    rules: Vec<Rule>,
    builtin_count: usize,
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self {
            rules: builtin_rules().to_vec(),
            builtin_count: BUILTIN_RULES.len(),
        }
    }
}

impl RuleRegistry {
    /// Build the registry from the built-ins plus `extra` configured rules.
    ///
    /// Fails on the first configured rule whose pattern does not compile.
    pub fn with_custom(extra: &[CustomRule]) -> CheckResult<Self> {
        let mut registry = Self::default();
        for custom in extra {
            registry
                .rules
                .push(Rule::new(&custom.pattern, custom.message.clone())?);
        }
        tracing::debug!(
            builtin = registry.builtin_count,
            custom = extra.len(),
            "rule registry compiled"
        );
        Ok(registry)
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Describe every rule for listing.
    pub fn describe(&self) -> Vec<RuleInfo> {
        self.rules
            .iter()
            .enumerate()
            .map(|(idx, rule)| RuleInfo {
                pattern: rule.pattern.as_str().to_string(),
                message: rule.message.clone(),
                builtin: idx < self.builtin_count,
            })
            .collect()
    }
}
