//! Finding types produced by rules.
//!
//! A [`Finding`] is a single reported issue for a specific resource, file and
//! locale. Findings are self-contained: everything the reporter needs to
//! display the issue is carried on the struct, so the core stays usable as a
//! library without pulling in any output formatting.

use serde::{Deserialize, Serialize};

/// Severity level of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A single issue reported by a rule.
///
/// The `highlight` field marks the offending span with inline bracket tags
/// (`<e0>…</e0>` for the 0th span); a downstream formatter converts those to
/// rendering-specific emphasis. Findings never carry fix suggestions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    /// Name of the rule that produced this finding.
    pub rule: String,
    pub severity: Severity,
    /// Path of the file the resource came from.
    pub path: String,
    /// Target locale of the translation.
    pub locale: String,
    /// Key of the resource within its file.
    pub key: String,
    /// Human description of what is wrong.
    pub description: String,
    /// The source fragment implicated by this finding.
    pub source: String,
    /// Description with the offending span wrapped in `<eN>…</eN>` tags.
    pub highlight: String,
}

impl Ord for Finding {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Sort by: path, key, rule, highlight for deterministic output
        self.path
            .cmp(&other.path)
            .then_with(|| self.key.cmp(&other.key))
            .then_with(|| self.rule.cmp(&other.rule))
            .then_with(|| self.highlight.cmp(&other.highlight))
    }
}

impl PartialOrd for Finding {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
