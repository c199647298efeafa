//! Declarative pattern rule engine.
//!
//! The engine owns an ordered list of regex patterns, compiled once at
//! construction and reused for every resource. It knows nothing about what a
//! pattern *means*: a concrete rule supplies that through the [`CheckString`]
//! capability, so the engine is not usable on its own.

use anyhow::{Context, Result};
use regex::Regex;

use crate::findings::Finding;
use crate::resource::{Resource, each_string_pair};

/// Per-pattern check supplied by a concrete rule.
pub trait CheckString {
    /// Examine one source/target pair against one compiled pattern and
    /// return zero or more findings.
    fn check_string(
        &self,
        pattern: &Regex,
        source: &str,
        target: &str,
        path: &str,
        locale: &str,
        resource: &Resource,
    ) -> Vec<Finding>;
}

/// Ordered list of compiled patterns shared by declarative rules.
#[derive(Debug, Clone)]
pub struct PatternRuleEngine {
    patterns: Vec<Regex>,
}

impl PatternRuleEngine {
    /// Compile all patterns up front. A syntactically invalid pattern is a
    /// configuration error, surfaced here and never deferred to match time.
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut compiled = Vec::new();
        for pattern in patterns {
            let pattern = pattern.as_ref();
            compiled.push(
                Regex::new(pattern)
                    .with_context(|| format!("Invalid rule pattern: \"{}\"", pattern))?,
            );
        }
        Ok(PatternRuleEngine { patterns: compiled })
    }

    /// Run every pattern's check against one source/target pair, in pattern
    /// order, and concatenate the findings.
    ///
    /// Returns `None` when the final list is empty: no result means no issue.
    pub fn match_string(
        &self,
        checker: &impl CheckString,
        source: &str,
        target: &str,
        path: &str,
        locale: &str,
        resource: &Resource,
    ) -> Option<Vec<Finding>> {
        let findings: Vec<Finding> = self
            .patterns
            .iter()
            .flat_map(|pattern| checker.check_string(pattern, source, target, path, locale, resource))
            .collect();
        if findings.is_empty() { None } else { Some(findings) }
    }

    /// Shape-dispatch over the resource and apply [`Self::match_string`] to
    /// every aligned string pair.
    ///
    /// `None` means the resource did not type-check against its declared
    /// shape and the rule did not apply; `Some` means it applied, with
    /// whatever findings the pairs produced.
    pub fn match_resource(
        &self,
        checker: &impl CheckString,
        resource: &Resource,
        path: &str,
        locale: &str,
    ) -> Option<Vec<Finding>> {
        each_string_pair(resource, |source, target| {
            self.match_string(checker, source, target, path, locale, resource)
                .unwrap_or_default()
        })
    }
}

/// Substrings of `source` matched by `pattern` that do not occur in
/// `target`, deduplicated, in first-occurrence order.
pub(crate) fn missing_matches<'a>(
    pattern: &Regex,
    source: &'a str,
    target: &str,
) -> Vec<&'a str> {
    let mut missing: Vec<&str> = Vec::new();
    for found in pattern.find_iter(source) {
        let text = found.as_str();
        if !target.contains(text) && !missing.contains(&text) {
            missing.push(text);
        }
    }
    missing
}
