//! Do-not-translate term preservation rule.
//!
//! Verifies that every configured DNT term appearing in a source value also
//! appears, verbatim, in the corresponding target value. The aggregation
//! policy is shape-specific; see [`DntTermsRule`].

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde_json::Value;

use crate::findings::{Finding, Severity};
use crate::resource::{PluralCategory, Resource, ResourceContent};
use crate::rules::Rule;

pub const DNT_TERMS: &str = "dnt-terms";

/// Format of an external term-source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermsFileType {
    /// JSON array of strings.
    Json,
    /// One term per line, lines trimmed, blank lines dropped.
    Txt,
}

/// A deduplicated, order-insensitive set of non-empty terms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermSet {
    terms: Vec<String>,
}

impl TermSet {
    /// Build a term set from explicit terms, trimming each one and dropping
    /// blanks and duplicates.
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut deduped: Vec<String> = Vec::new();
        for term in terms {
            let term = term.as_ref().trim();
            if !term.is_empty() && !deduped.iter().any(|t| t == term) {
                deduped.push(term.to_string());
            }
        }
        TermSet { terms: deduped }
    }

    /// Read a term set from a file. The file is read exactly once, here; a
    /// read or parse failure is fatal to rule construction.
    pub fn from_file(path: &Path, file_type: TermsFileType) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read term file {:?}", path))?;
        match file_type {
            TermsFileType::Json => {
                let terms: Vec<String> = serde_json::from_str(&content).with_context(|| {
                    format!("Term file {:?} must be a JSON array of strings", path)
                })?;
                Ok(TermSet::new(terms))
            }
            TermsFileType::Txt => Ok(TermSet::new(content.lines())),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }
}

/// Construction parameters, as they appear in a rule-set definition.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct DntTermsParams {
    #[serde(default)]
    terms: Option<Vec<String>>,
    #[serde(default)]
    terms_file: Option<PathBuf>,
    #[serde(default)]
    terms_file_type: Option<TermsFileType>,
}

/// Checks that DNT terms present in the source survive into the target.
///
/// Dispatch is by resource shape, and shape dictates aggregation:
/// - `string`: one finding per term contained in the source but not the
///   target; a single pair may produce several findings;
/// - `array`: the string policy applied per index-aligned pair, findings
///   concatenated in index order, missing target index reads as `""`;
/// - `plural`: a term is checked when *any* source category contains it;
///   *every* target category must then contain it, and at most one finding
///   is emitted per term, citing the first matching source category.
///
/// Shape/content mismatches produce no findings; the rule declines rather
/// than erroring.
#[derive(Debug, Clone)]
pub struct DntTermsRule {
    terms: TermSet,
}

impl DntTermsRule {
    pub fn new(terms: TermSet) -> Self {
        DntTermsRule { terms }
    }

    /// Build from a rule-set parameter value: `true` (or `{}`) for an empty,
    /// always-passing rule, or an object naming exactly one term source.
    pub fn from_params(params: &Value) -> Result<Self> {
        let params: DntTermsParams = match params {
            Value::Bool(true) => DntTermsParams::default(),
            Value::Object(_) => serde_json::from_value(params.clone())
                .context("Invalid parameters for rule 'dnt-terms'")?,
            other => bail!(
                "Rule 'dnt-terms' expects true or a parameter object, got {}",
                other
            ),
        };

        let terms = match (params.terms, params.terms_file, params.terms_file_type) {
            (Some(terms), None, None) => TermSet::new(terms),
            (None, Some(path), Some(file_type)) => TermSet::from_file(&path, file_type)?,
            (None, None, None) => TermSet::default(),
            (None, Some(_), None) => {
                bail!("Rule 'dnt-terms': 'termsFile' requires 'termsFileType' (json or txt)")
            }
            _ => bail!("Rule 'dnt-terms': supply either 'terms' or 'termsFile', not both"),
        };
        Ok(DntTermsRule::new(terms))
    }

    fn check_pair(
        &self,
        source: &str,
        target: &str,
        resource: &Resource,
        path: &str,
        locale: &str,
    ) -> Vec<Finding> {
        self.terms
            .iter()
            .filter(|term| source.contains(term) && !target.contains(term))
            .map(|term| self.finding(term, source, resource, path, locale))
            .collect()
    }

    /// Any source category containing a term triggers the check; every
    /// target category must then carry the term. One finding per term.
    fn check_plural(
        &self,
        source: &[(PluralCategory, &str)],
        target: &[(PluralCategory, &str)],
        resource: &Resource,
        path: &str,
        locale: &str,
    ) -> Vec<Finding> {
        self.terms
            .iter()
            .filter_map(|term| {
                let (_, cited) = source.iter().find(|(_, text)| text.contains(term))?;
                let failed = target.iter().any(|(_, text)| !text.contains(term));
                failed.then(|| self.finding(term, cited, resource, path, locale))
            })
            .collect()
    }

    fn finding(
        &self,
        term: &str,
        source: &str,
        resource: &Resource,
        path: &str,
        locale: &str,
    ) -> Finding {
        Finding {
            rule: DNT_TERMS.to_string(),
            severity: Severity::Error,
            path: path.to_string(),
            locale: locale.to_string(),
            key: resource.key.clone(),
            description: format!(
                "Do-not-translate term \"{}\" is missing from the target",
                term
            ),
            source: source.to_string(),
            highlight: format!("Missing term: <e0>{}</e0>", term),
        }
    }
}

impl Rule for DntTermsRule {
    fn name(&self) -> &str {
        DNT_TERMS
    }

    fn description(&self) -> &str {
        "Ensure that do-not-translate terms in the source also appear in the target"
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn match_resource(&self, resource: &Resource, path: &str, locale: &str) -> Option<Vec<Finding>> {
        if self.terms.is_empty() {
            return None;
        }
        let findings = match resource.content()? {
            ResourceContent::String { source, target } => {
                self.check_pair(source, target.unwrap_or(""), resource, path, locale)
            }
            ResourceContent::Array { source, target } => source
                .iter()
                .enumerate()
                .flat_map(|(i, src)| {
                    let tgt = target.get(i).copied().unwrap_or("");
                    self.check_pair(src, tgt, resource, path, locale)
                })
                .collect(),
            ResourceContent::Plural { source, target } => {
                self.check_plural(&source, &target, resource, path, locale)
            }
        };
        Some(findings)
    }
}
