//! Config-declared pattern rules.
//!
//! The `rules` table of the configuration declares additional rules from
//! plain data. Each declaration carries a kind tag; the only kind today is
//! `resource-matcher`: a list of regexps whose source matches must appear
//! verbatim in the target. An unknown kind fails at load, not at match time.

use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::findings::{Finding, Severity};
use crate::resource::Resource;
use crate::rules::Rule;
use crate::rules::matcher::{CheckString, PatternRuleEngine, missing_matches};

/// A rule declaration as it appears in the `rules` config table.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
enum RuleDeclaration {
    ResourceMatcher(MatcherDeclaration),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct MatcherDeclaration {
    description: String,
    /// Finding text; `{matchString}` expands to the matched source text.
    note: String,
    #[serde(default)]
    link: Option<String>,
    regexps: Vec<String>,
    #[serde(default)]
    severity: Option<Severity>,
}

/// A pattern rule instantiated from configuration data.
#[derive(Debug, Clone)]
pub struct DeclarativeRule {
    name: String,
    description: String,
    note: String,
    link: Option<String>,
    severity: Severity,
    engine: PatternRuleEngine,
}

impl DeclarativeRule {
    /// Validate and compile a declaration. Unknown kind, malformed fields
    /// and invalid regexps are all configuration errors raised here.
    pub fn new(name: &str, declaration: &Value) -> Result<Self> {
        let RuleDeclaration::ResourceMatcher(decl) =
            serde_json::from_value(declaration.clone())
                .with_context(|| format!("Invalid declaration for rule '{}'", name))?;
        let engine = PatternRuleEngine::new(&decl.regexps)
            .with_context(|| format!("Invalid declaration for rule '{}'", name))?;
        Ok(DeclarativeRule {
            name: name.to_string(),
            description: decl.description,
            note: decl.note,
            link: decl.link,
            severity: decl.severity.unwrap_or(Severity::Error),
            engine,
        })
    }
}

impl CheckString for DeclarativeRule {
    fn check_string(
        &self,
        pattern: &Regex,
        source: &str,
        target: &str,
        path: &str,
        locale: &str,
        resource: &Resource,
    ) -> Vec<Finding> {
        missing_matches(pattern, source, target)
            .into_iter()
            .map(|text| Finding {
                rule: self.name.clone(),
                severity: self.severity,
                path: path.to_string(),
                locale: locale.to_string(),
                key: resource.key.clone(),
                description: self.note.replace("{matchString}", text),
                source: source.to_string(),
                highlight: self
                    .note
                    .replace("{matchString}", &format!("<e0>{}</e0>", text)),
            })
            .collect()
    }
}

impl Rule for DeclarativeRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn severity(&self) -> Severity {
        self.severity
    }

    fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    fn match_resource(&self, resource: &Resource, path: &str, locale: &str) -> Option<Vec<Finding>> {
        self.engine.match_resource(self, resource, path, locale)
    }
}
