//! Named replacement parameter preservation rule.

use anyhow::Result;
use regex::Regex;

use crate::findings::{Finding, Severity};
use crate::resource::Resource;
use crate::rules::Rule;
use crate::rules::matcher::{CheckString, PatternRuleEngine, missing_matches};

pub const NAMED_PARAMS: &str = "named-params";

const PARAM_PATTERN: &str = r"\{[A-Za-z_][A-Za-z0-9_]*\}";

/// Named replacement parameters like `{name}` in the source must appear
/// verbatim in the target, or the formatter will render a hole.
#[derive(Debug, Clone)]
pub struct NamedParamsRule {
    engine: PatternRuleEngine,
}

impl NamedParamsRule {
    pub fn new() -> Result<Self> {
        Ok(NamedParamsRule {
            engine: PatternRuleEngine::new([PARAM_PATTERN])?,
        })
    }
}

impl CheckString for NamedParamsRule {
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
            .map(|param| Finding {
                rule: NAMED_PARAMS.to_string(),
                severity: self.severity(),
                path: path.to_string(),
                locale: locale.to_string(),
                key: resource.key.clone(),
                description: format!(
                    "Replacement parameter \"{}\" from the source is missing from the target",
                    param
                ),
                source: source.to_string(),
                highlight: format!("Missing parameter: <e0>{}</e0>", param),
            })
            .collect()
    }
}

impl Rule for NamedParamsRule {
    fn name(&self) -> &str {
        NAMED_PARAMS
    }

    fn description(&self) -> &str {
        "Ensure that named replacement parameters in the source also appear in the target"
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn match_resource(&self, resource: &Resource, path: &str, locale: &str) -> Option<Vec<Finding>> {
        self.engine.match_resource(self, resource, path, locale)
    }
}
