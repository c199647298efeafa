//! URL preservation rule.

use anyhow::Result;
use regex::Regex;

use crate::findings::{Finding, Severity};
use crate::resource::Resource;
use crate::rules::Rule;
use crate::rules::matcher::{CheckString, PatternRuleEngine, missing_matches};

pub const URL_MATCH: &str = "url-match";

const URL_PATTERN: &str = r#"https?://[^\s"'<>)\]]+"#;

/// URLs in the source must appear verbatim in the target.
#[derive(Debug, Clone)]
pub struct UrlMatchRule {
    engine: PatternRuleEngine,
}

impl UrlMatchRule {
    pub fn new() -> Result<Self> {
        Ok(UrlMatchRule {
            engine: PatternRuleEngine::new([URL_PATTERN])?,
        })
    }
}

impl CheckString for UrlMatchRule {
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
            .map(|url| Finding {
                rule: URL_MATCH.to_string(),
                severity: self.severity(),
                path: path.to_string(),
                locale: locale.to_string(),
                key: resource.key.clone(),
                description: format!("URL \"{}\" from the source is missing from the target", url),
                source: source.to_string(),
                highlight: format!("Missing URL: <e0>{}</e0>", url),
            })
            .collect()
    }
}

impl Rule for UrlMatchRule {
    fn name(&self) -> &str {
        URL_MATCH
    }

    fn description(&self) -> &str {
        "Ensure that URLs in the source also appear in the target"
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn match_resource(&self, resource: &Resource, path: &str, locale: &str) -> Option<Vec<Finding>> {
        self.engine.match_resource(self, resource, path, locale)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::resource::ResourceShape;
    use crate::rules::url_match::*;

    fn string_resource(source: &str, target: &str) -> Resource {
        Resource::new("k", ResourceShape::String)
            .with_source(json!(source))
            .with_target(json!(target))
    }

    #[test]
    fn test_missing_url_is_flagged() {
        let rule = UrlMatchRule::new().unwrap();
        let resource = string_resource(
            "See https://example.com/docs for details",
            "Voir la documentation",
        );
        let findings = rule.match_resource(&resource, "a.json", "fr-FR").unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(
            findings[0].highlight,
            "Missing URL: <e0>https://example.com/docs</e0>"
        );
    }

    #[test]
    fn test_preserved_url_is_clean() {
        let rule = UrlMatchRule::new().unwrap();
        let resource = string_resource(
            "See https://example.com/docs",
            "Voir https://example.com/docs",
        );
        assert_eq!(
            rule.match_resource(&resource, "a.json", "fr-FR"),
            Some(vec![])
        );
    }

    #[test]
    fn test_plural_resource_checked_per_category() {
        let rule = UrlMatchRule::new().unwrap();
        let resource = Resource::new("k", ResourceShape::Plural)
            .with_source(json!({
                "one": "1 result at https://example.com",
                "other": "%d results"
            }))
            .with_target(json!({
                "one": "1 résultat",
                "other": "%d résultats"
            }));
        let findings = rule.match_resource(&resource, "a.json", "fr-FR").unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].source, "1 result at https://example.com");
    }
}
