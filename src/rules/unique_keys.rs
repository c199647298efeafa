//! Key uniqueness rule.

use std::collections::HashSet;

use crate::findings::{Finding, Severity};
use crate::resource::Resource;
use crate::rules::Rule;

pub const UNIQUE_KEYS: &str = "unique-keys";

/// Resource keys must be unique within one file.
///
/// This is a file-level check: rules hold no state across resources, so
/// duplicate detection runs once over the whole file instead.
#[derive(Debug, Clone, Default)]
pub struct UniqueKeysRule;

impl UniqueKeysRule {
    pub fn new() -> Self {
        UniqueKeysRule
    }
}

impl Rule for UniqueKeysRule {
    fn name(&self) -> &str {
        UNIQUE_KEYS
    }

    fn description(&self) -> &str {
        "Ensure that resource keys are unique within a file"
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn match_resource(&self, _resource: &Resource, _path: &str, _locale: &str) -> Option<Vec<Finding>> {
        None
    }

    fn match_file(&self, resources: &[Resource], path: &str, locale: &str) -> Option<Vec<Finding>> {
        let mut seen: HashSet<&str> = HashSet::new();
        let findings: Vec<Finding> = resources
            .iter()
            .filter(|resource| !seen.insert(resource.key.as_str()))
            .map(|resource| Finding {
                rule: UNIQUE_KEYS.to_string(),
                severity: self.severity(),
                path: path.to_string(),
                locale: locale.to_string(),
                key: resource.key.clone(),
                description: format!("Key \"{}\" appears more than once in the file", resource.key),
                source: resource.source_excerpt(),
                highlight: format!("Duplicate key: <e0>{}</e0>", resource.key),
            })
            .collect();
        if findings.is_empty() { None } else { Some(findings) }
    }
}
