//! Plural well-formedness rule.

use crate::findings::{Finding, Severity};
use crate::resource::{PluralCategory, Resource, ResourceContent};
use crate::rules::Rule;

pub const PLURAL_FORMS: &str = "plural-forms";

/// For plural resources with a non-empty target, every category the source
/// declares must be present in the target, and the target must declare
/// `other` (the category every locale requires).
#[derive(Debug, Clone, Default)]
pub struct PluralFormsRule;

impl PluralFormsRule {
    pub fn new() -> Self {
        PluralFormsRule
    }
}

impl Rule for PluralFormsRule {
    fn name(&self) -> &str {
        PLURAL_FORMS
    }

    fn description(&self) -> &str {
        "Ensure that translated plurals declare all required plural categories"
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn match_resource(&self, resource: &Resource, path: &str, locale: &str) -> Option<Vec<Finding>> {
        let ResourceContent::Plural { source, target } = resource.content()? else {
            return None;
        };
        if target.is_empty() {
            // An absent target is a missing translation, not a malformed one
            return Some(vec![]);
        }

        let mut missing: Vec<PluralCategory> = source
            .iter()
            .map(|(category, _)| *category)
            .filter(|category| !target.iter().any(|(c, _)| c == category))
            .collect();
        if !target.iter().any(|(c, _)| *c == PluralCategory::Other)
            && !missing.contains(&PluralCategory::Other)
        {
            missing.push(PluralCategory::Other);
        }

        if missing.is_empty() {
            return Some(vec![]);
        }
        let names: Vec<&str> = missing.iter().map(PluralCategory::as_str).collect();
        let names = names.join(", ");
        Some(vec![Finding {
            rule: PLURAL_FORMS.to_string(),
            severity: self.severity(),
            path: path.to_string(),
            locale: locale.to_string(),
            key: resource.key.clone(),
            description: format!("Target plural is missing categories: {}", names),
            source: resource.source_excerpt(),
            highlight: format!("Missing categories: <e0>{}</e0>", names),
        }])
    }
}
