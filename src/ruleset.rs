//! Named, composable rule sets.
//!
//! A rule set maps rule names to an enablement value: `true` (enable with
//! defaults), `false` (explicitly disabled, overriding an inherited
//! enablement), or a parameter object. File types reference rule sets by
//! name; the effective set is the in-order union with last-writer-wins per
//! rule name.

use std::collections::HashMap;

use anyhow::{Context, Result, bail};
use serde_json::{Map, Value};

/// Rule name → enablement value, in declaration order.
pub type RuleSetDef = Map<String, Value>;

/// A named collection of rule enablements.
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub name: String,
    pub rules: RuleSetDef,
}

impl RuleSet {
    pub fn new(name: impl Into<String>, rules: RuleSetDef) -> Self {
        RuleSet {
            name: name.into(),
            rules,
        }
    }

    /// Parse a rule-set definition out of raw configuration data.
    pub fn from_value(name: &str, value: &Value) -> Result<Self> {
        let Value::Object(rules) = value else {
            bail!("Rule set '{}' must be an object mapping rule names", name);
        };
        Ok(RuleSet::new(name, rules.clone()))
    }
}

/// Name of the built-in rule set every `xliff` file type runs.
pub const CHECK_ALL: &str = "check-all";

/// Built-in rule sets, always registered regardless of configuration.
pub fn builtin_rule_sets() -> HashMap<String, RuleSet> {
    let mut rules = RuleSetDef::new();
    for name in [
        "plural-forms",
        "quote-style",
        "unique-keys",
        "url-match",
        "named-params",
    ] {
        rules.insert(name.to_string(), Value::Bool(true));
    }
    let mut sets = HashMap::new();
    sets.insert(CHECK_ALL.to_string(), RuleSet::new(CHECK_ALL, rules));
    sets
}

/// Union the referenced rule sets in order, last writer winning per rule
/// name. A reference to an unregistered rule set is a configuration error.
pub fn merge_rule_sets(
    refs: &[String],
    registered: &HashMap<String, RuleSet>,
) -> Result<RuleSetDef> {
    let mut merged = RuleSetDef::new();
    for name in refs {
        let set = registered
            .get(name)
            .with_context(|| format!("Unknown rule set '{}'", name))?;
        for (rule_name, value) in &set.rules {
            merged.insert(rule_name.clone(), value.clone());
        }
    }
    Ok(merged)
}
