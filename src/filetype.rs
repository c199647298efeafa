//! File types: named bindings between path patterns and rule sets.

use std::collections::HashMap;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

/// Name of the built-in file type bound to the default check-all rule set.
pub const XLIFF: &str = "xliff";

/// Name of the built-in file type that runs no checks.
pub const UNKNOWN: &str = "unknown";

/// One or many rule-set references; a bare string reads as a single
/// reference.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RuleSetRefs {
    One(String),
    Many(Vec<String>),
}

impl RuleSetRefs {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            RuleSetRefs::One(name) => vec![name],
            RuleSetRefs::Many(names) => names,
        }
    }
}

/// A file-type definition as it appears in configuration data.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FileTypeDef {
    #[serde(default)]
    pub ruleset: Option<RuleSetRefs>,
}

/// A named binding between a path pattern and the rule sets applied to
/// matching files. Immutable after construction.
#[derive(Debug, Clone)]
pub struct FileType {
    pub name: String,
    /// Referenced rule-set names, in order (later references override
    /// earlier ones per rule name).
    pub rule_sets: Vec<String>,
}

impl FileType {
    pub fn new(name: impl Into<String>, rule_sets: Vec<String>) -> Self {
        FileType {
            name: name.into(),
            rule_sets,
        }
    }

    /// Parse a definition out of raw configuration data.
    pub fn from_value(name: &str, value: &Value) -> Result<Self> {
        let def: FileTypeDef = serde_json::from_value(value.clone())
            .with_context(|| format!("Invalid file type definition '{}'", name))?;
        Ok(FileType::new(
            name,
            def.ruleset.map(RuleSetRefs::into_vec).unwrap_or_default(),
        ))
    }
}

/// Built-in file types, always registered regardless of configuration.
/// Configuration may add or override, never remove.
pub fn builtin_file_types() -> HashMap<String, FileType> {
    let mut types = HashMap::new();
    types.insert(
        XLIFF.to_string(),
        FileType::new(XLIFF, vec![crate::ruleset::CHECK_ALL.to_string()]),
    );
    types.insert(UNKNOWN.to_string(), FileType::new(UNKNOWN, Vec::new()));
    types
}
