//! Rule implementations for loqa.
//!
//! Each rule examines one bilingual resource (or, for file-level rules, one
//! file's worth of resources) and reports findings. Rules are immutable
//! after construction: matching holds no state, so one rule instance can be
//! shared across files and threads.
//!
//! ## Module Structure
//!
//! - `matcher`: declarative pattern rule engine shared by pattern rules
//! - `dnt_terms`: do-not-translate term preservation
//! - `url_match`: URL preservation
//! - `named_params`: named replacement parameter preservation
//! - `plural_forms`: plural category well-formedness
//! - `quote_style`: quotation mark preservation
//! - `unique_keys`: key uniqueness within a file
//! - `declarative`: pattern rules declared in configuration data

use std::collections::HashMap;

use anyhow::{Result, bail};
use enum_dispatch::enum_dispatch;
use serde_json::Value;

use crate::findings::{Finding, Severity};
use crate::resource::Resource;

pub mod declarative;
pub mod dnt_terms;
pub mod matcher;
pub mod named_params;
pub mod plural_forms;
pub mod quote_style;
pub mod unique_keys;
pub mod url_match;

pub use declarative::DeclarativeRule;
pub use dnt_terms::DntTermsRule;
pub use named_params::NamedParamsRule;
pub use plural_forms::PluralFormsRule;
pub use quote_style::QuoteStyleRule;
pub use unique_keys::UniqueKeysRule;
pub use url_match::UrlMatchRule;

/// Contract every rule implements.
///
/// `match_resource` returns `None` when the rule did not apply to the
/// resource (shape mismatch, nothing configured) and `Some` when it ran,
/// possibly with an empty list. Callers that only care about issues may
/// collapse both; the distinction stays observable for those that do not.
#[enum_dispatch]
pub trait Rule {
    /// Stable rule name, as referenced from rule-set definitions.
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Default severity of this rule's findings.
    fn severity(&self) -> Severity;

    /// Link to further documentation, if any.
    fn link(&self) -> Option<&str> {
        None
    }

    /// Match one resource.
    fn match_resource(&self, resource: &Resource, path: &str, locale: &str)
    -> Option<Vec<Finding>>;

    /// Match a whole file at once. Only rules that need cross-resource
    /// context (key uniqueness) implement this.
    fn match_file(&self, resources: &[Resource], path: &str, locale: &str) -> Option<Vec<Finding>> {
        let _ = (resources, path, locale);
        None
    }
}

/// The closed set of rule implementations, dispatched without boxing.
#[enum_dispatch(Rule)]
#[derive(Debug, Clone)]
pub enum AnyRule {
    DntTerms(DntTermsRule),
    UrlMatch(UrlMatchRule),
    NamedParams(NamedParamsRule),
    PluralForms(PluralFormsRule),
    QuoteStyle(QuoteStyleRule),
    UniqueKeys(UniqueKeysRule),
    Declarative(DeclarativeRule),
}

/// Instantiate a rule by name with the given enablement parameters.
///
/// `name` is either a built-in rule name or the name of a rule declared in
/// the configuration's `rules` table. Unknown names fail here, at
/// construction, never at match time.
pub fn instantiate_rule(
    name: &str,
    params: &Value,
    declared: &HashMap<String, DeclarativeRule>,
) -> Result<AnyRule> {
    match name {
        dnt_terms::DNT_TERMS => Ok(DntTermsRule::from_params(params)?.into()),
        url_match::URL_MATCH => Ok(UrlMatchRule::new()?.into()),
        named_params::NAMED_PARAMS => Ok(NamedParamsRule::new()?.into()),
        plural_forms::PLURAL_FORMS => Ok(PluralFormsRule::new().into()),
        quote_style::QUOTE_STYLE => Ok(QuoteStyleRule::new().into()),
        unique_keys::UNIQUE_KEYS => Ok(UniqueKeysRule::new().into()),
        other => match declared.get(other) {
            Some(rule) => Ok(rule.clone().into()),
            None => bail!("Unknown rule '{}' in rule set", other),
        },
    }
}
