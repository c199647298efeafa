//! Bilingual resource data model.
//!
//! A [`Resource`] is a localizable unit with a source-language value and a
//! translated value in one of three shapes: a plain string, an ordered array
//! of strings, or a mapping from CLDR plural category to string. Resources
//! are produced by a parser, handed to rules in memory, never mutated by a
//! rule, and discarded after all rules have run.
//!
//! Parsers hand over raw JSON values; [`Resource::content`] type-checks them
//! against the declared shape. A resource whose values do not type-check is
//! not an error: `content` returns `None` and rules skip the resource.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::findings::Finding;

/// CLDR plural categories. The set is closed: any other category name in a
/// plural-shaped value is a shape mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluralCategory {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

impl PluralCategory {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "zero" => Some(PluralCategory::Zero),
            "one" => Some(PluralCategory::One),
            "two" => Some(PluralCategory::Two),
            "few" => Some(PluralCategory::Few),
            "many" => Some(PluralCategory::Many),
            "other" => Some(PluralCategory::Other),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PluralCategory::Zero => "zero",
            PluralCategory::One => "one",
            PluralCategory::Two => "two",
            PluralCategory::Few => "few",
            PluralCategory::Many => "many",
            PluralCategory::Other => "other",
        }
    }
}

impl std::fmt::Display for PluralCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Declared shape of a resource's source and target values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceShape {
    #[default]
    String,
    Array,
    Plural,
}

/// A localizable unit with a source value and a translated value.
///
/// `source` and `target` are kept as raw JSON values; whether they actually
/// conform to `shape` is decided by [`Resource::content`] at match time.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    /// Key, unique within a locale/file.
    pub key: String,
    pub shape: ResourceShape,
    pub source: Option<Value>,
    pub target: Option<Value>,
    /// Translator comment, if the file carried one.
    pub comment: Option<String>,
}

impl Resource {
    pub fn new(key: impl Into<String>, shape: ResourceShape) -> Self {
        Resource {
            key: key.into(),
            shape,
            source: None,
            target: None,
            comment: None,
        }
    }

    pub fn with_source(mut self, source: Value) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_target(mut self, target: Value) -> Self {
        self.target = Some(target);
        self
    }

    /// Type-check the raw values against the declared shape and return a
    /// typed view, or `None` if they do not conform.
    ///
    /// A missing source makes the resource unmatchable (there is nothing to
    /// check against). A missing target is allowed: it reads as an absent
    /// string, an empty array, or an empty plural map depending on shape.
    pub fn content(&self) -> Option<ResourceContent<'_>> {
        let source = self.source.as_ref()?;
        match self.shape {
            ResourceShape::String => {
                let source = source.as_str()?;
                let target = match &self.target {
                    None | Some(Value::Null) => None,
                    Some(value) => Some(value.as_str()?),
                };
                Some(ResourceContent::String { source, target })
            }
            ResourceShape::Array => {
                let source = as_string_array(source)?;
                let target = match &self.target {
                    None | Some(Value::Null) => Vec::new(),
                    Some(value) => as_string_array(value)?,
                };
                Some(ResourceContent::Array { source, target })
            }
            ResourceShape::Plural => {
                let source = as_plural_map(source)?;
                let target = match &self.target {
                    None | Some(Value::Null) => Vec::new(),
                    Some(value) => as_plural_map(value)?,
                };
                Some(ResourceContent::Plural { source, target })
            }
        }
    }

    /// Source text to cite in findings that are not tied to one string pair.
    ///
    /// Strings cite themselves, arrays their first element, plurals the first
    /// category in document order.
    pub fn source_excerpt(&self) -> String {
        match self.content() {
            Some(ResourceContent::String { source, .. }) => source.to_string(),
            Some(ResourceContent::Array { source, .. }) => {
                source.first().copied().unwrap_or_default().to_string()
            }
            Some(ResourceContent::Plural { source, .. }) => source
                .first()
                .map(|(_, text)| text.to_string())
                .unwrap_or_default(),
            None => String::new(),
        }
    }
}

/// Typed view of a resource's content after shape checking.
///
/// Plural entries appear in document order; serde_json's `preserve_order`
/// feature keeps the order the file declared.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceContent<'a> {
    String {
        source: &'a str,
        target: Option<&'a str>,
    },
    Array {
        source: Vec<&'a str>,
        target: Vec<&'a str>,
    },
    Plural {
        source: Vec<(PluralCategory, &'a str)>,
        target: Vec<(PluralCategory, &'a str)>,
    },
}

fn as_string_array(value: &Value) -> Option<Vec<&str>> {
    value
        .as_array()?
        .iter()
        .map(|item| item.as_str())
        .collect()
}

fn as_plural_map(value: &Value) -> Option<Vec<(PluralCategory, &str)>> {
    value
        .as_object()?
        .iter()
        .map(|(name, text)| Some((PluralCategory::parse(name)?, text.as_str()?)))
        .collect()
}

/// Apply `check` to every aligned source/target string pair of `resource`.
///
/// This is the single shape-dispatch point shared by string-level rules:
/// - `string`: one pair, absent target reads as `""`;
/// - `array`: index-aligned pairs, a missing target index reads as `""`;
/// - `plural`: one pair per source category, paired with the same target
///   category or `""` when the target lacks it.
///
/// Returns `None` when the resource does not type-check against its shape
/// (the rule did not apply), otherwise `Some` of all findings in pair order
/// (possibly empty: the rule applied and found nothing).
pub fn each_string_pair<F>(resource: &Resource, mut check: F) -> Option<Vec<Finding>>
where
    F: FnMut(&str, &str) -> Vec<Finding>,
{
    let findings = match resource.content()? {
        ResourceContent::String { source, target } => check(source, target.unwrap_or("")),
        ResourceContent::Array { source, target } => source
            .iter()
            .enumerate()
            .flat_map(|(i, src)| check(src, target.get(i).copied().unwrap_or("")))
            .collect(),
        ResourceContent::Plural { source, target } => source
            .iter()
            .flat_map(|(category, src)| {
                let tgt = target
                    .iter()
                    .find(|(c, _)| c == category)
                    .map(|(_, text)| *text)
                    .unwrap_or("");
                check(src, tgt)
            })
            .collect(),
    };
    Some(findings)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::findings::Severity;
    use crate::resource::*;

    fn pair_finding(source: &str, target: &str) -> Finding {
        Finding {
            rule: "test".to_string(),
            severity: Severity::Error,
            path: "a.json".to_string(),
            locale: "de-DE".to_string(),
            key: "k".to_string(),
            description: format!("{}|{}", source, target),
            source: source.to_string(),
            highlight: String::new(),
        }
    }

    #[test]
    fn test_string_content() {
        let resource = Resource::new("k", ResourceShape::String)
            .with_source(json!("Hello"))
            .with_target(json!("Hallo"));
        assert_eq!(
            resource.content(),
            Some(ResourceContent::String {
                source: "Hello",
                target: Some("Hallo"),
            })
        );
    }

    #[test]
    fn test_string_content_missing_target() {
        let resource = Resource::new("k", ResourceShape::String).with_source(json!("Hello"));
        assert_eq!(
            resource.content(),
            Some(ResourceContent::String {
                source: "Hello",
                target: None,
            })
        );
    }

    #[test]
    fn test_string_shape_mismatch_is_unmatchable() {
        // Declared string but source is a number: skip, not an error
        let resource = Resource::new("k", ResourceShape::String).with_source(json!(42));
        assert_eq!(resource.content(), None);

        // Target of the wrong type is a mismatch too
        let resource = Resource::new("k", ResourceShape::String)
            .with_source(json!("Hello"))
            .with_target(json!(["Hallo"]));
        assert_eq!(resource.content(), None);
    }

    #[test]
    fn test_missing_source_is_unmatchable() {
        let resource = Resource::new("k", ResourceShape::String).with_target(json!("Hallo"));
        assert_eq!(resource.content(), None);
    }

    #[test]
    fn test_array_content_missing_target_is_empty() {
        let resource =
            Resource::new("k", ResourceShape::Array).with_source(json!(["one", "two"]));
        assert_eq!(
            resource.content(),
            Some(ResourceContent::Array {
                source: vec!["one", "two"],
                target: vec![],
            })
        );
    }

    #[test]
    fn test_array_with_non_string_element_is_unmatchable() {
        let resource = Resource::new("k", ResourceShape::Array).with_source(json!(["one", 2]));
        assert_eq!(resource.content(), None);
    }

    #[test]
    fn test_plural_content_document_order() {
        let resource = Resource::new("k", ResourceShape::Plural)
            .with_source(json!({"other": "%d items", "one": "1 item"}))
            .with_target(json!({"one": "1 Stück", "other": "%d Stücke"}));
        let Some(ResourceContent::Plural { source, .. }) = resource.content() else {
            panic!("expected plural content");
        };
        // preserve_order keeps the declared order, "other" first
        assert_eq!(source[0], (PluralCategory::Other, "%d items"));
        assert_eq!(source[1], (PluralCategory::One, "1 item"));
    }

    #[test]
    fn test_plural_unknown_category_is_unmatchable() {
        let resource = Resource::new("k", ResourceShape::Plural)
            .with_source(json!({"one": "1 item", "dual": "2 items"}));
        assert_eq!(resource.content(), None);
    }

    #[test]
    fn test_each_string_pair_array_alignment() {
        let resource = Resource::new("k", ResourceShape::Array)
            .with_source(json!(["a", "b", "c"]))
            .with_target(json!(["x"]));
        let findings = each_string_pair(&resource, |s, t| vec![pair_finding(s, t)]).unwrap();
        let pairs: Vec<&str> = findings.iter().map(|f| f.description.as_str()).collect();
        assert_eq!(pairs, vec!["a|x", "b|", "c|"]);
    }

    #[test]
    fn test_each_string_pair_plural_pairs_by_category() {
        let resource = Resource::new("k", ResourceShape::Plural)
            .with_source(json!({"one": "1 item", "other": "%d items"}))
            .with_target(json!({"other": "%d Stücke"}));
        let findings = each_string_pair(&resource, |s, t| vec![pair_finding(s, t)]).unwrap();
        let pairs: Vec<&str> = findings.iter().map(|f| f.description.as_str()).collect();
        assert_eq!(pairs, vec!["1 item|", "%d items|%d Stücke"]);
    }

    #[test]
    fn test_each_string_pair_declines_on_mismatch() {
        let resource = Resource::new("k", ResourceShape::String).with_source(json!(true));
        assert_eq!(each_string_pair(&resource, |s, t| vec![pair_finding(s, t)]), None);
    }

    #[test]
    fn test_source_excerpt() {
        let resource = Resource::new("k", ResourceShape::Plural)
            .with_source(json!({"one": "1 item", "other": "%d items"}));
        assert_eq!(resource.source_excerpt(), "1 item");

        let resource = Resource::new("k", ResourceShape::String).with_source(json!(7));
        assert_eq!(resource.source_excerpt(), "");
    }

    #[test]
    fn test_plural_category_parse_roundtrip() {
        for name in ["zero", "one", "two", "few", "many", "other"] {
            assert_eq!(PluralCategory::parse(name).unwrap().as_str(), name);
        }
        assert_eq!(PluralCategory::parse("dual"), None);
    }
}
