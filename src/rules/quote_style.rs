//! Quotation mark preservation rule.

use crate::findings::{Finding, Severity};
use crate::resource::{Resource, each_string_pair};
use crate::rules::Rule;

pub const QUOTE_STYLE: &str = "quote-style";

/// ASCII and typographic quotation marks, including CJK corner brackets.
const QUOTE_CHARS: &[char] = &[
    '"', '\'', '«', '»', '„', '“', '”', '‘', '’', '「', '」', '『', '』',
];

/// If the source carries quotation marks, the target should carry some too.
/// Any quote style passes, since locales quote differently.
#[derive(Debug, Clone, Default)]
pub struct QuoteStyleRule;

impl QuoteStyleRule {
    pub fn new() -> Self {
        QuoteStyleRule
    }

    /// Source span from the first to the last quote character.
    fn quoted_span<'a>(&self, source: &'a str) -> Option<&'a str> {
        let mut quotes = source
            .char_indices()
            .filter(|(_, c)| QUOTE_CHARS.contains(c));
        let (start, _) = quotes.next()?;
        let (end, last) = quotes.last().unwrap_or((start, source[start..].chars().next()?));
        Some(&source[start..end + last.len_utf8()])
    }
}

impl Rule for QuoteStyleRule {
    fn name(&self) -> &str {
        QUOTE_STYLE
    }

    fn description(&self) -> &str {
        "Ensure that quotation marks in the source are reflected in the target"
    }

    fn severity(&self) -> Severity {
        Severity::Warning
    }

    fn match_resource(&self, resource: &Resource, path: &str, locale: &str) -> Option<Vec<Finding>> {
        each_string_pair(resource, |source, target| {
            // An empty target is a missing translation, not a style issue
            if target.is_empty() || target.chars().any(|c| QUOTE_CHARS.contains(&c)) {
                return Vec::new();
            }
            let Some(span) = self.quoted_span(source) else {
                return Vec::new();
            };
            vec![Finding {
                rule: QUOTE_STYLE.to_string(),
                severity: self.severity(),
                path: path.to_string(),
                locale: locale.to_string(),
                key: resource.key.clone(),
                description: "Quotation marks in the source are not present in the target"
                    .to_string(),
                source: source.to_string(),
                highlight: format!("Quoted span: <e0>{}</e0>", span),
            }]
        })
    }
}
