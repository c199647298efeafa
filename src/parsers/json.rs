//! JSON bilingual resource file parser.
//!
//! The format is a single object carrying the target locale and a list of
//! resources:
//!
//! ```json
//! {
//!     "targetLocale": "fr-FR",
//!     "resources": [
//!         {"key": "login.title", "source": "Sign in", "target": "Connexion"},
//!         {"key": "files", "type": "plural",
//!          "source": {"one": "1 file", "other": "%d files"},
//!          "target": {"one": "1 fichier", "other": "%d fichiers"}}
//!     ]
//! }
//! ```
//!
//! `type` defaults to `string`. Source and target values stay raw; whether
//! they conform to the declared shape is the matcher's call, not ours.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::parsers::{FileParser, ParsedFile};
use crate::resource::{Resource, ResourceShape};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFile {
    #[serde(default)]
    target_locale: Option<String>,
    #[serde(default)]
    resources: Vec<RawResource>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawResource {
    key: String,
    #[serde(default, rename = "type")]
    shape: ResourceShape,
    #[serde(default)]
    source: Option<Value>,
    #[serde(default)]
    target: Option<Value>,
    #[serde(default)]
    comment: Option<String>,
}

pub struct JsonResourceParser;

impl FileParser for JsonResourceParser {
    fn name(&self) -> &'static str {
        "json"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["json"]
    }

    fn parse(&self, path: &Path) -> Result<ParsedFile> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read resource file: {:?}", path))?;
        let raw: RawFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse resource file: {:?}", path))?;

        // Fall back to the file stem as the locale: locale-per-file layouts
        // (fr-FR.json) usually omit the field
        let locale = raw
            .target_locale
            .or_else(|| {
                path.file_stem()
                    .and_then(|stem| stem.to_str())
                    .map(str::to_string)
            })
            .unwrap_or_default();

        let resources = raw
            .resources
            .into_iter()
            .map(|raw| Resource {
                key: raw.key,
                shape: raw.shape,
                source: raw.source,
                target: raw.target,
                comment: raw.comment,
            })
            .collect();

        Ok(ParsedFile {
            path: path.to_string_lossy().to_string(),
            locale,
            resources,
        })
    }
}
