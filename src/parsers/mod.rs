//! Parsers for bilingual resource files.
//!
//! Parsing is a thin boundary: a parser turns one file into a
//! [`ParsedFile`] of raw resources and owns no checking policy. The core
//! matching logic type-checks resource content itself, so parsers hand
//! values over as-is.

use std::path::Path;

use anyhow::Result;

use crate::resource::Resource;

pub mod json;

/// One parsed file's worth of resources.
#[derive(Debug, Clone)]
pub struct ParsedFile {
    /// Path of the file, as given to the parser.
    pub path: String,
    /// Target locale of the translations in this file.
    pub locale: String,
    pub resources: Vec<Resource>,
}

/// A parser for one resource file format.
pub trait FileParser {
    fn name(&self) -> &'static str;

    /// File extensions (lowercase, without dot) this parser handles.
    fn extensions(&self) -> &'static [&'static str];

    fn parse(&self, path: &Path) -> Result<ParsedFile>;
}

static JSON_PARSER: json::JsonResourceParser = json::JsonResourceParser;

/// Look up a parser by file extension.
pub fn parser_for(path: &Path) -> Option<&'static dyn FileParser> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    [&JSON_PARSER as &dyn FileParser]
        .into_iter()
        .find(|parser| parser.extensions().contains(&extension.as_str()))
}
