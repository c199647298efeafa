//! Project: the queryable resolution surface over the configuration.
//!
//! A [`Project`] composes path mappings, file-type definitions and rule-set
//! definitions into one structure that answers "which rules apply to this
//! file?" and drives the find-issues pass. Everything config-shaped is
//! validated and instantiated here, eagerly: by the time matching starts, no
//! configuration error is left to discover.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use glob::Pattern;
use rayon::prelude::*;

use crate::config::Config;
use crate::filetype::{self, FileType};
use crate::findings::Finding;
use crate::parsers::ParsedFile;
use crate::rules::{AnyRule, DeclarativeRule, Rule, instantiate_rule};
use crate::ruleset::{self, RuleSet};

/// Diagnostic sink for non-fatal notices (dangling references, skipped
/// files). Explicitly passed in instead of a global logger; the default is
/// a no-op, which is what tests want.
pub trait Diagnostics: Send + Sync + std::fmt::Debug {
    fn note(&self, message: &str);
}

/// Default sink that swallows everything.
#[derive(Debug, Default)]
pub struct NoopDiagnostics;

impl Diagnostics for NoopDiagnostics {
    fn note(&self, _message: &str) {}
}

#[derive(Debug, Clone)]
enum MappingTarget {
    /// Value was a plain file-type name, resolved against the registered
    /// table at query time (dangling names degrade to `unknown`).
    Named(String),
    /// Value was an inline definition; a file type was synthesized for this
    /// glob at construction time.
    Inline(String),
}

#[derive(Debug)]
struct PathMapping {
    pattern: Pattern,
    target: MappingTarget,
}

/// The project-level resolution surface.
#[derive(Debug)]
pub struct Project {
    mappings: Vec<PathMapping>,
    file_types: HashMap<String, FileType>,
    rule_sets: HashMap<String, RuleSet>,
    /// Pre-instantiated rules per file-type name.
    rules: HashMap<String, Vec<AnyRule>>,
    locales: Vec<String>,
    diagnostics: Arc<dyn Diagnostics>,
}

impl Project {
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_diagnostics(config, Arc::new(NoopDiagnostics))
    }

    /// Build the project, validating every config-shaped input eagerly.
    pub fn with_diagnostics(config: &Config, diagnostics: Arc<dyn Diagnostics>) -> Result<Self> {
        // Declarative rules first: rule sets may reference them by name
        let mut declared: HashMap<String, DeclarativeRule> = HashMap::new();
        for (name, declaration) in &config.rules {
            declared.insert(name.clone(), DeclarativeRule::new(name, declaration)?);
        }

        // Built-ins first; user definitions may add or override, not remove
        let mut rule_sets = ruleset::builtin_rule_sets();
        for (name, value) in &config.rulesets {
            rule_sets.insert(name.clone(), RuleSet::from_value(name, value)?);
        }

        let mut file_types = filetype::builtin_file_types();
        for (name, value) in &config.filetypes {
            file_types.insert(name.clone(), FileType::from_value(name, value)?);
        }

        // Path mappings in declaration order. Inline definitions synthesize
        // a file type named after the glob.
        let mut mappings = Vec::new();
        for (glob, value) in &config.paths {
            let pattern = Pattern::new(glob)
                .with_context(|| format!("Invalid glob pattern in 'paths': \"{}\"", glob))?;
            let target = if let Some(name) = value.as_str() {
                MappingTarget::Named(name.to_string())
            } else {
                let file_type = FileType::from_value(glob, value)?;
                file_types.insert(glob.clone(), file_type);
                MappingTarget::Inline(glob.clone())
            };
            mappings.push(PathMapping { pattern, target });
        }

        // Instantiate every file type's effective rule set now, so unknown
        // rules and bad parameters fail before any matching starts
        let mut rules: HashMap<String, Vec<AnyRule>> = HashMap::new();
        for file_type in file_types.values() {
            let merged = ruleset::merge_rule_sets(&file_type.rule_sets, &rule_sets)
                .with_context(|| format!("Invalid file type '{}'", file_type.name))?;
            let mut instances = Vec::new();
            for (rule_name, params) in &merged {
                if params.as_bool() == Some(false) {
                    continue;
                }
                instances.push(instantiate_rule(rule_name, params, &declared)?);
            }
            rules.insert(file_type.name.clone(), instances);
        }

        Ok(Project {
            mappings,
            file_types,
            rule_sets,
            rules,
            locales: config.locales.clone(),
            diagnostics,
        })
    }

    /// Resolve the file type for a path.
    ///
    /// Mapping entries are scanned in declaration order and the first glob
    /// match wins; overlapping globs resolve by order, never by specificity.
    /// No match, or a match naming an unregistered file type, resolves to
    /// the built-in `unknown` type, which runs no checks.
    pub fn file_type_for(&self, path: &str) -> &FileType {
        let normalized = path.replace('\\', "/");
        for mapping in &self.mappings {
            if !mapping.pattern.matches(&normalized) {
                continue;
            }
            let name = match &mapping.target {
                MappingTarget::Named(name) | MappingTarget::Inline(name) => name,
            };
            match self.file_types.get(name) {
                Some(file_type) => return file_type,
                None => {
                    self.diagnostics.note(&format!(
                        "Path \"{}\" maps to unregistered file type '{}'; treating as unknown",
                        normalized, name
                    ));
                    return self.unknown();
                }
            }
        }
        self.unknown()
    }

    fn unknown(&self) -> &FileType {
        // Registered unconditionally in builtin_file_types
        &self.file_types[filetype::UNKNOWN]
    }

    /// Look up a registered file type by name.
    pub fn file_type(&self, name: &str) -> Option<&FileType> {
        self.file_types.get(name)
    }

    /// Look up a registered rule set by name.
    pub fn rule_set(&self, name: &str) -> Option<&RuleSet> {
        self.rule_sets.get(name)
    }

    /// The rules instantiated for a file type.
    pub fn rules_for(&self, file_type: &FileType) -> &[AnyRule] {
        self.rules
            .get(&file_type.name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn locales(&self) -> &[String] {
        &self.locales
    }

    /// Run every applicable rule over one parsed file.
    ///
    /// File-level rules run once, then each resource is matched against
    /// each rule in turn. Resources are independent: a resource that fails
    /// to type-check is skipped by the rules, never aborts the file.
    pub fn check_file(&self, file: &ParsedFile) -> Vec<Finding> {
        if !self.locales.is_empty() && !self.locales.contains(&file.locale) {
            self.diagnostics.note(&format!(
                "Skipping {}: locale \"{}\" is not configured",
                file.path, file.locale
            ));
            return Vec::new();
        }

        let file_type = self.file_type_for(&file.path);
        let rules = self.rules_for(file_type);

        let mut findings = Vec::new();
        for rule in rules {
            if let Some(found) = rule.match_file(&file.resources, &file.path, &file.locale) {
                findings.extend(found);
            }
        }
        for resource in &file.resources {
            for rule in rules {
                if let Some(found) = rule.match_resource(resource, &file.path, &file.locale) {
                    findings.extend(found);
                }
            }
        }
        findings
    }

    /// Run the find-issues pass over all files. Files are independent and
    /// rule instances immutable, so the pass fans out across a thread pool;
    /// results keep file order.
    pub fn check_files(&self, files: &[ParsedFile]) -> Vec<Finding> {
        files
            .par_iter()
            .flat_map(|file| self.check_file(file))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::json;

    use crate::config::Config;
    use crate::findings::Finding;
    use crate::parsers::ParsedFile;
    use crate::project::*;
    use crate::resource::{Resource, ResourceShape};
    use crate::rules::Rule;

    fn config(json: serde_json::Value) -> Config {
        serde_json::from_value(json).unwrap()
    }

    fn parsed(path: &str, locale: &str, resources: Vec<Resource>) -> ParsedFile {
        ParsedFile {
            path: path.to_string(),
            locale: locale.to_string(),
            resources,
        }
    }

    fn string_resource(key: &str, source: &str, target: &str) -> Resource {
        Resource::new(key, ResourceShape::String)
            .with_source(json!(source))
            .with_target(json!(target))
    }

    #[derive(Debug)]
    struct RecordingDiagnostics {
        notes: Mutex<Vec<String>>,
    }

    impl Diagnostics for RecordingDiagnostics {
        fn note(&self, message: &str) {
            self.notes.lock().unwrap().push(message.to_string());
        }
    }

    #[test]
    fn test_resolution_by_extension() {
        let project = Project::new(&config(json!({
            "paths": {"**/*.xliff": "xliff", "**/*": "unknown"}
        })))
        .unwrap();
        assert_eq!(project.file_type_for("a/b.xliff").name, "xliff");
        assert_eq!(project.file_type_for("a/b.txt").name, "unknown");
    }

    #[test]
    fn test_first_match_beats_specificity() {
        let project = Project::new(&config(json!({
            "paths": {"src/**": "A", "**/*.js": "B"},
            "filetypes": {"A": {}, "B": {}}
        })))
        .unwrap();
        // Declaration order wins even though "**/*.js" is more specific
        assert_eq!(project.file_type_for("src/x.js").name, "A");
        assert_eq!(project.file_type_for("lib/x.js").name, "B");
    }

    #[test]
    fn test_backslash_paths_are_normalized() {
        let project = Project::new(&config(json!({
            "paths": {"src/**": "xliff"}
        })))
        .unwrap();
        assert_eq!(project.file_type_for("src\\x.xliff").name, "xliff");
    }

    #[test]
    fn test_no_match_falls_back_to_unknown() {
        let project = Project::new(&config(json!({"paths": {}}))).unwrap();
        assert_eq!(project.file_type_for("anything.json").name, "unknown");
    }

    #[test]
    fn test_dangling_file_type_name_degrades_with_note() {
        let diagnostics = Arc::new(RecordingDiagnostics {
            notes: Mutex::new(Vec::new()),
        });
        let project = Project::with_diagnostics(
            &config(json!({"paths": {"**/*.json": "no-such-type"}})),
            diagnostics.clone(),
        )
        .unwrap();
        assert_eq!(project.file_type_for("a.json").name, "unknown");
        let notes = diagnostics.notes.lock().unwrap();
        assert_eq!(notes.len(), 1);
        assert!(notes[0].contains("no-such-type"));
    }

    #[test]
    fn test_inline_file_type_is_synthesized_for_glob() {
        let project = Project::new(&config(json!({
            "paths": {"**/*.json": {"ruleset": ["check-all"]}}
        })))
        .unwrap();
        let file_type = project.file_type_for("locales/fr.json");
        assert_eq!(file_type.name, "**/*.json");
        assert!(!project.rules_for(file_type).is_empty());
    }

    #[test]
    fn test_builtins_survive_user_config() {
        let project = Project::new(&config(json!({
            "filetypes": {"extra": {"ruleset": "check-all"}}
        })))
        .unwrap();
        assert!(project.file_type("xliff").is_some());
        assert!(project.file_type("unknown").is_some());
        assert!(project.file_type("extra").is_some());
        assert!(project.rule_set("check-all").is_some());
    }

    #[test]
    fn test_unknown_rule_in_rule_set_fails_at_construction() {
        let result = Project::new(&config(json!({
            "rulesets": {"bad": {"no-such-rule": true}},
            "filetypes": {"strings": {"ruleset": "bad"}}
        })));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("no-such-rule"));
    }

    #[test]
    fn test_unknown_rule_set_reference_fails_at_construction() {
        let result = Project::new(&config(json!({
            "filetypes": {"strings": {"ruleset": "no-such-set"}}
        })));
        assert!(result.is_err());
    }

    #[test]
    fn test_disabled_rule_is_not_instantiated() {
        let project = Project::new(&config(json!({
            "rulesets": {"quiet": {"quote-style": false, "url-match": true}},
            "filetypes": {"strings": {"ruleset": ["check-all", "quiet"]}}
        })))
        .unwrap();
        let file_type = project.file_type("strings").unwrap();
        let names: Vec<&str> = project
            .rules_for(file_type)
            .iter()
            .map(|rule| rule.name())
            .collect();
        assert!(names.contains(&"url-match"));
        assert!(!names.contains(&"quote-style"));
    }

    #[test]
    fn test_check_file_runs_configured_rules() {
        let project = Project::new(&config(json!({
            "paths": {"**/*.json": {"ruleset": "dnt"}},
            "rulesets": {"dnt": {"dnt-terms": {"terms": ["OAuth"]}}}
        })))
        .unwrap();
        let file = parsed(
            "locales/fr-FR.json",
            "fr-FR",
            vec![
                string_resource("login", "Sign in with OAuth", "Connectez-vous"),
                string_resource("ok", "OK", "OK"),
            ],
        );
        let findings = project.check_file(&file);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].key, "login");
        assert_eq!(findings[0].highlight, "Missing term: <e0>OAuth</e0>");
    }

    #[test]
    fn test_check_file_skips_unconfigured_locale() {
        let project = Project::new(&config(json!({
            "locales": ["fr-FR"],
            "paths": {"**/*.json": {"ruleset": "dnt"}},
            "rulesets": {"dnt": {"dnt-terms": {"terms": ["OAuth"]}}}
        })))
        .unwrap();
        let file = parsed(
            "locales/de-DE.json",
            "de-DE",
            vec![string_resource("login", "OAuth", "Anmelden")],
        );
        assert!(project.check_file(&file).is_empty());
    }

    #[test]
    fn test_file_level_rules_run_once_per_file() {
        let project = Project::new(&config(json!({
            "paths": {"**/*.json": {"ruleset": "uniq"}},
            "rulesets": {"uniq": {"unique-keys": true}}
        })))
        .unwrap();
        let file = parsed(
            "locales/fr-FR.json",
            "fr-FR",
            vec![
                string_resource("dup", "one", "un"),
                string_resource("dup", "two", "deux"),
            ],
        );
        let findings = project.check_file(&file);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].rule, "unique-keys");
    }

    #[test]
    fn test_check_files_parallel_matches_sequential() {
        let project = Project::new(&config(json!({
            "paths": {"**/*.json": {"ruleset": "dnt"}},
            "rulesets": {"dnt": {"dnt-terms": {"terms": ["OAuth"]}}}
        })))
        .unwrap();
        let files: Vec<ParsedFile> = (0..32)
            .map(|i| {
                parsed(
                    &format!("locales/{:02}/fr-FR.json", i),
                    "fr-FR",
                    vec![string_resource("login", "Use OAuth", "Utilisez autre")],
                )
            })
            .collect();
        let parallel = project.check_files(&files);
        let sequential: Vec<Finding> =
            files.iter().flat_map(|file| project.check_file(file)).collect();
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_unmatchable_resource_is_skipped_not_fatal() {
        let project = Project::new(&config(json!({
            "paths": {"**/*.json": {"ruleset": "dnt"}},
            "rulesets": {"dnt": {"dnt-terms": {"terms": ["OAuth"]}}}
        })))
        .unwrap();
        let bad = Resource::new("odd", ResourceShape::String).with_source(json!(["OAuth"]));
        let good = string_resource("login", "Use OAuth", "Utilisez autre");
        let file = parsed("locales/fr-FR.json", "fr-FR", vec![bad, good]);
        let findings = project.check_file(&file);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].key, "login");
    }
}
