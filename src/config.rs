use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result};
use glob::Pattern;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const CONFIG_FILE_NAME: &str = ".loqarc.json";

/// Project configuration, as loaded from `.loqarc.json`.
///
/// `paths` maps glob patterns to a file-type name or an inline file-type
/// definition. Its declaration order is the resolution order (first match
/// wins), which is why it is kept as an order-preserving map rather than
/// being normalized. The other tables are keyed by name; structural
/// validation happens when the [`crate::project::Project`] is built.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Locales to check. Empty means every locale found.
    #[serde(default)]
    pub locales: Vec<String>,
    /// Ordered glob → file-type name or inline file-type definition.
    #[serde(default = "default_paths")]
    pub paths: Map<String, Value>,
    /// Named rule-set definitions.
    #[serde(default)]
    pub rulesets: Map<String, Value>,
    /// Named file-type definitions.
    #[serde(default)]
    pub filetypes: Map<String, Value>,
    /// Declarative rule definitions.
    #[serde(default)]
    pub rules: Map<String, Value>,
}

fn default_paths() -> Map<String, Value> {
    let mut paths = Map::new();
    paths.insert("**/*.xliff".to_string(), Value::String("xliff".to_string()));
    paths
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error if any glob pattern in `paths` is invalid. Deeper
    /// validation (rule sets, file types, rule declarations) happens at
    /// project construction, still before any matching runs.
    pub fn validate(&self) -> Result<()> {
        for pattern in self.paths.keys() {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'paths': \"{}\"", pattern))?;
        }
        Ok(())
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config {
        paths: default_paths(),
        ..Default::default()
    };
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
        }),
    }
}
