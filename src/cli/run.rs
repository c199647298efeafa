//! Command handlers for the loqa CLI.

use std::path::Path;
use std::sync::Arc;
use std::{env, fs};

use anyhow::Result;
use colored::Colorize;
use walkdir::WalkDir;

use super::args::CheckArgs;
use crate::config::{CONFIG_FILE_NAME, default_config_json, load_config};
use crate::filetype;
use crate::findings::Finding;
use crate::parsers::{ParsedFile, parser_for};
use crate::project::{Diagnostics, NoopDiagnostics, Project};

/// Outcome of a check run.
pub struct CheckSummary {
    pub findings: Vec<Finding>,
    pub files_checked: usize,
    pub parse_failures: usize,
}

/// Diagnostic sink that prints notes to stderr, used with `--verbose`.
#[derive(Debug)]
struct ConsoleDiagnostics;

impl Diagnostics for ConsoleDiagnostics {
    fn note(&self, message: &str) {
        eprintln!("{} {}", "note:".bold().cyan(), message);
    }
}

pub fn check(args: &CheckArgs) -> Result<CheckSummary> {
    let root = match &args.common.root {
        Some(root) => root.clone(),
        None => env::current_dir()?,
    };
    let loaded = load_config(&root)?;
    let diagnostics: Arc<dyn Diagnostics> = if args.common.verbose {
        Arc::new(ConsoleDiagnostics)
    } else {
        Arc::new(NoopDiagnostics)
    };
    let project = Project::with_diagnostics(&loaded.config, diagnostics.clone())?;

    let mut files: Vec<ParsedFile> = Vec::new();
    let mut parse_failures = 0;
    for entry in WalkDir::new(&root).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.file_name().to_string_lossy() == CONFIG_FILE_NAME {
            continue;
        }
        let relative = entry.path().strip_prefix(&root).unwrap_or(entry.path());
        let relative = relative.to_string_lossy().replace('\\', "/");
        if project.file_type_for(&relative).name == filetype::UNKNOWN {
            continue;
        }
        let Some(parser) = parser_for(entry.path()) else {
            diagnostics.note(&format!("No parser for {}; skipping", relative));
            continue;
        };
        match parser.parse(entry.path()) {
            Ok(mut parsed) => {
                parsed.path = relative;
                files.push(parsed);
            }
            Err(err) => {
                parse_failures += 1;
                diagnostics.note(&format!("{:#}", err));
            }
        }
    }

    let findings = project.check_files(&files);
    Ok(CheckSummary {
        findings,
        files_checked: files.len(),
        parse_failures,
    })
}

pub fn init() -> Result<()> {
    let config_path = Path::new(CONFIG_FILE_NAME);
    if config_path.exists() {
        anyhow::bail!("{} already exists", CONFIG_FILE_NAME);
    }

    fs::write(config_path, default_config_json()?)?;
    Ok(())
}
