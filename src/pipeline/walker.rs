//! Walks a contracts directory and parses every selected Solidity file.
//!
//! ASTs are not produced here. For `Foo.sol` the walker expects the parser
//! output next to it as `Foo.sol.json` (or `Foo.json`).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use rayon::prelude::*;
use regex::Regex;
use tracing::{info, info_span, warn};
use walkdir::{DirEntry, WalkDir};

use super::parse_source;
use crate::config::Settings;
use crate::extractor::model::ParsedFile;
use crate::parser::load_ast_file;

#[derive(Debug, Clone)]
pub struct WalkOptions {
    /// Add the configured default exclusions to the lists below.
    pub use_defaults: bool,
    pub exclude_dirs: Vec<String>,
    pub include_dirs: Vec<String>,
    pub exclude_files: Vec<String>,
    pub include_files: Vec<String>,
}

impl Default for WalkOptions {
    fn default() -> Self {
        WalkOptions {
            use_defaults: true,
            exclude_dirs: Vec::new(),
            include_dirs: Vec::new(),
            exclude_files: Vec::new(),
            include_files: Vec::new(),
        }
    }
}

impl WalkOptions {
    pub fn validate(&self) -> Result<()> {
        if !self.exclude_files.is_empty() && !self.include_files.is_empty() {
            bail!("specify only files to exclude or to include, not both");
        }
        if !self.exclude_dirs.is_empty() && !self.include_dirs.is_empty() {
            bail!("specify only subdirectory names to exclude or to include, not both");
        }
        Ok(())
    }
}

/// Resolved filters for one walk.
struct Filters {
    exclude_dirs: Vec<String>,
    include_dirs: Vec<String>,
    exclude_files: Vec<String>,
    include_files: Vec<String>,
    patterns: Vec<Regex>,
}

impl Filters {
    fn new(options: &WalkOptions, settings: &Settings) -> Result<Self> {
        let mut exclude_dirs = options.exclude_dirs.clone();
        let mut exclude_files = options.exclude_files.clone();
        let mut patterns = Vec::new();

        if options.use_defaults {
            exclude_dirs.extend(settings.exclude_dirs.iter().cloned());
            exclude_files.extend(settings.exclude_files.iter().cloned());
            for p in &settings.exclude_file_patterns {
                patterns.push(Regex::new(p).with_context(|| format!("Invalid file pattern: {}", p))?);
            }
        }

        Ok(Filters {
            exclude_dirs,
            include_dirs: options.include_dirs.clone(),
            exclude_files,
            include_files: options.include_files.clone(),
            patterns,
        })
    }

    fn keep_dir(&self, name: &str) -> bool {
        if !self.include_dirs.is_empty() {
            self.include_dirs.iter().any(|d| d == name)
        } else {
            !self.exclude_dirs.iter().any(|d| d == name)
        }
    }

    fn keep_file(&self, name: &str) -> bool {
        if !self.include_files.is_empty() {
            return self.include_files.iter().any(|f| f == name);
        }
        name.ends_with(".sol")
            && !self.exclude_files.iter().any(|f| f == name)
            && !self.patterns.iter().any(|p| p.is_match(name))
    }
}

#[derive(Debug, Clone)]
pub struct FileResult {
    /// `<project>/<subdir>/<stem>`
    pub label: String,
    pub path: PathBuf,
    pub tables: ParsedFile,
}

#[derive(Debug, Clone, Default)]
pub struct RepoReport {
    pub project: String,
    pub files: Vec<FileResult>,
    pub failed_files: Vec<PathBuf>,
}

impl RepoReport {
    pub fn object_count(&self) -> usize {
        self.files.iter().map(|f| f.tables.objects.len()).sum()
    }

    pub fn parameter_count(&self) -> usize {
        self.files.iter().map(|f| f.tables.parameters.len()).sum()
    }
}

pub fn discover_files(root: &Path, options: &WalkOptions, settings: &Settings) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        bail!("specify an existing directory: {}", root.display());
    }
    options.validate()?;
    let filters = Filters::new(options, settings)?;

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_type().is_dir() || filters.keep_dir(&file_name(e)));

    for entry in walker {
        let entry = entry.map_err(|e| anyhow!("Walk error: {}", e))?;
        if entry.file_type().is_file() && filters.keep_file(&file_name(&entry)) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

fn file_name(entry: &DirEntry) -> String {
    entry.file_name().to_string_lossy().into_owned()
}

/// Location of the parser output for a Solidity file, if present.
pub fn ast_path_for(source: &Path) -> Option<PathBuf> {
    let mut beside = source.as_os_str().to_owned();
    beside.push(".json");
    let candidates = [PathBuf::from(beside), source.with_extension("json")];
    candidates.into_iter().find(|p| p.is_file())
}

pub fn file_label(root: &Path, path: &Path) -> String {
    let project = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let subdir = path
        .parent()
        .and_then(|p| p.strip_prefix(root).ok())
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = stem.split('.').next().unwrap_or_default();
    format!("{}/{}/{}", project, subdir.trim_matches('/'), stem)
}

fn parse_one(root: &Path, path: &Path, settings: &Settings) -> Result<FileResult> {
    let ast_path = ast_path_for(path)
        .ok_or_else(|| anyhow!("No AST found for {}", path.display()))?;
    let ast = load_ast_file(&ast_path)?;
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read source file: {}", path.display()))?;
    let tables = {
        let _file = info_span!("file", path = %path.display()).entered();
        parse_source(&ast, &source, settings)
            .with_context(|| format!("Failed to extract tables from {}", path.display()))?
    };
    for diagnostic in &tables.diagnostics {
        warn!("{}: {}", path.display(), diagnostic.message);
    }

    Ok(FileResult {
        label: file_label(root, path),
        path: path.to_path_buf(),
        tables,
    })
}

/// Parses every selected file. A file that fails is recorded in
/// `failed_files` and the walk goes on.
pub fn parse_repo(root: &Path, project: &str, options: &WalkOptions, settings: &Settings) -> Result<RepoReport> {
    let paths = discover_files(root, options, settings)?;
    info!("Found {} Solidity files under {}", paths.len(), root.display());

    let results: Vec<(PathBuf, Result<FileResult>)> = paths
        .into_par_iter()
        .map(|path| {
            let result = parse_one(root, &path, settings);
            (path, result)
        })
        .collect();

    let mut report = RepoReport {
        project: project.to_string(),
        ..RepoReport::default()
    };
    for (path, result) in results {
        match result {
            Ok(file) => report.files.push(file),
            Err(e) => {
                warn!("Error parsing {}: {:#}", path.display(), e);
                report.failed_files.push(path);
            }
        }
    }

    info!(
        "Parsed {} files ({} objects, {} parameters), {} failed",
        report.files.len(),
        report.object_count(),
        report.parameter_count(),
        report.failed_files.len()
    );
    Ok(report)
}
