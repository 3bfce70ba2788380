//! Runtime settings: ignored contracts, repository walk filters and the coding
//! taxonomy.

use serde::{Deserialize, Serialize};

use crate::coding::CodingTaxonomy;

pub const DEFAULT_IGNORE_CONTRACTS: &[&str] = &["SafeMath"];
pub const DEFAULT_EXCLUDE_DIRS: &[&str] = &["lib", "test"];
pub const DEFAULT_EXCLUDE_FILES: &[&str] = &["SafeMath.sol", "lib.sol"];
/// Standard interface files skipped when defaults are on.
pub const DEFAULT_EXCLUDE_FILE_PATTERNS: &[&str] = &[r"^I?ERC\d+\.sol$", r"^I?EIP\d+\.sol$"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Contracts (by name) never added to the tables.
    pub ignore_contracts: Vec<String>,
    /// Directory names pruned by the repository walker when defaults are on.
    pub exclude_dirs: Vec<String>,
    /// File names skipped by the repository walker when defaults are on.
    pub exclude_files: Vec<String>,
    pub exclude_file_patterns: Vec<String>,
    pub taxonomy: CodingTaxonomy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ignore_contracts: to_strings(DEFAULT_IGNORE_CONTRACTS),
            exclude_dirs: to_strings(DEFAULT_EXCLUDE_DIRS),
            exclude_files: to_strings(DEFAULT_EXCLUDE_FILES),
            exclude_file_patterns: to_strings(DEFAULT_EXCLUDE_FILE_PATTERNS),
            taxonomy: CodingTaxonomy::default(),
        }
    }
}

impl Settings {
    /// Defaults overridden by `SOLCODER_*` environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            ignore_contracts: env_list("SOLCODER_IGNORE_CONTRACTS").unwrap_or(defaults.ignore_contracts),
            exclude_dirs: env_list("SOLCODER_EXCLUDE_DIRS").unwrap_or(defaults.exclude_dirs),
            exclude_files: env_list("SOLCODER_EXCLUDE_FILES").unwrap_or(defaults.exclude_files),
            exclude_file_patterns: defaults.exclude_file_patterns,
            taxonomy: defaults.taxonomy,
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn env_list(key: &str) -> Option<Vec<String>> {
    std::env::var(key).ok().map(|v| parse_list(&v))
}

/// Comma separated list; blank entries dropped.
pub fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
