pub mod walker;

use serde_json::Value;
use tracing::debug;

use crate::coding::Tagger;
use crate::comments;
use crate::config::Settings;
use crate::error::ExtractError;
use crate::extractor::{self, model::ParsedFile};

/// Builds the objects and parameters tables for one Solidity file from its
/// AST and source lines, using default settings.
pub fn parse_file(ast: &Value, source_lines: &[&str]) -> Result<ParsedFile, ExtractError> {
    parse_file_with(ast, source_lines, &Settings::default())
}

pub fn parse_file_with(
    ast: &Value,
    source_lines: &[&str],
    settings: &Settings,
) -> Result<ParsedFile, ExtractError> {
    let mut tables = extractor::extract_tables(ast, &settings.ignore_contracts)?;
    debug!(
        "Extracted {} objects and {} parameters",
        tables.objects.len(),
        tables.parameters.len()
    );

    comments::annotate(source_lines, &mut tables);
    Tagger::new(&settings.taxonomy).tag(&mut tables);

    Ok(tables)
}

/// Convenience over [`parse_file_with`] for raw source text.
pub fn parse_source(ast: &Value, source: &str, settings: &Settings) -> Result<ParsedFile, ExtractError> {
    let lines: Vec<&str> = source.lines().collect();
    parse_file_with(ast, &lines, settings)
}
