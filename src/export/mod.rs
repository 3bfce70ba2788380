//! CSV and JSON writers for the extracted tables.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::extractor::model::{ContractObject, ContractParameter, ParsedFile};
use crate::pipeline::walker::RepoReport;

const OBJECT_COLUMNS: &[&str] = &[
    "project",
    "file",
    "object_name",
    "contract",
    "type",
    "inheritance",
    "modifiers",
    "values",
    "visibility",
    "description",
    "full_comment",
    "title",
    "notice",
    "dev",
    "param",
    "return",
    "coding_keyword_search",
    "coding_topic_search",
];

const PARAMETER_COLUMNS: &[&str] = &[
    "project",
    "file",
    "parameter_name",
    "object_name",
    "contract",
    "type",
    "type_category",
    "initial_value",
    "visibility",
    "description",
    "full_comment",
    "inline_comment",
];

/// Quotes a field when it holds a delimiter, quote or line break.
pub fn escape_field(field: &str) -> String {
    if field.contains(|c: char| matches!(c, ',' | '"' | '\n' | '\r')) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn push_row(output: &mut String, fields: &[String]) {
    let row: Vec<String> = fields.iter().map(|f| escape_field(f)).collect();
    output.push_str(&row.join(","));
    output.push('\n');
}

fn header(columns: &[&str]) -> String {
    format!("{}\n", columns.join(","))
}

fn list(items: &[String]) -> String {
    items.join(", ")
}

fn object_row(project: &str, file: &str, o: &ContractObject) -> Vec<String> {
    vec![
        project.to_string(),
        file.to_string(),
        o.object_name.clone(),
        o.contract.clone(),
        o.kind.to_string(),
        list(&o.inheritance),
        list(&o.modifiers),
        list(&o.values),
        o.visibility.clone(),
        o.description.clone(),
        o.full_comment.clone(),
        o.natspec.title.clone(),
        o.natspec.notice.clone(),
        o.natspec.dev.clone(),
        list(&o.natspec.params),
        o.natspec.returns.clone(),
        list(&o.coding_keywords),
        list(&o.coding_topics),
    ]
}

fn parameter_row(project: &str, file: &str, p: &ContractParameter) -> Vec<String> {
    vec![
        project.to_string(),
        file.to_string(),
        p.parameter_name.clone(),
        p.object_name.clone(),
        p.contract.clone(),
        p.declared_type.clone(),
        p.type_category.clone(),
        p.initial_value.clone().unwrap_or_default(),
        p.visibility.clone(),
        p.description.clone(),
        p.full_comment.clone(),
        p.inline_comment.clone(),
    ]
}

/// Objects of every `(file label, tables)` pair as one CSV document.
pub fn objects_csv<'a, I>(project: &str, files: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a ParsedFile)>,
{
    let mut output = header(OBJECT_COLUMNS);
    for (file, tables) in files {
        for object in &tables.objects {
            push_row(&mut output, &object_row(project, file, object));
        }
    }
    output
}

pub fn parameters_csv<'a, I>(project: &str, files: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a ParsedFile)>,
{
    let mut output = header(PARAMETER_COLUMNS);
    for (file, tables) in files {
        for param in &tables.parameters {
            push_row(&mut output, &parameter_row(project, file, param));
        }
    }
    output
}

pub fn to_json(tables: &ParsedFile) -> Result<String> {
    serde_json::to_string_pretty(tables).with_context(|| "Failed to serialize tables")
}

/// Writes `contract_objects_<name>.csv` and `contract_parameters_<name>.csv`.
pub fn write_csv_pair<'a, I>(out_dir: &Path, name: &str, files: I) -> Result<(PathBuf, PathBuf)>
where
    I: IntoIterator<Item = (&'a str, &'a ParsedFile)> + Clone,
{
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;

    let objects_path = out_dir.join(format!("contract_objects_{}.csv", name));
    let parameters_path = out_dir.join(format!("contract_parameters_{}.csv", name));

    fs::write(&objects_path, objects_csv(name, files.clone()))
        .with_context(|| format!("Failed to write output file: {}", objects_path.display()))?;
    fs::write(&parameters_path, parameters_csv(name, files))
        .with_context(|| format!("Failed to write output file: {}", parameters_path.display()))?;

    Ok((objects_path, parameters_path))
}

pub fn write_report(report: &RepoReport, out_dir: &Path) -> Result<(PathBuf, PathBuf)> {
    let files = report.files.iter().map(|f| (f.label.as_str(), &f.tables));
    write_csv_pair(out_dir, &report.project, files)
}
