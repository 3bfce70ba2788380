//! Attaches documentation comments from the raw source to the extracted
//! tables.
//!
//! The passes must run in order: object comments, inline parameter comments,
//! de-duplication, license stripping. [`annotate`] does exactly that.

pub mod natspec;

use tracing::debug;

use crate::extractor::model::*;
use natspec::{parse_object_comment, parse_parameter_comment};

const LICENSE_MARKERS: [&str; 2] = ["License", "Copyright"];

pub fn annotate(lines: &[&str], tables: &mut ParsedFile) {
    attach_object_comments(lines, tables);
    attach_inline_comments(lines, &mut tables.parameters);
    remove_duplicate_comments(&tables.objects, &mut tables.parameters);
    remove_license_comments(&mut tables.objects);
}

/// Source lines `from..to` (0-based, half open), clamped to the file.
fn region<'a>(lines: &'a [&'a str], from: usize, to: usize) -> &'a [&'a str] {
    let to = to.min(lines.len());
    let from = from.min(to);
    &lines[from..to]
}

/// Each object takes the comment ending right above its first line. The
/// region starts after the previous object, or after the previous object's
/// first line when that object encloses this one.
pub fn attach_object_comments(lines: &[&str], tables: &mut ParsedFile) {
    let mut previous = LineSpan { start: 0, end: 0 };

    for i in 0..tables.objects.len() {
        let span = tables.objects[i].line_span;
        let comment_end = span.start.saturating_sub(1);
        let comment_start = if previous.end <= comment_end {
            previous.end
        } else {
            previous.start
        };
        previous = span;

        let comment = match parse_object_comment(region(lines, comment_start, comment_end)) {
            Some(comment) => comment,
            None => continue,
        };

        let object = &mut tables.objects[i];
        object.full_comment = comment.full_comment;
        object.description = comment.description;
        object.natspec = comment.natspec;

        let object = &tables.objects[i];
        for (name, description) in comment.param_docs {
            match tables
                .parameters
                .iter_mut()
                .find(|p| p.belongs_to(object) && p.parameter_name == name)
            {
                Some(param) => param.description = description,
                None => debug!(
                    "@param {} documented on {} but not declared",
                    name, object.object_name
                ),
            }
        }
    }
}

/// Picks up comments written directly above or beside each declaration.
/// Fields already filled by the object pass are left alone.
pub fn attach_inline_comments(lines: &[&str], parameters: &mut [ContractParameter]) {
    let mut previous_line = 0;

    for param in parameters.iter_mut() {
        let comment_end = param.line_number;
        let comment_start = previous_line.min(comment_end.saturating_sub(2));
        previous_line = comment_end;

        let comment = match parse_parameter_comment(region(lines, comment_start, comment_end)) {
            Some(comment) => comment,
            None => continue,
        };

        fill_if_empty(&mut param.full_comment, comment.full_comment);
        fill_if_empty(&mut param.description, comment.description);
        fill_if_empty(&mut param.inline_comment, comment.inline_comment);
    }
}

fn fill_if_empty(field: &mut String, value: String) {
    if field.is_empty() {
        *field = value;
    }
}

/// Blanks parameter comments that merely repeat the parent object's.
pub fn remove_duplicate_comments(objects: &[ContractObject], parameters: &mut [ContractParameter]) {
    for param in parameters.iter_mut() {
        let parent = match objects.iter().find(|o| param.belongs_to(o)) {
            Some(parent) => parent,
            None => continue,
        };

        if param.full_comment == parent.full_comment || parent.full_comment.contains("@param") {
            param.full_comment.clear();
        }
        if param.description == parent.description {
            param.description.clear();
        }
    }
}

/// Contract descriptions that are only license boilerplate are dropped.
pub fn remove_license_comments(objects: &mut [ContractObject]) {
    for object in objects.iter_mut().filter(|o| o.kind == ObjectKind::Contract) {
        if LICENSE_MARKERS.iter().any(|m| object.description.contains(m)) {
            object.description.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn object(name: &str, kind: ObjectKind, contract: &str, start: usize, end: usize) -> ContractObject {
        ContractObject {
            object_name: name.to_string(),
            kind,
            contract: contract.to_string(),
            inheritance: Vec::new(),
            modifiers: Vec::new(),
            values: Vec::new(),
            visibility: String::new(),
            line_span: LineSpan { start, end },
            description: String::new(),
            full_comment: String::new(),
            natspec: NatSpec::default(),
            coding_keywords: Vec::new(),
            coding_topics: Vec::new(),
        }
    }

    fn param(name: &str, parent: &ContractObject, line: usize) -> ContractParameter {
        ContractParameter {
            parameter_name: name.to_string(),
            object_name: parent.object_name.clone(),
            contract: parent.contract.clone(),
            declared_type: "uint256".to_string(),
            type_category: "uint".to_string(),
            initial_value: None,
            line_number: line,
            visibility: String::new(),
            description: String::new(),
            full_comment: String::new(),
            inline_comment: String::new(),
        }
    }

    #[test]
    fn test_object_comments_follow_source_order() {
        let source = [
            "contract Box {",           // 1
            "    // Stores a value.",   // 2
            "    function store() {}",  // 3
            "    // Reads the value.",  // 4
            "    function read() {}",   // 5
            "}",                        // 6
        ];
        let contract = object("Box", ObjectKind::Contract, "Box", 1, 6);
        let store = object("store", ObjectKind::Function, "Box", 3, 3);
        let read = object("read", ObjectKind::Function, "Box", 5, 5);
        let mut tables = ParsedFile {
            objects: vec![contract, store, read],
            ..ParsedFile::default()
        };

        attach_object_comments(&source, &mut tables);
        assert_eq!(tables.objects[0].description, "");
        assert_eq!(tables.objects[1].description, "Stores a value");
        assert_eq!(tables.objects[2].description, "Reads the value");
        assert_eq!(tables.objects[2].full_comment, "Reads the value.");
    }

    #[test]
    fn test_param_docs_are_propagated() {
        let source = [
            "contract Box {",
            "    /**",
            "     * @notice Stores a value",
            "     * @param x the value",
            "     * @param missing not declared",
            "     */",
            "    function store(uint x) {}",
            "}",
        ];
        let contract = object("Box", ObjectKind::Contract, "Box", 1, 8);
        let store = object("store", ObjectKind::Function, "Box", 7, 7);
        let x = param("x", &store, 7);
        let mut tables = ParsedFile {
            objects: vec![contract, store],
            parameters: vec![x],
            ..ParsedFile::default()
        };

        annotate(&source, &mut tables);
        assert_eq!(tables.objects[1].description, "Stores a value");
        assert_eq!(tables.objects[1].natspec.params, vec!["x", "missing"]);
        assert_eq!(tables.parameters[0].description, "the value");
        assert_eq!(tables.parameters[0].full_comment, "");
    }

    #[test]
    fn test_inline_comments_do_not_overwrite() {
        let source = [
            "contract Vault {",
            "    uint public total; // running total",
            "    // Owner of the vault",
            "    address owner;",
            "    uint fee;",
            "}",
        ];
        let contract = object("Vault", ObjectKind::Contract, "Vault", 1, 6);
        let mut params = vec![
            param("total", &contract, 2),
            param("owner", &contract, 4),
            param("fee", &contract, 5),
        ];
        params[0].description = "set earlier".to_string();

        attach_inline_comments(&source, &mut params);
        assert_eq!(params[0].description, "set earlier");
        assert_eq!(params[0].inline_comment, "running total");
        assert_eq!(params[1].description, "Owner of the vault");
        assert_eq!(params[1].inline_comment, "");
        assert_eq!(params[2].description, "");
        assert_eq!(params[2].full_comment, "");
    }

    #[test]
    fn test_duplicates_are_removed() {
        let mut parent = object("store", ObjectKind::Function, "Box", 3, 3);
        parent.description = "Stores".to_string();
        parent.full_comment = "Stores".to_string();
        let mut same = param("x", &parent, 3);
        same.description = "Stores".to_string();
        same.full_comment = "Stores".to_string();
        let mut own = param("y", &parent, 3);
        own.description = "the y".to_string();
        own.full_comment = "the y".to_string();
        let mut params = vec![same, own];

        remove_duplicate_comments(&[parent], &mut params);
        assert_eq!(params[0].description, "");
        assert_eq!(params[0].full_comment, "");
        assert_eq!(params[1].description, "the y");
        assert_eq!(params[1].full_comment, "the y");
    }

    #[test]
    fn test_license_is_stripped_from_contracts_only() {
        let mut contract = object("Token", ObjectKind::Contract, "Token", 3, 9);
        contract.description = "SPDX-License-Identifier: MIT".to_string();
        let mut function = object("License", ObjectKind::Function, "Token", 4, 4);
        function.description = "Returns the License text".to_string();
        let mut objects = vec![contract, function];

        remove_license_comments(&mut objects);
        assert_eq!(objects[0].description, "");
        assert_eq!(objects[1].description, "Returns the License text");
    }
}
