use serde_json::Value;

use super::model::{ContractObject, ContractParameter};
use crate::error::{ExtractError, ERROR_MSG};
use crate::parser::AstNode;

pub fn extract_parameter(
    decl: AstNode<'_>,
    parent: &ContractObject,
) -> Result<ContractParameter, ExtractError> {
    let tag = decl.kind().unwrap_or("VariableDeclaration");
    let line_number = decl
        .start_line()
        .ok_or_else(|| ExtractError::malformed(tag, "loc.start.line", None))?;
    let name = decl
        .name()
        .ok_or_else(|| ExtractError::malformed(tag, "name", Some(line_number)))?;
    let type_node = decl
        .child("typeName")
        .ok_or_else(|| ExtractError::malformed(tag, "typeName", Some(line_number)))?;

    Ok(ContractParameter {
        parameter_name: name.to_string(),
        object_name: parent.object_name.clone(),
        contract: parent.contract.clone(),
        declared_type: render_type(decl, type_node),
        type_category: type_category(type_node),
        initial_value: initial_value(decl),
        line_number,
        visibility: decl.str_field("visibility").unwrap_or_default().to_string(),
        description: String::new(),
        full_comment: String::new(),
        inline_comment: String::new(),
    })
}

/// Renders the declared type. Mapping and array components are resolved one
/// level deep only; anything nested shows up as `type:<kind>`.
pub fn render_type(decl: AstNode<'_>, type_node: AstNode<'_>) -> String {
    match type_node.kind() {
        Some("Mapping") => {
            let key = component_name(type_node.child("keyType"));
            let value = component_name(type_node.child("valueType"));
            format!("mapping ({} => {})", key, value)
        }
        Some("ArrayTypeName") => {
            let base = component_name(type_node.child("baseTypeName"));
            let length = type_node.field("length").map(expression_text).unwrap_or_default();
            let location = decl.str_field("storageLocation").unwrap_or_default();
            format!("{}[{}] {}", base, length, location).trim().to_string()
        }
        _ => plain_name(type_node).unwrap_or(ERROR_MSG).to_string(),
    }
}

/// Coarse type class: `map`, `array`, `userdefined`, or the elementary type
/// name without its size suffix.
pub fn type_category(type_node: AstNode<'_>) -> String {
    let kind = type_node.kind_or_unknown();
    let category = if kind.contains("TypeName") && kind != "ElementaryTypeName" {
        kind.strip_suffix("TypeName").unwrap_or(kind).to_lowercase()
    } else if kind == "Mapping" {
        "map".to_string()
    } else {
        plain_name(type_node).unwrap_or(ERROR_MSG).to_string()
    };
    strip_size_suffix(&category).to_string()
}

pub fn strip_size_suffix(category: &str) -> &str {
    category.trim_end_matches(|c: char| c.is_ascii_digit())
}

fn plain_name<'a>(type_node: AstNode<'a>) -> Option<&'a str> {
    type_node.name().or_else(|| type_node.str_field("namePath"))
}

fn component_name(type_node: Option<AstNode<'_>>) -> String {
    match type_node {
        Some(node) => match plain_name(node) {
            Some(name) => name.to_string(),
            None => format!("type:{}", node.kind_or_unknown()),
        },
        None => "type:?".to_string(),
    }
}

fn initial_value(decl: AstNode<'_>) -> Option<String> {
    decl.field("initialValue")
        .or_else(|| decl.field("expression"))
        .map(expression_text)
}

/// Literal text of an expression node; falls back to compact JSON.
pub fn expression_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Object(map) => {
            if let Some(v) = map.get("value").filter(|v| !v.is_null() && !v.is_object()) {
                return expression_text(v);
            }
            if let Some(number) = map.get("number").and_then(Value::as_str) {
                return match map.get("subdenomination").and_then(Value::as_str) {
                    Some(unit) => format!("{} {}", number, unit),
                    None => number.to_string(),
                };
            }
            if let Some(name) = map.get("name").and_then(Value::as_str) {
                return name.to_string();
            }
            value.to_string()
        }
        _ => value.to_string(),
    }
}
