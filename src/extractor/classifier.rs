use super::model::*;
use crate::error::{ExtractError, ERROR_MSG};
use crate::parser::AstNode;

/// Name given to fallback functions, which the upstream parser mis-names.
pub const ANONYMOUS_NAME: &str = "(none)";

pub fn classify(node: AstNode<'_>, contract_name: &str) -> Result<ContractObject, ExtractError> {
    let tag = node.kind_or_unknown();
    let kind = ObjectKind::from_tag(tag).ok_or_else(|| ExtractError::UnsupportedNodeKind {
        kind: tag.to_string(),
        line: node.start_line(),
    })?;

    let line_span = line_span(node, tag)?;

    let object = match kind {
        ObjectKind::Contract => ContractObject {
            object_name: contract_name.to_string(),
            kind,
            contract: contract_name.to_string(),
            inheritance: base_contracts(node),
            modifiers: Vec::new(),
            values: Vec::new(),
            visibility: String::new(),
            line_span,
            description: String::new(),
            full_comment: String::new(),
            natspec: NatSpec::default(),
            coding_keywords: Vec::new(),
            coding_topics: Vec::new(),
        },
        _ => {
            let name = node
                .name()
                .ok_or_else(|| ExtractError::malformed(tag, "name", node.start_line()))?;
            let object_name = if name.starts_with("function()") {
                ANONYMOUS_NAME.to_string()
            } else {
                name.to_string()
            };
            let values = if kind == ObjectKind::Enum {
                member_names(node, "members")
            } else {
                Vec::new()
            };

            ContractObject {
                object_name,
                kind,
                contract: contract_name.to_string(),
                inheritance: Vec::new(),
                modifiers: member_names(node, "modifiers"),
                values,
                visibility: node.str_field("visibility").unwrap_or_default().to_string(),
                line_span,
                description: String::new(),
                full_comment: String::new(),
                natspec: NatSpec::default(),
                coding_keywords: Vec::new(),
                coding_topics: Vec::new(),
            }
        }
    };

    Ok(object)
}

fn line_span(node: AstNode<'_>, tag: &str) -> Result<LineSpan, ExtractError> {
    let start = node
        .start_line()
        .ok_or_else(|| ExtractError::malformed(tag, "loc.start.line", None))?;
    let end = node
        .end_line()
        .ok_or_else(|| ExtractError::malformed(tag, "loc.end.line", Some(start)))?;
    Ok(LineSpan { start, end })
}

fn base_contracts(node: AstNode<'_>) -> Vec<String> {
    node.list("baseContracts")
        .into_iter()
        .map(|base| {
            base.child("baseName")
                .and_then(|b| b.str_field("namePath").or_else(|| b.name()))
                .unwrap_or(ERROR_MSG)
                .to_string()
        })
        .collect()
}

fn member_names(node: AstNode<'_>, key: &str) -> Vec<String> {
    node.list(key)
        .into_iter()
        .map(|m| m.name().unwrap_or(ERROR_MSG).to_string())
        .collect()
}
