pub mod classifier;
pub mod model;
pub mod parameter;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ExtractError;
use crate::parser::AstNode;
use model::*;

pub use classifier::classify;
pub use parameter::extract_parameter;

/// Builds the raw objects and parameters tables from a source unit. Comment
/// and keyword columns are left empty.
pub fn extract_tables(ast: &Value, ignore_contracts: &[String]) -> Result<ParsedFile, ExtractError> {
    let root = AstNode::new(ast);
    if !root.is_object() {
        return Err(ExtractError::InvalidAst("root is not an object".to_string()));
    }
    match root.field("children") {
        Some(Value::Array(_)) => {}
        _ => return Err(ExtractError::InvalidAst("source unit has no `children` list".to_string())),
    }

    let mut tables = ParsedFile::default();

    let contracts = root
        .list("children")
        .into_iter()
        .filter(|c| c.kind() == Some("ContractDefinition"));

    for node in contracts {
        let contract_name = match node.name() {
            Some(name) => name,
            None => {
                skip(&mut tables, ExtractError::malformed("ContractDefinition", "name", node.start_line()));
                continue;
            }
        };
        if ignore_contracts.iter().any(|c| c == contract_name) {
            debug!("Ignoring contract {}", contract_name);
            continue;
        }

        let contract = match classify(node, contract_name) {
            Ok(contract) => contract,
            Err(e) => {
                skip(&mut tables, e);
                continue;
            }
        };
        tables.objects.push(contract.clone());

        for item in node.list("subNodes") {
            if item.kind() == Some("StateVariableDeclaration") {
                for var in item.list("variables") {
                    push_parameter(&mut tables, var, &contract);
                }
                continue;
            }

            let object = match classify(item, contract_name) {
                Ok(object) => object,
                Err(e) => {
                    skip(&mut tables, e);
                    continue;
                }
            };
            let declared = declared_parameters(item, object.kind);
            tables.objects.push(object.clone());
            for param in declared {
                push_parameter(&mut tables, param, &object);
            }
        }
    }

    Ok(tables)
}

/// Parameters declared by a definition. Functions, events and modifiers carry
/// a `ParameterList` (or a bare array, depending on the parser); structs
/// carry `members`.
fn declared_parameters(item: AstNode<'_>, kind: ObjectKind) -> Vec<AstNode<'_>> {
    match kind {
        ObjectKind::Struct => item.list("members"),
        ObjectKind::Function | ObjectKind::Event | ObjectKind::Modifier => {
            match item.field("parameters") {
                Some(Value::Array(_)) => item.list("parameters"),
                Some(Value::Object(_)) => item
                    .child("parameters")
                    .map(|list| list.list("parameters"))
                    .unwrap_or_default(),
                _ => Vec::new(),
            }
        }
        ObjectKind::Contract | ObjectKind::Enum => Vec::new(),
    }
}

fn push_parameter(tables: &mut ParsedFile, decl: AstNode<'_>, parent: &ContractObject) {
    match extract_parameter(decl, parent) {
        Ok(param) => tables.parameters.push(param),
        Err(e) => skip(tables, e),
    }
}

fn skip(tables: &mut ParsedFile, err: ExtractError) {
    match &err {
        ExtractError::UnsupportedNodeKind { .. } => debug!("Skipping node: {}", err),
        _ => warn!("Skipping node: {}", err),
    }
    tables.diagnostics.push(Diagnostic {
        line: err.line(),
        message: err.to_string(),
    });
}
