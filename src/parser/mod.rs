//! Read-only view over a `solidity-parser` style JSON AST.
//!
//! The AST is produced by an external tool with `loc` spans enabled. Nodes are
//! JSON objects tagged by a `type` field; every accessor here is fallible so
//! callers decide whether a missing field is fatal.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

#[derive(Debug, Clone, Copy)]
pub struct AstNode<'a> {
    value: &'a Value,
}

impl<'a> AstNode<'a> {
    pub fn new(value: &'a Value) -> Self {
        AstNode { value }
    }

    pub fn raw(&self) -> &'a Value {
        self.value
    }

    pub fn is_object(&self) -> bool {
        self.value.is_object()
    }

    /// Node tag, e.g. `FunctionDefinition`. Some producers call it `kind`.
    pub fn kind(&self) -> Option<&'a str> {
        self.str_field("type").or_else(|| self.str_field("kind"))
    }

    pub fn kind_or_unknown(&self) -> &'a str {
        self.kind().unwrap_or("?")
    }

    pub fn name(&self) -> Option<&'a str> {
        self.str_field("name")
    }

    pub fn field(&self, key: &str) -> Option<&'a Value> {
        match self.value.get(key) {
            Some(Value::Null) | None => None,
            Some(v) => Some(v),
        }
    }

    pub fn str_field(&self, key: &str) -> Option<&'a str> {
        self.field(key).and_then(Value::as_str)
    }

    /// Object-valued field as a node.
    pub fn child(&self, key: &str) -> Option<AstNode<'a>> {
        self.field(key)
            .filter(|v| v.is_object())
            .map(AstNode::new)
    }

    /// Object entries of an array-valued field. Anything else yields nothing.
    pub fn list(&self, key: &str) -> Vec<AstNode<'a>> {
        match self.field(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter(|v| v.is_object())
                .map(AstNode::new)
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn start_line(&self) -> Option<usize> {
        self.loc_line("start")
    }

    pub fn end_line(&self) -> Option<usize> {
        self.loc_line("end")
    }

    fn loc_line(&self, edge: &str) -> Option<usize> {
        self.value
            .get("loc")?
            .get(edge)?
            .get("line")?
            .as_u64()
            .map(|l| l as usize)
    }
}

pub fn load_ast(text: &str) -> Result<Value> {
    serde_json::from_str(text).with_context(|| "Failed to parse AST document as JSON")
}

pub fn load_ast_file(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read AST file: {}", path.display()))?;
    load_ast(&text).with_context(|| format!("Invalid AST in {}", path.display()))
}
