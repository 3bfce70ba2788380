use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The closed set of AST definitions that become rows in the objects table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    #[serde(rename = "ContractDefinition")]
    Contract,
    #[serde(rename = "EventDefinition")]
    Event,
    #[serde(rename = "ModifierDefinition")]
    Modifier,
    #[serde(rename = "FunctionDefinition")]
    Function,
    #[serde(rename = "StructDefinition")]
    Struct,
    #[serde(rename = "EnumDefinition")]
    Enum,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 6] = [
        ObjectKind::Contract,
        ObjectKind::Event,
        ObjectKind::Modifier,
        ObjectKind::Function,
        ObjectKind::Struct,
        ObjectKind::Enum,
    ];

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "ContractDefinition" => Some(ObjectKind::Contract),
            "EventDefinition" => Some(ObjectKind::Event),
            "ModifierDefinition" => Some(ObjectKind::Modifier),
            "FunctionDefinition" => Some(ObjectKind::Function),
            "StructDefinition" => Some(ObjectKind::Struct),
            "EnumDefinition" => Some(ObjectKind::Enum),
            _ => None,
        }
    }

    pub fn as_tag(&self) -> &'static str {
        match self {
            ObjectKind::Contract => "ContractDefinition",
            ObjectKind::Event => "EventDefinition",
            ObjectKind::Modifier => "ModifierDefinition",
            ObjectKind::Function => "FunctionDefinition",
            ObjectKind::Struct => "StructDefinition",
            ObjectKind::Enum => "EnumDefinition",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_tag())
    }
}

/// Inclusive, 1-indexed line range of a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSpan {
    pub start: usize,
    pub end: usize,
}

/// NatSpec tags recovered from an object's doc comment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NatSpec {
    pub title: String,
    pub notice: String,
    pub dev: String,
    pub returns: String,
    /// Names documented with `@param`, in comment order.
    pub params: Vec<String>,
    /// Any other `@tag`, kept verbatim.
    pub other: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractObject {
    pub object_name: String,
    pub kind: ObjectKind,
    pub contract: String,
    pub inheritance: Vec<String>,
    pub modifiers: Vec<String>,
    pub values: Vec<String>,
    pub visibility: String,
    pub line_span: LineSpan,
    pub description: String,
    pub full_comment: String,
    pub natspec: NatSpec,
    pub coding_keywords: Vec<String>,
    pub coding_topics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractParameter {
    pub parameter_name: String,
    /// Parent object, referenced by name and contract.
    pub object_name: String,
    pub contract: String,
    pub declared_type: String,
    pub type_category: String,
    pub initial_value: Option<String>,
    pub line_number: usize,
    pub visibility: String,
    pub description: String,
    pub full_comment: String,
    pub inline_comment: String,
}

impl ContractParameter {
    pub fn belongs_to(&self, object: &ContractObject) -> bool {
        self.object_name == object.object_name && self.contract == object.contract
    }
}

/// A skipped node or parameter, surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub line: Option<usize>,
    pub message: String,
}

/// The two tables produced for one source file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedFile {
    pub objects: Vec<ContractObject>,
    pub parameters: Vec<ContractParameter>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParsedFile {
    pub fn parameters_of<'a>(
        &'a self,
        object: &'a ContractObject,
    ) -> impl Iterator<Item = &'a ContractParameter> + 'a {
        self.parameters.iter().filter(move |p| p.belongs_to(object))
    }
}
