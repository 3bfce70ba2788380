use thiserror::Error;

/// Placeholder used wherever the AST does not carry a value we can render.
pub const ERROR_MSG: &str = "error: could not parse";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// The node is not one of the six object kinds. Callers skip it.
    #[error("unsupported object type {kind} (line {line:?})")]
    UnsupportedNodeKind { kind: String, line: Option<usize> },

    /// A required field is missing on an otherwise supported node.
    #[error("malformed {kind} node: missing `{field}` (line {line:?})")]
    MalformedNode {
        kind: String,
        field: &'static str,
        line: Option<usize>,
    },

    /// The document cannot be read as a source unit at all.
    #[error("invalid AST: {0}")]
    InvalidAst(String),
}

impl ExtractError {
    pub fn malformed(kind: impl Into<String>, field: &'static str, line: Option<usize>) -> Self {
        ExtractError::MalformedNode {
            kind: kind.into(),
            field,
            line,
        }
    }

    /// Approximate source line of the failing node, if known.
    pub fn line(&self) -> Option<usize> {
        match self {
            ExtractError::UnsupportedNodeKind { line, .. } => *line,
            ExtractError::MalformedNode { line, .. } => *line,
            ExtractError::InvalidAst(_) => None,
        }
    }
}
