//! solcoder
//!
//! Extracts a table of contract objects (contracts, functions, events,
//! modifiers, structs, enums) and a table of their parameters from a Solidity
//! file's AST, attaches NatSpec and inline comments from the source, and tags
//! objects with governance keywords for manual coding.

pub mod coding;
pub mod comments;
pub mod config;
pub mod error;
pub mod export;
pub mod extractor;
pub mod parser;
pub mod pipeline;

pub use coding::{CodingTaxonomy, Tagger};
pub use config::Settings;
pub use error::ExtractError;
pub use extractor::model::{ContractObject, ContractParameter, Diagnostic, ObjectKind, ParsedFile};
pub use pipeline::{parse_file, parse_file_with};

#[cfg(test)]
mod tests;
