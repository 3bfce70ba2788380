use super::error::ExtractError;
use super::extractor::model::*;
use super::pipeline::parse_file;
use serde_json::{json, Value};

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn loc(start: usize, end: usize) -> Value {
        json!({"start": {"line": start, "column": 0}, "end": {"line": end, "column": 1}})
    }

    fn uint_param(name: &str, line: usize) -> Value {
        json!({
            "type": "VariableDeclaration",
            "name": name,
            "typeName": {"type": "ElementaryTypeName", "name": "uint256"},
            "storageLocation": null,
            "loc": loc(line, line)
        })
    }

    fn function(name: &str, line: usize, params: Vec<Value>) -> Value {
        json!({
            "type": "FunctionDefinition",
            "name": name,
            "parameters": {"type": "ParameterList", "parameters": params},
            "modifiers": [],
            "visibility": "public",
            "loc": loc(line, line)
        })
    }

    fn source_unit(name: &str, start: usize, end: usize, sub_nodes: Vec<Value>) -> Value {
        json!({
            "type": "SourceUnit",
            "children": [
                {"type": "PragmaDirective", "name": "solidity", "value": "^0.8.0", "loc": loc(1, 1)},
                {
                    "type": "ContractDefinition",
                    "name": name,
                    "baseContracts": [],
                    "subNodes": sub_nodes,
                    "kind": "contract",
                    "loc": loc(start, end)
                }
            ]
        })
    }

    #[test]
    fn test_minimal_contract_without_comments() {
        let source = [
            "pragma solidity ^0.8.0;",
            "contract Wallet {",
            "    function deposit(uint256 amount) public {}",
            "}",
        ];
        let ast = source_unit("Wallet", 2, 4, vec![function("deposit", 3, vec![uint_param("amount", 3)])]);

        let tables = parse_file(&ast, &source).unwrap();
        let functions: Vec<_> = tables.objects.iter().filter(|o| o.kind == ObjectKind::Function).collect();
        assert_eq!(functions.len(), 1);
        assert_eq!(functions[0].object_name, "deposit");
        assert_eq!(functions[0].description, "");
        assert!(functions[0].coding_keywords.is_empty());
        assert!(functions[0].coding_topics.is_empty());

        assert_eq!(tables.parameters.len(), 1);
        let amount = &tables.parameters[0];
        assert_eq!(amount.parameter_name, "amount");
        assert_eq!(amount.declared_type, "uint256");
        assert_eq!(amount.type_category, "uint");
        assert_eq!(amount.description, "");
        assert_eq!(amount.full_comment, "");
        assert!(tables.diagnostics.is_empty());
    }

    #[test]
    fn test_natspec_block_documents_function_and_parameter() {
        let source = [
            "pragma solidity ^0.8.0;",
            "",
            "contract Foo {",
            "    /**",
            "     * @title Foo",
            "     * @param x the value",
            "     */",
            "    function f(uint x) public {}",
            "}",
        ];
        let ast = source_unit("Foo", 3, 9, vec![function("f", 8, vec![uint_param("x", 8)])]);

        let tables = parse_file(&ast, &source).unwrap();
        let f = &tables.objects[1];
        assert_eq!(f.object_name, "f");
        assert_eq!(f.description, "Foo");
        assert_eq!(f.natspec.title, "Foo");
        assert_eq!(f.full_comment, "@title Foo\n@param x the value");

        let x = &tables.parameters[0];
        assert_eq!(x.description, "the value");
        assert_eq!(x.full_comment, "");
    }

    fn two_functions(first: &str, second: &str) -> (Vec<&'static str>, Value) {
        let source = vec![
            "contract Box {",
            "    uint256 stored;",
            "    // First thing",
            "    function one() public {}",
            "    // Second thing",
            "    function two() public {}",
            "}",
        ];
        let ast = source_unit(
            "Box",
            1,
            7,
            vec![
                json!({
                    "type": "StateVariableDeclaration",
                    "variables": [uint_param("stored", 2)],
                    "loc": loc(2, 2)
                }),
                function(first, 4, vec![]),
                function(second, 6, vec![]),
            ],
        );
        (source, ast)
    }

    #[test]
    fn test_comment_association_follows_order() {
        let describe = |tables: &ParsedFile, name: &str| {
            tables
                .objects
                .iter()
                .find(|o| o.object_name == name)
                .map(|o| o.description.clone())
                .unwrap()
        };

        let (source, ast) = two_functions("alpha", "beta");
        let tables = parse_file(&ast, &source).unwrap();
        assert_eq!(describe(&tables, "alpha"), "First thing");
        assert_eq!(describe(&tables, "beta"), "Second thing");

        let (source, ast) = two_functions("beta", "alpha");
        let tables = parse_file(&ast, &source).unwrap();
        assert_eq!(describe(&tables, "alpha"), "Second thing");
        assert_eq!(describe(&tables, "beta"), "First thing");
    }

    #[test]
    fn test_license_comment_is_not_a_description() {
        let source = [
            "pragma solidity ^0.8.0;",
            "// SPDX-License-Identifier: MIT",
            "contract Token {",
            "}",
        ];
        let ast = source_unit("Token", 3, 4, vec![]);

        let tables = parse_file(&ast, &source).unwrap();
        assert_eq!(tables.objects[0].kind, ObjectKind::Contract);
        assert_eq!(tables.objects[0].description, "");
        assert_eq!(tables.objects[0].full_comment, "SPDX-License-Identifier: MIT");
    }

    #[test]
    fn test_parameter_repeating_parent_comment_is_blanked() {
        let source = [
            "pragma solidity ^0.8.0;",
            "contract Bank {",
            "    // Sends funds",
            "    function send(uint256 value) public {}",
            "}",
        ];
        let ast = source_unit("Bank", 2, 5, vec![function("send", 4, vec![uint_param("value", 4)])]);

        let tables = parse_file(&ast, &source).unwrap();
        assert_eq!(tables.objects[1].description, "Sends funds");
        assert_eq!(tables.parameters[0].description, "");
        assert_eq!(tables.parameters[0].full_comment, "");
    }

    #[test]
    fn test_state_variable_comments() {
        let source = [
            "pragma solidity ^0.8.0;",
            "contract Dao {",
            "    // Minimum share of votes",
            "    uint256 public quorum = 50;",
            "    address owner; // deployer",
            "}",
        ];
        let owner = json!({
            "type": "VariableDeclaration",
            "name": "owner",
            "typeName": {"type": "ElementaryTypeName", "name": "address"},
            "loc": loc(5, 5)
        });
        let mut quorum = uint_param("quorum", 4);
        quorum["visibility"] = json!("public");
        quorum["expression"] = json!({"type": "NumberLiteral", "number": "50", "subdenomination": null});
        let ast = source_unit(
            "Dao",
            2,
            6,
            vec![
                json!({"type": "StateVariableDeclaration", "variables": [quorum], "loc": loc(4, 4)}),
                json!({"type": "StateVariableDeclaration", "variables": [owner], "loc": loc(5, 5)}),
            ],
        );

        let tables = parse_file(&ast, &source).unwrap();
        assert_eq!(tables.parameters[0].description, "Minimum share of votes");
        assert_eq!(tables.parameters[0].initial_value.as_deref(), Some("50"));
        assert_eq!(tables.parameters[0].visibility, "public");
        assert_eq!(tables.parameters[1].description, "deployer");
        assert_eq!(tables.parameters[1].inline_comment, "deployer");
        assert_eq!(tables.objects[0].coding_keywords, vec!["voting"]);
    }

    #[test]
    fn test_unsupported_nodes_add_no_rows() {
        let source = ["pragma solidity ^0.8.0;", "contract Lib {", "    using X for uint;", "    error Nope();", "}"];
        let ast = source_unit(
            "Lib",
            2,
            5,
            vec![
                json!({"type": "UsingForDeclaration", "loc": loc(3, 3)}),
                json!({"type": "CustomErrorDefinition", "name": "Nope", "loc": loc(4, 4)}),
            ],
        );

        let tables = parse_file(&ast, &source).unwrap();
        assert_eq!(tables.objects.len(), 1);
        assert_eq!(tables.diagnostics.len(), 2);
        assert!(tables.diagnostics[1].message.contains("CustomErrorDefinition"));
    }

    #[test]
    fn test_keyword_from_name() {
        let source = ["pragma solidity ^0.8.0;", "contract ProposalFactory {", "}"];
        let ast = source_unit("ProposalFactory", 2, 3, vec![]);

        let tables = parse_file(&ast, &source).unwrap();
        assert_eq!(tables.objects[0].coding_keywords, vec!["proposal"]);
        assert!(tables.objects[0].coding_topics.is_empty());
    }

    #[test]
    fn test_unusable_ast() {
        let err = parse_file(&json!({"type": "SourceUnit"}), &[]).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidAst(_)));
    }
}
