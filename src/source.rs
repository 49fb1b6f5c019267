use tree_sitter::{Node, Parser};

use crate::error::{FinderError, Result};
use crate::render::MethodRecord;

const TYPE_DECLARATIONS: [&str; 5] = [
    "class_declaration",
    "interface_declaration",
    "enum_declaration",
    "record_declaration",
    "annotation_type_declaration",
];

/// Reads method declarations out of Java source text.
///
/// Holds one tree-sitter parser so a search over many source files does not
/// reload the grammar for each of them.
pub struct SourceExtractor {
    parser: Parser,
}

impl SourceExtractor {
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_java::LANGUAGE.into())
            .map_err(|e| FinderError::Parser(e.to_string()))?;
        Ok(Self { parser })
    }

    /// Methods and constructors named `method_filter` in the first type
    /// declared by `source`. Later top-level types and nested types are not
    /// inspected.
    pub fn extract(&mut self, source: &str, method_filter: &str) -> Result<Vec<MethodRecord>> {
        if method_filter.is_empty() {
            return Ok(Vec::new());
        }

        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| FinderError::Parser("parse aborted".to_string()))?;
        let root = tree.root_node();
        if let Some(bad) = first_error(root) {
            let at = bad.start_position();
            return Err(FinderError::Syntax {
                line: at.row + 1,
                column: at.column + 1,
            });
        }

        let bytes = source.as_bytes();
        let mut cursor = root.walk();
        let Some(type_decl) = root
            .named_children(&mut cursor)
            .find(|n| TYPE_DECLARATIONS.contains(&n.kind()))
        else {
            return Ok(Vec::new());
        };

        let owner = type_decl
            .child_by_field_name("name")
            .map(|n| node_text(&n, bytes).to_string())
            .unwrap_or_default();

        let mut records = Vec::new();
        for member in members(&type_decl) {
            let is_constructor = match member.kind() {
                "method_declaration" => false,
                "constructor_declaration" => true,
                _ => continue,
            };
            let name = member
                .child_by_field_name("name")
                .map(|n| node_text(&n, bytes))
                .unwrap_or_default();
            if name != method_filter {
                continue;
            }
            records.push(method_record(&member, bytes, &owner, name, is_constructor));
        }

        Ok(records)
    }
}

pub fn extract(source: &str, method_filter: &str) -> Result<Vec<MethodRecord>> {
    if method_filter.is_empty() {
        return Ok(Vec::new());
    }
    SourceExtractor::new()?.extract(source, method_filter)
}

fn method_record(
    node: &Node,
    source: &[u8],
    owner: &str,
    name: &str,
    is_constructor: bool,
) -> MethodRecord {
    let mut modifiers = Vec::new();
    let mut thrown_types = Vec::new();

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "modifiers" => {
                let mut inner = child.walk();
                for m in child.children(&mut inner) {
                    modifiers.push(normalize_whitespace(node_text(&m, source)));
                }
            }
            "throws" => {
                let mut inner = child.walk();
                for t in child.named_children(&mut inner) {
                    thrown_types.push(normalize_whitespace(node_text(&t, source)));
                }
            }
            _ => {}
        }
    }

    let type_parameters = node
        .child_by_field_name("type_parameters")
        .map(|tp| named_texts(&tp, source, |k| k == "type_parameter"))
        .unwrap_or_default();

    let parameter_types = node
        .child_by_field_name("parameters")
        .map(|p| {
            named_texts(&p, source, |k| {
                matches!(
                    k,
                    "formal_parameter" | "spread_parameter" | "receiver_parameter"
                )
            })
        })
        .unwrap_or_default();

    let return_type = if is_constructor {
        String::new()
    } else {
        node.child_by_field_name("type")
            .map(|t| normalize_whitespace(node_text(&t, source)))
            .unwrap_or_default()
    };

    MethodRecord {
        owner: owner.to_string(),
        modifiers,
        type_parameters,
        return_type,
        name: name.to_string(),
        parameter_types,
        thrown_types,
        is_constructor,
        is_static_initializer: false,
    }
}

/// Direct members of a type body, with enum body declarations flattened in.
fn members<'a>(type_decl: &Node<'a>) -> Vec<Node<'a>> {
    let Some(body) = type_decl.child_by_field_name("body") else {
        return Vec::new();
    };

    let mut out = Vec::new();
    let mut cursor = body.walk();
    for child in body.named_children(&mut cursor) {
        if child.kind() == "enum_body_declarations" {
            let mut inner = child.walk();
            out.extend(child.named_children(&mut inner));
        } else {
            out.push(child);
        }
    }
    out
}

fn named_texts(node: &Node, source: &[u8], keep: impl Fn(&str) -> bool) -> Vec<String> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|c| keep(c.kind()))
        .map(|c| normalize_whitespace(node_text(&c, source)))
        .collect()
}

fn first_error<'a>(node: Node<'a>) -> Option<Node<'a>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'a>> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

fn node_text<'a>(node: &Node, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or("")
}

fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
