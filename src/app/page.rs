//! Page documents: converting a parsed TOML/JSON table into a node tree
//!
//! A node is a table. `kind` selects the variant (`container` when absent),
//! `tag` and `children` are structural, text and heading nodes also reserve
//! `content` and headings reserve `level`. Every other key becomes an
//! attribute in document order.

use crate::components::{attribute_name_error, is_valid_tag_name, Attribute, Node, NodeKind};
use crate::error::{AppError, NodeError};
use serde_json::{Map, Value};

/// Top-level key holding the root node
pub const ENTRY_POINT: &str = "index";

fn reserved_keys(kind: NodeKind) -> &'static [&'static str] {
    match kind {
        NodeKind::Container => &["kind", "tag", "children"],
        NodeKind::Text => &["kind", "tag", "children", "content"],
        NodeKind::Heading => &["kind", "tag", "children", "content", "level"],
    }
}

fn at(path: &str, source: NodeError) -> AppError {
    AppError::Node {
        path: path.to_string(),
        source,
    }
}

fn invalid_field(field: &str, expected: &str) -> NodeError {
    NodeError::InvalidField {
        field: field.to_string(),
        expected: expected.to_string(),
    }
}

/// Resolve the `index` entry point of a page document into its root node
pub fn root_from_document(document: &Value, source_name: &str) -> Result<Node, AppError> {
    let entry = document
        .as_object()
        .and_then(|table| table.get(ENTRY_POINT))
        .ok_or_else(|| AppError::MissingEntryPoint(source_name.to_string()))?;

    node_from_value(entry, ENTRY_POINT)
}

/// Build a node (and its subtree) from a table at `path`
pub fn node_from_value(value: &Value, path: &str) -> Result<Node, AppError> {
    let table = value.as_object().ok_or_else(|| {
        at(
            path,
            NodeError::NotANode {
                path: path.to_string(),
            },
        )
    })?;

    let kind = parse_kind(table).map_err(|e| at(path, e))?;
    let mut node = match kind {
        NodeKind::Container => Node::container(),
        NodeKind::Text => Node::text(required_content(table, kind).map_err(|e| at(path, e))?),
        NodeKind::Heading => {
            let content = required_content(table, kind).map_err(|e| at(path, e))?;
            let level = match table.get("level") {
                None => 1,
                Some(value) => value
                    .as_i64()
                    .ok_or_else(|| at(path, invalid_field("level", "an integer")))?,
            };
            Node::try_heading(content, level).map_err(|e| at(path, e))?
        }
    };

    if let Some(tag) = table.get("tag") {
        let tag = tag
            .as_str()
            .ok_or_else(|| at(path, invalid_field("tag", "a string")))?;
        if !is_valid_tag_name(tag) {
            return Err(at(path, invalid_field("tag", "an HTML tag name")));
        }
        node = node.tag(tag);
    }

    let reserved = reserved_keys(kind);
    for (name, value) in table {
        if reserved.contains(&name.as_str()) {
            continue;
        }
        if let Some(reason) = attribute_name_error(name) {
            return Err(at(
                path,
                NodeError::InvalidAttribute {
                    name: name.clone(),
                    reason: reason.to_string(),
                },
            ));
        }
        let value = attribute_value(name, value).map_err(|e| at(path, e))?;
        node = node.attribute(Attribute::new(name.as_str(), value));
    }

    if let Some(children) = table.get("children") {
        let children = children
            .as_array()
            .ok_or_else(|| at(path, invalid_field("children", "an array of nodes")))?;
        for (i, child) in children.iter().enumerate() {
            let child_path = format!("{}.children[{}]", path, i);
            node = node.child(node_from_value(child, &child_path)?);
        }
    }

    Ok(node)
}

fn parse_kind(table: &Map<String, Value>) -> Result<NodeKind, NodeError> {
    let Some(kind) = table.get("kind") else {
        return Ok(NodeKind::Container);
    };
    match kind.as_str() {
        Some("container") | Some("div") => Ok(NodeKind::Container),
        Some("text") => Ok(NodeKind::Text),
        Some("heading") => Ok(NodeKind::Heading),
        Some(other) => Err(NodeError::UnknownKind(other.to_string())),
        None => Err(invalid_field("kind", "a string")),
    }
}

fn required_content(table: &Map<String, Value>, kind: NodeKind) -> Result<String, NodeError> {
    match table.get("content") {
        Some(Value::String(content)) => Ok(content.clone()),
        Some(_) => Err(invalid_field("content", "a string")),
        None => Err(NodeError::MissingField {
            kind: kind.to_string(),
            field: "content".to_string(),
        }),
    }
}

fn attribute_value(name: &str, value: &Value) -> Result<Option<String>, NodeError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Array(_) | Value::Object(_) => Err(NodeError::InvalidAttribute {
            name: name.to_string(),
            reason: "arrays and tables cannot be attribute values".to_string(),
        }),
    }
}
