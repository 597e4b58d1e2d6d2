//! Declarative schema file format.
//!
//! ```toml
//! tag = "Outer"
//! shared = ["x", "y"]
//!
//! [[children]]
//! tag = "Middle"
//!
//! [[children.children]]
//! tag = "Inner"
//! ```
//!
//! A node without `shared` reuses its parent's keys.

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::node::SchemaNode;

/// Serialized form of a schema tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SchemaSpec {
    pub tag: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SchemaSpec>,
}

impl SchemaSpec {
    pub fn from_toml_str(contents: &str) -> Result<Self, SchemaError> {
        toml::from_str(contents).map_err(|e| SchemaError::Parse(format!("TOML: {}", e)))
    }

    pub fn from_json_str(contents: &str) -> Result<Self, SchemaError> {
        serde_json::from_str(contents).map_err(|e| SchemaError::Parse(format!("JSON: {}", e)))
    }

    /// Capture an existing node (with explicit keys at every level).
    pub fn from_node(node: &SchemaNode) -> Self {
        Self {
            tag: node.tag().to_string(),
            shared: Some(
                node.sorted_shared_properties()
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            ),
            children: node.children().iter().map(Self::from_node).collect(),
        }
    }

    fn into_node(self, inherited: &[String]) -> Result<SchemaNode, SchemaError> {
        let shared = self.shared.unwrap_or_else(|| inherited.to_vec());
        let children = self
            .children
            .into_iter()
            .map(|child| child.into_node(&shared))
            .collect::<Result<Vec<_>, _>>()?;
        SchemaNode::new(self.tag, shared, children)
    }
}

impl TryFrom<SchemaSpec> for SchemaNode {
    type Error = SchemaError;

    fn try_from(spec: SchemaSpec) -> Result<Self, Self::Error> {
        spec.into_node(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NESTED: &str = r#"
tag = "Outer"
shared = ["x", "y"]

[[children]]
tag = "Middle"

[[children.children]]
tag = "Inner"
shared = ["y"]
"#;

    #[test]
    fn test_toml_children_inherit_shared_keys() {
        let node = SchemaNode::try_from(SchemaSpec::from_toml_str(NESTED).unwrap()).unwrap();

        let middle = node.find_child_by_tag("Middle").unwrap();
        assert!(middle.shares("x"));
        assert!(middle.shares("y"));

        let inner = middle.find_child_by_tag("Inner").unwrap();
        assert!(!inner.shares("x"));
        assert!(inner.shares("y"));
    }

    #[test]
    fn test_json_spec() {
        let json = r#"{"tag": "A", "shared": ["k"], "children": [{"tag": "B"}]}"#;
        let node = SchemaNode::try_from(SchemaSpec::from_json_str(json).unwrap()).unwrap();
        assert_eq!(node.tags(), vec!["A", "B"]);
        assert!(node.children()[0].shares("k"));
    }

    #[test]
    fn test_invalid_spec_reports_construction_error() {
        let toml = r#"
tag = "A"
shared = ["k"]

[[children]]
tag = "B"

[[children]]
tag = "B"
"#;
        let err = SchemaNode::try_from(SchemaSpec::from_toml_str(toml).unwrap()).unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateChildTag {
                parent: "A".to_string(),
                tag: "B".to_string()
            }
        );
    }

    #[test]
    fn test_parse_error() {
        let err = SchemaSpec::from_toml_str("tag = ").unwrap_err();
        assert_eq!(err.code(), "PARSE_ERROR");
    }

    #[test]
    fn test_from_node_rebuilds_equal_tree() {
        let node = SchemaNode::try_from(SchemaSpec::from_toml_str(NESTED).unwrap()).unwrap();
        let rebuilt = SchemaNode::try_from(SchemaSpec::from_node(&node)).unwrap();
        assert_eq!(rebuilt, node);
    }
}
