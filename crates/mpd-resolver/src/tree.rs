//! Instance and resolved element trees.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Property key to raw value. Values are attribute strings or nested
/// element content, kept as produced by the document deserializer.
pub type Properties = BTreeMap<String, Value>;

/// One parsed element occurrence.
///
/// `properties` holds only the keys present on this occurrence in the
/// source document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InstanceNode {
    pub tag: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: Properties,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<InstanceNode>,
}

impl InstanceNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: InstanceNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Total nodes in this subtree, including itself.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(InstanceNode::node_count).sum::<usize>()
    }
}

/// An element occurrence after inheritance.
///
/// Same tag and child order as its source node; `properties` holds the
/// effective values.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ResolvedNode {
    pub tag: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: Properties,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ResolvedNode>,
}

impl ResolvedNode {
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(ResolvedNode::node_count).sum::<usize>()
    }

    /// Reinterpret as an instance tree, effective values becoming declared
    /// values.
    pub fn into_instance(self) -> InstanceNode {
        InstanceNode {
            tag: self.tag,
            properties: self.properties,
            children: self.children.into_iter().map(ResolvedNode::into_instance).collect(),
        }
    }

    /// Follow a chain of child indexes from this node.
    pub fn descend(&self, indexes: &[usize]) -> Option<&ResolvedNode> {
        indexes
            .iter()
            .try_fold(self, |node, &i| node.children.get(i))
    }
}

/// Verbatim copy: declared values become effective values, nothing inherited.
impl From<InstanceNode> for ResolvedNode {
    fn from(node: InstanceNode) -> Self {
        Self {
            tag: node.tag,
            properties: node.properties,
            children: node.children.into_iter().map(ResolvedNode::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_and_count() {
        let tree = InstanceNode::new("Outer")
            .with_property("x", 1)
            .with_child(InstanceNode::new("Middle").with_child(InstanceNode::new("Inner")))
            .with_child(InstanceNode::new("Middle"));

        assert_eq!(tree.node_count(), 4);
        assert_eq!(tree.property("x"), Some(&json!(1)));
        assert!(tree.property("y").is_none());
    }

    #[test]
    fn test_deserialize_defaults() {
        let tree: InstanceNode =
            serde_json::from_str(r#"{"tag": "Outer", "children": [{"tag": "Middle"}]}"#).unwrap();

        assert!(tree.properties.is_empty());
        assert_eq!(tree.children[0].tag, "Middle");
        assert!(tree.children[0].children.is_empty());
    }

    #[test]
    fn test_into_instance_preserves_shape() {
        let resolved = ResolvedNode {
            tag: "A".to_string(),
            properties: [("k".to_string(), json!("v"))].into_iter().collect(),
            children: vec![ResolvedNode {
                tag: "B".to_string(),
                ..Default::default()
            }],
        };

        let instance = resolved.clone().into_instance();
        assert_eq!(instance.tag, "A");
        assert_eq!(instance.property("k"), Some(&json!("v")));
        assert_eq!(instance.node_count(), resolved.node_count());
    }

    #[test]
    fn test_descend() {
        let resolved = ResolvedNode {
            tag: "A".to_string(),
            properties: Properties::new(),
            children: vec![ResolvedNode {
                tag: "B".to_string(),
                properties: Properties::new(),
                children: vec![ResolvedNode {
                    tag: "C".to_string(),
                    ..Default::default()
                }],
            }],
        };

        assert_eq!(resolved.descend(&[0, 0]).map(|n| n.tag.as_str()), Some("C"));
        assert!(resolved.descend(&[1]).is_none());
        assert_eq!(resolved.descend(&[]).map(|n| n.tag.as_str()), Some("A"));
    }
}
