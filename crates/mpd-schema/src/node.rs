//! Schema node type and builder.

use std::collections::HashSet;

use crate::error::SchemaError;

/// One element type's position in a hierarchy family.
///
/// Nodes are validated when built and expose no mutation afterwards, so a
/// tree can be shared by reference between any number of resolutions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaNode {
    tag: String,
    shared_properties: HashSet<String>,
    children: Vec<SchemaNode>,
}

impl SchemaNode {
    /// Build a node from its parts.
    ///
    /// Fails if the tag or any shared key is empty, or if two children
    /// carry the same tag.
    pub fn new<I, S>(
        tag: impl Into<String>,
        shared_properties: I,
        children: Vec<SchemaNode>,
    ) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tag = tag.into();
        if tag.is_empty() {
            return Err(SchemaError::EmptyTag);
        }

        let mut shared = HashSet::new();
        for key in shared_properties {
            let key = key.into();
            if key.is_empty() {
                return Err(SchemaError::EmptySharedKey { tag });
            }
            shared.insert(key);
        }

        let mut seen: HashSet<&str> = HashSet::with_capacity(children.len());
        for child in &children {
            if !seen.insert(child.tag.as_str()) {
                return Err(SchemaError::DuplicateChildTag {
                    parent: tag,
                    tag: child.tag.clone(),
                });
            }
        }

        Ok(Self {
            tag,
            shared_properties: shared,
            children,
        })
    }

    /// Start a builder for a node governing `tag`.
    pub fn builder(tag: impl Into<String>) -> SchemaNodeBuilder {
        SchemaNodeBuilder {
            tag: tag.into(),
            shared: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn shared_properties(&self) -> &HashSet<String> {
        &self.shared_properties
    }

    /// Shared keys in lexical order, for display and stable output.
    pub fn sorted_shared_properties(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.shared_properties.iter().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Whether `key` may be declared at this level and inherited downward.
    pub fn shares(&self, key: &str) -> bool {
        self.shared_properties.contains(key)
    }

    pub fn children(&self) -> &[SchemaNode] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Find the direct child governing `tag`.
    ///
    /// `None` means the schema has no rule for that nesting; the resolver
    /// treats such subtrees as opaque.
    pub fn find_child_by_tag(&self, tag: &str) -> Option<&SchemaNode> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// Number of levels in the deepest chain below and including this node.
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(SchemaNode::depth).max().unwrap_or(0)
    }

    /// Every governed tag, pre-order.
    pub fn tags(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_tags(&mut out);
        out
    }

    fn collect_tags<'a>(&'a self, out: &mut Vec<&'a str>) {
        out.push(&self.tag);
        for child in &self.children {
            child.collect_tags(out);
        }
    }
}

/// Incremental construction of a [`SchemaNode`].
///
/// Validation is deferred to [`SchemaNodeBuilder::build`].
#[derive(Debug, Clone)]
pub struct SchemaNodeBuilder {
    tag: String,
    shared: Vec<String>,
    children: Vec<SchemaNode>,
}

impl SchemaNodeBuilder {
    /// Add shared property keys.
    pub fn shared<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.shared.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Append a child node; order is preserved.
    pub fn child(mut self, child: SchemaNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn build(self) -> Result<SchemaNode, SchemaError> {
        SchemaNode::new(self.tag, self.shared, self.children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(tag: &str) -> SchemaNode {
        SchemaNode::new(tag, ["x", "y"], vec![]).unwrap()
    }

    #[test]
    fn test_builder_chain() {
        let node = SchemaNode::builder("Outer")
            .shared(["x", "y"])
            .child(
                SchemaNode::builder("Middle")
                    .shared(["x", "y"])
                    .child(leaf("Inner"))
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();

        assert_eq!(node.tag(), "Outer");
        assert!(node.shares("x"));
        assert!(!node.shares("z"));
        assert_eq!(node.depth(), 3);
        assert_eq!(node.tags(), vec!["Outer", "Middle", "Inner"]);
    }

    #[test]
    fn test_find_child_by_tag() {
        let node = SchemaNode::new("Outer", ["x"], vec![leaf("A"), leaf("B")]).unwrap();

        assert_eq!(node.find_child_by_tag("B").map(|c| c.tag()), Some("B"));
        assert!(node.find_child_by_tag("C").is_none());
        assert!(node.find_child_by_tag("Outer").is_none());
    }

    #[test]
    fn test_empty_tag_rejected() {
        let err = SchemaNode::new("", ["x"], vec![]).unwrap_err();
        assert_eq!(err, SchemaError::EmptyTag);
    }

    #[test]
    fn test_empty_shared_key_rejected() {
        let err = SchemaNode::builder("Outer")
            .shared(["x", ""])
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::EmptySharedKey {
                tag: "Outer".to_string()
            }
        );
    }

    #[test]
    fn test_duplicate_child_tag_rejected() {
        let err = SchemaNode::new("Outer", ["x"], vec![leaf("Inner"), leaf("Inner")]).unwrap_err();
        assert_eq!(err.code(), "DUPLICATE_CHILD_TAG");
        assert!(err.to_string().contains("'Outer'"));
        assert!(err.to_string().contains("'Inner'"));
    }

    #[test]
    fn test_same_tag_allowed_at_different_levels() {
        let inner = SchemaNode::new("Node", ["x"], vec![]).unwrap();
        let outer = SchemaNode::new("Node", ["x"], vec![inner]);
        assert!(outer.is_ok());
    }

    #[test]
    fn test_duplicate_shared_keys_collapse() {
        let node = SchemaNode::new("Outer", ["x", "x", "y"], vec![]).unwrap();
        assert_eq!(node.shared_properties().len(), 2);
        assert_eq!(node.sorted_shared_properties(), vec!["x", "y"]);
        assert!(node.is_leaf());
    }
}
