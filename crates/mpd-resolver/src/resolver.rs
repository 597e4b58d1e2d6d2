//! Tree resolver.
//!
//! Depth-first, pre-order walk carrying an inherited frame: for each shared
//! key seen so far, the value and tag of its nearest declarer. A node's own
//! shared value wins over the frame and becomes the nearest declarer for its
//! subtree. A node restating the value it would inherit anyway is neither a
//! conflict nor a new declarer, so resolved trees resolve to themselves.
//! Non-shared keys are copied through. Children with no matching schema child
//! are copied verbatim.

use std::borrow::Cow;
use std::collections::BTreeMap;

use mpd_schema::SchemaNode;
use serde_json::Value;

use crate::error::ResolveError;
use crate::options::{ConflictPolicy, ResolverOptions};
use crate::result::{Diagnostic, Resolution};
use crate::tree::{InstanceNode, ResolvedNode};

/// Nearest declaration of one shared key.
#[derive(Debug, Clone, Copy)]
struct Inherited<'a> {
    value: &'a Value,
    declarer: &'a str,
}

type Frame<'a> = BTreeMap<&'a str, Inherited<'a>>;

/// Applies a schema family to instance trees.
///
/// Holds only options; every call to [`Resolver::resolve`] is independent.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    options: ResolverOptions,
}

impl Resolver {
    pub fn new(options: ResolverOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Resolve `instance` against the family rooted at `schema`.
    ///
    /// Returns the complete resolved tree or an error; never a partial tree.
    pub fn resolve(
        &self,
        schema: &SchemaNode,
        instance: &InstanceNode,
    ) -> Result<Resolution, ResolveError> {
        self.resolve_at_depth(schema, instance, 1)
    }

    /// Resolve a family root that sits `depth` levels deep in a larger
    /// document. The depth guard keeps counting from there.
    pub fn resolve_at_depth(
        &self,
        schema: &SchemaNode,
        instance: &InstanceNode,
        depth: usize,
    ) -> Result<Resolution, ResolveError> {
        if schema.tag() != instance.tag {
            return Err(ResolveError::SchemaMismatch {
                expected: schema.tag().to_string(),
                found: instance.tag.clone(),
            });
        }

        tracing::debug!(
            family = schema.tag(),
            policy = %self.options.conflict_policy,
            depth,
            "resolving instance tree"
        );

        let mut walk = Walk {
            options: &self.options,
            warnings: Vec::new(),
        };
        let root = walk.resolve_node(schema, instance, &Frame::new(), depth, &instance.tag)?;

        tracing::debug!(
            family = schema.tag(),
            nodes = root.node_count(),
            warnings = walk.warnings.len(),
            "resolved instance tree"
        );

        Ok(Resolution {
            root,
            warnings: walk.warnings,
        })
    }
}

/// Resolve with default options.
pub fn resolve(schema: &SchemaNode, instance: &InstanceNode) -> Result<Resolution, ResolveError> {
    Resolver::default().resolve(schema, instance)
}

/// State of one resolution.
struct Walk<'o> {
    options: &'o ResolverOptions,
    warnings: Vec<Diagnostic>,
}

impl Walk<'_> {
    fn resolve_node<'a>(
        &mut self,
        schema: &SchemaNode,
        node: &'a InstanceNode,
        frame: &Frame<'a>,
        depth: usize,
        path: &str,
    ) -> Result<ResolvedNode, ResolveError> {
        self.check_depth(node, depth)?;

        let mut properties = node.properties.clone();
        let mut declared: Vec<(&'a str, &'a Value)> = Vec::new();

        for (key, value) in &node.properties {
            if !schema.shares(key) {
                continue;
            }
            match frame.get(key.as_str()) {
                Some(inherited) if inherited.value == value => continue,
                Some(inherited) => self.duplicate(key, inherited, node, path)?,
                None => {}
            }
            declared.push((key.as_str(), value));
        }

        for (key, inherited) in frame {
            if schema.shares(key) && !properties.contains_key(*key) {
                properties.insert((*key).to_string(), inherited.value.clone());
            }
        }

        // Keys this level does not share stay in the frame for deeper levels.
        let child_frame: Cow<'_, Frame<'a>> = if declared.is_empty() {
            Cow::Borrowed(frame)
        } else {
            let mut next = frame.clone();
            for (key, value) in declared {
                next.insert(
                    key,
                    Inherited {
                        value,
                        declarer: &node.tag,
                    },
                );
            }
            Cow::Owned(next)
        };

        let mut children = Vec::with_capacity(node.children.len());
        for (index, child) in node.children.iter().enumerate() {
            let child_path = format!("{}/{}[{}]", path, child.tag, index);
            let resolved = match schema.find_child_by_tag(&child.tag) {
                Some(child_schema) => {
                    self.resolve_node(child_schema, child, &child_frame, depth + 1, &child_path)?
                }
                None => {
                    tracing::debug!(
                        path = %child_path,
                        parent = schema.tag(),
                        "no schema rule for nesting, copying subtree unchanged"
                    );
                    self.copy_opaque(child, depth + 1)?
                }
            };
            children.push(resolved);
        }

        Ok(ResolvedNode {
            tag: node.tag.clone(),
            properties,
            children,
        })
    }

    fn duplicate(
        &mut self,
        key: &str,
        inherited: &Inherited<'_>,
        node: &InstanceNode,
        path: &str,
    ) -> Result<(), ResolveError> {
        match self.options.conflict_policy {
            ConflictPolicy::Strict => Err(ResolveError::DuplicateDeclaration {
                key: key.to_string(),
                ancestor: inherited.declarer.to_string(),
                descendant: node.tag.clone(),
            }),
            ConflictPolicy::Lenient => {
                tracing::warn!(
                    key,
                    ancestor = inherited.declarer,
                    descendant = %node.tag,
                    path,
                    "shared property declared on more than one level, keeping descendant value"
                );
                self.warnings.push(Diagnostic {
                    key: key.to_string(),
                    ancestor: inherited.declarer.to_string(),
                    descendant: node.tag.clone(),
                    path: path.to_string(),
                });
                Ok(())
            }
        }
    }

    /// Copy a subtree the schema has no rule for. Nothing is inherited into it.
    fn copy_opaque(&self, node: &InstanceNode, depth: usize) -> Result<ResolvedNode, ResolveError> {
        self.check_depth(node, depth)?;
        let children = node
            .children
            .iter()
            .map(|child| self.copy_opaque(child, depth + 1))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ResolvedNode {
            tag: node.tag.clone(),
            properties: node.properties.clone(),
            children,
        })
    }

    fn check_depth(&self, node: &InstanceNode, depth: usize) -> Result<(), ResolveError> {
        if depth > self.options.max_depth {
            return Err(ResolveError::DepthExceeded {
                max_depth: self.options.max_depth,
                tag: node.tag.clone(),
            });
        }
        Ok(())
    }
}
