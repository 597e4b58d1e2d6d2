//! Schema-driven property inheritance for manifest element trees.
//!
//! The resolver walks an [`InstanceNode`] tree in lock-step with a
//! [`mpd_schema::SchemaNode`] family and produces a [`ResolvedNode`] tree in
//! which every node carries its effective shared property values.

mod error;
mod options;
mod resolver;
mod result;
mod tree;

pub use error::ResolveError;
pub use options::{ConflictPolicy, ResolverOptions, DEFAULT_MAX_DEPTH};
pub use resolver::{resolve, Resolver};
pub use result::{Diagnostic, Resolution};
pub use tree::{InstanceNode, Properties, ResolvedNode};
