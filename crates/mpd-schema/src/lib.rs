//! Declarative inheritance schema for nested manifest elements.
//!
//! A [`SchemaNode`] tree describes one hierarchy family: which element
//! types nest inside each other and which property keys may be declared at
//! any level of that chain and inherited downward.

mod error;
mod families;
mod node;
mod spec;

pub use error::SchemaError;
pub use families::{
    builtin_families, family_by_name, representation_base, segment_values, FAMILY_NAMES,
    REPRESENTATION_BASE, REPRESENTATION_BASE_PROPERTIES, SEGMENT_VALUES,
    SEGMENT_VALUES_PROPERTIES,
};
pub use node::{SchemaNode, SchemaNodeBuilder};
pub use spec::SchemaSpec;
