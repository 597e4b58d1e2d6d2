//! mpd-inherit - DASH manifest property inheritance
//!
//! Applies the inheritance rules of DASH hierarchy families (common
//! attributes of AdaptationSet / Representation / SubRepresentation,
//! segment information of Period / AdaptationSet / Representation) to
//! parsed manifest trees.

pub mod config;
pub mod document;

pub use config::{ConfigError, EffectiveConfig};
pub use document::{apply_families, resolve_dir, resolve_file, DocumentError, DocumentResolution};
pub use mpd_resolver::{
    resolve, ConflictPolicy, Diagnostic, InstanceNode, Resolution, ResolveError, ResolvedNode,
    Resolver, ResolverOptions,
};
pub use mpd_schema::{SchemaError, SchemaNode, SchemaSpec};
