//! Built-in DASH hierarchy families.
//!
//! Each family is built once on first use and lives for the rest of the
//! process.

use std::sync::OnceLock;

use crate::node::SchemaNode;

/// Family name of the AdaptationSet / Representation / SubRepresentation chain.
pub const REPRESENTATION_BASE: &str = "representation-base";

/// Family name of the Period / AdaptationSet / Representation segment chain.
pub const SEGMENT_VALUES: &str = "segment-values";

/// Built-in family names, in application order.
pub const FAMILY_NAMES: &[&str] = &[SEGMENT_VALUES, REPRESENTATION_BASE];

/// Common attributes and elements of DASH 5.3.7.
///
/// DASH 5.3.3.1 allows each of them on only one level of a chain.
pub const REPRESENTATION_BASE_PROPERTIES: &[&str] = &[
    "profiles",
    "width",
    "height",
    "sar",
    "frameRate",
    "audioSamplingRate",
    "mimeType",
    "segmentProfiles",
    "codecs",
    "maximumSAPPeriod",
    "startWithSAP",
    "maxPlayoutRate",
    "codingDependency",
    "scanType",
    "FramePacking",
    "AudioChannelConfiguration",
    "ContentProtection",
    "EssentialProperty",
    "SupplementalProperty",
    "InbandEventStream",
];

/// Segment information elements inherited from Period down to Representation.
pub const SEGMENT_VALUES_PROPERTIES: &[&str] = &["SegmentBase", "SegmentTemplate", "SegmentList"];

static REPRESENTATION_BASE_FAMILY: OnceLock<SchemaNode> = OnceLock::new();
static SEGMENT_VALUES_FAMILY: OnceLock<SchemaNode> = OnceLock::new();

/// Three-level chain built from a fixed tag list, every level sharing `keys`.
fn chain(tags: [&str; 3], keys: &[&str]) -> SchemaNode {
    // Constant input: tags are distinct and non-empty, keys are non-empty.
    let level = |tag: &str, children: Vec<SchemaNode>| {
        SchemaNode::new(tag, keys.iter().copied(), children)
            .expect("built-in family definition is valid")
    };
    let [outer, middle, inner] = tags;
    level(outer, vec![level(middle, vec![level(inner, Vec::new())])])
}

/// `AdaptationSet -> Representation -> SubRepresentation`.
pub fn representation_base() -> &'static SchemaNode {
    REPRESENTATION_BASE_FAMILY.get_or_init(|| {
        chain(
            ["AdaptationSet", "Representation", "SubRepresentation"],
            REPRESENTATION_BASE_PROPERTIES,
        )
    })
}

/// `Period -> AdaptationSet -> Representation`.
pub fn segment_values() -> &'static SchemaNode {
    SEGMENT_VALUES_FAMILY.get_or_init(|| {
        chain(
            ["Period", "AdaptationSet", "Representation"],
            SEGMENT_VALUES_PROPERTIES,
        )
    })
}

/// All built-in families, in the order they are applied to a manifest.
pub fn builtin_families() -> Vec<&'static SchemaNode> {
    FAMILY_NAMES.iter().filter_map(|name| family_by_name(name)).collect()
}

pub fn family_by_name(name: &str) -> Option<&'static SchemaNode> {
    match name {
        REPRESENTATION_BASE => Some(representation_base()),
        SEGMENT_VALUES => Some(segment_values()),
        _ => None,
    }
}
