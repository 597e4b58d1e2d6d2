//! Built-in defaults (layer 1)

use mpd_resolver::{ConflictPolicy, DEFAULT_MAX_DEPTH};
use mpd_schema::FAMILY_NAMES;
use serde::{Deserialize, Serialize};

/// Built-in default configuration values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinDefaults {
    /// Duplicate declaration handling (default: lenient)
    pub conflict_policy: ConflictPolicy,

    /// Maximum instance tree depth (default: 64)
    pub max_depth: usize,

    /// Families applied to each document, in order
    pub families: Vec<String>,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        Self {
            conflict_policy: ConflictPolicy::Lenient,
            max_depth: DEFAULT_MAX_DEPTH,
            families: FAMILY_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl BuiltinDefaults {
    /// Convert to JSON Value for merging
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "resolver": {
                "conflict_policy": self.conflict_policy,
                "max_depth": self.max_depth,
            },
            "families": self.families,
        })
    }
}
