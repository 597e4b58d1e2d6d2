//! Resolution output types.

use serde::{Deserialize, Serialize};

use crate::tree::ResolvedNode;

/// A tolerated duplicate declaration (lenient mode).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Diagnostic {
    /// The shared property key.
    pub key: String,

    /// Tag of the nearest ancestor that declared the key.
    pub ancestor: String,

    /// Tag of the node whose own value was kept.
    pub descendant: String,

    /// Location of the descendant, e.g. `AdaptationSet/Representation[1]`.
    pub path: String,
}

impl Diagnostic {
    pub fn to_code(&self) -> String {
        format!(
            "DUPLICATE_DECLARATION:{}:{}>{}@{}",
            self.key, self.ancestor, self.descendant, self.path
        )
    }
}

/// A complete resolved tree plus lenient-mode diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Resolution {
    pub root: ResolvedNode,

    #[serde(default)]
    pub warnings: Vec<Diagnostic>,
}

impl Resolution {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}
