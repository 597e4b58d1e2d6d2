//! Resolver options.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Default bound on instance tree nesting.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// What to do when a node declares a shared property an ancestor already
/// declared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// The descendant's own value wins and a diagnostic is recorded.
    #[default]
    Lenient,
    /// Resolution fails with `DuplicateDeclaration`.
    Strict,
}

impl fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lenient => write!(f, "lenient"),
            Self::Strict => write!(f, "strict"),
        }
    }
}

impl FromStr for ConflictPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            other => Err(format!(
                "unknown conflict policy '{}' (expected 'lenient' or 'strict')",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverOptions {
    #[serde(default)]
    pub conflict_policy: ConflictPolicy,

    /// Maximum instance tree depth, the root being depth 1.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            conflict_policy: ConflictPolicy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ResolverOptions {
    pub fn strict() -> Self {
        Self {
            conflict_policy: ConflictPolicy::Strict,
            ..Self::default()
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
