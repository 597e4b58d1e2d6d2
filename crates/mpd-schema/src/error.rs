//! Schema construction errors.

/// A malformed schema tree.
///
/// Schema trees are static configuration, so every variant is a defect in
/// that configuration and is reported when the tree is built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("schema node tag must not be empty")]
    EmptyTag,

    #[error("schema node '{tag}' declares an empty shared property key")]
    EmptySharedKey { tag: String },

    #[error("schema node '{parent}' has more than one child tagged '{tag}'")]
    DuplicateChildTag { parent: String, tag: String },

    #[error("schema file parse error: {0}")]
    Parse(String),
}

impl SchemaError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyTag => "EMPTY_TAG",
            Self::EmptySharedKey { .. } => "EMPTY_SHARED_KEY",
            Self::DuplicateChildTag { .. } => "DUPLICATE_CHILD_TAG",
            Self::Parse(_) => "PARSE_ERROR",
        }
    }
}
