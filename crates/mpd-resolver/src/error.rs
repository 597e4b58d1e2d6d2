//! Resolution failures.

/// Reasons a resolution produced no tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// The instance root does not belong to the schema's family.
    #[error("schema mismatch: family root is '{expected}', document root is '{found}'")]
    SchemaMismatch { expected: String, found: String },

    /// A shared property was declared on two levels of one chain.
    #[error("shared property '{key}' declared on '{ancestor}' and on descendant '{descendant}'")]
    DuplicateDeclaration {
        key: String,
        ancestor: String,
        descendant: String,
    },

    /// The instance tree nests deeper than allowed.
    #[error("instance tree exceeds maximum depth {max_depth} at '{tag}'")]
    DepthExceeded { max_depth: usize, tag: String },
}

impl ResolveError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::SchemaMismatch { .. } => "SCHEMA_MISMATCH",
            Self::DuplicateDeclaration { .. } => "DUPLICATE_DECLARATION",
            Self::DepthExceeded { .. } => "DEPTH_EXCEEDED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_parties() {
        let err = ResolveError::DuplicateDeclaration {
            key: "x".to_string(),
            ancestor: "Outer".to_string(),
            descendant: "Middle".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'x'"));
        assert!(msg.contains("'Outer'"));
        assert!(msg.contains("'Middle'"));
        assert_eq!(err.code(), "DUPLICATE_DECLARATION");
    }
}
