//! Whole-document application of hierarchy families.
//!
//! A manifest is not rooted at a family root: an MPD holds Periods, which
//! hold AdaptationSets. Each family is applied to every node carrying its
//! root tag, outermost first, and the output of one family feeds the next.

use std::fs;
use std::path::Path;

use mpd_resolver::{
    Diagnostic, InstanceNode, ResolveError, ResolvedNode, Resolver, ResolverOptions,
};
use mpd_schema::SchemaNode;
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

/// A lenient-mode diagnostic tagged with the family that produced it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FamilyDiagnostic {
    /// Root tag of the family.
    pub family: String,

    /// The diagnostic; its path is relative to the document root.
    #[serde(flatten)]
    pub diagnostic: Diagnostic,
}

/// Result of applying every family to one document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentResolution {
    pub root: ResolvedNode,

    /// Family roots found and resolved, across all families.
    pub roots_resolved: usize,

    #[serde(default)]
    pub warnings: Vec<FamilyDiagnostic>,
}

/// Per-file outcome of a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub path: String,
    pub ok: bool,
    pub warnings: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Parse a JSON instance tree.
pub fn parse_document(contents: &str) -> Result<InstanceNode, DocumentError> {
    serde_json::from_str(contents).map_err(|e| DocumentError::Parse(e.to_string()))
}

pub fn load_document(path: &Path) -> Result<InstanceNode, DocumentError> {
    let contents = fs::read_to_string(path)
        .map_err(|e| DocumentError::Io(format!("{}: {}", path.display(), e)))?;
    parse_document(&contents).map_err(|e| match e {
        DocumentError::Parse(msg) => DocumentError::Parse(format!("{}: {}", path.display(), msg)),
        other => other,
    })
}

/// Apply `families` in order to `document`.
///
/// Fails on the first family error; no partial document is returned.
pub fn apply_families(
    families: &[&SchemaNode],
    document: &InstanceNode,
    options: ResolverOptions,
) -> Result<DocumentResolution, ResolveError> {
    let resolver = Resolver::new(options);
    let mut roots_resolved = 0;
    let mut warnings = Vec::new();

    let mut current = document.clone();
    for &schema in families {
        let mut pass = FamilyPass {
            resolver: &resolver,
            schema,
            roots_resolved: 0,
            warnings: Vec::new(),
        };
        current = pass.apply(current, 1, &document.tag)?;
        roots_resolved += pass.roots_resolved;
        warnings.append(&mut pass.warnings);
    }

    tracing::debug!(
        families = families.len(),
        roots = roots_resolved,
        warnings = warnings.len(),
        "applied families to document"
    );

    Ok(DocumentResolution {
        root: ResolvedNode::from(current),
        roots_resolved,
        warnings,
    })
}

/// Load and resolve one JSON document.
pub fn resolve_file(
    path: &Path,
    families: &[&SchemaNode],
    options: ResolverOptions,
) -> Result<DocumentResolution, DocumentError> {
    let document = load_document(path)?;
    Ok(apply_families(families, &document, options)?)
}

/// Resolve every `*.json` file below `dir`, independently.
///
/// A failing file is reported in its outcome and does not stop the run.
pub fn resolve_dir(
    dir: &Path,
    families: &[&SchemaNode],
    options: ResolverOptions,
) -> Result<Vec<BatchOutcome>, DocumentError> {
    let mut outcomes = Vec::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| DocumentError::Io(e.to_string()))?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().map_or(true, |ext| ext != "json") {
            continue;
        }

        let outcome = match resolve_file(path, families, options) {
            Ok(resolution) => BatchOutcome {
                path: path.display().to_string(),
                ok: true,
                warnings: resolution.warnings.len(),
                error: None,
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "document failed to resolve");
                BatchOutcome {
                    path: path.display().to_string(),
                    ok: false,
                    warnings: 0,
                    error: Some(e.to_string()),
                }
            }
        };
        outcomes.push(outcome);
    }

    Ok(outcomes)
}

struct FamilyPass<'r, 's> {
    resolver: &'r Resolver,
    schema: &'s SchemaNode,
    roots_resolved: usize,
    warnings: Vec<FamilyDiagnostic>,
}

impl FamilyPass<'_, '_> {
    fn apply(
        &mut self,
        node: InstanceNode,
        depth: usize,
        path: &str,
    ) -> Result<InstanceNode, ResolveError> {
        let max_depth = self.resolver.options().max_depth;
        if depth > max_depth {
            return Err(ResolveError::DepthExceeded {
                max_depth,
                tag: node.tag,
            });
        }

        let schema = self.schema;
        if node.tag == schema.tag() {
            let resolution = self.resolver.resolve_at_depth(schema, &node, depth)?;
            self.roots_resolved += 1;
            // Resolver paths start at the family root tag.
            let suffix_start = node.tag.len();
            self.warnings
                .extend(resolution.warnings.into_iter().map(|mut diagnostic| {
                    diagnostic.path = format!("{}{}", path, &diagnostic.path[suffix_start..]);
                    FamilyDiagnostic {
                        family: schema.tag().to_string(),
                        diagnostic,
                    }
                }));
            return Ok(resolution.root.into_instance());
        }

        let InstanceNode {
            tag,
            properties,
            children,
        } = node;
        let children = children
            .into_iter()
            .enumerate()
            .map(|(index, child)| {
                let child_path = format!("{}/{}[{}]", path, child.tag, index);
                self.apply(child, depth + 1, &child_path)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(InstanceNode {
            tag,
            properties,
            children,
        })
    }
}
