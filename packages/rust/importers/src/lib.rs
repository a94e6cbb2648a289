//! Importers for well-known project documents.
//!
//! Before indexing, docindex checks the project root for a readme, an OpenAPI
//! spec, a GraphQL schema and a changelog. Each source has a fixed list of
//! candidate file names tried in priority order; the first one that exists is
//! wrapped as a content document and written to a fixed path in the store.
//! A source with no candidate on disk is simply skipped.

mod sources;

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use docindex_markdown::render_document;
use docindex_shared::{DocIndexError, Result};
use docindex_storage::ContentStore;

pub use sources::{BodyTemplate, DocumentSource, SOURCES, SourceKind};

// ---------------------------------------------------------------------------
// ImportedDocument
// ---------------------------------------------------------------------------

/// Outcome of one successful import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedDocument {
    /// Which well-known source this was.
    pub kind: SourceKind,
    /// The candidate file that was found.
    pub source_path: PathBuf,
    /// Path of the written document, relative to the content store.
    pub content_path: String,
}

// ---------------------------------------------------------------------------
// Main entry points
// ---------------------------------------------------------------------------

/// Run every importer against `project_root`, writing into `store`.
///
/// Importers run in [`SOURCES`] order. Returns one record per source found.
#[instrument(skip_all, fields(root = %project_root.display()))]
pub async fn import_all(project_root: &Path, store: &ContentStore) -> Result<Vec<ImportedDocument>> {
    store.ensure_dir(sources::API_DIR)?;

    let mut imported = Vec::new();
    for source in SOURCES {
        if let Some(doc) = import_source(project_root, store, source).await? {
            imported.push(doc);
        }
    }

    info!(count = imported.len(), "import complete");
    Ok(imported)
}

/// Import a single source. `Ok(None)` when none of its candidates exist.
pub async fn import_source(
    project_root: &Path,
    store: &ContentStore,
    source: &DocumentSource,
) -> Result<Option<ImportedDocument>> {
    let Some((source_path, raw)) = locate(project_root, source.candidates).await? else {
        debug!(kind = %source.kind, "no source file found, skipping");
        return Ok(None);
    };

    let body = source.template.apply(&raw);
    let document = render_document(source.title, &body);
    store.write_document(source.target, &document).await?;

    info!(
        kind = %source.kind,
        from = %source_path.display(),
        to = source.target,
        "imported source document"
    );

    Ok(Some(ImportedDocument {
        kind: source.kind,
        source_path,
        content_path: source.target.to_string(),
    }))
}

/// Read the first candidate that exists under `root`.
///
/// A missing candidate moves on to the next one; any other I/O error is fatal.
async fn locate(root: &Path, candidates: &[&str]) -> Result<Option<(PathBuf, String)>> {
    for name in candidates {
        let path = root.join(name);
        match tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| DocIndexError::io(&path, e))
        {
            Ok(raw) => return Ok(Some((path, raw))),
            Err(e) if e.is_not_found() => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(None)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
