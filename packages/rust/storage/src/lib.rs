//! Filesystem content store.
//!
//! The [`ContentStore`] owns the directory of `.mdx` documents the site renders
//! and the search index is built from.
//!
//! **Access rules:**
//! - Importers: write via [`ContentStore::write_document`] (sole writer)
//! - Index builder: read-only via [`ContentStore::list_documents`] / [`read_content_document`]
//!
//! Documents are never deleted; writes overwrite in place.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobMatcher};
use tracing::{debug, instrument};
use walkdir::WalkDir;

use docindex_markdown::parse_document;
use docindex_shared::{CONTENT_EXTENSION, ContentDocument, DocIndexError, Result, normalize_content_path};

/// A document discovered in the store, not yet read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDocument {
    /// Slash-normalized path relative to the store root.
    pub rel_path: String,
    /// Absolute (or CWD-relative) path on disk.
    pub abs_path: PathBuf,
}

/// Primary handle on the content directory.
#[derive(Debug, Clone)]
pub struct ContentStore {
    root: PathBuf,
    matcher: GlobMatcher,
}

impl ContentStore {
    /// Open the store at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| DocIndexError::io(&root, e))?;
        Self::with_root(root)
    }

    fn with_root(root: PathBuf) -> Result<Self> {
        let pattern = format!("**/*.{CONTENT_EXTENSION}");
        let matcher = Glob::new(&pattern)
            .map_err(|e| DocIndexError::config(format!("invalid content glob {pattern}: {e}")))?
            .compile_matcher();
        Ok(Self { root, matcher })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Ensure a sub-directory of the store exists.
    pub fn ensure_dir(&self, rel_dir: &str) -> Result<PathBuf> {
        let dir = self.root.join(rel_dir);
        std::fs::create_dir_all(&dir).map_err(|e| DocIndexError::io(&dir, e))?;
        Ok(dir)
    }

    /// Write (or overwrite) a document at `rel_path`, creating parent directories.
    #[instrument(skip(self, contents), fields(root = %self.root.display()))]
    pub async fn write_document(&self, rel_path: &str, contents: &str) -> Result<PathBuf> {
        let target = self.root.join(rel_path);

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DocIndexError::io(parent, e))?;
        }

        tokio::fs::write(&target, contents)
            .await
            .map_err(|e| DocIndexError::io(&target, e))?;

        debug!(path = %target.display(), bytes = contents.len(), "wrote content document");
        Ok(target)
    }

    /// Enumerate every content document, sorted by relative path.
    pub fn list_documents(&self) -> Result<Vec<StoredDocument>> {
        if !self.root.exists() {
            debug!(root = %self.root.display(), "content store missing, nothing to list");
            return Ok(Vec::new());
        }

        let mut docs = Vec::new();

        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry.map_err(|e| walk_error(&self.root, e))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let relative = path.strip_prefix(&self.root).unwrap_or(path);
            let rel_path = normalize_content_path(&relative.to_string_lossy());

            if !self.matcher.is_match(&rel_path) {
                continue;
            }

            docs.push(StoredDocument {
                rel_path,
                abs_path: path.to_path_buf(),
            });
        }

        // Sort for deterministic ordering
        docs.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));

        Ok(docs)
    }
}

/// Read and parse a stored document. Free function so worker tasks need no store handle.
pub async fn read_content_document(doc: &StoredDocument) -> Result<ContentDocument> {
    let raw = tokio::fs::read_to_string(&doc.abs_path)
        .await
        .map_err(|e| DocIndexError::io(&doc.abs_path, e))?;

    Ok(parse_document(&raw).into_content_document(doc.rel_path.clone()))
}

fn walk_error(root: &Path, err: walkdir::Error) -> DocIndexError {
    let path = err.path().unwrap_or(root).to_path_buf();
    match err.into_io_error() {
        Some(io) => DocIndexError::io(path, io),
        None => DocIndexError::validation(format!(
            "filesystem loop detected under {}",
            path.display()
        )),
    }
}
