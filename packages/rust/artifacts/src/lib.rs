//! Output artifacts served to the browser.
//!
//! Currently a single artifact: `search-index.json`, the flat array of
//! [`IndexEntry`] records the client-side search widget loads.

use std::path::{Path, PathBuf};

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument};

use docindex_shared::{DocIndexError, IndexEntry, Result};

/// Metadata for a written artifact file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactMeta {
    pub path: PathBuf,
    pub sha256: String,
    pub size_bytes: usize,
    pub entry_count: usize,
}

/// Render entries exactly as they are written to disk: a two-space indented
/// JSON array followed by a newline.
pub fn render_search_index(entries: &[IndexEntry]) -> Result<String> {
    let mut json = serde_json::to_string_pretty(entries).map_err(|e| {
        DocIndexError::validation(format!("JSON serialization failed: {e}"))
    })?;
    json.push('\n');
    Ok(json)
}

/// Write the search index to `public_dir/file_name`.
///
/// The directory is created if absent. The file is replaced atomically (write to
/// a temp file, then rename), so a failed run leaves any previous index intact.
/// An empty `entries` slice still produces a file (`[]`).
#[instrument(skip_all, fields(dir = %public_dir.display(), entries = entries.len()))]
pub fn write_search_index(
    public_dir: &Path,
    file_name: &str,
    entries: &[IndexEntry],
) -> Result<ArtifactMeta> {
    std::fs::create_dir_all(public_dir).map_err(|e| DocIndexError::io(public_dir, e))?;

    let content = render_search_index(entries)?;
    let target = public_dir.join(file_name);
    let temp = public_dir.join(format!(".{file_name}.tmp"));

    // Write to temp file first
    std::fs::write(&temp, &content).map_err(|e| DocIndexError::io(&temp, e))?;

    // Atomic rename
    std::fs::rename(&temp, &target).map_err(|e| DocIndexError::io(&target, e))?;

    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let sha256 = format!("{:x}", hasher.finalize());

    debug!(path = %target.display(), size = content.len(), "wrote artifact");

    let meta = ArtifactMeta {
        path: target,
        sha256,
        size_bytes: content.len(),
        entry_count: entries.len(),
    };

    info!(path = %meta.path.display(), entries = meta.entry_count, "search index written");

    Ok(meta)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("docindex-artifacts-test-{}", uuid::Uuid::now_v7()))
    }

    fn entry(title: &str, href: &str) -> IndexEntry {
        IndexEntry {
            title: title.into(),
            href: href.into(),
            content: format!("{title} body"),
            section: href.trim_start_matches('/').split('/').next().unwrap_or("").into(),
        }
    }

    #[test]
    fn empty_index_is_written() {
        let tmp = temp_dir();
        let public = tmp.join("public");

        let meta = write_search_index(&public, "search-index.json", &[]).unwrap();
        assert_eq!(meta.entry_count, 0);
        assert_eq!(std::fs::read_to_string(&meta.path).unwrap(), "[]\n");

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn entries_roundtrip_through_file() {
        let tmp = temp_dir();
        let entries = vec![entry("Changelog", "/99-changelog"), entry("API", "/docs/api")];

        let meta = write_search_index(&tmp, "search-index.json", &entries).unwrap();
        let raw = std::fs::read_to_string(&meta.path).unwrap();
        assert!(raw.starts_with("[\n  {\n    \"title\": \"Changelog\""));

        let parsed: Vec<IndexEntry> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, entries);
        assert_eq!(meta.size_bytes, raw.len());
        assert_eq!(meta.sha256.len(), 64);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn overwrite_replaces_prior_index() {
        let tmp = temp_dir();
        write_search_index(&tmp, "search-index.json", &[entry("Old", "/old")]).unwrap();
        let meta = write_search_index(&tmp, "search-index.json", &[]).unwrap();

        assert_eq!(std::fs::read_to_string(&meta.path).unwrap(), "[]\n");

        // No temp files should remain
        for dir_entry in std::fs::read_dir(&tmp).unwrap() {
            let name = dir_entry.unwrap().file_name().to_string_lossy().to_string();
            assert!(!name.starts_with('.'), "temp file left behind: {name}");
        }

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn identical_entries_produce_identical_hash() {
        let tmp = temp_dir();
        let entries = vec![entry("Intro", "/00-intro")];
        let first = write_search_index(&tmp, "a.json", &entries).unwrap();
        let second = write_search_index(&tmp, "b.json", &entries).unwrap();
        assert_eq!(first.sha256, second.sha256);

        let _ = std::fs::remove_dir_all(&tmp);
    }
}
