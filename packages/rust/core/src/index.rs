//! Search index builder.
//!
//! Turns every document of the content store into at most one [`IndexEntry`]:
//! the body is flattened to plain text, the document is linked to its page via
//! the [`RouteMap`] (or a path-derived fallback route) and classified into a
//! navigation section.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use tokio::sync::Semaphore;
use tracing::{debug, info, instrument};

use docindex_markdown::{to_plain_text, truncate_content};
use docindex_shared::{
    CONTENT_EXTENSION, ContentDocument, DEFAULT_TITLE, DocIndexError, IndexEntry, ROOT_SECTION,
    Result, RouteMap,
};
use docindex_storage::{ContentStore, read_content_document};

/// Result of an index build.
#[derive(Debug, Clone, Default)]
pub struct IndexBuild {
    /// Entries ordered by content-store path.
    pub entries: Vec<IndexEntry>,
    /// Documents found in the store.
    pub documents_scanned: usize,
    /// Documents whose plain text was empty.
    pub skipped_empty: usize,
}

/// Build index entries for every document in `store`.
///
/// Documents are read and normalized on up to `concurrency` tasks at once. Any
/// read or parse failure aborts the build.
#[instrument(skip_all, fields(root = %store.root().display(), routes = routes.len()))]
pub async fn build_search_index(
    store: &ContentStore,
    routes: &RouteMap,
    concurrency: usize,
) -> Result<IndexBuild> {
    let documents = store.list_documents()?;
    let documents_scanned = documents.len();

    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let routes = Arc::new(routes.clone());
    let mut handles = Vec::with_capacity(documents.len());

    for doc in documents {
        let sem = semaphore.clone();
        let routes = routes.clone();

        handles.push(tokio::spawn(async move {
            let _permit = sem
                .acquire_owned()
                .await
                .map_err(|e| DocIndexError::Task(e.to_string()))?;

            let content = read_content_document(&doc).await?;
            Ok::<_, DocIndexError>(build_entry(&content, &routes))
        }));
    }

    let mut entries = Vec::with_capacity(handles.len());
    let mut paired = Vec::with_capacity(handles.len());
    let mut skipped_empty = 0usize;

    for handle in handles {
        let outcome = handle
            .await
            .map_err(|e| DocIndexError::Task(e.to_string()))??;
        match outcome {
            Some(pair) => paired.push(pair),
            None => skipped_empty += 1,
        }
    }

    paired.sort_by(|a, b| a.0.cmp(&b.0));
    entries.extend(paired.into_iter().map(|(_, entry)| entry));

    info!(
        documents = documents_scanned,
        entries = entries.len(),
        skipped_empty,
        "search index built"
    );

    Ok(IndexBuild {
        entries,
        documents_scanned,
        skipped_empty,
    })
}

/// Build the entry for one document, keyed by its store path.
/// `None` when the body has no plain text left.
pub fn build_entry(doc: &ContentDocument, routes: &RouteMap) -> Option<(String, IndexEntry)> {
    let plain = to_plain_text(&doc.body);
    if plain.is_empty() {
        debug!(path = %doc.path, "document has no plain text, excluded from index");
        return None;
    }

    let route = routes
        .route_for_document(&doc.path)
        .map(str::to_string)
        .unwrap_or_else(|| fallback_route(&doc.path));
    let href = canonicalize_href(&route);
    let section = section_for(&href);

    let entry = IndexEntry {
        title: title_for(doc),
        href,
        content: truncate_content(&plain),
        section,
    };

    Some((doc.path.clone(), entry))
}

/// Route derived from the document's own store path.
///
/// `00-intro.mdx` → `/00-intro`, `20-api/index.mdx` → `/20-api/`, `index.mdx` → `/`.
pub fn fallback_route(doc_path: &str) -> String {
    let without_ext = doc_path
        .strip_suffix(CONTENT_EXTENSION)
        .and_then(|s| s.strip_suffix('.'))
        .unwrap_or(doc_path);

    let without_index = if without_ext == "index" {
        ""
    } else {
        without_ext
            .strip_suffix("index")
            .filter(|s| s.ends_with('/'))
            .unwrap_or(without_ext)
    };

    collapse_slashes(&format!("/{without_index}"))
}

/// Collapse repeated slashes and strip one trailing slash; empty becomes `/`.
pub fn canonicalize_href(route: &str) -> String {
    let collapsed = collapse_slashes(route);
    let trimmed = collapsed.strip_suffix('/').unwrap_or(&collapsed);

    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// First path segment of a canonical href, or [`ROOT_SECTION`] for `/`.
pub fn section_for(href: &str) -> String {
    if href == "/" {
        return ROOT_SECTION.to_string();
    }
    href.trim_start_matches('/')
        .split('/')
        .next()
        .unwrap_or(ROOT_SECTION)
        .to_string()
}

/// Frontmatter title, else file name without extension, else [`DEFAULT_TITLE`].
pub fn title_for(doc: &ContentDocument) -> String {
    doc.title
        .as_deref()
        .filter(|t| !t.is_empty())
        .or_else(|| doc.file_stem())
        .unwrap_or(DEFAULT_TITLE)
        .to_string()
}

fn collapse_slashes(path: &str) -> String {
    static SLASHES_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"/{2,}").expect("valid regex"));

    SLASHES_RE.replace_all(path, "/").into_owned()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use docindex_shared::MAX_CONTENT_CHARS;
    use std::path::PathBuf;

    fn doc(path: &str, title: Option<&str>, body: &str) -> ContentDocument {
        ContentDocument {
            path: path.into(),
            title: title.map(str::to_string),
            body: body.into(),
        }
    }

    #[test]
    fn fallback_route_derivation() {
        assert_eq!(fallback_route("00-intro.mdx"), "/00-intro");
        assert_eq!(fallback_route("20-api/index.mdx"), "/20-api/");
        assert_eq!(fallback_route("20-api/graphql.mdx"), "/20-api/graphql");
        assert_eq!(fallback_route("index.mdx"), "/");
        assert_eq!(fallback_route("guides//setup.mdx"), "/guides/setup");
        // Only a whole `index` segment is stripped.
        assert_eq!(fallback_route("reindex.mdx"), "/reindex");
    }

    #[test]
    fn canonicalize_href_rules() {
        assert_eq!(canonicalize_href("/"), "/");
        assert_eq!(canonicalize_href(""), "/");
        assert_eq!(canonicalize_href("//"), "/");
        assert_eq!(canonicalize_href("/20-api/"), "/20-api");
        assert_eq!(canonicalize_href("/docs//api///"), "/docs/api");
        assert_eq!(canonicalize_href("docs"), "/docs");
    }

    #[test]
    fn section_for_href() {
        assert_eq!(section_for("/"), ROOT_SECTION);
        assert_eq!(section_for("/00-intro"), "00-intro");
        assert_eq!(section_for("/docs/api"), "docs");
    }

    #[test]
    fn title_fallbacks() {
        assert_eq!(title_for(&doc("a/b.mdx", Some("Real"), "")), "Real");
        assert_eq!(title_for(&doc("a/b.mdx", None, "")), "b");
        assert_eq!(title_for(&doc("a/b.mdx", Some(""), "")), "b");
        assert_eq!(title_for(&doc("a/.mdx", None, "")), DEFAULT_TITLE);
    }

    #[test]
    fn readme_entry_uses_fallback_route() {
        let d = doc("00-intro.mdx", Some("Introducción"), "# Hello\n\nWorld\n");
        let (key, entry) = build_entry(&d, &RouteMap::new()).unwrap();
        assert_eq!(key, "00-intro.mdx");
        assert_eq!(
            entry,
            IndexEntry {
                title: "Introducción".into(),
                href: "/00-intro".into(),
                content: "Hello World".into(),
                section: "00-intro".into(),
            }
        );
    }

    #[test]
    fn route_map_wins_over_fallback() {
        let mut routes = RouteMap::new();
        routes.insert("20-api/index", "/docs/api").unwrap();
        routes.insert("intro.mdx", "/").unwrap();

        let (_, api) = build_entry(&doc("20-api/index.mdx", None, "API"), &routes).unwrap();
        assert_eq!(api.href, "/docs/api");
        assert_eq!(api.section, "docs");
        assert_eq!(api.title, "index");

        let (_, intro) = build_entry(&doc("intro.mdx", None, "Hi"), &routes).unwrap();
        assert_eq!(intro.href, "/");
        assert_eq!(intro.section, ROOT_SECTION);
    }

    #[test]
    fn empty_plain_text_is_skipped() {
        let d = doc("only-code.mdx", Some("Code"), "```\nlet x = 1;\n```\n");
        assert!(build_entry(&d, &RouteMap::new()).is_none());
    }

    #[test]
    fn content_is_truncated_prefix() {
        let body = "palabra ".repeat(400);
        let d = doc("long.mdx", None, &body);
        let (_, entry) = build_entry(&d, &RouteMap::new()).unwrap();

        let plain = to_plain_text(&body);
        assert_eq!(entry.content.chars().count(), MAX_CONTENT_CHARS);
        assert!(plain.starts_with(&entry.content));
    }

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("docindex-index-test-{}", uuid::Uuid::now_v7()))
    }

    #[tokio::test]
    async fn build_orders_by_path_and_counts_skips() {
        let tmp = temp_dir();
        let store = ContentStore::open(&tmp).unwrap();
        store.write_document("99-changelog.mdx", "---\ntitle: \"Changelog\"\n---\n## 1.0\n").await.unwrap();
        store.write_document("00-intro.mdx", "# Hello\n").await.unwrap();
        store.write_document("50-empty.mdx", "<br/>\n").await.unwrap();
        store.write_document("20-api/index.mdx", "API docs\n").await.unwrap();
        store.write_document("20-api/dup.mdx", "Dup\n").await.unwrap();

        let build = build_search_index(&store, &RouteMap::new(), 2).await.unwrap();
        assert_eq!(build.documents_scanned, 5);
        assert_eq!(build.skipped_empty, 1);

        let hrefs: Vec<&str> = build.entries.iter().map(|e| e.href.as_str()).collect();
        assert_eq!(hrefs, vec!["/00-intro", "/20-api/dup", "/20-api", "/99-changelog"]);

        for entry in &build.entries {
            assert!(entry.href == "/" || (entry.href.starts_with('/') && !entry.href.ends_with('/')));
            assert!(!entry.href.contains("//"));
        }

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn duplicate_hrefs_are_kept() {
        let tmp = temp_dir();
        let store = ContentStore::open(&tmp).unwrap();
        store.write_document("guide/index.mdx", "One\n").await.unwrap();
        store.write_document("guide.mdx", "Two\n").await.unwrap();

        let build = build_search_index(&store, &RouteMap::new(), 4).await.unwrap();
        assert_eq!(build.entries.len(), 2);
        assert!(build.entries.iter().all(|e| e.href == "/guide"));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn unreadable_document_aborts_build() {
        let tmp = temp_dir();
        let store = ContentStore::open(&tmp).unwrap();
        store.write_document("bad.mdx", "---\ntitle: open\n").await.unwrap();

        let err = build_search_index(&store, &RouteMap::new(), 1).await.unwrap_err();
        assert!(err.to_string().contains("bad.mdx"));

        let _ = std::fs::remove_dir_all(&tmp);
    }
}
