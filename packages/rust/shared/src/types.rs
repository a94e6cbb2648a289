//! Core domain types for the docindex pipeline.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{DocIndexError, Result};

/// Hard cap on the `content` field of an index entry, in characters.
pub const MAX_CONTENT_CHARS: usize = 1200;

/// Section label used for entries whose route is `/`.
pub const ROOT_SECTION: &str = "inicio";

/// Title used when neither frontmatter nor filename provides one.
pub const DEFAULT_TITLE: &str = "Documento";

/// File extension (without dot) of documents in the content store.
pub const CONTENT_EXTENSION: &str = "mdx";

/// Normalize a content-relative path: forward slashes, no leading `./`.
pub fn normalize_content_path(path: &str) -> String {
    let slashed = path.replace('\\', "/");
    slashed
        .strip_prefix("./")
        .map(str::to_string)
        .unwrap_or(slashed)
}

// ---------------------------------------------------------------------------
// ContentDocument
// ---------------------------------------------------------------------------

/// A normalized unit of text in the content store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDocument {
    /// Path relative to the content store root (e.g. `20-api/index.mdx`).
    pub path: String,
    /// Frontmatter title, if any.
    pub title: Option<String>,
    /// Raw body, may contain markup.
    pub body: String,
}

impl ContentDocument {
    /// File name without directories or extension (`20-api/index.mdx` → `index`).
    pub fn file_stem(&self) -> Option<&str> {
        let name = self.path.rsplit('/').next()?;
        let stem = name
            .strip_suffix(CONTENT_EXTENSION)
            .and_then(|s| s.strip_suffix('.'))
            .unwrap_or(name);
        (!stem.is_empty()).then_some(stem)
    }
}

// ---------------------------------------------------------------------------
// RouteMap
// ---------------------------------------------------------------------------

/// Content-document identifier → public route path.
///
/// Keys are normalized content-relative paths, values always start with `/`.
/// Inserting an existing key replaces the previous route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteMap(BTreeMap<String, String>);

impl RouteMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a binding, returning the route it replaced.
    pub fn insert(&mut self, content_path: &str, route: impl Into<String>) -> Result<Option<String>> {
        let route = route.into();
        if !route.starts_with('/') {
            return Err(DocIndexError::validation(format!(
                "route `{route}` must start with `/`"
            )));
        }
        let key = normalize_content_path(content_path);
        if key.is_empty() {
            return Err(DocIndexError::validation("content path must not be empty"));
        }
        Ok(self.0.insert(key, route))
    }

    /// Exact lookup by content-relative path.
    pub fn get(&self, content_path: &str) -> Option<&str> {
        self.0.get(content_path).map(String::as_str)
    }

    /// Look up a stored document, also accepting bindings written without the
    /// content extension (`20-api/index` for `20-api/index.mdx`).
    pub fn route_for_document(&self, document_path: &str) -> Option<&str> {
        let normalized = normalize_content_path(document_path);
        self.get(&normalized).or_else(|| {
            normalized
                .strip_suffix(CONTENT_EXTENSION)
                .and_then(|s| s.strip_suffix('.'))
                .and_then(|stem| self.get(stem))
        })
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ---------------------------------------------------------------------------
// IndexEntry
// ---------------------------------------------------------------------------

/// One record of `search-index.json`, the contract with the search widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Display title.
    pub title: String,
    /// Canonical route (`/` or `/a/b`, never a trailing slash).
    pub href: String,
    /// Plain text, at most [`MAX_CONTENT_CHARS`] characters.
    pub content: String,
    /// First segment of `href`, or [`ROOT_SECTION`].
    pub section: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_content_path_slashes() {
        assert_eq!(normalize_content_path("20-api\\index.mdx"), "20-api/index.mdx");
        assert_eq!(normalize_content_path("./intro"), "intro");
        assert_eq!(normalize_content_path("Guides/Setup"), "Guides/Setup");
    }

    #[test]
    fn route_map_rejects_relative_routes() {
        let mut map = RouteMap::new();
        let err = map.insert("intro", "docs").unwrap_err();
        assert!(err.to_string().contains("must start with `/`"));
        assert!(map.is_empty());
    }

    #[test]
    fn route_map_last_writer_wins() {
        let mut map = RouteMap::new();
        assert_eq!(map.insert("intro", "/").unwrap(), None);
        assert_eq!(map.insert("intro", "/welcome").unwrap(), Some("/".into()));
        assert_eq!(map.get("intro"), Some("/welcome"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn route_for_document_accepts_extensionless_binding() {
        let mut map = RouteMap::new();
        map.insert("20-api/index", "/docs/api").unwrap();
        map.insert("99-changelog.mdx", "/changelog").unwrap();

        assert_eq!(map.route_for_document("20-api/index.mdx"), Some("/docs/api"));
        assert_eq!(map.route_for_document("99-changelog.mdx"), Some("/changelog"));
        assert_eq!(map.route_for_document("00-intro.mdx"), None);
    }

    #[test]
    fn route_map_serializes_as_object() {
        let mut map = RouteMap::new();
        map.insert("intro", "/").unwrap();
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"intro":"/"}"#);
    }

    #[test]
    fn file_stem_strips_directories_and_extension() {
        let doc = ContentDocument {
            path: "20-api/graphql.mdx".into(),
            title: None,
            body: String::new(),
        };
        assert_eq!(doc.file_stem(), Some("graphql"));

        let odd = ContentDocument {
            path: "notes/.mdx".into(),
            title: None,
            body: String::new(),
        };
        assert_eq!(odd.file_stem(), None);
    }

    #[test]
    fn index_entry_field_names() {
        let entry = IndexEntry {
            title: "Changelog".into(),
            href: "/99-changelog".into(),
            content: "v1".into(),
            section: "99-changelog".into(),
        };
        let value = serde_json::to_value(&entry).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 4);
        for key in ["title", "href", "content", "section"] {
            assert!(obj[key].is_string(), "{key} should be a string");
        }
    }
}
