//! Route resolution by static analysis of the application page tree.
//!
//! Every `page.tsx` under the page tree defines a public route derived from its
//! directory. When a page imports a content document through the content
//! alias, the document is reachable at that route; the resulting [`RouteMap`]
//! lets the index builder link entries to real pages instead of guessing.

mod extractor;

use std::path::Path;
use std::sync::LazyLock;

use globset::{Glob, GlobMatcher};
use tracing::{debug, info, instrument};
use walkdir::WalkDir;

use docindex_shared::{DocIndexError, Result, RouteMap, normalize_content_path};

pub use extractor::{ContentBindingExtractor, ImportPatternExtractor};

/// File name that defines a page in the application tree.
pub const PAGE_FILE: &str = "page.tsx";

static PAGE_MATCHER: LazyLock<GlobMatcher> = LazyLock::new(|| {
    Glob::new("**/page.tsx")
        .expect("valid page glob")
        .compile_matcher()
});

/// Derive the public route for a page file path relative to the tree root.
///
/// `page.tsx` → `/`, `docs/api/page.tsx` → `/docs/api`,
/// `guides/index/page.tsx` → `/guides`.
pub fn route_for_page(rel_path: &str) -> String {
    let rel = normalize_content_path(rel_path);
    if rel == PAGE_FILE {
        return "/".to_string();
    }

    let dir = rel
        .strip_suffix(PAGE_FILE)
        .and_then(|d| d.strip_suffix('/'))
        .unwrap_or(&rel);
    let dir = dir.strip_suffix("/index").unwrap_or(dir);

    format!("/{dir}")
}

// ---------------------------------------------------------------------------
// RouteResolver
// ---------------------------------------------------------------------------

/// Scans a page tree and records which content document each page renders.
pub struct RouteResolver {
    extractor: Box<dyn ContentBindingExtractor>,
}

impl RouteResolver {
    /// Resolver backed by [`ImportPatternExtractor`].
    pub fn new() -> Self {
        Self::with_extractor(Box::new(ImportPatternExtractor))
    }

    pub fn with_extractor(extractor: Box<dyn ContentBindingExtractor>) -> Self {
        Self { extractor }
    }

    /// Build the route map for the page tree rooted at `app_dir`.
    ///
    /// A missing tree yields an empty map. Pages are visited in file-name order;
    /// when two pages import the same document the later one wins.
    #[instrument(skip_all, fields(app_dir = %app_dir.display(), extractor = self.extractor.name()))]
    pub async fn resolve(&self, app_dir: &Path) -> Result<RouteMap> {
        let mut routes = RouteMap::new();

        if !app_dir.is_dir() {
            debug!("page tree not found, no routes to resolve");
            return Ok(routes);
        }

        let mut pages_scanned = 0usize;

        for entry in WalkDir::new(app_dir).sort_by_file_name() {
            let entry = entry.map_err(|e| walk_error(app_dir, e))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let relative = path.strip_prefix(app_dir).unwrap_or(path);
            let rel = normalize_content_path(&relative.to_string_lossy());
            if !PAGE_MATCHER.is_match(&rel) {
                continue;
            }
            pages_scanned += 1;

            let route = route_for_page(&rel);
            let source = tokio::fs::read_to_string(path)
                .await
                .map_err(|e| DocIndexError::io(path, e))?;

            let Some(content_path) = self.extractor.extract(&source) else {
                debug!(page = %rel, %route, "page has no content import, skipping");
                continue;
            };

            let content_path = normalize_content_path(&content_path);
            match routes.insert(&content_path, route.clone()) {
                Ok(Some(previous)) => {
                    debug!(content = %content_path, %previous, %route, "content bound by several pages, last one wins");
                }
                Ok(None) => debug!(content = %content_path, %route, "bound content to route"),
                Err(e) => debug!(page = %rel, error = %e, "unusable content binding, skipping"),
            }
        }

        info!(pages = pages_scanned, routes = routes.len(), "route map built");
        Ok(routes)
    }
}

impl Default for RouteResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve routes under `app_dir` with the default extractor.
pub async fn resolve_routes(app_dir: &Path) -> Result<RouteMap> {
    RouteResolver::new().resolve(app_dir).await
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
