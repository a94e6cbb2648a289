//! End-to-end pipelines: import → resolve routes → build index → write index.

use std::time::{Duration, Instant};

use tracing::{info, instrument};

use docindex_artifacts::{ArtifactMeta, write_search_index};
use docindex_importers::{ImportedDocument, import_all};
use docindex_routes::resolve_routes;
use docindex_shared::{PipelineConfig, Result, RouteMap};
use docindex_storage::ContentStore;

use crate::index::build_search_index;

/// Result of a pipeline run that wrote the search index.
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// Sources imported this run (empty for index-only runs).
    pub imported: Vec<ImportedDocument>,
    /// Number of content documents bound to a page.
    pub route_count: usize,
    /// Documents found in the content store.
    pub documents_scanned: usize,
    /// Entries written to the index.
    pub entry_count: usize,
    /// Documents left out because their plain text was empty.
    pub skipped_empty: usize,
    /// The written index file.
    pub artifact: ArtifactMeta,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called when the pipeline completes.
    fn done(&self, report: &BuildReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn done(&self, _report: &BuildReport) {}
}

/// Run the full pipeline.
///
/// 1. Import well-known sources into the content store
/// 2. Resolve the route map from the page tree (concurrently with 1)
/// 3. Build index entries from the complete content store
/// 4. Write `search-index.json`
#[instrument(skip_all, fields(root = %config.project_root.display()))]
pub async fn build(config: &PipelineConfig, progress: &dyn ProgressReporter) -> Result<BuildReport> {
    let start = Instant::now();
    let store = ContentStore::open(&config.content_dir)?;

    progress.phase("Importing sources and resolving routes");
    // Both must finish before indexing: the builder has to see imported documents.
    let (imported, routes) = tokio::try_join!(
        import_all(&config.project_root, &store),
        resolve_routes(&config.app_dir),
    )?;

    index_and_write(config, &store, &routes, imported, start, progress).await
}

/// Import well-known sources only.
#[instrument(skip_all, fields(root = %config.project_root.display()))]
pub async fn import(
    config: &PipelineConfig,
    progress: &dyn ProgressReporter,
) -> Result<Vec<ImportedDocument>> {
    let store = ContentStore::open(&config.content_dir)?;
    progress.phase("Importing sources");
    import_all(&config.project_root, &store).await
}

/// Resolve the route map without touching the content store.
pub async fn routes(config: &PipelineConfig) -> Result<RouteMap> {
    resolve_routes(&config.app_dir).await
}

/// Rebuild the index from the current content store, skipping importers.
#[instrument(skip_all, fields(root = %config.project_root.display()))]
pub async fn index(config: &PipelineConfig, progress: &dyn ProgressReporter) -> Result<BuildReport> {
    let start = Instant::now();
    let store = ContentStore::open(&config.content_dir)?;

    progress.phase("Resolving routes");
    let routes = resolve_routes(&config.app_dir).await?;

    index_and_write(config, &store, &routes, Vec::new(), start, progress).await
}

async fn index_and_write(
    config: &PipelineConfig,
    store: &ContentStore,
    routes: &RouteMap,
    imported: Vec<ImportedDocument>,
    start: Instant,
    progress: &dyn ProgressReporter,
) -> Result<BuildReport> {
    progress.phase("Building search index");
    let build = build_search_index(store, routes, config.concurrency).await?;

    progress.phase("Writing search index");
    let artifact = write_search_index(&config.public_dir, &config.index_file, &build.entries)?;

    let report = BuildReport {
        imported,
        route_count: routes.len(),
        documents_scanned: build.documents_scanned,
        entry_count: build.entries.len(),
        skipped_empty: build.skipped_empty,
        artifact,
        elapsed: start.elapsed(),
    };

    progress.done(&report);

    info!(
        imported = report.imported.len(),
        routes = report.route_count,
        entries = report.entry_count,
        elapsed_ms = report.elapsed.as_millis(),
        "pipeline complete"
    );

    Ok(report)
}
