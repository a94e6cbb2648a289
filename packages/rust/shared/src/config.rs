//! Application configuration for docindex.
//!
//! Project config lives at `<project root>/docindex.toml` and is optional.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DocIndexError, Result};

/// Default configuration file name, looked up in the project root.
pub const CONFIG_FILE_NAME: &str = "docindex.toml";

// ---------------------------------------------------------------------------
// Config structs (matching docindex.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory layout, relative to the project root.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Index builder settings.
    #[serde(default)]
    pub index: IndexConfig,
}

/// `[paths]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Content store directory.
    #[serde(default = "default_content_dir")]
    pub content_dir: String,

    /// Application page tree scanned for `page.tsx` files.
    #[serde(default = "default_app_dir")]
    pub app_dir: String,

    /// Publicly served output directory.
    #[serde(default = "default_public_dir")]
    pub public_dir: String,

    /// Search index file name inside `public_dir`.
    #[serde(default = "default_index_file")]
    pub index_file: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            content_dir: default_content_dir(),
            app_dir: default_app_dir(),
            public_dir: default_public_dir(),
            index_file: default_index_file(),
        }
    }
}

fn default_content_dir() -> String {
    "src/content".into()
}
fn default_app_dir() -> String {
    "src/app".into()
}
fn default_public_dir() -> String {
    "public".into()
}
fn default_index_file() -> String {
    "search-index.json".into()
}

/// `[index]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Maximum number of documents read and normalized concurrently.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
        }
    }
}

fn default_concurrency() -> usize {
    8
}

// ---------------------------------------------------------------------------
// Pipeline config (runtime, resolved against the project root)
// ---------------------------------------------------------------------------

/// Runtime configuration handed to every pipeline component.
///
/// All paths are absolute or relative to the process CWD; nothing below this
/// struct consults the current directory on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Where the well-known source documents (README, schemas...) live.
    pub project_root: PathBuf,
    /// Content store root.
    pub content_dir: PathBuf,
    /// Page tree root.
    pub app_dir: PathBuf,
    /// Public output directory.
    pub public_dir: PathBuf,
    /// Search index file name inside `public_dir`.
    pub index_file: String,
    /// Worker pool size for the index builder.
    pub concurrency: usize,
}

impl PipelineConfig {
    /// Resolve an [`AppConfig`] against `project_root`.
    pub fn from_app_config(project_root: impl Into<PathBuf>, config: &AppConfig) -> Result<Self> {
        let project_root = project_root.into();

        if config.index.concurrency == 0 {
            return Err(DocIndexError::config("index.concurrency must be at least 1"));
        }
        if config.paths.index_file.trim().is_empty() {
            return Err(DocIndexError::config("paths.index_file must not be empty"));
        }

        Ok(Self {
            content_dir: project_root.join(&config.paths.content_dir),
            app_dir: project_root.join(&config.paths.app_dir),
            public_dir: project_root.join(&config.paths.public_dir),
            index_file: config.paths.index_file.clone(),
            concurrency: config.index.concurrency,
            project_root,
        })
    }

    /// Default layout rooted at `project_root`.
    pub fn with_defaults(project_root: impl Into<PathBuf>) -> Self {
        let project_root = project_root.into();
        let paths = PathsConfig::default();
        Self {
            content_dir: project_root.join(paths.content_dir),
            app_dir: project_root.join(paths.app_dir),
            public_dir: project_root.join(paths.public_dir),
            index_file: paths.index_file,
            concurrency: default_concurrency(),
            project_root,
        }
    }

    /// Full path of the search index file.
    pub fn index_path(&self) -> PathBuf {
        self.public_dir.join(&self.index_file)
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load `docindex.toml` from the project root. Returns defaults if the file does not exist.
pub fn load_config(project_root: &Path) -> Result<AppConfig> {
    let path = project_root.join(CONFIG_FILE_NAME);

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| DocIndexError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| DocIndexError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Write a default `docindex.toml` into the project root.
/// Returns the path to the created file. An existing file is left untouched.
pub fn init_config(project_root: &Path) -> Result<PathBuf> {
    let path = project_root.join(CONFIG_FILE_NAME);
    if path.exists() {
        return Err(DocIndexError::config(format!(
            "{} already exists",
            path.display()
        )));
    }

    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| DocIndexError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| DocIndexError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
