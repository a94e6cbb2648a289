//! Shared types, error model, and configuration for docindex.
//!
//! This crate is the foundation depended on by all other docindex crates.
//! It provides:
//! - [`DocIndexError`]: the unified error type
//! - Domain types ([`ContentDocument`], [`RouteMap`], [`IndexEntry`])
//! - Configuration ([`AppConfig`], [`PipelineConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CONFIG_FILE_NAME, IndexConfig, PathsConfig, PipelineConfig, init_config,
    load_config, load_config_from,
};
pub use error::{DocIndexError, Result};
pub use types::{
    CONTENT_EXTENSION, ContentDocument, DEFAULT_TITLE, IndexEntry, MAX_CONTENT_CHARS,
    ROOT_SECTION, RouteMap, normalize_content_path,
};
