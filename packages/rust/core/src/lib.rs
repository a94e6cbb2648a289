//! Core pipeline orchestration and index construction for docindex.
//!
//! This crate ties together importing, route resolution, plain-text
//! extraction and index writing into end-to-end workflows (e.g. [`pipeline::build`]).

pub mod index;
pub mod pipeline;
