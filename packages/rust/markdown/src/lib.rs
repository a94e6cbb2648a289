//! Content document parsing and plain-text extraction.
//!
//! Splits MDX/Markdown documents into frontmatter and body, renders new
//! documents for the content store, and flattens bodies into single-line,
//! search-safe plain text via a series of regex passes.

mod cleanup;
mod frontmatter;

use tracing::trace;

use docindex_shared::{ContentDocument, MAX_CONTENT_CHARS};

pub use frontmatter::Frontmatter;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// A raw document split into metadata and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDocument {
    /// Leading metadata block (empty when the document has none).
    pub frontmatter: Frontmatter,
    /// Everything after the metadata block.
    pub body: String,
}

impl ParsedDocument {
    /// Attach the store path to produce a [`ContentDocument`].
    pub fn into_content_document(self, path: impl Into<String>) -> ContentDocument {
        ContentDocument {
            path: path.into(),
            title: self.frontmatter.title().map(str::to_string),
            body: self.body,
        }
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Split a raw document into frontmatter and body.
pub fn parse_document(raw: &str) -> ParsedDocument {
    let (frontmatter, body) = frontmatter::split(raw);
    ParsedDocument { frontmatter, body }
}

/// Render a content store document: a `title` frontmatter block, then `body`.
pub fn render_document(title: &str, body: &str) -> String {
    frontmatter::render(&Frontmatter::with_title(title), body)
}

/// Flatten a document body into whitespace-collapsed plain text.
///
/// Code blocks, inline code, images and tags are dropped; links collapse to
/// their target; structural punctuation is removed. The result may be empty.
pub fn to_plain_text(body: &str) -> String {
    let plain = cleanup::run_pipeline(body);
    trace!(in_len = body.len(), out_len = plain.len(), "plain text extracted");
    plain
}

/// Hard cut to the first [`MAX_CONTENT_CHARS`] characters.
pub fn truncate_content(plain: &str) -> String {
    truncate_chars(plain, MAX_CONTENT_CHARS)
}

/// Hard cut to the first `max` characters; never splits a code point.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
