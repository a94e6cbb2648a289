//! Plain-text extraction pipeline for Markdown/MDX bodies.
//!
//! Each pass is a function `&str -> String` applied in sequence over the whole
//! text. Removed constructs leave a space behind so adjacent words never fuse;
//! the final pass collapses those spaces.

use std::sync::LazyLock;

use regex::Regex;

/// Run the full plain-text pipeline on a document body.
pub(crate) fn run_pipeline(body: &str) -> String {
    let mut result = strip_fenced_code(body);

    result = strip_inline_code(&result);
    result = strip_images(&result);
    result = unwrap_links(&result);
    result = strip_tags(&result);
    result = strip_structural_punctuation(&result);
    result = collapse_whitespace(&result);

    result
}

// ---------------------------------------------------------------------------
// Pass 1: Fenced code blocks
// ---------------------------------------------------------------------------

/// Drop ```` ``` ```` fenced regions, delimiters included.
fn strip_fenced_code(text: &str) -> String {
    static FENCE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?s)```.*?```").expect("valid regex"));

    FENCE_RE.replace_all(text, " ").into_owned()
}

// ---------------------------------------------------------------------------
// Pass 2: Inline code spans
// ---------------------------------------------------------------------------

fn strip_inline_code(text: &str) -> String {
    static INLINE_CODE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"`[^`]*`").expect("valid regex"));

    INLINE_CODE_RE.replace_all(text, " ").into_owned()
}

// ---------------------------------------------------------------------------
// Pass 3: Images
// ---------------------------------------------------------------------------

/// Drop `![alt](target)` entirely, alt text included.
fn strip_images(text: &str) -> String {
    static IMAGE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"!\[[^\]]*\]\([^)]*\)").expect("valid regex"));

    IMAGE_RE.replace_all(text, " ").into_owned()
}

// ---------------------------------------------------------------------------
// Pass 4: Links
// ---------------------------------------------------------------------------

/// Replace `[label](target)` with `target`; the URL stays searchable.
fn unwrap_links(text: &str) -> String {
    static LINK_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\[[^\]]*\]\(([^)]+)\)").expect("valid regex"));

    LINK_RE.replace_all(text, "$1").into_owned()
}

// ---------------------------------------------------------------------------
// Pass 5: Markup tags
// ---------------------------------------------------------------------------

/// Remove anything between angle brackets (HTML and JSX tags alike).
fn strip_tags(text: &str) -> String {
    static TAG_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));

    TAG_RE.replace_all(text, " ").into_owned()
}

// ---------------------------------------------------------------------------
// Pass 6: Structural punctuation
// ---------------------------------------------------------------------------

/// Heading, blockquote, emphasis, list, rule and stray backtick markers.
fn strip_structural_punctuation(text: &str) -> String {
    static PUNCT_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"[#>*_\-~`]").expect("valid regex"));

    PUNCT_RE.replace_all(text, " ").into_owned()
}

// ---------------------------------------------------------------------------
// Pass 7: Whitespace
// ---------------------------------------------------------------------------

fn collapse_whitespace(text: &str) -> String {
    static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

    WS_RE.replace_all(text, " ").trim().to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
