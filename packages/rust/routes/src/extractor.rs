//! Page-to-content binding extraction.
//!
//! A page binds to a content document by importing it through the content
//! alias. Extraction is purely syntactic: the page source is never parsed or
//! executed, so unusual import forms (dynamic imports, re-exports, aliases
//! other than `@/content/`) are not seen.

use std::sync::LazyLock;

use regex::Regex;

/// Finds the content document a page source file renders.
pub trait ContentBindingExtractor: Send + Sync {
    /// Return the imported content sub-path (relative to the content store),
    /// or `None` when the page binds no content document.
    fn extract(&self, source: &str) -> Option<String>;

    /// Human-readable extractor name for tracing.
    fn name(&self) -> &str;
}

/// Matches `from "@/content/<sub-path>"` with single or double quotes.
static CONTENT_IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"from\s+["']@/content/([^"']+)["']"#).expect("content import regex")
});

/// Regex-backed extractor for static `import … from "@/content/…"` statements.
///
/// Only the first matching import counts. An import whose sub-path is empty
/// once `./` prefixes are stripped binds nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportPatternExtractor;

impl ContentBindingExtractor for ImportPatternExtractor {
    fn extract(&self, source: &str) -> Option<String> {
        CONTENT_IMPORT_RE
            .captures(source)
            .map(|caps| caps[1].trim_start_matches("./").to_string())
            .filter(|sub_path| !sub_path.is_empty())
    }

    fn name(&self) -> &str {
        "import-pattern"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(source: &str) -> Option<String> {
        ImportPatternExtractor.extract(source)
    }

    #[test]
    fn double_quoted_import() {
        let src = "import Content from \"@/content/20-api/index.mdx\";\nexport default Content;";
        assert_eq!(extract(src).as_deref(), Some("20-api/index.mdx"));
    }

    #[test]
    fn single_quoted_import_without_extension() {
        let src = "import Intro from '@/content/intro'";
        assert_eq!(extract(src).as_deref(), Some("intro"));
    }

    #[test]
    fn multiline_import_clause() {
        let src = "import {\n  default as Doc,\n} from\n  '@/content/guides/setup.mdx'";
        assert_eq!(extract(src).as_deref(), Some("guides/setup.mdx"));
    }

    #[test]
    fn first_import_wins() {
        let src = "import A from '@/content/a.mdx'\nimport B from '@/content/b.mdx'";
        assert_eq!(extract(src).as_deref(), Some("a.mdx"));
    }

    #[test]
    fn leading_dot_slash_is_stripped() {
        let src = "import A from '@/content/./a.mdx'";
        assert_eq!(extract(src).as_deref(), Some("a.mdx"));
    }

    #[test]
    fn empty_sub_path_binds_nothing() {
        assert_eq!(extract("import X from '@/content/./'"), None);
        assert_eq!(extract("import X from \"@/content/././\""), None);
    }

    #[test]
    fn other_imports_are_ignored() {
        let src = "import Link from 'next/link'\nimport { nav } from '@/lib/nav'";
        assert_eq!(extract(src), None);
    }

    #[test]
    fn mismatched_quotes_do_not_panic() {
        assert_eq!(extract("import A from \"@/content/"), None);
    }
}
