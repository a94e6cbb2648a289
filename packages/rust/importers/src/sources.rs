//! The table of well-known source documents.

use std::fmt;

/// Content store sub-directory holding API reference documents.
pub(crate) const API_DIR: &str = "20-api";

/// Kind of well-known source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Readme,
    OpenApi,
    GraphQl,
    Changelog,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Readme => "readme",
            Self::OpenApi => "openapi",
            Self::GraphQl => "graphql",
            Self::Changelog => "changelog",
        };
        f.write_str(name)
    }
}

/// How a source file's text becomes a document body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyTemplate {
    /// Body is the file verbatim (Markdown sources).
    Verbatim,
    /// Raw schema text under a heading, inside a `<pre>` block.
    Preformatted { heading: &'static str },
}

impl BodyTemplate {
    pub fn apply(&self, raw: &str) -> String {
        match self {
            Self::Verbatim => raw.to_string(),
            Self::Preformatted { heading } => {
                format!("\n# {heading}\n\n<pre>\n{raw}\n</pre>\n")
            }
        }
    }
}

/// One well-known source: where to look, where to write, how to wrap it.
#[derive(Debug, Clone, Copy)]
pub struct DocumentSource {
    pub kind: SourceKind,
    /// File names in the project root, highest priority first.
    pub candidates: &'static [&'static str],
    /// Destination path inside the content store.
    pub target: &'static str,
    /// Frontmatter title of the written document.
    pub title: &'static str,
    pub template: BodyTemplate,
}

/// All importers, in run order. Target prefixes fix the default ordering of
/// the content store: intro first, API reference next, changelog last.
pub const SOURCES: &[DocumentSource] = &[
    DocumentSource {
        kind: SourceKind::Readme,
        candidates: &["README.md", "readme.md"],
        target: "00-intro.mdx",
        title: "Introducción",
        template: BodyTemplate::Verbatim,
    },
    DocumentSource {
        kind: SourceKind::OpenApi,
        candidates: &["openapi.yaml", "openapi.yml", "openapi.json"],
        target: "20-api/index.mdx",
        title: "API (OpenAPI)",
        template: BodyTemplate::Preformatted {
            heading: "Referencia OpenAPI",
        },
    },
    DocumentSource {
        kind: SourceKind::GraphQl,
        candidates: &["schema.graphql", "schema.gql"],
        target: "20-api/graphql.mdx",
        title: "API (GraphQL)",
        template: BodyTemplate::Preformatted {
            heading: "Esquema GraphQL",
        },
    },
    DocumentSource {
        kind: SourceKind::Changelog,
        candidates: &["CHANGELOG.md", "changelog.md"],
        target: "99-changelog.mdx",
        title: "Changelog",
        template: BodyTemplate::Verbatim,
    },
];
