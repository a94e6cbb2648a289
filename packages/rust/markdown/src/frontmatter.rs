//! Minimal YAML-style frontmatter reader/writer.
//!
//! Only flat `key: value` pairs are understood; that is all the content store
//! ever contains. Values may be bare, double-quoted or single-quoted.

use std::collections::BTreeMap;

use tracing::debug;

const DELIMITER: &str = "---";

/// Key-value metadata block at the top of a content document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter {
    fields: BTreeMap<String, String>,
}

impl Frontmatter {
    /// Frontmatter with only a title.
    pub fn with_title(title: impl Into<String>) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert("title".to_string(), title.into());
        Self { fields }
    }

    /// Non-empty `title` value, if present.
    pub fn title(&self) -> Option<&str> {
        self.get("title").filter(|t| !t.is_empty())
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Split `raw` into frontmatter and body.
///
/// A document without a leading `---` line has empty frontmatter and the whole
/// text as body. A block that is opened but never closed runs to the end of
/// the document and leaves an empty body.
pub(crate) fn split(raw: &str) -> (Frontmatter, String) {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);

    let Some(rest) = strip_delimiter_line(raw) else {
        return (Frontmatter::default(), raw.to_string());
    };

    let mut fields = BTreeMap::new();
    let mut offset = 0;

    for line in rest.split_inclusive('\n') {
        offset += line.len();
        let trimmed = line.trim_end_matches(['\n', '\r']);

        if trimmed == DELIMITER {
            return (Frontmatter { fields }, rest[offset..].to_string());
        }

        if let Some((key, value)) = parse_pair(trimmed) {
            fields.insert(key, value);
        }
    }

    debug!(fields = fields.len(), "frontmatter block never closed, body is empty");
    (Frontmatter { fields }, String::new())
}

/// Render frontmatter + body. The output always ends with a newline.
pub(crate) fn render(frontmatter: &Frontmatter, body: &str) -> String {
    let mut out = String::from("---\n");
    for (key, value) in &frontmatter.fields {
        out.push_str(&format!("{key}: \"{}\"\n", escape_yaml_string(value)));
    }
    out.push_str("---\n");
    out.push_str(body);
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

/// Return the text after an opening `---` line, if `raw` starts with one.
fn strip_delimiter_line(raw: &str) -> Option<&str> {
    let rest = raw.strip_prefix(DELIMITER)?;
    rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n'))
}

fn parse_pair(line: &str) -> Option<(String, String)> {
    if line.trim_start().starts_with('#') {
        return None;
    }
    let (key, value) = line.split_once(':')?;
    let key = key.trim();
    if key.is_empty() || key.contains(char::is_whitespace) {
        return None;
    }
    Some((key.to_string(), unquote(value.trim())))
}

fn unquote(value: &str) -> String {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        return unescape_yaml_string(&value[1..value.len() - 1]);
    }
    if value.len() >= 2 && value.starts_with('\'') && value.ends_with('\'') {
        return value[1..value.len() - 1].replace("''", "'");
    }
    value.to_string()
}

/// Escape special characters in a YAML double-quoted value.
fn escape_yaml_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn unescape_yaml_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_without_frontmatter() {
        let (fm, body) = split("# Hello\n\nWorld");
        assert!(fm.is_empty());
        assert_eq!(body, "# Hello\n\nWorld");
    }

    #[test]
    fn split_reads_quoted_and_bare_values() {
        let raw = "---\ntitle: \"API (OpenAPI)\"\nauthor: Ana\nslug: 'it''s'\n---\nBody\n";
        let (fm, body) = split(raw);
        assert_eq!(fm.title(), Some("API (OpenAPI)"));
        assert_eq!(fm.get("author"), Some("Ana"));
        assert_eq!(fm.get("slug"), Some("it's"));
        assert_eq!(body, "Body\n");
    }

    #[test]
    fn split_handles_crlf() {
        let (fm, body) = split("---\r\ntitle: Intro\r\n---\r\nText");
        assert_eq!(fm.title(), Some("Intro"));
        assert_eq!(body, "Text");
    }

    #[test]
    fn empty_title_is_absent() {
        let (fm, _) = split("---\ntitle: \"\"\n---\nx");
        assert_eq!(fm.title(), None);
    }

    #[test]
    fn unterminated_block_runs_to_end_of_document() {
        let (fm, body) = split("---\ntitle: Oops\nno closing");
        assert_eq!(fm.title(), Some("Oops"));
        assert_eq!(body, "");

        let (fm, body) = split("---\nJust some notes here\n");
        assert!(fm.is_empty());
        assert_eq!(body, "");
    }

    #[test]
    fn horizontal_rule_later_in_body_is_not_frontmatter() {
        let (fm, body) = split("Intro\n---\nMore");
        assert!(fm.is_empty());
        assert_eq!(body, "Intro\n---\nMore");
    }

    #[test]
    fn render_escapes_and_reads_back() {
        let fm = Frontmatter::with_title("Say \"hi\" \\ bye");
        let out = render(&fm, "Body");
        assert!(out.starts_with("---\ntitle: \"Say \\\"hi\\\" \\\\ bye\"\n---\n"));
        assert!(out.ends_with("Body\n"));

        let (parsed, body) = split(&out);
        assert_eq!(parsed.title(), Some("Say \"hi\" \\ bye"));
        assert_eq!(body, "Body\n");
    }
}
