//! Flat key/value frontmatter extraction.
//!
//! Frontmatter is a metadata block at the very start of a document,
//! delimited by lines consisting solely of `---`:
//!
//! ```markdown
//! ---
//! title: My Article
//! author: Jane
//! digest: A short summary
//! ---
//!
//! # Body starts here
//! ```
//!
//! Each metadata line is split on its first colon; both sides are trimmed.
//! Lines without a colon are skipped. Values are never coerced: everything
//! is a string and callers interpret it. Unknown keys pass through.
//!
//! # Usage
//!
//! ```rust
//! use inkpost_content::markdown::extract_frontmatter;
//!
//! let content = "---\ntitle: Test\nurl: https://example.com\n---\nBody";
//! let result = extract_frontmatter(content);
//!
//! assert!(result.has_frontmatter());
//! assert_eq!(result.title(), Some("Test"));
//! assert_eq!(result.get("url"), Some("https://example.com"));
//! assert_eq!(result.body(), "Body");
//! ```

use std::collections::BTreeMap;

const DELIMITER: &str = "---";

/// Result of frontmatter extraction.
///
/// Holds the parsed fields (empty when no frontmatter was present) and the
/// body that follows the closing delimiter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontmatterResult<'a> {
    fields: BTreeMap<String, String>,
    body: &'a str,
    had_delimiters: bool,
}

impl<'a> FrontmatterResult<'a> {
    fn with_frontmatter(fields: BTreeMap<String, String>, body: &'a str) -> Self {
        Self {
            fields,
            body,
            had_delimiters: true,
        }
    }

    fn without_frontmatter(body: &'a str) -> Self {
        Self {
            fields: BTreeMap::new(),
            body,
            had_delimiters: false,
        }
    }

    /// Whether a complete, delimited frontmatter block was found.
    pub fn has_frontmatter(&self) -> bool {
        self.had_delimiters
    }

    /// All parsed fields.
    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    /// Look up a field by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// The `title` field.
    pub fn title(&self) -> Option<&str> {
        self.get("title")
    }

    /// The `author` field.
    pub fn author(&self) -> Option<&str> {
        self.get("author")
    }

    /// The `digest` field.
    pub fn digest(&self) -> Option<&str> {
        self.get("digest")
    }

    /// The `contentSourceUrl` field.
    pub fn content_source_url(&self) -> Option<&str> {
        self.get("contentSourceUrl")
    }

    /// The `thumbMediaId` field.
    pub fn thumb_media_id(&self) -> Option<&str> {
        self.get("thumbMediaId")
    }

    /// The document body (everything after the closing delimiter line).
    pub fn body(&self) -> &'a str {
        self.body
    }

    /// Split into the field map and the body.
    pub fn into_parts(self) -> (BTreeMap<String, String>, &'a str) {
        (self.fields, self.body)
    }
}

/// Split a leading frontmatter block from a document.
///
/// # Behavior
///
/// - First line is not exactly `---`: no frontmatter, body is the input
/// - Opening delimiter but no closing `---` line: no frontmatter (logged),
///   body is the input unchanged
/// - Otherwise: fields parsed from the lines in between, body is whatever
///   follows the closing delimiter line
///
/// # Example
///
/// ```rust
/// use inkpost_content::markdown::extract_frontmatter;
///
/// let result = extract_frontmatter("---\ntitle: Unclosed\n\nBody");
/// assert!(!result.has_frontmatter());
/// assert_eq!(result.body(), "---\ntitle: Unclosed\n\nBody");
/// ```
pub fn extract_frontmatter(content: &str) -> FrontmatterResult<'_> {
    let Some(after_opening) = strip_opening_delimiter(content) else {
        return FrontmatterResult::without_frontmatter(content);
    };

    let mut offset = 0;
    for line in after_opening.split_inclusive('\n') {
        if is_delimiter(line) {
            let block = &after_opening[..offset];
            let body = &after_opening[offset + line.len()..];
            return FrontmatterResult::with_frontmatter(parse_fields(block), body);
        }
        offset += line.len();
    }

    log::warn!("Frontmatter opening delimiter found but no closing delimiter");
    FrontmatterResult::without_frontmatter(content)
}

/// Return the document after its opening `---` line, if it has one.
fn strip_opening_delimiter(content: &str) -> Option<&str> {
    let first = content.split_inclusive('\n').next()?;
    if first.ends_with('\n') && is_delimiter(first) {
        Some(&content[first.len()..])
    } else {
        None
    }
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end_matches(['\n', '\r']) == DELIMITER
}

/// Parse `key: value` lines; the last occurrence of a key wins.
fn parse_fields(block: &str) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();

    for line in block.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        fields.insert(key.to_string(), value.trim().to_string());
    }

    fields
}

// ============================================================================
// Tests
// ============================================================================
