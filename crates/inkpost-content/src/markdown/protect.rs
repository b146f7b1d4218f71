//! Fenced code block protection.
//!
//! Fenced blocks are lifted out of the document before any other rule runs,
//! rendered once, and replaced by an inert placeholder comment. Later passes
//! treat the placeholder as opaque markup; [`restore_code_blocks`] puts the
//! rendered blocks back by index at the very end.
//!
//! ```rust
//! use inkpost_content::markdown::{protect_code_blocks, restore_code_blocks};
//!
//! let protected = protect_code_blocks("```rust\nlet x = 1 < 2;\n```");
//! assert_eq!(protected.text, "<!-- CODE-BLOCK-0 -->");
//! assert_eq!(protected.ledger.len(), 1);
//!
//! let html = restore_code_blocks(&protected.text, &protected.ledger);
//! assert_eq!(html, "<pre><code>let x = 1 &lt; 2;\n</code></pre>");
//! ```

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::escape::escape_html;

/// Opening fence with optional language tag, lazily matched body, closing fence.
static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(\w+)?\n(.+?)```").expect("Invalid code fence regex"));

/// Placeholder comment left where a code block used to be.
pub(crate) static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<!-- CODE-BLOCK-(\d+) -->").expect("Invalid code placeholder regex")
});

/// Build the placeholder for ledger entry `index`.
pub fn placeholder(index: usize) -> String {
    format!("<!-- CODE-BLOCK-{index} -->")
}

/// Rendered code blocks in order of appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeLedger {
    entries: Vec<String>,
}

impl CodeLedger {
    /// Number of protected blocks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no block was protected.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rendered markup of block `index`.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    /// Iterate rendered blocks in document order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    fn push(&mut self, rendered: String) -> usize {
        self.entries.push(rendered);
        self.entries.len() - 1
    }
}

/// A document with its code blocks swapped out for placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Protected {
    /// Document text containing placeholders.
    pub text: String,
    /// Rendered code blocks, indexed by placeholder number.
    pub ledger: CodeLedger,
}

/// Replace every fenced code block with a placeholder.
///
/// The language tag is accepted and dropped. Block content is escaped and
/// wrapped in `<pre><code>…</code></pre>`; a trailing newline is added when
/// the content lacks one so the closing tags never share the last code line.
pub fn protect_code_blocks(markdown: &str) -> Protected {
    let mut ledger = CodeLedger::default();

    let text = FENCE_RE
        .replace_all(markdown, |caps: &Captures<'_>| {
            let code = caps.get(2).map_or("", |m| m.as_str());
            let index = ledger.push(render_code_block(code));
            placeholder(index)
        })
        .into_owned();

    if !ledger.is_empty() {
        log::debug!("Protected {} fenced code block(s)", ledger.len());
    }

    Protected { text, ledger }
}

fn render_code_block(code: &str) -> String {
    let mut body = escape_html(code);
    if !body.ends_with('\n') {
        body.push('\n');
    }
    format!("<pre><code>{body}</code></pre>")
}

/// Put rendered code blocks back in place of their placeholders.
///
/// Indices are explicit, so placeholder order does not matter. A placeholder
/// with no matching ledger entry is left as-is.
pub fn restore_code_blocks(html: &str, ledger: &CodeLedger) -> String {
    PLACEHOLDER_RE
        .replace_all(html, |caps: &Captures<'_>| {
            let whole = caps.get(0).map_or("", |m| m.as_str());
            caps.get(1)
                .and_then(|m| m.as_str().parse::<usize>().ok())
                .and_then(|index| ledger.get(index))
                .unwrap_or(whole)
                .to_string()
        })
        .into_owned()
}
