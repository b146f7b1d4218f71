//! The full conversion pipeline.

use super::block;
use super::inline::transform_line;
use super::paragraph::assemble;
use super::protect::{protect_code_blocks, restore_code_blocks};
use super::sanitize::sanitize;

/// Convert a Markdown body to restricted HTML.
///
/// Stages run in a fixed order: protect code blocks, inline rules, block
/// rules, paragraph assembly, restore code blocks, sanitize. The input is
/// a body; split frontmatter off first with
/// [`extract_frontmatter`](super::extract_frontmatter).
///
/// # Example
///
/// ```rust
/// use inkpost_content::markdown::markdown_to_html;
///
/// assert_eq!(
///     markdown_to_html("# Title\n\nHello **world**"),
///     "<h1>Title</h1><p>Hello <strong>world</strong></p>"
/// );
/// ```
pub fn markdown_to_html(markdown: &str) -> String {
    let normalized = markdown.replace("\r\n", "\n");
    let protected = protect_code_blocks(&normalized);

    let lines = protected.text.split('\n').map(transform_line).collect();
    let blocks = block::transform(lines);
    let assembled = assemble(&blocks);

    let restored = restore_code_blocks(&assembled, &protected.ledger);
    sanitize(&restored)
}
