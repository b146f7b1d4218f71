//! Paragraph assembly.
//!
//! Walks the block stream and wraps every run of plain-text lines in
//! `<p>…</p>`, joining the lines of one paragraph with `<br />`. A line is
//! structural when it is blank or when its transformed text starts with `<`:
//! author-written HTML, markup from the inline pass, or a code placeholder.
//! Structural lines and rendered blocks are emitted back to back; blank
//! lines only close the open paragraph and emit nothing.

use super::block::Block;
use super::inline::{render_raw, Inline};

const LINE_BREAK: &str = "<br />";

/// Flatten blocks into markup, forming paragraphs from plain-text lines.
///
/// # Example
///
/// ```rust
/// use inkpost_content::markdown::{block, inline, paragraph};
///
/// let lines = "# Title\n\nfirst\nsecond".split('\n').map(inline::transform_line).collect();
/// let html = paragraph::assemble(&block::transform(lines));
/// assert_eq!(html, "<h1>Title</h1><p>first<br />second</p>");
/// ```
pub fn assemble(blocks: &[Block]) -> String {
    let mut out = String::new();
    let mut paragraph: Vec<String> = Vec::new();

    for block in blocks {
        match block {
            Block::Line(segments) if !is_structural(segments) => {
                paragraph.push(render_raw(segments));
            }
            Block::Blank => close_paragraph(&mut out, &mut paragraph),
            other => {
                close_paragraph(&mut out, &mut paragraph);
                out.push_str(&other.to_html());
            }
        }
    }

    close_paragraph(&mut out, &mut paragraph);
    out
}

fn close_paragraph(out: &mut String, paragraph: &mut Vec<String>) {
    if paragraph.is_empty() {
        return;
    }
    out.push_str("<p>");
    out.push_str(&paragraph.join(LINE_BREAK));
    out.push_str("</p>");
    paragraph.clear();
}

/// Whether a line must pass through without paragraph wrapping.
fn is_structural(segments: &[Inline]) -> bool {
    for segment in segments {
        match segment {
            Inline::Text(text) => {
                let trimmed = text.trim_start();
                if trimmed.is_empty() {
                    continue;
                }
                return trimmed.starts_with('<');
            }
            Inline::Placeholder(_) => return true,
            Inline::Markup(markup) => return markup.trim_start().starts_with('<'),
        }
    }
    true
}
