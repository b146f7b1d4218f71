//! Line-anchored block rules: headings, blockquotes, list items.
//!
//! Each inline-transformed line is classified on its leading source text.
//! List items are buffered per kind and every maximal run of same-kind
//! items is collapsed into one [`Block::List`]; a blank line, any non-item
//! line, or an item of the other kind ends the run.

use std::sync::LazyLock;

use regex::Regex;

use super::inline::{render_escaped, render_raw, Inline};

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+").expect("Invalid heading regex"));

static QUOTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^>\s+").expect("Invalid blockquote regex"));

static UNORDERED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[*-]\s+").expect("Invalid unordered list regex"));

static ORDERED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s+").expect("Invalid ordered list regex"));

/// Kind of list a run of items belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// `* item` or `- item`
    Unordered,
    /// `1. item`
    Ordered,
}

impl ListKind {
    fn tag(self) -> &'static str {
        match self {
            ListKind::Unordered => "ul",
            ListKind::Ordered => "ol",
        }
    }
}

/// A classified line or group of lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// `#`..`######` heading.
    Heading {
        /// Heading level, 1 through 6.
        level: usize,
        /// Heading content.
        content: Vec<Inline>,
    },
    /// `> ` quoted line.
    Quote(Vec<Inline>),
    /// A run of list items of one kind.
    List {
        /// Ordered or unordered.
        kind: ListKind,
        /// One entry per item.
        items: Vec<Vec<Inline>>,
    },
    /// Any other non-blank line.
    Line(Vec<Inline>),
    /// Empty or whitespace-only line.
    Blank,
}

impl Block {
    /// Render a heading, quote, or list. Text content is escaped.
    ///
    /// [`Block::Line`] renders raw and [`Block::Blank`] renders empty; the
    /// paragraph pass decides what to do with those.
    pub fn to_html(&self) -> String {
        match self {
            Block::Heading { level, content } => {
                format!("<h{level}>{}</h{level}>", render_escaped(content))
            }
            Block::Quote(content) => {
                format!("<blockquote>{}</blockquote>", render_escaped(content))
            }
            Block::List { kind, items } => {
                let tag = kind.tag();
                let mut html = format!("<{tag}>");
                for item in items {
                    html.push_str("<li>");
                    html.push_str(&render_escaped(item));
                    html.push_str("</li>");
                }
                html.push_str(&format!("</{tag}>"));
                html
            }
            Block::Line(content) => render_raw(content),
            Block::Blank => String::new(),
        }
    }
}

enum Classified {
    Item(ListKind, Vec<Inline>),
    Block(Block),
}

/// Classify lines and group list runs.
pub fn transform(lines: Vec<Vec<Inline>>) -> Vec<Block> {
    let mut blocks = Vec::with_capacity(lines.len());
    let mut run: Option<ListKind> = None;
    let mut items: Vec<Vec<Inline>> = Vec::new();

    for line in lines {
        match classify(line) {
            Classified::Item(kind, content) => {
                if run.is_some_and(|current| current != kind) {
                    flush_run(&mut blocks, &mut run, &mut items);
                }
                run = Some(kind);
                items.push(content);
            }
            Classified::Block(block) => {
                flush_run(&mut blocks, &mut run, &mut items);
                blocks.push(block);
            }
        }
    }

    flush_run(&mut blocks, &mut run, &mut items);
    blocks
}

/// Close the open list run, draining every buffered item into it.
fn flush_run(blocks: &mut Vec<Block>, run: &mut Option<ListKind>, items: &mut Vec<Vec<Inline>>) {
    if let Some(kind) = run.take() {
        blocks.push(Block::List {
            kind,
            items: std::mem::take(items),
        });
    }
}

fn classify(segments: Vec<Inline>) -> Classified {
    if render_raw(&segments).trim().is_empty() {
        return Classified::Block(Block::Blank);
    }

    let leading = match segments.first() {
        Some(Inline::Text(text)) => text.as_str(),
        _ => return Classified::Block(Block::Line(segments)),
    };

    if let Some(caps) = HEADING_RE.captures(leading) {
        let level = caps.get(1).map_or(1, |m| m.as_str().len());
        let prefix = caps.get(0).map_or(0, |m| m.end());
        if let Some(content) = strip_prefix(&segments, prefix) {
            return Classified::Block(Block::Heading { level, content });
        }
    } else if let Some(prefix) = prefix_len(&QUOTE_RE, leading) {
        if let Some(content) = strip_prefix(&segments, prefix) {
            return Classified::Block(Block::Quote(content));
        }
    } else if let Some(prefix) = prefix_len(&UNORDERED_RE, leading) {
        if let Some(content) = strip_prefix(&segments, prefix) {
            return Classified::Item(ListKind::Unordered, content);
        }
    } else if let Some(prefix) = prefix_len(&ORDERED_RE, leading) {
        if let Some(content) = strip_prefix(&segments, prefix) {
            return Classified::Item(ListKind::Ordered, content);
        }
    }

    Classified::Block(Block::Line(segments))
}

fn prefix_len(re: &Regex, text: &str) -> Option<usize> {
    re.find(text).map(|m| m.end())
}

/// Drop `prefix` bytes from the leading text segment.
///
/// Returns `None` when nothing but the marker is left, since a marker with
/// no content is not a block.
fn strip_prefix(segments: &[Inline], prefix: usize) -> Option<Vec<Inline>> {
    let (first, rest) = segments.split_first()?;
    let Inline::Text(text) = first else {
        return None;
    };

    let mut content = Vec::with_capacity(segments.len());
    let remainder = &text[prefix..];
    if !remainder.is_empty() {
        content.push(Inline::Text(remainder.to_string()));
    }
    content.extend(rest.iter().cloned());

    if content.is_empty() {
        None
    } else {
        Some(content)
    }
}
