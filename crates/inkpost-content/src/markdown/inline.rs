//! Inline rules: images, links, inline code, bold, italic.
//!
//! A line is turned into a sequence of [`Inline`] segments. Each rule runs
//! over the remaining [`Inline::Text`] segments only, so markup produced by
//! an earlier rule is never re-matched by a later one. Rule order:
//!
//! 1. Images, before links (`![a](b)` contains `[a](b)`)
//! 2. Links
//! 3. Inline code, before emphasis (code may hold `*` and `_`)
//! 4. Bold (`**`, `__`), before italic (`*`, `_`)
//!
//! Captured text is escaped; delimiters of generated markup are not.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::escape::escape_html;
use super::protect::PLACEHOLDER_RE;

/// One piece of a transformed line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    /// Source text not claimed by any inline rule.
    Text(String),
    /// Markup produced by an inline rule; inert for all later rules.
    Markup(String),
    /// A protected code block, by ledger index.
    Placeholder(usize),
}

impl Inline {
    /// Render with source text passed through verbatim.
    pub fn render_raw(&self, out: &mut String) {
        match self {
            Inline::Text(text) | Inline::Markup(text) => out.push_str(text),
            Inline::Placeholder(index) => out.push_str(&super::protect::placeholder(*index)),
        }
    }

    /// Render with source text escaped.
    pub fn render_escaped(&self, out: &mut String) {
        match self {
            Inline::Text(text) => out.push_str(&escape_html(text)),
            other => other.render_raw(out),
        }
    }
}

static IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").expect("Invalid image regex"));

static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("Invalid link regex"));

static CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`]+)`").expect("Invalid inline code regex"));

static BOLD_STAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("Invalid bold regex"));

static BOLD_UNDERSCORE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"__(.+?)__").expect("Invalid bold regex"));

// The opening marker must touch a non-space character, so a `* ` list
// bullet is never taken as an emphasis opener.
static ITALIC_STAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*(\S.*?)\*").expect("Invalid italic regex"));

static ITALIC_UNDERSCORE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_(\S.*?)_").expect("Invalid italic regex"));

fn capture<'t>(caps: &Captures<'t>, group: usize) -> &'t str {
    caps.get(group).map_or("", |m| m.as_str())
}

fn render_image(caps: &Captures<'_>) -> String {
    format!(
        r#"<img src="{}" alt="{}" />"#,
        escape_html(capture(caps, 2)),
        escape_html(capture(caps, 1))
    )
}

fn render_link(caps: &Captures<'_>) -> String {
    format!(
        r#"<a href="{}">{}</a>"#,
        escape_html(capture(caps, 2)),
        escape_html(capture(caps, 1))
    )
}

fn render_code(caps: &Captures<'_>) -> String {
    format!("<code>{}</code>", escape_html(capture(caps, 1)))
}

fn render_strong(caps: &Captures<'_>) -> String {
    format!("<strong>{}</strong>", escape_html(capture(caps, 1)))
}

fn render_em(caps: &Captures<'_>) -> String {
    format!("<em>{}</em>", escape_html(capture(caps, 1)))
}

type Render = fn(&Captures<'_>) -> String;

/// Rules in application order.
static RULES: LazyLock<[(&'static Regex, Render); 7]> = LazyLock::new(|| {
    [
        (&*IMAGE_RE, render_image as Render),
        (&*LINK_RE, render_link),
        (&*CODE_RE, render_code),
        (&*BOLD_STAR_RE, render_strong),
        (&*BOLD_UNDERSCORE_RE, render_strong),
        (&*ITALIC_STAR_RE, render_em),
        (&*ITALIC_UNDERSCORE_RE, render_em),
    ]
});

/// Apply every inline rule to one line.
///
/// # Example
///
/// ```rust
/// use inkpost_content::markdown::inline::{transform_line, Inline};
///
/// let segments = transform_line("Hello **world**");
/// assert_eq!(
///     segments,
///     vec![
///         Inline::Text("Hello ".to_string()),
///         Inline::Markup("<strong>world</strong>".to_string()),
///     ]
/// );
/// ```
pub fn transform_line(line: &str) -> Vec<Inline> {
    let mut segments = split_placeholders(line);
    for (re, render) in RULES.iter() {
        segments = apply_rule(segments, re, *render);
    }
    segments
}

/// Lift placeholder comments out first so no rule can look inside them.
fn split_placeholders(line: &str) -> Vec<Inline> {
    let mut segments = Vec::new();
    let mut last = 0;

    for caps in PLACEHOLDER_RE.captures_iter(line) {
        let (Some(whole), Some(index)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let Ok(index) = index.as_str().parse::<usize>() else {
            continue;
        };
        if whole.start() > last {
            segments.push(Inline::Text(line[last..whole.start()].to_string()));
        }
        segments.push(Inline::Placeholder(index));
        last = whole.end();
    }

    if last < line.len() || segments.is_empty() {
        segments.push(Inline::Text(line[last..].to_string()));
    }
    segments
}

fn apply_rule(segments: Vec<Inline>, re: &Regex, render: Render) -> Vec<Inline> {
    let mut out = Vec::with_capacity(segments.len());

    for segment in segments {
        let Inline::Text(text) = segment else {
            out.push(segment);
            continue;
        };

        let mut last = 0;
        for caps in re.captures_iter(&text) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            if whole.start() > last {
                out.push(Inline::Text(text[last..whole.start()].to_string()));
            }
            out.push(Inline::Markup(render(&caps)));
            last = whole.end();
        }

        if last == 0 {
            out.push(Inline::Text(text));
        } else if last < text.len() {
            out.push(Inline::Text(text[last..].to_string()));
        }
    }

    out
}

/// Render segments with text passed through verbatim.
pub fn render_raw(segments: &[Inline]) -> String {
    let mut out = String::new();
    for segment in segments {
        segment.render_raw(&mut out);
    }
    out
}

/// Render segments with text escaped.
pub fn render_escaped(segments: &[Inline]) -> String {
    let mut out = String::new();
    for segment in segments {
        segment.render_escaped(&mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn html(line: &str) -> String {
        render_raw(&transform_line(line))
    }

    // ------------------------------------------------------------------------
    // Images and links
    // ------------------------------------------------------------------------

    #[test]
    fn test_image() {
        assert_eq!(
            html("![alt](x.png)"),
            r#"<img src="x.png" alt="alt" />"#
        );
    }

    #[test]
    fn test_image_is_not_wrapped_in_link() {
        let out = html("see ![logo](logo.png) here");
        assert!(out.contains(r#"<img src="logo.png" alt="logo" />"#));
        assert!(!out.contains("<a href"));
    }

    #[test]
    fn test_image_with_empty_alt() {
        assert_eq!(html("![](a.png)"), r#"<img src="a.png" alt="" />"#);
    }

    #[test]
    fn test_link() {
        assert_eq!(
            html("[Rust](https://rust-lang.org)"),
            r#"<a href="https://rust-lang.org">Rust</a>"#
        );
    }

    #[test]
    fn test_link_attributes_are_escaped() {
        assert_eq!(
            html(r#"[a "b"](x?y=1&z=2)"#),
            r#"<a href="x?y=1&amp;z=2">a &quot;b&quot;</a>"#
        );
    }

    // ------------------------------------------------------------------------
    // Code and emphasis
    // ------------------------------------------------------------------------

    #[test]
    fn test_inline_code_is_escaped() {
        assert_eq!(html("`<script>`"), "<code>&lt;script&gt;</code>");
    }

    #[test]
    fn test_inline_code_shields_emphasis() {
        assert_eq!(html("`a*b*c`"), "<code>a*b*c</code>");
        assert_eq!(html("`__init__`"), "<code>__init__</code>");
    }

    #[test]
    fn test_bold_and_italic() {
        assert_eq!(html("**bold**"), "<strong>bold</strong>");
        assert_eq!(html("__bold__"), "<strong>bold</strong>");
        assert_eq!(html("*it*"), "<em>it</em>");
        assert_eq!(html("_it_"), "<em>it</em>");
    }

    #[test]
    fn test_bold_before_italic() {
        assert_eq!(
            html("**strong** and *em*"),
            "<strong>strong</strong> and <em>em</em>"
        );
    }

    #[test]
    fn test_bold_is_non_greedy() {
        assert_eq!(
            html("**a** b **c**"),
            "<strong>a</strong> b <strong>c</strong>"
        );
    }

    #[test]
    fn test_list_bullet_is_not_emphasis() {
        assert_eq!(html("* item with *em*"), "* item with <em>em</em>");
    }

    #[test]
    fn test_emphasis_content_is_escaped() {
        assert_eq!(html("**a & b**"), "<strong>a &amp; b</strong>");
    }

    #[test]
    fn test_markup_is_inert_for_later_rules() {
        // The underscores inside the generated href must not become <em>.
        assert_eq!(
            html("[x](a_b_c.html)"),
            r#"<a href="a_b_c.html">x</a>"#
        );
    }

    // ------------------------------------------------------------------------
    // Placeholders and plain text
    // ------------------------------------------------------------------------

    #[test]
    fn test_placeholder_is_lifted() {
        assert_eq!(
            transform_line("<!-- CODE-BLOCK-3 -->"),
            vec![Inline::Placeholder(3)]
        );
    }

    #[test]
    fn test_plain_text_is_untouched() {
        assert_eq!(
            transform_line("just text & more"),
            vec![Inline::Text("just text & more".to_string())]
        );
    }

    #[test]
    fn test_empty_line() {
        assert_eq!(transform_line(""), vec![Inline::Text(String::new())]);
    }

    #[test]
    fn test_render_escaped_only_touches_text() {
        let segments = transform_line("a < b **c**");
        assert_eq!(
            render_escaped(&segments),
            "a &lt; b <strong>c</strong>"
        );
    }
}
