//! Output sanitization.
//!
//! Removes denylisted elements and `class` attributes from finished markup.
//! Paired elements are removed together with everything they enclose; lone
//! opening, self-closing, and stray closing tags are removed on their own.
//! Passes repeat until the markup stops changing, so nested or overlapping
//! leftovers (`<scr<script></script>ipt>`) cannot reassemble into a tag and
//! sanitizing sanitized output is a no-op.
//!
//! Escaped text such as `&lt;script&gt;` is not markup and is never touched.

use std::sync::LazyLock;

use regex::Regex;

/// Elements that never survive sanitization.
pub const DENYLIST: [&str; 8] = [
    "script", "style", "iframe", "form", "input", "button", "object", "embed",
];

struct TagPatterns {
    name: &'static str,
    paired: Regex,
    lone: Regex,
    closing: Regex,
}

impl TagPatterns {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            paired: Regex::new(&format!(r"(?is)<{name}\b[^>]*>.*?</{name}\s*>"))
                .expect("Invalid paired tag regex"),
            lone: Regex::new(&format!(r"(?i)<{name}\b[^>]*>")).expect("Invalid tag regex"),
            closing: Regex::new(&format!(r"(?i)</{name}\s*>"))
                .expect("Invalid closing tag regex"),
        }
    }

    fn strip(&self, html: &str) -> String {
        let pass = self.paired.replace_all(html, "");
        let pass = self.lone.replace_all(&pass, "");
        self.closing.replace_all(&pass, "").into_owned()
    }
}

static TAGS: LazyLock<Vec<TagPatterns>> =
    LazyLock::new(|| DENYLIST.into_iter().map(TagPatterns::new).collect());

static CLASS_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\s+class\s*=\s*(?:"[^"]*"|'[^']*')"#).expect("Invalid class attribute regex")
});

/// Strip denylisted elements and `class` attributes.
///
/// # Example
///
/// ```rust
/// use inkpost_content::markdown::sanitize;
///
/// let html = r#"<p class="lead">Hi</p><script>alert(1)</script>"#;
/// assert_eq!(sanitize(html), "<p>Hi</p>");
/// ```
pub fn sanitize(html: &str) -> String {
    let mut current = html.to_string();

    loop {
        let next = sanitize_pass(&current);
        if next == current {
            return next;
        }
        current = next;
    }
}

fn sanitize_pass(html: &str) -> String {
    let mut out = html.to_string();

    for tag in TAGS.iter() {
        let stripped = tag.strip(&out);
        if stripped.len() != out.len() {
            log::debug!("Removed denylisted <{}> markup", tag.name);
            out = stripped;
        }
    }

    CLASS_ATTR_RE.replace_all(&out, "").into_owned()
}
