//! Markdown to restricted-HTML conversion.
//!
//! The converter handles a deliberately small Markdown subset and emits only
//! the elements the publishing platform accepts: `h1`..`h6`, `p`, `br`,
//! `blockquote`, `ul`, `ol`, `li`, `strong`, `em`, `code`, `pre`, `a`, `img`.
//!
//! - [`frontmatter`]: `---` delimited key/value metadata
//! - [`escape`]: HTML escaping
//! - [`protect`]: fenced code block protection and restoration
//! - [`inline`]: images, links, inline code, emphasis
//! - [`block`]: headings, blockquotes, list runs
//! - [`paragraph`]: paragraph assembly
//! - [`sanitize`]: denylisted tag and `class` attribute removal
//!
//! # Pipeline
//!
//! ```text
//! body ─▶ protect ─▶ inline ─▶ block ─▶ paragraph ─▶ restore ─▶ sanitize
//! ```
//!
//! Each stage is a pure function, so conversions can run concurrently.
//!
//! # Example
//!
//! ```rust
//! use inkpost_content::markdown::{extract_frontmatter, markdown_to_html};
//!
//! let doc = "---\ntitle: Hello\n---\n- one\n- two";
//! let fm = extract_frontmatter(doc);
//!
//! assert_eq!(fm.title(), Some("Hello"));
//! assert_eq!(markdown_to_html(fm.body()), "<ul><li>one</li><li>two</li></ul>");
//! ```

pub mod block;
pub mod convert;
pub mod escape;
pub mod frontmatter;
pub mod inline;
pub mod paragraph;
pub mod protect;
pub mod sanitize;

// Re-export key types and functions
pub use block::{Block, ListKind};
pub use convert::markdown_to_html;
pub use escape::escape_html;
pub use frontmatter::{extract_frontmatter, FrontmatterResult};
pub use inline::Inline;
pub use protect::{protect_code_blocks, restore_code_blocks, CodeLedger, Protected};
pub use sanitize::sanitize;
