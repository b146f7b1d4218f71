//! Markdown conversion and article building.
//!
//! This crate turns a small Markdown subset into the restricted HTML dialect
//! accepted by the publishing API, and packages the result as an
//! [`Article`]. Everything here is synchronous and free of shared state.
//!
//! # Modules
//!
//! - [`markdown`]: the conversion pipeline and frontmatter extraction
//! - [`article`]: conversion options and the publishable article
//!
//! # Example
//!
//! ```rust
//! use inkpost_content::{extract_frontmatter, markdown_to_article, ConvertOptions};
//!
//! let doc = "---\ntitle: Hello\nauthor: Ann\n---\n# Hello\n\nFirst post.";
//! let fm = extract_frontmatter(doc);
//!
//! let mut options = ConvertOptions::new(fm.title().unwrap_or("Untitled"));
//! options.author = fm.author().map(str::to_string);
//!
//! let article = markdown_to_article(fm.body(), &options);
//! assert_eq!(article.content, "<h1>Hello</h1><p>First post.</p>");
//! assert_eq!(article.author.as_deref(), Some("Ann"));
//! ```

#![forbid(unsafe_code)]

pub mod article;
pub mod markdown;

// Re-export commonly used types
pub use article::{markdown_to_article, Article, CommentFlag, ConvertOptions, ARTICLE_TYPE_NEWS};
pub use markdown::{
    escape_html, extract_frontmatter, markdown_to_html, sanitize, FrontmatterResult,
};
