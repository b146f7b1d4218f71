//! Publishable article building.
//!
//! [`markdown_to_article`] converts a Markdown body and wraps the resulting
//! HTML together with the article metadata in the shape the publishing API
//! expects. Field names on [`Article`] are the API's wire names.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use crate::markdown::markdown_to_html;

/// Article type sent for every draft.
pub const ARTICLE_TYPE_NEWS: &str = "news";

/// A 0/1 comment setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CommentFlag {
    /// Serialized as `0`.
    #[default]
    Off,
    /// Serialized as `1`.
    On,
}

impl CommentFlag {
    /// Numeric wire value.
    pub fn as_u8(self) -> u8 {
        match self {
            CommentFlag::Off => 0,
            CommentFlag::On => 1,
        }
    }

    /// Parse a wire value; anything but 0 or 1 is rejected.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(CommentFlag::Off),
            1 => Some(CommentFlag::On),
            _ => None,
        }
    }
}

impl From<bool> for CommentFlag {
    fn from(on: bool) -> Self {
        if on { CommentFlag::On } else { CommentFlag::Off }
    }
}

impl Serialize for CommentFlag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}

impl<'de> Deserialize<'de> for CommentFlag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FlagVisitor;

        impl Visitor<'_> for FlagVisitor {
            type Value = CommentFlag;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("0 or 1")
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<CommentFlag, E> {
                u8::try_from(value)
                    .ok()
                    .and_then(CommentFlag::from_u8)
                    .ok_or_else(|| E::invalid_value(de::Unexpected::Unsigned(value), &self))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<CommentFlag, E> {
                u8::try_from(value)
                    .ok()
                    .and_then(CommentFlag::from_u8)
                    .ok_or_else(|| E::invalid_value(de::Unexpected::Signed(value), &self))
            }
        }

        deserializer.deserialize_u8(FlagVisitor)
    }
}

/// Title and metadata for one conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Article title.
    pub title: String,
    /// Author name.
    pub author: Option<String>,
    /// Short summary.
    pub digest: Option<String>,
    /// "Read more" link target.
    pub content_source_url: Option<String>,
    /// Media id of the cover image.
    pub thumb_media_id: Option<String>,
    /// Whether comments are open.
    pub need_open_comment: Option<CommentFlag>,
    /// Whether only followers may comment.
    pub only_fans_can_comment: Option<CommentFlag>,
}

impl ConvertOptions {
    /// Options with only a title set.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Set the author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set the digest.
    pub fn with_digest(mut self, digest: impl Into<String>) -> Self {
        self.digest = Some(digest.into());
        self
    }

    /// Set the source link.
    pub fn with_content_source_url(mut self, url: impl Into<String>) -> Self {
        self.content_source_url = Some(url.into());
        self
    }

    /// Set the cover media id.
    pub fn with_thumb_media_id(mut self, media_id: impl Into<String>) -> Self {
        self.thumb_media_id = Some(media_id.into());
        self
    }

    /// Set both comment flags.
    pub fn with_comments(mut self, open: CommentFlag, fans_only: CommentFlag) -> Self {
        self.need_open_comment = Some(open);
        self.only_fans_can_comment = Some(fans_only);
        self
    }
}

/// A converted article, ready for the publishing API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Always [`ARTICLE_TYPE_NEWS`].
    pub article_type: String,
    /// Article title.
    pub title: String,
    /// Author name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Short summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
    /// Sanitized HTML body.
    pub content: String,
    /// "Read more" link target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_source_url: Option<String>,
    /// Media id of the cover image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumb_media_id: Option<String>,
    /// Whether comments are open.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub need_open_comment: Option<CommentFlag>,
    /// Whether only followers may comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub only_fans_can_comment: Option<CommentFlag>,
}

/// Convert a Markdown body and attach the article metadata.
///
/// Empty optional strings are treated as absent. Conversion never fails;
/// title resolution is the caller's concern.
///
/// # Example
///
/// ```rust
/// use inkpost_content::{markdown_to_article, ConvertOptions};
///
/// let article = markdown_to_article("Hello **world**", &ConvertOptions::new("Greeting"));
/// assert_eq!(article.article_type, "news");
/// assert_eq!(article.content, "<p>Hello <strong>world</strong></p>");
/// assert!(article.author.is_none());
/// ```
pub fn markdown_to_article(markdown: &str, options: &ConvertOptions) -> Article {
    Article {
        article_type: ARTICLE_TYPE_NEWS.to_string(),
        title: options.title.clone(),
        author: non_empty(&options.author),
        digest: non_empty(&options.digest),
        content: markdown_to_html(markdown),
        content_source_url: non_empty(&options.content_source_url),
        thumb_media_id: non_empty(&options.thumb_media_id),
        need_open_comment: options.need_open_comment,
        only_fans_can_comment: options.only_fans_can_comment,
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|v| !v.is_empty()).map(str::to_string)
}
