//! Handlers for the content subcommands.
//!
//! Each handler renders its output to a `String`; `main` does the printing.

use std::path::Path;

use anyhow::{Context, Result};
use inkpost::publish::{prepare_article, DraftRequest};
use inkpost_content::{extract_frontmatter, markdown_to_html};
use tokio::io::AsyncReadExt;

/// Input name that selects standard input.
pub const STDIN: &str = "-";

/// Read Markdown from a file, or from stdin when `input` is `-`.
pub async fn read_input(input: &str) -> Result<String> {
    if input == STDIN {
        let mut buffer = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buffer)
            .await
            .context("Failed to read Markdown from stdin")?;
        return Ok(buffer);
    }

    let path = Path::new(input);
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

/// Metadata supplied on the command line for `convert`.
#[derive(Debug, Clone, Default)]
pub struct ConvertArgs {
    /// Title override.
    pub title: Option<String>,
    /// Author override.
    pub author: Option<String>,
    /// Digest override.
    pub digest: Option<String>,
    /// Emit article JSON instead of HTML.
    pub json: bool,
}

/// Convert Markdown into HTML, or into the article JSON with `--json`.
///
/// Frontmatter is stripped in both modes. Only the JSON mode needs a title.
pub fn render_convert(markdown: &str, args: &ConvertArgs) -> Result<String> {
    if !args.json {
        let frontmatter = extract_frontmatter(markdown);
        return Ok(markdown_to_html(frontmatter.body()));
    }

    let request = DraftRequest {
        title: args.title.clone(),
        author: args.author.clone(),
        digest: args.digest.clone(),
        ..DraftRequest::new(markdown)
    };
    let article = prepare_article(&request)?;
    log::debug!("Prepared article {:?}", article.title);
    Ok(serde_json::to_string_pretty(&article)?)
}

/// Render a document's frontmatter fields as a JSON object.
///
/// A document without frontmatter renders as `{}`.
pub fn render_frontmatter(markdown: &str) -> Result<String> {
    let frontmatter = extract_frontmatter(markdown);
    if !frontmatter.has_frontmatter() {
        log::debug!("No frontmatter block found");
    }
    Ok(serde_json::to_string_pretty(frontmatter.fields())?)
}
