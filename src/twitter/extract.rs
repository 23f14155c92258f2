//! Assembles the text extracted from a post into a single document.

use crate::twitter::post::Post;
use clap::ValueEnum;
use itertools::Itertools;

/// What to extract from a post.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ExtractMode {
    /// The post's best-effort text.
    #[default]
    Text,

    /// The article's title and preview text.
    Article,

    /// The article's full body rendered as Markdown, or its title and
    /// preview if the body is unavailable.
    #[value(alias = "article_full")]
    ArticleFull,

    /// The post's text followed by the article's title and preview.
    All,
}

/// Extracts content from `post` according to `mode`.
///
/// The extracted parts are separated by blank lines. Empty parts are
/// skipped, and the document always ends with exactly one newline.
///
/// # Examples
///
/// ```
/// use xpost::twitter::extract::{extract, ExtractMode};
/// use xpost::twitter::post::PostResponse;
/// let body = r#"{"tweet": {"text": "hi", "article": {"title": "T", "preview_text": "P"}}}"#;
/// let post = PostResponse::parse(body).unwrap().into_post();
/// assert_eq!(extract(&post, ExtractMode::All), "hi\n\nT\n\nP\n");
/// ```
pub fn extract(post: &Post, mode: ExtractMode) -> String {
    let title = post.article().map(|a| a.title()).unwrap_or_default();
    let preview = post.article().map(|a| a.preview_text()).unwrap_or_default();

    let mut parts: Vec<String> = Vec::new();

    if matches!(mode, ExtractMode::Text | ExtractMode::All) {
        parts.push(post.best_text().to_string());
    }

    if mode == ExtractMode::ArticleFull {
        let markdown = post.article().map(|a| a.to_markdown()).unwrap_or_default();
        if markdown.is_empty() {
            if !title.is_empty() {
                parts.push(format!("# {title}"));
            }
            parts.push(preview.to_string());
        } else {
            parts.push(markdown);
        }
    }

    if matches!(mode, ExtractMode::Article | ExtractMode::All) {
        parts.push(title.to_string());
        parts.push(preview.to_string());
    }

    let document = parts.iter().filter(|part| !part.is_empty()).join("\n\n");
    format!("{}\n", document.trim_end())
}

/// The title of the post's article, if it has a non-empty one.
pub fn article_title(post: &Post) -> Option<&str> {
    post.article()
        .map(|article| article.title())
        .filter(|title| !title.is_empty())
}
