// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Posts, articles, and the content that can be pulled out of them.
//!
//! These types mirror the JSON returned by FxTwitter, but only the
//! fields xpost actually uses. Every field is optional: the API omits
//! fields freely and occasionally sends `null` or a value of the wrong
//! type instead. A missing or malformed field is treated as absent and
//! never stops us from extracting whatever else is there.

use crate::markdown::{self, Block};
use log::info;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// The top-level body of a post response.
#[derive(Debug, Default, Deserialize)]
pub struct PostResponse {
    #[serde(default, deserialize_with = "lenient")]
    tweet: Option<Post>,
}

impl PostResponse {
    /// Parses a raw response body.
    pub fn parse(body: &str) -> serde_json::Result<Self> {
        serde_json::from_str(body)
    }

    /// Interprets an already-parsed response body.
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }

    /// The post carried by the response.
    ///
    /// A response without a post yields an empty [`Post`], from which
    /// nothing can be extracted.
    pub fn into_post(self) -> Post {
        self.tweet.unwrap_or_default()
    }
}

/// A single post.
#[derive(Debug, Default, Deserialize)]
pub struct Post {
    #[serde(default, deserialize_with = "lenient_string")]
    id: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    url: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    text: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    raw_text: Option<RawText>,

    #[serde(default, deserialize_with = "lenient")]
    author: Option<Author>,

    #[serde(default, deserialize_with = "lenient")]
    article: Option<Article>,

    #[serde(default, deserialize_with = "lenient")]
    quote: Option<Box<Post>>,

    // Some responses wrap a quoted post in another `tweet` object.
    #[serde(default, deserialize_with = "lenient")]
    tweet: Option<Box<Post>>,
}

impl Post {
    /// The post's identifier.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// The canonical URL of the post.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// The handle of the post's author.
    pub fn handle(&self) -> Option<&str> {
        self.author.as_ref()?.screen_name.as_deref()
    }

    /// The rendered text of the post, with links expanded.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// The raw text of the post, often just a shortened link.
    pub fn raw_text(&self) -> Option<&str> {
        self.raw_text.as_ref()?.text.as_deref()
    }

    /// The long-form article attached to the post, if any.
    pub fn article(&self) -> Option<&Article> {
        self.article.as_ref()
    }

    /// The post quoted by this post, if any.
    pub fn quote(&self) -> Option<&Post> {
        self.quote.as_deref()
    }

    /// The best available text for the post.
    ///
    /// The rendered text is preferred over the raw text. Both are
    /// trimmed, and a post with neither has an empty best text.
    ///
    /// # Examples
    ///
    /// ```
    /// use xpost::twitter::post::PostResponse;
    /// let body = r#"{"tweet": {"text": "  ", "raw_text": {"text": " https://t.co/x "}}}"#;
    /// let post = PostResponse::parse(body).unwrap().into_post();
    /// assert_eq!(post.best_text(), "https://t.co/x");
    /// ```
    pub fn best_text(&self) -> &str {
        let text = self.text().unwrap_or_default().trim();
        if text.is_empty() {
            self.raw_text().unwrap_or_default().trim()
        } else {
            text
        }
    }

    /// Resolves the post whose content should actually be extracted.
    ///
    /// When this post has no article but quotes a post that does, the
    /// quoted post is used instead, so a "wrapper" post that merely links
    /// to an article still leads to the article. Quotes are followed at
    /// most one level deep.
    pub fn resolve(self) -> Resolved {
        if self.article.is_some() {
            return Resolved::original(self);
        }

        let Some(quote) = self.quote else {
            return Resolved::original(Post {
                quote: None,
                ..self
            });
        };

        if quote.article.is_some() {
            return Resolved::quoted(*quote);
        }

        match quote.tweet {
            Some(inner) if inner.article.is_some() => Resolved::quoted(*inner),
            tweet => Resolved::original(Post {
                quote: Some(Box::new(Post { tweet, ..*quote })),
                ..self
            }),
        }
    }
}

/// The post chosen by [`Post::resolve`].
#[derive(Debug)]
pub struct Resolved {
    post: Post,
    followed_quote: bool,
}

impl Resolved {
    fn original(post: Post) -> Self {
        Self {
            post,
            followed_quote: false,
        }
    }

    fn quoted(post: Post) -> Self {
        info!(
            "following quoted post {}",
            post.id().or(post.url()).unwrap_or("<unknown>")
        );
        Self {
            post,
            followed_quote: true,
        }
    }

    /// The post to extract content from.
    pub fn post(&self) -> &Post {
        &self.post
    }

    /// Consumes the resolution, returning the post to extract from.
    pub fn into_post(self) -> Post {
        self.post
    }

    /// True if the quoted post was substituted for the original.
    pub fn followed_quote(&self) -> bool {
        self.followed_quote
    }

    /// A short description of the quoted post that was followed, suitable
    /// for diagnostics: its identifier, or failing that its URL.
    pub fn followed(&self) -> Option<&str> {
        if !self.followed_quote {
            return None;
        }
        self.post
            .id()
            .filter(|id| !id.is_empty())
            .or(self.post.url().filter(|url| !url.is_empty()))
    }
}

/// Long-form content attached to a post.
#[derive(Debug, Default, Deserialize)]
pub struct Article {
    #[serde(default, deserialize_with = "lenient_string")]
    title: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    preview_text: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    content: Option<ArticleContent>,
}

impl Article {
    /// The article's title, trimmed.
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_default().trim()
    }

    /// The article's preview (teaser) text, trimmed.
    pub fn preview_text(&self) -> &str {
        self.preview_text.as_deref().unwrap_or_default().trim()
    }

    /// The article's body, block by block.
    pub fn blocks(&self) -> &[Block] {
        self.content
            .as_ref()
            .and_then(|content| content.blocks.as_deref())
            .unwrap_or_default()
    }

    /// Renders the article's body as Markdown.
    ///
    /// Returns an empty string if the article has no blocks.
    pub fn to_markdown(&self) -> String {
        markdown::render(self.blocks())
    }
}

#[derive(Debug, Default, Deserialize)]
struct ArticleContent {
    #[serde(default, deserialize_with = "lenient")]
    blocks: Option<Vec<Block>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawText {
    #[serde(default, deserialize_with = "lenient_string")]
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Author {
    #[serde(default, deserialize_with = "lenient_string")]
    screen_name: Option<String>,
}

/// Accepts any value that deserializes as `T`; anything else is treated
/// as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(|value| T::deserialize(value).ok()))
}

/// Accepts strings and numbers; anything else is treated as absent.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{do_logging, load_data};
    use serde_json::json;

    fn post(value: Value) -> Post {
        PostResponse::from_value(value).unwrap().into_post()
    }

    mod best_text {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn it_prefers_rendered_text() {
            let post = post(json!({"tweet": {"text": " hello ", "raw_text": {"text": "raw"}}}));
            assert_eq!(post.best_text(), "hello");
        }

        #[test]
        fn it_falls_back_to_raw_text() {
            let post = post(json!({"tweet": {"raw_text": {"text": " https://t.co/abc "}}}));
            assert_eq!(post.best_text(), "https://t.co/abc");
        }

        #[test]
        fn it_is_empty_without_any_text() {
            assert_eq!(post(json!({"tweet": {}})).best_text(), "");
            assert_eq!(post(json!({})).best_text(), "");
            assert_eq!(post(json!({"tweet": null})).best_text(), "");
        }

        #[test]
        fn it_tolerates_nulls() {
            let post = post(json!({"tweet": {"text": null, "raw_text": null}}));
            assert_eq!(post.best_text(), "");
        }

        #[test]
        fn it_ignores_fields_of_the_wrong_type() {
            let post = post(json!({"tweet": {
                "text": "hi",
                "author": "someone",
                "raw_text": "plain",
                "article": "n/a",
                "quote": false,
                "tweet": [1, 2],
            }}));
            assert_eq!(post.best_text(), "hi");
            assert_eq!(post.handle(), None);
            assert_eq!(post.raw_text(), None);
            assert!(post.article().is_none());
            assert!(post.quote().is_none());
        }

        #[test]
        fn it_ignores_a_malformed_article_body() {
            let post = post(json!({"tweet": {
                "article": {"title": "T", "content": "oops"},
            }}));
            assert_eq!(post.article().map(|a| a.title()), Some("T"));
            assert_eq!(post.article().map(|a| a.to_markdown()), Some(String::new()));
        }

        #[test]
        fn it_ignores_a_tweet_of_the_wrong_type() {
            assert_eq!(post(json!({"tweet": "gone"})).best_text(), "");
        }
    }

    mod resolve {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn it_follows_a_quoted_article() {
            let post = post(json!({
                "tweet": {
                    "id": "1",
                    "text": "wrapper",
                    "quote": {"id": "2", "article": {"title": "Inner"}}
                }
            }));
            let resolved = post.resolve();
            assert!(resolved.followed_quote());
            assert_eq!(resolved.followed(), Some("2"));
            assert_eq!(resolved.post().article().unwrap().title(), "Inner");
        }

        #[test]
        fn it_follows_a_quote_wrapped_in_a_tweet_object() {
            let post = post(json!({
                "tweet": {"quote": {"tweet": {"url": "https://x.com/a/status/3", "article": {}}}}
            }));
            let resolved = post.resolve();
            assert!(resolved.followed_quote());
            assert_eq!(resolved.followed(), Some("https://x.com/a/status/3"));
        }

        #[test]
        fn it_keeps_its_own_article() {
            let post = post(json!({
                "tweet": {
                    "id": "1",
                    "article": {"title": "Outer"},
                    "quote": {"id": "2", "article": {"title": "Inner"}}
                }
            }));
            let resolved = post.resolve();
            assert!(!resolved.followed_quote());
            assert_eq!(resolved.followed(), None);
            assert_eq!(resolved.post().article().unwrap().title(), "Outer");
        }

        #[test]
        fn it_ignores_quotes_without_articles() {
            let post = post(json!({
                "tweet": {"id": "1", "text": "outer", "quote": {"id": "2", "text": "inner"}}
            }));
            let resolved = post.resolve();
            assert!(!resolved.followed_quote());
            assert_eq!(resolved.post().best_text(), "outer");
            assert_eq!(resolved.post().quote().unwrap().best_text(), "inner");
        }

        #[test]
        fn it_follows_only_one_level() {
            let post = post(json!({
                "tweet": {
                    "id": "1",
                    "quote": {"id": "2", "quote": {"id": "3", "article": {"title": "Deep"}}}
                }
            }));
            let resolved = post.resolve();
            assert!(!resolved.followed_quote());
            assert_eq!(resolved.post().id(), Some("1"));
        }

        #[test]
        fn it_follows_quotes_in_fixture_data() {
            do_logging();
            let body = load_data("quote_article");
            let resolved = PostResponse::parse(&body).unwrap().into_post().resolve();
            assert!(resolved.followed_quote());
            let article = resolved.post().article().unwrap();
            assert_eq!(article.title(), "Why We Rewrote Everything");
            assert_eq!(resolved.post().handle(), Some("buildernotes"));
        }
    }

    mod article {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn it_reads_fixture_data() {
            let body = load_data("article");
            let post = PostResponse::parse(&body).unwrap().into_post();
            assert_eq!(post.id(), Some("2019833629233324539"));
            assert_eq!(post.handle(), Some("RianSweetDoris"));
            let article = post.article().unwrap();
            assert_eq!(article.title(), "Shipping Small Things");
            assert_eq!(article.preview_text(), "Notes on keeping releases boring.");
            assert_eq!(article.blocks().len(), 7);
        }

        #[test]
        fn it_renders_markdown() {
            let post = post(json!({
                "tweet": {"article": {"content": {"blocks": [
                    {"type": "header-one", "text": "Intro"},
                    {"type": "unstyled", "text": "Body"}
                ]}}}
            }));
            assert_eq!(post.article().unwrap().to_markdown(), "# Intro\n\nBody");
        }

        #[test]
        fn it_has_no_blocks_without_content() {
            let post = post(json!({"tweet": {"article": {"title": "T", "content": null}}}));
            assert!(post.article().unwrap().blocks().is_empty());
            assert_eq!(post.article().unwrap().to_markdown(), "");
        }

        #[test]
        fn it_accepts_numeric_ids() {
            let post = post(json!({"tweet": {"id": 12345}}));
            assert_eq!(post.id(), Some("12345"));
        }
    }
}
