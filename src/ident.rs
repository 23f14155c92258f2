// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Finds post identifiers in free-form text.
//!
//! Users paste all sorts of things: a bare numeric ID, a link copied from
//! the X app with tracking parameters, or an entire chat message with a
//! link somewhere in the middle. The functions in this module dig the
//! post identifier (and, when possible, the author's handle) out of
//! whatever they are given.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static STATUS_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"https?://(?:www\.)?(?:x\.com|twitter\.com)/(?P<user>[A-Za-z0-9_]+)/status/(?P<id>[0-9]+)",
    )
    .expect("invalid status URL pattern")
});

// Tried in order; the first pattern with a match wins.
static ID_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"(?i)tweetId=([0-9]{5,})").expect("invalid tweetId pattern"),
        Regex::new(r"(?i)/status/([0-9]{5,})").expect("invalid status pattern"),
        Regex::new(r"(?i)/statuses/([0-9]{5,})").expect("invalid statuses pattern"),
    ]
});

static LONG_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[0-9]{15,19}\b").expect("invalid long number pattern"));

/// A reference to a single post: its identifier and, if known, the
/// handle of its author.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostRef {
    handle: Option<String>,
    id: String,
}

impl PostRef {
    /// A reference to the post with the given `id` and unknown author.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self { handle: None, id }
    }

    /// A reference to the post with the given `id` written by `handle`.
    pub fn with_handle(handle: impl Into<String>, id: impl Into<String>) -> Self {
        let handle = Some(handle.into());
        let id = id.into();
        Self { handle, id }
    }

    /// Finds a post reference in `text`.
    ///
    /// A status URL yields both the handle and the identifier. Otherwise
    /// only the identifier is found, using [`extract_id`].
    ///
    /// # Examples
    ///
    /// ```
    /// use xpost::ident::PostRef;
    /// let post = PostRef::parse("look https://x.com/jack/status/20 wow");
    /// assert_eq!(post, Some(PostRef::with_handle("jack", "20")));
    ///
    /// let post = PostRef::parse("1234567890123456789");
    /// assert_eq!(post, Some(PostRef::new("1234567890123456789")));
    /// ```
    pub fn parse(text: &str) -> Option<Self> {
        if is_numeric(text.trim()) {
            return Some(Self::new(text.trim()));
        }
        extract_status(text)
            .map(|(handle, id)| Self::with_handle(handle, id))
            .or_else(|| extract_id(text).map(Self::new))
    }

    /// The author's handle, if known.
    pub fn handle(&self) -> Option<&str> {
        self.handle.as_deref()
    }

    /// The post's numeric identifier.
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for PostRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.handle {
            Some(handle) => write!(f, "{handle}/status/{}", self.id),
            None => write!(f, "{}", self.id),
        }
    }
}

/// Finds the first X or Twitter status URL in `text` and returns the
/// author's handle and the post identifier.
///
/// Trailing path segments such as `/photo/1` and query strings are
/// ignored.
pub fn extract_status(text: &str) -> Option<(String, String)> {
    let caps = STATUS_URL.captures(text)?;
    Some((caps["user"].to_string(), caps["id"].to_string()))
}

/// Finds a post identifier in `text`.
///
/// If the trimmed text is entirely digits it is the identifier. Otherwise
/// the text is searched for a `tweetId=` query parameter, then a
/// `/status/` or `/statuses/` path segment, and finally any standalone
/// run of 15 to 19 digits.
pub fn extract_id(text: &str) -> Option<String> {
    let stripped = text.trim();
    if stripped.is_empty() {
        return None;
    }
    if is_numeric(stripped) {
        return Some(stripped.to_string());
    }

    ID_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(text))
        .map(|caps| caps[1].to_string())
        .or_else(|| LONG_NUMBER.find(text).map(|m| m.as_str().to_string()))
}

fn is_numeric(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit())
}
