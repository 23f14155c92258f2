// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! HTTPS connectors for the unofficial X/Twitter APIs.
//!
//! Service structures in this module provide a low-level way to fetch
//! post data: each one knows how to build a request for its backend and
//! returns the raw response body. Parsing is left to the caller.
//!
//! Two backends are supported:
//!
//! - [FxTwitter](https://github.com/FxEmbed/FxEmbed), which needs both the
//!   author's handle and the post identifier, and often includes X
//!   Article content.
//! - twitter-viewer.com, which needs only the post identifier and can
//!   also page through a user's timeline.

use crate::error::{Error, Result};
use crate::http::{self, HTTPClientFactory};
use crate::ident::PostRef;
use reqwest::{Client, RequestBuilder, header};
use std::time::Duration;

/// A service for retrieving a single post.
///
/// Using this trait, clients can implement different ways of connecting
/// to a post API, such as an actual connector for production code, and a
/// canned connector for testing purposes.
pub trait Service {
    /// Fetches the post referenced by `post` and returns the raw body.
    fn get_post(&self, post: &PostRef) -> impl Future<Output = Result<String>> + Send;
}

/// A service that fetches posts from the FxTwitter API.
#[derive(Debug)]
pub struct FxTwitterService {
    client: Client,
    base: String,
}

impl FxTwitterService {
    /// The public FxTwitter API.
    pub const DEFAULT_BASE: &'static str = "https://api.fxtwitter.com";

    const USER_AGENT: &'static str =
        "Mozilla/5.0 (twitter-viewer-skill; +https://github.com/FxEmbed/FxEmbed)";

    /// Creates a service for the FxTwitter API at `base`.
    ///
    /// Requests time out after `timeout`.
    pub fn new(base: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base = base.into();
        let client = HTTPClientFactory::new(Self::USER_AGENT)
            .timeout(timeout)
            .create()?;
        Ok(Self { client, base })
    }

    /// The URL of the post by `handle` with the given `id`.
    pub fn uri(&self, handle: &str, id: &str) -> String {
        format!("{}/{handle}/status/{id}", self.base.trim_end_matches('/'))
    }

    fn request(&self, handle: &str, id: &str) -> RequestBuilder {
        self.client
            .get(self.uri(handle, id))
            .header(header::ACCEPT, "application/json")
    }
}

impl Service for FxTwitterService {
    /// Fetches a post from FxTwitter.
    ///
    /// Fails with [`Error::IdentifierNotFound`] if `post` has no handle,
    /// since FxTwitter cannot look up a post by identifier alone.
    async fn get_post(&self, post: &PostRef) -> Result<String> {
        let handle = post.handle().ok_or_else(|| {
            Error::IdentifierNotFound(format!("an author handle for post {}", post.id()))
        })?;
        Ok(http::send(self.request(handle, post.id())).await?)
    }
}

/// A service that fetches posts and timelines from twitter-viewer.com.
#[derive(Debug)]
pub struct ViewerService {
    client: Client,
    base: String,
}

impl ViewerService {
    /// The public twitter-viewer.com site.
    pub const DEFAULT_BASE: &'static str = "https://www.twitter-viewer.com";

    const USER_AGENT: &'static str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/144.0.0.0 Safari/537.36";
    const REFERER: &'static str = "https://www.twitter-viewer.com/";

    /// Creates a service for twitter-viewer.com at `base`.
    ///
    /// Requests time out after `timeout`.
    pub fn new(base: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base = base.into();
        let client = HTTPClientFactory::new(Self::USER_AGENT)
            .timeout(timeout)
            .create()?;
        Ok(Self { client, base })
    }

    /// Fetches one page of tweets posted by `username`.
    ///
    /// A leading `@` is ignored. `cursor` comes from the previous page;
    /// pass an empty string for the first page.
    pub async fn get_user_tweets(&self, username: &str, cursor: &str) -> Result<String> {
        Ok(http::send(self.user_tweets_request(username, cursor)).await?)
    }

    fn endpoint(&self, resource: &str) -> String {
        format!("{}/api/x/{resource}", self.base.trim_end_matches('/'))
    }

    fn get(&self, resource: &str) -> RequestBuilder {
        self.client
            .get(self.endpoint(resource))
            .header(header::ACCEPT, "application/json, text/plain, */*")
            .header(header::REFERER, Self::REFERER)
    }

    fn tweet_request(&self, id: &str) -> RequestBuilder {
        self.get("tweet").query(&[("tweetId", id)])
    }

    fn user_tweets_request(&self, username: &str, cursor: &str) -> RequestBuilder {
        let username = username.trim();
        let username = username.strip_prefix('@').unwrap_or(username);
        self.get("user-tweets")
            .query(&[("username", username), ("cursor", cursor)])
    }
}

impl Service for ViewerService {
    async fn get_post(&self, post: &PostRef) -> Result<String> {
        Ok(http::send(self.tweet_request(post.id())).await?)
    }
}
