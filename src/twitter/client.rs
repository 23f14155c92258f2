// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Clients for reading posts from a post API.

use crate::error::Result;
use crate::ident::PostRef;
use crate::twitter::post::{PostResponse, Resolved};
use crate::twitter::service::Service;
use log::debug;
use serde_json::Value;

/// Fetches posts using a particular [`Service`].
#[derive(Debug)]
pub struct PostClient<S: Service> {
    service: S,
}

impl<S: Service> PostClient<S> {
    /// Creates a new client that fetches posts with `service`.
    pub fn new(service: S) -> Self {
        Self { service }
    }

    /// The raw response body for the post, exactly as the service sent it.
    pub async fn fetch_raw(&self, post: &PostRef) -> Result<String> {
        debug!("fetching {post}");
        self.service.get_post(post).await
    }

    /// The response body for the post, parsed as JSON.
    pub async fn fetch_json(&self, post: &PostRef) -> Result<Value> {
        let body = self.fetch_raw(post).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// The post, with any quoted article already followed.
    ///
    /// See [`Post::resolve`](crate::twitter::post::Post::resolve).
    pub async fn fetch_post(&self, post: &PostRef) -> Result<Resolved> {
        let body = self.fetch_raw(post).await?;
        Ok(PostResponse::parse(&body)?.into_post().resolve())
    }
}
