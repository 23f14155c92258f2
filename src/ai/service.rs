// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Services for communicating with AI APIs using HTTP.

use crate::ai::Auth;
use crate::http::{self, HTTPClientFactory, HTTPResult};
use reqwest::{Client, IntoUrl, header};
use serde::Serialize;

/// A general service for making HTTP calls to an API.
///
/// While this may appear to be more like a "client", think of it as a
/// proxy for a (possibly remote) API service.
pub trait APIService {
    /// Send a POST request to the `uri` with the JSON object `data` as
    /// the POST request body.
    ///
    /// The raw response body is returned; deciding how to interpret it is
    /// up to the API client.
    fn post<U, D>(
        &self,
        uri: U,
        auth: &Auth,
        data: &D,
    ) -> impl Future<Output = HTTPResult<String>> + Send
    where
        U: IntoUrl + Send,
        D: Serialize + Sync;
}

/// A concrete implementation of an HTTP API service.
///
/// This is the "default" service used by AI API clients. It more or
/// less just wraps a Reqwest client, making it easier to swap out the
/// service for a deterministic service when writing tests.
#[derive(Debug)]
pub struct HTTPService {
    client: Client,
}

impl HTTPService {
    /// Creates a new HTTP service using a client from the given factory.
    pub fn new(factory: &HTTPClientFactory) -> HTTPResult<Self> {
        let client = factory.create()?;
        Ok(Self { client })
    }
}

impl APIService for HTTPService {
    async fn post<U, D>(&self, uri: U, auth: &Auth, data: &D) -> HTTPResult<String>
    where
        U: IntoUrl + Send,
        D: Serialize + Sync,
    {
        let request = self
            .client
            .post(uri)
            .header(header::ACCEPT, "application/json")
            .header(header::AUTHORIZATION, auth.bearer())
            .json(data);
        http::send(request).await
    }
}
