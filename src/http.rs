// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Services for communicating with APIs using HTTP.

use log::debug;
use reqwest::{Client, ClientBuilder, RequestBuilder, Response, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// Creates HTTP clients configured with a user agent and a timeout.
///
/// Every request made by xpost is a single attempt; there is no retry
/// policy, so the timeout bounds the whole call.
#[derive(Debug)]
pub struct HTTPClientFactory {
    user_agent: String,
    timeout: Duration,
}

impl HTTPClientFactory {
    /// The timeout used when the caller does not specify one.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Creates a new factory for clients that identify themselves with
    /// `user_agent`.
    pub fn new(user_agent: impl Into<String>) -> Self {
        let user_agent = user_agent.into();
        Self {
            user_agent,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets the timeout applied to every request made by created clients.
    pub fn timeout(self, timeout: Duration) -> Self {
        Self { timeout, ..self }
    }

    /// The user agent sent by created clients.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Builds a new client.
    ///
    /// Fails only if a TLS backend or the DNS resolver cannot be
    /// initialized.
    pub fn create(&self) -> HTTPResult<Client> {
        let client = ClientBuilder::new()
            .user_agent(&self.user_agent)
            .timeout(self.timeout)
            .build()?;
        Ok(client)
    }
}

impl Default for HTTPClientFactory {
    /// A factory whose clients identify themselves as this crate.
    fn default() -> Self {
        Self::new(format!(
            "{} v{}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        ))
    }
}

/// Sends `request` and returns the body of a successful response as text.
///
/// Non-2xx responses become [`HTTPError::Status`] with whatever body the
/// server sent, decoded lossily.
pub async fn send(request: RequestBuilder) -> HTTPResult<String> {
    let resp = request.send().await?;
    debug!("{} {}", resp.status(), resp.url());
    into_text(resp).await
}

async fn into_text(resp: Response) -> HTTPResult<String> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp.text().await?)
    } else {
        let body = resp.text().await.unwrap_or_default();
        Err(HTTPError::Status { status, body })
    }
}

/// The result of an HTTP request.
pub type HTTPResult<T> = Result<T, HTTPError>;

/// Indicates an error has occurred when making an HTTP call.
#[derive(Debug, Error)]
pub enum HTTPError {
    /// The server answered with an unsuccessful status code.
    #[error("{}", status_message(.status, .body))]
    Status {
        /// The response's status code.
        status: StatusCode,

        /// The response body, if any.
        body: String,
    },

    /// The request never completed: DNS, connection, TLS, or timeout.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
}

impl HTTPError {
    /// The status code of the response, if a response was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            HTTPError::Status { status, .. } => Some(*status),
            HTTPError::Transport(err) => err.status(),
        }
    }

    /// True if the request timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, HTTPError::Transport(err) if err.is_timeout())
    }
}

fn status_message(status: &StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("HTTP {}: {body}", status.as_u16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn it_returns_user_agent_with_version_number() {
        let factory = HTTPClientFactory::default();
        let version_re = Regex::new(r"^[a-z]+ v\d+\.\d+\.\d+(-(alpha|beta)\.\d+)?$").unwrap();
        assert!(
            version_re.is_match(factory.user_agent()),
            "{} does not match {}",
            factory.user_agent(),
            version_re,
        );
    }

    #[test]
    fn it_creates_a_client() {
        let factory = HTTPClientFactory::new("test-agent").timeout(Duration::from_secs(5));
        assert!(factory.create().is_ok());
    }

    #[test]
    fn it_includes_status_and_body_in_status_errors() {
        let err = HTTPError::Status {
            status: StatusCode::NOT_FOUND,
            body: String::from("{\"error\":\"not found\"}\n"),
        };
        assert_eq!(err.to_string(), "HTTP 404: {\"error\":\"not found\"}");
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert!(!err.is_timeout());
    }

    #[test]
    fn it_omits_empty_bodies_in_status_errors() {
        let err = HTTPError::Status {
            status: StatusCode::BAD_GATEWAY,
            body: String::new(),
        };
        assert_eq!(err.to_string(), "HTTP 502");
    }
}
