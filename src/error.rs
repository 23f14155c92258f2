// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Errors surfaced by xpost commands.

use crate::http::HTTPError;
use crate::translate::TranslateError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A result whose error is an xpost [`enum@Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Anything that can go wrong while fetching, extracting, or translating
/// a post.
#[derive(Debug, Error)]
pub enum Error {
    /// No usable post identifier could be found in the input.
    #[error("could not find {0}")]
    IdentifierNotFound(String),

    /// The HTTP request failed, either in transport or with a non-2xx status.
    #[error("request failed: {0}")]
    Request(#[from] HTTPError),

    /// A response body was not the structured data we expected.
    #[error("response was not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Required configuration is missing from the environment.
    #[error("{0} env var not set")]
    MissingCredential(String),

    /// The translator failed or timed out.
    #[error("translation failed: {0}")]
    TranslationFailure(#[from] TranslateError),

    /// A file named on the command line does not exist.
    #[error("input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// The process exit code used when this error ends a command.
    ///
    /// Bad input and missing configuration exit with 2; failures that
    /// happen after the command started doing real work exit with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::IdentifierNotFound(_)
            | Error::MissingCredential(_)
            | Error::InputNotFound(_) => 2,
            Error::Request(_) | Error::Parse(_) | Error::TranslationFailure(_) | Error::Io(_) => 1,
        }
    }
}
