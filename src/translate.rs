// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Structure-preserving translation of Markdown documents.
//!
//! A document is split into [segments](Segment), one per heading, list
//! item, or bounded run of paragraph text, and each segment is sent to a
//! [`Translator`] on its own. Code fences, blank lines, dividers, and bare
//! URLs are copied through untouched. Heading and list markers are kept
//! as they were and only the text after them is translated.
//!
//! The [`Pipeline`] drives this, saving a [checkpoint](Checkpoint) of
//! the translated prefix after every translator call so that a reader of
//! the output file always sees a consistent, if truncated, document.
//!
//! # Examples
//!
//! ```no_run
//! # async fn translate() -> xpost::error::Result<()> {
//! use std::time::Duration;
//! use xpost::conf::OpenAIConfig;
//! use xpost::translate::{AtomicWriter, OpenAITranslator, Pipeline};
//!
//! let (client, model) = OpenAIConfig::from_env()?.into_client(Duration::from_secs(30))?;
//! let translator = OpenAITranslator::new(client, "zh").model(model);
//! let writer = AtomicWriter::new("post.zh.md");
//! let translated = Pipeline::new(&translator)
//!     .checkpoint(&writer)
//!     .run("# Hello\n\nGood morning.")
//!     .await?;
//! writer.write(&translated)?;
//! # Ok(())
//! # }
//! ```

mod background;
mod checkpoint;
mod pipeline;
mod segment;

pub use background::{PendingTranslation, TranslationJob};
pub use checkpoint::{AtomicWriter, Checkpoint, NoCheckpoint};
pub use pipeline::{Pipeline, document};
pub use segment::{ListKind, MAX_CHUNK_CHARS, Segment, Segments};

use crate::ai::client::openai::{Model, OpenAIClient, OpenAIRequest};
use crate::ai::client::{APIClient, APIError, APIRequest, APIResponse};
use log::debug;
use thiserror::Error;

/// Translates chunks of text into a single target language.
pub trait Translator {
    /// Translates `text`, returning only the translation.
    ///
    /// Each call is a single attempt.
    fn translate(&self, text: &str) -> impl Future<Output = TranslateResult<String>> + Send;
}

impl<T: Translator + Sync> Translator for &T {
    fn translate(&self, text: &str) -> impl Future<Output = TranslateResult<String>> + Send {
        (**self).translate(text)
    }
}

/// The result of a translation.
pub type TranslateResult<T> = Result<T, TranslateError>;

/// Indicates that a chunk could not be translated.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// The request to the translation API failed or timed out.
    #[error(transparent)]
    Api(#[from] APIError),

    /// The translator could not produce a translation.
    #[error("{0}")]
    Other(String),
}

impl TranslateError {
    /// True if the translator gave up waiting for an answer.
    pub fn is_timeout(&self) -> bool {
        match self {
            TranslateError::Api(err) => err.is_timeout(),
            TranslateError::Other(_) => false,
        }
    }
}

/// Translates text with an OpenAI model.
#[derive(Debug)]
pub struct OpenAITranslator<C: APIClient<APIRequest = OpenAIRequest> = OpenAIClient> {
    client: C,
    model: Model,
    lang: String,
}

impl<C: APIClient<APIRequest = OpenAIRequest>> OpenAITranslator<C> {
    /// Creates a translator into `lang` that sends requests with `client`.
    ///
    /// `lang` is passed to the model as-is, so it can be a language code
    /// like `zh` or a name like `Brazilian Portuguese`.
    pub fn new(client: C, lang: impl Into<String>) -> Self {
        let lang = lang.into();
        Self {
            client,
            model: Model::default(),
            lang,
        }
    }

    /// Uses `model` instead of the default model.
    pub fn model(self, model: Model) -> Self {
        Self { model, ..self }
    }

    /// The target language.
    pub fn lang(&self) -> &str {
        &self.lang
    }

    /// The full prompt sent to the model to translate `text`.
    pub fn prompt(&self, text: &str) -> String {
        format!(
            "Translate the following text into {}. Do not add commentary. \
             Return ONLY the translated text.\n\n---BEGIN---\n{text}\n---END---",
            self.lang
        )
    }
}

impl<C: APIClient<APIRequest = OpenAIRequest> + Sync> Translator for OpenAITranslator<C> {
    async fn translate(&self, text: &str) -> TranslateResult<String> {
        debug!("translating {} chars into {}", text.chars().count(), self.lang);
        let request = OpenAIRequest::default()
            .model(self.model.clone())
            .temperature(0.0)
            .input(self.prompt(text));
        let response = self.client.send(&request).await?;
        Ok(response.output_text().trim().to_string())
    }
}
