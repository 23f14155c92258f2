//! OpenAI API client.
//!
//! Requests are sent to the [Responses API]. By default the
//! [gpt-4.1-mini](Model::Gpt4_1mini) model is used, which translates well
//! for its price; any other model can be selected by name with
//! [`Model::from`], which is how `$OPENAI_MODEL` is honored.
//!
//! # Access
//!
//! You will need to set up an [OpenAI API account](https://platform.openai.com/docs/overview)
//! and generate your own authentication key to use OpenAI's API. Your key should be stored
//! under the `$OPENAI_API_KEY` environment variable for use with [`Auth`].
//!
//! **Note that you are solely responsible for paying the costs of OpenAI API access.**
//! Translation sends every paragraph, heading, and list item of an article as a
//! separate request, so long articles add up. For the latest pricing, see OpenAI's
//! [pricing](https://platform.openai.com/docs/pricing) docs.
//!
//! # Compatible services
//!
//! Any service exposing an OpenAI-compatible `/responses` endpoint can be used
//! by changing the client's [base URL](OpenAIClient::base_url), which is how
//! `$OPENAI_BASE_URL` is honored.
//!
//! [Responses API]: https://platform.openai.com/docs/api-reference/responses

use crate::ai::Auth;
use crate::ai::client::{APIClient, APIRequest, APIResponse, APIResult};
use crate::ai::service::{APIService, HTTPService};
use crate::http::{HTTPClientFactory, HTTPResult};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The public OpenAI API.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// A body for an OpenAI API request.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct OpenAIRequest {
    model: Model,

    input: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

impl APIRequest for OpenAIRequest {
    /// This request uses OpenAI GPT-specific [models](Model).
    type Model = Model;

    /// Sets the model used by the OpenAI API request.
    ///
    /// If not specified, the [default](Model::default) model,
    /// gpt-4.1-mini, will be used.
    fn model(self, model: Model) -> Self {
        Self { model, ..self }
    }

    /// Sets the request's input.
    fn input(self, input: impl Into<String>) -> Self {
        let input = input.into();
        Self { input, ..self }
    }

    /// Sets the sampling temperature, between 0 and 2.
    fn temperature(self, temperature: f32) -> Self {
        let temperature = Some(temperature);
        Self {
            temperature,
            ..self
        }
    }
}

/// OpenAI GPT models.
///
/// A few well-known models have their own variants; anything else can be
/// named with [`Model::Other`]. For more information on the differences
/// between each model, see the
/// [OpenAI model documentation](https://platform.openai.com/docs/models).
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum Model {
    /// Versatile, high-intelligence flagship model.
    #[serde(rename = "gpt-4o")]
    Gpt4o,

    /// A fast, affordable model for focused tasks.
    #[serde(rename = "gpt-4o-mini")]
    Gpt4omini,

    /// The flagship model for complex tasks.
    #[serde(rename = "gpt-4.1")]
    Gpt4_1,

    /// Provides a balance between intelligence, speed, and cost.
    #[default]
    #[serde(rename = "gpt-4.1-mini")]
    Gpt4_1mini,

    /// The fastest, most cost-effective 4.1 model.
    #[serde(rename = "gpt-4.1-nano")]
    Gpt4_1nano,

    /// Optimized for fast, effective reasoning.
    #[serde(rename = "o4-mini")]
    O4mini,

    /// Any other model, by its API descriptor.
    #[serde(untagged)]
    Other(String),
}

impl Model {
    /// The least expensive of the well-known models.
    pub fn cheapest() -> Self {
        Model::Gpt4_1nano
    }
}

impl From<&str> for Model {
    /// Looks up a model by its API descriptor, such as `gpt-4o`.
    ///
    /// # Examples
    ///
    /// ```
    /// use xpost::ai::client::openai::Model;
    /// assert_eq!(Model::from("gpt-4o"), Model::Gpt4o);
    /// assert_eq!(Model::from("my-fine-tune"), Model::Other(String::from("my-fine-tune")));
    /// ```
    fn from(descriptor: &str) -> Self {
        let descriptor = descriptor.trim();
        serde_json::from_value(Value::String(descriptor.to_string()))
            .unwrap_or_else(|_| Model::Other(descriptor.to_string()))
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_value(self) {
            Ok(Value::String(s)) => f.write_str(&s),
            _ => Err(fmt::Error),
        }
    }
}

/// A response from the OpenAI Responses API.
///
/// Parsing never fails: a body that is not the expected JSON is kept
/// verbatim and becomes the [output text](APIResponse::output_text).
#[derive(Debug, Default, Deserialize)]
pub struct OpenAIResponse {
    #[serde(default)]
    output_text: Option<String>,

    #[serde(default)]
    output: Option<Vec<OutputItem>>,

    #[serde(skip)]
    raw: String,
}

impl OpenAIResponse {
    /// Interprets a raw response body.
    pub fn parse(body: &str) -> Self {
        let raw = body.to_string();
        match serde_json::from_str::<OpenAIResponse>(body) {
            Ok(response) => Self { raw, ..response },
            Err(err) => {
                debug!("response is not a Responses API object ({err}); using raw body");
                Self {
                    raw,
                    ..Self::default()
                }
            }
        }
    }

    /// The items generated by the model.
    pub fn output(&self) -> impl Iterator<Item = &OutputItem> {
        self.output.iter().flatten()
    }
}

impl APIResponse for OpenAIResponse {
    /// The generated text.
    ///
    /// The `output_text` convenience field is preferred. Without it, the
    /// text of every content fragment of every output item is
    /// concatenated. If there is no text at all, the raw body is returned.
    fn output_text(&self) -> String {
        if let Some(text) = &self.output_text {
            return text.clone();
        }

        let chunks: Vec<&str> = self
            .output()
            .flat_map(|item| item.content())
            .filter_map(|content| content.text())
            .collect();

        if chunks.is_empty() {
            self.raw.clone()
        } else {
            chunks.concat()
        }
    }
}

/// One item of a response's output, such as a message.
#[derive(Debug, Default, Deserialize)]
pub struct OutputItem {
    #[serde(default)]
    content: Option<Vec<OutputContent>>,
}

impl OutputItem {
    /// The item's content fragments.
    pub fn content(&self) -> impl Iterator<Item = &OutputContent> {
        self.content.iter().flatten()
    }
}

/// A fragment of an output item's content.
#[derive(Debug, Default, Deserialize)]
pub struct OutputContent {
    #[serde(default)]
    text: Option<String>,
}

impl OutputContent {
    /// The fragment's text, if it carries any.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

/// A client for the OpenAI Responses API.
#[derive(Debug)]
pub struct OpenAIClient<S: APIService = HTTPService> {
    auth: Auth,
    service: S,
    base_url: String,
}

impl OpenAIClient<HTTPService> {
    /// Creates a new client that authenticates with `auth` and makes
    /// requests with clients from `factory`.
    pub fn new(auth: Auth, factory: &HTTPClientFactory) -> HTTPResult<Self> {
        let service = HTTPService::new(factory)?;
        Ok(Self::with_service(auth, service))
    }
}

impl<S: APIService> OpenAIClient<S> {
    /// Creates a new client that sends requests through `service`.
    pub fn with_service(auth: Auth, service: S) -> Self {
        Self {
            auth,
            service,
            base_url: String::from(DEFAULT_BASE_URL),
        }
    }

    /// Sends requests to an OpenAI-compatible API at `base_url` instead
    /// of the public OpenAI API.
    pub fn base_url(self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self { base_url, ..self }
    }

    fn responses_uri(&self) -> String {
        format!("{}/responses", self.base_url.trim_end_matches('/'))
    }
}

impl<S: APIService + Sync> APIClient for OpenAIClient<S> {
    type APIRequest = OpenAIRequest;
    type APIResponse = OpenAIResponse;

    async fn send(&self, request: &OpenAIRequest) -> APIResult<OpenAIResponse> {
        trace!("sending request: {request:?}");
        let body = self
            .service
            .post(self.responses_uri(), &self.auth, request)
            .await?;
        Ok(OpenAIResponse::parse(&body))
    }
}
