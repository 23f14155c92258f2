//! Environment and configuration utilities.

use crate::ai::Auth;
use crate::ai::client::openai::{self, Model, OpenAIClient};
use crate::error::{Error, Result};
use crate::http::HTTPClientFactory;
use std::env;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Holds the OpenAI settings read from the environment.
///
/// | Variable | Required | Default |
/// |---|---|---|
/// | `$OPENAI_API_KEY` | yes | |
/// | `$OPENAI_BASE_URL` | no | `https://api.openai.com/v1` |
/// | `$OPENAI_MODEL` | no | `gpt-4.1-mini` |
///
/// Variables set to an empty string are treated as if they were unset.
#[derive(Debug)]
pub struct OpenAIConfig {
    auth: Auth,
    base_url: String,
    model: Model,
}

impl OpenAIConfig {
    /// Holds the API key.
    pub const API_KEY_VAR: &'static str = "OPENAI_API_KEY";

    /// Overrides the API's base URL.
    pub const BASE_URL_VAR: &'static str = "OPENAI_BASE_URL";

    /// Overrides the model.
    pub const MODEL_VAR: &'static str = "OPENAI_MODEL";

    /// Reads the configuration from the environment.
    ///
    /// Fails with [`Error::MissingCredential`] if no API key is set.
    pub fn from_env() -> Result<Self> {
        let auth = Auth::from_env(Self::API_KEY_VAR)
            .map_err(|_| Error::MissingCredential(String::from(Self::API_KEY_VAR)))?;
        let base_url =
            var(Self::BASE_URL_VAR).unwrap_or_else(|| String::from(openai::DEFAULT_BASE_URL));
        let model = var(Self::MODEL_VAR)
            .map(|m| Model::from(m.as_str()))
            .unwrap_or_default();
        Ok(Self {
            auth,
            base_url,
            model,
        })
    }

    /// The API base URL, without the `/responses` path.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The model translations are requested from.
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Creates a client for the configured API whose requests time out
    /// after `timeout`.
    pub fn into_client(self, timeout: Duration) -> Result<(OpenAIClient, Model)> {
        let factory = HTTPClientFactory::default().timeout(timeout);
        let client = OpenAIClient::new(self.auth, &factory)?.base_url(self.base_url);
        Ok((client, self.model))
    }
}

fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

/// The path a translation of `path` into `lang` is written to.
///
/// The language code is inserted before the file's extension. A path
/// without an extension is given a `.md` extension.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use xpost::conf::translated_path;
///
/// let path = translated_path(Path::new("out/shipping-small-things.md"), "zh");
/// assert_eq!(path, PathBuf::from("out/shipping-small-things.zh.md"));
///
/// let path = translated_path(Path::new("notes"), "ja");
/// assert_eq!(path, PathBuf::from("notes.ja.md"));
/// ```
pub fn translated_path(path: &Path, lang: &str) -> PathBuf {
    let mut extension = OsString::from(lang);
    extension.push(".");
    extension.push(path.extension().unwrap_or(OsStr::new("md")));
    path.with_extension(extension)
}
