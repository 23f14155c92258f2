//! Authentication for AI services.

use std::{env, fmt};
use thiserror::Error;

/// An API key for an AI service.
///
/// The key never appears in `Debug` output.
pub struct Auth {
    api_key: String,
}

impl Auth {
    /// Wraps `api_key`.
    pub fn new(api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();
        Self { api_key }
    }

    /// Reads the key from the environment variable `envvar`.
    ///
    /// Unset, non-Unicode, and blank values are all errors.
    pub fn from_env(envvar: impl Into<String>) -> AuthResult {
        let envvar = envvar.into();
        let api_key = env::var(&envvar)?;
        if api_key.trim().is_empty() {
            Err(AuthError::Empty(envvar))
        } else {
            Ok(Self { api_key })
        }
    }

    /// The raw key.
    ///
    /// # Examples
    ///
    /// ```
    /// use xpost::ai::Auth;
    /// let auth = Auth::new("ThisIsMyApiKey");
    /// assert_eq!(auth.api_key(), "ThisIsMyApiKey");
    /// ```
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// The value of an `Authorization` header carrying this key.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.api_key)
    }
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Auth").field("api_key", &"<redacted>").finish()
    }
}

/// The result of reading an [`Auth`] from the environment.
pub type AuthResult = Result<Auth, AuthError>;

/// Why an API key could not be read from the environment.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The variable is unset or is not valid Unicode.
    #[error("could not read API key: {0}")]
    EnvError(#[from] env::VarError),

    /// The variable is set but blank.
    #[error("${0} is empty")]
    Empty(String),
}
