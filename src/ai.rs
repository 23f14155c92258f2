//! AI services.
//!
//! xpost uses a large language model for exactly one thing: translating
//! Markdown, a chunk at a time. Only OpenAI's [Responses API] is
//! supported, but the [`client`] traits keep the provider-specific parts
//! in one place.
//!
//! [Responses API]: https://platform.openai.com/docs/api-reference/responses

pub mod auth;
pub mod client;
pub mod service;

pub use auth::Auth;
