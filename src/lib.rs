// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! xpost is a command-line tool for reading X/Twitter posts outside of X.
//! It fetches a post through an unofficial API, extracts its text or the
//! long-form X Article attached to it, renders the article as Markdown,
//! and can translate the Markdown into another language while keeping
//! headings, lists, links, and code blocks intact.
//!
//! # Examples
//!
//! Print a post's JSON:
//!
//! ```bash
//! xpost fetch --url 'https://x.com/RianSweetDoris/status/2019833629233324539' --pretty
//! ```
//!
//! Find a post in a pasted message and print its text:
//!
//! ```bash
//! xpost fetch --message 'look at this https://x.com/jack/status/20 lol' --extract text
//! ```
//!
//! Save a post's article as Markdown in `articles/`, named after the
//! article's title. If the article looks English, a Chinese translation
//! is written next to it in the background:
//!
//! ```bash
//! xpost fetch --url 'https://x.com/RianSweetDoris/status/2019833629233324539' \
//!     --extract article-full --out-dir articles
//! ```
//!
//! Translate a Markdown file into Japanese:
//!
//! ```bash
//! xpost translate --in articles/post.md --out articles/post.ja.md --to ja
//! ```
//!
//! Fetch a post, or a page of a user's posts, from twitter-viewer.com:
//!
//! ```bash
//! xpost viewer tweet --tweet-id 2019833629233324539 --pretty
//! xpost viewer user --username jack
//! ```
//!
//! Get usage and help for the tool:
//!
//! ```bash
//! xpost --help
//! ```
//!
//! # OpenAI API Setup
//!
//! Translation uses OpenAI's [Responses API] through the
//! [`OpenAITranslator`](translate::OpenAITranslator). To enable access:
//!
//! 1. Set up an [OpenAI API account].
//! 2. Generate an [API key].
//! 3. Store the generated key in your shell's `$OPENAI_API_KEY`
//!    environment variable:
//!
//!    ```bash
//!    $ export OPENAI_API_KEY='copied api key'
//!    ```
//!
//! `$OPENAI_BASE_URL` points xpost at any OpenAI-compatible service, and
//! `$OPENAI_MODEL` selects a model other than the default, gpt-4.1-mini.
//!
//! **You are solely responsible for the cost of your use of the OpenAI API!**
//! See the [openai module documentation] for more information.
//!
//! # License
//!
//! xpost is licensed under the terms of the [Apache License 2.0]. Please
//! see the LICENSE file accompanying this source code or visit the previous
//! link for more information on licensing.
//!
//! [Apache License 2.0]: https://www.apache.org/licenses/LICENSE-2.0
//! [API key]: https://platform.openai.com/settings/organization/api-keys
//! [OpenAI API account]: https://platform.openai.com/docs/overview
//! [Responses API]: https://platform.openai.com/docs/api-reference/responses
//! [openai module documentation]: crate::ai::client::openai

pub mod ai;
pub mod cli;
pub mod conf;
pub mod error;
pub mod http;
pub mod ident;
pub mod markdown;
pub mod text;
pub mod translate;
pub mod twitter;

#[cfg(test)]
mod test_utils;
