// xpost
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Renders X article blocks as Markdown.
//!
//! X articles are delivered as a flat list of rich-text blocks, one per
//! paragraph, heading, list item, or embedded object. This module turns
//! those blocks into plain Markdown, one paragraph per block.
//!
//! The rendering is deliberately simple. Inline styles and entity ranges
//! are ignored, embedded media collapses into a horizontal rule, and
//! ordered list items are all numbered `1.` because the API does not tell
//! us their position in the list.

use crate::text;
use itertools::Itertools;
use log::trace;
use serde::Deserialize;

/// Heading depth supported by X articles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeaderLevel {
    /// `#`
    One,
    /// `##`
    Two,
    /// `###`
    Three,
}

impl HeaderLevel {
    /// The Markdown marker for this heading depth.
    pub fn marker(&self) -> &'static str {
        match self {
            HeaderLevel::One => "#",
            HeaderLevel::Two => "##",
            HeaderLevel::Three => "###",
        }
    }
}

/// A single block of an X article.
///
/// Block text has already been trimmed and its line endings normalized.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "RawBlock")]
pub enum Block {
    /// A heading.
    Header(HeaderLevel, String),

    /// An item in a bulleted list.
    UnorderedListItem(String),

    /// An item in a numbered list.
    OrderedListItem(String),

    /// An embedded object such as an image, video, or divider. Its text,
    /// if any, is never rendered.
    Atomic,

    /// A plain paragraph, or any block type we do not recognize.
    Paragraph(String),
}

impl Block {
    /// Renders this block as a line of Markdown.
    ///
    /// Returns `None` if the block has nothing to show, which is the case
    /// for every empty block except [`Block::Atomic`].
    pub fn to_markdown(&self) -> Option<String> {
        match self {
            Block::Atomic => Some(String::from("---")),
            Block::Header(_, text)
            | Block::UnorderedListItem(text)
            | Block::OrderedListItem(text)
            | Block::Paragraph(text)
                if text.is_empty() =>
            {
                None
            }
            Block::Header(level, text) => Some(format!("{} {text}", level.marker())),
            Block::UnorderedListItem(text) => Some(format!("- {text}")),
            Block::OrderedListItem(text) => Some(format!("1. {text}")),
            Block::Paragraph(text) => Some(text.clone()),
        }
    }
}

/// Converts article blocks into a Markdown document.
///
/// Every rendered block becomes its own paragraph, separated from its
/// neighbours by a blank line, in the same order as `blocks`. An empty
/// slice renders as an empty string.
///
/// # Examples
///
/// ```
/// use xpost::markdown::{Block, HeaderLevel, render};
/// let blocks = vec![
///     Block::Header(HeaderLevel::Two, String::from("Setup")),
///     Block::OrderedListItem(String::from("Install it")),
///     Block::OrderedListItem(String::from("Run it")),
/// ];
/// assert_eq!(render(&blocks), "## Setup\n\n1. Install it\n\n1. Run it");
/// ```
pub fn render(blocks: &[Block]) -> String {
    blocks
        .iter()
        .filter_map(|block| {
            let line = block.to_markdown();
            trace!("rendered {block:?} as {line:?}");
            line
        })
        .filter(|line| !line.is_empty())
        .join("\n\n")
}

/// Wire format of a block, as sent by the API.
#[derive(Debug, Default, Deserialize)]
struct RawBlock {
    #[serde(default, rename = "type")]
    kind: Option<String>,

    #[serde(default)]
    text: Option<String>,
}

impl From<RawBlock> for Block {
    fn from(raw: RawBlock) -> Self {
        let text = text::normalize_newlines(raw.text.as_deref().unwrap_or_default().trim());
        match raw.kind.as_deref().unwrap_or_default() {
            "header-one" => Block::Header(HeaderLevel::One, text),
            "header-two" => Block::Header(HeaderLevel::Two, text),
            "header-three" => Block::Header(HeaderLevel::Three, text),
            "unordered-list-item" => Block::UnorderedListItem(text),
            "ordered-list-item" => Block::OrderedListItem(text),
            "atomic" => Block::Atomic,
            _ => Block::Paragraph(text),
        }
    }
}
