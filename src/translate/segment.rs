//! Splits Markdown documents into translation units.

use regex::Regex;
use std::iter::Peekable;
use std::str::Split;
use std::sync::LazyLock;

static ORDERED_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\s*)([0-9]+\.\s+)(.*)$").expect("invalid ordered list item pattern")
});

/// Paragraph text is sent to the translator in chunks of at most this
/// many characters, unless a single line is longer.
pub const MAX_CHUNK_CHARS: usize = 1800;

const FENCE: &str = "```";
const DIVIDER: &str = "---";

/// The kind of a list item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListKind {
    /// A `- ` bullet.
    Unordered,

    /// A number followed by a dot.
    Ordered,
}

/// A run of document lines that is either translated as a whole or
/// copied through verbatim.
///
/// Every segment borrows from the source document, and together the
/// segments of a document cover its lines in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment<'a> {
    /// A fenced code block, including its fence lines.
    ///
    /// `close` is `None` if the document ended inside the block.
    CodeFence {
        open: &'a str,
        body: Vec<&'a str>,
        close: Option<&'a str>,
    },

    /// A blank line, a `---` divider, or a bare URL.
    Literal(&'a str),

    /// A heading. `prefix` holds any indentation, the `#` marker, and the
    /// space after it.
    Heading { prefix: &'a str, text: &'a str },

    /// A list item. `prefix` holds any indentation, the marker, and the
    /// whitespace after it.
    ListItem {
        kind: ListKind,
        prefix: &'a str,
        text: &'a str,
    },

    /// Consecutive lines of running text.
    Paragraph(Vec<&'a str>),
}

impl Segment<'_> {
    /// The segment's lines, exactly as they appear in the document.
    pub fn lines(&self) -> Vec<String> {
        match self {
            Segment::CodeFence { open, body, close } => std::iter::once(*open)
                .chain(body.iter().copied())
                .chain(*close)
                .map(String::from)
                .collect(),
            Segment::Literal(line) => vec![line.to_string()],
            Segment::Heading { prefix, text } | Segment::ListItem { prefix, text, .. } => {
                vec![format!("{prefix}{text}")]
            }
            Segment::Paragraph(lines) => lines.iter().map(|l| l.to_string()).collect(),
        }
    }
}

/// Iterates over the [segments](Segment) of a Markdown document.
///
/// Lines are classified in this order:
///
/// 1. A line starting with ```` ``` ```` opens a code fence, which runs
///    through the next such line or the end of the document.
/// 2. Blank lines, `---` dividers, and bare `http://` or `https://` URLs
///    are literals.
/// 3. `#` markers followed by a space start a heading.
/// 4. `- ` starts an unordered list item, and digits followed by a dot
///    and whitespace start an ordered one.
/// 5. Anything else is paragraph text. Consecutive paragraph lines are
///    grouped until their newline-joined length would exceed
///    [`MAX_CHUNK_CHARS`]; the line that would overflow starts the next
///    paragraph.
///
/// All checks ignore leading and trailing whitespace, except that a
/// marker needs its trailing space: `# ` with nothing after it is still a
/// heading, and `- ` a list item. Such empty headings and items are
/// copied through untouched rather than grouped with the surrounding
/// paragraph text.
#[derive(Debug)]
pub struct Segments<'a> {
    lines: Peekable<Split<'a, char>>,
}

impl<'a> Segments<'a> {
    /// Segments `document`, whose lines must be separated by `\n`.
    pub fn new(document: &'a str) -> Self {
        let lines = document.split('\n').peekable();
        Self { lines }
    }

    fn code_fence(&mut self, open: &'a str) -> Segment<'a> {
        let mut body = Vec::new();
        for line in self.lines.by_ref() {
            if is_fence(line) {
                return Segment::CodeFence {
                    open,
                    body,
                    close: Some(line),
                };
            }
            body.push(line);
        }
        Segment::CodeFence {
            open,
            body,
            close: None,
        }
    }

    fn paragraph(&mut self, first: &'a str) -> Segment<'a> {
        let mut lines = vec![first];
        let mut len = first.chars().count();
        while let Some(&line) = self.lines.peek() {
            if classify(line).is_some() {
                break;
            }
            let next_len = len + 1 + line.chars().count();
            if next_len > MAX_CHUNK_CHARS {
                break;
            }
            lines.push(line);
            len = next_len;
            self.lines.next();
        }
        Segment::Paragraph(lines)
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = self.lines.next()?;
        let segment = match classify(line) {
            Some(Segment::CodeFence { open, .. }) => self.code_fence(open),
            Some(segment) => segment,
            None => self.paragraph(line),
        };
        Some(segment)
    }
}

/// Classifies a single line, or returns `None` for paragraph text.
///
/// A fence line is returned as an empty, unclosed code fence.
fn classify(line: &str) -> Option<Segment<'_>> {
    let trimmed = line.trim();

    if is_fence(line) {
        return Some(Segment::CodeFence {
            open: line,
            body: Vec::new(),
            close: None,
        });
    }

    if trimmed.is_empty()
        || trimmed == DIVIDER
        || trimmed.starts_with("http://")
        || trimmed.starts_with("https://")
    {
        return Some(Segment::Literal(line));
    }

    let indent = line.len() - line.trim_start().len();
    let rest = &line[indent..];

    if let Some((marker, _)) = rest.split_once(' ') {
        if !marker.is_empty() && marker.chars().all(|c| c == '#') {
            let (prefix, text) = line.split_at(indent + marker.len() + 1);
            return Some(Segment::Heading { prefix, text });
        }
    }

    if rest.starts_with("- ") {
        let (prefix, text) = line.split_at(indent + 2);
        return Some(Segment::ListItem {
            kind: ListKind::Unordered,
            prefix,
            text,
        });
    }

    if let Some(text) = ORDERED_ITEM.captures(line).and_then(|c| c.get(3)) {
        let (prefix, text) = line.split_at(text.start());
        return Some(Segment::ListItem {
            kind: ListKind::Ordered,
            prefix,
            text,
        });
    }

    None
}

fn is_fence(line: &str) -> bool {
    line.trim().starts_with(FENCE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn segments(document: &str) -> Vec<Segment<'_>> {
        Segments::new(document).collect()
    }

    #[test]
    fn it_keeps_code_fences_together() {
        let document = indoc! {"
            Intro
            ```rust
            # not a heading
            - not a list
            ```
            Outro"};
        assert_eq!(
            segments(document),
            vec![
                Segment::Paragraph(vec!["Intro"]),
                Segment::CodeFence {
                    open: "```rust",
                    body: vec!["# not a heading", "- not a list"],
                    close: Some("```"),
                },
                Segment::Paragraph(vec!["Outro"]),
            ]
        );
    }

    #[test]
    fn it_runs_unclosed_code_fences_to_the_end() {
        let document = "```\nfn main() {}\n\n";
        assert_eq!(
            segments(document),
            vec![Segment::CodeFence {
                open: "```",
                body: vec!["fn main() {}", "", ""],
                close: None,
            }]
        );
    }

    #[test]
    fn it_finds_literals() {
        let document = "  \n---\nhttps://example.com/a b\n  http://example.com";
        let actual = segments(document);
        assert_eq!(actual.len(), 4);
        assert!(actual.iter().all(|s| matches!(s, Segment::Literal(_))));
    }

    #[test]
    fn it_keeps_markers_with_nothing_after_them() {
        let actual = segments("# \n- ");
        assert_eq!(
            actual,
            vec![
                Segment::Heading {
                    prefix: "# ",
                    text: ""
                },
                Segment::ListItem {
                    kind: ListKind::Unordered,
                    prefix: "- ",
                    text: ""
                },
            ]
        );
    }

    #[test]
    fn it_splits_headings() {
        let actual = segments("  ## Getting  Started");
        assert_eq!(
            actual,
            vec![Segment::Heading {
                prefix: "  ## ",
                text: "Getting  Started"
            }]
        );
    }

    #[test]
    fn it_treats_hashtags_as_text() {
        assert_eq!(
            segments("#rustlang is fun"),
            vec![Segment::Paragraph(vec!["#rustlang is fun"])]
        );
        assert_eq!(segments("#"), vec![Segment::Paragraph(vec!["#"])]);
    }

    #[test]
    fn it_splits_list_items() {
        let document = "- first\n    - nested\n12.  twelfth\n1. ";
        assert_eq!(
            segments(document),
            vec![
                Segment::ListItem {
                    kind: ListKind::Unordered,
                    prefix: "- ",
                    text: "first"
                },
                Segment::ListItem {
                    kind: ListKind::Unordered,
                    prefix: "    - ",
                    text: "nested"
                },
                Segment::ListItem {
                    kind: ListKind::Ordered,
                    prefix: "12.  ",
                    text: "twelfth"
                },
                Segment::ListItem {
                    kind: ListKind::Ordered,
                    prefix: "1. ",
                    text: ""
                },
            ]
        );
    }

    #[test]
    fn it_requires_whitespace_after_list_markers() {
        assert_eq!(
            segments("-not a list\n1.5 million"),
            vec![Segment::Paragraph(vec!["-not a list", "1.5 million"])]
        );
    }

    #[test]
    fn it_groups_paragraph_lines() {
        let document = "One.\nTwo.\n\nThree.";
        assert_eq!(
            segments(document),
            vec![
                Segment::Paragraph(vec!["One.", "Two."]),
                Segment::Literal(""),
                Segment::Paragraph(vec!["Three."]),
            ]
        );
    }

    #[test]
    fn it_starts_a_new_paragraph_with_the_overflowing_line() {
        let first = "a".repeat(1000);
        let second = "b".repeat(799);
        let third = "c".repeat(10);
        let document = format!("{first}\n{second}\n{third}");

        // 1000 + 1 + 799 == 1800 fits; adding the third line would not.
        assert_eq!(
            segments(&document),
            vec![
                Segment::Paragraph(vec![first.as_str(), second.as_str()]),
                Segment::Paragraph(vec![third.as_str()]),
            ]
        );
    }

    #[test]
    fn it_counts_characters_not_bytes() {
        let first = "字".repeat(1000);
        let second = "字".repeat(799);
        let document = format!("{first}\n{second}");
        assert_eq!(
            segments(&document),
            vec![Segment::Paragraph(vec![first.as_str(), second.as_str()])]
        );
    }

    #[test]
    fn it_keeps_overlong_lines_whole() {
        let line = "x".repeat(MAX_CHUNK_CHARS * 2);
        assert_eq!(segments(&line), vec![Segment::Paragraph(vec![line.as_str()])]);
    }

    #[test]
    fn it_returns_source_lines() {
        let document = indoc! {"
            ```
            code
            ```
            # Title
            1. item
            text"};
        let lines: Vec<String> = segments(document).iter().flat_map(Segment::lines).collect();
        assert_eq!(lines.join("\n"), document);
    }
}
