//! Helpful utilities for working with text.

use regex::Regex;
use std::sync::LazyLock;

static LINE_BREAKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\t\n\r]+").expect("invalid line break pattern"));
static ILLEGAL_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[\\/:*?"<>|]"#).expect("invalid illegal char pattern"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("invalid whitespace pattern"));
static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9._-]").expect("invalid unsafe char pattern"));
static DASHES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-+").expect("invalid dash pattern"));

/// Filename used when a title has no usable characters.
pub const DEFAULT_SLUG: &str = "post";

/// Longest slug produced by [`slugify`].
pub const MAX_SLUG_LEN: usize = 120;

const SLUG_SEPARATORS: &[char] = &['-', '.', '_'];

/// Converts Windows and classic Mac line endings into `\n`.
///
/// # Examples
///
/// ```
/// use xpost::text::normalize_newlines;
/// assert_eq!(normalize_newlines("a\r\nb\rc\n"), "a\nb\nc\n");
/// ```
pub fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Turns a post title into a conservative, filesystem-safe file name
/// (without an extension).
///
/// Only ASCII letters, digits, `.`, `_` and `-` survive; whitespace
/// becomes a single dash. The result is never empty and never longer than
/// [`MAX_SLUG_LEN`].
///
/// # Examples
///
/// ```
/// use xpost::text::slugify;
/// assert_eq!(slugify("  How I Built: A <Thing>?  "), "How-I-Built-A-Thing");
/// assert_eq!(slugify("日本語のタイトル"), "post");
/// ```
pub fn slugify(title: &str) -> String {
    let s = title.trim();
    if s.is_empty() {
        return String::from(DEFAULT_SLUG);
    }

    let s = LINE_BREAKS.replace_all(s, " ");
    let s = ILLEGAL_CHARS.replace_all(&s, "");
    let s = WHITESPACE.replace_all(&s, " ");
    let s = s.trim().replace(' ', "-");
    let s = UNSAFE_CHARS.replace_all(&s, "");
    let s = DASHES.replace_all(&s, "-");
    let s = s.trim_matches(SLUG_SEPARATORS);

    if s.is_empty() {
        String::from(DEFAULT_SLUG)
    } else if s.len() > MAX_SLUG_LEN {
        // Only ASCII remains at this point, so byte slicing is safe.
        String::from(s[..MAX_SLUG_LEN].trim_end_matches(SLUG_SEPARATORS))
    } else {
        String::from(s)
    }
}

/// Guesses whether Markdown text is predominantly English and therefore
/// worth translating.
///
/// Short documents (under 400 characters) are always assumed to need
/// translation. Longer documents must be at least 90% ASCII. Empty text
/// never needs translation.
pub fn looks_english(markdown: &str) -> bool {
    const MIN_LEN: usize = 400;
    const ASCII_RATIO: f64 = 0.90;

    let s = markdown.trim();
    if s.is_empty() {
        return false;
    }
    let total = s.chars().count();
    if total < MIN_LEN {
        return true;
    }
    let ascii = s.chars().filter(char::is_ascii).count();
    (ascii as f64 / total as f64) >= ASCII_RATIO
}
