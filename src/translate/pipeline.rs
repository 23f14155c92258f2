//! Translates whole documents, segment by segment.

use crate::text::normalize_newlines;
use crate::translate::checkpoint::{Checkpoint, NoCheckpoint};
use crate::translate::segment::{Segment, Segments};
use crate::translate::{TranslateResult, Translator};
use log::{debug, warn};

/// Translates a Markdown document one [segment](Segment) at a time.
///
/// Segments are translated strictly in document order, one translator
/// call per heading, list item, or paragraph chunk. Verbatim segments
/// are copied through without calling the translator at all, as are
/// headings and list items with nothing after their marker.
///
/// The first failed translator call ends the run.
#[derive(Debug)]
pub struct Pipeline<T: Translator, C: Checkpoint = NoCheckpoint> {
    translator: T,
    checkpoint: C,
}

impl<T: Translator> Pipeline<T> {
    /// Creates a pipeline that translates with `translator`.
    pub fn new(translator: T) -> Self {
        Self {
            translator,
            checkpoint: NoCheckpoint,
        }
    }
}

impl<T: Translator, C: Checkpoint> Pipeline<T, C> {
    /// Saves the translated prefix to `checkpoint` after every
    /// translator call.
    ///
    /// Checkpoints are best effort: failures are logged and translation
    /// continues.
    pub fn checkpoint<D: Checkpoint>(self, checkpoint: D) -> Pipeline<T, D> {
        Pipeline {
            translator: self.translator,
            checkpoint,
        }
    }

    /// Translates `source` and returns the translated [document].
    ///
    /// Windows and classic Mac line endings are normalized first.
    pub async fn run(&self, source: &str) -> TranslateResult<String> {
        Ok(document(&self.translate_lines(source).await?))
    }

    /// Translates `source` and returns the translated lines.
    ///
    /// Translated paragraphs may have more or fewer lines than the
    /// original, and translated headings or list items may span several
    /// lines, so the result is not line-for-line with `source`.
    pub async fn translate_lines(&self, source: &str) -> TranslateResult<Vec<String>> {
        let source = normalize_newlines(source);
        let mut out: Vec<String> = Vec::new();

        for segment in Segments::new(&source) {
            match segment {
                Segment::Heading { prefix, text } | Segment::ListItem { prefix, text, .. }
                    if !text.trim().is_empty() =>
                {
                    let translated = self.translator.translate(text).await?;
                    out.push(format!("{prefix}{translated}"));
                    self.save(&out);
                }
                Segment::Paragraph(lines) => {
                    let chunk = lines.join("\n");
                    let chunk = chunk.trim_matches('\n');
                    if chunk.is_empty() {
                        continue;
                    }
                    let translated = self.translator.translate(chunk).await?;
                    out.extend(translated.split('\n').map(String::from));
                    self.save(&out);
                }
                _ => out.extend(segment.lines()),
            }
        }

        Ok(out)
    }

    fn save(&self, lines: &[String]) {
        debug!("checkpointing {} lines", lines.len());
        if let Err(err) = self.checkpoint.save(&document(lines)) {
            warn!("could not save partial translation: {err}");
        }
    }
}

/// Assembles lines into a document.
///
/// Trailing whitespace is trimmed and exactly one newline is appended.
///
/// # Examples
///
/// ```
/// use xpost::translate::document;
/// let lines = vec![String::from("# 标题"), String::new(), String::new()];
/// assert_eq!(document(&lines), "# 标题\n");
/// ```
pub fn document(lines: &[String]) -> String {
    format!("{}\n", lines.join("\n").trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockTranslator, RecordingCheckpoint};
    use crate::translate::TranslateError;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn it_translates_a_document() {
        let source = indoc! {"
            # Release notes

            We shipped a new build.
            It is faster.

            - Smaller binary
            2. Better logs
            ---
            https://example.com/changelog
        "};
        let expected = indoc! {"
            # RELEASE NOTES

            WE SHIPPED A NEW BUILD.
            IT IS FASTER.

            - SMALLER BINARY
            2. BETTER LOGS
            ---
            https://example.com/changelog
        "};
        let translator = MockTranslator::new();
        let actual = Pipeline::new(&translator).run(source).await.unwrap();
        assert_eq!(actual, expected);
        assert_eq!(
            translator.calls(),
            vec![
                "Release notes",
                "We shipped a new build.\nIt is faster.",
                "Smaller binary",
                "Better logs",
            ]
        );
    }

    #[tokio::test]
    async fn it_never_touches_code_fences() {
        let source = indoc! {"
            Run this:
            ```sh
              # install it
            - cargo install xpost
            https://example.com
            ```
            Then relax.
        "};
        let translator = MockTranslator::new();
        let actual = Pipeline::new(&translator).run(source).await.unwrap();

        let fenced = |doc: &str| -> Vec<String> {
            doc.lines()
                .skip_while(|l| !l.starts_with("```"))
                .take(5)
                .map(String::from)
                .collect()
        };
        assert_eq!(fenced(&actual), fenced(source));
        assert_eq!(translator.calls(), vec!["Run this:", "Then relax."]);
    }

    #[tokio::test]
    async fn it_preserves_structural_markers() {
        let source = indoc! {"
            ## Steps
               - indented bullet
            10.  tenth step
            ### Done
        "};
        let translator = MockTranslator::new();
        let actual = Pipeline::new(&translator).run(source).await.unwrap();
        let markers = |doc: &str| -> Vec<String> {
            doc.lines()
                .map(|l| {
                    l.chars()
                        .take_while(|c| !c.is_alphabetic())
                        .collect::<String>()
                })
                .collect()
        };
        assert_eq!(markers(&actual), markers(source));
        assert_eq!(actual.lines().nth(2), Some("10.  TENTH STEP"));
    }

    #[tokio::test]
    async fn it_leaves_documents_of_urls_and_blank_lines_unchanged() {
        let source = "https://a.example.com\n\n   \nhttp://b.example.com/x?y=z\n";
        let translator = MockTranslator::new();
        let actual = Pipeline::new(&translator).run(source).await.unwrap();
        assert_eq!(actual, source);
        assert!(translator.calls().is_empty());
    }

    #[tokio::test]
    async fn it_does_not_translate_empty_list_items() {
        let translator = MockTranslator::new();
        let actual = Pipeline::new(&translator).run("1. \n# ").await.unwrap();
        assert_eq!(actual, "1. \n#\n");
        assert!(translator.calls().is_empty());
    }

    #[tokio::test]
    async fn it_flushes_before_the_overflowing_line() {
        let first = "a".repeat(1200);
        let second = "b".repeat(700);
        let source = format!("{first}\n{second}\n");
        let translator = MockTranslator::new();
        Pipeline::new(&translator).run(&source).await.unwrap();
        assert_eq!(translator.calls(), vec![first, second]);
    }

    #[tokio::test]
    async fn it_normalizes_line_endings() {
        let translator = MockTranslator::new();
        let actual = Pipeline::new(&translator)
            .run("# Title\r\nBody\rMore")
            .await
            .unwrap();
        assert_eq!(actual, "# TITLE\nBODY\nMORE\n");
    }

    #[tokio::test]
    async fn it_allows_translations_to_change_the_line_count() {
        let translator = MockTranslator::new().with_reply("第一行\n第二行\n第三行");
        let actual = Pipeline::new(&translator)
            .run("One line.\n\n- item")
            .await
            .unwrap();
        assert_eq!(actual, "第一行\n第二行\n第三行\n\n- 第一行\n第二行\n第三行\n");
    }

    #[tokio::test]
    async fn it_checkpoints_after_every_translation() {
        let translator = MockTranslator::new();
        let checkpoint = RecordingCheckpoint::new();
        Pipeline::new(&translator)
            .checkpoint(&checkpoint)
            .run("# Title\n\nBody\n\n- item\n")
            .await
            .unwrap();
        assert_eq!(
            checkpoint.saved(),
            vec![
                "# TITLE\n",
                "# TITLE\n\nBODY\n",
                "# TITLE\n\nBODY\n\n- ITEM\n",
            ]
        );
    }

    #[tokio::test]
    async fn it_keeps_the_last_checkpoint_when_translation_fails() {
        let translator = MockTranslator::new().failing_on("Broken");
        let checkpoint = RecordingCheckpoint::new();
        let result = Pipeline::new(&translator)
            .checkpoint(&checkpoint)
            .run("# Fine\n\nBroken paragraph\n\n- never reached\n")
            .await;
        assert!(matches!(result, Err(TranslateError::Other(_))));
        assert_eq!(checkpoint.saved(), vec!["# FINE\n"]);
        assert_eq!(translator.calls().len(), 2);
    }

    #[test]
    fn it_assembles_documents() {
        let lines: Vec<String> = ["a", "", "b  ", ""].map(String::from).to_vec();
        assert_eq!(document(&lines), "a\n\nb\n");
        assert_eq!(document(&[]), "\n");
    }
}
