use crate::error::{Error, Result};
use crate::http::HTTPError;
use crate::ident::PostRef;
use crate::translate::{Checkpoint, TranslateError, TranslateResult, Translator};
use crate::twitter::Service;
use reqwest::StatusCode;
use std::fs;
use std::io;
use std::sync::Mutex;

pub fn do_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn load_data(file: &str) -> String {
    fs::read_to_string(format!("tests/data/{file}.json")).expect("could not find test data")
}

/// Serves posts from `tests/data/{id}.json`, or a 404 if there is no
/// such file.
pub struct TestService;

impl TestService {
    pub fn new() -> Self {
        Self
    }
}

impl Service for TestService {
    async fn get_post(&self, post: &PostRef) -> Result<String> {
        fs::read_to_string(format!("tests/data/{}.json", post.id())).map_err(|_| {
            Error::Request(HTTPError::Status {
                status: StatusCode::NOT_FOUND,
                body: String::from(r#"{"error":"not found"}"#),
            })
        })
    }
}

/// "Translates" text by upper-casing it, and remembers what it was asked
/// to translate.
pub struct MockTranslator {
    calls: Mutex<Vec<String>>,
    reply: Option<String>,
    fail_on: Option<String>,
}

impl MockTranslator {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            reply: None,
            fail_on: None,
        }
    }

    /// Answers every call with `reply`.
    pub fn with_reply(self, reply: &str) -> Self {
        let reply = Some(reply.to_string());
        Self { reply, ..self }
    }

    /// Fails any call whose text contains `needle`.
    pub fn failing_on(self, needle: &str) -> Self {
        let fail_on = Some(needle.to_string());
        Self { fail_on, ..self }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Translator for MockTranslator {
    async fn translate(&self, text: &str) -> TranslateResult<String> {
        self.calls.lock().unwrap().push(text.to_string());
        if let Some(needle) = &self.fail_on {
            if text.contains(needle.as_str()) {
                return Err(TranslateError::Other(format!("cannot translate {text:?}")));
            }
        }
        Ok(self.reply.clone().unwrap_or_else(|| text.to_uppercase()))
    }
}

/// Remembers every checkpoint.
pub struct RecordingCheckpoint {
    saved: Mutex<Vec<String>>,
}

impl RecordingCheckpoint {
    pub fn new() -> Self {
        Self {
            saved: Mutex::new(Vec::new()),
        }
    }

    pub fn saved(&self) -> Vec<String> {
        self.saved.lock().unwrap().clone()
    }
}

impl Checkpoint for RecordingCheckpoint {
    fn save(&self, document: &str) -> io::Result<()> {
        self.saved.lock().unwrap().push(document.to_string());
        Ok(())
    }
}
