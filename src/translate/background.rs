//! Runs translations in a separate process.
//!
//! Translating a long article can take minutes, much longer than it takes
//! to fetch it. The `fetch` command hands translation off to a detached
//! `xpost translate` child so that it can return as soon as the source
//! document is written.

use log::debug;
use std::env;
use std::ffi::{OsStr, OsString};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::process::{Child, Command};

/// A translation of one Markdown file into another.
#[derive(Clone, Debug, PartialEq)]
pub struct TranslationJob {
    input: PathBuf,
    output: PathBuf,
    lang: String,
    timeout: Duration,
}

impl TranslationJob {
    /// The per-call timeout given to background translations.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// A job translating `input` into `lang`, writing to `output`.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>, lang: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            lang: lang.into(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets the timeout for each translator call.
    pub fn timeout(self, timeout: Duration) -> Self {
        Self { timeout, ..self }
    }

    /// The file the translation is written to.
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// The target language.
    pub fn lang(&self) -> &str {
        &self.lang
    }

    /// Command-line arguments for an `xpost` process running this job.
    pub fn args(&self) -> Vec<OsString> {
        vec![
            OsString::from("translate"),
            OsString::from("--in"),
            self.input.clone().into_os_string(),
            OsString::from("--out"),
            self.output.clone().into_os_string(),
            OsString::from("--to"),
            OsString::from(&self.lang),
            OsString::from("--timeout"),
            OsString::from(self.timeout.as_secs_f64().to_string()),
        ]
    }

    /// Starts this job in a child process running the current executable.
    pub fn spawn(&self) -> io::Result<PendingTranslation> {
        self.spawn_with(env::current_exe()?)
    }

    /// Starts this job in a child process running `program`, which must
    /// accept the same arguments as `xpost`.
    ///
    /// The child's standard streams are closed and it is placed in its own
    /// process group, so it keeps running after this process exits.
    pub fn spawn_with(&self, program: impl AsRef<OsStr>) -> io::Result<PendingTranslation> {
        let mut command = Command::new(program);
        command
            .args(self.args())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        #[cfg(unix)]
        command.process_group(0);

        let child = command.spawn()?;
        debug!(
            "started translation into {} as process {:?}",
            self.lang,
            child.id()
        );
        Ok(PendingTranslation {
            child,
            output: self.output.clone(),
        })
    }
}

/// A translation running in a child process.
///
/// Dropping this value does not stop the child.
#[derive(Debug)]
pub struct PendingTranslation {
    child: Child,
    output: PathBuf,
}

impl PendingTranslation {
    /// The file the translation is being written to.
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// The child's process ID, if it is still running.
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Waits for the translation to finish.
    pub async fn wait(mut self) -> io::Result<ExitStatus> {
        self.child.wait().await
    }
}
