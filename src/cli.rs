//! Drives the command-line program.
//!
//! Besides its regular output, `xpost fetch` reports what it wrote on
//! stderr in a line-oriented format meant for scripts:
//!
//! | Line | Meaning |
//! |---|---|
//! | `OUTPUT_EN=<path>` | The extracted document was written to `path` |
//! | `OUTPUT_ZH_PENDING=<path>` | A Chinese translation is being written to `path` |
//! | `OUTPUT_TRANSLATED_PENDING=<path>` | A translation into another language is being written to `path` |
//! | `OUTPUT_ZH=<path>` | With `--wait`, the Chinese translation finished |
//! | `OUTPUT_TRANSLATED=<path>` | With `--wait`, the translation finished |
//! | `OUTPUT_ZH=NONE` | No translation will be written |
//! | `NOTE: ...` | Informational messages |
//! | `WARN: ...` | Translation problems that did not fail the command |

use crate::conf::{self, OpenAIConfig};
use crate::error::{Error, Result};
use crate::ident::PostRef;
use crate::text::{looks_english, slugify};
use crate::translate::{AtomicWriter, OpenAITranslator, Pipeline, TranslationJob};
use crate::twitter::extract::{ExtractMode, article_title, extract};
use crate::twitter::{FxTwitterService, Post, PostClient, PostResponse, ViewerService};
use clap::{ArgGroup, Args, Parser, Subcommand};
use clap_verbosity_flag::Verbosity;
use log::{debug, info};
use serde_json::{Value, json};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

/// Prints `message` as an error and exits with `error_code`.
pub fn die(error_code: i32, message: &str) -> ! {
    eprintln!("ERROR: {message}");
    process::exit(error_code);
}

/// Program configuration.
#[derive(Debug, Parser)]
#[command(version)]
#[command(about = "Fetches X/Twitter posts and articles, and translates them as Markdown", long_about = None)]
pub struct Config {
    #[command(flatten)]
    verbosity: Verbosity,

    #[command(subcommand)]
    command: Command,
}

impl Config {
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch a post from FxTwitter, optionally extracting its text or article
    Fetch(FetchConfig),

    /// Translate a Markdown file, keeping its structure intact
    Translate(TranslateConfig),

    /// Fetch posts and timelines from twitter-viewer.com
    Viewer(ViewerConfig),
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("source").required(true).args(["username", "url", "message"])))]
struct FetchConfig {
    /// Post author's handle (requires --tweet-id)
    #[arg(long, requires = "tweet_id")]
    username: Option<String>,

    /// Post identifier
    #[arg(long, value_name = "ID")]
    tweet_id: Option<String>,

    /// Post URL (x.com or twitter.com)
    #[arg(long)]
    url: Option<String>,

    /// Free-form text containing a post URL
    #[arg(long, value_name = "TEXT")]
    message: Option<String>,

    /// FxTwitter API base URL
    #[arg(long, value_name = "URL", default_value = FxTwitterService::DEFAULT_BASE)]
    base: String,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", default_value = "30", value_parser = parse_seconds)]
    timeout: Duration,

    /// Pretty-print JSON output
    #[arg(long, default_value_t = false)]
    pretty: bool,

    /// Print the response body exactly as received
    #[arg(long, default_value_t = false)]
    raw: bool,

    /// Extract content instead of printing JSON
    #[arg(long, value_enum, value_name = "MODE")]
    extract: Option<ExtractMode>,

    /// Write extracted content to this file
    #[arg(long, value_name = "PATH")]
    out: Option<PathBuf>,

    /// Write extracted content to a file named after the article in this
    /// directory (ignored if --out is set)
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Translate the written file into LANG [default: zh]
    #[arg(long, value_name = "LANG", num_args = 0..=1, default_missing_value = "zh")]
    translate: Option<String>,

    /// Language for automatic translation of full articles written with
    /// --out-dir; empty to disable
    #[arg(long, value_name = "LANG", default_value = "zh")]
    translate_default: String,

    /// Wait for the translation to finish before exiting
    #[arg(long, default_value_t = false)]
    wait: bool,
}

impl FetchConfig {
    fn post_ref(&self) -> Result<PostRef> {
        if let Some(username) = &self.username {
            let id = self.tweet_id.as_deref().unwrap_or_default().trim();
            if id.is_empty() {
                return Err(Error::IdentifierNotFound(format!("a post identifier for @{username}")));
            }
            let username = username.trim().trim_start_matches('@');
            return Ok(PostRef::with_handle(username, id));
        }

        let text = self.url.as_deref().or(self.message.as_deref()).unwrap_or_default();
        PostRef::parse(text)
            .ok_or_else(|| Error::IdentifierNotFound(format!("a post identifier in {text:?}")))
    }

    /// The language to translate the written file into, if any.
    ///
    /// An empty string means translation was wanted but disabled.
    fn translation_lang(&self, mode: ExtractMode) -> Option<String> {
        let requested = self.translate.is_some();
        let automatic = !requested
            && !self.translate_default.trim().is_empty()
            && mode == ExtractMode::ArticleFull
            && self.out.is_none()
            && self.out_dir.is_some();

        if !requested && !automatic {
            return None;
        }

        let lang = self
            .translate
            .as_deref()
            .filter(|lang| !lang.trim().is_empty())
            .unwrap_or(&self.translate_default);
        Some(lang.trim().to_string())
    }

    /// Where extracted content is written, or `None` for stdout.
    fn out_path(&self, post_ref: &PostRef, post: &Post) -> Option<PathBuf> {
        if let Some(out) = &self.out {
            return Some(out.clone());
        }
        let dir = self.out_dir.as_ref()?;
        let name = article_title(post).map(String::from).unwrap_or_else(|| {
            format!("{}_{}", post_ref.handle().unwrap_or_default(), post_ref.id())
        });
        Some(dir.join(format!("{}.md", slugify(&name))))
    }
}

#[derive(Args, Debug)]
struct TranslateConfig {
    /// Markdown file to translate
    #[arg(long = "in", value_name = "PATH")]
    input: PathBuf,

    /// File to write the translation to
    #[arg(long = "out", value_name = "PATH")]
    output: PathBuf,

    /// Target language
    #[arg(long, value_name = "LANG", default_value = "zh")]
    to: String,

    /// Timeout for each translation request, in seconds
    #[arg(long, value_name = "SECS", default_value = "30", value_parser = parse_seconds)]
    timeout: Duration,
}

#[derive(Args, Debug)]
struct ViewerConfig {
    #[command(subcommand)]
    command: ViewerSubcommand,

    /// twitter-viewer.com base URL
    #[arg(long, value_name = "URL", default_value = ViewerService::DEFAULT_BASE, global = true)]
    base: String,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", default_value = "15", value_parser = parse_seconds, global = true)]
    timeout: Duration,

    /// Pretty-print JSON output
    #[arg(long, default_value_t = false, global = true)]
    pretty: bool,

    /// Write JSON to this file instead of stdout
    #[arg(long, value_name = "PATH", global = true)]
    out: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum ViewerSubcommand {
    /// Fetch a single post
    #[command(group(ArgGroup::new("source").required(true).args(["tweet_id", "message"])))]
    Tweet {
        /// Post identifier
        #[arg(long, value_name = "ID")]
        tweet_id: Option<String>,

        /// Free-form text containing a post URL or identifier
        #[arg(long, value_name = "TEXT")]
        message: Option<String>,
    },

    /// Fetch a page of a user's posts
    User {
        /// Username, with or without a leading @
        #[arg(long)]
        username: String,

        /// Pagination cursor from the previous page
        #[arg(long, default_value = "")]
        cursor: String,
    },
}

fn parse_seconds(s: &str) -> std::result::Result<Duration, String> {
    let secs: f64 = s.parse().map_err(|_| format!("{s:?} is not a number of seconds"))?;
    Duration::try_from_secs_f64(secs).map_err(|_| format!("{s:?} is not a valid timeout"))
}

/// Runs the command-line program.
#[derive(Debug)]
pub struct Runner {
    config: Config,
    translate_program: Option<PathBuf>,
}

impl Runner {
    /// Create a new program runner using the given `config`.
    pub fn new(config: Config) -> Runner {
        Self {
            config,
            translate_program: None,
        }
    }

    /// Runs background translations with `program` instead of the
    /// current executable.
    #[cfg(test)]
    fn translate_program(self, program: impl Into<PathBuf>) -> Self {
        let translate_program = Some(program.into());
        Self {
            translate_program,
            ..self
        }
    }

    /// Run the command-line program using its stored configuration options.
    pub async fn run(&self) -> Result<()> {
        self.run_with(&mut io::stdout(), &mut io::stderr()).await
    }

    /// Runs the program, writing its output to `out` and its status lines
    /// to `status`.
    pub async fn run_with(&self, out: &mut impl Write, status: &mut impl Write) -> Result<()> {
        match &self.config.command {
            Command::Fetch(config) => self.run_fetch(config, out, status).await,
            Command::Translate(config) => self.run_translate(config).await,
            Command::Viewer(config) => self.run_viewer(config, out).await,
        }
    }

    async fn run_fetch(
        &self,
        config: &FetchConfig,
        out: &mut impl Write,
        status: &mut impl Write,
    ) -> Result<()> {
        let post_ref = config.post_ref()?;
        let service = FxTwitterService::new(&config.base, config.timeout)?;
        let client = PostClient::new(service);

        if config.raw {
            writeln!(out, "{}", client.fetch_raw(&post_ref).await?)?;
            return Ok(());
        }

        let mut value = client.fetch_json(&post_ref).await?;
        let resolved = match PostResponse::from_value(value.clone()) {
            Ok(response) => response.into_post().resolve(),
            Err(err) if config.extract.is_none() => {
                debug!("not following quotes in unrecognized response: {err}");
                return write_json(&value, config.pretty, out);
            }
            Err(err) => return Err(err.into()),
        };

        if resolved.followed_quote() {
            if let Some(followed) = resolved.followed() {
                writeln!(status, "NOTE: followed_quote={followed}")?;
            }
            if let Some(quote) = value.pointer_mut("/tweet/quote").map(Value::take) {
                value = json!({ "tweet": quote });
            }
        }

        match config.extract {
            Some(mode) => {
                self.run_extract(config, &post_ref, resolved.post(), mode, out, status)
                    .await
            }
            None => write_json(&value, config.pretty, out),
        }
    }

    async fn run_extract(
        &self,
        config: &FetchConfig,
        post_ref: &PostRef,
        post: &Post,
        mode: ExtractMode,
        out: &mut impl Write,
        status: &mut impl Write,
    ) -> Result<()> {
        let rendered = extract(post, mode);

        let Some(out_path) = config.out_path(post_ref, post) else {
            write!(out, "{rendered}")?;
            return Ok(());
        };

        if let Some(dir) = out_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        fs::write(&out_path, &rendered)?;
        info!("wrote {} bytes to {}", rendered.len(), out_path.display());

        if let Some(lang) = config.translation_lang(mode) {
            self.start_translation(&out_path, &rendered, &lang, config.wait, status)
                .await?;
        }

        writeln!(out, "{}", out_path.display())?;
        writeln!(status, "OUTPUT_EN={}", out_path.display())?;
        Ok(())
    }

    /// Translates the file at `path` in the background.
    ///
    /// Translation problems are reported on `status` but never fail the
    /// command; only failing to write to `status` does.
    async fn start_translation(
        &self,
        path: &Path,
        rendered: &str,
        lang: &str,
        wait: bool,
        status: &mut impl Write,
    ) -> io::Result<()> {
        if lang.is_empty() {
            writeln!(status, "NOTE: translation disabled (empty lang)")?;
            return writeln!(status, "OUTPUT_ZH=NONE");
        }

        if !looks_english(rendered) {
            writeln!(status, "NOTE: translation skipped (source does not look English)")?;
            return writeln!(status, "OUTPUT_ZH=NONE");
        }

        if let Err(err) = OpenAIConfig::from_env() {
            writeln!(status, "WARN: translation spawn failed (NO_OPENAI_KEY): {err}")?;
            return writeln!(status, "OUTPUT_ZH=NONE");
        }

        let job = TranslationJob::new(path, conf::translated_path(path, lang), lang);
        let spawned = match &self.translate_program {
            Some(program) => job.spawn_with(program),
            None => job.spawn(),
        };
        let pending = match spawned {
            Ok(pending) => pending,
            Err(err) => {
                writeln!(status, "WARN: translation spawn failed (TRANSLATE_FAIL): {err}")?;
                return writeln!(status, "OUTPUT_ZH=NONE");
            }
        };

        let key = if job.lang() == "zh" {
            "OUTPUT_ZH"
        } else {
            "OUTPUT_TRANSLATED"
        };
        writeln!(status, "{key}_PENDING={}", pending.output().display())?;

        if !wait {
            debug!("not waiting for translation process {:?}", pending.id());
            return Ok(());
        }

        let output = pending.output().to_path_buf();
        match pending.wait().await {
            Ok(exit) if exit.success() => writeln!(status, "{key}={}", output.display()),
            Ok(exit) => {
                writeln!(status, "WARN: translation failed ({exit})")?;
                writeln!(status, "OUTPUT_ZH=NONE")
            }
            Err(err) => {
                writeln!(status, "WARN: translation failed ({err})")?;
                writeln!(status, "OUTPUT_ZH=NONE")
            }
        }
    }

    async fn run_translate(&self, config: &TranslateConfig) -> Result<()> {
        let openai = OpenAIConfig::from_env()?;
        let source = fs::read_to_string(&config.input).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => Error::InputNotFound(config.input.clone()),
            _ => Error::Io(err),
        })?;

        let (client, model) = openai.into_client(config.timeout)?;
        let translator = OpenAITranslator::new(client, &config.to).model(model);
        info!(
            "translating {} into {}",
            config.input.display(),
            translator.lang()
        );
        let writer = AtomicWriter::new(&config.output);

        let translated = Pipeline::new(&translator)
            .checkpoint(&writer)
            .run(&source)
            .await?;
        writer.write(&translated)?;
        info!("wrote translation to {}", writer.path().display());
        Ok(())
    }

    async fn run_viewer(&self, config: &ViewerConfig, out: &mut impl Write) -> Result<()> {
        let service = ViewerService::new(&config.base, config.timeout)?;
        let body = match &config.command {
            ViewerSubcommand::Tweet { tweet_id, message } => {
                let text = tweet_id.as_deref().or(message.as_deref()).unwrap_or_default();
                let post_ref = PostRef::parse(text).ok_or_else(|| {
                    Error::IdentifierNotFound(format!("a post identifier in {text:?}"))
                })?;
                PostClient::new(service).fetch_raw(&post_ref).await?
            }
            ViewerSubcommand::User { username, cursor } => {
                service.get_user_tweets(username, cursor).await?
            }
        };
        let value: Value = serde_json::from_str(&body)?;
        match &config.out {
            Some(path) => {
                let mut file = fs::File::create(path)?;
                write_json(&value, config.pretty, &mut file)
            }
            None => write_json(&value, config.pretty, out),
        }
    }
}

fn write_json(value: &Value, pretty: bool, out: &mut impl Write) -> Result<()> {
    let payload = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    writeln!(out, "{payload}")?;
    Ok(())
}
