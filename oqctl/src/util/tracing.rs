//! Log output
// (c) 2026 oqctl developers

use std::{
    fs::File,
    io::Write,
    path::PathBuf,
    sync::atomic::{AtomicBool, Ordering},
    sync::{Arc, Mutex},
};

use anyhow::Context as _;
use indicatif::MultiProgress;
use serde::{Deserialize, Serialize, de};
use strum::VariantNames as _;
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{
        MakeWriter,
        time::{ChronoLocal, ChronoUtc},
    },
    prelude::*,
};

use crate::cli::styles::maybe_strip_color;

static LOGGING_INITIALIZED: AtomicBool = AtomicBool::new(false);

const FRIENDLY_FORMAT_LOCAL: &str = "%Y-%m-%d %H:%M:%SL";
const FRIENDLY_FORMAT_UTC: &str = "%Y-%m-%d %H:%M:%SZ";

/// Environment variable that controls what gets logged to stderr
const STANDARD_ENV_VAR: &str = "RUST_LOG";
/// Environment variable that controls what gets logged to file
const LOG_FILE_DETAIL_ENV_VAR: &str = "RUST_LOG_FILE_DETAIL";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Selects the format of time stamps in output messages
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Eq,
    PartialEq,
    strum::Display,
    strum::EnumString,
    strum::VariantNames,
    clap::ValueEnum,
    Serialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "kebab-case")]
pub enum TimeFormat {
    /// Local time, as "year-month-day HH:MM:SS"
    #[default]
    Local,
    /// UTC time, as "year-month-day HH:MM:SS"
    Utc,
    /// Local time, in the format described in [RFC 3339](https://datatracker.ietf.org/doc/html/rfc3339).
    Rfc3339,
}

impl<'de> Deserialize<'de> for TimeFormat {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        std::str::FromStr::from_str(&s.to_ascii_lowercase())
            .map_err(|_| de::Error::unknown_variant(&s, TimeFormat::VARIANTS))
    }
}

/// The log level to use for a given set of [`Parameters`](crate::client::Parameters)
pub(crate) fn trace_level(args: &crate::client::Parameters) -> &'static str {
    if args.debug {
        "debug"
    } else if args.quiet {
        "error"
    } else {
        "info"
    }
}

/// Where console log lines go
#[derive(Debug, Clone)]
pub(crate) enum ConsoleLog {
    /// Straight to stderr
    Stderr,
    /// Through a [`MultiProgress`], so log lines don't tear up spinners
    Progress(MultiProgress),
    /// Nowhere
    #[cfg(test)]
    Off,
}

/// What to log, and where
#[derive(Debug, Clone)]
pub(crate) struct LogSettings {
    /// Default level for our own events, unless overridden by `RUST_LOG`
    pub(crate) level: &'static str,
    pub(crate) console: ConsoleLog,
    /// Also log to this file
    pub(crate) file: Option<PathBuf>,
    pub(crate) time_format: TimeFormat,
    pub(crate) ansi: bool,
}

/// An [`EnvFilter`], and whether it came from the environment
struct ChosenFilter {
    filter: EnvFilter,
    from_env: bool,
}

/// Reads the filter from `key` if set; otherwise logs only oqctl events at `level`.
fn filter_for(level: &str, key: &str) -> anyhow::Result<ChosenFilter> {
    match std::env::var(key) {
        Ok(spec) => EnvFilter::try_new(&spec)
            .map(|filter| ChosenFilter {
                filter,
                from_env: true,
            })
            .with_context(|| format!("{key} (set in environment) was not understood")),
        Err(_) => Ok(ChosenFilter {
            filter: EnvFilter::try_new(format!("oqctl={level}"))?,
            from_env: false,
        }),
    }
}

fn make_layer<W>(writer: W, filter: ChosenFilter, time_format: TimeFormat, ansi: bool) -> BoxedLayer
where
    W: for<'writer> MakeWriter<'writer> + 'static + Sync + Send,
{
    // Targets are only interesting when the filter may let other crates through
    let layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_target(filter.from_env)
        .with_ansi(ansi);

    // The timer changes the layer's type, hence the repetition
    match time_format {
        TimeFormat::Local => layer
            .with_timer(ChronoLocal::new(FRIENDLY_FORMAT_LOCAL.into()))
            .with_writer(writer)
            .with_filter(filter.filter)
            .boxed(),
        TimeFormat::Utc => layer
            .with_timer(ChronoUtc::new(FRIENDLY_FORMAT_UTC.into()))
            .with_writer(writer)
            .with_filter(filter.filter)
            .boxed(),
        TimeFormat::Rfc3339 => layer
            .with_timer(ChronoLocal::rfc_3339())
            .with_writer(writer)
            .with_filter(filter.filter)
            .boxed(),
    }
}

fn build_layers(settings: &LogSettings) -> anyhow::Result<Vec<BoxedLayer>> {
    let mut layers = Vec::new();

    let filter = filter_for(settings.level, STANDARD_ENV_VAR)?;
    match &settings.console {
        ConsoleLog::Stderr => layers.push(make_layer(
            std::io::stderr,
            filter,
            settings.time_format,
            settings.ansi,
        )),
        ConsoleLog::Progress(mp) => layers.push(make_layer(
            ProgressWriter::wrap(mp.clone()),
            filter,
            settings.time_format,
            settings.ansi,
        )),
        #[cfg(test)]
        ConsoleLog::Off => (),
    }

    if let Some(path) = &settings.file {
        let out_file = Arc::new(
            File::create(path).with_context(|| format!("Failed to open log file {path:?}"))?,
        );
        let filter = if std::env::var(LOG_FILE_DETAIL_ENV_VAR).is_ok() {
            filter_for(settings.level, LOG_FILE_DETAIL_ENV_VAR)?
        } else {
            filter_for(settings.level, STANDARD_ENV_VAR)?
        };
        layers.push(make_layer(out_file, filter, settings.time_format, false));
    }
    Ok(layers)
}

/// Sets up logging to the console and, optionally, to a file.
///
/// By default we log only our own events, at the given level.
/// `RUST_LOG` overrides this; `RUST_LOG_FILE_DETAIL` overrides it for the log file alone.
///
/// **CAUTION:** If this function fails, logging is not set up and callers must report the error
/// some other way.
///
/// **NOTE:** This takes effect once per process. Later calls are ignored.
pub(crate) fn setup(settings: &LogSettings) -> anyhow::Result<()> {
    if LOGGING_INITIALIZED.swap(true, Ordering::Relaxed) {
        tracing::warn!("logging setup called a second time (ignoring)");
        return Ok(());
    }
    let layers = build_layers(settings)?;
    tracing_subscriber::registry().with(layers).init();
    Ok(())
}

/// Has [`setup`] been run?
pub(crate) fn is_initialized() -> bool {
    LOGGING_INITIALIZED.load(Ordering::Relaxed)
}

/// Routes log output through a [`MultiProgress`]
struct ProgressWriter(MultiProgress);

impl ProgressWriter {
    fn wrap(display: MultiProgress) -> Mutex<Self> {
        Mutex::new(Self(display))
    }
}

impl Write for ProgressWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let msg = std::str::from_utf8(buf)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        let msg = maybe_strip_color(msg);
        let msg = msg.trim_end_matches('\n');
        if self.0.is_hidden() {
            eprintln!("{msg}");
        } else {
            self.0.println(msg)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
