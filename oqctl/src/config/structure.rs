//! Configuration structure
// (c) 2026 oqctl developers

use std::sync::LazyLock;
use std::time::Duration;

use anyhow::Result;
use figment::{Metadata, Provider, providers::Serialized};
use serde::{Deserialize, Serialize};
use struct_field_names_as_array::FieldNamesAsSlice;

use crate::{
    cli::styles::{ColourMode, RESET, info},
    session::{DeviceAddress, RetryPolicy, UploadPolicy},
    util::TimeFormat,
};

/// The set of configurable options supported by oqctl.
///
/// ### Configuration files
///
/// Configuration files are TOML. Field names are as below, in snake case.
///
/// [More details about the configuration mechanism](crate::config).
///
/// ### Command line
///
/// Every field may also be given on the command line, in kebab-case
/// (see [`ConfigurationOverrides`]).
///
/// ### Developer notes
/// There is no `default()`.
/// The hard-wired defaults are available through [`Configuration::system_default()`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, FieldNamesAsSlice)]
pub struct Configuration {
    // DEVICE ==========================================================================================
    /// Hostname or IP address of the device
    pub host: String,
    /// Candidate HTTP ports, tried in order
    pub ports: Vec<u16>,
    /// Path of the command endpoint
    pub path: String,
    /// Per-request timeout, in seconds
    pub timeout: u16,

    // UPLOADS =========================================================================================
    /// Uploads larger than this (in bytes) are retried if the device does not reply
    pub retry_threshold: u64,
    /// Attempts made for a large upload, including the first
    pub retry_attempts: u32,
    /// Base delay between upload attempts, in milliseconds. The n-th retry waits n times this.
    pub retry_delay: u64,

    // OUTPUT ==========================================================================================
    /// Time format for log messages
    pub time_format: TimeFormat,
    /// Colour mode for console output
    pub color: ColourMode,
}

static SYSTEM_DEFAULT_CONFIG: LazyLock<Configuration> = LazyLock::new(|| Configuration {
    host: "10.10.5.1".into(),
    ports: vec![80, 8000, 8080],
    path: "/c2".into(),
    timeout: 10,
    retry_threshold: crate::session::DEFAULT_RETRY_THRESHOLD,
    retry_attempts: 3,
    retry_delay: 1000,
    time_format: TimeFormat::Local,
    color: ColourMode::Auto,
});

impl Configuration {
    /// Returns the system default settings
    #[must_use]
    pub fn system_default() -> &'static Self {
        &SYSTEM_DEFAULT_CONFIG
    }

    /// Accessor for `timeout`, as a Duration
    #[must_use]
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout.into())
    }

    /// Where to look for the device
    #[must_use]
    pub fn device_address(&self) -> DeviceAddress {
        DeviceAddress {
            host: self.host.clone(),
            ports: self.ports.clone(),
            path: self.path.clone(),
        }
    }

    /// How uploads should be retried
    #[must_use]
    pub fn upload_policy(&self) -> UploadPolicy {
        UploadPolicy {
            retry_threshold: self.retry_threshold,
            retry: RetryPolicy {
                max_attempts: self.retry_attempts,
                base_delay: Duration::from_millis(self.retry_delay),
            },
        }
    }

    /// Performs additional validation checks on a configuration object
    pub(crate) fn try_validate(&self) -> Result<()> {
        let info = info();
        if self.host.trim().is_empty() {
            anyhow::bail!("The device {info}host{RESET} must not be empty");
        }
        if self.ports.is_empty() {
            anyhow::bail!("At least one device {info}port{RESET} is required");
        }
        if self.ports.contains(&0) {
            anyhow::bail!("Port 0 is not valid in {info}ports {:?}{RESET}", self.ports);
        }
        if !self.path.starts_with('/') {
            anyhow::bail!(
                "The endpoint {info}path {}{RESET} must begin with '/'",
                self.path
            );
        }
        if self.timeout == 0 {
            anyhow::bail!("The {info}timeout{RESET} must be at least 1 second");
        }
        if self.retry_attempts == 0 {
            anyhow::bail!("{info}retry_attempts{RESET} must be at least 1");
        }
        Ok(())
    }

    /// Performs additional validation checks on the configuration.
    pub(crate) fn validate(self) -> Result<Self> {
        self.try_validate()?;
        Ok(self)
    }
}

/// Command-line overrides for [`Configuration`].
///
/// Every member is optional; anything not given falls through to the lower priority sources
/// (environment, configuration files and system defaults).
#[derive(Debug, Clone, Default, PartialEq, Eq, clap::Args, Serialize)]
pub struct ConfigurationOverrides {
    /// Hostname or IP address of the device [default: 10.10.5.1]
    #[arg(short = 'H', long, value_name("HOST"), help_heading("Device"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Candidate HTTP port(s), tried in the order given [default: 80,8000,8080]
    ///
    /// Repeat the option or separate ports with commas.
    #[arg(
        short = 'p',
        long = "port",
        value_name("PORT"),
        value_delimiter(','),
        help_heading("Device")
    )]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ports: Option<Vec<u16>>,

    /// Path of the command endpoint [default: /c2]
    #[arg(long, value_name("PATH"), help_heading("Device"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Per-request timeout [seconds; default 10]
    #[arg(short, long, value_name("sec"), help_heading("Device"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u16>,

    /// Uploads larger than this are retried if the device does not reply [bytes; default 50000]
    #[arg(long, value_name("bytes"), help_heading("Uploads"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_threshold: Option<u64>,

    /// Number of attempts for a large upload, including the first [default: 3]
    #[arg(long, value_name("N"), help_heading("Uploads"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_attempts: Option<u32>,

    /// Base delay between upload attempts [ms; default 1000]
    ///
    /// The delay grows linearly: the second retry waits twice as long as the first.
    #[arg(long, value_name("ms"), help_heading("Uploads"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_delay: Option<u64>,

    /// Specifies the time format to use when printing messages to the console or to file
    /// [default: local]
    #[arg(
        short = 'T',
        long,
        value_name("FORMAT"),
        help_heading("Output"),
        next_line_help(true)
    )]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_format: Option<TimeFormat>,

    /// Colour mode for console output [default: auto]
    ///
    /// Passing `--color` without a value is equivalent to `--color always`.
    ///
    /// oqctl also supports the `CLICOLOR`, `CLICOLOR_FORCE` and `NO_COLOR` environment variables.
    /// See [https://bixense.com/clicolors/](https://bixense.com/clicolors/) for more details.
    #[arg(
        long,
        alias("colour"),
        default_missing_value("always"),
        num_args(0..=1),
        value_name("mode"),
        help_heading("Output")
    )]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<ColourMode>,
}

impl ConfigurationOverrides {
    const META_NAME: &str = "command line";
}

impl Provider for ConfigurationOverrides {
    fn metadata(&self) -> Metadata {
        Metadata::named(Self::META_NAME)
    }

    fn data(
        &self,
    ) -> std::result::Result<
        figment::value::Map<figment::Profile, figment::value::Dict>,
        figment::Error,
    > {
        Serialized::defaults(self).data()
    }
}
