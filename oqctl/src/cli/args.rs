//! Command-line argument definitions
// (c) 2026 oqctl developers

use std::ffi::OsString;

use clap::{Parser, Subcommand};

use crate::{client::Parameters, config::ConfigurationOverrides, config::Manager};

/// Discovers an OverQuack device on the local network and manages its `.oqs` payloads.
///
/// Each invocation finds the device, negotiates a session, runs one command and disconnects.
#[derive(Debug, Parser, Clone)]
#[command(
    author,
    version(crate::version::short()),
    about,
    styles(super::styles::CLAP_STYLES),
    infer_long_args(true),
    subcommand_required(false),
    arg_required_else_help(true)
)]
pub(crate) struct CliArgs {
    /// Outputs the configuration, then exits.
    ///
    /// This shows the value of every setting and where it came from
    /// (defaults, configuration files, environment or command line).
    #[arg(long, help_heading("Configuration"), display_order(0))]
    pub(crate) show_config: bool,

    /// Outputs the paths to configuration file(s), then exits
    #[arg(long, help_heading("Configuration"), display_order(0))]
    pub(crate) config_files: bool,

    #[command(flatten)]
    pub(crate) config: ConfigurationOverrides,

    #[command(flatten)]
    pub(crate) client_params: Parameters,

    #[command(subcommand)]
    pub(crate) command: Option<DeviceCommand>,
}

/// What to do with the device
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub(crate) enum DeviceCommand {
    /// Finds the device and reports the session details
    Connect,
    /// Lists the payloads on the device
    #[command(alias = "list")]
    Ls,
    /// Runs a payload
    Run {
        /// Payload name, e.g. `hello.oqs`
        name: String,
    },
    /// Prints the content of a payload
    #[command(alias = "read")]
    Cat {
        /// Payload name
        name: String,
    },
    /// Downloads a payload to a local file
    Get {
        /// Payload name
        name: String,
        /// Where to write it [default: the payload name, in the current directory]
        dest: Option<String>,
    },
    /// Deletes a payload
    #[command(alias = "delete")]
    Rm {
        /// Payload name
        name: String,
    },
    /// Uploads a local `.oqs` file
    ///
    /// The payload takes the name of the file, less any leading `.`.
    /// If the device looks short of memory you are asked whether to go ahead.
    #[command(alias = "upload")]
    Put {
        /// The local file
        file: String,
        /// Skip the free memory check
        #[arg(short, long)]
        force: bool,
    },
    /// Reports the device's free memory and the largest payload it can safely take
    Mem,
}

/// Computed main mode of operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum MainMode {
    ShowConfig,
    ShowConfigFiles,
    Device(DeviceCommand),
}

impl CliArgs {
    /// Parses arguments. Errors (including help and version requests) are returned to the caller.
    pub(crate) fn custom_parse<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::try_parse_from(args)
    }

    /// Works out what we have been asked to do
    pub(crate) fn mode(&self) -> anyhow::Result<MainMode> {
        if self.config_files {
            Ok(MainMode::ShowConfigFiles)
        } else if self.show_config {
            Ok(MainMode::ShowConfig)
        } else if let Some(cmd) = &self.command {
            Ok(MainMode::Device(cmd.clone()))
        } else {
            anyhow::bail!("A command is required; see --help")
        }
    }
}

impl TryFrom<&CliArgs> for Manager {
    type Error = anyhow::Error;

    /// Merges the command-line overrides over the standard configuration sources
    fn try_from(value: &CliArgs) -> Result<Self, Self::Error> {
        let mut mgr = Manager::standard();
        mgr.merge_provider(value.config.clone());
        Ok(mgr)
    }
}
