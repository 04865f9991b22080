// (c) 2026 oqctl developers
//! # 📖 Configuration management
//!
//! oqctl obtains run-time configuration from the following sources, highest priority first:
//! 1. Command-line options
//! 2. Environment variables named `OQCTL_<FIELD>`, for example `OQCTL_HOST=192.168.4.1`
//!    or `OQCTL_PORTS=[80,8080]`
//! 3. The user's configuration file
//!    * On Linux, this is `~/.config/oqctl/oqctl.toml`
//!    * On macOS, this is `~/Library/Application Support/oqctl/oqctl.toml`
//!    * On Windows, this is `%AppData%\Roaming\oqctl\oqctl.toml`
//! 4. The system-wide configuration file, `/etc/oqctl.toml` (Unix only)
//! 5. The `CLICOLOR`, `CLICOLOR_FORCE` and `NO_COLOR` environment variables (colour mode only)
//! 6. Hard-wired defaults
//!
//! Run `oqctl --config-files` for a list of which files we read.
//!
//! Each field is resolved independently; the highest priority source that sets it wins.
//!
//! ## File format
//!
//! Configuration files are [TOML](https://toml.io/). Unknown keys are ignored.
//!
//! ## Configurable options
//!
//! The set of supported fields is the [Configuration] structure.
//!
//! * `oqctl --show-config` outputs a list of supported fields, their current values, and where each value came from.
//! * For an explanation of each field, refer to `oqctl --help`.
//!
//! ## Example
//!
//! ```toml
//! # The device was reconfigured onto the workshop network
//! host = "192.168.4.1"
//! ports = [8080]
//!
//! # It's a slow link; give it longer, and retry uploads of 20kB or more
//! timeout = 30
//! retry_threshold = 20000
//! retry_attempts = 5
//!
//! time_format = "utc"
//! ```

pub(crate) mod structure;
pub use structure::{Configuration, ConfigurationOverrides};

mod clicolor;
use clicolor::Env as ClicolorEnv;

mod sysdefault;
use sysdefault::SystemDefault;

mod manager;
pub use manager::Manager;

mod prettyprint;
pub use prettyprint::DisplayAdapter;

pub(crate) const BASE_CONFIG_FILENAME: &str = "oqctl.toml";

/// Prefix of environment variables that set configuration fields
pub(crate) const ENV_PREFIX: &str = "OQCTL_";

pub use crate::cli::styles::ColourMode;
pub use crate::util::TimeFormat;
