//! Configuration file wrangling
// (c) 2026 oqctl developers

use std::path::PathBuf;

use anyhow::Result;
use figment::{
    Figment, Provider,
    providers::{Env, Format as _, Toml},
};
use serde::Deserialize;
use tracing::debug;

use super::{BASE_CONFIG_FILENAME, ClicolorEnv, Configuration, ENV_PREFIX, SystemDefault};
use crate::cli::styles::ColourMode;

/// Processes and merges all possible configuration sources.
///
/// Configuration file locations are platform-dependent.
/// To see what applies on the current platform, run `oqctl --config-files`.
#[derive(Debug, Clone)]
pub struct Manager {
    /// Configuration data
    pub(super) data: Figment,
}

impl Manager {
    /// Constructor. Sources are merged lowest priority first.
    pub(super) fn new(apply_env: bool, apply_config_files: bool) -> Self {
        let mut new1 = Self {
            data: Figment::new(),
        };
        if apply_env {
            new1.merge_provider(ClicolorEnv {});
        }
        if apply_config_files {
            // N.B. This may leave data in a fused-error state, if a config file isn't parseable.
            new1.add_config("system", system_config_path());
            new1.add_config("user", user_config_path());
        }
        if apply_env {
            new1.merge_provider(Env::prefixed(ENV_PREFIX));
        }
        new1
    }

    /// General constructor for production use
    ///
    /// Reads the set of config files appropriate to the platform and the current user,
    /// and the `OQCTL_` environment variables.
    /// The system default is _not_ applied; see [`Manager::apply_system_default`].
    #[must_use]
    pub fn standard() -> Self {
        Self::new(true, true)
    }

    /// Testing/internal constructor, does not read files from system or apply environment; DOES apply system default.
    #[must_use]
    #[cfg(test)]
    pub(crate) fn without_files() -> Self {
        let mut new1 = Self::new(false, false);
        new1.apply_system_default();
        new1
    }

    /// Testing/internal constructor, does not read files from system, apply environment, or apply system default
    #[must_use]
    #[cfg(test)]
    pub(crate) fn without_default() -> Self {
        Self::new(false, false)
    }

    fn add_config(&mut self, what: &str, path: Option<PathBuf>) {
        let Some(path) = path else {
            debug!("no {what} configuration file on this platform");
            return;
        };
        if !path.exists() {
            debug!("{what} configuration file {path:?} not present");
            return;
        }
        debug!("reading {what} configuration file {path:?}");
        self.merge_toml(path);
    }

    /// Returns the list of configuration files we read, lowest priority first.
    ///
    /// This is a function of platform and the current user.
    #[must_use]
    pub fn config_files() -> Vec<String> {
        [system_config_path(), user_config_path()]
            .into_iter()
            .flatten()
            .map(|p| p.as_os_str().to_string_lossy().to_string())
            .collect()
    }

    /// Merges in a data set, which is some sort of [figment::Provider](https://docs.rs/figment/latest/figment/trait.Provider.html).
    /// This uses figment's `merge` operation, which prefers to _replace_ existing items.
    pub fn merge_provider<T>(&mut self, provider: T)
    where
        T: Provider,
    {
        let f = std::mem::take(&mut self.data);
        self.data = f.merge(provider); // in the error case, this leaves the provider in a fused state
    }

    /// Merges in a TOML configuration file
    pub fn merge_toml<P>(&mut self, path: P)
    where
        P: Into<PathBuf>,
    {
        self.merge_provider(Toml::file_exact(path.into()));
    }

    /// Applies the system default settings, at a lower priority than everything else
    pub fn apply_system_default(&mut self) {
        let f = std::mem::take(&mut self.data);
        self.data = f.join(SystemDefault {});
    }

    /// Attempts to extract a particular struct from the data.
    ///
    /// Within oqctl, `T` is usually [Configuration], but it isn't intrinsically required to be.
    /// (This is useful for unit testing.)
    pub(crate) fn get<'de, T>(&self) -> Result<T, figment::Error>
    where
        T: Deserialize<'de>,
    {
        self.data.extract_lossy::<T>()
    }

    /// Extracts the colour mode, if it is set anywhere.
    ///
    /// Returns `default` if no source mentions it.
    pub(crate) fn get_color(
        &self,
        default: Option<ColourMode>,
    ) -> Result<Option<ColourMode>, figment::Error> {
        if !self.data.contains("color") {
            return Ok(default);
        }
        self.data.extract_inner_lossy::<ColourMode>("color").map(Some)
    }

    /// Extracts the final configuration, underlaying the system default, and validates it.
    pub fn configuration(&self) -> Result<Configuration> {
        let mut working = self.clone();
        working.apply_system_default();
        let config = working.get::<Configuration>()?;
        config.validate()
    }
}

/// The system-wide configuration file, if the platform has one
fn system_config_path() -> Option<PathBuf> {
    if cfg!(unix) {
        Some(PathBuf::from("/etc").join(BASE_CONFIG_FILENAME))
    } else {
        None
    }
}

/// The current user's configuration file
fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("oqctl").join(BASE_CONFIG_FILENAME))
}
