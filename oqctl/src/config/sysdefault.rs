//! System default configuration provider
// (c) 2026 oqctl developers

use figment::{Metadata, Provider, providers::Serialized};

use super::Configuration;

/// A [`figment::Provider`](https://docs.rs/figment/latest/figment/trait.Provider.html) that holds
/// the hard-wired defaults
pub(super) struct SystemDefault {}

impl SystemDefault {
    const META_NAME: &str = "default";
}

impl Provider for SystemDefault {
    fn metadata(&self) -> Metadata {
        figment::Metadata::named(Self::META_NAME)
    }

    fn data(
        &self,
    ) -> std::result::Result<
        figment::value::Map<figment::Profile, figment::value::Dict>,
        figment::Error,
    > {
        Serialized::defaults(Configuration::system_default()).data()
    }
}
