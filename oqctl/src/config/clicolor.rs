//! Config provider for CLICOLOR environment variables
//!
//! See [https://bixense.com/clicolors/](https://bixense.com/clicolors/) for more information.
// (c) 2026 oqctl developers

use figment::{Metadata, Provider};

pub(super) struct Env {}
impl Env {
    const META_NAME: &str = "environment variable(s)";

    /// Maps the CLICOLOR family onto a colour mode name, if any of them is set
    fn detect(var: impl Fn(&str) -> Option<String>) -> Option<&'static str> {
        if var("NO_COLOR").is_some() {
            Some("never")
        } else if var("CLICOLOR_FORCE").is_some() {
            Some("always")
        } else if let Some(v) = var("CLICOLOR") {
            if v.is_empty() || v == "0" {
                Some("never")
            } else {
                Some("auto")
            }
        } else {
            None
        }
    }
}

impl Provider for Env {
    fn metadata(&self) -> Metadata {
        figment::Metadata::named(Self::META_NAME)
    }

    fn data(
        &self,
    ) -> std::result::Result<
        figment::value::Map<figment::Profile, figment::value::Dict>,
        figment::Error,
    > {
        let mut dict = figment::value::Dict::new();
        if let Some(v) = Self::detect(|k| std::env::var(k).ok()) {
            let _ = dict.insert("color".into(), v.into());
        }
        Ok(figment::Profile::Default.collect(dict))
    }
}
