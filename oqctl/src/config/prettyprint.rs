//! Configuration pretty-printing
// (c) 2026 oqctl developers

use std::fmt::Display;

use figment::{Metadata, value::Value};
use heck::ToUpperCamelCase as _;
use struct_field_names_as_array::FieldNamesAsSlice as _;
use tabled::{
    Table, Tabled,
    settings::{Color, object::Rows, style::Style},
};

use super::{Configuration, Manager};
use crate::cli::styles::use_colours;

/// Data type used when rendering the config table
#[derive(Tabled)]
struct PrettyConfig {
    field: String,
    value: String,
    source: String,
}

impl PrettyConfig {
    fn render_source(meta: Option<&Metadata>) -> String {
        meta.map(|m| {
            m.source
                .as_ref()
                .map_or_else(|| m.name.to_string(), figment::Source::to_string)
        })
        .unwrap_or_default()
    }

    fn render_value(value: &Value) -> String {
        match value {
            Value::String(_tag, s) => s.clone(),
            Value::Char(_tag, c) => c.to_string(),
            Value::Bool(_tag, b) => b.to_string(),
            Value::Num(_tag, num) => num
                .to_u128()
                .map(|u| u.to_string())
                .or_else(|| num.to_i128().map(|i| i.to_string()))
                .or_else(|| num.to_f64().map(|f| f.to_string()))
                .unwrap_or_else(|| format!("{num:?}")),
            Value::Empty(_tag, _) => "<empty>".into(),
            Value::Dict(_tag, dict) => format!("{{{} entries}}", dict.len()),
            Value::Array(_tag, vec) => {
                format!(
                    "[{}]",
                    vec.iter()
                        .map(PrettyConfig::render_value)
                        .collect::<Vec<_>>()
                        .join(",")
                )
            }
        }
    }
}

/// Pretty-printing type wrapper to Manager
#[derive(Debug)]
pub struct DisplayAdapter<'a> {
    source: &'a Manager,
}

impl Manager {
    /// Creates a `DisplayAdapter` for this struct.
    ///
    /// # Returns
    /// An ephemeral structure implementing `Display`, which renders every [`Configuration`]
    /// field with its current value and where that value came from.
    #[must_use]
    pub fn to_display_adapter(&self) -> DisplayAdapter<'_> {
        DisplayAdapter { source: self }
    }
}

impl Display for DisplayAdapter<'_> {
    /// N.B. This function uses CLI styling.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let data = &self.source.data;
        let mut output = Vec::<PrettyConfig>::new();
        for field in Configuration::FIELD_NAMES_AS_SLICE {
            if let Ok(value) = data.find_value(field) {
                let meta = data.get_metadata(value.tag());
                output.push(PrettyConfig {
                    field: field.to_upper_camel_case(),
                    value: PrettyConfig::render_value(&value),
                    source: PrettyConfig::render_source(meta),
                });
            }
        }
        let mut writable = Table::new(output);
        let _ = writable.with(Style::sharp());
        if use_colours() {
            let _ = writable.modify(Rows::first(), Color::FG_CYAN);
        }
        write!(f, "{writable}")
    }
}
