//! Manifest serialization formats
//!
//! A format is a parse/stringify pair. JSON is the default; YAML and TOML are
//! interchangeable without touching manifest accumulation.

use crate::error::RevError;
use crate::types::Manifest;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::debug;

/// Keep entries whose value is a string, logging the ones dropped.
fn string_entries<V, I, F>(entries: I, as_str: F) -> Manifest
where
    I: IntoIterator<Item = (String, V)>,
    F: Fn(V) -> Option<String>,
{
    entries
        .into_iter()
        .filter_map(|(key, value)| match as_str(value) {
            Some(value) => Some((key, value)),
            None => {
                debug!(%key, "Skipping non-string manifest entry");
                None
            }
        })
        .collect()
}

/// Parse and stringify a manifest document.
///
/// `parse` keeps string-valued entries and skips the rest, so a manifest
/// with a stray number or nested table still merges its string entries.
/// Input that is not a mapping at all is an error.
pub trait ManifestFormat: Debug + Send + Sync {
    fn parse(&self, text: &str) -> Result<Manifest, RevError>;

    /// Serialize with `indent` per nesting level where the format has one.
    fn stringify(&self, manifest: &Manifest, indent: &str) -> Result<String, RevError>;
}

/// Standard JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

impl ManifestFormat for JsonFormat {
    fn parse(&self, text: &str) -> Result<Manifest, RevError> {
        let object: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(text).map_err(|e| RevError::Serialization(e.to_string()))?;
        Ok(string_entries(object, |value| match value {
            serde_json::Value::String(s) => Some(s),
            _ => None,
        }))
    }

    fn stringify(&self, manifest: &Manifest, indent: &str) -> Result<String, RevError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        manifest
            .serialize(&mut serializer)
            .map_err(|e| RevError::Serialization(e.to_string()))?;
        String::from_utf8(buf).map_err(|e| RevError::Serialization(e.to_string()))
    }
}

/// YAML mapping; indentation is fixed by the emitter.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlFormat;

impl ManifestFormat for YamlFormat {
    fn parse(&self, text: &str) -> Result<Manifest, RevError> {
        let mapping: BTreeMap<String, serde_yaml::Value> =
            serde_yaml::from_str(text).map_err(|e| RevError::Serialization(e.to_string()))?;
        Ok(string_entries(mapping, |value| match value {
            serde_yaml::Value::String(s) => Some(s),
            _ => None,
        }))
    }

    fn stringify(&self, manifest: &Manifest, _indent: &str) -> Result<String, RevError> {
        serde_yaml::to_string(manifest).map_err(|e| RevError::Serialization(e.to_string()))
    }
}

/// Flat TOML table with quoted keys
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlFormat;

impl ManifestFormat for TomlFormat {
    fn parse(&self, text: &str) -> Result<Manifest, RevError> {
        let table: toml::Table =
            toml::from_str(text).map_err(|e| RevError::Serialization(e.to_string()))?;
        Ok(string_entries(table, |value| match value {
            toml::Value::String(s) => Some(s),
            _ => None,
        }))
    }

    fn stringify(&self, manifest: &Manifest, _indent: &str) -> Result<String, RevError> {
        toml::to_string(manifest).map_err(|e| RevError::Serialization(e.to_string()))
    }
}

/// Format selector used in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatKind {
    #[default]
    Json,
    Yaml,
    Toml,
}

impl FormatKind {
    pub fn build(self) -> Arc<dyn ManifestFormat> {
        match self {
            FormatKind::Json => Arc::new(JsonFormat),
            FormatKind::Yaml => Arc::new(YamlFormat),
            FormatKind::Toml => Arc::new(TomlFormat),
        }
    }
}
