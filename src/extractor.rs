//! Per-flag lookup rules.
//!
//! A flag carries an ordered list of extractors. When the flag was not given
//! on the command line, each extractor in turn searches the sources passed to
//! [`FlagSet::parse`](crate::FlagSet::parse); the first one that finds a value
//! settles the flag.

use tracing::debug;

use crate::error::FlagError;
use crate::source::{Source, SourceKind};
use crate::value::Value;

pub trait Extractor {
    /// Search `sources` and assign into `dst` on a hit, replacing whatever
    /// it held.
    ///
    /// Returns `Ok(true)` once a value was found and assigned, `Ok(false)`
    /// when no applicable source held one.
    fn extract(&self, sources: &[Box<dyn Source>], dst: &mut Value<'_>)
    -> Result<bool, FlagError>;
}

/// Looks up a fixed key in every source of one kind, in the order the
/// sources were supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyExtractor {
    kind: SourceKind,
    key: String,
}

impl KeyExtractor {
    pub fn new(kind: SourceKind, key: &str) -> Self {
        Self {
            kind,
            key: key.to_string(),
        }
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Extractor for KeyExtractor {
    fn extract(
        &self,
        sources: &[Box<dyn Source>],
        dst: &mut Value<'_>,
    ) -> Result<bool, FlagError> {
        for source in sources.iter().filter(|s| s.kind() == self.kind) {
            let Some(raw) = source.get(&self.key)? else {
                continue;
            };
            debug!("{}: value found in {}", self.key, source.origin());
            dst.replace(raw).map_err(|e| FlagError::SourceValue {
                key: self.key.clone(),
                origin: source.origin(),
                source: e,
            })?;
            return Ok(true);
        }
        Ok(false)
    }
}

/// Read `key` from environment sources; the source's prefix is prepended.
pub fn env_key(key: &str) -> Box<dyn Extractor> {
    Box::new(KeyExtractor::new(SourceKind::Env, key))
}

/// Read top-level `key` from JSON file sources.
pub fn json_key(key: &str) -> Box<dyn Extractor> {
    Box::new(KeyExtractor::new(SourceKind::Json, key))
}

/// Read top-level `key` from YAML file sources.
pub fn yaml_key(key: &str) -> Box<dyn Extractor> {
    Box::new(KeyExtractor::new(SourceKind::Yaml, key))
}

/// Read top-level `key` from TOML file sources.
pub fn toml_key(key: &str) -> Box<dyn Extractor> {
    Box::new(KeyExtractor::new(SourceKind::Toml, key))
}
