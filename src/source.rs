//! The source interface consulted for flags missing from the command line.

use std::fmt;

use crate::error::SourceError;
use crate::raw::RawValue;

/// What kind of backend a [`Source`] is. Extractors select sources by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Env,
    Json,
    Yaml,
    Toml,
    /// A caller-defined backend, told apart by its tag.
    Other(&'static str),
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Env => write!(f, "env"),
            SourceKind::Json => write!(f, "json"),
            SourceKind::Yaml => write!(f, "yaml"),
            SourceKind::Toml => write!(f, "toml"),
            SourceKind::Other(tag) => write!(f, "{tag}"),
        }
    }
}

/// A provider of key/value lookups.
///
/// [`FlagSet::parse`](crate::FlagSet::parse) calls [`open`](Self::open) on every
/// source once before the first lookup and [`close`](Self::close) once when
/// resolution ends, whether it succeeded or not.
pub trait Source {
    fn kind(&self) -> SourceKind;

    /// Human-readable origin used in error messages, e.g. a file path.
    fn origin(&self) -> String;

    /// Acquire whatever the source reads from.
    fn open(&mut self) -> Result<(), SourceError>;

    /// Look up a top-level key. `Ok(None)` means the key is absent.
    fn get(&self, key: &str) -> Result<Option<RawValue>, SourceError>;

    /// Release what [`open`](Self::open) acquired. Must tolerate repeated
    /// calls, and calls on a source that was never opened.
    fn close(&mut self) -> Result<(), SourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_display_their_tag() {
        assert_eq!(SourceKind::Env.to_string(), "env");
        assert_eq!(SourceKind::Toml.to_string(), "toml");
        assert_eq!(SourceKind::Other("vault").to_string(), "vault");
    }

    #[test]
    fn other_kinds_compare_by_tag() {
        assert_eq!(SourceKind::Other("a"), SourceKind::Other("a"));
        assert_ne!(SourceKind::Other("a"), SourceKind::Other("b"));
        assert_ne!(SourceKind::Json, SourceKind::Yaml);
    }
}
