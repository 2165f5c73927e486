use std::collections::HashMap;

use crate::error::SourceError;
use crate::raw::RawValue;
use crate::source::{Source, SourceKind};

/// Environment variables as a flag source.
///
/// A lookup for `key` reads the variable named `{prefix}{key}` verbatim: no
/// case folding, no separator inserted. Values are strings, or bytes when the
/// variable is not valid UTF-8; the flag's kind decides how they are coerced.
#[derive(Debug, Clone)]
pub struct EnvPrefix {
    prefix: String,
    vars: Option<HashMap<String, String>>,
}

impl EnvPrefix {
    /// Read from the process environment at lookup time.
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            vars: None,
        }
    }

    /// Read from a fixed set of variables instead of the process environment.
    ///
    /// Takes an iterator so tests can pass synthetic data instead of `std::env::vars()`.
    pub fn with_vars(prefix: &str, vars: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            prefix: prefix.to_string(),
            vars: Some(vars.into_iter().collect()),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Variables that are not valid UTF-8 come back as raw bytes.
    fn lookup(&self, name: &str) -> Option<RawValue> {
        match &self.vars {
            Some(vars) => vars.get(name).cloned().map(RawValue::String),
            None => std::env::var_os(name).map(|value| match value.into_string() {
                Ok(s) => RawValue::String(s),
                Err(raw) => RawValue::Bytes(raw.into_encoded_bytes()),
            }),
        }
    }
}

/// Boxed [`EnvPrefix`] reading the process environment, ready to hand to
/// [`FlagSet::parse`](crate::FlagSet::parse).
pub fn env_prefix(prefix: &str) -> Box<dyn Source> {
    Box::new(EnvPrefix::new(prefix))
}

impl Source for EnvPrefix {
    fn kind(&self) -> SourceKind {
        SourceKind::Env
    }

    fn origin(&self) -> String {
        if self.prefix.is_empty() {
            "environment".to_string()
        } else {
            format!("environment ({}*)", self.prefix)
        }
    }

    fn open(&mut self) -> Result<(), SourceError> {
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<RawValue>, SourceError> {
        let name = format!("{}{key}", self.prefix);
        Ok(self.lookup(&name))
    }

    fn close(&mut self) -> Result<(), SourceError> {
        Ok(())
    }
}
