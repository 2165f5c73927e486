//! Structured files as flag sources.
//!
//! A [`FileSource`] reads its whole file once, at [`open`](Source::open) time,
//! decodes it into a flat top-level key map and serves lookups from memory.
//! Keys are matched exactly and only at the top level: a nested table is
//! returned as a single [`RawValue::Map`], never traversed.
//!
//! Decoding is delegated to each format's own crate (`serde_json`,
//! `serde_yaml`, `toml`). The document must be a mapping at the top level; an
//! empty YAML document counts as an empty mapping.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::SourceError;
use crate::raw::RawValue;
use crate::source::{Source, SourceKind};

/// Supported file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
    Toml,
}

impl Format {
    fn kind(self) -> SourceKind {
        match self {
            Format::Json => SourceKind::Json,
            Format::Yaml => SourceKind::Yaml,
            Format::Toml => SourceKind::Toml,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    format: Format,
    values: Option<BTreeMap<String, RawValue>>,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>, format: Format) -> Self {
        Self {
            path: path.into(),
            format,
            values: None,
        }
    }

    pub fn json(path: impl Into<PathBuf>) -> Self {
        Self::new(path, Format::Json)
    }

    pub fn yaml(path: impl Into<PathBuf>) -> Self {
        Self::new(path, Format::Yaml)
    }

    pub fn toml(path: impl Into<PathBuf>) -> Self {
        Self::new(path, Format::Toml)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> Format {
        self.format
    }

    /// Whether the file has been read and decoded.
    pub fn is_open(&self) -> bool {
        self.values.is_some()
    }
}

/// Boxed JSON [`FileSource`].
pub fn json_file(path: impl Into<PathBuf>) -> Box<dyn Source> {
    Box::new(FileSource::json(path))
}

/// Boxed YAML [`FileSource`].
pub fn yaml_file(path: impl Into<PathBuf>) -> Box<dyn Source> {
    Box::new(FileSource::yaml(path))
}

/// Boxed TOML [`FileSource`].
pub fn toml_file(path: impl Into<PathBuf>) -> Box<dyn Source> {
    Box::new(FileSource::toml(path))
}

/// Decode `content` into a top-level key map according to `format`.
///
/// Pure function; `path` is only used for error messages.
pub fn decode(
    content: &str,
    format: Format,
    path: &Path,
) -> Result<BTreeMap<String, RawValue>, SourceError> {
    let document = match format {
        Format::Json => {
            serde_json::from_str::<RawValue>(content).map_err(|e| SourceError::Json {
                path: path.to_path_buf(),
                source: e,
            })?
        }
        Format::Yaml => {
            serde_yaml::from_str::<RawValue>(content).map_err(|e| SourceError::Yaml {
                path: path.to_path_buf(),
                source: e,
            })?
        }
        Format::Toml => {
            let table: toml::Table = toml::from_str(content).map_err(|e| SourceError::Toml {
                path: path.to_path_buf(),
                source: e,
            })?;
            RawValue::from(toml::Value::Table(table))
        }
    };

    match document {
        RawValue::Map(map) => Ok(map),
        RawValue::Null if format == Format::Yaml => Ok(BTreeMap::new()),
        _ => Err(SourceError::NotAMapping {
            path: path.to_path_buf(),
        }),
    }
}

impl Source for FileSource {
    fn kind(&self) -> SourceKind {
        self.format.kind()
    }

    fn origin(&self) -> String {
        self.path.display().to_string()
    }

    fn open(&mut self) -> Result<(), SourceError> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| SourceError::Io {
            path: self.path.clone(),
            source: e,
        })?;
        self.values = Some(decode(&content, self.format, &self.path)?);
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<RawValue>, SourceError> {
        Ok(self
            .values
            .as_ref()
            .and_then(|values| values.get(key))
            .cloned())
    }

    fn close(&mut self) -> Result<(), SourceError> {
        self.values = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::write_file;

    fn path() -> PathBuf {
        PathBuf::from("/test/config")
    }

    #[test]
    fn decode_json_top_level() {
        let map = decode(
            r#"{"foo": "bar", "bar": 1, "baz": [3, 1, "5"]}"#,
            Format::Json,
            &path(),
        )
        .unwrap();
        assert_eq!(map["foo"], RawValue::String("bar".into()));
        assert_eq!(map["bar"], RawValue::Uint(1));
        assert_eq!(
            map["baz"],
            RawValue::Seq(vec![
                RawValue::Uint(3),
                RawValue::Uint(1),
                RawValue::String("5".into())
            ])
        );
    }

    #[test]
    fn decode_yaml_top_level() {
        let map = decode("foo: bar\nbar: 1\nbaz:\n  - 3\n  - \"5\"\n", Format::Yaml, &path()).unwrap();
        assert_eq!(map["foo"], RawValue::String("bar".into()));
        assert_eq!(map["bar"], RawValue::Uint(1));
        assert_eq!(
            map["baz"],
            RawValue::Seq(vec![RawValue::Uint(3), RawValue::String("5".into())])
        );
    }

    #[test]
    fn decode_empty_yaml_is_empty_map() {
        assert!(decode("", Format::Yaml, &path()).unwrap().is_empty());
    }

    #[test]
    fn decode_toml_top_level() {
        let map = decode(
            "foo = \"bar\"\nbar = 1\nbaz = [3, 1]\n[nested]\nkey = true\n",
            Format::Toml,
            &path(),
        )
        .unwrap();
        assert_eq!(map["foo"], RawValue::String("bar".into()));
        assert_eq!(map["bar"], RawValue::Int(1));
        assert_eq!(map["baz"], RawValue::Seq(vec![RawValue::Int(3), RawValue::Int(1)]));
        assert!(matches!(map["nested"], RawValue::Map(_)));
    }

    #[test]
    fn decode_rejects_non_mapping() {
        let result = decode("[1, 2]", Format::Json, &path());
        assert!(matches!(result, Err(SourceError::NotAMapping { .. })));
    }

    #[test]
    fn decode_reports_parse_errors_with_path() {
        let err = decode("{not json", Format::Json, &path()).unwrap_err();
        assert!(matches!(err, SourceError::Json { .. }));
        assert!(err.to_string().contains("/test/config"));

        let err = decode("foo = ", Format::Toml, &path()).unwrap_err();
        assert!(matches!(err, SourceError::Toml { .. }));
    }

    #[test]
    fn nested_keys_are_not_traversed() {
        let map = decode(r#"{"db": {"url": "pg://"}}"#, Format::Json, &path()).unwrap();
        assert!(!map.contains_key("db.url"));
        assert!(!map.contains_key("url"));
    }

    #[test]
    fn open_get_close_lifecycle() {
        let (_dir, file) = write_file("app.json", r#"{"foo": "bar"}"#);
        let mut source = FileSource::json(&file);

        assert_eq!(source.get("foo").unwrap(), None);
        source.open().unwrap();
        assert!(source.is_open());
        assert_eq!(
            source.get("foo").unwrap(),
            Some(RawValue::String("bar".into()))
        );
        assert_eq!(source.get("qux").unwrap(), None);

        source.close().unwrap();
        source.close().unwrap();
        assert!(!source.is_open());
        assert_eq!(source.get("foo").unwrap(), None);
    }

    #[test]
    fn open_missing_file_is_io_error() {
        let mut source = FileSource::yaml("/nonexistent/flagfig/app.yaml");
        let err = source.open().unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
        assert!(source.close().is_ok());
    }

    #[test]
    fn kind_follows_format() {
        assert_eq!(FileSource::json("a").kind(), SourceKind::Json);
        assert_eq!(FileSource::yaml("a").kind(), SourceKind::Yaml);
        assert_eq!(FileSource::toml("a").kind(), SourceKind::Toml);
        assert_eq!(FileSource::toml("/etc/app.toml").origin(), "/etc/app.toml");
    }
}
