use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by [`FlagSet::parse`](crate::FlagSet::parse) and
/// [`FlagSet::parse_next`](crate::FlagSet::parse_next).
#[derive(Debug, Error)]
#[cfg_attr(feature = "rich-errors", derive(miette::Diagnostic))]
pub enum FlagError {
    /// The token has a dash marker but no usable name (`-`, `---x`, `-=x`, `-x=`).
    #[error("invalid flag syntax: {0}")]
    #[cfg_attr(
        feature = "rich-errors",
        diagnostic(
            code(flagfig::invalid_syntax),
            help("flags look like -name, --name, -name=value or --name value")
        )
    )]
    InvalidSyntax(String),

    #[error("unknown flag {0}")]
    #[cfg_attr(
        feature = "rich-errors",
        diagnostic(code(flagfig::unknown_flag), help("run with -help to list the flags"))
    )]
    UnknownFlag(String),

    #[error("expecting value for flag: {0}")]
    #[cfg_attr(
        feature = "rich-errors",
        diagnostic(
            code(flagfig::missing_value),
            help("values starting with a dash must be written inline, e.g. -name=-1")
        )
    )]
    MissingValue(String),

    /// A command-line or default value could not be coerced into the flag's kind.
    #[error("invalid value for flag {flag}: {source}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(flagfig::invalid_value)))]
    InvalidValue {
        flag: String,
        #[source]
        source: CoerceError,
    },

    /// A value found in a source could not be coerced into the flag's kind.
    #[error("invalid value for {key} from {origin}: {source}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(flagfig::invalid_source_value)))]
    SourceValue {
        key: String,
        origin: String,
        #[source]
        source: CoerceError,
    },

    #[error(transparent)]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(flagfig::source)))]
    Source(#[from] SourceError),

    /// One of the help aliases was found. Not a failure of the input itself.
    #[error("help requested")]
    Help,
}

impl FlagError {
    /// Whether this is the help signal rather than a real failure.
    pub fn is_help(&self) -> bool {
        matches!(self, FlagError::Help)
    }
}

/// A dynamic value could not be converted into a destination kind.
#[derive(Debug, Clone, PartialEq, Error)]
#[cfg_attr(feature = "rich-errors", derive(miette::Diagnostic))]
pub enum CoerceError {
    #[error("cannot assign {from} to {to}")]
    Mismatch { from: &'static str, to: &'static str },

    #[error("cannot parse {input:?} as {to}: {reason}")]
    Parse {
        input: String,
        to: &'static str,
        reason: String,
    },
}

/// Failures while opening or reading a [`Source`](crate::Source).
#[derive(Debug, Error)]
#[cfg_attr(feature = "rich-errors", derive(miette::Diagnostic))]
pub enum SourceError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("{path} does not hold a key/value mapping at the top level")]
    NotAMapping { path: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_error_names_the_token() {
        let err = FlagError::InvalidSyntax("-x=".into());
        assert_eq!(err.to_string(), "invalid flag syntax: -x=");
    }

    #[test]
    fn unknown_flag_formats() {
        assert_eq!(
            FlagError::UnknownFlag("x".into()).to_string(),
            "unknown flag x"
        );
    }

    #[test]
    fn missing_value_formats() {
        assert_eq!(
            FlagError::MissingValue("x".into()).to_string(),
            "expecting value for flag: x"
        );
    }

    #[test]
    fn invalid_value_includes_flag_and_cause() {
        let err = FlagError::InvalidValue {
            flag: "port".into(),
            source: CoerceError::Parse {
                input: "abc".into(),
                to: "int",
                reason: "invalid digit found in string".into(),
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("port"));
        assert!(msg.contains("\"abc\""));
        assert!(msg.contains("int"));
    }

    #[test]
    fn help_is_distinguished() {
        assert!(FlagError::Help.is_help());
        assert!(!FlagError::UnknownFlag("h".into()).is_help());
    }

    #[test]
    fn source_error_keeps_path() {
        let err = FlagError::from(SourceError::NotAMapping {
            path: "/etc/app/config.yaml".into(),
        });
        assert!(err.to_string().contains("config.yaml"));
    }
}
