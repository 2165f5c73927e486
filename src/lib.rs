//! Command-line flags with fallback sources. Declare your flags, bind them to
//! variables, and parse.
//!
//! Flagfig parses `-name value` style arguments and fills every flag the
//! command line left out from environment variables or structured files,
//! falling back to a registered default.
//!
//! ```no_run
//! use flagfig::{ErrorHandling, FlagSet, env_key, env_prefix, json_file, json_key};
//!
//! let mut port = 8080i64;
//! let mut verbose = false;
//! {
//!     let mut fs = FlagSet::new("myapp", "Serves things.", ErrorHandling::ExitOnError);
//!     fs.var(&mut port, "port", 8080, "listen port", vec![env_key("PORT"), json_key("port")]);
//!     fs.var(&mut verbose, "v", false, "verbose output", vec![]);
//!
//!     let mut sources = vec![env_prefix("MYAPP_"), json_file("/etc/myapp.json")];
//!     fs.parse(std::env::args().skip(1), &mut sources)?;
//! }
//! println!("listening on {port}");
//! # Ok::<(), flagfig::FlagError>(())
//! ```
//!
//! `port` comes from `-port`, then `MYAPP_PORT`, then the `port` key of
//! `/etc/myapp.json`, then the default.
//!
//! # Precedence
//!
//! ```text
//! Registered default
//!        ↑ overridden by
//! Extractors            in declared order; first source holding the key wins
//!        ↑ overridden by
//! Command line          -name value, -name=value, --name value
//! ```
//!
//! Each flag receives exactly one authoritative value. A scalar flag given
//! twice on the command line keeps the first value. A list flag given several
//! times collects every value in order; sources and defaults always replace a
//! list wholesale.
//!
//! # Command-line syntax
//!
//! | Token | Meaning |
//! |---|---|
//! | `-name value`, `--name value` | set `name`; the value may not start with `-` |
//! | `-name=value` | inline value, split at the first `=` |
//! | `-flag` | boolean flag set to true; never consumes the next token |
//! | `--` | everything after is positional |
//! | `-h`, `-help`, `--h`, `--help` | help requested ([`FlagError::Help`]) |
//! | anything else | positional argument, see [`FlagSet::args`] |
//!
//! # Sources and extractors
//!
//! A [`Source`] answers key lookups: [`env_prefix`] reads `PREFIX` + key from
//! the environment, [`json_file`], [`yaml_file`] and [`toml_file`] read the
//! top-level keys of a file. An [`Extractor`] attached to a flag names the key
//! to look up and the kind of source to ask. Sources are opened once before
//! resolution and always closed afterwards.
//!
//! Custom backends implement [`Source`] with a [`SourceKind::Other`] tag and
//! are queried through [`KeyExtractor::new`].
//!
//! # Values
//!
//! Flags bind to `String`, `bool`, `isize`, `i64`, `usize`, `u64`, `f64`,
//! [`Duration`](std::time::Duration) and `Vec`s of each except `bool`. Values
//! from any origin pass through the same coercion rules, see [`Value`].
//!
//! # Errors
//!
//! [`FlagSet::parse`] reports failures to the set's output and then follows
//! its [`ErrorHandling`] policy: return the error, exit the process, or panic.
//! Enable the `rich-errors` feature for [`miette`](https://docs.rs/miette)
//! diagnostics.

pub mod error;
pub mod types;

mod env;
mod extractor;
mod file;
mod flagset;
mod parse;
mod raw;
mod resolve;
mod source;
mod usage;
mod value;

#[cfg(test)]
mod fixtures;

pub use env::{EnvPrefix, env_prefix};
pub use error::{CoerceError, FlagError, SourceError};
pub use extractor::{Extractor, KeyExtractor, env_key, json_key, toml_key, yaml_key};
pub use file::{FileSource, Format, decode, json_file, toml_file, yaml_file};
pub use flagset::{Flag, FlagSet, UsageFn};
pub use raw::RawValue;
pub use source::{Source, SourceKind};
pub use types::ErrorHandling;
pub use usage::Pretty;
pub use value::{FlagValue, Value};
