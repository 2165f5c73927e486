//! Command-line tokenizer.
//!
//! Flags are written `-name` or `--name`, with no difference between the two.
//! A value follows either inline (`-name=value`) or as the next token
//! (`-name value`); boolean flags take no value token and are set to true.
//! `--` ends flag scanning and everything after it is positional.

use tracing::trace;

use crate::error::FlagError;
use crate::flagset::FlagSet;

const HELP_ALIASES: [&str; 2] = ["h", "help"];

impl FlagSet<'_> {
    /// Consume positional arguments up to and including the next flag token.
    ///
    /// Positional arguments are collected into [`args`](Self::args). Returns
    /// the tokens still to be processed, which is empty once the input is
    /// exhausted or `--` was reached. Errors are returned as-is; the
    /// [`ErrorHandling`](crate::ErrorHandling) policy only applies to
    /// [`parse`](Self::parse).
    pub fn parse_next<'s>(
        &mut self,
        mut args: &'s [String],
    ) -> Result<&'s [String], FlagError> {
        loop {
            let Some((arg, rest)) = args.split_first() else {
                return Ok(&[]);
            };
            args = rest;

            if arg.len() < 2 || !arg.starts_with('-') {
                trace!("positional argument {arg:?}");
                self.args.push(arg.clone());
                continue;
            }

            if arg == "--" {
                trace!("flag terminator, {} positional arguments follow", args.len());
                self.args.extend(args.iter().cloned());
                return Ok(&[]);
            }

            let name = arg
                .strip_prefix("--")
                .or_else(|| arg.strip_prefix('-'))
                .unwrap_or(arg);
            if name.is_empty() || name.starts_with('-') || name.starts_with('=') {
                return Err(FlagError::InvalidSyntax(arg.clone()));
            }

            if HELP_ALIASES.contains(&name) {
                return Err(FlagError::Help);
            }

            if let Some((name, value)) = name.split_once('=') {
                if value.is_empty() {
                    return Err(FlagError::InvalidSyntax(arg.clone()));
                }
                trace!("flag {name} with inline value {value:?}");
                self.set_value(name, value)?;
                return Ok(args);
            }

            let Some(flag) = self.lookup(name) else {
                return Err(FlagError::UnknownFlag(name.to_string()));
            };

            if flag.value.is_bool() {
                trace!("boolean flag {name}");
                self.set_value(name, "true")?;
                return Ok(args);
            }

            let Some((value, rest)) = args.split_first() else {
                return Err(FlagError::MissingValue(name.to_string()));
            };
            if value.starts_with('-') {
                return Err(FlagError::MissingValue(name.to_string()));
            }
            trace!("flag {name} with value {value:?}");
            self.set_value(name, value)?;
            return Ok(rest);
        }
    }

    /// Assign a command-line value to a registered flag.
    ///
    /// Scalar flags keep the first value they receive. The first occurrence
    /// of a list flag replaces whatever the destination held, later
    /// occurrences append.
    fn set_value(&mut self, name: &str, value: &str) -> Result<(), FlagError> {
        let Some(&i) = self.index.get(name) else {
            return Err(FlagError::UnknownFlag(name.to_string()));
        };
        let flag = &mut self.flags[i];
        let seen = self.found.contains(name);

        let result = match (seen, flag.value.is_list()) {
            (false, _) => flag.value.replace(value),
            (true, true) => flag.value.set(value),
            (true, false) => {
                trace!("flag {name} already set, ignoring {value:?}");
                return Ok(());
            }
        };
        result.map_err(|e| FlagError::InvalidValue {
            flag: name.to_string(),
            source: e,
        })?;

        self.found.insert(name.to_string());
        Ok(())
    }
}
