//! Full parse: tokenize the command line, then fill every flag it left
//! unset from the sources, falling back to defaults.
//!
//! Precedence for a single flag, highest first:
//!
//! 1. Command line (first occurrence for scalars, all occurrences for lists)
//! 2. The flag's extractors, in declared order; each searches the sources of
//!    its kind in the order they were passed
//! 3. The registered default
//!
//! Every source is opened once before the first lookup and closed once
//! afterwards, on success and on every error path.

use tracing::{debug, warn};

use crate::error::FlagError;
use crate::flagset::FlagSet;
use crate::source::Source;
use crate::types::ErrorHandling;

/// Closes every source when dropped.
struct OpenSources<'s> {
    sources: &'s mut [Box<dyn Source>],
}

impl Drop for OpenSources<'_> {
    fn drop(&mut self) {
        for source in self.sources.iter_mut() {
            if let Err(e) = source.close() {
                warn!("Failed to close {}: {e}", source.origin());
            }
        }
    }
}

impl FlagSet<'_> {
    /// Parse `args` and resolve every flag not given on the command line.
    ///
    /// A second call on an already-parsed set does nothing and returns
    /// `Ok(())`. On failure the set's [`ErrorHandling`] policy decides what
    /// happens after the error has been reported to the output.
    pub fn parse<I, S>(
        &mut self,
        args: I,
        sources: &mut [Box<dyn Source>],
    ) -> Result<(), FlagError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.parsed {
            return Ok(());
        }
        self.parsed = true;

        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        self.run(&args, sources).map_err(|err| self.fail(err))
    }

    fn run(&mut self, args: &[String], sources: &mut [Box<dyn Source>]) -> Result<(), FlagError> {
        let mut rest = args;
        while !rest.is_empty() {
            rest = self.parse_next(rest)?;
        }
        self.resolve(sources)
    }

    fn resolve(&mut self, sources: &mut [Box<dyn Source>]) -> Result<(), FlagError> {
        let guard = OpenSources { sources };
        for source in guard.sources.iter_mut() {
            source.open()?;
            debug!("Opened {} source {}", source.kind(), source.origin());
        }
        let sources = &*guard.sources;

        for flag in self.flags.iter_mut() {
            if self.found.contains(&flag.name) {
                continue;
            }

            let mut extracted = false;
            for extractor in &flag.extractors {
                if extractor.extract(sources, &mut flag.value)? {
                    extracted = true;
                    break;
                }
            }

            if extracted {
                debug!("{}: resolved from source", flag.name);
            } else {
                flag.value
                    .replace(flag.default.clone())
                    .map_err(|e| FlagError::InvalidValue {
                        flag: flag.name.clone(),
                        source: e,
                    })?;
                debug!("{}: using default {}", flag.name, flag.default);
            }
            self.found.insert(flag.name.clone());
        }
        Ok(())
    }

    /// Report `err` and apply the error-handling policy.
    fn fail(&mut self, err: FlagError) -> FlagError {
        if err.is_help() {
            self.print_usage();
        } else {
            self.write_output(&format!("{err}\n"));
            self.print_usage();
        }

        match self.error_handling {
            ErrorHandling::ContinueOnError => {}
            ErrorHandling::ExitOnError => {
                let code = if err.is_help() { 0 } else { 2 };
                (self.exit)(code);
            }
            ErrorHandling::PanicOnError => panic!("{err}"),
        }
        err
    }
}
