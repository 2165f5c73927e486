//! The flag registry and the state a single parse builds up.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::io::{self, Write};

use tracing::warn;

use crate::extractor::Extractor;
use crate::raw::RawValue;
use crate::types::ErrorHandling;
use crate::value::{FlagValue, Value};

/// Writes custom usage text in place of the generated one.
pub type UsageFn<'a> = Box<dyn Fn(&mut dyn Write) -> io::Result<()> + 'a>;

/// A registered flag.
pub struct Flag<'a> {
    pub(crate) name: String,
    pub(crate) usage: String,
    pub(crate) default: RawValue,
    pub(crate) value: Value<'a>,
    pub(crate) extractors: Vec<Box<dyn Extractor>>,
}

impl<'a> Flag<'a> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn usage(&self) -> &str {
        &self.usage
    }

    /// The value applied when neither the command line nor a source supplies one.
    pub fn default_value(&self) -> &RawValue {
        &self.default
    }

    pub fn value(&self) -> &Value<'a> {
        &self.value
    }

    /// Kind name as shown in usage text.
    pub fn kind(&self) -> &'static str {
        self.value.kind()
    }

    pub fn extractors(&self) -> &[Box<dyn Extractor>] {
        &self.extractors
    }
}

impl fmt::Debug for Flag<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Flag")
            .field("name", &self.name)
            .field("kind", &self.kind())
            .field("default", &self.default)
            .field("extractors", &self.extractors.len())
            .finish()
    }
}

/// A set of uniquely named flags bound to caller-owned variables.
///
/// Flags are declared with [`var`](Self::var) (or [`register`](Self::register)
/// for a prebuilt [`Value`]), then filled by a single call to
/// [`parse`](Self::parse). The set borrows every destination for `'a`, so the
/// variables can be read again once the set is dropped.
pub struct FlagSet<'a> {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) error_handling: ErrorHandling,
    pub(crate) parsed: bool,
    pub(crate) args: Vec<String>,
    pub(crate) flags: Vec<Flag<'a>>,
    pub(crate) index: HashMap<String, usize>,
    pub(crate) found: HashSet<String>,
    pub(crate) output: Option<Box<dyn Write + 'a>>,
    pub(crate) usage: Option<UsageFn<'a>>,
    pub(crate) exit: Box<dyn Fn(i32) + 'a>,
}

impl Default for FlagSet<'_> {
    fn default() -> Self {
        Self::new("", "", ErrorHandling::default())
    }
}

impl<'a> FlagSet<'a> {
    pub fn new(name: &str, description: &str, error_handling: ErrorHandling) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            error_handling,
            parsed: false,
            args: Vec::new(),
            flags: Vec::new(),
            index: HashMap::new(),
            found: HashSet::new(),
            output: None,
            usage: None,
            exit: Box::new(exit_process),
        }
    }

    /// Register a flag bound to `dst`.
    ///
    /// # Panics
    ///
    /// If a flag with the same name is already registered.
    pub fn var<T: FlagValue>(
        &mut self,
        dst: &'a mut T,
        name: &str,
        default: T,
        usage: &str,
        extractors: Vec<Box<dyn Extractor>>,
    ) -> &mut Self {
        self.register(name, default, usage, T::bind(dst), extractors)
    }

    /// Register a flag writing through an already-built [`Value`].
    ///
    /// # Panics
    ///
    /// If a flag with the same name is already registered.
    pub fn register(
        &mut self,
        name: &str,
        default: impl Into<RawValue>,
        usage: &str,
        value: Value<'a>,
        extractors: Vec<Box<dyn Extractor>>,
    ) -> &mut Self {
        if self.index.contains_key(name) {
            panic!("flag {name} was already defined");
        }
        self.index.insert(name.to_string(), self.flags.len());
        self.flags.push(Flag {
            name: name.to_string(),
            usage: usage.to_string(),
            default: default.into(),
            value,
            extractors,
        });
        self
    }

    pub fn lookup(&self, name: &str) -> Option<&Flag<'a>> {
        self.index.get(name).map(|&i| &self.flags[i])
    }

    /// Registered flags in registration order.
    pub fn flags(&self) -> &[Flag<'a>] {
        &self.flags
    }

    pub fn parsed(&self) -> bool {
        self.parsed
    }

    /// Number of flags that have received a value.
    pub fn nflags(&self) -> usize {
        self.found.len()
    }

    /// Whether `name` has received a value from the command line or a source.
    pub fn is_found(&self, name: &str) -> bool {
        self.found.contains(name)
    }

    /// Number of positional arguments collected so far.
    pub fn narg(&self) -> usize {
        self.args.len()
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// The `i`th positional argument, if there is one.
    pub fn arg(&self, i: usize) -> Option<&str> {
        self.args.get(i).map(String::as_str)
    }

    pub fn into_args(self) -> Vec<String> {
        self.args
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn error_handling(&self) -> ErrorHandling {
        self.error_handling
    }

    /// Send usage and error messages to `out` instead of stderr.
    pub fn set_output(&mut self, out: impl Write + 'a) {
        self.output = Some(Box::new(out));
    }

    /// Replace the generated usage text.
    pub fn set_usage(&mut self, usage: impl Fn(&mut dyn Write) -> io::Result<()> + 'a) {
        self.usage = Some(Box::new(usage));
    }

    /// Replace the process exit used by [`ErrorHandling::ExitOnError`].
    pub fn set_exit_hook(&mut self, exit: impl Fn(i32) + 'a) {
        self.exit = Box::new(exit);
    }

    /// Write usage text to the output, using the custom printer if one is set.
    pub fn print_usage(&mut self) {
        let Some(usage) = &self.usage else {
            let text = self.usage_text();
            return self.write_output(&text);
        };
        let result = match self.output.as_mut() {
            Some(out) => usage(&mut **out),
            None => usage(&mut io::stderr()),
        };
        if let Err(e) = result {
            warn!("Failed to write usage: {e}");
        }
    }

    /// Write the flag listing to the output.
    pub fn print_defaults(&mut self) {
        let text = self.defaults_text();
        self.write_output(&text);
    }

    pub(crate) fn write_output(&mut self, text: &str) {
        let result = match self.output.as_mut() {
            Some(out) => out.write_all(text.as_bytes()),
            None => io::stderr().write_all(text.as_bytes()),
        };
        if let Err(e) = result {
            warn!("Failed to write flag set output: {e}");
        }
    }
}

fn exit_process(code: i32) {
    std::process::exit(code)
}

impl fmt::Debug for FlagSet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlagSet")
            .field("name", &self.name)
            .field("error_handling", &self.error_handling)
            .field("parsed", &self.parsed)
            .field("args", &self.args)
            .field("flags", &self.flags)
            .field("found", &self.found)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::env_key;
    use std::time::Duration;

    #[test]
    fn var_registers_in_order() {
        let mut port = 0i64;
        let mut host = String::new();
        let mut fs = FlagSet::new("app", "", ErrorHandling::ContinueOnError);
        fs.var(&mut port, "port", 8080, "listen port", vec![env_key("PORT")])
            .var(&mut host, "host", "localhost".to_string(), "bind host", vec![]);

        let names: Vec<&str> = fs.flags().iter().map(Flag::name).collect();
        assert_eq!(names, ["port", "host"]);

        let port_flag = fs.lookup("port").unwrap();
        assert_eq!(port_flag.kind(), "int64");
        assert_eq!(port_flag.usage(), "listen port");
        assert_eq!(port_flag.default_value(), &RawValue::Int(8080));
        assert_eq!(port_flag.extractors().len(), 1);
        assert!(fs.lookup("missing").is_none());
    }

    #[test]
    #[should_panic(expected = "flag port was already defined")]
    fn duplicate_name_panics() {
        let mut a = 0i64;
        let mut b = 0i64;
        let mut fs = FlagSet::default();
        fs.var(&mut a, "port", 0, "", vec![]);
        fs.var(&mut b, "port", 0, "", vec![]);
    }

    #[test]
    fn register_accepts_prebuilt_value() {
        let mut timeout = Duration::ZERO;
        let mut fs = FlagSet::default();
        fs.register(
            "timeout",
            Duration::from_secs(5),
            "request timeout",
            Value::from(&mut timeout),
            vec![],
        );
        let flag = fs.lookup("timeout").unwrap();
        assert_eq!(flag.kind(), "duration");
        assert!(!flag.value().is_list());
    }

    #[test]
    fn fresh_set_state() {
        let fs = FlagSet::new("app", "does things", ErrorHandling::PanicOnError);
        assert_eq!(fs.name(), "app");
        assert_eq!(fs.description(), "does things");
        assert_eq!(fs.error_handling(), ErrorHandling::PanicOnError);
        assert!(!fs.parsed());
        assert_eq!(fs.nflags(), 0);
        assert_eq!(fs.narg(), 0);
        assert_eq!(fs.arg(0), None);
        assert!(fs.into_args().is_empty());
    }

    #[test]
    fn custom_usage_written_to_output() {
        let mut out = Vec::new();
        {
            let mut fs = FlagSet::new("app", "", ErrorHandling::ContinueOnError);
            fs.set_output(&mut out);
            fs.set_usage(|w| writeln!(w, "custom usage"));
            fs.print_usage();
        }
        assert_eq!(String::from_utf8(out).unwrap(), "custom usage\n");
    }
}
