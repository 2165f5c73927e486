//! Usage text.
//!
//! ```text
//! Usage of app:
//!
//!   does things
//!
//!   -port int64
//!   	listen port (default value: 8080)
//! ```

use std::fmt;

use crate::flagset::{Flag, FlagSet};
use crate::raw::RawValue;

impl FlagSet<'_> {
    /// Header, description and flag listing, as printed by
    /// [`print_usage`](Self::print_usage) when no custom printer is set.
    pub fn usage_text(&self) -> String {
        Usage(self).to_string()
    }

    /// One entry per flag in registration order.
    pub fn defaults_text(&self) -> String {
        self.flags.iter().map(|flag| Entry(flag).to_string()).collect()
    }
}

struct Usage<'f, 'a>(&'f FlagSet<'a>);

impl fmt::Display for Usage<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fs = self.0;
        if fs.name.is_empty() {
            writeln!(f, "Usage:")?;
        } else {
            writeln!(f, "Usage of {}:", fs.name)?;
        }
        if !fs.description.is_empty() {
            writeln!(f, "\n  {}", fs.description.replace('\n', "\n  "))?;
        }
        writeln!(f)?;
        for flag in &fs.flags {
            write!(f, "{}", Entry(flag))?;
        }
        Ok(())
    }
}

struct Entry<'f, 'a>(&'f Flag<'a>);

impl fmt::Display for Entry<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flag = self.0;
        writeln!(f, "  -{} {}", flag.name, flag.kind())?;
        write!(f, "  \t{}", flag.usage.replace('\n', "\n  \t"))?;
        match &flag.default {
            RawValue::String(s) if s.is_empty() => writeln!(f),
            default => writeln!(f, " (default value: {})", Pretty(default)),
        }
    }
}

/// Default values as shown in usage: lists comma-separated in brackets,
/// durations in their shortest unit form.
pub struct Pretty<'v>(pub &'v RawValue);

impl fmt::Display for Pretty<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            RawValue::Seq(items) => join(f, items, |f, v| write!(f, "{}", Pretty(v))),
            RawValue::Strings(items) => join(f, items, |f, v| write!(f, "{v}")),
            RawValue::Ints(items) => join(f, items, |f, v| write!(f, "{v}")),
            RawValue::Uints(items) => join(f, items, |f, v| write!(f, "{v}")),
            RawValue::Floats(items) => join(f, items, |f, v| write!(f, "{v}")),
            RawValue::Durations(items) => join(f, items, |f, v| {
                write!(f, "{}", humantime::format_duration(*v))
            }),
            other => write!(f, "{other}"),
        }
    }
}

fn join<T>(
    f: &mut fmt::Formatter<'_>,
    items: &[T],
    mut item: impl FnMut(&mut fmt::Formatter<'_>, &T) -> fmt::Result,
) -> fmt::Result {
    write!(f, "[")?;
    for (i, value) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        item(f, value)?;
    }
    write!(f, "]")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ErrorHandling;
    use std::time::Duration;

    #[test]
    fn usage_with_description_and_flags() {
        let mut a = false;
        let mut b = String::new();
        let mut c: Vec<isize> = Vec::new();
        let mut fs = FlagSet::new("foo", "first line\nsecond line", ErrorHandling::ContinueOnError);
        fs.var(&mut a, "a", false, "flag a", vec![])
            .var(&mut b, "b", String::new(), "flag b", vec![])
            .var(&mut c, "c", vec![1, 2, 3], "flag c\nis multiline", vec![]);

        let expected = "Usage of foo:\n\
                        \n  first line\n  second line\n\
                        \n\
                        \x20 -a bool\n  \tflag a (default value: false)\n\
                        \x20 -b string\n  \tflag b\n\
                        \x20 -c list of int\n  \tflag c\n  \tis multiline (default value: [1, 2, 3])\n";
        assert_eq!(fs.usage_text(), expected);
    }

    #[test]
    fn unnamed_set_without_description() {
        let mut n = 0u64;
        let mut fs = FlagSet::default();
        fs.var(&mut n, "n", 3, "", vec![]);
        assert_eq!(
            fs.usage_text(),
            "Usage:\n\n  -n uint64\n  \t (default value: 3)\n"
        );
    }

    #[test]
    fn print_defaults_writes_listing() {
        let mut out = Vec::new();
        let mut d = Duration::ZERO;
        {
            let mut fs = FlagSet::default();
            fs.set_output(&mut out);
            fs.var(&mut d, "timeout", Duration::from_secs(90), "how long", vec![]);
            fs.print_defaults();
        }
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "  -timeout duration\n  \thow long (default value: 1m 30s)\n"
        );
    }

    #[test]
    fn pretty_values() {
        let cases: Vec<(RawValue, &str)> = vec![
            (vec!["a", "b", "c"].into(), "[a, b, c]"),
            (vec![1isize, 2, 3].into(), "[1, 2, 3]"),
            (vec![1usize, 2, 3].into(), "[1, 2, 3]"),
            (vec![1i64, 2, 3].into(), "[1, 2, 3]"),
            (vec![1u64, 2, 3].into(), "[1, 2, 3]"),
            (vec![1.5f64, 2.0].into(), "[1.5, 2]"),
            (
                vec![Duration::from_secs(1), Duration::from_millis(5)].into(),
                "[1s, 5ms]",
            ),
            (Duration::from_secs(1).into(), "1s"),
            (Duration::ZERO.into(), "0s"),
            (RawValue::Seq(vec![RawValue::Int(1), "x".into()]), "[1, x]"),
            (Vec::<String>::new().into(), "[]"),
            (true.into(), "true"),
            ("plain".into(), "plain"),
        ];
        for (value, expected) in cases {
            assert_eq!(Pretty(&value).to_string(), expected);
        }
    }
}
