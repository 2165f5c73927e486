//! Dynamically-typed values handed to the coercion layer.
//!
//! Command-line tokens arrive as strings, defaults arrive as the flag's own
//! Rust type, and file sources arrive as whatever their decoder produced.
//! [`RawValue`] is the single closed shape all of them are expressed in before
//! being assigned to a typed destination.
//!
//! Decoded documents map onto the generic variants (`Null`, `Bool`, `Int`,
//! `Uint`, `Float`, `String`, `Seq`, `Map`). The typed list variants
//! (`Strings`, `Ints`, ...) exist so that defaults and programmatic values
//! keep their element kind instead of being flattened into a `Seq`.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};

#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Duration(Duration),
    String(String),
    Bytes(Vec<u8>),
    /// A sequence of untyped elements, e.g. a decoded JSON array.
    Seq(Vec<RawValue>),
    Map(BTreeMap<String, RawValue>),
    Strings(Vec<String>),
    Ints(Vec<i64>),
    Uints(Vec<u64>),
    Floats(Vec<f64>),
    Durations(Vec<Duration>),
}

impl RawValue {
    /// Short name of the representation, used in coercion errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            RawValue::Null => "null",
            RawValue::Bool(_) => "bool",
            RawValue::Int(_) => "int",
            RawValue::Uint(_) => "uint",
            RawValue::Float(_) => "float",
            RawValue::Duration(_) => "duration",
            RawValue::String(_) => "string",
            RawValue::Bytes(_) => "bytes",
            RawValue::Seq(_) => "sequence",
            RawValue::Map(_) => "map",
            RawValue::Strings(_) => "list of string",
            RawValue::Ints(_) => "list of int",
            RawValue::Uints(_) => "list of uint",
            RawValue::Floats(_) => "list of float",
            RawValue::Durations(_) => "list of duration",
        }
    }

    /// Whether this value is a sequence. See `Value::replace`.
    pub fn is_list(&self) -> bool {
        matches!(
            self,
            RawValue::Seq(_)
                | RawValue::Strings(_)
                | RawValue::Ints(_)
                | RawValue::Uints(_)
                | RawValue::Floats(_)
                | RawValue::Durations(_)
        )
    }

    /// Split a list value into its elements, each as a standalone value.
    ///
    /// Scalars and maps are handed back unchanged as the error.
    pub fn into_elements(self) -> Result<Vec<RawValue>, RawValue> {
        let items = match self {
            RawValue::Seq(items) => items,
            RawValue::Strings(items) => items.into_iter().map(RawValue::String).collect(),
            RawValue::Ints(items) => items.into_iter().map(RawValue::Int).collect(),
            RawValue::Uints(items) => items.into_iter().map(RawValue::Uint).collect(),
            RawValue::Floats(items) => items.into_iter().map(RawValue::Float).collect(),
            RawValue::Durations(items) => items.into_iter().map(RawValue::Duration).collect(),
            other => return Err(other),
        };
        Ok(items)
    }
}

fn write_list<T>(
    f: &mut fmt::Formatter<'_>,
    items: &[T],
    mut item: impl FnMut(&mut fmt::Formatter<'_>, &T) -> fmt::Result,
) -> fmt::Result {
    write!(f, "[")?;
    for (i, value) in items.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        item(f, value)?;
    }
    write!(f, "]")
}

/// Human-readable rendering, used when a non-string value lands in a string
/// destination. Lists render as `[a b c]`, durations in humantime form.
impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Null => write!(f, "null"),
            RawValue::Bool(b) => write!(f, "{b}"),
            RawValue::Int(n) => write!(f, "{n}"),
            RawValue::Uint(n) => write!(f, "{n}"),
            RawValue::Float(x) => write!(f, "{x}"),
            RawValue::Duration(d) => write!(f, "{}", humantime::format_duration(*d)),
            RawValue::String(s) => write!(f, "{s}"),
            RawValue::Bytes(b) => write!(f, "{}", String::from_utf8_lossy(b)),
            RawValue::Seq(items) => write_list(f, items, |f, v| write!(f, "{v}")),
            RawValue::Map(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
            RawValue::Strings(items) => write_list(f, items, |f, v| write!(f, "{v}")),
            RawValue::Ints(items) => write_list(f, items, |f, v| write!(f, "{v}")),
            RawValue::Uints(items) => write_list(f, items, |f, v| write!(f, "{v}")),
            RawValue::Floats(items) => write_list(f, items, |f, v| write!(f, "{v}")),
            RawValue::Durations(items) => write_list(f, items, |f, v| {
                write!(f, "{}", humantime::format_duration(*v))
            }),
        }
    }
}

macro_rules! from_scalar {
    ($variant:ident as $target:ty: $($ty:ty),+) => {
        $(
            impl From<$ty> for RawValue {
                fn from(v: $ty) -> Self {
                    RawValue::$variant(v as $target)
                }
            }
        )+
    };
}

from_scalar!(Int as i64: i8, i16, i32, i64, isize);
from_scalar!(Uint as u64: u8, u16, u32, u64, usize);
from_scalar!(Float as f64: f32, f64);

macro_rules! from_list {
    ($variant:ident as $target:ty: $($ty:ty),+) => {
        $(
            impl From<Vec<$ty>> for RawValue {
                fn from(v: Vec<$ty>) -> Self {
                    RawValue::$variant(v.into_iter().map(|x| x as $target).collect())
                }
            }
        )+
    };
}

from_list!(Ints as i64: i32, i64, isize);
from_list!(Uints as u64: u32, u64, usize);
from_list!(Floats as f64: f32, f64);

impl From<bool> for RawValue {
    fn from(v: bool) -> Self {
        RawValue::Bool(v)
    }
}

impl From<Duration> for RawValue {
    fn from(v: Duration) -> Self {
        RawValue::Duration(v)
    }
}

impl From<String> for RawValue {
    fn from(v: String) -> Self {
        RawValue::String(v)
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        RawValue::String(v.to_string())
    }
}

impl From<&String> for RawValue {
    fn from(v: &String) -> Self {
        RawValue::String(v.clone())
    }
}

impl From<Vec<u8>> for RawValue {
    fn from(v: Vec<u8>) -> Self {
        RawValue::Bytes(v)
    }
}

impl From<&[u8]> for RawValue {
    fn from(v: &[u8]) -> Self {
        RawValue::Bytes(v.to_vec())
    }
}

impl From<Vec<String>> for RawValue {
    fn from(v: Vec<String>) -> Self {
        RawValue::Strings(v)
    }
}

impl From<Vec<&str>> for RawValue {
    fn from(v: Vec<&str>) -> Self {
        RawValue::Strings(v.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<Duration>> for RawValue {
    fn from(v: Vec<Duration>) -> Self {
        RawValue::Durations(v)
    }
}

impl From<Vec<RawValue>> for RawValue {
    fn from(v: Vec<RawValue>) -> Self {
        RawValue::Seq(v)
    }
}

impl From<BTreeMap<String, RawValue>> for RawValue {
    fn from(v: BTreeMap<String, RawValue>) -> Self {
        RawValue::Map(v)
    }
}

/// TOML datetimes have no counterpart in the value model and are kept in
/// their textual form.
impl From<toml::Value> for RawValue {
    fn from(v: toml::Value) -> Self {
        match v {
            toml::Value::String(s) => RawValue::String(s),
            toml::Value::Integer(n) => RawValue::Int(n),
            toml::Value::Float(x) => RawValue::Float(x),
            toml::Value::Boolean(b) => RawValue::Bool(b),
            toml::Value::Datetime(dt) => RawValue::String(dt.to_string()),
            toml::Value::Array(items) => {
                RawValue::Seq(items.into_iter().map(RawValue::from).collect())
            }
            toml::Value::Table(table) => RawValue::Map(
                table
                    .into_iter()
                    .map(|(k, v)| (k, RawValue::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Decodes any self-describing format (JSON, YAML, ...) into the generic
/// variants. Map keys that are not strings are rendered to text.
impl<'de> Deserialize<'de> for RawValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(RawValueVisitor)
    }
}

struct RawValueVisitor;

impl<'de> Visitor<'de> for RawValueVisitor {
    type Value = RawValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<RawValue, E> {
        Ok(RawValue::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<RawValue, E> {
        Ok(RawValue::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<RawValue, E> {
        Ok(RawValue::Uint(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<RawValue, E> {
        Ok(RawValue::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<RawValue, E> {
        Ok(RawValue::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<RawValue, E> {
        Ok(RawValue::String(v))
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<RawValue, E> {
        Ok(RawValue::Bytes(v.to_vec()))
    }

    fn visit_byte_buf<E: de::Error>(self, v: Vec<u8>) -> Result<RawValue, E> {
        Ok(RawValue::Bytes(v))
    }

    fn visit_none<E: de::Error>(self) -> Result<RawValue, E> {
        Ok(RawValue::Null)
    }

    fn visit_unit<E: de::Error>(self) -> Result<RawValue, E> {
        Ok(RawValue::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<RawValue, D::Error>
    where
        D: Deserializer<'de>,
    {
        RawValue::deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<RawValue, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<RawValue>()? {
            items.push(item);
        }
        Ok(RawValue::Seq(items))
    }

    fn visit_map<A>(self, mut map: A) -> Result<RawValue, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = BTreeMap::new();
        while let Some((key, value)) = map.next_entry::<RawValue, RawValue>()? {
            let key = match key {
                RawValue::String(s) => s,
                other => other.to_string(),
            };
            entries.insert(key, value);
        }
        Ok(RawValue::Map(entries))
    }
}
