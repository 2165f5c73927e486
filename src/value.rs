//! Typed destinations and the coercion table.
//!
//! A [`Value`] borrows the caller's variable for the duration of a parse and
//! is the only thing that ever writes to it. Each variant carries the
//! concrete `&mut` destination, so [`Value::set`] is a single exhaustive match
//! over destination kinds, with the per-kind rules living in `Scalar`
//! implementations:
//!
//! | Destination | Accepts |
//! |---|---|
//! | `String` | strings as-is, bytes as UTF-8, anything else via `Display` |
//! | integers, `f64` | any number (truncating `as` conversion), decimal strings |
//! | `bool` | booleans, `1 t T true TRUE True 0 f F false FALSE False` |
//! | `Duration` | durations, numbers as nanosecond ticks, unit-suffixed strings |
//!
//! List destinations take a list value wholesale (element-wise coerced) or a
//! single scalar, which is appended. A failed assignment leaves the
//! destination untouched.

use std::str::FromStr;
use std::time::Duration;

use crate::error::CoerceError;
use crate::raw::RawValue;

/// A writable view over a caller-owned flag destination.
#[derive(Debug)]
pub enum Value<'a> {
    String(&'a mut String),
    Bool(&'a mut bool),
    Int(&'a mut isize),
    Int64(&'a mut i64),
    Uint(&'a mut usize),
    Uint64(&'a mut u64),
    Float64(&'a mut f64),
    Duration(&'a mut Duration),
    StringList(&'a mut Vec<String>),
    IntList(&'a mut Vec<isize>),
    Int64List(&'a mut Vec<i64>),
    UintList(&'a mut Vec<usize>),
    Uint64List(&'a mut Vec<u64>),
    Float64List(&'a mut Vec<f64>),
    DurationList(&'a mut Vec<Duration>),
}

impl Value<'_> {
    /// Coerce `val` into the destination.
    ///
    /// Scalar destinations are overwritten. List destinations are replaced by
    /// list values and extended by scalar values.
    pub fn set(&mut self, val: impl Into<RawValue>) -> Result<(), CoerceError> {
        let val = val.into();
        match self {
            Value::String(dst) => assign(&mut **dst, val),
            Value::Bool(dst) => assign(&mut **dst, val),
            Value::Int(dst) => assign(&mut **dst, val),
            Value::Int64(dst) => assign(&mut **dst, val),
            Value::Uint(dst) => assign(&mut **dst, val),
            Value::Uint64(dst) => assign(&mut **dst, val),
            Value::Float64(dst) => assign(&mut **dst, val),
            Value::Duration(dst) => assign(&mut **dst, val),
            Value::StringList(dst) => assign_list(&mut **dst, val),
            Value::IntList(dst) => assign_list(&mut **dst, val),
            Value::Int64List(dst) => assign_list(&mut **dst, val),
            Value::UintList(dst) => assign_list(&mut **dst, val),
            Value::Uint64List(dst) => assign_list(&mut **dst, val),
            Value::Float64List(dst) => assign_list(&mut **dst, val),
            Value::DurationList(dst) => assign_list(&mut **dst, val),
        }
    }

    /// Coerce `val` into the destination, discarding what it held.
    ///
    /// Unlike [`set`](Self::set), a scalar given to a list destination
    /// becomes a one-element list instead of being appended.
    pub fn replace(&mut self, val: impl Into<RawValue>) -> Result<(), CoerceError> {
        let val = val.into();
        if self.is_list() && !val.is_list() {
            return self.set(RawValue::Seq(vec![val]));
        }
        self.set(val)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(
            self,
            Value::StringList(_)
                | Value::IntList(_)
                | Value::Int64List(_)
                | Value::UintList(_)
                | Value::Uint64List(_)
                | Value::Float64List(_)
                | Value::DurationList(_)
        )
    }

    /// The kind name shown in usage text, e.g. `int` or `list of duration`.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::String(_) => String::KIND,
            Value::Bool(_) => bool::KIND,
            Value::Int(_) => isize::KIND,
            Value::Int64(_) => i64::KIND,
            Value::Uint(_) => usize::KIND,
            Value::Uint64(_) => u64::KIND,
            Value::Float64(_) => f64::KIND,
            Value::Duration(_) => Duration::KIND,
            Value::StringList(_) => "list of string",
            Value::IntList(_) => "list of int",
            Value::Int64List(_) => "list of int64",
            Value::UintList(_) => "list of uint",
            Value::Uint64List(_) => "list of uint64",
            Value::Float64List(_) => "list of float64",
            Value::DurationList(_) => "list of duration",
        }
    }
}

/// Rust types that can back a flag.
///
/// Implemented for every supported scalar kind and for `Vec`s of them
/// (except `bool`).
pub trait FlagValue: Into<RawValue> {
    fn bind(dst: &mut Self) -> Value<'_>;
}

macro_rules! flag_value {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl FlagValue for $ty {
                fn bind(dst: &mut Self) -> Value<'_> {
                    Value::$variant(dst)
                }
            }

            impl<'a> From<&'a mut $ty> for Value<'a> {
                fn from(dst: &'a mut $ty) -> Self {
                    Value::$variant(dst)
                }
            }
        )+
    };
}

flag_value! {
    String => String,
    bool => Bool,
    isize => Int,
    i64 => Int64,
    usize => Uint,
    u64 => Uint64,
    f64 => Float64,
    Duration => Duration,
    Vec<String> => StringList,
    Vec<isize> => IntList,
    Vec<i64> => Int64List,
    Vec<usize> => UintList,
    Vec<u64> => Uint64List,
    Vec<f64> => Float64List,
    Vec<Duration> => DurationList,
}

/// Per-kind coercion rule for a single element.
trait Scalar: Sized {
    const KIND: &'static str;

    fn coerce(val: RawValue) -> Result<Self, CoerceError>;
}

fn assign<T: Scalar>(dst: &mut T, val: RawValue) -> Result<(), CoerceError> {
    *dst = T::coerce(val)?;
    Ok(())
}

fn assign_list<T: Scalar>(dst: &mut Vec<T>, val: RawValue) -> Result<(), CoerceError> {
    match val.into_elements() {
        Ok(items) => {
            *dst = items
                .into_iter()
                .map(T::coerce)
                .collect::<Result<Vec<_>, _>>()?;
        }
        Err(scalar) => dst.push(T::coerce(scalar)?),
    }
    Ok(())
}

fn mismatch(val: &RawValue, to: &'static str) -> CoerceError {
    CoerceError::Mismatch {
        from: val.type_name(),
        to,
    }
}

fn parse_str<T>(input: &str, to: &'static str) -> Result<T, CoerceError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    input.parse::<T>().map_err(|e| CoerceError::Parse {
        input: input.to_string(),
        to,
        reason: e.to_string(),
    })
}

fn parse_bool(input: &str) -> Result<bool, CoerceError> {
    match input {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        _ => Err(CoerceError::Parse {
            input: input.to_string(),
            to: bool::KIND,
            reason: "not a boolean literal".into(),
        }),
    }
}

fn parse_duration(input: &str) -> Result<Duration, CoerceError> {
    humantime::parse_duration(input).map_err(|e| CoerceError::Parse {
        input: input.to_string(),
        to: Duration::KIND,
        reason: e.to_string(),
    })
}

impl Scalar for String {
    const KIND: &'static str = "string";

    fn coerce(val: RawValue) -> Result<Self, CoerceError> {
        Ok(match val {
            RawValue::String(s) => s,
            RawValue::Bytes(b) => String::from_utf8_lossy(&b).into_owned(),
            other => other.to_string(),
        })
    }
}

impl Scalar for bool {
    const KIND: &'static str = "bool";

    fn coerce(val: RawValue) -> Result<Self, CoerceError> {
        match val {
            RawValue::Bool(b) => Ok(b),
            RawValue::String(s) => parse_bool(&s),
            RawValue::Bytes(b) => parse_bool(&String::from_utf8_lossy(&b)),
            other => Err(mismatch(&other, Self::KIND)),
        }
    }
}

/// Numbers convert with `as`: floats truncate toward zero and signed values
/// are reinterpreted when the destination is unsigned. Strings go through the
/// 64-bit parser of the matching signedness.
macro_rules! numeric_scalar {
    ($($ty:ty => $kind:literal via $parsed:ty),+ $(,)?) => {
        $(
            impl Scalar for $ty {
                const KIND: &'static str = $kind;

                fn coerce(val: RawValue) -> Result<Self, CoerceError> {
                    match val {
                        RawValue::Int(n) => Ok(n as $ty),
                        RawValue::Uint(n) => Ok(n as $ty),
                        RawValue::Float(x) => Ok(x as $ty),
                        RawValue::String(s) => parse_str::<$parsed>(&s, $kind).map(|n| n as $ty),
                        RawValue::Bytes(b) => {
                            parse_str::<$parsed>(&String::from_utf8_lossy(&b), $kind)
                                .map(|n| n as $ty)
                        }
                        other => Err(mismatch(&other, $kind)),
                    }
                }
            }
        )+
    };
}

numeric_scalar! {
    isize => "int" via i64,
    i64 => "int64" via i64,
    usize => "uint" via u64,
    u64 => "uint64" via u64,
    f64 => "float64" via f64,
}

/// Numeric values are nanosecond ticks; strings must carry a unit.
impl Scalar for Duration {
    const KIND: &'static str = "duration";

    fn coerce(val: RawValue) -> Result<Self, CoerceError> {
        match val {
            RawValue::Duration(d) => Ok(d),
            RawValue::Int(n) => Ok(Duration::from_nanos(u64::try_from(n).unwrap_or(0))),
            RawValue::Uint(n) => Ok(Duration::from_nanos(n)),
            RawValue::Float(x) => Ok(Duration::from_nanos(x as u64)),
            RawValue::String(s) => parse_duration(&s),
            RawValue::Bytes(b) => parse_duration(&String::from_utf8_lossy(&b)),
            other => Err(mismatch(&other, Self::KIND)),
        }
    }
}
