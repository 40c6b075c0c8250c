//! Keyed binary archive bridge.
//!
//! A [`KeyedArchiver`] collects typed values under string keys and produces
//! bytes; a [`KeyedUnarchiver`] reads them back. [`ArchiveEncoder`] and
//! [`ArchiveDecoder`] sit on top and expose the same `as_*` / `to_*` / strict
//! triplets as [`Value`](crate::Value), with narrower rules: the archive keeps
//! each value's stored kind, and a read only succeeds for that exact kind.
//!
//! Integers are always written as 32-bit.
use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use url::Url;

use crate::date::DateFormat;
use crate::node::Node;

mod decoder;
mod encoder;
mod store;
mod wire;

pub use decoder::{ArchiveDecoder, DecodedValue};
pub use encoder::ArchiveEncoder;
pub use store::{KeyedArchiver, KeyedUnarchiver};
pub use wire::ValueType;

/// One stored archive value. The variant is the stored kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ArchiveValue {
    Null,
    Bool(bool),
    Int32(i32),
    Float(f32),
    Double(f64),
    Str(String),
    /// Millisecond precision on the wire.
    Date(DateTime<Utc>),
    Url(Url),
    TimeZone(Tz),
    Array(Vec<ArchiveValue>),
    Map(Vec<(String, ArchiveValue)>),
}

impl ArchiveValue {
    pub fn value_type(&self) -> ValueType {
        match self {
            ArchiveValue::Null => ValueType::Null,
            ArchiveValue::Bool(_) => ValueType::Boolean,
            ArchiveValue::Int32(_) => ValueType::Int32,
            ArchiveValue::Float(_) => ValueType::Single,
            ArchiveValue::Double(_) => ValueType::Double,
            ArchiveValue::Str(_) => ValueType::String,
            ArchiveValue::Date(_) => ValueType::DateTime,
            ArchiveValue::Url(_) => ValueType::Url,
            ArchiveValue::TimeZone(_) => ValueType::TimeZone,
            ArchiveValue::Array(_) => ValueType::Array,
            ArchiveValue::Map(_) => ValueType::Map,
        }
    }
}

/// Tree view of a stored value; dates, URLs and zones become strings.
impl From<&ArchiveValue> for Node {
    fn from(v: &ArchiveValue) -> Self {
        match v {
            ArchiveValue::Null => Node::Null,
            ArchiveValue::Bool(b) => Node::Bool(*b),
            ArchiveValue::Int32(x) => Node::Int(*x as i64),
            ArchiveValue::Float(x) => Node::Float(*x),
            ArchiveValue::Double(x) => Node::Double(*x),
            ArchiveValue::Str(s) => Node::Str(s.clone()),
            ArchiveValue::Date(d) => Node::Str(DateFormat::RFC3339.format(d)),
            ArchiveValue::Url(u) => Node::Str(u.as_str().to_string()),
            ArchiveValue::TimeZone(tz) => Node::Str(tz.name().to_string()),
            ArchiveValue::Array(items) => Node::Array(items.iter().map(Node::from).collect()),
            ArchiveValue::Map(members) => Node::Object(
                members
                    .iter()
                    .map(|(k, v)| (k.clone(), Node::from(v)))
                    .collect(),
            ),
        }
    }
}

/// A type that can be put into an archive.
pub trait Encodable {
    fn encode(&self) -> ArchiveValue;
}

/// A type that can be read back out of an archive.
///
/// `TYPE_LABEL` names the type in `WrongType` diagnostics raised by
/// [`DecodedValue::decode`]. It defaults to the placeholder `"T"`.
pub trait Decodable: Sized {
    const TYPE_LABEL: &'static str = "T";

    fn decode(value: &ArchiveValue) -> Option<Self>;
}

pub(crate) fn narrow_int(v: i64) -> i32 {
    if i32::try_from(v).is_err() {
        tracing::debug!(value = v, "integer narrowed to 32 bits");
    }
    v as i32
}

macro_rules! encode_int {
    ($($t:ty),*) => {
        $(
            impl Encodable for $t {
                fn encode(&self) -> ArchiveValue {
                    ArchiveValue::Int32(narrow_int(*self as i64))
                }
            }
        )*
    };
}

encode_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Encodable for bool {
    fn encode(&self) -> ArchiveValue {
        ArchiveValue::Bool(*self)
    }
}

impl Encodable for f32 {
    fn encode(&self) -> ArchiveValue {
        ArchiveValue::Float(*self)
    }
}

impl Encodable for f64 {
    fn encode(&self) -> ArchiveValue {
        ArchiveValue::Double(*self)
    }
}

impl Encodable for str {
    fn encode(&self) -> ArchiveValue {
        ArchiveValue::Str(self.to_string())
    }
}

impl Encodable for String {
    fn encode(&self) -> ArchiveValue {
        ArchiveValue::Str(self.clone())
    }
}

impl Encodable for DateTime<Utc> {
    fn encode(&self) -> ArchiveValue {
        ArchiveValue::Date(*self)
    }
}

impl Encodable for Url {
    fn encode(&self) -> ArchiveValue {
        ArchiveValue::Url(self.clone())
    }
}

impl Encodable for Tz {
    fn encode(&self) -> ArchiveValue {
        ArchiveValue::TimeZone(*self)
    }
}

impl Encodable for ArchiveValue {
    fn encode(&self) -> ArchiveValue {
        self.clone()
    }
}

impl<T: Encodable> Encodable for Option<T> {
    fn encode(&self) -> ArchiveValue {
        match self {
            Some(v) => v.encode(),
            None => ArchiveValue::Null,
        }
    }
}

impl<T: Encodable> Encodable for [T] {
    fn encode(&self) -> ArchiveValue {
        ArchiveValue::Array(self.iter().map(Encodable::encode).collect())
    }
}

impl<T: Encodable> Encodable for Vec<T> {
    fn encode(&self) -> ArchiveValue {
        self.as_slice().encode()
    }
}

impl<T: Encodable> Encodable for BTreeMap<String, T> {
    fn encode(&self) -> ArchiveValue {
        ArchiveValue::Map(self.iter().map(|(k, v)| (k.clone(), v.encode())).collect())
    }
}

impl<T: Encodable> Encodable for HashMap<String, T> {
    fn encode(&self) -> ArchiveValue {
        let mut pairs: Vec<(String, ArchiveValue)> =
            self.iter().map(|(k, v)| (k.clone(), v.encode())).collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        ArchiveValue::Map(pairs)
    }
}

impl<T: Encodable + ?Sized> Encodable for &T {
    fn encode(&self) -> ArchiveValue {
        (**self).encode()
    }
}

impl Decodable for bool {
    fn decode(value: &ArchiveValue) -> Option<Self> {
        match value {
            ArchiveValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl Decodable for i32 {
    fn decode(value: &ArchiveValue) -> Option<Self> {
        match value {
            ArchiveValue::Int32(x) => Some(*x),
            _ => None,
        }
    }
}

impl Decodable for i64 {
    fn decode(value: &ArchiveValue) -> Option<Self> {
        i32::decode(value).map(i64::from)
    }
}

impl Decodable for f32 {
    fn decode(value: &ArchiveValue) -> Option<Self> {
        match value {
            ArchiveValue::Float(x) => Some(*x),
            _ => None,
        }
    }
}

impl Decodable for f64 {
    fn decode(value: &ArchiveValue) -> Option<Self> {
        match value {
            ArchiveValue::Double(x) => Some(*x),
            _ => None,
        }
    }
}

impl Decodable for String {
    fn decode(value: &ArchiveValue) -> Option<Self> {
        match value {
            ArchiveValue::Str(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl Decodable for DateTime<Utc> {
    fn decode(value: &ArchiveValue) -> Option<Self> {
        match value {
            ArchiveValue::Date(d) => Some(*d),
            _ => None,
        }
    }
}

impl Decodable for Url {
    fn decode(value: &ArchiveValue) -> Option<Self> {
        match value {
            ArchiveValue::Url(u) => Some(u.clone()),
            _ => None,
        }
    }
}

impl Decodable for Tz {
    fn decode(value: &ArchiveValue) -> Option<Self> {
        match value {
            ArchiveValue::TimeZone(tz) => Some(*tz),
            _ => None,
        }
    }
}

impl Decodable for ArchiveValue {
    fn decode(value: &ArchiveValue) -> Option<Self> {
        Some(value.clone())
    }
}

impl<T: Decodable> Decodable for Vec<T> {
    fn decode(value: &ArchiveValue) -> Option<Self> {
        match value {
            ArchiveValue::Array(items) => items.iter().map(T::decode).collect(),
            _ => None,
        }
    }
}

impl<T: Decodable> Decodable for BTreeMap<String, T> {
    fn decode(value: &ArchiveValue) -> Option<Self> {
        match value {
            ArchiveValue::Map(members) => members
                .iter()
                .map(|(k, v)| T::decode(v).map(|v| (k.clone(), v)))
                .collect(),
            _ => None,
        }
    }
}

impl<T: Decodable> Decodable for HashMap<String, T> {
    fn decode(value: &ArchiveValue) -> Option<Self> {
        BTreeMap::<String, T>::decode(value).map(|m| m.into_iter().collect())
    }
}
