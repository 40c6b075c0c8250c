use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use url::Url;

use super::store::KeyedUnarchiver;
use super::{ArchiveValue, Decodable};
use crate::error::{Error, Result};
use crate::node::Node;

/// Typed front end over a [`KeyedUnarchiver`] read session.
#[derive(Clone, Copy)]
pub struct ArchiveDecoder<'a> {
    archive: &'a KeyedUnarchiver,
}

impl<'a> ArchiveDecoder<'a> {
    pub fn new(archive: &'a KeyedUnarchiver) -> Self {
        Self { archive }
    }

    pub fn key(&self, key: &str) -> DecodedValue<'a> {
        DecodedValue {
            key: key.to_string(),
            archive: self.archive,
        }
    }

    pub fn decoder(&self) -> &'a KeyedUnarchiver {
        self.archive
    }
}

/// The value stored under one key. Strict reads report the key as the path.
#[derive(Clone)]
pub struct DecodedValue<'a> {
    key: String,
    archive: &'a KeyedUnarchiver,
}

impl<'a> DecodedValue<'a> {
    pub fn raw(&self) -> Option<&'a ArchiveValue> {
        self.archive.decode_object(&self.key)
    }

    fn object<T: Decodable>(&self) -> Option<T> {
        self.raw().and_then(T::decode)
    }

    fn wrong_type(&self, to_type: &str) -> Error {
        let raw = self.raw().map(Node::from);
        Error::wrong_type(raw.as_ref(), &self.key, to_type)
    }

    // Bool

    pub fn as_bool(&self) -> Option<bool> {
        self.archive.decode_bool(&self.key)
    }

    pub fn to_bool(&self, default: bool) -> bool {
        self.as_bool().unwrap_or(default)
    }

    pub fn bool(&self) -> Result<bool> {
        self.as_bool().ok_or_else(|| self.wrong_type("Bool"))
    }

    // Int

    pub fn as_int(&self) -> Option<i64> {
        self.archive.decode_int32(&self.key).map(i64::from)
    }

    pub fn to_int(&self, default: i64) -> i64 {
        self.as_int().unwrap_or(default)
    }

    pub fn int(&self) -> Result<i64> {
        self.as_int().ok_or_else(|| self.wrong_type("Int"))
    }

    // Float and Double go through the generic object decode, so the stored
    // width must match exactly.

    pub fn as_float(&self) -> Option<f32> {
        self.object()
    }

    pub fn to_float(&self, default: f32) -> f32 {
        self.as_float().unwrap_or(default)
    }

    pub fn float(&self) -> Result<f32> {
        self.as_float().ok_or_else(|| self.wrong_type("Float"))
    }

    pub fn as_double(&self) -> Option<f64> {
        self.object()
    }

    pub fn to_double(&self, default: f64) -> f64 {
        self.as_double().unwrap_or(default)
    }

    pub fn double(&self) -> Result<f64> {
        self.as_double().ok_or_else(|| self.wrong_type("Double"))
    }

    // String

    pub fn as_string(&self) -> Option<String> {
        self.object()
    }

    pub fn to_string(&self, default: impl Into<String>) -> String {
        self.as_string().unwrap_or_else(|| default.into())
    }

    pub fn string(&self) -> Result<String> {
        self.as_string().ok_or_else(|| self.wrong_type("String"))
    }

    // Date

    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        self.object()
    }

    pub fn to_date(&self, default: DateTime<Utc>) -> DateTime<Utc> {
        self.as_date().unwrap_or(default)
    }

    pub fn date(&self) -> Result<DateTime<Utc>> {
        self.as_date().ok_or_else(|| self.wrong_type("Date"))
    }

    // URL

    pub fn as_url(&self) -> Option<Url> {
        self.object()
    }

    pub fn to_url(&self, default: Url) -> Url {
        self.as_url().unwrap_or(default)
    }

    pub fn url(&self) -> Result<Url> {
        self.as_url().ok_or_else(|| self.wrong_type("URL"))
    }

    // TimeZone

    pub fn as_time_zone(&self) -> Option<Tz> {
        self.object()
    }

    pub fn to_time_zone(&self, default: Tz) -> Tz {
        self.as_time_zone().unwrap_or(default)
    }

    pub fn time_zone(&self) -> Result<Tz> {
        self.as_time_zone().ok_or_else(|| self.wrong_type("TimeZone"))
    }

    // Any Decodable

    pub fn decode_as<T: Decodable>(&self) -> Option<T> {
        self.object()
    }

    /// Fails with `T::TYPE_LABEL` (by default `"T"`) as the type name.
    pub fn decode<T: Decodable>(&self) -> Result<T> {
        self.object().ok_or_else(|| self.wrong_type(T::TYPE_LABEL))
    }

    pub fn decoder(&self) -> &'a KeyedUnarchiver {
        self.archive
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}
