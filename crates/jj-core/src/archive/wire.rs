// Low-level record reader/writer for the keyed archive byte format.
//
// Layout (little-endian):
//   header   0x00, i32 major, i32 minor
//   member   0x01, lp-string key, typed value
//   end      0x0B
// A typed value is one ValueType byte followed by its payload. Strings are
// prefixed with a 7-bit encoded byte length.
use chrono::TimeZone as _;
use chrono::Utc;
use chrono_tz::Tz;
use url::Url;

use super::ArchiveValue;
use crate::error::ArchiveError;

pub(crate) const MAJOR: i32 = 1;
pub(crate) const MINOR: i32 = 0;

/// Deepest array/map nesting the reader accepts.
pub(crate) const MAX_DEPTH: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum RecordType {
    StreamHeader = 0,
    Member = 1,
    MessageEnd = 11,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ValueType {
    Boolean = 1,
    Double = 6,
    Int32 = 8,
    Single = 11,
    DateTime = 13,
    Null = 17,
    String = 18,
    Url = 32,
    TimeZone = 33,
    Array = 40,
    Map = 41,
}

impl ValueType {
    fn from_code(code: u8) -> Option<Self> {
        let t = match code {
            1 => ValueType::Boolean,
            6 => ValueType::Double,
            8 => ValueType::Int32,
            11 => ValueType::Single,
            13 => ValueType::DateTime,
            17 => ValueType::Null,
            18 => ValueType::String,
            32 => ValueType::Url,
            33 => ValueType::TimeZone,
            40 => ValueType::Array,
            41 => ValueType::Map,
            _ => return None,
        };
        Some(t)
    }
}

pub(crate) struct Writer {
    out: Vec<u8>,
}

impl Writer {
    pub(crate) fn new() -> Self {
        Self {
            out: Vec::with_capacity(256),
        }
    }
    pub(crate) fn into_bytes(self) -> Vec<u8> {
        self.out
    }
    fn push(&mut self, b: u8) {
        self.out.push(b);
    }
    fn write_i32(&mut self, v: i32) {
        self.out.extend_from_slice(&v.to_le_bytes());
    }
    fn write_i64(&mut self, v: i64) {
        self.out.extend_from_slice(&v.to_le_bytes());
    }
    fn write_f32(&mut self, v: f32) {
        self.out.extend_from_slice(&v.to_bits().to_le_bytes());
    }
    fn write_f64(&mut self, v: f64) {
        self.out.extend_from_slice(&v.to_bits().to_le_bytes());
    }
    fn write_7(&mut self, mut v: usize) {
        while v >= 0x80 {
            self.push(((v as u8) & 0x7F) | 0x80);
            v >>= 7;
        }
        self.push(v as u8);
    }
    fn write_lp_str(&mut self, s: &str) {
        self.write_7(s.len());
        self.out.extend_from_slice(s.as_bytes());
    }
    // Counts are i32 on the wire. A collection past i32::MAX entries is
    // written with a saturated count and will not read back.
    fn write_len(&mut self, len: usize) {
        let n = i32::try_from(len).unwrap_or_else(|_| {
            tracing::error!(len, "collection too large for archive, count saturated");
            i32::MAX
        });
        self.write_i32(n);
    }

    pub(crate) fn header(&mut self) {
        self.push(RecordType::StreamHeader as u8);
        self.write_i32(MAJOR);
        self.write_i32(MINOR);
    }
    pub(crate) fn member(&mut self, key: &str, v: &ArchiveValue) {
        self.push(RecordType::Member as u8);
        self.write_lp_str(key);
        self.write_value(v);
    }
    pub(crate) fn message_end(&mut self) {
        self.push(RecordType::MessageEnd as u8);
    }

    fn write_value(&mut self, v: &ArchiveValue) {
        self.push(v.value_type() as u8);
        match v {
            ArchiveValue::Null => {}
            ArchiveValue::Bool(b) => self.push(if *b { 1 } else { 0 }),
            ArchiveValue::Int32(x) => self.write_i32(*x),
            ArchiveValue::Float(x) => self.write_f32(*x),
            ArchiveValue::Double(x) => self.write_f64(*x),
            ArchiveValue::Str(s) => self.write_lp_str(s),
            ArchiveValue::Date(d) => self.write_i64(d.timestamp_millis()),
            ArchiveValue::Url(u) => self.write_lp_str(u.as_str()),
            ArchiveValue::TimeZone(tz) => self.write_lp_str(tz.name()),
            ArchiveValue::Array(items) => {
                self.write_len(items.len());
                for it in items {
                    self.write_value(it);
                }
            }
            ArchiveValue::Map(members) => {
                self.write_len(members.len());
                for (k, it) in members {
                    self.write_lp_str(k);
                    self.write_value(it);
                }
            }
        }
    }
}

pub(crate) struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Check the stream header; returns the format version.
    pub(crate) fn header(&mut self) -> Result<(i32, i32), ArchiveError> {
        let rec = self.read_u8()?;
        if rec != RecordType::StreamHeader as u8 {
            return Err(ArchiveError::BadHeader { found: rec });
        }
        let major = self.read_i32()?;
        let minor = self.read_i32()?;
        Ok((major, minor))
    }

    /// Next member record, or `None` at the end-of-message record.
    pub(crate) fn next_member(&mut self) -> Result<Option<(&'a str, ArchiveValue)>, ArchiveError> {
        let rec = self.read_u8()?;
        match rec {
            x if x == RecordType::Member as u8 => {
                let key = self.read_lp_string()?;
                let v = self.read_value(0)?;
                Ok(Some((key, v)))
            }
            x if x == RecordType::MessageEnd as u8 => Ok(None),
            other => Err(ArchiveError::UnknownRecord {
                code: other,
                pos: self.pos - 1,
            }),
        }
    }

    /// Bytes left after the end-of-message record are an error.
    pub(crate) fn finish(&self) -> Result<(), ArchiveError> {
        if self.remaining() > 0 {
            return Err(ArchiveError::TrailingData { pos: self.pos });
        }
        Ok(())
    }

    fn read_value(&mut self, depth: usize) -> Result<ArchiveValue, ArchiveError> {
        if depth > MAX_DEPTH {
            return Err(ArchiveError::TooDeep { pos: self.pos });
        }
        let code = self.read_u8()?;
        let Some(t) = ValueType::from_code(code) else {
            return Err(ArchiveError::UnknownValueType {
                code,
                pos: self.pos - 1,
            });
        };
        let v = match t {
            ValueType::Null => ArchiveValue::Null,
            ValueType::Boolean => ArchiveValue::Bool(self.read_u8()? != 0),
            ValueType::Int32 => ArchiveValue::Int32(self.read_i32()?),
            ValueType::Single => ArchiveValue::Float(self.read_f32()?),
            ValueType::Double => ArchiveValue::Double(self.read_f64()?),
            ValueType::String => ArchiveValue::Str(self.read_lp_string()?.to_string()),
            ValueType::DateTime => {
                let millis = self.read_i64()?;
                let d = Utc
                    .timestamp_millis_opt(millis)
                    .single()
                    .ok_or(ArchiveError::InvalidDate { millis })?;
                ArchiveValue::Date(d)
            }
            ValueType::Url => {
                let text = self.read_lp_string()?;
                let u = Url::parse(text).map_err(|source| ArchiveError::InvalidUrl {
                    text: text.to_string(),
                    source,
                })?;
                ArchiveValue::Url(u)
            }
            ValueType::TimeZone => {
                let name = self.read_lp_string()?;
                let tz = name
                    .parse::<Tz>()
                    .map_err(|_| ArchiveError::UnknownTimeZone(name.to_string()))?;
                ArchiveValue::TimeZone(tz)
            }
            ValueType::Array => {
                let count = self.read_len()?;
                let mut items = Vec::with_capacity(count.min(self.remaining()));
                for _ in 0..count {
                    items.push(self.read_value(depth + 1)?);
                }
                ArchiveValue::Array(items)
            }
            ValueType::Map => {
                let count = self.read_len()?;
                let mut members = Vec::with_capacity(count.min(self.remaining()));
                for _ in 0..count {
                    let k = self.read_lp_string()?.to_string();
                    members.push((k, self.read_value(depth + 1)?));
                }
                ArchiveValue::Map(members)
            }
        };
        Ok(v)
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn eof(&self) -> ArchiveError {
        ArchiveError::Eof { pos: self.pos }
    }

    fn read_u8(&mut self) -> Result<u8, ArchiveError> {
        let b = *self.data.get(self.pos).ok_or_else(|| self.eof())?;
        self.pos += 1;
        Ok(b)
    }
    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], ArchiveError> {
        let s = self.read_slice(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(s);
        Ok(out)
    }
    fn read_i32(&mut self) -> Result<i32, ArchiveError> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }
    fn read_i64(&mut self) -> Result<i64, ArchiveError> {
        Ok(i64::from_le_bytes(self.read_array()?))
    }
    fn read_f32(&mut self) -> Result<f32, ArchiveError> {
        Ok(f32::from_bits(u32::from_le_bytes(self.read_array()?)))
    }
    fn read_f64(&mut self) -> Result<f64, ArchiveError> {
        Ok(f64::from_bits(u64::from_le_bytes(self.read_array()?)))
    }
    fn read_len(&mut self) -> Result<usize, ArchiveError> {
        let pos = self.pos;
        let n = self.read_i32()?;
        usize::try_from(n).map_err(|_| ArchiveError::InvalidLength { pos })
    }
    fn read_lp_string(&mut self) -> Result<&'a str, ArchiveError> {
        let len = self.read_7bit_len()?;
        let pos = self.pos;
        let s = self.read_slice(len)?;
        std::str::from_utf8(s).map_err(|_| ArchiveError::InvalidUtf8 { pos })
    }
    fn read_slice(&mut self, len: usize) -> Result<&'a [u8], ArchiveError> {
        if len > self.remaining() {
            return Err(self.eof());
        }
        let s = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(s)
    }
    fn read_7bit_len(&mut self) -> Result<usize, ArchiveError> {
        let start = self.pos;
        let mut result: usize = 0;
        let mut shift = 0u32;
        loop {
            let b = self.read_u8()? as usize;
            result |= (b & 0x7F) << shift;
            if (b & 0x80) == 0 {
                break;
            }
            shift += 7;
            if shift > 28 {
                return Err(ArchiveError::InvalidLength { pos: start });
            }
        }
        Ok(result)
    }
}
