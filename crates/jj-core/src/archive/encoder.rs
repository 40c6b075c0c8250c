use super::store::KeyedArchiver;
use super::{ArchiveValue, Encodable};

/// Typed front end over a [`KeyedArchiver`] write session.
pub struct ArchiveEncoder<'a> {
    archiver: &'a mut KeyedArchiver,
}

impl<'a> ArchiveEncoder<'a> {
    pub fn new(archiver: &'a mut KeyedArchiver) -> Self {
        Self { archiver }
    }

    /// Store `value` under `key`.
    ///
    /// Integers of any width are stored as `i32` (wrapping), booleans as
    /// booleans, everything else through its [`Encodable`] impl.
    pub fn put<T: Encodable>(&mut self, value: T, key: &str) {
        match value.encode() {
            ArchiveValue::Int32(x) => self.archiver.encode_int32(key, x),
            ArchiveValue::Bool(b) => self.archiver.encode_bool(key, b),
            other => self.archiver.encode_value(key, &other),
        }
    }

    pub fn archiver(&mut self) -> &mut KeyedArchiver {
        &mut *self.archiver
    }
}
