use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::ArchiveValue;
use super::wire::{MAJOR, Reader, Writer};
use crate::error::ArchiveError;
use crate::node::Node;

/// Write side of a keyed archive session.
///
/// Values are serialized as they are encoded; [`finish`](Self::finish)
/// terminates the stream and hands back the bytes.
pub struct KeyedArchiver {
    w: Writer,
    count: usize,
}

impl KeyedArchiver {
    pub fn new() -> Self {
        let mut w = Writer::new();
        w.header();
        Self { w, count: 0 }
    }

    /// Arrays and maps hold at most `i32::MAX` entries; larger ones are
    /// written with a saturated count and cannot be read back.
    pub fn encode_value(&mut self, key: &str, value: &ArchiveValue) {
        tracing::trace!(key, kind = ?value.value_type(), "archive member");
        self.w.member(key, value);
        self.count += 1;
    }

    pub fn encode_int32(&mut self, key: &str, value: i32) {
        self.encode_value(key, &ArchiveValue::Int32(value));
    }

    pub fn encode_bool(&mut self, key: &str, value: bool) {
        self.encode_value(key, &ArchiveValue::Bool(value));
    }

    /// Number of member records written so far.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.w.message_end();
        self.w.into_bytes()
    }

    pub fn write_to_file(self, path: &Path) -> Result<(), ArchiveError> {
        fs::write(path, self.finish())?;
        Ok(())
    }
}

impl Default for KeyedArchiver {
    fn default() -> Self {
        Self::new()
    }
}

/// Read side of a keyed archive session. A key written twice keeps its last
/// value.
#[derive(Debug, Clone, Default)]
pub struct KeyedUnarchiver {
    entries: HashMap<String, ArchiveValue>,
}

impl KeyedUnarchiver {
    pub fn from_bytes(data: &[u8]) -> Result<Self, ArchiveError> {
        let mut r = Reader::new(data);
        let (major, minor) = r.header()?;
        if major > MAJOR {
            return Err(ArchiveError::UnsupportedVersion { major, minor });
        }
        let mut entries = HashMap::new();
        while let Some((key, value)) = r.next_member()? {
            entries.insert(key.to_string(), value);
        }
        r.finish()?;
        tracing::trace!(keys = entries.len(), "archive parsed");
        Ok(Self { entries })
    }

    pub fn open(path: &Path) -> Result<Self, ArchiveError> {
        let data = fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Generic object decode: whatever is stored under `key`.
    pub fn decode_object(&self, key: &str) -> Option<&ArchiveValue> {
        self.entries.get(key)
    }

    pub fn decode_int32(&self, key: &str) -> Option<i32> {
        match self.entries.get(key) {
            Some(ArchiveValue::Int32(x)) => Some(*x),
            _ => None,
        }
    }

    pub fn decode_bool(&self, key: &str) -> Option<bool> {
        match self.entries.get(key) {
            Some(ArchiveValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Stored keys in sorted order.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The whole archive as an object node, for inspection through `wrap`.
    pub fn to_node(&self) -> Node {
        Node::Object(
            self.keys()
                .into_iter()
                .map(|k| (k.to_string(), Node::from(&self.entries[k])))
                .collect(),
        )
    }
}
