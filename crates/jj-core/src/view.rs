// Object/array views and their null-safe `Maybe` counterparts
use std::fmt;

use crate::error::{Error, Result};
use crate::node::{Node, member_value};
use crate::path;
use crate::pretty;
use crate::value::Value;

/// A node already confirmed to be an object.
#[derive(Clone)]
pub struct ObjectView<'a> {
    members: &'a [(String, Node)],
    path: String,
}

impl<'a> ObjectView<'a> {
    pub fn new(members: &'a [(String, Node)], path: impl Into<String>) -> Self {
        Self {
            members,
            path: path.into(),
        }
    }

    /// Member `key`, absent if missing. Path is `<parent>.<key>`.
    pub fn at(&self, key: &str) -> Value<'a> {
        let new_path = path::key(&self.path, key);
        if cfg!(debug_assertions) {
            self.warn_if_deprecated(key, &new_path);
        }
        Value::new(member_value(self.members, key), new_path)
    }

    /// Like [`at`](Self::at) but a missing key is `Error::NotFound`.
    pub fn required(&self, key: &str) -> Result<Value<'a>> {
        let v = self.at(key);
        if v.exists() {
            Ok(v)
        } else {
            Err(Error::not_found(v.path()))
        }
    }

    // A document may flag a member with a sibling "$<key>__deprecated": "<why>".
    fn warn_if_deprecated(&self, key: &str, at_path: &str) {
        for marker in [format!("${key}__deprecated"), format!("${key}__depricated")] {
            if let Some(note) = member_value(self.members, &marker) {
                tracing::warn!(path = at_path, note = %note, "using deprecated field");
            }
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &'a str> {
        self.members.iter().map(|(k, _)| k.as_str())
    }

    pub fn raw(&self) -> &'a [(String, Node)] {
        self.members
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn exists(&self) -> bool {
        true
    }

    pub fn count(&self) -> usize {
        self.members.len()
    }

    pub fn pretty_print(&self, unit: &str, indent: &str) -> String {
        pretty::pretty_members(self.members, unit, indent)
    }
}

impl fmt::Debug for ObjectView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pretty_print("  ", ""))
    }
}

/// A node already confirmed to be an array.
#[derive(Clone)]
pub struct ArrayView<'a> {
    items: &'a [Node],
    path: String,
}

impl<'a> ArrayView<'a> {
    pub fn new(items: &'a [Node], path: impl Into<String>) -> Self {
        Self {
            items,
            path: path.into(),
        }
    }

    /// Element `index`, absent when out of range (negative included). The
    /// path records the attempted index either way.
    pub fn at(&self, index: i64) -> Value<'a> {
        let new_path = path::index(&self.path, index);
        let item = usize::try_from(index).ok().and_then(|i| self.items.get(i));
        Value::new(item, new_path)
    }

    pub fn required(&self, index: i64) -> Result<Value<'a>> {
        let v = self.at(index);
        if v.exists() {
            Ok(v)
        } else {
            Err(Error::not_found(v.path()))
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Value<'a>> + '_ {
        (0..self.items.len()).map(|i| self.at(i as i64))
    }

    pub fn raw(&self) -> &'a [Node] {
        self.items
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn exists(&self) -> bool {
        true
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn pretty_print(&self, unit: &str, indent: &str) -> String {
        pretty::pretty_items(self.items, unit, indent)
    }
}

impl fmt::Debug for ArrayView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pretty_print("  ", ""))
    }
}

/// The result of `Value::to_obj()`: an object view if the value was one.
#[derive(Clone)]
pub struct MaybeObjectView<'a> {
    inner: Option<ObjectView<'a>>,
    path: String,
}

impl<'a> MaybeObjectView<'a> {
    pub fn new(inner: Option<ObjectView<'a>>, path: impl Into<String>) -> Self {
        Self {
            inner,
            path: path.into(),
        }
    }

    /// With no object behind it the result is absent, at `<parent><nil>.<key>`.
    pub fn at(&self, key: &str) -> Value<'a> {
        match &self.inner {
            Some(obj) => obj.at(key),
            None => Value::new(None, path::nil_key(&self.path, key)),
        }
    }

    pub fn exists(&self) -> bool {
        self.inner.is_some()
    }

    pub fn view(&self) -> Option<&ObjectView<'a>> {
        self.inner.as_ref()
    }

    pub fn raw(&self) -> Option<&'a [(String, Node)]> {
        self.inner.as_ref().map(|o| o.raw())
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Debug for MaybeObjectView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            Some(obj) => fmt::Debug::fmt(obj, f),
            None => f.write_str("nil"),
        }
    }
}

/// The result of `Value::to_arr()`: an array view if the value was one.
#[derive(Clone)]
pub struct MaybeArrayView<'a> {
    inner: Option<ArrayView<'a>>,
    path: String,
}

impl<'a> MaybeArrayView<'a> {
    pub fn new(inner: Option<ArrayView<'a>>, path: impl Into<String>) -> Self {
        Self {
            inner,
            path: path.into(),
        }
    }

    /// With no array behind it the result is absent, at `<parent><nil>[<index>]`.
    pub fn at(&self, index: i64) -> Value<'a> {
        match &self.inner {
            Some(arr) => arr.at(index),
            None => Value::new(None, path::nil_index(&self.path, index)),
        }
    }

    pub fn exists(&self) -> bool {
        self.inner.is_some()
    }

    pub fn view(&self) -> Option<&ArrayView<'a>> {
        self.inner.as_ref()
    }

    pub fn raw(&self) -> Option<&'a [Node]> {
        self.inner.as_ref().map(|a| a.raw())
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Debug for MaybeArrayView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            Some(arr) => fmt::Debug::fmt(arr, f),
            None => f.write_str("nil"),
        }
    }
}
