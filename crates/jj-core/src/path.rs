//! Traversal path strings.
//!
//! Grammar: the root is `<root>`, an object step appends `.key`, an array
//! step appends `[index]`, and a step taken through an absent or mismatched
//! branch is preceded by `<nil>`:
//!
//! ```text
//! <root>.nested<nil>.unknown<nil>[0]
//! ```
//!
//! Paths only ever grow.

pub const ROOT: &str = "<root>";
pub const NIL: &str = "<nil>";

/// One navigation step: a member key or an element index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step<'k> {
    Key(&'k str),
    Index(i64),
}

impl<'k> From<&'k str> for Step<'k> {
    fn from(k: &'k str) -> Self {
        Step::Key(k)
    }
}

impl<'k> From<&'k String> for Step<'k> {
    fn from(k: &'k String) -> Self {
        Step::Key(k.as_str())
    }
}

impl From<i32> for Step<'_> {
    fn from(i: i32) -> Self {
        Step::Index(i as i64)
    }
}

impl From<i64> for Step<'_> {
    fn from(i: i64) -> Self {
        Step::Index(i)
    }
}

impl From<usize> for Step<'_> {
    fn from(i: usize) -> Self {
        Step::Index(i64::try_from(i).unwrap_or(i64::MAX))
    }
}

pub fn key(parent: &str, key: &str) -> String {
    format!("{parent}.{key}")
}

pub fn index(parent: &str, index: i64) -> String {
    format!("{parent}[{index}]")
}

pub fn nil_key(parent: &str, key: &str) -> String {
    format!("{parent}{NIL}.{key}")
}

pub fn nil_index(parent: &str, index: i64) -> String {
    format!("{parent}{NIL}[{index}]")
}
