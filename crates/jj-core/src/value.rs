use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use url::Url;

use crate::date::DateFormat;
use crate::error::{Error, Result};
use crate::node::{Node, Number};
use crate::path::Step;
use crate::pretty::{self, PrettyOpts};
use crate::view::{ArrayView, MaybeArrayView, MaybeObjectView, ObjectView};

pub const OBJECT_LABEL: &str = "[String: Any]";
pub const ARRAY_LABEL: &str = "[Any]";

static ROOT_URL: LazyLock<Url> =
    LazyLock::new(|| Url::parse("file:///").expect("file:/// is a valid url"));

/// A scalar type that can be read out of a [`Node`].
///
/// `LABEL` is the type name used in `WrongType` diagnostics, `from_node`
/// the matching rule, and `zero` the fallback used by
/// [`Value::get_or_zero`].
pub trait FromNode: Sized {
    const LABEL: &'static str;

    fn from_node(node: &Node) -> Option<Self>;

    fn zero() -> Self;
}

impl FromNode for bool {
    const LABEL: &'static str = "Bool";

    fn from_node(node: &Node) -> Option<Self> {
        match node {
            Node::Bool(b) => Some(*b),
            _ => None,
        }
    }

    fn zero() -> Self {
        false
    }
}

impl FromNode for i64 {
    const LABEL: &'static str = "Int";

    fn from_node(node: &Node) -> Option<Self> {
        match node {
            Node::Int(x) | Node::Number(Number::Int(x)) => Some(*x),
            Node::UInt(x) | Node::Number(Number::UInt(x)) => i64::try_from(*x).ok(),
            _ => None,
        }
    }

    fn zero() -> Self {
        0
    }
}

impl FromNode for u64 {
    const LABEL: &'static str = "UInt";

    fn from_node(node: &Node) -> Option<Self> {
        match node {
            Node::UInt(x) | Node::Number(Number::UInt(x)) => Some(*x),
            // Negative values wrap (two's complement), no range check.
            Node::Int(x) | Node::Number(Number::Int(x)) => Some(*x as u64),
            _ => None,
        }
    }

    fn zero() -> Self {
        0
    }
}

impl FromNode for Number {
    const LABEL: &'static str = "Number";

    fn from_node(node: &Node) -> Option<Self> {
        match node {
            Node::Int(x) => Some(Number::Int(*x)),
            Node::UInt(x) => Some(Number::UInt(*x)),
            Node::Float(x) => Some(Number::Float(*x)),
            Node::Double(x) => Some(Number::Double(*x)),
            Node::Number(n) => Some(*n),
            _ => None,
        }
    }

    fn zero() -> Self {
        Number::Int(0)
    }
}

impl FromNode for f32 {
    const LABEL: &'static str = "Float";

    fn from_node(node: &Node) -> Option<Self> {
        match node {
            Node::Float(x) | Node::Number(Number::Float(x)) => Some(*x),
            _ => None,
        }
    }

    fn zero() -> Self {
        0.0
    }
}

impl FromNode for f64 {
    const LABEL: &'static str = "Double";

    fn from_node(node: &Node) -> Option<Self> {
        match node {
            Node::Double(x) | Node::Number(Number::Double(x)) => Some(*x),
            _ => None,
        }
    }

    fn zero() -> Self {
        0.0
    }
}

impl FromNode for String {
    const LABEL: &'static str = "String";

    fn from_node(node: &Node) -> Option<Self> {
        match node {
            Node::Str(s) => Some(s.clone()),
            _ => None,
        }
    }

    fn zero() -> Self {
        String::new()
    }
}

impl FromNode for DateTime<Utc> {
    const LABEL: &'static str = "Date";

    fn from_node(node: &Node) -> Option<Self> {
        match node {
            Node::Str(s) => DateFormat::RFC3339.parse(s),
            _ => None,
        }
    }

    fn zero() -> Self {
        DateTime::<Utc>::default()
    }
}

impl FromNode for Url {
    const LABEL: &'static str = "URL";

    fn from_node(node: &Node) -> Option<Self> {
        match node {
            Node::Str(s) => Url::parse(s).ok(),
            _ => None,
        }
    }

    fn zero() -> Self {
        ROOT_URL.clone()
    }
}

impl FromNode for Tz {
    const LABEL: &'static str = "TimeZone";

    fn from_node(node: &Node) -> Option<Self> {
        match node {
            Node::Str(s) => s.parse::<Tz>().ok(),
            _ => None,
        }
    }

    fn zero() -> Self {
        Tz::UTC
    }
}

/// A node of the tree (or the absent marker) together with the path that
/// led to it.
///
/// Navigation (`at`) never fails. Extraction comes in three tiers per type:
/// `as_*` returns an `Option`, `to_*` falls back to a default, and the bare
/// form (`string()`, `int()`, ...) returns `Err(Error::WrongType)`.
#[derive(Clone)]
pub struct Value<'a> {
    node: Option<&'a Node>,
    path: String,
}

impl<'a> Value<'a> {
    pub fn new(node: Option<&'a Node>, path: impl Into<String>) -> Self {
        Self {
            node,
            path: path.into(),
        }
    }

    // Generic extraction

    pub fn get<T: FromNode>(&self) -> Option<T> {
        self.node.and_then(T::from_node)
    }

    pub fn get_or<T: FromNode>(&self, default: T) -> T {
        self.get().unwrap_or(default)
    }

    pub fn get_or_zero<T: FromNode>(&self) -> T {
        self.get().unwrap_or_else(T::zero)
    }

    pub fn extract<T: FromNode>(&self) -> Result<T> {
        self.get().ok_or_else(|| self.wrong_type(T::LABEL))
    }

    fn wrong_type(&self, to_type: &str) -> Error {
        Error::wrong_type(self.node, &self.path, to_type)
    }

    // Bool

    pub fn as_bool(&self) -> Option<bool> {
        self.get()
    }

    pub fn to_bool(&self, default: bool) -> bool {
        self.get_or(default)
    }

    pub fn bool(&self) -> Result<bool> {
        self.extract()
    }

    // Int

    pub fn as_int(&self) -> Option<i64> {
        self.get()
    }

    pub fn to_int(&self, default: i64) -> i64 {
        self.get_or(default)
    }

    pub fn int(&self) -> Result<i64> {
        self.extract()
    }

    // UInt

    /// Signed integers are accepted and cast, so `-1` reads as `u64::MAX`.
    pub fn as_uint(&self) -> Option<u64> {
        self.get()
    }

    pub fn to_uint(&self, default: u64) -> u64 {
        self.get_or(default)
    }

    pub fn uint(&self) -> Result<u64> {
        self.extract()
    }

    // Number

    pub fn as_number(&self) -> Option<Number> {
        self.get()
    }

    pub fn to_number(&self, default: Number) -> Number {
        self.get_or(default)
    }

    pub fn number(&self) -> Result<Number> {
        self.extract()
    }

    // Float: only nodes tagged f32, never widened from integers

    pub fn as_float(&self) -> Option<f32> {
        self.get()
    }

    pub fn to_float(&self, default: f32) -> f32 {
        self.get_or(default)
    }

    pub fn float(&self) -> Result<f32> {
        self.extract()
    }

    // Double: only nodes tagged f64

    pub fn as_double(&self) -> Option<f64> {
        self.get()
    }

    pub fn to_double(&self, default: f64) -> f64 {
        self.get_or(default)
    }

    pub fn double(&self) -> Result<f64> {
        self.extract()
    }

    // String

    pub fn as_str(&self) -> Option<&'a str> {
        match self.node {
            Some(Node::Str(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<String> {
        self.get()
    }

    pub fn to_string(&self, default: impl Into<String>) -> String {
        self.as_string().unwrap_or_else(|| default.into())
    }

    pub fn string(&self) -> Result<String> {
        self.extract()
    }

    // Date

    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        self.get()
    }

    pub fn to_date(&self, default: DateTime<Utc>) -> DateTime<Utc> {
        self.get_or(default)
    }

    pub fn date(&self) -> Result<DateTime<Utc>> {
        self.extract()
    }

    pub fn as_date_with(&self, format: &DateFormat) -> Option<DateTime<Utc>> {
        self.as_str().and_then(|s| format.parse(s))
    }

    pub fn date_with(&self, format: &DateFormat) -> Result<DateTime<Utc>> {
        self.as_date_with(format)
            .ok_or_else(|| self.wrong_type(<DateTime<Utc>>::LABEL))
    }

    // URL

    pub fn as_url(&self) -> Option<Url> {
        self.get()
    }

    pub fn to_url(&self, default: Url) -> Url {
        self.get_or(default)
    }

    pub fn url(&self) -> Result<Url> {
        self.extract()
    }

    // TimeZone

    pub fn as_time_zone(&self) -> Option<Tz> {
        self.get()
    }

    pub fn to_time_zone(&self, default: Tz) -> Tz {
        self.get_or(default)
    }

    pub fn time_zone(&self) -> Result<Tz> {
        self.extract()
    }

    // Object: views keep this value's path

    pub fn as_obj(&self) -> Option<ObjectView<'a>> {
        match self.node {
            Some(Node::Object(members)) => Some(ObjectView::new(members, self.path.clone())),
            _ => None,
        }
    }

    pub fn to_obj(&self) -> MaybeObjectView<'a> {
        MaybeObjectView::new(self.as_obj(), self.path.clone())
    }

    pub fn obj(&self) -> Result<ObjectView<'a>> {
        self.as_obj().ok_or_else(|| self.wrong_type(OBJECT_LABEL))
    }

    // Array

    pub fn as_arr(&self) -> Option<ArrayView<'a>> {
        match self.node {
            Some(Node::Array(items)) => Some(ArrayView::new(items, self.path.clone())),
            _ => None,
        }
    }

    pub fn to_arr(&self) -> MaybeArrayView<'a> {
        MaybeArrayView::new(self.as_arr(), self.path.clone())
    }

    pub fn arr(&self) -> Result<ArrayView<'a>> {
        self.as_arr().ok_or_else(|| self.wrong_type(ARRAY_LABEL))
    }

    // Navigation

    /// Step into a member (`at("key")`) or an element (`at(0)`).
    ///
    /// When this value is not an object/array the result is absent and its
    /// path carries a `<nil>` marker before the step.
    pub fn at<'k>(&self, step: impl Into<Step<'k>>) -> Value<'a> {
        match step.into() {
            Step::Key(key) => self.to_obj().at(key),
            Step::Index(index) => self.to_arr().at(index),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self.node, Some(Node::Null))
    }

    /// `true` unless the value is absent. An explicit null exists.
    pub fn exists(&self) -> bool {
        self.node.is_some()
    }

    pub fn raw(&self) -> Option<&'a Node> {
        self.node
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn pretty_print(&self, unit: &str, indent: &str) -> String {
        pretty::pretty_print(self.node, unit, indent)
    }

    pub fn pretty(&self, opts: &PrettyOpts) -> String {
        self.pretty_print(&opts.indent, "")
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pretty(&PrettyOpts::default()))
    }
}
