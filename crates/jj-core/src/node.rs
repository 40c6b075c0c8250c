// Dynamic tree nodes: the raw input every accessor reads from
use std::fmt;

use serde_json::Value as J;

/// One node of a dynamically-typed, JSON-shaped tree.
///
/// Numeric variants keep their width tag so that extraction can tell an
/// integer from a float and an `f32` from an `f64`.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f32),
    Double(f64),
    Str(String),
    Array(Vec<Node>),
    /// Members in insertion order; lookups return the first match.
    Object(Vec<(String, Node)>),
    /// Opaque numeric box, for producers that do not commit to a width.
    Number(Number),
}

/// Generic numeric box, the target of `Value::number()`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    UInt(u64),
    Float(f32),
    Double(f64),
}

impl Node {
    /// Decode JSON text into a tree. Tokenizing is left to `serde_json`.
    pub fn parse_json(text: &str) -> Result<Node, serde_json::Error> {
        serde_json::from_str::<J>(text).map(Node::from)
    }

    pub fn object<K: Into<String>>(members: impl IntoIterator<Item = (K, Node)>) -> Node {
        Node::Object(members.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn member(&self, name: &str) -> Option<&Node> {
        match self {
            Node::Object(members) => member_value(members, name),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Null)
    }
}

pub(crate) fn member_value<'a>(members: &'a [(String, Node)], name: &str) -> Option<&'a Node> {
    members.iter().find(|(n, _)| n == name).map(|(_, v)| v)
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(x) => write!(f, "{}", x),
            Number::UInt(x) => write!(f, "{}", x),
            Number::Float(x) => write!(f, "{:?}", x),
            Number::Double(x) => write!(f, "{:?}", x),
        }
    }
}

/// Single-line rendering with sorted keys, used in diagnostics.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::pretty::compact(self))
    }
}

impl From<J> for Node {
    fn from(v: J) -> Self {
        match v {
            J::Null => Node::Null,
            J::Bool(b) => Node::Bool(b),
            J::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Node::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Node::UInt(u)
                } else {
                    Node::Double(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            J::String(s) => Node::Str(s),
            J::Array(items) => Node::Array(items.into_iter().map(Node::from).collect()),
            J::Object(map) => Node::Object(map.into_iter().map(|(k, v)| (k, Node::from(v))).collect()),
        }
    }
}

impl From<&J> for Node {
    fn from(v: &J) -> Self {
        Node::from(v.clone())
    }
}

impl From<bool> for Node {
    fn from(b: bool) -> Self {
        Node::Bool(b)
    }
}

impl From<i32> for Node {
    fn from(x: i32) -> Self {
        Node::Int(x as i64)
    }
}

impl From<i64> for Node {
    fn from(x: i64) -> Self {
        Node::Int(x)
    }
}

impl From<u64> for Node {
    fn from(x: u64) -> Self {
        Node::UInt(x)
    }
}

impl From<f32> for Node {
    fn from(x: f32) -> Self {
        Node::Float(x)
    }
}

impl From<f64> for Node {
    fn from(x: f64) -> Self {
        Node::Double(x)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::Str(s.to_string())
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::Str(s)
    }
}

impl From<Number> for Node {
    fn from(n: Number) -> Self {
        Node::Number(n)
    }
}

impl From<Vec<Node>> for Node {
    fn from(items: Vec<Node>) -> Self {
        Node::Array(items)
    }
}
