use thiserror::Error;

use crate::node::Node;

/// Extraction failures. Navigation never produces one of these; only the
/// strict extractors (`Value::string()`, `DecodedValue::int()`, ...) and the
/// strict lookups (`ObjectView::required`) do.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The node at `path` exists (or not) but does not match `to_type`.
    #[error("WrongType: Can't convert {} at path: '{path}' to type '{to_type}'", render_raw(.raw))]
    WrongType {
        raw: Option<Node>,
        path: String,
        to_type: String,
    },
    #[error("NotFound: No object at path: '{path}'")]
    NotFound { path: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub fn wrong_type(raw: Option<&Node>, path: &str, to_type: &str) -> Self {
        Error::WrongType {
            raw: raw.cloned(),
            path: path.to_string(),
            to_type: to_type.to_string(),
        }
    }

    pub fn not_found(path: impl Into<String>) -> Self {
        Error::NotFound { path: path.into() }
    }

    pub fn path(&self) -> &str {
        match self {
            Error::WrongType { path, .. } | Error::NotFound { path } => path,
        }
    }
}

fn render_raw(raw: &Option<Node>) -> String {
    match raw {
        Some(node) => node.to_string(),
        None => "nil".to_string(),
    }
}

/// Failures reading or writing the keyed archive byte format.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("unexpected end of archive at {pos:#x}")]
    Eof { pos: usize },
    #[error("expected stream header (0), found {found:#x}")]
    BadHeader { found: u8 },
    #[error("unsupported archive version {major}.{minor}")]
    UnsupportedVersion { major: i32, minor: i32 },
    #[error("unknown/unsupported record {code:#x} at {pos:#x}")]
    UnknownRecord { code: u8, pos: usize },
    #[error("unknown value type {code} at {pos:#x}")]
    UnknownValueType { code: u8, pos: usize },
    #[error("invalid utf8 in string at {pos:#x}")]
    InvalidUtf8 { pos: usize },
    #[error("nesting too deep at {pos:#x}")]
    TooDeep { pos: usize },
    #[error("trailing data after end of archive at {pos:#x}")]
    TrailingData { pos: usize },
    #[error("invalid length at {pos:#x}")]
    InvalidLength { pos: usize },
    #[error("date out of range: {millis} ms")]
    InvalidDate { millis: i64 },
    #[error("invalid url {text:?}: {source}")]
    InvalidUrl {
        text: String,
        #[source]
        source: url::ParseError,
    },
    #[error("unknown time zone {0:?}")]
    UnknownTimeZone(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
