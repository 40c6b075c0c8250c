//! jj-core: path-tracking typed access over dynamic JSON-shaped trees
//!
//! This crate focuses on a small, well-factored surface:
//! - `Node`: the raw dynamic tree (decoded by `serde_json` or built by hand)
//! - `Value` / views: navigation that never fails and records its path
//! - Three-tier extraction per type: `as_*` (Option), `to_*` (default), strict (Result)
//! - Deterministic pretty-printing with sorted object keys
//! - Keyed binary archive with the same typed accessors
//!
//! ```
//! use jj_core::{Node, wrap};
//!
//! let doc = Node::parse_json(r#"{"firstName": "Yury"}"#).unwrap();
//! assert_eq!(wrap(&doc).at("firstName").string().unwrap(), "Yury");
//!
//! let err = wrap(&doc).at("nested").at("unknown").at(0).url().unwrap_err();
//! assert_eq!(err.path(), "<root>.nested<nil>.unknown<nil>[0]");
//! ```
pub mod archive;
pub mod date;
pub mod error;
pub mod node;
pub mod path;
pub mod pretty;
pub mod value;
pub mod view;

pub use archive::{
    ArchiveDecoder, ArchiveEncoder, ArchiveValue, Decodable, DecodedValue, Encodable,
    KeyedArchiver, KeyedUnarchiver,
};
pub use date::{DateFormat, parse_rfc3339_date, to_rfc3339_string};
pub use error::{ArchiveError, Error, Result};
pub use node::{Node, Number};
pub use path::Step;
pub use pretty::PrettyOpts;
pub use value::{FromNode, Value};
pub use view::{ArrayView, MaybeArrayView, MaybeObjectView, ObjectView};

/// Wrap a tree at the `<root>` path.
pub fn wrap(node: &Node) -> Value<'_> {
    Value::new(Some(node), path::ROOT)
}

/// Wrap a subtree whose location is already known.
pub fn wrap_at(node: &Node, path: impl Into<String>) -> Value<'_> {
    Value::new(Some(node), path)
}

/// Typed write access to an archive session.
pub fn wrap_encoder(archiver: &mut KeyedArchiver) -> ArchiveEncoder<'_> {
    ArchiveEncoder::new(archiver)
}

/// Typed read access to a parsed archive.
pub fn wrap_decoder(archive: &KeyedUnarchiver) -> ArchiveDecoder<'_> {
    ArchiveDecoder::new(archive)
}
