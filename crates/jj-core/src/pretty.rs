// Deterministic text rendering of nodes: indented (pretty) and single-line (compact)
use std::fmt::Write as _;

use crate::node::Node;

/// Pretty-print options.
#[derive(Debug, Clone)]
pub struct PrettyOpts {
    /// Added once per nesting level.
    pub indent: String,
}

impl Default for PrettyOpts {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
        }
    }
}

/// Render `node` (or `nil` when absent) with `unit` added per level,
/// starting at `indent`. Object keys are emitted in sorted order.
pub fn pretty_print(node: Option<&Node>, unit: &str, indent: &str) -> String {
    let mut out = String::new();
    match node {
        Some(n) => {
            write_pretty(n, unit, indent, &mut out).ok();
        }
        None => out.push_str("nil"),
    }
    out
}

pub(crate) fn pretty_items(items: &[Node], unit: &str, indent: &str) -> String {
    let mut out = String::new();
    write_items(items, unit, indent, &mut out).ok();
    out
}

pub(crate) fn pretty_members(members: &[(String, Node)], unit: &str, indent: &str) -> String {
    let mut out = String::new();
    write_members(members, unit, indent, &mut out).ok();
    out
}

fn write_pretty(v: &Node, unit: &str, indent: &str, out: &mut String) -> std::fmt::Result {
    match v {
        Node::Array(items) => write_items(items, unit, indent, out),
        Node::Object(members) => write_members(members, unit, indent, out),
        other => write_scalar(other, out),
    }
}

fn write_items(items: &[Node], unit: &str, indent: &str, out: &mut String) -> std::fmt::Result {
    if items.is_empty() {
        out.push_str("[]");
        return Ok(());
    }
    let next = format!("{indent}{unit}");
    out.push_str("[\n");
    for (i, it) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(",\n");
        }
        out.push_str(&next);
        write_pretty(it, unit, &next, out)?;
    }
    write!(out, "\n{indent}]")
}

fn write_members(
    members: &[(String, Node)],
    unit: &str,
    indent: &str,
    out: &mut String,
) -> std::fmt::Result {
    if members.is_empty() {
        out.push_str("{}");
        return Ok(());
    }
    let next = format!("{indent}{unit}");
    out.push_str("{\n");
    for (i, (name, val)) in sorted(members).into_iter().enumerate() {
        if i > 0 {
            out.push_str(",\n");
        }
        write!(out, "{next}\"{}\": ", escape_json(name))?;
        write_pretty(val, unit, &next, out)?;
    }
    write!(out, "\n{indent}}}")
}

/// Single line, no whitespace, sorted keys.
pub fn compact(v: &Node) -> String {
    let mut out = String::new();
    write_compact(v, &mut out).ok();
    out
}

fn write_compact(v: &Node, out: &mut String) -> std::fmt::Result {
    match v {
        Node::Array(items) => {
            out.push('[');
            for (i, it) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_compact(it, out)?;
            }
            out.push(']');
        }
        Node::Object(members) => {
            out.push('{');
            for (i, (name, val)) in sorted(members).into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write!(out, "\"{}\":", escape_json(name))?;
                write_compact(val, out)?;
            }
            out.push('}');
        }
        other => write_scalar(other, out)?,
    }
    Ok(())
}

fn write_scalar(v: &Node, out: &mut String) -> std::fmt::Result {
    match v {
        Node::Null => out.push_str("null"),
        Node::Bool(b) => write!(out, "{}", if *b { "true" } else { "false" })?,
        Node::Int(x) => write!(out, "{}", x)?,
        Node::UInt(x) => write!(out, "{}", x)?,
        // Debug keeps a fractional part on whole floats: 10.0, not 10
        Node::Float(x) => write!(out, "{:?}", x)?,
        Node::Double(x) => write!(out, "{:?}", x)?,
        Node::Number(n) => write!(out, "{}", n)?,
        Node::Str(s) => write!(out, "\"{}\"", escape_json(s))?,
        Node::Array(_) | Node::Object(_) => write_compact(v, out)?,
    }
    Ok(())
}

fn sorted(members: &[(String, Node)]) -> Vec<(&str, &Node)> {
    let mut pairs: Vec<(&str, &Node)> = members.iter().map(|(k, v)| (k.as_str(), v)).collect();
    pairs.sort_by(|a, b| a.0.cmp(b.0));
    pairs
}

fn escape_json(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                write!(&mut out, "\\u{:04x}", c as u32).ok();
            }
            c => out.push(c),
        }
    }
    out
}
