//! Tier 4: pull named fields straight out of text that never parsed.
//!
//! This is a heuristic. A field label that happens to appear in prose
//! outside the structured block can be picked up instead of the real value,
//! so the search is narrowed to the outermost brace span when one exists.

use super::{FieldKind, FieldSpec};
use regex::Regex;
use serde_json::{Map, Value};

/// Assemble a record holding exactly `fields`, or `None` if any is missing.
pub fn salvage_fields(text: &str, fields: &[FieldSpec]) -> Option<Map<String, Value>> {
    if fields.is_empty() {
        return None;
    }

    let scope = brace_span(text).unwrap_or(text);
    let mut record = Map::new();
    for field in fields {
        let value = match field.kind {
            FieldKind::Text => salvage_text(scope, field.name).map(Value::String),
            FieldKind::Bool => salvage_bool(scope, field.name).map(Value::Bool),
        };
        match value {
            Some(value) => {
                record.insert(field.name.to_string(), value);
            }
            None => {
                tracing::debug!(field = field.name, "field salvage could not locate field");
                return None;
            }
        }
    }
    Some(record)
}

fn brace_span(text: &str) -> Option<&str> {
    let open = text.find('{')?;
    let close = text.rfind('}')?;
    (close > open).then(|| &text[open..=close])
}

fn salvage_text(text: &str, name: &str) -> Option<String> {
    // The value ends at the first quote that is followed by another
    // `"key":` or by the closing brace, so bare inner quotes are tolerated.
    let pattern = format!(
        r#""{}"\s*:\s*"((?s:.*?))"\s*(?:,\s*"[A-Za-z_][A-Za-z0-9_]*"\s*:|\}})"#,
        regex::escape(name)
    );
    let re = Regex::new(&pattern).ok()?;
    let raw = re.captures(text)?.get(1)?.as_str();
    Some(unescape_value(raw))
}

fn salvage_bool(text: &str, name: &str) -> Option<bool> {
    let pattern = format!(r#""{}"\s*:\s*"?(true|false)\b"#, regex::escape(name));
    let re = Regex::new(&pattern).ok()?;
    let captured = re.captures(text)?.get(1)?.as_str();
    Some(captured == "true")
}

/// Turn the escape sequences a model typically emits back into the
/// characters they stand for.
fn unescape_value(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some('n') => {
                chars.next();
                out.push('\n');
            }
            Some('r') => {
                chars.next();
                if chars.peek() == Some(&'\\') {
                    // `\r\n` collapses to a single line break.
                    let mut lookahead = chars.clone();
                    lookahead.next();
                    if lookahead.peek() == Some(&'n') {
                        chars.next();
                        chars.next();
                    }
                }
                out.push('\n');
            }
            Some('t') => {
                chars.next();
                out.push('\t');
            }
            Some(quoted @ ('"' | '\\' | '/')) => {
                chars.next();
                out.push(quoted);
            }
            _ => out.push('\\'),
        }
    }
    out
}
