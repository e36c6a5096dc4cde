//! Text repairs applied before a parse attempt.
//!
//! Every function here is total: it never panics and returns `None` when it
//! has nothing to change.

use serde_json::{Map, Value};

const FENCE: &str = "```";

/// Parse `candidate` as a JSON object. Arrays and scalars do not count.
pub fn parse_object(candidate: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Tier 1: drop an opening fence (with an optional language tag) and a
/// closing fence around the text, then trim. Fences inside the text are
/// left alone.
pub fn strip_fences(text: &str) -> Option<String> {
    let mut current = text.trim();
    loop {
        let next = strip_outer_fence(current);
        if next == current {
            break;
        }
        current = next;
    }
    (current != text).then(|| current.to_string())
}

fn strip_outer_fence(text: &str) -> &str {
    let mut out = text.trim();
    if let Some(rest) = out.strip_prefix(FENCE) {
        let tag_len = rest
            .char_indices()
            .find(|(_, c)| !c.is_ascii_alphanumeric())
            .map_or(rest.len(), |(i, _)| i);
        out = &rest[tag_len..];
    }
    if let Some(rest) = out.strip_suffix(FENCE) {
        out = rest;
    }
    out.trim()
}

/// Tier 2: keep only the span from the first `{` to the last `}`.
pub fn slice_to_braces(text: &str) -> Option<String> {
    let open = text.find('{')?;
    let close = text.rfind('}')?;
    if close <= open {
        return None;
    }
    let span = &text[open..=close];
    (span.len() != text.len()).then(|| span.to_string())
}

/// Tier 3: character-level repair of string literals.
///
/// Inside string values: literal line breaks become `\n` escapes, runs of
/// backslashes collapse to one, stray quotes are escaped and control
/// characters are dropped. Outside strings only control characters other
/// than whitespace are dropped.
pub fn repair_characters(text: &str) -> Option<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 16);
    let mut in_string = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if !in_string {
            if c == '"' {
                in_string = true;
                out.push(c);
            } else if !is_stray_control(c) || c.is_whitespace() {
                out.push(c);
            }
            i += 1;
            continue;
        }

        match c {
            '\\' => {
                let mut run_end = i;
                while run_end < chars.len() && chars[run_end] == '\\' {
                    run_end += 1;
                }
                match chars.get(run_end) {
                    Some(&next) if is_escape_target(next) => {
                        out.push('\\');
                        out.push(next);
                        i = run_end + 1;
                    }
                    _ => {
                        out.push_str("\\\\");
                        i = run_end;
                    }
                }
            }
            '\r' => {
                if chars.get(i + 1) != Some(&'\n') {
                    out.push_str("\\n");
                }
                i += 1;
            }
            '\n' => {
                out.push_str("\\n");
                i += 1;
            }
            '\t' => {
                out.push_str("\\t");
                i += 1;
            }
            '"' => {
                if closes_string(&chars, i + 1) {
                    in_string = false;
                    out.push('"');
                } else {
                    out.push_str("\\\"");
                }
                i += 1;
            }
            c if is_stray_control(c) => i += 1,
            c => {
                out.push(c);
                i += 1;
            }
        }
    }

    (out != text).then_some(out)
}

fn is_stray_control(c: char) -> bool {
    c.is_control()
}

fn is_escape_target(c: char) -> bool {
    matches!(c, '"' | '\\' | '/' | 'b' | 'f' | 'n' | 'r' | 't' | 'u')
}

/// Decide whether the quote just before `from` terminates a string, by
/// looking at what follows it.
fn closes_string(chars: &[char], from: usize) -> bool {
    let next = skip_whitespace(chars, from);
    match chars.get(next) {
        None | Some('}' | ']' | ':') => true,
        Some(',') => {
            let after = skip_whitespace(chars, next + 1);
            match chars.get(after) {
                None | Some('"' | '{' | '[' | '}' | ']' | '-') => true,
                Some(c) if c.is_ascii_digit() => true,
                Some(_) => ["true", "false", "null"]
                    .iter()
                    .any(|word| starts_with_at(chars, after, word)),
            }
        }
        Some(_) => false,
    }
}

fn skip_whitespace(chars: &[char], mut from: usize) -> usize {
    while from < chars.len() && chars[from].is_whitespace() {
        from += 1;
    }
    from
}

fn starts_with_at(chars: &[char], at: usize, word: &str) -> bool {
    let mut idx = at;
    for expected in word.chars() {
        if chars.get(idx) != Some(&expected) {
            return false;
        }
        idx += 1;
    }
    // The word must end there, otherwise it is prose ("then", "nullify").
    !chars.get(idx).is_some_and(|c| c.is_alphanumeric())
}
