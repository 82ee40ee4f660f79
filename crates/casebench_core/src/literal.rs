//! Scanner for the `name = value` wire format.
//!
//! A test-case record is one line of `name = value` pairs separated by commas, e.g.
//! `nums = [2,7,11,15], target = 9`. Values are bare numbers/booleans, double-quoted strings, or bracketed lists.
//! Every generated driver implements the same scanning rules in its own language; this module is the host-side
//! reference used for validation, defaulting and example import.
//!
//! ## Notes
//! - Splitting only happens at bracket depth 0 and outside double quotes.
//! - A backslash inside a quoted string escapes the next character for scanning purposes.

use std::fmt;

/// Malformed literal or record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ParseError {}

/// Split `s` on commas at bracket depth 0 and outside quotes.
///
/// Segments are returned untrimmed. An empty input yields a single empty segment.
///
/// ## Errors
/// - Unbalanced `[`/`]` or an unterminated string literal.
pub fn split_top_level(s: &str) -> Result<Vec<&str>, ParseError> {
    let mut parts = Vec::new();
    let mut depth: usize = 0;
    let mut in_quotes = false;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in s.char_indices() {
        if in_quotes {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_quotes = false;
            }
            continue;
        }
        match c {
            '"' => in_quotes = true,
            '[' => depth += 1,
            ']' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| ParseError::new(format!("unbalanced ']' in '{}'", s)))?;
            }
            ',' if depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }

    if in_quotes {
        return Err(ParseError::new(format!("unterminated string in '{}'", s)));
    }
    if depth != 0 {
        return Err(ParseError::new(format!("unbalanced '[' in '{}'", s)));
    }
    parts.push(&s[start..]);
    Ok(parts)
}

/// Strip one pair of enclosing double quotes, if present.
pub fn unquote(s: &str) -> &str {
    let t = s.trim();
    if t.len() >= 2 && t.starts_with('"') && t.ends_with('"') {
        &t[1..t.len() - 1]
    } else {
        t
    }
}

/// Split a bracketed list literal into trimmed element texts.
///
/// Enclosing quotes around the whole literal are tolerated (`"[1,2]"`). `[]` yields no elements.
///
/// ## Errors
/// - Missing enclosing brackets, unbalanced nesting, or an empty element (`[1,,2]`).
pub fn array_elements(literal: &str) -> Result<Vec<&str>, ParseError> {
    let t = unquote(literal);
    if !(t.starts_with('[') && t.ends_with(']')) || t.len() < 2 {
        return Err(ParseError::new(format!("expected a bracketed list, found '{}'", literal.trim())));
    }
    let inner = t[1..t.len() - 1].trim();
    if inner.is_empty() {
        return Ok(Vec::new());
    }
    let parts = split_top_level(inner)?;
    let mut elements = Vec::with_capacity(parts.len());
    for part in parts {
        let element = part.trim();
        if element.is_empty() {
            return Err(ParseError::new(format!("empty element in '{}'", literal.trim())));
        }
        elements.push(element);
    }
    Ok(elements)
}

/// Parse a `name = value, ...` record into ordered pairs.
///
/// ## Errors
/// - A segment without `=`, an empty name, or a scanning error.
pub fn parse_record(line: &str) -> Result<Vec<(&str, &str)>, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Vec::new());
    }
    split_top_level(line)?
        .into_iter()
        .map(|segment| {
            let (name, value) = segment
                .split_once('=')
                .ok_or_else(|| ParseError::new(format!("expected 'name = value', found '{}'", segment.trim())))?;
            let name = name.trim();
            if name.is_empty() {
                return Err(ParseError::new(format!("missing parameter name in '{}'", segment.trim())));
            }
            Ok((name, value.trim()))
        })
        .collect()
}

/// Look up one parameter in a record.
pub fn record_field<'a>(line: &'a str, name: &str) -> Result<&'a str, ParseError> {
    parse_record(line)?
        .into_iter()
        .find(|(n, _)| *n == name)
        .map(|(_, v)| v)
        .ok_or_else(|| ParseError::new(format!("missing parameter '{}'", name)))
}

/// Encode ordered pairs as a single record line (no trailing newline).
pub fn format_record<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    pairs
        .into_iter()
        .map(|(name, value)| format!("{} = {}", name, value))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Normalize a raw example value: arrays lose whitespace outside strings and redundant outer brackets.
///
/// `[[1, 2]]` becomes `[1,2]`. Non-array values are only trimmed.
pub fn collapse_nesting(value: &str) -> String {
    let trimmed = value.trim();
    if !(trimmed.starts_with('[') && trimmed.ends_with(']')) {
        return trimmed.to_string();
    }
    let mut compact = strip_whitespace_outside_quotes(trimmed);
    while compact.starts_with("[[") && compact.ends_with("]]") && wraps_single_list(&compact) {
        compact = compact[1..compact.len() - 1].to_string();
    }
    compact
}

/// True when the outer brackets of `s` enclose exactly one bracketed element.
fn wraps_single_list(s: &str) -> bool {
    match array_elements(s) {
        Ok(elements) => elements.len() == 1,
        Err(_) => false,
    }
}

/// Remove whitespace except inside double-quoted strings.
pub fn strip_whitespace_outside_quotes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_quotes = false;
    let mut escaped = false;
    for c in s.chars() {
        if in_quotes {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_quotes = false;
            }
        } else if c == '"' {
            in_quotes = true;
            out.push(c);
        } else if !c.is_whitespace() {
            out.push(c);
        }
    }
    out
}

/// One example block parsed from problem text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleBlock {
    pub params: Vec<(String, String)>,
    pub output: String,
}

/// Parse an example block of the form `Input: a = 1, b = [2] Output: 3 Explanation: ...`.
///
/// Returns `None` when either marker is missing or the input part is not a valid record.
pub fn parse_example(text: &str) -> Option<ExampleBlock> {
    let input_at = text.find("Input:")?;
    let output_at = text.find("Output:")?;
    if output_at < input_at {
        return None;
    }
    let input = text[input_at + "Input:".len()..output_at].trim();
    let rest = &text[output_at + "Output:".len()..];
    let output = match rest.find("Explanation:") {
        Some(end) => &rest[..end],
        None => rest,
    }
    .trim();

    let pairs = parse_record(input).ok()?;
    let params = pairs
        .into_iter()
        .map(|(name, value)| (name.to_string(), collapse_nesting(value)))
        .collect();
    Some(ExampleBlock {
        params,
        output: output.to_string(),
    })
}
