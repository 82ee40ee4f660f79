//! Output Comparator
//!
//! Type-aware equality between an actual and an expected encoded result. Both sides lose all whitespace first.
//! Array-like results are compared element by element after a structured JSON parse, falling back to a top-level
//! comma split with numeric coercion when either side is not valid JSON. Everything else is an exact, case-sensitive
//! string comparison. Comparison never fails: an unparsable side is a mismatch.

use casebench_core::literal;
use casebench_core::types::{self, TypeDescriptor};
use serde_json::Value as Json;

/// One structurally compared array element.
#[derive(Debug, Clone, PartialEq)]
enum Element {
    Num(f64),
    Text(String),
    Bool(bool),
    Null,
    Nested(Vec<Element>),
}

/// Outcome of a comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Match,
    Mismatch,
    /// One side could not be read as a list; counted as a mismatch.
    Ambiguous(String),
}

impl Verdict {
    pub fn is_match(&self) -> bool {
        matches!(self, Verdict::Match)
    }
}

/// Compare two encoded results of type `ty`.
///
/// An opaque type is array-like when its raw token looks like one.
pub fn compare(actual: &str, expected: &str, ty: &TypeDescriptor) -> bool {
    let array_like = match ty {
        TypeDescriptor::Opaque(token) => token_looks_array_like(token),
        ty => ty.is_array_like(),
    };
    judge(actual, expected, array_like).is_match()
}

/// Compare two encoded results whose return type is given as a raw token.
///
/// Unresolvable tokens are treated as array-like when they look like one (`[]` or `vector`).
pub fn compare_outputs(actual: &str, expected: &str, type_token: &str) -> bool {
    let array_like = match types::lookup(type_token) {
        Some(ty) => ty.is_array_like(),
        None => token_looks_array_like(type_token),
    };
    judge(actual, expected, array_like).is_match()
}

fn token_looks_array_like(token: &str) -> bool {
    let token = types::normalize_token(token);
    token.contains("[]") || token.contains("vector")
}

/// Full comparison with the reason for an ambiguous verdict.
pub fn judge(actual: &str, expected: &str, array_like: bool) -> Verdict {
    let actual = strip_whitespace(actual);
    let expected = strip_whitespace(expected);
    if !array_like {
        return if actual == expected { Verdict::Match } else { Verdict::Mismatch };
    }

    let parsed = match (parse_json(&actual), parse_json(&expected)) {
        (Some(a), Some(e)) => Some((a, e)),
        _ => match (parse_loose(&actual), parse_loose(&expected)) {
            (Ok(a), Ok(e)) => Some((a, e)),
            (Err(err), _) | (_, Err(err)) => {
                let reason = format!("cannot read '{}' or '{}' as a list: {}", actual, expected, err);
                tracing::warn!(%reason, "comparison ambiguity");
                return Verdict::Ambiguous(reason);
            }
        },
    };

    match parsed {
        Some((a, e)) if a == e => Verdict::Match,
        _ => Verdict::Mismatch,
    }
}

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Strict parse: the text must be a JSON array.
fn parse_json(text: &str) -> Option<Vec<Element>> {
    match serde_json::from_str::<Json>(text) {
        Ok(Json::Array(items)) => Some(items.iter().map(from_json).collect()),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!(text, error = %e, "structured parse failed, falling back");
            None
        }
    }
}

fn from_json(value: &Json) -> Element {
    match value {
        Json::Null => Element::Null,
        Json::Bool(b) => Element::Bool(*b),
        Json::Number(n) => n.as_f64().map_or_else(|| Element::Text(n.to_string()), Element::Num),
        Json::String(s) => Element::Text(s.clone()),
        Json::Array(items) => Element::Nested(items.iter().map(from_json).collect()),
        Json::Object(_) => Element::Text(value.to_string()),
    }
}

/// Fallback parse: bracketed list split on top-level commas, each element coerced.
fn parse_loose(text: &str) -> Result<Vec<Element>, literal::ParseError> {
    literal::array_elements(text)?
        .into_iter()
        .map(coerce)
        .collect()
}

fn coerce(item: &str) -> Result<Element, literal::ParseError> {
    if item.starts_with('[') {
        return parse_loose(item).map(Element::Nested);
    }
    if item.len() >= 2 && item.starts_with('"') && item.ends_with('"') {
        return Ok(Element::Text(literal::unquote(item).to_string()));
    }
    Ok(match item {
        "null" => Element::Null,
        "true" => Element::Bool(true),
        "false" => Element::Bool(false),
        _ => match item.parse::<f64>() {
            Ok(n) => Element::Num(n),
            Err(_) => Element::Text(item.to_string()),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_whitespace_insensitive() {
        assert!(compare("[1, 2, 3]", "[1,2,3]", &TypeDescriptor::IntegerArray));
        assert!(compare_outputs("[1, 2, 3]", "[1,2,3]", "integer[]"));
    }

    #[test]
    fn test_array_order_matters() {
        assert!(!compare("[1,2]", "[2,1]", &TypeDescriptor::IntegerArray));
    }

    #[test]
    fn test_array_length_matters() {
        assert!(!compare("[1,2]", "[1,2,3]", &TypeDescriptor::IntegerArray));
        assert!(compare("[]", "[ ]", &TypeDescriptor::IntegerArray));
    }

    #[test]
    fn test_scalar_comparison_is_case_sensitive() {
        assert!(!compare("True", "true", &TypeDescriptor::Boolean));
        assert!(compare(" true\n", "true", &TypeDescriptor::Boolean));
        assert!(!compare("\"Abc\"", "\"abc\"", &TypeDescriptor::String));
    }

    #[test]
    fn test_numeric_coercion_in_fallback() {
        // single-quoted strings are not JSON, so both sides take the fallback path
        assert!(compare("[1.0,'a']", "[1,'a']", &TypeDescriptor::StringArray));
        assert!(compare("[1.0,2]", "[1,2.00]", &TypeDescriptor::IntegerArray));
    }

    #[test]
    fn test_tree_nulls() {
        assert!(compare(
            "[3,9,20,null,null,15,7]",
            "[3, 9, 20, null, null, 15, 7]",
            &TypeDescriptor::BinaryTree
        ));
        assert!(!compare("[1,null,2]", "[1,2]", &TypeDescriptor::BinaryTree));
    }

    #[test]
    fn test_nested_arrays() {
        assert!(compare_outputs("[[1,2],[3]]", "[[1, 2], [3]]", "integer[][]"));
        assert!(!compare_outputs("[[1,2],[3]]", "[[2,1],[3]]", "integer[][]"));
    }

    #[test]
    fn test_unparsable_side_is_ambiguous_mismatch() {
        let verdict = judge("[1,2", "[1,2]", true);
        assert!(matches!(verdict, Verdict::Ambiguous(_)));
        assert!(!compare("[1,2", "[1,2]", &TypeDescriptor::IntegerArray));
        assert!(!compare("", "[]", &TypeDescriptor::IntegerArray));
    }

    #[test]
    fn test_unknown_token_heuristic() {
        assert!(compare_outputs("[1, 2]", "[1,2]", "vector<long long>"));
        assert!(compare_outputs("a b", "ab ", "Node"));
    }

    #[test]
    fn test_opaque_return_uses_token_heuristic() {
        let grid = TypeDescriptor::Opaque("int[][]".to_string());
        assert!(compare("[[1, 2], [3]]", "[[1,2],[3]]", &grid));
        assert!(compare("[[1.0,2],[3]]", "[[1,2],[3]]", &grid));
        assert!(!compare("[[2,1],[3]]", "[[1,2],[3]]", &grid));

        let node = TypeDescriptor::Opaque("Node".to_string());
        assert!(!compare("[1.0]", "[1]", &node));
    }
}
