//! Parameter/return type vocabulary.
//!
//! This registry covers the value shapes a problem signature may use and the loose spellings judges and users write
//! for them (`integer[]`, `List<Integer>`, `TreeNode*`, ...).
//!
//! ## Notes
//! - Lookup via [`lookup`] is **case-insensitive ASCII** and ignores `?` optionality markers.
//! - Unknown spellings are rejected unless the caller opts into [`OpaqueTypePolicy::PassThrough`].
//!
//! ## Examples
//! ```rust
//! use casebench_core::types::{self, OpaqueTypePolicy, TypeDescriptor};
//!
//! assert_eq!(types::lookup("Integer[]"), Some(TypeDescriptor::IntegerArray));
//! assert_eq!(types::lookup("TreeNode?"), Some(TypeDescriptor::BinaryTree));
//! assert!(types::resolve("Map<String,Integer>", OpaqueTypePolicy::Reject).is_err());
//! ```

use std::fmt;
use std::str::FromStr;

/// Canonical shape of a parameter or return value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    Integer,
    Float,
    Boolean,
    String,
    IntegerArray,
    StringArray,
    LinkedList,
    BinaryTree,
    /// A runtime-native type name passed through verbatim.
    ///
    /// Only produced by [`resolve`] under [`OpaqueTypePolicy::PassThrough`].
    Opaque(std::string::String),
}

/// What [`resolve`] does with a token that is not in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpaqueTypePolicy {
    /// Fail with [`UnsupportedType`].
    #[default]
    Reject,
    /// Keep the raw token as [`TypeDescriptor::Opaque`].
    PassThrough,
}

/// A type token that could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedType {
    pub token: std::string::String,
}

impl fmt::Display for UnsupportedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported type '{}'", self.token)
    }
}

impl std::error::Error for UnsupportedType {}

/// Metadata for a registered type.
#[derive(Debug, Clone)]
pub struct TypeInfo {
    pub descriptor: TypeDescriptor,
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
}

/// Registry of supported types. Aliases are stored lowercase.
pub const TYPES: &[TypeInfo] = &[
    info(
        TypeDescriptor::Integer,
        "integer",
        &["int", "long", "i32", "i64"],
        "Signed integer scalar.",
    ),
    info(TypeDescriptor::Float, "double", &["float", "f64"], "Floating-point scalar."),
    info(TypeDescriptor::Boolean, "boolean", &["bool"], "Boolean scalar."),
    info(
        TypeDescriptor::String,
        "string",
        &["str", "character", "char"],
        "Double-quoted string scalar.",
    ),
    info(
        TypeDescriptor::IntegerArray,
        "integer[]",
        &["int[]", "long[]", "list<integer>", "list<int>", "vector<int>"],
        "Bracketed list of integers.",
    ),
    info(
        TypeDescriptor::StringArray,
        "string[]",
        &["str[]", "list<string>", "vector<string>"],
        "Bracketed list of quoted strings.",
    ),
    info(
        TypeDescriptor::LinkedList,
        "ListNode",
        &["listnode*"],
        "Singly linked list of integers, written as a bracketed list.",
    ),
    info(
        TypeDescriptor::BinaryTree,
        "TreeNode",
        &["treenode*"],
        "Binary tree of integers in level-order with `null` placeholders.",
    ),
];

const fn info(
    descriptor: TypeDescriptor,
    canonical: &'static str,
    aliases: &'static [&'static str],
    description: &'static str,
) -> TypeInfo {
    TypeInfo {
        descriptor,
        canonical,
        aliases,
        description,
    }
}

/// Normalize a loose type token: trim, drop `?` markers, remove inner whitespace, lowercase.
pub fn normalize_token(token: &str) -> std::string::String {
    token
        .chars()
        .filter(|c| *c != '?' && !c.is_whitespace())
        .collect::<std::string::String>()
        .to_ascii_lowercase()
}

/// Resolve a type token against the registry.
///
/// ## Returns
/// - `Some(TypeDescriptor)` if the spelling matches a canonical name or alias.
/// - `None` otherwise (never returns [`TypeDescriptor::Opaque`]).
pub fn lookup(token: &str) -> Option<TypeDescriptor> {
    let needle = normalize_token(token);
    TYPES
        .iter()
        .find(|t| t.canonical.eq_ignore_ascii_case(&needle) || t.aliases.iter().any(|a| *a == needle))
        .map(|t| t.descriptor.clone())
}

/// Resolve a type token, applying `policy` to unknown spellings.
pub fn resolve(token: &str, policy: OpaqueTypePolicy) -> Result<TypeDescriptor, UnsupportedType> {
    if let Some(ty) = lookup(token) {
        return Ok(ty);
    }
    let trimmed = token.trim();
    match policy {
        OpaqueTypePolicy::PassThrough if !trimmed.is_empty() => Ok(TypeDescriptor::Opaque(trimmed.to_string())),
        _ => Err(UnsupportedType {
            token: token.to_string(),
        }),
    }
}

impl TypeDescriptor {
    /// Canonical spelling, as written back to problem metadata.
    pub fn canonical_name(&self) -> &str {
        match self {
            TypeDescriptor::Opaque(name) => name,
            known => TYPES
                .iter()
                .find(|t| t.descriptor == *known)
                .map(|t| t.canonical)
                .unwrap_or("opaque"),
        }
    }

    /// Whether the canonical encoding is a bracketed list.
    pub fn is_array_like(&self) -> bool {
        matches!(
            self,
            TypeDescriptor::IntegerArray
                | TypeDescriptor::StringArray
                | TypeDescriptor::LinkedList
                | TypeDescriptor::BinaryTree
        )
    }

    pub fn is_opaque(&self) -> bool {
        matches!(self, TypeDescriptor::Opaque(_))
    }

    /// Literal used when a test case omits a value for a parameter of this type.
    pub fn default_literal(&self) -> &'static str {
        match self {
            TypeDescriptor::Integer => "0",
            TypeDescriptor::Float => "0.0",
            TypeDescriptor::Boolean => "false",
            TypeDescriptor::String => "\"\"",
            TypeDescriptor::IntegerArray
            | TypeDescriptor::StringArray
            | TypeDescriptor::LinkedList
            | TypeDescriptor::BinaryTree => "[]",
            TypeDescriptor::Opaque(_) => "",
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

impl FromStr for TypeDescriptor {
    type Err = UnsupportedType;

    /// Strict parse: unknown tokens are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        resolve(s, OpaqueTypePolicy::Reject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(lookup("INTEGER"), Some(TypeDescriptor::Integer));
        assert_eq!(lookup("Integer[]"), Some(TypeDescriptor::IntegerArray));
        assert_eq!(lookup("String"), Some(TypeDescriptor::String));
    }

    #[test]
    fn test_lookup_strips_optional_marker_and_whitespace() {
        assert_eq!(lookup(" TreeNode? "), Some(TypeDescriptor::BinaryTree));
        assert_eq!(lookup("ListNode*"), Some(TypeDescriptor::LinkedList));
        assert_eq!(lookup("list< integer >"), Some(TypeDescriptor::IntegerArray));
    }

    #[test]
    fn test_lookup_aliases() {
        assert_eq!(lookup("int"), Some(TypeDescriptor::Integer));
        assert_eq!(lookup("double"), Some(TypeDescriptor::Float));
        assert_eq!(lookup("bool"), Some(TypeDescriptor::Boolean));
        assert_eq!(lookup("vector<string>"), Some(TypeDescriptor::StringArray));
        assert_eq!(lookup("listnode"), Some(TypeDescriptor::LinkedList));
    }

    #[test]
    fn test_resolve_rejects_unknown_by_default() {
        let err = resolve("Map<String,Integer>", OpaqueTypePolicy::Reject).unwrap_err();
        assert_eq!(err.token, "Map<String,Integer>");
        assert_eq!(err.to_string(), "unsupported type 'Map<String,Integer>'");
    }

    #[test]
    fn test_resolve_pass_through_keeps_token() {
        let ty = resolve(" character[][] ", OpaqueTypePolicy::PassThrough).unwrap();
        assert_eq!(ty, TypeDescriptor::Opaque("character[][]".to_string()));
        assert!(ty.is_opaque());
        assert_eq!(ty.canonical_name(), "character[][]");
    }

    #[test]
    fn test_resolve_pass_through_still_rejects_empty() {
        assert!(resolve("  ", OpaqueTypePolicy::PassThrough).is_err());
    }

    #[test]
    fn test_canonical_names_round_trip() {
        for info in TYPES {
            assert_eq!(lookup(info.descriptor.canonical_name()), Some(info.descriptor.clone()));
        }
    }

    #[test]
    fn test_array_like() {
        assert!(TypeDescriptor::IntegerArray.is_array_like());
        assert!(TypeDescriptor::BinaryTree.is_array_like());
        assert!(!TypeDescriptor::String.is_array_like());
        assert!(!TypeDescriptor::Opaque("x".into()).is_array_like());
    }

    #[test]
    fn test_from_str() {
        assert_eq!("boolean".parse::<TypeDescriptor>(), Ok(TypeDescriptor::Boolean));
        assert!("hashmap".parse::<TypeDescriptor>().is_err());
    }
}
