//! Declarative decode/encode rule table.
//!
//! Each canonical type maps to exactly one [`CodecRule`]: the runtime-neutral stem of its decoder and encoder helpers.
//! Backends supply a helper library implementing `decode_<stem>`/`encode_<stem>` in their own language and naming
//! convention, so adding a runtime means implementing the helpers rather than rewriting a driver template.

use casebench_core::TypeDescriptor;

/// Value shape a rule handles. Mirrors [`TypeDescriptor`] with a single entry for opaque types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Codec {
    Integer,
    Float,
    Boolean,
    String,
    IntegerArray,
    StringArray,
    LinkedList,
    BinaryTree,
    /// Raw literal text in, default textual conversion out.
    Raw,
}

/// Decode/encode rule for one value shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecRule {
    pub codec: Codec,
    /// Helper stem: backends call `decode_<stem>` / `encode_<stem>` (or their naming equivalent).
    pub stem: &'static str,
    pub description: &'static str,
}

/// The rule table.
pub const CODEC_RULES: &[CodecRule] = &[
    rule(Codec::Integer, "int", "Parse a bare integer; print it verbatim."),
    rule(Codec::Float, "float", "Parse a number; print with five fractional digits."),
    rule(Codec::Boolean, "bool", "Accept true/false/1/0; print true/false."),
    rule(Codec::String, "str", "Strip enclosing quotes; print double-quoted."),
    rule(
        Codec::IntegerArray,
        "int_array",
        "Split on top-level commas, parse integers; print [a,b,c].",
    ),
    rule(
        Codec::StringArray,
        "str_array",
        "Split on top-level commas, unquote; print [\"a\",\"b\"].",
    ),
    rule(
        Codec::LinkedList,
        "list",
        "Fold an integer array into a chain (empty = absent); walk the chain to print.",
    ),
    rule(
        Codec::BinaryTree,
        "tree",
        "Level order with null placeholders; print level order without the trailing null run.",
    ),
    rule(Codec::Raw, "raw", "Pass the trimmed literal through; print the runtime's default text."),
];

const fn rule(codec: Codec, stem: &'static str, description: &'static str) -> CodecRule {
    CodecRule {
        codec,
        stem,
        description,
    }
}

impl Codec {
    pub fn of(ty: &TypeDescriptor) -> Codec {
        match ty {
            TypeDescriptor::Integer => Codec::Integer,
            TypeDescriptor::Float => Codec::Float,
            TypeDescriptor::Boolean => Codec::Boolean,
            TypeDescriptor::String => Codec::String,
            TypeDescriptor::IntegerArray => Codec::IntegerArray,
            TypeDescriptor::StringArray => Codec::StringArray,
            TypeDescriptor::LinkedList => Codec::LinkedList,
            TypeDescriptor::BinaryTree => Codec::BinaryTree,
            TypeDescriptor::Opaque(_) => Codec::Raw,
        }
    }
}

/// Look up the rule for a type.
pub fn rule_for(ty: &TypeDescriptor) -> &'static CodecRule {
    let codec = Codec::of(ty);
    CODEC_RULES
        .iter()
        .find(|r| r.codec == codec)
        .expect("INVARIANT: every codec has a rule in CODEC_RULES")
}

impl CodecRule {
    /// `decode_<stem>`
    pub fn decoder(&self) -> String {
        format!("decode_{}", self.stem)
    }

    /// `encode_<stem>`
    pub fn encoder(&self) -> String {
        format!("encode_{}", self.stem)
    }

    /// Java-style camelCase helper name (`decode_int_array` → `decodeIntArray`).
    pub fn camel(name: &str) -> String {
        let mut out = String::with_capacity(name.len());
        let mut upper = false;
        for c in name.chars() {
            if c == '_' {
                upper = true;
            } else if upper {
                out.push(c.to_ascii_uppercase());
                upper = false;
            } else {
                out.push(c);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_codec_has_one_rule() {
        let codecs = [
            Codec::Integer,
            Codec::Float,
            Codec::Boolean,
            Codec::String,
            Codec::IntegerArray,
            Codec::StringArray,
            Codec::LinkedList,
            Codec::BinaryTree,
            Codec::Raw,
        ];
        for codec in codecs {
            assert_eq!(CODEC_RULES.iter().filter(|r| r.codec == codec).count(), 1, "{:?}", codec);
        }
    }

    #[test]
    fn test_rule_for_descriptor() {
        let rule = rule_for(&TypeDescriptor::BinaryTree);
        assert_eq!(rule.decoder(), "decode_tree");
        assert_eq!(rule.encoder(), "encode_tree");
        assert_eq!(rule_for(&TypeDescriptor::Opaque("x".into())).codec, Codec::Raw);
    }

    #[test]
    fn test_camel_case_helper_names() {
        assert_eq!(CodecRule::camel("decode_int_array"), "decodeIntArray");
        assert_eq!(CodecRule::camel("encode_str"), "encodeStr");
    }
}
