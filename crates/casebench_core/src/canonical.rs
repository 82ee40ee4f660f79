//! Reference implementation of the canonical value encoding.
//!
//! Generated drivers decode literals and encode results in their own language; this module expresses the same
//! rules over Rust values so the host can validate inputs before spawning anything, and so the conventions can be
//! tested without a toolchain.
//!
//! ## Conventions
//! - Integers and floats print as plain text; floats always carry five fractional digits (`2.50000`).
//! - Booleans print as `true`/`false`; strings are wrapped in double quotes without escaping.
//! - Arrays and linked lists print as `[a,b,c]` with no whitespace.
//! - Trees print in level order: every present node contributes two child slots, absent children print as `null`,
//!   and the trailing run of `null` slots is dropped.

use std::collections::VecDeque;

use crate::literal::{self, ParseError};
use crate::types::TypeDescriptor;

/// A decoded value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(String),
    IntegerArray(Vec<i64>),
    StringArray(Vec<String>),
    LinkedList(Vec<i64>),
    BinaryTree(Tree),
    Opaque(String),
}

/// Arena-backed binary tree of integers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tree {
    nodes: Vec<TreeNode>,
    root: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TreeNode {
    val: i64,
    left: Option<usize>,
    right: Option<usize>,
}

impl Tree {
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Build a tree from level-order slots (`None` = absent).
    ///
    /// A leading `None` yields the empty tree. Each present node consumes the next two slots for its children in
    /// queue order; decoding stops when the slots run out.
    pub fn from_level_order(slots: &[Option<i64>]) -> Tree {
        let mut tree = Tree::default();
        let Some(Some(first)) = slots.first() else {
            return tree;
        };
        tree.root = Some(tree.push(*first));

        let mut queue = VecDeque::from([0usize]);
        let mut i = 1;
        while i < slots.len() {
            let Some(parent) = queue.pop_front() else {
                break;
            };
            if let Some(val) = slots[i] {
                let child = tree.push(val);
                tree.nodes[parent].left = Some(child);
                queue.push_back(child);
            }
            i += 1;
            if let Some(Some(val)) = slots.get(i) {
                let child = tree.push(*val);
                tree.nodes[parent].right = Some(child);
                queue.push_back(child);
            }
            i += 1;
        }
        tree
    }

    /// Level-order slots with the trailing run of `None` removed.
    pub fn to_level_order(&self) -> Vec<Option<i64>> {
        let mut slots = Vec::new();
        let mut queue = VecDeque::from([self.root]);
        while let Some(entry) = queue.pop_front() {
            match entry {
                Some(idx) => {
                    let node = &self.nodes[idx];
                    slots.push(Some(node.val));
                    queue.push_back(node.left);
                    queue.push_back(node.right);
                }
                None => slots.push(None),
            }
        }
        while matches!(slots.last(), Some(None)) {
            slots.pop();
        }
        slots
    }

    fn push(&mut self, val: i64) -> usize {
        self.nodes.push(TreeNode {
            val,
            left: None,
            right: None,
        });
        self.nodes.len() - 1
    }
}

/// Decode a literal of type `ty`.
///
/// ## Errors
/// - Unbalanced brackets, a non-numeric token in an integer position, or an unrecognized boolean.
pub fn decode(literal: &str, ty: &TypeDescriptor) -> Result<Value, ParseError> {
    Ok(match ty {
        TypeDescriptor::Integer => Value::Integer(decode_int(literal)?),
        TypeDescriptor::Float => Value::Float(decode_float(literal)?),
        TypeDescriptor::Boolean => Value::Boolean(decode_bool(literal)?),
        TypeDescriptor::String => Value::String(literal::unquote(literal).to_string()),
        TypeDescriptor::IntegerArray => Value::IntegerArray(decode_int_array(literal)?),
        TypeDescriptor::StringArray => Value::StringArray(
            literal::array_elements(literal)?
                .into_iter()
                .map(|e| literal::unquote(e).to_string())
                .collect(),
        ),
        TypeDescriptor::LinkedList => Value::LinkedList(decode_int_array(literal)?),
        TypeDescriptor::BinaryTree => {
            let slots = literal::array_elements(literal)?
                .into_iter()
                .map(|e| if e == "null" { Ok(None) } else { decode_int(e).map(Some) })
                .collect::<Result<Vec<_>, _>>()?;
            Value::BinaryTree(Tree::from_level_order(&slots))
        }
        TypeDescriptor::Opaque(_) => Value::Opaque(literal.trim().to_string()),
    })
}

/// Encode a value in canonical form.
pub fn encode(value: &Value) -> String {
    match value {
        Value::Integer(n) => n.to_string(),
        Value::Float(x) => format!("{:.5}", x),
        Value::Boolean(b) => b.to_string(),
        Value::String(s) => format!("\"{}\"", s),
        Value::IntegerArray(items) | Value::LinkedList(items) => bracket(items.iter().map(|n| n.to_string())),
        Value::StringArray(items) => bracket(items.iter().map(|s| format!("\"{}\"", s))),
        Value::BinaryTree(tree) => bracket(tree.to_level_order().into_iter().map(|slot| match slot {
            Some(n) => n.to_string(),
            None => "null".to_string(),
        })),
        Value::Opaque(raw) => raw.clone(),
    }
}

/// Decode then re-encode a literal.
pub fn canonicalize(literal: &str, ty: &TypeDescriptor) -> Result<String, ParseError> {
    decode(literal, ty).map(|v| encode(&v))
}

fn bracket<I: Iterator<Item = String>>(items: I) -> String {
    format!("[{}]", items.collect::<Vec<_>>().join(","))
}

fn decode_int(text: &str) -> Result<i64, ParseError> {
    let t = literal::unquote(text);
    t.parse::<i64>()
        .map_err(|_| ParseError::new(format!("expected an integer, found '{}'", t)))
}

fn decode_float(text: &str) -> Result<f64, ParseError> {
    let t = literal::unquote(text);
    t.parse::<f64>()
        .map_err(|_| ParseError::new(format!("expected a number, found '{}'", t)))
}

fn decode_bool(text: &str) -> Result<bool, ParseError> {
    match literal::unquote(text) {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(ParseError::new(format!("expected a boolean, found '{}'", other))),
    }
}

fn decode_int_array(text: &str) -> Result<Vec<i64>, ParseError> {
    literal::array_elements(text)?.into_iter().map(decode_int).collect()
}
