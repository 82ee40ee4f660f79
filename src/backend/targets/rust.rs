//! Rust driver backend
//!
//! Unlike the text-template backends, the Rust driver is built as a token stream with `quote!`, validated by `syn`
//! and formatted with `prettyplease`. The driver reads one record per process.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use crate::backend::driver::{DriverPlan, GenerationError};
use crate::backend::emitter::string_literal;
use crate::backend::rules::{Codec, CodecRule};
use crate::backend::runtime::{Runtime, RuntimeBackend};

#[derive(Debug, Default, Clone, Copy)]
pub struct RustBackend;

impl RuntimeBackend for RustBackend {
    fn runtime(&self) -> Runtime {
        Runtime::Rust
    }

    fn native_type(&self, codec: Codec) -> Option<&'static str> {
        match codec {
            Codec::Integer => Some("i32"),
            Codec::Float => Some("f64"),
            Codec::Boolean => Some("bool"),
            Codec::String => Some("String"),
            Codec::IntegerArray => Some("Vec<i32>"),
            Codec::StringArray => Some("Vec<String>"),
            Codec::LinkedList => Some("Option<Box<ListNode>>"),
            Codec::BinaryTree => Some("Option<Rc<RefCell<TreeNode>>>"),
            Codec::Raw => None,
        }
    }

    fn entry_name(&self, function: &str) -> String {
        to_snake_case(function)
    }

    fn field_call(&self, name: &str) -> String {
        format!("support::field(record, {})?", string_literal(name))
    }

    fn decode_call(&self, rule: &CodecRule, raw: &str) -> String {
        format!("support::{}({})?", rule.decoder(), raw)
    }

    fn encode_call(&self, rule: &CodecRule, value: &str) -> String {
        format!("support::{}({})", rule.encoder(), value)
    }

    fn auxiliary_declarations(&self) -> Result<String, GenerationError> {
        let tokens = quote! {
            #![allow(dead_code, unused_imports, non_snake_case)]

            use std::cell::*;
            use std::collections::*;
            use std::rc::*;

            #[derive(PartialEq, Eq, Clone, Debug)]
            pub struct ListNode {
                pub val: i32,
                pub next: Option<Box<ListNode>>,
            }

            impl ListNode {
                #[inline]
                pub fn new(val: i32) -> Self {
                    ListNode { next: None, val }
                }
            }

            #[derive(Debug, PartialEq, Eq)]
            pub struct TreeNode {
                pub val: i32,
                pub left: Option<Rc<RefCell<TreeNode>>>,
                pub right: Option<Rc<RefCell<TreeNode>>>,
            }

            impl TreeNode {
                #[inline]
                pub fn new(val: i32) -> Self {
                    TreeNode { val, left: None, right: None }
                }
            }

            pub struct Solution;
        };
        format_tokens(tokens)
    }

    fn driver_section(&self, plan: &DriverPlan) -> Result<String, GenerationError> {
        let mut locals = Vec::with_capacity(plan.params.len());
        let mut types = Vec::with_capacity(plan.params.len());
        let mut decodes = Vec::with_capacity(plan.params.len());
        for param in &plan.params {
            locals.push(format_ident!("{}", param.local));
            types.push(parse::<syn::Type>(param.native_type)?);
            decodes.push(parse::<syn::Expr>(&param.decode)?);
        }
        let entry = parse::<syn::Ident>(&plan.entry)?;
        let encoder = format_ident!("{}", plan.return_rule.encoder());
        let support = support_module();

        let tokens = quote! {
            #support

            fn main() {
                let mut input = String::new();
                if let Err(err) = std::io::Read::read_to_string(&mut std::io::stdin(), &mut input) {
                    eprintln!("RuntimeError: cannot read input: {}", err);
                    std::process::exit(1);
                }
                let record = input.lines().map(str::trim).find(|line| !line.is_empty()).unwrap_or("");
                let decoded = (|| -> Result<_, String> {
                    #( let #locals: #types = #decodes; )*
                    Ok((#(#locals,)*))
                })();
                let (#(#locals,)*) = match decoded {
                    Ok(args) => args,
                    Err(message) => {
                        eprintln!("ParseError: {}", message);
                        std::process::exit(1);
                    }
                };
                let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
                    Solution::#entry(#(#locals),*)
                }));
                match outcome {
                    Ok(result) => println!("{}", support::#encoder(result)),
                    Err(_) => {
                        eprintln!("RuntimeError: solution panicked");
                        std::process::exit(1);
                    }
                }
            }
        };
        format_tokens(tokens)
    }
}

fn parse<T: syn::parse::Parse>(text: &str) -> Result<T, GenerationError> {
    syn::parse_str(text).map_err(|e| GenerationError::Emission {
        runtime: Runtime::Rust,
        message: format!("'{}': {}", text, e),
    })
}

fn format_tokens(tokens: TokenStream) -> Result<String, GenerationError> {
    let file = syn::parse2::<syn::File>(tokens).map_err(|e| GenerationError::Emission {
        runtime: Runtime::Rust,
        message: e.to_string(),
    })?;
    Ok(prettyplease::unparse(&file))
}

/// `twoSum` → `two_sum`, `isValidBST` → `is_valid_bst`.
pub fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p.is_ascii_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_ascii_uppercase() => next.is_some_and(|n| n.is_ascii_lowercase()),
                _ => false,
            };
            if boundary && !out.ends_with('_') {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Helper library shared by every Rust driver.
fn support_module() -> TokenStream {
    quote! {
        mod support {
            use super::*;

            pub fn split_top_level(text: &str) -> Result<Vec<&str>, String> {
                let mut parts = Vec::new();
                let mut depth = 0i32;
                let mut in_quotes = false;
                let mut escaped = false;
                let mut start = 0;
                for (i, ch) in text.char_indices() {
                    if in_quotes {
                        if escaped {
                            escaped = false;
                        } else if ch == '\\' {
                            escaped = true;
                        } else if ch == '"' {
                            in_quotes = false;
                        }
                        continue;
                    }
                    match ch {
                        '"' => in_quotes = true,
                        '[' => depth += 1,
                        ']' => {
                            depth -= 1;
                            if depth < 0 {
                                return Err(format!("unbalanced ']' in '{}'", text));
                            }
                        }
                        ',' if depth == 0 => {
                            parts.push(&text[start..i]);
                            start = i + 1;
                        }
                        _ => {}
                    }
                }
                if in_quotes {
                    return Err(format!("unterminated string in '{}'", text));
                }
                if depth != 0 {
                    return Err(format!("unbalanced '[' in '{}'", text));
                }
                parts.push(&text[start..]);
                Ok(parts)
            }

            pub fn unquote(text: &str) -> &str {
                let t = text.trim();
                if t.len() >= 2 && t.starts_with('"') && t.ends_with('"') {
                    &t[1..t.len() - 1]
                } else {
                    t
                }
            }

            pub fn field<'a>(record: &'a str, name: &str) -> Result<&'a str, String> {
                for segment in split_top_level(record.trim())? {
                    if let Some((key, value)) = segment.split_once('=') {
                        if key.trim() == name {
                            return Ok(value.trim());
                        }
                    }
                }
                Err(format!("missing parameter '{}'", name))
            }

            pub fn elements(text: &str) -> Result<Vec<&str>, String> {
                let t = unquote(text);
                if t.len() < 2 || !t.starts_with('[') || !t.ends_with(']') {
                    return Err(format!("expected a bracketed list, found '{}'", t));
                }
                let inner = t[1..t.len() - 1].trim();
                if inner.is_empty() {
                    return Ok(Vec::new());
                }
                let mut items = Vec::new();
                for part in split_top_level(inner)? {
                    let item = part.trim();
                    if item.is_empty() {
                        return Err(format!("empty element in '{}'", t));
                    }
                    items.push(item);
                }
                Ok(items)
            }

            pub fn decode_int(text: &str) -> Result<i32, String> {
                let t = unquote(text);
                t.parse::<i32>().map_err(|_| format!("expected an integer, found '{}'", t))
            }

            pub fn decode_float(text: &str) -> Result<f64, String> {
                let t = unquote(text);
                t.parse::<f64>().map_err(|_| format!("expected a number, found '{}'", t))
            }

            pub fn decode_bool(text: &str) -> Result<bool, String> {
                match unquote(text) {
                    "true" | "1" => Ok(true),
                    "false" | "0" => Ok(false),
                    t => Err(format!("expected a boolean, found '{}'", t)),
                }
            }

            pub fn decode_str(text: &str) -> Result<String, String> {
                Ok(unquote(text).to_string())
            }

            pub fn decode_int_array(text: &str) -> Result<Vec<i32>, String> {
                elements(text)?.into_iter().map(decode_int).collect()
            }

            pub fn decode_str_array(text: &str) -> Result<Vec<String>, String> {
                Ok(elements(text)?.into_iter().map(|item| unquote(item).to_string()).collect())
            }

            pub fn decode_list(text: &str) -> Result<Option<Box<ListNode>>, String> {
                let mut head = None;
                for val in decode_int_array(text)?.into_iter().rev() {
                    let mut node = Box::new(ListNode::new(val));
                    node.next = head;
                    head = Some(node);
                }
                Ok(head)
            }

            pub fn decode_tree(text: &str) -> Result<Option<Rc<RefCell<TreeNode>>>, String> {
                let mut slots = Vec::new();
                for item in elements(text)? {
                    slots.push(if item == "null" { None } else { Some(decode_int(item)?) });
                }
                let root = match slots.first() {
                    Some(Some(val)) => Rc::new(RefCell::new(TreeNode::new(*val))),
                    _ => return Ok(None),
                };
                let mut pending = VecDeque::new();
                pending.push_back(Rc::clone(&root));
                let mut i = 1;
                while i < slots.len() {
                    let node = match pending.pop_front() {
                        Some(node) => node,
                        None => break,
                    };
                    if let Some(val) = slots[i] {
                        let child = Rc::new(RefCell::new(TreeNode::new(val)));
                        node.borrow_mut().left = Some(Rc::clone(&child));
                        pending.push_back(child);
                    }
                    i += 1;
                    if let Some(Some(val)) = slots.get(i) {
                        let child = Rc::new(RefCell::new(TreeNode::new(*val)));
                        node.borrow_mut().right = Some(Rc::clone(&child));
                        pending.push_back(child);
                    }
                    i += 1;
                }
                Ok(Some(root))
            }

            pub fn encode_int(value: impl std::fmt::Display) -> String {
                value.to_string()
            }

            pub fn encode_float(value: f64) -> String {
                format!("{:.5}", value)
            }

            pub fn encode_bool(value: bool) -> String {
                if value { "true".to_string() } else { "false".to_string() }
            }

            pub fn encode_str(value: impl AsRef<str>) -> String {
                format!("\"{}\"", value.as_ref())
            }

            pub fn encode_int_array<T: std::fmt::Display>(values: Vec<T>) -> String {
                let items: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                format!("[{}]", items.join(","))
            }

            pub fn encode_str_array<T: AsRef<str>>(values: Vec<T>) -> String {
                let items: Vec<String> = values.iter().map(|v| format!("\"{}\"", v.as_ref())).collect();
                format!("[{}]", items.join(","))
            }

            pub fn encode_list(head: Option<Box<ListNode>>) -> String {
                let mut items = Vec::new();
                let mut cursor = head.as_ref();
                while let Some(node) = cursor {
                    items.push(node.val.to_string());
                    cursor = node.next.as_ref();
                }
                format!("[{}]", items.join(","))
            }

            pub fn encode_tree(root: Option<Rc<RefCell<TreeNode>>>) -> String {
                let mut items: Vec<String> = Vec::new();
                let mut pending = VecDeque::new();
                pending.push_back(root);
                while let Some(entry) = pending.pop_front() {
                    match entry {
                        Some(node) => {
                            let node = node.borrow();
                            items.push(node.val.to_string());
                            pending.push_back(node.left.clone());
                            pending.push_back(node.right.clone());
                        }
                        None => items.push("null".to_string()),
                    }
                }
                while items.last().is_some_and(|item| item == "null") {
                    items.pop();
                }
                format!("[{}]", items.join(","))
            }
        }
    }
}
