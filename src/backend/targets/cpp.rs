//! C++ driver backend (C++17)

use crate::backend::driver::{DriverPlan, GenerationError};
use crate::backend::emitter::{CodeEmitter, string_literal};
use crate::backend::rules::{Codec, CodecRule};
use crate::backend::runtime::{Runtime, RuntimeBackend};

const SUPPORT: &str = include_str!("support/driver_support.hpp");

/// Standard headers used when the catch-all `<bits/stdc++.h>` is missing (libc++).
const PORTABLE_HEADERS: &[&str] = &[
    "algorithm",
    "climits",
    "cmath",
    "cstdio",
    "functional",
    "iostream",
    "map",
    "numeric",
    "queue",
    "set",
    "sstream",
    "stack",
    "stdexcept",
    "string",
    "unordered_map",
    "unordered_set",
    "utility",
    "vector",
];

#[derive(Debug, Default, Clone, Copy)]
pub struct CppBackend;

impl RuntimeBackend for CppBackend {
    fn runtime(&self) -> Runtime {
        Runtime::Cpp
    }

    fn native_type(&self, codec: Codec) -> Option<&'static str> {
        match codec {
            Codec::Integer => Some("int"),
            Codec::Float => Some("double"),
            Codec::Boolean => Some("bool"),
            Codec::String => Some("string"),
            Codec::IntegerArray => Some("vector<int>"),
            Codec::StringArray => Some("vector<string>"),
            Codec::LinkedList => Some("ListNode*"),
            Codec::BinaryTree => Some("TreeNode*"),
            Codec::Raw => None,
        }
    }

    fn field_call(&self, name: &str) -> String {
        format!("casebench::field(line, {})", string_literal(name))
    }

    fn decode_call(&self, rule: &CodecRule, raw: &str) -> String {
        format!("casebench::{}({})", rule.decoder(), raw)
    }

    fn encode_call(&self, rule: &CodecRule, value: &str) -> String {
        format!("casebench::{}({})", rule.encoder(), value)
    }

    fn auxiliary_declarations(&self) -> Result<String, GenerationError> {
        let mut e = CodeEmitter::c_family();
        e.line("#if __has_include(<bits/stdc++.h>)");
        e.line("#include <bits/stdc++.h>");
        e.line("#else");
        for header in PORTABLE_HEADERS {
            e.linef(format_args!("#include <{}>", header));
        }
        e.line("#endif");
        e.line("using namespace std;");
        e.blank_line();
        e.block_with("struct ListNode", "};", |e| {
            e.line("int val;");
            e.line("ListNode* next;");
            e.line("ListNode() : val(0), next(nullptr) {}");
            e.line("ListNode(int x) : val(x), next(nullptr) {}");
            e.line("ListNode(int x, ListNode* next) : val(x), next(next) {}");
        });
        e.blank_line();
        e.block_with("struct TreeNode", "};", |e| {
            e.line("int val;");
            e.line("TreeNode* left;");
            e.line("TreeNode* right;");
            e.line("TreeNode() : val(0), left(nullptr), right(nullptr) {}");
            e.line("TreeNode(int x) : val(x), left(nullptr), right(nullptr) {}");
            e.line("TreeNode(int x, TreeNode* left, TreeNode* right) : val(x), left(left), right(right) {}");
        });
        Ok(e.finish())
    }

    fn driver_section(&self, plan: &DriverPlan) -> Result<String, GenerationError> {
        let mut e = CodeEmitter::c_family();
        e.raw(SUPPORT);
        e.blank_line();
        e.block("int main()", |e| {
            e.line("string line;");
            e.block("while (getline(cin, line))", |e| {
                e.line("if (casebench::trim(line).empty()) continue;");
                for param in &plan.params {
                    e.linef(format_args!("{} {};", param.native_type, param.local));
                }
                e.block("try", |e| {
                    for param in &plan.params {
                        e.linef(format_args!("{} = {};", param.local, param.decode));
                    }
                });
                e.block("catch (const exception& err)", |e| {
                    e.line("cerr << \"ParseError: \" << err.what() << endl;");
                    e.line("continue;");
                });
                e.block("try", |e| {
                    let args: Vec<&str> = plan.params.iter().map(|p| p.local.as_str()).collect();
                    e.line("Solution solution;");
                    e.linef(format_args!("auto result = solution.{}({});", plan.entry, args.join(", ")));
                    e.linef(format_args!("cout << {} << endl;", plan.encode(self, "result")));
                });
                e.block("catch (const exception& err)", |e| {
                    e.line("cerr << \"RuntimeError: \" << err.what() << endl;");
                });
            });
            e.line("return 0;");
        });
        Ok(e.finish())
    }
}
