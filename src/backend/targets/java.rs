//! Java driver backend

use crate::backend::driver::{DriverPlan, GenerationError};
use crate::backend::emitter::{CodeEmitter, string_literal};
use crate::backend::rules::{Codec, CodecRule};
use crate::backend::runtime::{Runtime, RuntimeBackend};

const SUPPORT: &str = include_str!("support/DriverSupport.java");

#[derive(Debug, Default, Clone, Copy)]
pub struct JavaBackend;

impl RuntimeBackend for JavaBackend {
    fn runtime(&self) -> Runtime {
        Runtime::Java
    }

    fn native_type(&self, codec: Codec) -> Option<&'static str> {
        Some(match codec {
            Codec::Integer => "int",
            Codec::Float => "double",
            Codec::Boolean => "boolean",
            Codec::String => "String",
            Codec::IntegerArray => "int[]",
            Codec::StringArray => "String[]",
            Codec::LinkedList => "ListNode",
            Codec::BinaryTree => "TreeNode",
            Codec::Raw => "String",
        })
    }

    fn field_call(&self, name: &str) -> String {
        format!("DriverSupport.field(line, {})", string_literal(name))
    }

    fn decode_call(&self, rule: &CodecRule, raw: &str) -> String {
        format!("DriverSupport.{}({})", CodecRule::camel(&rule.decoder()), raw)
    }

    fn encode_call(&self, rule: &CodecRule, value: &str) -> String {
        format!("DriverSupport.{}({})", CodecRule::camel(&rule.encoder()), value)
    }

    fn auxiliary_declarations(&self) -> Result<String, GenerationError> {
        let mut e = CodeEmitter::c_family();
        e.line("import java.io.*;");
        e.line("import java.util.*;");
        e.blank_line();
        e.block("class ListNode", |e| {
            e.line("int val;");
            e.line("ListNode next;");
            e.line("ListNode() {}");
            e.line("ListNode(int val) { this.val = val; }");
            e.line("ListNode(int val, ListNode next) { this.val = val; this.next = next; }");
        });
        e.blank_line();
        e.block("class TreeNode", |e| {
            e.line("int val;");
            e.line("TreeNode left;");
            e.line("TreeNode right;");
            e.line("TreeNode() {}");
            e.line("TreeNode(int val) { this.val = val; }");
            e.line("TreeNode(int val, TreeNode left, TreeNode right) { this.val = val; this.left = left; this.right = right; }");
        });
        Ok(e.finish())
    }

    fn driver_section(&self, plan: &DriverPlan) -> Result<String, GenerationError> {
        let mut e = CodeEmitter::c_family();
        e.raw(SUPPORT);
        e.blank_line();
        e.block("class Main", |e| {
            e.block("public static void main(String[] args) throws IOException", |e| {
                e.line("BufferedReader reader = new BufferedReader(new InputStreamReader(System.in));");
                e.line("String line;");
                e.block("while ((line = reader.readLine()) != null)", |e| {
                    e.line("if (line.trim().isEmpty()) continue;");
                    for param in &plan.params {
                        e.linef(format_args!("{} {};", param.native_type, param.local));
                    }
                    e.block("try", |e| {
                        for param in &plan.params {
                            e.linef(format_args!("{} = {};", param.local, param.decode));
                        }
                    });
                    e.block("catch (RuntimeException err)", |e| {
                        e.line("System.err.println(\"ParseError: \" + err.getMessage());");
                        e.line("continue;");
                    });
                    e.block("try", |e| {
                        let args: Vec<&str> = plan.params.iter().map(|p| p.local.as_str()).collect();
                        e.line("Solution solution = new Solution();");
                        e.linef(format_args!("var result = solution.{}({});", plan.entry, args.join(", ")));
                        e.linef(format_args!("System.out.println({});", plan.encode(self, "result")));
                    });
                    e.block("catch (Exception err)", |e| {
                        e.line("System.err.println(\"RuntimeError: \" + err);");
                    });
                    e.line("System.out.flush();");
                });
            });
        });
        Ok(e.finish())
    }
}
