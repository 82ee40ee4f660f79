//! Python driver backend

use crate::backend::driver::{DriverPlan, GenerationError};
use crate::backend::emitter::{CodeEmitter, string_literal};
use crate::backend::rules::{Codec, CodecRule};
use crate::backend::runtime::{Runtime, RuntimeBackend};

const SUPPORT: &str = include_str!("support/driver_support.py");

#[derive(Debug, Default, Clone, Copy)]
pub struct PythonBackend;

impl RuntimeBackend for PythonBackend {
    fn runtime(&self) -> Runtime {
        Runtime::Python
    }

    fn native_type(&self, codec: Codec) -> Option<&'static str> {
        Some(match codec {
            Codec::Integer => "int",
            Codec::Float => "float",
            Codec::Boolean => "bool",
            Codec::String => "str",
            Codec::IntegerArray => "List[int]",
            Codec::StringArray => "List[str]",
            Codec::LinkedList => "Optional[ListNode]",
            Codec::BinaryTree => "Optional[TreeNode]",
            Codec::Raw => "str",
        })
    }

    fn field_call(&self, name: &str) -> String {
        format!("field(line, {})", string_literal(name))
    }

    fn decode_call(&self, rule: &CodecRule, raw: &str) -> String {
        format!("{}({})", rule.decoder(), raw)
    }

    fn encode_call(&self, rule: &CodecRule, value: &str) -> String {
        format!("{}({})", rule.encoder(), value)
    }

    fn auxiliary_declarations(&self) -> Result<String, GenerationError> {
        let mut e = CodeEmitter::python();
        e.line("import sys");
        e.line("from collections import deque");
        e.line("from typing import *");
        e.blank_line();
        e.blank_line();
        e.suite("class ListNode", |e| {
            e.suite("def __init__(self, val=0, next=None)", |e| {
                e.line("self.val = val");
                e.line("self.next = next");
            });
        });
        e.blank_line();
        e.blank_line();
        e.suite("class TreeNode", |e| {
            e.suite("def __init__(self, val=0, left=None, right=None)", |e| {
                e.line("self.val = val");
                e.line("self.left = left");
                e.line("self.right = right");
            });
        });
        e.blank_line();
        Ok(e.finish())
    }

    fn driver_section(&self, plan: &DriverPlan) -> Result<String, GenerationError> {
        let mut e = CodeEmitter::python();
        e.raw(SUPPORT);
        e.blank_line();
        e.blank_line();
        e.suite("def main()", |e| {
            e.suite("for line in sys.stdin", |e| {
                e.line("line = line.strip()");
                e.suite("if not line", |e| e.line("continue"));
                e.suite("try", |e| {
                    if plan.params.is_empty() {
                        e.line("pass");
                    }
                    for param in &plan.params {
                        e.linef(format_args!("{} = {}", param.local, param.decode));
                    }
                });
                e.suite("except Exception as exc", |e| {
                    e.line("print(\"ParseError: %s\" % exc, file=sys.stderr, flush=True)");
                    e.line("continue");
                });
                e.suite("try", |e| {
                    let args: Vec<&str> = plan.params.iter().map(|p| p.local.as_str()).collect();
                    e.linef(format_args!("result = Solution().{}({})", plan.entry, args.join(", ")));
                    e.linef(format_args!("print({}, flush=True)", plan.encode(self, "result")));
                });
                e.suite("except Exception as exc", |e| {
                    e.line(
                        "print(\"RuntimeError: %s: %s\" % (type(exc).__name__, exc), file=sys.stderr, flush=True)",
                    );
                });
            });
        });
        e.blank_line();
        e.blank_line();
        e.suite("if __name__ == \"__main__\"", |e| e.line("main()"));
        Ok(e.finish())
    }
}
