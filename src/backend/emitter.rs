//! Source code emitter - builds driver program text
//!
//! This module provides a small indentation-aware buffer shared by every runtime backend. Brace languages use
//! [`CodeEmitter::block`], indentation languages use [`CodeEmitter::suite`].

use std::fmt::Write;

/// A buffer for building source code with consistent indentation
#[derive(Debug)]
pub struct CodeEmitter {
    buffer: String,
    indent_level: usize,
    indent_str: &'static str,
    comment_prefix: &'static str,
}

impl CodeEmitter {
    /// Emitter for C-family languages (4-space indent, `//` comments)
    pub fn c_family() -> Self {
        Self::new("    ", "//")
    }

    /// Emitter for Python (4-space indent, `#` comments)
    pub fn python() -> Self {
        Self::new("    ", "#")
    }

    pub fn new(indent_str: &'static str, comment_prefix: &'static str) -> Self {
        Self {
            buffer: String::new(),
            indent_level: 0,
            indent_str,
            comment_prefix,
        }
    }

    /// Get the generated code
    pub fn finish(self) -> String {
        self.buffer
    }

    /// Get current buffer as string slice
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Write a line with current indentation
    pub fn line(&mut self, s: &str) {
        self.write_indent();
        self.buffer.push_str(s);
        self.buffer.push('\n');
    }

    /// Write formatted text as one indented line
    pub fn linef(&mut self, args: std::fmt::Arguments<'_>) {
        self.write_indent();
        let _ = self.buffer.write_fmt(args);
        self.buffer.push('\n');
    }

    /// Write a blank line
    pub fn blank_line(&mut self) {
        self.buffer.push('\n');
    }

    /// Write indentation only
    pub fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.buffer.push_str(self.indent_str);
        }
    }

    /// Increase indent level
    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    /// Decrease indent level
    pub fn dedent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    /// Append text verbatim, ignoring the indent level. A trailing newline is added if missing.
    pub fn raw(&mut self, text: &str) {
        self.buffer.push_str(text);
        if !text.is_empty() && !text.ends_with('\n') {
            self.buffer.push('\n');
        }
    }

    /// Write a block with braces
    pub fn block<F>(&mut self, header: &str, f: F)
    where
        F: FnOnce(&mut Self),
    {
        self.block_with(header, "}", f);
    }

    /// Write a brace block closed by `closing` (e.g. `};` for C++ type definitions)
    pub fn block_with<F>(&mut self, header: &str, closing: &str, f: F)
    where
        F: FnOnce(&mut Self),
    {
        self.line(&format!("{} {{", header));
        self.indent();
        f(self);
        self.dedent();
        self.line(closing);
    }

    /// Write an indented suite introduced by `header:`
    pub fn suite<F>(&mut self, header: &str, f: F)
    where
        F: FnOnce(&mut Self),
    {
        self.line(&format!("{}:", header));
        self.indent();
        f(self);
        self.dedent();
    }

    /// Write a comment
    pub fn comment(&mut self, text: &str) {
        self.line(&format!("{} {}", self.comment_prefix, text));
    }
}

/// Quote `s` as a double-quoted literal valid in C++, Java, Python and Rust.
pub fn string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_indents_body() {
        let mut e = CodeEmitter::c_family();
        e.block("int main()", |e| {
            e.line("return 0;");
        });
        assert_eq!(e.finish(), "int main() {\n    return 0;\n}\n");
    }

    #[test]
    fn test_block_with_custom_closing() {
        let mut e = CodeEmitter::c_family();
        e.block_with("struct A", "};", |e| e.line("int x;"));
        assert_eq!(e.finish(), "struct A {\n    int x;\n};\n");
    }

    #[test]
    fn test_suite_indents_body() {
        let mut e = CodeEmitter::python();
        e.suite("def main()", |e| {
            e.comment("body");
            e.line("pass");
        });
        assert_eq!(e.finish(), "def main():\n    # body\n    pass\n");
    }

    #[test]
    fn test_raw_ignores_indent() {
        let mut e = CodeEmitter::c_family();
        e.indent();
        e.raw("class Solution {};");
        e.line("x;");
        assert_eq!(e.as_str(), "class Solution {};\n    x;\n");
    }

    #[test]
    fn test_dedent_saturates() {
        let mut e = CodeEmitter::c_family();
        e.dedent();
        e.linef(format_args!("{} = {};", "a", 1));
        assert_eq!(e.finish(), "a = 1;\n");
    }

    #[test]
    fn test_string_literal_escapes() {
        assert_eq!(string_literal("nums"), "\"nums\"");
        assert_eq!(string_literal("a\"b\\"), "\"a\\\"b\\\\\"");
    }
}
