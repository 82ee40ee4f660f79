//! Golden snapshot tests for generated drivers
//!
//! The helper libraries are large and change rarely; these snapshots cover the per-signature part of each driver
//! (the entry point that decodes a record, calls the solution and prints the result).
//!
//! Run with: `cargo test --test driver_snapshots`
//! Review changes: `cargo insta review`

use casebench::backend::{DriverGenerator, Runtime};
use casebench::model::ProblemSignature;
use casebench_core::OpaqueTypePolicy;

fn two_sum() -> ProblemSignature {
    ProblemSignature::from_tokens(
        "twoSum",
        &[("nums", "integer[]"), ("target", "integer")],
        "integer[]",
        OpaqueTypePolicy::Reject,
    )
    .expect("valid signature")
}

/// Generated program from the line starting with `marker` to the end.
fn entry_section(runtime: Runtime, marker: &str) -> String {
    let program = DriverGenerator::new()
        .generate(&two_sum(), "// user code\n", runtime)
        .expect("generation failed");
    let start = program
        .source
        .find(marker)
        .unwrap_or_else(|| panic!("'{}' not found in generated {} driver", marker, runtime));
    program.source[start..].to_string()
}

#[test]
fn test_cpp_entry_point() {
    let main_section = entry_section(Runtime::Cpp, "int main() {");
    insta::assert_snapshot!("cpp_two_sum", main_section);
}

#[test]
fn test_java_entry_point() {
    let main_section = entry_section(Runtime::Java, "class Main {");
    insta::assert_snapshot!("java_two_sum", main_section);
}

#[test]
fn test_python_entry_point() {
    let main_section = entry_section(Runtime::Python, "def main():");
    insta::assert_snapshot!("python_two_sum", main_section);
}

#[test]
fn test_rust_entry_point() {
    let program = DriverGenerator::new()
        .generate(&two_sum(), "impl Solution {}\n", Runtime::Rust)
        .expect("generation failed");
    let source = &program.source;
    assert_eq!(program.file_name, "main.rs");
    assert!(source.starts_with("#![allow("));
    assert!(source.contains("pub struct Solution;"));
    assert!(source.contains("impl Solution {}"));
    assert!(source.contains("fn main()"));
    assert!(source.contains("Solution::two_sum(arg_nums, arg_target)"));
    assert!(source.contains("support::encode_int_array(result)"));
    assert!(source.contains("ParseError: "));
    assert!(source.contains("RuntimeError: "));
}

#[test]
fn test_user_source_is_verbatim() {
    let user = "class Solution:\n    def twoSum(self, nums, target):\n        return [0, 1]\n";
    let program = DriverGenerator::new()
        .generate(&two_sum(), user, Runtime::Python)
        .expect("generation failed");
    let aux = program.source.find("class TreeNode").expect("aux declarations");
    let user_at = program.source.find(user).expect("user source");
    let main_at = program.source.find("def main():").expect("driver");
    assert!(aux < user_at && user_at < main_at);
}
