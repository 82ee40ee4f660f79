#![forbid(unsafe_code)]
//! casebench: judge-style driver synthesis and execution
//!
//! Given a problem signature and a hand-written solution, casebench generates a complete program in the solution's
//! language (C++, Java, Python or Rust) that decodes each test case from a one-line record on stdin, calls the
//! solution, and prints the result in a canonical encoding. The runner builds that program once, feeds it every test
//! case in isolation and compares the output with the expected answer.
//!
//! - `model` - signatures, test cases, problems and results
//! - `backend` - driver generation (type-driven decode/encode rules, per-runtime backends)
//! - `runner` - scratch directories, build and per-case execution with bounded waits, reporting
//! - `compare` - output comparison (order-sensitive, whitespace-insensitive)
//! - `store` - directory-backed problem store
//! - `config` - runner configuration
//! - `cli` - command-line surface
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` and `backend` modules
//!   enforce `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **Generated code**: The backends emit panicking calls and `exit` as *text* in generated drivers. This is
//!   acceptable (these are output strings, not actual method calls in this crate).
//!
//! - **True invariants**: If a panic represents a bug in this crate (logic error), use
//!   `.expect("INVARIANT: reason")` with a clear explanation.

pub mod backend;
pub mod cli;
pub mod compare;
pub mod config;
pub mod model;
pub mod runner;
pub mod store;

pub use backend::{DriverGenerator, GeneratedProgram, GenerationError, Runtime};
pub use casebench_core::{OpaqueTypePolicy, TypeDescriptor};
pub use compare::{compare, compare_outputs};
pub use config::RunnerConfig;
pub use model::{Problem, ProblemSignature, TestCase, TestResult};
pub use runner::{RunError, Runner};
pub use store::{DirectoryStore, ProblemStore};
