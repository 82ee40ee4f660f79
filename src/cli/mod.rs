//! CLI module for casebench
//!
//! ## Commands
//!
//! - `run <solution>` - Build the driver and run every stored test case (pytest-style report)
//! - `emit <solution>` - Print the generated driver program
//! - `init <title>` - Create a problem from judge metadata and example blocks
//! - `add` / `remove` / `list` - Manage a problem's test cases
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use crate::backend::Runtime;
use crate::store::DEFAULT_ROOT;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Run hand-written solutions against stored test cases
#[derive(Parser, Debug)]
#[command(name = "casebench")]
#[command(version = VERSION)]
#[command(about = "Generate, build and run judge-style drivers around your solutions", long_about = None)]
pub struct Cli {
    /// Problem store directory
    #[arg(long, global = true, value_name = "DIR", default_value = DEFAULT_ROOT)]
    pub store: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run every test case of a problem against a solution file
    Run {
        /// Solution source file
        #[arg(value_name = "SOLUTION")]
        solution: PathBuf,
        /// Problem id (default: derived from the file name)
        #[arg(long, value_name = "ID")]
        problem: Option<String>,
        /// Target runtime (default: inferred from the file extension)
        #[arg(long, value_name = "RUNTIME")]
        runtime: Option<Runtime>,
        /// Per-case timeout in milliseconds
        #[arg(long, value_name = "MS")]
        timeout_ms: Option<u64>,
        /// Number of cases to run at once
        #[arg(short, long, value_name = "N")]
        jobs: Option<usize>,
        /// Keep the scratch directory for inspection
        #[arg(long)]
        keep_scratch: bool,
        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
        /// Stop reporting after the first failure
        #[arg(short = 'x', long = "exitfirst")]
        exit_first: bool,
    },

    /// Print the generated driver program
    Emit {
        #[arg(value_name = "SOLUTION")]
        solution: PathBuf,
        #[arg(long, value_name = "ID")]
        problem: Option<String>,
        #[arg(long, value_name = "RUNTIME")]
        runtime: Option<Runtime>,
    },

    /// Create a problem from judge metadata JSON
    Init {
        /// Problem title
        #[arg(value_name = "TITLE")]
        title: String,
        /// Metadata file: {"name": .., "params": [{"name": .., "type": ..}], "return": {"type": ..}}
        #[arg(long, value_name = "FILE")]
        metadata: PathBuf,
        /// Example block ("Input: a = 1, b = 2 Output: 3"); repeatable
        #[arg(long = "example", value_name = "TEXT")]
        examples: Vec<String>,
        /// Replace an existing problem
        #[arg(long)]
        force: bool,
    },

    /// Add a test case
    Add {
        #[arg(value_name = "PROBLEM")]
        problem: String,
        /// Input record, e.g. "nums = [2,7,11,15], target = 9"
        #[arg(long, value_name = "RECORD")]
        input: String,
        /// Expected output
        #[arg(long, value_name = "TEXT")]
        expected: String,
    },

    /// Remove a test case (1-based index)
    Remove {
        #[arg(value_name = "PROBLEM")]
        problem: String,
        #[arg(value_name = "INDEX")]
        index: usize,
    },

    /// List a problem's test cases
    List {
        #[arg(value_name = "PROBLEM")]
        problem: String,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    let store = cli.store;
    match cli.command {
        Command::Run {
            solution,
            problem,
            runtime,
            timeout_ms,
            jobs,
            keep_scratch,
            verbose,
            exit_first,
        } => commands::run_solution(
            &store,
            &solution,
            commands::RunOptions {
                problem,
                runtime,
                timeout_ms,
                jobs,
                keep_scratch,
                verbose,
                exit_first,
            },
        ),
        Command::Emit {
            solution,
            problem,
            runtime,
        } => commands::emit_driver(&store, &solution, problem.as_deref(), runtime),
        Command::Init {
            title,
            metadata,
            examples,
            force,
        } => commands::init_problem(&store, &title, &metadata, &examples, force),
        Command::Add {
            problem,
            input,
            expected,
        } => commands::add_case(&store, &problem, &input, &expected),
        Command::Remove { problem, index } => commands::remove_case(&store, &problem, index),
        Command::List { problem } => commands::list_cases(&store, &problem),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_run() {
        let cli = Cli::try_parse_from(["casebench", "run", "two_sum.py", "-v", "-x", "--jobs", "4"]).unwrap();
        if let Command::Run {
            solution,
            verbose,
            exit_first,
            jobs,
            runtime,
            ..
        } = cli.command
        {
            assert_eq!(solution, PathBuf::from("two_sum.py"));
            assert!(verbose);
            assert!(exit_first);
            assert_eq!(jobs, Some(4));
            assert!(runtime.is_none());
        } else {
            panic!("Expected Run command");
        }
        assert_eq!(cli.store, PathBuf::from(DEFAULT_ROOT));
    }

    #[test]
    fn test_cli_parse_runtime_alias() {
        let cli = Cli::try_parse_from(["casebench", "emit", "sol.txt", "--runtime", "c++"]).unwrap();
        if let Command::Emit { runtime, .. } = cli.command {
            assert_eq!(runtime, Some(Runtime::Cpp));
        } else {
            panic!("Expected Emit command");
        }
    }

    #[test]
    fn test_cli_rejects_unknown_runtime() {
        let err = Cli::try_parse_from(["casebench", "emit", "sol.txt", "--runtime", "cobol"]).unwrap_err();
        assert!(err.to_string().contains("unknown runtime 'cobol'"));
    }

    #[test]
    fn test_cli_parse_init_examples() {
        let cli = Cli::try_parse_from([
            "casebench",
            "--store",
            "/tmp/s",
            "init",
            "Two Sum",
            "--metadata",
            "meta.json",
            "--example",
            "Input: a = 1 Output: 1",
            "--example",
            "Input: a = 2 Output: 2",
        ])
        .unwrap();
        assert_eq!(cli.store, PathBuf::from("/tmp/s"));
        if let Command::Init { title, examples, .. } = cli.command {
            assert_eq!(title, "Two Sum");
            assert_eq!(examples.len(), 2);
        } else {
            panic!("Expected Init command");
        }
    }

    #[test]
    fn test_cli_parse_remove() {
        let cli = Cli::try_parse_from(["casebench", "remove", "two-sum", "2"]).unwrap();
        assert!(matches!(cli.command, Command::Remove { index: 2, .. }));
    }
}
