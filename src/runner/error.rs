//! Run-level and per-case errors

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::backend::GenerationError;

/// Errors that abort a whole run before any test case executes.
#[derive(Debug, Error, Diagnostic)]
pub enum RunError {
    #[error("cannot generate driver: {0}")]
    #[diagnostic(code(casebench::generation_error))]
    Generation(#[from] GenerationError),

    #[error("compilation failed\n{diagnostics}")]
    #[diagnostic(code(casebench::compile_error), help("the compiler output above refers to the generated driver"))]
    Compile { diagnostics: String },

    #[error("compilation did not finish within {timeout_ms} ms")]
    #[diagnostic(code(casebench::build_timeout), help("raise build_timeout_ms in config.json"))]
    BuildTimeout { timeout_ms: u64 },

    #[error("cannot start '{program}': {source}")]
    #[diagnostic(
        code(casebench::toolchain_missing),
        help("install the toolchain or point the matching \"toolchain\" entry in config.json at it")
    )]
    Toolchain {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("scratch directory '{path}': {source}")]
    #[diagnostic(code(casebench::scratch_io))]
    Scratch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure of a single test case. Recorded in that case's result; never aborts the run.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaseError {
    #[error("ParseError: {0}")]
    Parse(String),

    #[error("RuntimeError: {0}")]
    Runtime(String),

    #[error("RuntimeError: timed out after {0} ms")]
    Timeout(u64),

    #[error("RuntimeError: cannot start program: {0}")]
    Spawn(String),
}

impl CaseError {
    /// Classify a failed process from its exit code and error stream.
    ///
    /// A `ParseError:` line on stderr marks a decode failure; anything else is a runtime error.
    pub fn classify(exit_code: Option<i32>, stderr: &str) -> CaseError {
        let stderr = stderr.trim();
        if let Some(line) = stderr.lines().find(|l| l.trim_start().starts_with("ParseError:")) {
            let message = line.trim_start().trim_start_matches("ParseError:").trim();
            return CaseError::Parse(message.to_string());
        }
        if stderr.is_empty() {
            return match exit_code {
                Some(code) => CaseError::Runtime(format!("exited with status {}", code)),
                None => CaseError::Runtime("terminated by signal".to_string()),
            };
        }
        let message = stderr.strip_prefix("RuntimeError:").map(str::trim).unwrap_or(stderr);
        CaseError::Runtime(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_parse_error_line() {
        let err = CaseError::classify(Some(0), "ParseError: expected an integer, found 'x'\n");
        assert_eq!(err, CaseError::Parse("expected an integer, found 'x'".to_string()));
        assert_eq!(err.to_string(), "ParseError: expected an integer, found 'x'");
    }

    #[test]
    fn test_classify_runtime_error_prefix_stripped() {
        let err = CaseError::classify(Some(0), "RuntimeError: ZeroDivisionError: division by zero");
        assert_eq!(err, CaseError::Runtime("ZeroDivisionError: division by zero".to_string()));
    }

    #[test]
    fn test_classify_silent_crash() {
        assert_eq!(
            CaseError::classify(Some(139), ""),
            CaseError::Runtime("exited with status 139".to_string())
        );
        assert_eq!(
            CaseError::classify(None, "  "),
            CaseError::Runtime("terminated by signal".to_string())
        );
    }

    #[test]
    fn test_classify_panic_text_is_runtime() {
        let stderr = "thread 'main' panicked at main.rs:3:5\nRuntimeError: solution panicked";
        assert!(matches!(CaseError::classify(Some(1), stderr), CaseError::Runtime(_)));
    }
}
