//! Result reporting (pytest-style console output)
//!
//! The runner calls a [`TestReporter`] once per case in case order, so custom output formats only need to implement
//! the trait.

use std::time::Duration;

use crate::backend::Runtime;
use crate::model::TestResult;

/// Receives run progress in case order.
pub trait TestReporter {
    /// Called once the driver is built and cases are about to run
    fn on_run_start(&mut self, _problem: &str, _runtime: Runtime, _case_count: usize) {}

    /// Called when a case has been judged
    fn on_case_complete(&mut self, result: &TestResult);

    /// Called after the last case
    fn on_run_complete(&mut self, summary: &RunSummary);
}

/// Summary of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration: Duration,
}

impl RunSummary {
    pub fn from_results(results: &[TestResult], duration: Duration) -> Self {
        let passed = results.iter().filter(|r| r.passed).count();
        Self {
            total: results.len(),
            passed,
            failed: results.len() - passed,
            duration,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl TestReporter for NullReporter {
    fn on_case_complete(&mut self, _result: &TestResult) {}

    fn on_run_complete(&mut self, _summary: &RunSummary) {}
}

/// Default console reporter (pytest-style)
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    pub verbose: bool,
    /// Stop printing after the first failing case
    pub exit_first: bool,
    stopped: bool,
}

impl ConsoleReporter {
    pub fn new(verbose: bool, exit_first: bool) -> Self {
        Self {
            verbose,
            exit_first,
            stopped: false,
        }
    }
}

impl TestReporter for ConsoleReporter {
    fn on_run_start(&mut self, problem: &str, runtime: Runtime, case_count: usize) {
        eprintln!("collected {} case(s) for {} [{}]", case_count, problem, runtime);
        if case_count == 0 {
            eprintln!("No cases collected");
        }
    }

    fn on_case_complete(&mut self, result: &TestResult) {
        if self.stopped {
            return;
        }
        if self.verbose {
            let status = if result.passed {
                "\x1b[32mPASSED\x1b[0m"
            } else {
                "\x1b[31mFAILED\x1b[0m"
            };
            eprintln!("case {} ... {}", result.index, status);
        } else if result.passed {
            eprint!("\x1b[32m.\x1b[0m");
        } else {
            eprint!("\x1b[31mF\x1b[0m");
        }

        if !result.passed {
            eprintln!("\n\x1b[31mcase {}\x1b[0m", result.index);
            eprintln!("  input:    {}", result.input);
            eprintln!("  expected: {}", result.expected_output);
            eprintln!("  actual:   {}", result.actual_output.as_deref().unwrap_or("<none>"));
            if let Some(error) = &result.error {
                eprintln!("  error:    {}", error);
            }
            if self.exit_first {
                eprintln!("\x1b[31mstopping after first failure\x1b[0m");
                self.stopped = true;
            }
        }
    }

    fn on_run_complete(&mut self, summary: &RunSummary) {
        if !self.verbose {
            eprintln!();
        }
        eprintln!();

        let mut parts = Vec::new();
        if summary.passed > 0 {
            parts.push(format!("\x1b[32m{} passed\x1b[0m", summary.passed));
        }
        if summary.failed > 0 {
            parts.push(format!("\x1b[31m{} failed\x1b[0m", summary.failed));
        }
        if parts.is_empty() {
            parts.push("no cases ran".to_string());
        }

        eprintln!("====== {} in {:.2}s ======", parts.join(", "), summary.duration.as_secs_f64());
    }
}

/// Collects results in memory. Handy for embedding the runner.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    pub results: Vec<TestResult>,
    pub summary: Option<RunSummary>,
}

impl TestReporter for CollectingReporter {
    fn on_case_complete(&mut self, result: &TestResult) {
        self.results.push(result.clone());
    }

    fn on_run_complete(&mut self, summary: &RunSummary) {
        self.summary = Some(summary.clone());
    }
}
