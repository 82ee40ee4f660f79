//! Process Execution Adapter
//!
//! Generates the driver, writes it to a scratch directory, builds it once and runs it once per test case with the
//! case's encoded record on stdin.
//!
//! ## Failure scopes
//!
//! - Generation, scratch I/O and compile failures abort the run before any case executes ([`RunError`]).
//! - Malformed input, crashes, stderr output and timeouts fail only their own case ([`CaseError`]).
//!
//! A completed run returns exactly one [`TestResult`] per test case, in case order, whether the cases ran one at a
//! time (`jobs = 1`) or on a bounded worker pool.

pub mod error;
pub mod process;
pub mod report;
pub mod scratch;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Semaphore;
use tokio::task::{self, JoinSet};

pub use error::{CaseError, RunError};
pub use process::{CommandSpec, ExecutionPlan, Outcome, ProcessExecutor, ProcessOutput, ProgramExecutor};
pub use report::{CollectingReporter, ConsoleReporter, NullReporter, RunSummary, TestReporter};
pub use scratch::ScratchDir;

use crate::backend::{DriverGenerator, GeneratedProgram, Runtime};
use crate::compare;
use crate::config::RunnerConfig;
use crate::model::{Problem, ProblemSignature, TestCase, TestResult};

/// State of one run, passed explicitly to every step.
///
/// Dropping the context removes the scratch directory.
#[derive(Debug)]
pub struct RunContext {
    pub problem_id: String,
    pub runtime: Runtime,
    pub signature: ProblemSignature,
    /// Command that runs the built program
    pub run: CommandSpec,
    pub timeout: Duration,
    scratch: ScratchDir,
}

impl RunContext {
    pub fn scratch(&self) -> &ScratchDir {
        &self.scratch
    }
}

/// One case waiting to run.
#[derive(Debug, Clone)]
struct CaseJob {
    index: usize,
    case: TestCase,
    expected: String,
}

/// Runs a problem's test cases against a solution.
pub struct Runner<E: ProgramExecutor = ProcessExecutor> {
    config: RunnerConfig,
    executor: Arc<E>,
    generator: DriverGenerator,
}

impl Runner<ProcessExecutor> {
    pub fn new(config: RunnerConfig) -> Self {
        Self::with_executor(config, ProcessExecutor)
    }
}

impl<E: ProgramExecutor> Runner<E> {
    pub fn with_executor(config: RunnerConfig, executor: E) -> Self {
        Self {
            config,
            executor: Arc::new(executor),
            generator: DriverGenerator::new(),
        }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Run every test case of `problem` against `source`.
    pub async fn run(&self, problem: &Problem, source: &str, runtime: Runtime) -> Result<Vec<TestResult>, RunError> {
        self.run_with(problem, source, runtime, &mut NullReporter).await
    }

    /// Like [`Runner::run`], notifying `reporter` as cases complete (always in case order).
    #[tracing::instrument(skip_all, fields(problem = %problem.id(), runtime = %runtime, cases = problem.len()))]
    pub async fn run_with(
        &self,
        problem: &Problem,
        source: &str,
        runtime: Runtime,
        reporter: &mut dyn TestReporter,
    ) -> Result<Vec<TestResult>, RunError> {
        let started = Instant::now();
        let program = self.generator.generate(&problem.signature, source, runtime)?;
        let ctx = Arc::new(self.prepare(problem, &program).await?);

        reporter.on_run_start(&ctx.problem_id, runtime, problem.len());
        let jobs: Vec<CaseJob> = problem
            .test_cases()
            .iter()
            .zip(problem.expected_outputs())
            .enumerate()
            .map(|(i, (case, expected))| CaseJob {
                index: i + 1,
                case: case.clone(),
                expected: expected.clone(),
            })
            .collect();

        let results = if self.config.jobs <= 1 || jobs.len() <= 1 {
            self.run_sequential(&ctx, jobs, reporter).await
        } else {
            self.run_pooled(&ctx, jobs, reporter).await
        };

        let summary = RunSummary::from_results(&results, started.elapsed());
        tracing::info!(passed = summary.passed, failed = summary.failed, "run complete");
        reporter.on_run_complete(&summary);
        Ok(results)
    }

    /// Write the program into a fresh scratch directory and build it if the runtime needs it.
    pub async fn prepare(&self, problem: &Problem, program: &GeneratedProgram) -> Result<RunContext, RunError> {
        let root = &self.config.scratch_root;
        let scratch = ScratchDir::create(root, &problem.id(), program.runtime, self.config.keep_scratch).map_err(
            |source| RunError::Scratch {
                path: root.clone(),
                source,
            },
        )?;
        scratch
            .write(program.file_name, &program.source)
            .map_err(|source| RunError::Scratch {
                path: scratch.path().join(program.file_name),
                source,
            })?;

        let plan = ExecutionPlan::for_runtime(program.runtime, &self.config.toolchain, scratch.path());
        if let Some(build) = &plan.build {
            self.build(build).await?;
        }

        Ok(RunContext {
            problem_id: problem.id(),
            runtime: program.runtime,
            signature: problem.signature.clone(),
            run: plan.run,
            timeout: self.config.timeout(),
            scratch,
        })
    }

    async fn build(&self, spec: &CommandSpec) -> Result<(), RunError> {
        tracing::debug!(command = %spec.display(), "building driver");
        let outcome = self
            .executor
            .execute(spec, None, self.config.build_timeout())
            .await
            .map_err(|source| RunError::Toolchain {
                program: spec.program.clone(),
                source,
            })?;
        match outcome {
            Outcome::Finished(output) if output.success => Ok(()),
            Outcome::Finished(output) => {
                let diagnostics = if output.stderr.trim().is_empty() {
                    output.stdout
                } else {
                    output.stderr
                };
                Err(RunError::Compile { diagnostics })
            }
            Outcome::TimedOut => Err(RunError::BuildTimeout {
                timeout_ms: self.config.build_timeout_ms,
            }),
        }
    }

    async fn run_sequential(
        &self,
        ctx: &Arc<RunContext>,
        jobs: Vec<CaseJob>,
        reporter: &mut dyn TestReporter,
    ) -> Vec<TestResult> {
        let mut results = Vec::with_capacity(jobs.len());
        for job in jobs {
            let result = run_case(self.executor.as_ref(), ctx, job).await;
            reporter.on_case_complete(&result);
            results.push(result);
        }
        results
    }

    /// Run up to `jobs` cases at once; results are reported and returned in case order.
    async fn run_pooled(
        &self,
        ctx: &Arc<RunContext>,
        jobs: Vec<CaseJob>,
        reporter: &mut dyn TestReporter,
    ) -> Vec<TestResult> {
        let total = jobs.len();
        let semaphore = Arc::new(Semaphore::new(self.config.jobs));
        let mut set = JoinSet::new();
        let mut pending: HashMap<task::Id, CaseJob> = HashMap::with_capacity(total);
        for job in jobs {
            let executor = Arc::clone(&self.executor);
            let ctx = Arc::clone(ctx);
            let semaphore = Arc::clone(&semaphore);
            let task_job = job.clone();
            let handle = set.spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                run_case(executor.as_ref(), &ctx, task_job).await
            });
            pending.insert(handle.id(), job);
        }

        let mut slots: Vec<Option<TestResult>> = vec![None; total];
        let mut next = 0;
        while let Some(joined) = set.join_next_with_id().await {
            let result = match joined {
                Ok((id, result)) => {
                    pending.remove(&id);
                    result
                }
                Err(e) => {
                    tracing::error!(error = %e, "case task failed");
                    match pending.remove(&e.id()) {
                        Some(job) => failed_result(job, None, CaseError::Runtime("worker task failed".to_string())),
                        None => continue,
                    }
                }
            };
            let slot = result.index - 1;
            slots[slot] = Some(result);
            while let Some(Some(result)) = slots.get(next) {
                reporter.on_case_complete(result);
                next += 1;
            }
        }

        slots.into_iter().flatten().collect()
    }
}

async fn run_case<E: ProgramExecutor>(executor: &E, ctx: &RunContext, job: CaseJob) -> TestResult {
    let result = match execute_case(executor, ctx, &job.case).await {
        Ok(actual) => {
            let passed = compare::compare(&actual, &job.expected, ctx.signature.return_type());
            TestResult {
                index: job.index,
                input: job.case,
                expected_output: job.expected,
                actual_output: Some(actual),
                passed,
                error: None,
            }
        }
        Err((actual, error)) => failed_result(job, actual, error),
    };
    tracing::debug!(case = result.index, passed = result.passed, "case judged");
    result
}

/// Execute one case and return its trimmed stdout.
async fn execute_case<E: ProgramExecutor>(
    executor: &E,
    ctx: &RunContext,
    case: &TestCase,
) -> Result<String, (Option<String>, CaseError)> {
    case.validate(&ctx.signature)
        .map_err(|e| (None, CaseError::Parse(e.to_string())))?;

    let record = format!("{}\n", case.encode_record(&ctx.signature));
    let outcome = executor
        .execute(&ctx.run, Some(&record), ctx.timeout)
        .await
        .map_err(|e| (None, CaseError::Spawn(e.to_string())))?;

    let output = match outcome {
        Outcome::Finished(output) => output,
        Outcome::TimedOut => return Err((None, CaseError::Timeout(ctx.timeout.as_millis() as u64))),
    };
    let stdout = output.stdout.trim().to_string();
    if !output.success || !output.stderr.trim().is_empty() {
        let actual = (!stdout.is_empty()).then_some(stdout);
        return Err((actual, CaseError::classify(output.exit_code, &output.stderr)));
    }
    Ok(stdout)
}

fn failed_result(job: CaseJob, actual: Option<String>, error: CaseError) -> TestResult {
    TestResult {
        index: job.index,
        input: job.case,
        expected_output: job.expected,
        actual_output: actual,
        passed: false,
        error: Some(error.to_string()),
    }
}
