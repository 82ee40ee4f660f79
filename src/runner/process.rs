//! External process invocation with bounded waits

use std::ffi::OsString;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::backend::Runtime;
use crate::config::Toolchain;

/// A command line to run inside a working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<OsString>,
    pub cwd: PathBuf,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, cwd: &Path) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.to_path_buf(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Render for log output.
    pub fn display(&self) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.args.iter().map(|a| a.to_string_lossy().into_owned()));
        parts.join(" ")
    }
}

/// Captured result of a process that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    pub success: bool,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// How a bounded wait ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Finished(ProcessOutput),
    /// The wait elapsed; the child has been killed.
    TimedOut,
}

/// Build and run commands for one runtime inside a scratch directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionPlan {
    pub build: Option<CommandSpec>,
    pub run: CommandSpec,
}

impl ExecutionPlan {
    pub fn for_runtime(runtime: Runtime, toolchain: &Toolchain, dir: &Path) -> Self {
        let source = dir.join(runtime.source_file());
        let binary = dir.join(format!("main{}", std::env::consts::EXE_SUFFIX));
        match runtime {
            Runtime::Cpp => Self {
                build: Some(
                    CommandSpec::new(&toolchain.cxx, dir)
                        .arg("-std=c++17")
                        .arg("-O2")
                        .arg("-o")
                        .arg(&binary)
                        .arg(&source),
                ),
                run: CommandSpec::new(binary.to_string_lossy(), dir),
            },
            Runtime::Java => Self {
                build: Some(CommandSpec::new(&toolchain.javac, dir).arg("-d").arg(dir).arg(&source)),
                run: CommandSpec::new(&toolchain.java, dir).arg("-cp").arg(dir).arg("Main"),
            },
            Runtime::Python => Self {
                build: None,
                run: CommandSpec::new(&toolchain.python, dir).arg(&source),
            },
            Runtime::Rust => Self {
                build: Some(
                    CommandSpec::new(&toolchain.rustc, dir)
                        .arg("--edition")
                        .arg("2021")
                        .arg("-O")
                        .arg("-o")
                        .arg(&binary)
                        .arg(&source),
                ),
                run: CommandSpec::new(binary.to_string_lossy(), dir),
            },
        }
    }
}

/// Starts processes on behalf of the runner.
pub trait ProgramExecutor: Send + Sync + 'static {
    /// Run `spec`, feeding `stdin` if given, and wait at most `timeout`.
    ///
    /// `Err` means the process could not be started at all.
    fn execute(
        &self,
        spec: &CommandSpec,
        stdin: Option<&str>,
        timeout: Duration,
    ) -> impl Future<Output = io::Result<Outcome>> + Send;
}

/// Runs real child processes with tokio.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessExecutor;

impl ProgramExecutor for ProcessExecutor {
    fn execute(
        &self,
        spec: &CommandSpec,
        stdin: Option<&str>,
        timeout: Duration,
    ) -> impl Future<Output = io::Result<Outcome>> + Send {
        let spec = spec.clone();
        let input = stdin.map(str::to_owned);
        async move {
            let mut child = Command::new(&spec.program)
                .args(&spec.args)
                .current_dir(&spec.cwd)
                .stdin(if input.is_some() { Stdio::piped() } else { Stdio::null() })
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .spawn()?;
            tracing::debug!(command = %spec.display(), pid = child.id(), "spawned");

            if let (Some(input), Some(mut pipe)) = (input, child.stdin.take()) {
                tokio::spawn(async move {
                    if let Err(e) = pipe.write_all(input.as_bytes()).await {
                        tracing::debug!(error = %e, "child closed stdin early");
                    }
                });
            }

            match tokio::time::timeout(timeout, child.wait_with_output()).await {
                Ok(output) => {
                    let output = output?;
                    tracing::debug!(status = ?output.status.code(), "process finished");
                    Ok(Outcome::Finished(ProcessOutput {
                        success: output.status.success(),
                        exit_code: output.status.code(),
                        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                    }))
                }
                Err(_) => {
                    tracing::debug!(timeout_ms = timeout.as_millis() as u64, "process timed out");
                    Ok(Outcome::TimedOut)
                }
            }
        }
    }
}
