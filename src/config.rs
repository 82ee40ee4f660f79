//! Runner configuration
//!
//! Every field has a default; an optional `config.json` in the problem store overrides them, and CLI flags override
//! the file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use casebench_core::types::OpaqueTypePolicy;
use serde::Deserialize;
use thiserror::Error;

/// Errors while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// How unknown type tokens in problem metadata are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpaqueTypes {
    #[default]
    Reject,
    PassThrough,
}

impl From<OpaqueTypes> for OpaqueTypePolicy {
    fn from(value: OpaqueTypes) -> Self {
        match value {
            OpaqueTypes::Reject => OpaqueTypePolicy::Reject,
            OpaqueTypes::PassThrough => OpaqueTypePolicy::PassThrough,
        }
    }
}

/// External executables used to build and run generated drivers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Toolchain {
    pub cxx: String,
    pub javac: String,
    pub java: String,
    pub python: String,
    pub rustc: String,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            cxx: "g++".to_string(),
            javac: "javac".to_string(),
            java: "java".to_string(),
            python: "python3".to_string(),
            rustc: "rustc".to_string(),
        }
    }
}

/// Runner configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Bounded wait for one test case, in milliseconds
    pub timeout_ms: u64,
    /// Bounded wait for the compile step, in milliseconds
    pub build_timeout_ms: u64,
    /// Maximum number of test cases executing at once
    pub jobs: usize,
    /// Parent directory for per-run scratch directories
    pub scratch_root: PathBuf,
    /// Treatment of unknown type tokens
    pub opaque_types: OpaqueTypes,
    /// Leave scratch directories in place after the run
    pub keep_scratch: bool,
    pub toolchain: Toolchain,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 5_000,
            build_timeout_ms: 60_000,
            jobs: 1,
            scratch_root: std::env::temp_dir().join("casebench"),
            opaque_types: OpaqueTypes::Reject,
            keep_scratch: false,
            toolchain: Toolchain::default(),
        }
    }
}

impl RunnerConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a JSON file; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Set the per-case timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Set the number of concurrent cases (clamped to at least one)
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Set the scratch root
    pub fn with_scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = root.into();
        self
    }

    /// Set the opaque type policy
    pub fn with_opaque_types(mut self, policy: OpaqueTypes) -> Self {
        self.opaque_types = policy;
        self
    }

    pub fn with_keep_scratch(mut self, keep: bool) -> Self {
        self.keep_scratch = keep;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn build_timeout(&self) -> Duration {
        Duration::from_millis(self.build_timeout_ms)
    }

    pub fn opaque_policy(&self) -> OpaqueTypePolicy {
        self.opaque_types.into()
    }
}
