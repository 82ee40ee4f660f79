//! Persistent problem store
//!
//! One directory per problem, keyed by its slug:
//!
//! ```text
//! <root>/<slug>/metadata.json               title, signature, expected outputs
//! <root>/<slug>/templates.json              starter code per runtime
//! <root>/<slug>/test_cases/input_<n>.json   one test case per file, 1-based
//! <root>/<slug>/test_cases/output_<n>.json  last actual output and verdict
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use casebench_core::types::OpaqueTypePolicy;
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::model::{ModelError, Problem, ProblemSignature, SignatureMetadata, Template, TestCase, slugify};

/// Default store directory, relative to the working directory.
pub const DEFAULT_ROOT: &str = ".casebench";

const METADATA_FILE: &str = "metadata.json";
const TEMPLATES_FILE: &str = "templates.json";
const CASES_DIR: &str = "test_cases";

/// Errors from the problem store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("problem '{0}' not found")]
    NotFound(String),

    #[error("'{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("'{path}' is not valid: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("problem '{id}': {source}")]
    Model {
        id: String,
        #[source]
        source: ModelError,
    },
}

/// Persistence for problems and their last run outputs.
pub trait ProblemStore {
    fn save(&self, problem: &Problem) -> Result<(), StoreError>;

    fn load(&self, problem_id: &str) -> Result<Problem, StoreError>;

    /// Record the last actual output of one case (1-based `index`).
    fn save_output(&self, problem_id: &str, index: usize, output: &str, passed: bool) -> Result<(), StoreError>;

    fn exists(&self, problem_id: &str) -> bool;
}

#[derive(Debug, Serialize, Deserialize)]
struct MetadataFile {
    title: String,
    signature: SignatureMetadata,
    #[serde(default)]
    expected_outputs: Vec<String>,
}

/// Last recorded output of a case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredOutput {
    pub output: String,
    pub passed: bool,
}

/// [`ProblemStore`] backed by a directory of JSON files.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
    policy: OpaqueTypePolicy,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>, policy: OpaqueTypePolicy) -> Self {
        Self {
            root: root.into(),
            policy,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn problem_dir(&self, problem_id: &str) -> PathBuf {
        self.root.join(slugify(problem_id))
    }

    /// Last recorded output of a case, if any.
    pub fn load_output(&self, problem_id: &str, index: usize) -> Result<Option<StoredOutput>, StoreError> {
        let path = self
            .problem_dir(problem_id)
            .join(CASES_DIR)
            .join(format!("output_{}.json", index));
        if !path.exists() {
            return Ok(None);
        }
        read_json(&path).map(Some)
    }

    /// Ids of every stored problem, sorted.
    pub fn list(&self) -> Result<Vec<String>, StoreError> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }
        let entries = fs::read_dir(&self.root).map_err(|source| io_error(&self.root, source))?;
        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| io_error(&self.root, source))?;
            if entry.path().join(METADATA_FILE).is_file() {
                ids.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        ids.sort();
        Ok(ids)
    }
}

impl ProblemStore for DirectoryStore {
    #[tracing::instrument(skip_all, fields(problem = %problem.id()))]
    fn save(&self, problem: &Problem) -> Result<(), StoreError> {
        let dir = self.problem_dir(&problem.id());
        create_dir(&dir)?;

        let metadata = MetadataFile {
            title: problem.title.clone(),
            signature: problem.signature.to_metadata(),
            expected_outputs: problem.expected_outputs().to_vec(),
        };
        write_json(&dir.join(METADATA_FILE), &metadata)?;
        write_json(&dir.join(TEMPLATES_FILE), &problem.templates)?;

        // Rewritten from scratch so removed cases do not linger.
        let cases = dir.join(CASES_DIR);
        if cases.exists() {
            fs::remove_dir_all(&cases).map_err(|source| io_error(&cases, source))?;
        }
        create_dir(&cases)?;
        for (i, case) in problem.test_cases().iter().enumerate() {
            write_json(&cases.join(format!("input_{}.json", i + 1)), case)?;
        }
        tracing::debug!(cases = problem.len(), path = %dir.display(), "problem saved");
        Ok(())
    }

    fn load(&self, problem_id: &str) -> Result<Problem, StoreError> {
        let dir = self.problem_dir(problem_id);
        let metadata_path = dir.join(METADATA_FILE);
        if !metadata_path.is_file() {
            return Err(StoreError::NotFound(problem_id.to_string()));
        }
        let metadata: MetadataFile = read_json(&metadata_path)?;
        let signature =
            ProblemSignature::from_metadata(&metadata.signature, self.policy).map_err(|source| StoreError::Model {
                id: problem_id.to_string(),
                source,
            })?;

        let templates_path = dir.join(TEMPLATES_FILE);
        let templates: Vec<Template> = if templates_path.is_file() {
            read_json(&templates_path)?
        } else {
            Vec::new()
        };

        let mut test_cases = Vec::new();
        let cases = dir.join(CASES_DIR);
        for n in 1.. {
            let path = cases.join(format!("input_{}.json", n));
            if !path.is_file() {
                break;
            }
            let case: TestCase = read_json(&path)?;
            test_cases.push(case);
        }

        Ok(Problem::from_parts(
            metadata.title,
            signature,
            test_cases,
            metadata.expected_outputs,
            templates,
        ))
    }

    fn save_output(&self, problem_id: &str, index: usize, output: &str, passed: bool) -> Result<(), StoreError> {
        let cases = self.problem_dir(problem_id).join(CASES_DIR);
        create_dir(&cases)?;
        let record = StoredOutput {
            output: output.to_string(),
            passed,
        };
        write_json(&cases.join(format!("output_{}.json", index)), &record)
    }

    fn exists(&self, problem_id: &str) -> bool {
        self.problem_dir(problem_id).join(METADATA_FILE).is_file()
    }
}

fn io_error(path: &Path, source: io::Error) -> StoreError {
    StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn create_dir(path: &Path) -> Result<(), StoreError> {
    fs::create_dir_all(path).map_err(|source| io_error(path, source))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let text = fs::read_to_string(path).map_err(|source| io_error(path, source))?;
    serde_json::from_str(&text).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let mut text = serde_json::to_string_pretty(value).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    text.push('\n');
    fs::write(path, text).map_err(|source| io_error(path, source))
}
