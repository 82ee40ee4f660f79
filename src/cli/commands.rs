//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fs;
use std::path::Path;
use std::time::Duration;

use casebench_core::literal;

use crate::backend::{DriverGenerator, Runtime};
use crate::config::RunnerConfig;
use crate::model::{Problem, ProblemSignature, SignatureMetadata, TestCase, TestResult, slugify};
use crate::runner::{ConsoleReporter, Runner};
use crate::store::{DirectoryStore, ProblemStore};

use super::{CliError, CliResult, ExitCode};

const CONFIG_FILE: &str = "config.json";

/// Flags of the `run` command that override the config file.
#[derive(Debug, Default)]
pub struct RunOptions {
    pub problem: Option<String>,
    pub runtime: Option<Runtime>,
    pub timeout_ms: Option<u64>,
    pub jobs: Option<usize>,
    pub keep_scratch: bool,
    pub verbose: bool,
    pub exit_first: bool,
}

// ============================================================================
// Shared setup
// ============================================================================

/// Load `<store>/config.json` (defaults when absent).
pub fn load_config(store_root: &Path) -> CliResult<RunnerConfig> {
    RunnerConfig::load(&store_root.join(CONFIG_FILE)).map_err(|e| CliError::failure(format!("Error: {}", e)))
}

fn open_store(store_root: &Path, config: &RunnerConfig) -> DirectoryStore {
    DirectoryStore::new(store_root, config.opaque_policy())
}

fn load_problem(store: &DirectoryStore, problem_id: &str) -> CliResult<Problem> {
    store
        .load(problem_id)
        .map_err(|e| CliError::failure(format!("Error: {}", e)))
}

fn save_problem(store: &DirectoryStore, problem: &Problem) -> CliResult<()> {
    store
        .save(problem)
        .map_err(|e| CliError::failure(format!("Error saving problem: {}", e)))
}

/// Runtime from the flag, else from the solution's extension.
pub fn resolve_runtime(solution: &Path, runtime: Option<Runtime>) -> CliResult<Runtime> {
    if let Some(runtime) = runtime {
        return Ok(runtime);
    }
    solution
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(Runtime::from_extension)
        .ok_or_else(|| {
            CliError::failure(format!(
                "Error: cannot infer a runtime from '{}'; pass --runtime",
                solution.display()
            ))
        })
}

/// Problem id from the flag, else from the solution's file stem.
pub fn resolve_problem_id(solution: &Path, problem: Option<&str>) -> CliResult<String> {
    let id = match problem {
        Some(id) => slugify(id),
        None => solution
            .file_stem()
            .map(|stem| slugify(&stem.to_string_lossy()))
            .unwrap_or_default(),
    };
    if id.is_empty() {
        return Err(CliError::failure(format!(
            "Error: cannot derive a problem id from '{}'; pass --problem",
            solution.display()
        )));
    }
    Ok(id)
}

fn read_source(path: &Path) -> CliResult<String> {
    fs::read_to_string(path).map_err(|e| CliError::failure(format!("Error reading {}: {}", path.display(), e)))
}

// ============================================================================
// run / emit
// ============================================================================

/// Run every stored case of a problem against a solution file.
pub fn run_solution(store_root: &Path, solution: &Path, options: RunOptions) -> CliResult<ExitCode> {
    let mut config = load_config(store_root)?;
    if let Some(ms) = options.timeout_ms {
        config = config.with_timeout(Duration::from_millis(ms));
    }
    if let Some(jobs) = options.jobs {
        config = config.with_jobs(jobs.max(1));
    }
    if options.keep_scratch {
        config = config.with_keep_scratch(true);
    }

    let runtime = resolve_runtime(solution, options.runtime)?;
    let problem_id = resolve_problem_id(solution, options.problem.as_deref())?;
    let store = open_store(store_root, &config);
    let problem = load_problem(&store, &problem_id)?;
    let source = read_source(solution)?;

    let async_runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::failure(format!("Error starting async runtime: {}", e)))?;

    let runner = Runner::new(config);
    let mut reporter = ConsoleReporter::new(options.verbose, options.exit_first);
    let results = match async_runtime.block_on(runner.run_with(&problem, &source, runtime, &mut reporter)) {
        Ok(results) => results,
        Err(e) => {
            eprintln!("{:?}", miette::Report::new(e));
            return Err(CliError::new("", ExitCode::FAILURE));
        }
    };

    record_outputs(&store, &problem_id, &results);
    if results.iter().all(|r| r.passed) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Store each case's last output. Failures are logged, not fatal.
fn record_outputs(store: &DirectoryStore, problem_id: &str, results: &[TestResult]) {
    for result in results {
        let output = result
            .actual_output
            .as_deref()
            .or(result.error.as_deref())
            .unwrap_or_default();
        if let Err(e) = store.save_output(problem_id, result.index, output, result.passed) {
            tracing::warn!(case = result.index, error = %e, "could not record output");
        }
    }
}

/// Print the generated driver program for a solution.
pub fn emit_driver(
    store_root: &Path,
    solution: &Path,
    problem: Option<&str>,
    runtime: Option<Runtime>,
) -> CliResult<ExitCode> {
    let config = load_config(store_root)?;
    let runtime = resolve_runtime(solution, runtime)?;
    let problem_id = resolve_problem_id(solution, problem)?;
    let problem = load_problem(&open_store(store_root, &config), &problem_id)?;
    let source = read_source(solution)?;

    let program = DriverGenerator::new()
        .generate(&problem.signature, &source, runtime)
        .map_err(|e| CliError::failure(format!("Error: {}", e)))?;
    print!("{}", program.source);
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// Problem management
// ============================================================================

/// Create a problem from judge metadata and example blocks.
pub fn init_problem(
    store_root: &Path,
    title: &str,
    metadata_path: &Path,
    examples: &[String],
    force: bool,
) -> CliResult<ExitCode> {
    let config = load_config(store_root)?;
    let store = open_store(store_root, &config);
    let id = slugify(title);
    if id.is_empty() {
        return Err(CliError::failure(format!("Error: '{}' does not yield a problem id", title)));
    }
    if store.exists(&id) && !force {
        return Err(CliError::failure(format!(
            "Error: problem '{}' already exists (use --force to replace it)",
            id
        )));
    }

    let text = read_source(metadata_path)?;
    let metadata: SignatureMetadata = serde_json::from_str(&text)
        .map_err(|e| CliError::failure(format!("Error: invalid metadata {}: {}", metadata_path.display(), e)))?;
    let signature = ProblemSignature::from_metadata(&metadata, config.opaque_policy())
        .map_err(|e| CliError::failure(format!("Error: {}", e)))?;

    let mut problem = Problem::new(title, signature);
    for (i, text) in examples.iter().enumerate() {
        let block = literal::parse_example(text)
            .ok_or_else(|| CliError::failure(format!("Error: example {} has no 'Input:'/'Output:' parts", i + 1)))?;
        let mut case = TestCase::new();
        for (name, value) in block.params {
            case.set(name, value);
        }
        problem.add_case(case, block.output);
    }

    save_problem(&store, &problem)?;
    println!("created '{}' with {} test case(s)", id, problem.len());
    Ok(ExitCode::SUCCESS)
}

/// Append a test case after checking it against the signature.
pub fn add_case(store_root: &Path, problem_id: &str, input: &str, expected: &str) -> CliResult<ExitCode> {
    let config = load_config(store_root)?;
    let store = open_store(store_root, &config);
    let mut problem = load_problem(&store, problem_id)?;

    let case = TestCase::from_record(input).map_err(|e| CliError::failure(format!("Error: {}", e)))?;
    case.validate(&problem.signature)
        .map_err(|e| CliError::failure(format!("Error: {}", e)))?;

    problem.add_case(case, expected.trim());
    save_problem(&store, &problem)?;
    println!("added case {} to '{}'", problem.len(), problem.id());
    Ok(ExitCode::SUCCESS)
}

/// Remove a test case by 1-based index, realigning expected outputs.
pub fn remove_case(store_root: &Path, problem_id: &str, index: usize) -> CliResult<ExitCode> {
    let config = load_config(store_root)?;
    let store = open_store(store_root, &config);
    let mut problem = load_problem(&store, problem_id)?;
    if index == 0 {
        return Err(CliError::failure("Error: case indices start at 1"));
    }
    problem
        .remove_case(index - 1)
        .map_err(|e| CliError::failure(format!("Error: {}", e)))?;
    save_problem(&store, &problem)?;
    println!("removed case {} from '{}' ({} left)", index, problem.id(), problem.len());
    Ok(ExitCode::SUCCESS)
}

/// Print a problem's signature and cases with their last recorded verdicts.
pub fn list_cases(store_root: &Path, problem_id: &str) -> CliResult<ExitCode> {
    let config = load_config(store_root)?;
    let store = open_store(store_root, &config);
    let problem = load_problem(&store, problem_id)?;

    let signature = &problem.signature;
    let params: Vec<String> = signature
        .params()
        .iter()
        .map(|p| format!("{}: {}", p.name, p.ty.canonical_name()))
        .collect();
    println!("{} ({})", problem.title, problem.id());
    println!(
        "  {}({}) -> {}",
        signature.name(),
        params.join(", "),
        signature.return_type().canonical_name()
    );

    for (i, (case, expected)) in problem.test_cases().iter().zip(problem.expected_outputs()).enumerate() {
        let status = match store.load_output(&problem.id(), i + 1) {
            Ok(Some(output)) if output.passed => "\x1b[32mpassed\x1b[0m".to_string(),
            Ok(Some(output)) => format!("\x1b[31mfailed\x1b[0m (got {})", output.output),
            Ok(None) => "not run".to_string(),
            Err(e) => {
                tracing::warn!(case = i + 1, error = %e, "unreadable output record");
                "unknown".to_string()
            }
        };
        println!("  {:>3}. {} => {}  [{}]", i + 1, case.encode_record(signature), expected, status);
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_runtime_from_extension() {
        assert_eq!(resolve_runtime(Path::new("a/two_sum.cc"), None).unwrap(), Runtime::Cpp);
        assert_eq!(
            resolve_runtime(Path::new("two_sum.txt"), Some(Runtime::Java)).unwrap(),
            Runtime::Java
        );
        assert!(resolve_runtime(Path::new("two_sum"), None).is_err());
    }

    #[test]
    fn test_resolve_problem_id() {
        assert_eq!(resolve_problem_id(Path::new("src/Two_Sum.py"), None).unwrap(), "two-sum");
        assert_eq!(
            resolve_problem_id(Path::new("x.py"), Some("Valid Parentheses")).unwrap(),
            "valid-parentheses"
        );
        assert!(resolve_problem_id(Path::new("___.py"), None).is_err());
    }

    #[test]
    fn test_init_add_remove_round_trip() {
        let root = std::env::temp_dir().join(format!("casebench-cli-{}", std::process::id()));
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(&root).unwrap();
        let metadata = root.join("meta.json");
        fs::write(
            &metadata,
            r#"{"name": "twoSum", "params": [{"name": "nums", "type": "integer[]"}, {"name": "target", "type": "integer"}], "return": {"type": "integer[]"}}"#,
        )
        .unwrap();

        let examples = vec!["Input: nums = [2,7,11,15], target = 9\nOutput: [0,1]".to_string()];
        init_problem(&root, "Two Sum", &metadata, &examples, false).unwrap();
        assert!(init_problem(&root, "Two Sum", &metadata, &examples, false).is_err());

        add_case(&root, "two-sum", "nums = [3,2,4], target = 6", "[1,2]").unwrap();
        assert!(add_case(&root, "two-sum", "nums = [3,x], target = 6", "[1,2]").is_err());

        let store = DirectoryStore::new(&root, casebench_core::OpaqueTypePolicy::Reject);
        assert_eq!(store.load("two-sum").unwrap().len(), 2);

        remove_case(&root, "two-sum", 1).unwrap();
        let problem = store.load("two-sum").unwrap();
        assert_eq!(problem.len(), 1);
        assert_eq!(problem.expected_outputs(), ["[1,2]".to_string()]);
        assert!(remove_case(&root, "two-sum", 0).is_err());
        assert!(remove_case(&root, "two-sum", 5).is_err());

        fs::remove_dir_all(&root).unwrap();
    }
}
