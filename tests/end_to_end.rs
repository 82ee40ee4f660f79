//! End-to-end runs of generated drivers against real toolchains
//!
//! Each test skips itself (with a note on stderr) when the toolchain it needs is not installed.

use std::fs;
use std::process::{Command, Stdio};
use std::time::Duration;

use casebench::backend::{DriverGenerator, Runtime};
use casebench::config::{RunnerConfig, Toolchain};
use casebench::model::{Problem, ProblemSignature, TestCase};
use casebench::runner::{ExecutionPlan, Outcome, ProcessExecutor, ProcessOutput, ProgramExecutor, RunError, Runner};
use casebench_core::OpaqueTypePolicy;

fn available(program: &str) -> bool {
    let found = Command::new(program)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok();
    if !found {
        eprintln!("skipping: '{}' is not installed", program);
    }
    found
}

fn two_sum() -> Problem {
    let signature = ProblemSignature::from_tokens(
        "twoSum",
        &[("nums", "integer[]"), ("target", "integer")],
        "integer[]",
        OpaqueTypePolicy::Reject,
    )
    .expect("valid signature");
    let mut problem = Problem::new("Two Sum", signature);
    problem.add_case(TestCase::new().with("nums", "[2,7,11,15]").with("target", "9"), "[0,1]");
    problem.add_case(TestCase::new().with("nums", "[3,2,4]").with("target", "6"), "[1, 2]");
    problem.add_case(TestCase::new().with("nums", "[3,3]").with("target", "0"), "[]");
    problem
}

fn runner(jobs: usize) -> Runner {
    Runner::new(
        RunnerConfig::new()
            .with_jobs(jobs)
            .with_scratch_root(std::env::temp_dir().join("casebench-e2e")),
    )
}

const PYTHON_SOLUTION: &str = r#"
class Solution:
    def twoSum(self, nums: List[int], target: int) -> List[int]:
        if target == 0:
            raise ValueError("zero target")
        seen = {}
        for i, n in enumerate(nums):
            if target - n in seen:
                return [seen[target - n], i]
            seen[n] = i
        return []
"#;

const CPP_SOLUTION: &str = r#"
class Solution {
public:
    vector<int> twoSum(vector<int>& nums, int target) {
        unordered_map<int, int> seen;
        for (int i = 0; i < (int)nums.size(); ++i) {
            auto it = seen.find(target - nums[i]);
            if (it != seen.end()) return {it->second, i};
            seen[nums[i]] = i;
        }
        return {};
    }
};
"#;

const RUST_SOLUTION: &str = r#"
impl Solution {
    pub fn two_sum(nums: Vec<i32>, target: i32) -> Vec<i32> {
        if target == 0 {
            panic!("zero target");
        }
        let mut seen: HashMap<i32, usize> = HashMap::new();
        for (i, n) in nums.iter().enumerate() {
            if let Some(&j) = seen.get(&(target - n)) {
                return vec![j as i32, i as i32];
            }
            seen.insert(*n, i);
        }
        vec![]
    }
}
"#;

#[tokio::test]
async fn test_python_runtime_error_fails_only_its_case() {
    if !available("python3") {
        return;
    }
    let results = runner(1)
        .run(&two_sum(), PYTHON_SOLUTION, Runtime::Python)
        .await
        .expect("run completes");

    assert_eq!(results.len(), 3);
    assert!(results[0].passed, "{:?}", results[0]);
    assert!(results[1].passed, "{:?}", results[1]);
    assert!(!results[2].passed);
    let error = results[2].error.as_deref().expect("error recorded");
    assert!(error.starts_with("RuntimeError:"), "{}", error);
    assert!(error.contains("zero target"), "{}", error);
}

#[tokio::test]
async fn test_python_malformed_input_is_parse_error() {
    if !available("python3") {
        return;
    }
    let mut problem = two_sum();
    problem.add_case(TestCase::new().with("nums", "[1,two]").with("target", "3"), "[0,1]");
    let results = runner(2)
        .run(&problem, PYTHON_SOLUTION, Runtime::Python)
        .await
        .expect("run completes");
    assert_eq!(results.len(), 4);
    assert!(results[3].error.as_deref().unwrap_or_default().starts_with("ParseError:"));
    assert!(results[0].passed);
}

#[tokio::test]
async fn test_cpp_two_sum_passes() {
    if !available("g++") {
        return;
    }
    let mut problem = two_sum();
    problem.remove_case(2).expect("case exists");
    let results = runner(2)
        .run(&problem, CPP_SOLUTION, Runtime::Cpp)
        .await
        .expect("run completes");
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.passed), "{:?}", results);
}

#[tokio::test]
async fn test_cpp_compile_error_aborts_run() {
    if !available("g++") {
        return;
    }
    let broken = "class Solution {\npublic:\n    vector<int> twoSum(vector<int>& nums, int target) { return nums }\n};\n";
    let err = runner(1)
        .run(&two_sum(), broken, Runtime::Cpp)
        .await
        .expect_err("compilation must fail");
    match err {
        RunError::Compile { diagnostics } => assert!(diagnostics.contains("error"), "{}", diagnostics),
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn test_rust_panic_is_runtime_error() {
    if !available("rustc") {
        return;
    }
    let results = runner(1)
        .run(&two_sum(), RUST_SOLUTION, Runtime::Rust)
        .await
        .expect("run completes");
    assert_eq!(results.len(), 3);
    assert!(results[0].passed, "{:?}", results[0]);
    assert!(results[1].passed, "{:?}", results[1]);
    assert!(!results[2].passed);
    assert!(results[2].error.as_deref().unwrap_or_default().contains("RuntimeError"));
}

#[tokio::test]
async fn test_java_two_sum() {
    if !available("javac") || !available("java") {
        return;
    }
    let results = runner(2)
        .run(&two_sum(), JAVA_SOLUTION, Runtime::Java)
        .await
        .expect("run completes");
    assert_eq!(results.len(), 3);
    assert!(results[0].passed, "{:?}", results[0]);
    assert!(results[1].passed, "{:?}", results[1]);
    assert!(!results[2].passed);
    let error = results[2].error.as_deref().unwrap_or_default();
    assert!(error.starts_with("RuntimeError:"), "{}", error);
    assert!(error.contains("zero target"), "{}", error);
}

const JAVA_SOLUTION: &str = r#"
class Solution {
    public int[] twoSum(int[] nums, int target) {
        if (target == 0) throw new IllegalArgumentException("zero target");
        Map<Integer, Integer> seen = new HashMap<>();
        for (int i = 0; i < nums.length; i++) {
            Integer j = seen.get(target - nums[i]);
            if (j != null) return new int[] {j, i};
            seen.put(nums[i], i);
        }
        return new int[0];
    }
}
"#;

// ============================================================================
// Tree and list round trips through generated drivers
// ============================================================================

fn echo_problem(type_token: &str, cases: &[(&str, &str)]) -> Problem {
    let signature = ProblemSignature::from_tokens("echo", &[("value", type_token)], type_token, OpaqueTypePolicy::Reject)
        .expect("valid signature");
    let mut problem = Problem::new(format!("Echo {}", type_token), signature);
    for (input, expected) in cases {
        problem.add_case(TestCase::new().with("value", *input), *expected);
    }
    problem
}

fn tree_problem() -> Problem {
    echo_problem(
        "TreeNode",
        &[
            ("[3,9,20,null,null,15,7]", "[3,9,20,null,null,15,7]"),
            ("[1,2,null,null,null]", "[1,2]"),
            ("[]", "[]"),
        ],
    )
}

fn list_problem() -> Problem {
    echo_problem("ListNode", &[("[1,2,3]", "[1,2,3]"), ("[7]", "[7]"), ("[]", "[]")])
}

/// The driver's exact output must equal the expected text, not just compare equal.
async fn assert_echoes(problem: &Problem, source: &str, runtime: Runtime) {
    let results = runner(1).run(problem, source, runtime).await.expect("run completes");
    assert_eq!(results.len(), problem.len());
    for result in &results {
        assert!(result.error.is_none(), "{}: {:?}", runtime, result);
        assert_eq!(
            result.actual_output.as_deref(),
            Some(result.expected_output.as_str()),
            "{} case {}",
            runtime,
            result.index
        );
    }
}

#[tokio::test]
async fn test_python_tree_and_list_round_trip() {
    if !available("python3") {
        return;
    }
    let tree = "class Solution:\n    def echo(self, value: Optional[TreeNode]) -> Optional[TreeNode]:\n        return value\n";
    let list = "class Solution:\n    def echo(self, value: Optional[ListNode]) -> Optional[ListNode]:\n        return value\n";
    assert_echoes(&tree_problem(), tree, Runtime::Python).await;
    assert_echoes(&list_problem(), list, Runtime::Python).await;
}

#[tokio::test]
async fn test_cpp_tree_and_list_round_trip() {
    if !available("g++") {
        return;
    }
    let tree = "class Solution {\npublic:\n    TreeNode* echo(TreeNode* value) { return value; }\n};\n";
    let list = "class Solution {\npublic:\n    ListNode* echo(ListNode* value) { return value; }\n};\n";
    assert_echoes(&tree_problem(), tree, Runtime::Cpp).await;
    assert_echoes(&list_problem(), list, Runtime::Cpp).await;
}

#[tokio::test]
async fn test_java_tree_and_list_round_trip() {
    if !available("javac") || !available("java") {
        return;
    }
    let tree = "class Solution {\n    public TreeNode echo(TreeNode value) { return value; }\n}\n";
    let list = "class Solution {\n    public ListNode echo(ListNode value) { return value; }\n}\n";
    assert_echoes(&tree_problem(), tree, Runtime::Java).await;
    assert_echoes(&list_problem(), list, Runtime::Java).await;
}

#[tokio::test]
async fn test_rust_tree_and_list_round_trip() {
    if !available("rustc") {
        return;
    }
    let tree = r#"
impl Solution {
    pub fn echo(value: Option<Rc<RefCell<TreeNode>>>) -> Option<Rc<RefCell<TreeNode>>> {
        value
    }
}
"#;
    let list = r#"
impl Solution {
    pub fn echo(value: Option<Box<ListNode>>) -> Option<Box<ListNode>> {
        value
    }
}
"#;
    assert_echoes(&tree_problem(), tree, Runtime::Rust).await;
    assert_echoes(&list_problem(), list, Runtime::Rust).await;
}

// ============================================================================
// Line-oriented drivers keep reading after a failed record
// ============================================================================

const TWICE_INPUT: &str = "n = 1\nn = x\nn = 5\nn = 3\n";

/// Build the driver for `twice(n)` and feed it several records on one stdin.
async fn drive_twice(source: &str, runtime: Runtime) -> ProcessOutput {
    let signature = ProblemSignature::from_tokens("twice", &[("n", "integer")], "integer", OpaqueTypePolicy::Reject)
        .expect("valid signature");
    let program = DriverGenerator::new()
        .generate(&signature, source, runtime)
        .expect("driver generates");

    let dir = std::env::temp_dir().join(format!("casebench-e2e-lines-{}-{}", runtime, std::process::id()));
    fs::create_dir_all(&dir).expect("scratch dir");
    fs::write(dir.join(program.file_name), &program.source).expect("driver written");

    let plan = ExecutionPlan::for_runtime(runtime, &Toolchain::default(), &dir);
    if let Some(build) = &plan.build {
        match ProcessExecutor.execute(build, None, Duration::from_secs(120)).await.expect("build starts") {
            Outcome::Finished(output) => assert!(output.success, "{}", output.stderr),
            Outcome::TimedOut => panic!("build timed out"),
        }
    }
    let outcome = ProcessExecutor
        .execute(&plan.run, Some(TWICE_INPUT), Duration::from_secs(30))
        .await
        .expect("driver starts");
    let _ = fs::remove_dir_all(&dir);
    match outcome {
        Outcome::Finished(output) => output,
        Outcome::TimedOut => panic!("driver timed out"),
    }
}

fn assert_continues_after_failures(output: &ProcessOutput, runtime: Runtime) {
    assert_eq!(output.stdout.lines().collect::<Vec<_>>(), ["2", "6"], "{}", runtime);
    let errors: Vec<&str> = output.stderr.lines().collect();
    assert_eq!(errors.len(), 2, "{}: {}", runtime, output.stderr);
    assert!(errors[0].starts_with("ParseError:"), "{}", errors[0]);
    assert!(errors[1].starts_with("RuntimeError:"), "{}", errors[1]);
    assert!(errors[1].contains("five"), "{}", errors[1]);
}

#[tokio::test]
async fn test_python_driver_reads_every_line() {
    if !available("python3") {
        return;
    }
    let source = "class Solution:\n    def twice(self, n: int) -> int:\n        if n == 5:\n            raise ValueError(\"five\")\n        return n * 2\n";
    let output = drive_twice(source, Runtime::Python).await;
    assert_continues_after_failures(&output, Runtime::Python);
    assert!(output.stderr.contains("ValueError: five"), "{}", output.stderr);
}

#[tokio::test]
async fn test_cpp_driver_reads_every_line() {
    if !available("g++") {
        return;
    }
    let source = r#"
class Solution {
public:
    int twice(int n) {
        if (n == 5) throw runtime_error("five");
        return n * 2;
    }
};
"#;
    let output = drive_twice(source, Runtime::Cpp).await;
    assert_continues_after_failures(&output, Runtime::Cpp);
}
