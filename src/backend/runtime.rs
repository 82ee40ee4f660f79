//! Supported target runtimes and the backend strategy trait.

use std::fmt;
use std::str::FromStr;

use super::driver::{DriverPlan, GenerationError};
use super::rules::{Codec, CodecRule};

/// How a generated driver consumes its input records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverCycle {
    /// Read stdin line by line, one result line per record, until end of input.
    LineOriented,
    /// Read a single record, print a single result, exit.
    RunOnce,
}

/// A language toolchain the engine can generate, build and run drivers for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Runtime {
    Cpp,
    Java,
    Python,
    Rust,
}

impl Runtime {
    pub const ALL: [Runtime; 4] = [Runtime::Cpp, Runtime::Java, Runtime::Python, Runtime::Rust];

    /// Stable identifier used on the command line and in scratch directory names.
    pub fn id(self) -> &'static str {
        match self {
            Runtime::Cpp => "cpp",
            Runtime::Java => "java",
            Runtime::Python => "python",
            Runtime::Rust => "rust",
        }
    }

    /// Resolve an identifier or common alias (case-insensitive).
    pub fn from_id(id: &str) -> Option<Self> {
        match id.trim().to_ascii_lowercase().as_str() {
            "cpp" | "c++" | "cxx" => Some(Runtime::Cpp),
            "java" => Some(Runtime::Java),
            "python" | "python3" | "py" => Some(Runtime::Python),
            "rust" | "rs" => Some(Runtime::Rust),
            _ => None,
        }
    }

    /// Resolve from a solution file extension (without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "cpp" | "cc" | "cxx" => Some(Runtime::Cpp),
            "java" => Some(Runtime::Java),
            "py" => Some(Runtime::Python),
            "rs" => Some(Runtime::Rust),
            _ => None,
        }
    }

    /// File name the generated program is written to.
    pub fn source_file(self) -> &'static str {
        match self {
            Runtime::Cpp => "main.cpp",
            Runtime::Java => "Main.java",
            Runtime::Python => "main.py",
            Runtime::Rust => "main.rs",
        }
    }

    /// Whether a compile step precedes execution.
    pub fn needs_build(self) -> bool {
        !matches!(self, Runtime::Python)
    }

    pub fn cycle(self) -> DriverCycle {
        match self {
            Runtime::Rust => DriverCycle::RunOnce,
            _ => DriverCycle::LineOriented,
        }
    }

    /// Slug of the stored starter template for this runtime.
    pub fn lang_slug(self) -> &'static str {
        match self {
            Runtime::Cpp => "cpp",
            Runtime::Java => "java",
            Runtime::Python => "python3",
            Runtime::Rust => "rust",
        }
    }
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Runtime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Runtime::from_id(s).ok_or_else(|| {
            let known: Vec<&str> = Runtime::ALL.iter().map(|r| r.id()).collect();
            format!("unknown runtime '{}' (expected one of: {})", s, known.join(", "))
        })
    }
}

/// Per-runtime driver generation strategy.
///
/// The generic [`DriverGenerator`](super::driver::DriverGenerator) resolves every parameter to a [`CodecRule`] and
/// asks the backend to spell types and helper calls; the backend owns the runtime's surface syntax.
pub trait RuntimeBackend: Send + Sync {
    fn runtime(&self) -> Runtime;

    /// Native spelling of a value shape, or `None` when this runtime cannot express it.
    fn native_type(&self, codec: Codec) -> Option<&'static str>;

    /// Name the solution entry point is called by, derived from the signature's function name.
    fn entry_name(&self, function: &str) -> String {
        function.to_string()
    }

    /// Expression looking up the literal of parameter `name` in the current record.
    fn field_call(&self, name: &str) -> String;

    /// Expression decoding `raw` (an expression yielding the literal text) with `rule`.
    fn decode_call(&self, rule: &CodecRule, raw: &str) -> String;

    /// Expression encoding `value` with `rule`.
    fn encode_call(&self, rule: &CodecRule, value: &str) -> String;

    /// Imports and shared type definitions placed before the user source.
    fn auxiliary_declarations(&self) -> Result<String, GenerationError>;

    /// Helper library and entry point placed after the user source.
    fn driver_section(&self, plan: &DriverPlan) -> Result<String, GenerationError>;
}
