//! Runtime backends

pub mod cpp;
pub mod java;
pub mod python;
pub mod rust;

use super::runtime::{Runtime, RuntimeBackend};

static CPP: cpp::CppBackend = cpp::CppBackend;
static JAVA: java::JavaBackend = java::JavaBackend;
static PYTHON: python::PythonBackend = python::PythonBackend;
static RUST: rust::RustBackend = rust::RustBackend;

/// The backend generating drivers for `runtime`.
pub fn backend_for(runtime: Runtime) -> &'static dyn RuntimeBackend {
    match runtime {
        Runtime::Cpp => &CPP,
        Runtime::Java => &JAVA,
        Runtime::Python => &PYTHON,
        Runtime::Rust => &RUST,
    }
}
