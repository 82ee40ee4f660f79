//! Driver generation facade
//!
//! A generated program is composed in a fixed order:
//!
//! 1. auxiliary declarations (imports, `ListNode`, `TreeNode`)
//! 2. the user's source, verbatim
//! 3. the driver section (helper library and entry point)
//!
//! Output is a pure function of the signature, the user source and the runtime.

use casebench_core::TypeDescriptor;
use thiserror::Error;

use super::rules::{self, CodecRule};
use super::runtime::{Runtime, RuntimeBackend};
use super::targets;
use crate::model::ProblemSignature;

/// Errors raised while generating a driver program
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("parameter '{param}' has type '{ty}', which the {runtime} runtime cannot express")]
    UnsupportedParameterType {
        runtime: Runtime,
        param: String,
        ty: TypeDescriptor,
    },

    #[error("return type '{ty}' cannot be expressed by the {runtime} runtime")]
    UnsupportedReturnType { runtime: Runtime, ty: TypeDescriptor },

    #[error("failed to emit {runtime} driver: {message}")]
    Emission { runtime: Runtime, message: String },
}

/// One parameter, resolved against a backend.
#[derive(Debug, Clone)]
pub struct PlannedParam {
    /// Parameter name as it appears in input records
    pub name: String,
    /// Local variable holding the decoded value
    pub local: String,
    pub native_type: &'static str,
    pub rule: &'static CodecRule,
    /// Decode expression over the record field
    pub decode: String,
}

/// Everything a backend needs to write its driver section.
#[derive(Debug, Clone)]
pub struct DriverPlan {
    pub runtime: Runtime,
    /// Entry point name in the runtime's convention
    pub entry: String,
    pub params: Vec<PlannedParam>,
    pub return_native: &'static str,
    pub return_rule: &'static CodecRule,
}

impl DriverPlan {
    /// Encode expression for a result held in `value`.
    pub fn encode(&self, backend: &dyn RuntimeBackend, value: &str) -> String {
        backend.encode_call(self.return_rule, value)
    }
}

/// A complete, self-contained driver program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedProgram {
    pub runtime: Runtime,
    /// File name the program must be written under
    pub file_name: &'static str,
    pub source: String,
}

/// Generates driver programs for any supported runtime
#[derive(Debug, Default, Clone, Copy)]
pub struct DriverGenerator;

impl DriverGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate the driver program wrapping `user_source` for `runtime`.
    #[tracing::instrument(skip_all, fields(runtime = %runtime, function = signature.name()))]
    pub fn generate(
        &self,
        signature: &ProblemSignature,
        user_source: &str,
        runtime: Runtime,
    ) -> Result<GeneratedProgram, GenerationError> {
        let backend = targets::backend_for(runtime);
        let plan = Self::plan(backend, signature)?;

        let mut source = backend.auxiliary_declarations()?;
        source.push('\n');
        source.push_str(user_source);
        if !user_source.ends_with('\n') {
            source.push('\n');
        }
        source.push('\n');
        source.push_str(&backend.driver_section(&plan)?);

        tracing::debug!(bytes = source.len(), "generated driver");
        Ok(GeneratedProgram {
            runtime,
            file_name: runtime.source_file(),
            source,
        })
    }

    /// Resolve every parameter and the return type against `backend`.
    pub fn plan(backend: &dyn RuntimeBackend, signature: &ProblemSignature) -> Result<DriverPlan, GenerationError> {
        let runtime = backend.runtime();
        let mut params = Vec::with_capacity(signature.params().len());
        for param in signature.params() {
            let rule = rules::rule_for(&param.ty);
            let native_type =
                backend
                    .native_type(rule.codec)
                    .ok_or_else(|| GenerationError::UnsupportedParameterType {
                        runtime,
                        param: param.name.clone(),
                        ty: param.ty.clone(),
                    })?;
            let field = backend.field_call(&param.name);
            params.push(PlannedParam {
                name: param.name.clone(),
                local: format!("arg_{}", param.name),
                native_type,
                rule,
                decode: backend.decode_call(rule, &field),
            });
        }

        let return_rule = rules::rule_for(signature.return_type());
        let return_native =
            backend
                .native_type(return_rule.codec)
                .ok_or_else(|| GenerationError::UnsupportedReturnType {
                    runtime,
                    ty: signature.return_type().clone(),
                })?;

        Ok(DriverPlan {
            runtime,
            entry: backend.entry_name(signature.name()),
            params,
            return_native,
            return_rule,
        })
    }
}
