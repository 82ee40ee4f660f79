//! Problem data model: signatures, test cases, results.
//!
//! A [`ProblemSignature`] is validated once when it is built (unique identifier names, resolved types) and is
//! immutable afterwards, so the driver generator never sees malformed type tokens.

use std::collections::{BTreeMap, HashSet};

use casebench_core::canonical;
use casebench_core::literal::{self, ParseError};
use casebench_core::types::{self, OpaqueTypePolicy, TypeDescriptor, UnsupportedType};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building or editing problem data.
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error(transparent)]
    UnsupportedType(#[from] UnsupportedType),

    #[error("duplicate parameter name '{0}'")]
    DuplicateParameter(String),

    #[error("'{0}' is not a valid identifier")]
    InvalidIdentifier(String),

    #[error("test case index {index} out of range ({len} test cases)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("invalid test case record: {0}")]
    Record(#[from] ParseError),
}

/// One named parameter of a signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSpec {
    pub name: String,
    pub ty: TypeDescriptor,
}

impl ParameterSpec {
    pub fn new(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self { name: name.into(), ty }
    }
}

/// Function name, ordered parameters and return type of the solution under test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemSignature {
    name: String,
    params: Vec<ParameterSpec>,
    return_type: TypeDescriptor,
}

impl ProblemSignature {
    /// Build a signature from already-resolved types.
    ///
    /// ## Errors
    /// - [`ModelError::InvalidIdentifier`] if the function or a parameter name is not an identifier.
    /// - [`ModelError::DuplicateParameter`] if two parameters share a name.
    pub fn new(
        name: impl Into<String>,
        params: Vec<ParameterSpec>,
        return_type: TypeDescriptor,
    ) -> Result<Self, ModelError> {
        let name = name.into();
        if !is_identifier(&name) {
            return Err(ModelError::InvalidIdentifier(name));
        }
        let mut seen = HashSet::new();
        for param in &params {
            if !is_identifier(&param.name) {
                return Err(ModelError::InvalidIdentifier(param.name.clone()));
            }
            if !seen.insert(param.name.as_str()) {
                return Err(ModelError::DuplicateParameter(param.name.clone()));
            }
        }
        Ok(Self {
            name,
            params,
            return_type,
        })
    }

    /// Build a signature from loose type tokens (`"integer[]"`, `"TreeNode"`, ...).
    pub fn from_tokens(
        name: &str,
        params: &[(&str, &str)],
        return_token: &str,
        policy: OpaqueTypePolicy,
    ) -> Result<Self, ModelError> {
        let params = params
            .iter()
            .map(|(pname, token)| Ok(ParameterSpec::new(*pname, resolve_logged(token, policy)?)))
            .collect::<Result<Vec<_>, ModelError>>()?;
        let return_type = resolve_logged(return_token, policy)?;
        Self::new(name, params, return_type)
    }

    /// Build a signature from judge metadata.
    pub fn from_metadata(meta: &SignatureMetadata, policy: OpaqueTypePolicy) -> Result<Self, ModelError> {
        let params: Vec<(&str, &str)> = meta
            .params
            .iter()
            .map(|p| (p.name.as_str(), p.type_token.as_str()))
            .collect();
        Self::from_tokens(&meta.name, &params, &meta.return_type.type_token, policy)
    }

    pub fn to_metadata(&self) -> SignatureMetadata {
        SignatureMetadata {
            name: self.name.clone(),
            params: self
                .params
                .iter()
                .map(|p| ParamMetadata {
                    name: p.name.clone(),
                    type_token: p.ty.canonical_name().to_string(),
                })
                .collect(),
            return_type: ReturnMetadata {
                type_token: self.return_type.canonical_name().to_string(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[ParameterSpec] {
        &self.params
    }

    pub fn return_type(&self) -> &TypeDescriptor {
        &self.return_type
    }
}

fn resolve_logged(token: &str, policy: OpaqueTypePolicy) -> Result<TypeDescriptor, UnsupportedType> {
    let ty = types::resolve(token, policy)?;
    if ty.is_opaque() {
        tracing::warn!(token, "unknown type passed through as an opaque runtime type");
    }
    Ok(ty)
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => chars.all(|c| c.is_ascii_alphanumeric() || c == '_'),
        _ => false,
    }
}

/// Judge metadata shape: `{"name": .., "params": [{"name": .., "type": ..}], "return": {"type": ..}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureMetadata {
    pub name: String,
    #[serde(default)]
    pub params: Vec<ParamMetadata>,
    #[serde(rename = "return")]
    pub return_type: ReturnMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamMetadata {
    pub name: String,
    #[serde(rename = "type")]
    pub type_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnMetadata {
    #[serde(rename = "type")]
    pub type_token: String,
}

/// Raw literal values for one invocation, keyed by parameter name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TestCase {
    values: BTreeMap<String, String>,
}

impl TestCase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, literal: impl Into<String>) -> Self {
        self.set(name, literal);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, literal: impl Into<String>) {
        self.values.insert(name.into(), literal.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parse a `name = value, ...` record.
    pub fn from_record(line: &str) -> Result<Self, ModelError> {
        let mut case = TestCase::new();
        for (name, value) in literal::parse_record(line)? {
            case.set(name, literal::collapse_nesting(value));
        }
        Ok(case)
    }

    /// Literal for `param`, falling back to the type's default when the case omits it.
    pub fn literal_for<'a>(&'a self, param: &'a ParameterSpec) -> &'a str {
        self.get(&param.name).unwrap_or_else(|| param.ty.default_literal())
    }

    /// Encode as the single-line wire record, in signature parameter order.
    pub fn encode_record(&self, signature: &ProblemSignature) -> String {
        literal::format_record(signature.params().iter().map(|p| (p.name.as_str(), self.literal_for(p))))
    }

    /// Check that every literal decodes for its parameter type.
    pub fn validate(&self, signature: &ProblemSignature) -> Result<(), ParseError> {
        for param in signature.params() {
            canonical::decode(self.literal_for(param), &param.ty)
                .map_err(|e| ParseError::new(format!("parameter '{}': {}", param.name, e)))?;
        }
        Ok(())
    }
}

impl std::fmt::Display for TestCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&literal::format_record(self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))))
    }
}

/// Verdict for one test case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    /// 1-based position of the case in its problem.
    pub index: usize,
    pub input: TestCase,
    pub expected_output: String,
    pub actual_output: Option<String>,
    pub passed: bool,
    pub error: Option<String>,
}

/// Starter code for one runtime, as supplied by the source-fetch collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    #[serde(rename = "langSlug")]
    pub lang_slug: String,
    pub lang: String,
    pub code: String,
}

/// A problem with its signature, test cases and aligned expected outputs.
#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
    pub title: String,
    pub signature: ProblemSignature,
    test_cases: Vec<TestCase>,
    expected_outputs: Vec<String>,
    pub templates: Vec<Template>,
}

impl Problem {
    pub fn new(title: impl Into<String>, signature: ProblemSignature) -> Self {
        Self {
            title: title.into(),
            signature,
            test_cases: Vec::new(),
            expected_outputs: Vec::new(),
            templates: Vec::new(),
        }
    }

    /// Build from stored parts, padding or truncating expected outputs to the case count.
    pub fn from_parts(
        title: impl Into<String>,
        signature: ProblemSignature,
        test_cases: Vec<TestCase>,
        mut expected_outputs: Vec<String>,
        templates: Vec<Template>,
    ) -> Self {
        expected_outputs.resize(test_cases.len(), String::new());
        Self {
            title: title.into(),
            signature,
            test_cases,
            expected_outputs,
            templates,
        }
    }

    /// Storage key derived from the title.
    pub fn id(&self) -> String {
        slugify(&self.title)
    }

    pub fn test_cases(&self) -> &[TestCase] {
        &self.test_cases
    }

    pub fn expected_outputs(&self) -> &[String] {
        &self.expected_outputs
    }

    pub fn len(&self) -> usize {
        self.test_cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.test_cases.is_empty()
    }

    pub fn add_case(&mut self, case: TestCase, expected: impl Into<String>) {
        self.test_cases.push(case);
        self.expected_outputs.push(expected.into());
    }

    pub fn update_case(&mut self, index: usize, case: TestCase) -> Result<(), ModelError> {
        let len = self.len();
        let slot = self
            .test_cases
            .get_mut(index)
            .ok_or(ModelError::IndexOutOfRange { index, len })?;
        *slot = case;
        Ok(())
    }

    pub fn set_expected(&mut self, index: usize, expected: impl Into<String>) -> Result<(), ModelError> {
        let len = self.len();
        let slot = self
            .expected_outputs
            .get_mut(index)
            .ok_or(ModelError::IndexOutOfRange { index, len })?;
        *slot = expected.into();
        Ok(())
    }

    /// Remove a case and its expected output (0-based index).
    pub fn remove_case(&mut self, index: usize) -> Result<(TestCase, String), ModelError> {
        if index >= self.len() {
            return Err(ModelError::IndexOutOfRange { index, len: self.len() });
        }
        Ok((self.test_cases.remove(index), self.expected_outputs.remove(index)))
    }

    /// Starter code for a runtime slug (`cpp`, `java`, `python3`, `rust`, ...).
    pub fn template(&self, lang_slug: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.lang_slug == lang_slug)
    }
}

/// Lowercase, collapse runs of non-alphanumerics into `-`, trim leading/trailing `-`.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}
