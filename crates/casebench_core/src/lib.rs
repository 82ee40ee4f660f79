//! Provide the shared, pure vocabulary used by the casebench driver generator, process runner and comparator.
//!
//! This crate is intentionally small and dependency-light. It contains deterministic helpers that both:
//! - the driver generator uses to resolve parameter/return shapes and pick decode/encode rules, and
//! - the host-side runner uses to validate and canonicalize the literals it feeds to generated programs.
//!
//! ## Notes
//!
//! - This is a “semantic core” crate: **no IO**, no global state, and no runtime-specific types.
//! - Current scope: the closed [`TypeDescriptor`] vocabulary and its alias registry, the `name = value` wire-literal
//!   scanner, and a reference implementation of the canonical encoding (level-order trees, bracketed lists).

pub mod canonical;
pub mod literal;
pub mod types;

pub use canonical::{Tree, Value};
pub use literal::ParseError;
pub use types::{OpaqueTypePolicy, TypeDescriptor, UnsupportedType};
