//! Driver Template Engine
//!
//! Turns a problem signature plus user source into a complete program for one runtime.
//!
//! ## Module Organization
//!
//! - `emitter.rs` - Indentation-aware source buffer
//! - `rules.rs` - Declarative decode/encode rule table, one rule per canonical type
//! - `runtime.rs` - `Runtime` identifiers and the `RuntimeBackend` strategy trait
//! - `targets/` - C++, Java, Python and Rust backends with their helper libraries
//! - `driver.rs` - `DriverGenerator` facade composing the final program

#![deny(clippy::unwrap_used)]

pub mod driver;
pub mod emitter;
pub mod rules;
pub mod runtime;
pub mod targets;

pub use driver::{DriverGenerator, GeneratedProgram, GenerationError};
pub use runtime::{DriverCycle, Runtime, RuntimeBackend};
