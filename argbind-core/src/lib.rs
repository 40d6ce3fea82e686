//! Core types and functionality for argbind.
//!
//! This crate binds a raw command-line token sequence to a set of declared,
//! strongly typed parameters: a positional default parameter, flags, scalar
//! and array parameters. It provides declaration, the binding pass, value
//! coercion, typed retrieval and TOML declaration manifests.

mod accessor;
mod error;
mod interpreter;
mod manifest;
mod registry;
mod value;

pub mod binder;

// Re-export core types
pub use accessor::{Param, ParameterType};
pub use binder::{bind, BindOptions, DEFAULT_DELIMITER};
pub use error::{ArgError, Result};
pub use interpreter::{ErrorHandler, Interpreter, RunOutcome};
pub use manifest::{DefaultDecl, Manifest, ParameterDecl};
pub use registry::{ParameterRegistry, ParameterSpec};
pub use value::{coerce, coerce_array, Arity, CoercionFailure, TypeTag, TypedValue, ValueKind};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
