//! Token binding.
//!
//! This module walks the raw argument vector with a [`TokenCursor`] and binds
//! every run of tokens to a declared parameter: leading bare tokens to the
//! positional parameter, `-name` tokens to named parameters, and the values
//! that follow them according to the parameter's type and arity.

mod cursor;
mod engine;

pub use cursor::{flag_name, is_delimited, TokenCursor};
pub use engine::bind;

/// Delimiter used when none is configured.
pub const DEFAULT_DELIMITER: char = '-';

/// Settings for one binding pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindOptions {
    /// Characters that mark a token as a parameter name
    pub delimiters: Vec<char>,
}

impl BindOptions {
    pub fn with_delimiters(delimiters: impl IntoIterator<Item = char>) -> Self {
        Self {
            delimiters: delimiters.into_iter().collect(),
        }
    }
}

impl Default for BindOptions {
    fn default() -> Self {
        Self {
            delimiters: vec![DEFAULT_DELIMITER],
        }
    }
}
