//! The binding pass.
//!
//! A pass is single and left to right. Values are staged while the cursor
//! moves and only written to the registry once the whole token sequence was
//! accepted, so a failed pass never leaves half-bound parameters behind.

use tracing::{debug, trace, warn};

use super::cursor::{flag_name, TokenCursor};
use super::BindOptions;
use crate::error::{ArgError, Result};
use crate::registry::{ParameterRegistry, ParameterSpec};
use crate::value::{coerce, coerce_array, CoercionFailure, TypedValue};

/// Bind `tokens` against `registry`.
///
/// Every previously bound value is cleared first. Mandatory parameters are
/// not checked here; see [`ParameterRegistry::check_mandatory`].
pub fn bind<S: AsRef<str>>(
    registry: &mut ParameterRegistry,
    tokens: &[S],
    options: &BindOptions,
) -> Result<()> {
    registry.clear_values();

    let staged = Pass::new(registry, tokens, &options.delimiters).run()?;

    debug!(tokens = tokens.len(), bound = staged.len(), "binding pass complete");
    for (position, value) in staged {
        registry.set_value(position, value);
    }
    Ok(())
}

impl ParameterRegistry {
    pub fn bind<S: AsRef<str>>(&mut self, tokens: &[S], options: &BindOptions) -> Result<()> {
        bind(self, tokens, options)
    }
}

struct Pass<'a, S> {
    registry: &'a ParameterRegistry,
    cursor: TokenCursor<'a, S>,
    staged: Vec<(usize, TypedValue)>,
    last_bound: Option<usize>,
}

impl<'a, S: AsRef<str>> Pass<'a, S> {
    fn new(registry: &'a ParameterRegistry, tokens: &'a [S], delimiters: &'a [char]) -> Self {
        Self {
            registry,
            cursor: TokenCursor::new(tokens, delimiters),
            staged: Vec::new(),
            last_bound: None,
        }
    }

    fn run(mut self) -> Result<Vec<(usize, TypedValue)>> {
        self.positional_prefix()?;

        while let Some(token) = self.cursor.peek() {
            if self.cursor.is_flag(token) {
                self.cursor.advance();
                self.named(token)?;
            } else {
                self.orphan(token)?;
            }
        }

        Ok(self.staged)
    }

    /// Leading bare tokens belong to the positional parameter.
    fn positional_prefix(&mut self) -> Result<()> {
        if !self.cursor.at_value() {
            return Ok(());
        }

        match self.registry.position("") {
            Some(position) => {
                self.last_bound = Some(position);
                self.bind_values(position)
            }
            None => {
                if let Some(token) = self.cursor.advance() {
                    warn!(token, "no default parameter declared, skipping leading value");
                }
                Ok(())
            }
        }
    }

    fn named(&mut self, token: &str) -> Result<()> {
        let name = flag_name(token);
        if name.is_empty() {
            return Err(ArgError::UnregisteredArgument(token.to_string()));
        }

        let position = self
            .registry
            .position(name)
            .ok_or_else(|| ArgError::UnregisteredArgument(name.to_string()))?;

        self.last_bound = Some(position);
        self.bind_values(position)
    }

    /// A bare token nobody asked for.
    fn orphan(&mut self, token: &str) -> Result<()> {
        if let Some(position) = self.last_bound {
            let registry = self.registry;
            let spec = registry.at(position);
            if !spec.is_array() {
                return Err(ArgError::UnexpectedValue {
                    token: token.to_string(),
                    parameter: spec.label().to_string(),
                });
            }
        }

        trace!(token, "skipping value with no owning parameter");
        self.cursor.advance();
        Ok(())
    }

    fn bind_values(&mut self, position: usize) -> Result<()> {
        let registry = self.registry;
        let spec = registry.at(position);
        let tag = spec.type_tag();

        let value = if tag.is_flag() {
            TypedValue::Bool(true)
        } else if tag.is_array() {
            let tokens = self.cursor.take_values();
            if tokens.is_empty() {
                return Err(ArgError::MissingValue(spec.label().to_string()));
            }
            coerce_array(tokens, tag.kind).map_err(|failure| mismatch(spec, failure))?
        } else {
            if !self.cursor.at_value() {
                return Err(ArgError::MissingValue(spec.label().to_string()));
            }
            let token = self.cursor.advance().unwrap_or_default();
            coerce(token, tag).map_err(|failure| mismatch(spec, failure))?
        };

        self.stage(position, value);
        Ok(())
    }

    fn stage(&mut self, position: usize, value: TypedValue) {
        let registry = self.registry;
        let label = registry.at(position).label();
        debug!(parameter = label, value = ?value, "bound parameter");

        match self.staged.iter_mut().find(|(p, _)| *p == position) {
            Some(slot) => {
                debug!(parameter = label, "parameter repeated, last value wins");
                slot.1 = value;
            }
            None => self.staged.push((position, value)),
        }
    }
}

fn mismatch(spec: &ParameterSpec, failure: CoercionFailure) -> ArgError {
    ArgError::TypeMismatch {
        parameter: spec.label().to_string(),
        token: failure.token,
        expected: spec.type_tag(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{TypeTag, ValueKind};

    fn registry() -> ParameterRegistry {
        let mut registry = ParameterRegistry::new();
        registry.declare_flag("a", "").unwrap();
        registry
            .declare_parameter("name", TypeTag::scalar(ValueKind::String), false, "", "", None)
            .unwrap();
        registry
            .declare_parameter("arr", TypeTag::array(ValueKind::Integer), false, "", "", None)
            .unwrap();
        registry
    }

    #[test]
    fn failed_pass_leaves_nothing_bound() {
        let mut registry = registry();
        let err = registry.bind(&["-a", "-name", "jo", "-arr", "1", "x"], &BindOptions::default());

        assert!(matches!(err, Err(ArgError::TypeMismatch { .. })));
        assert!(registry.iter().all(|p| !p.is_set()));
    }

    #[test]
    fn new_pass_clears_the_previous_one() {
        let mut registry = registry();
        let options = BindOptions::default();
        registry.bind(&["-a", "-name", "jo"], &options).unwrap();
        registry.bind(&["-arr", "1"], &options).unwrap();

        assert!(!registry.lookup("a").unwrap().is_set());
        assert!(!registry.lookup("name").unwrap().is_set());
        assert_eq!(
            registry.lookup("arr").unwrap().value(),
            Some(&TypedValue::IntArray(vec![1]))
        );
    }

    #[test]
    fn repeated_parameters_keep_the_last_value() {
        let mut registry = registry();
        registry
            .bind(&["-name", "first", "-name", "second"], &BindOptions::default())
            .unwrap();

        assert_eq!(
            registry.lookup("name").unwrap().value(),
            Some(&TypedValue::Str("second".into()))
        );
    }

    #[test]
    fn a_lone_delimiter_is_not_a_name() {
        let mut registry = registry();
        registry.declare_default("file", TypeTag::scalar(ValueKind::String)).unwrap();

        let err = registry.bind(&["-", "x"], &BindOptions::default());
        assert_eq!(err, Err(ArgError::UnregisteredArgument("-".into())));
    }

    #[test]
    fn values_after_a_flag_are_unexpected() {
        let mut registry = registry();
        let err = registry.bind(&["-a", "stray"], &BindOptions::default());
        assert_eq!(
            err,
            Err(ArgError::UnexpectedValue {
                token: "stray".into(),
                parameter: "a".into(),
            })
        );
    }

    #[test]
    fn empty_input_binds_nothing() {
        let mut registry = registry();
        let tokens: [&str; 0] = [];
        registry.bind(&tokens, &BindOptions::default()).unwrap();
        assert!(registry.iter().all(|p| !p.is_set()));
    }
}
