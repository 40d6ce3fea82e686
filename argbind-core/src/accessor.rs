//! Typed retrieval of bound values.
//!
//! Every Rust type a parameter can hold implements [`ParameterType`], which
//! ties it to exactly one [`TypeTag`]. Reads by name check the requested tag
//! against the declaration at runtime; reads through a [`Param`] handle are
//! checked by the compiler because the handle was created by a typed
//! declaration.

use std::marker::PhantomData;

use chrono::NaiveDateTime;
use serde_json::{Map, Value};

use crate::error::{ArgError, Result};
use crate::registry::{ParameterRegistry, ParameterSpec, POSITIONAL_KEY};
use crate::value::{TypeTag, TypedValue, ValueKind};

/// A Rust type that can be stored in a parameter.
pub trait ParameterType: Sized + Default {
    const TAG: TypeTag;

    /// Copy the value out of a matching variant.
    fn from_value(value: &TypedValue) -> Option<Self>;

    fn into_value(self) -> TypedValue;
}

macro_rules! parameter_type {
    ($ty:ty, $tag:expr, $variant:ident) => {
        impl ParameterType for $ty {
            const TAG: TypeTag = $tag;

            fn from_value(value: &TypedValue) -> Option<Self> {
                match value {
                    TypedValue::$variant(inner) => Some(inner.clone()),
                    _ => None,
                }
            }

            fn into_value(self) -> TypedValue {
                TypedValue::$variant(self)
            }
        }
    };
}

parameter_type!(bool, TypeTag::scalar(ValueKind::Boolean), Bool);
parameter_type!(i64, TypeTag::scalar(ValueKind::Integer), Int);
parameter_type!(Vec<i64>, TypeTag::array(ValueKind::Integer), IntArray);
parameter_type!(f64, TypeTag::scalar(ValueKind::Float), Float);
parameter_type!(Vec<f64>, TypeTag::array(ValueKind::Float), FloatArray);
parameter_type!(String, TypeTag::scalar(ValueKind::String), Str);
parameter_type!(Vec<String>, TypeTag::array(ValueKind::String), StrArray);
parameter_type!(NaiveDateTime, TypeTag::scalar(ValueKind::DateTime), DateTime);
parameter_type!(
    Vec<NaiveDateTime>,
    TypeTag::array(ValueKind::DateTime),
    DateTimeArray
);

/// Handle returned by a typed declaration. It is only valid for the
/// registry that issued it (or a clone of it).
#[derive(Debug)]
pub struct Param<T> {
    registry: u64,
    position: usize,
    _type: PhantomData<fn() -> T>,
}

impl<T> Clone for Param<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Param<T> {}

fn resolve<T: ParameterType>(spec: &ParameterSpec) -> T {
    spec.effective_value()
        .and_then(T::from_value)
        .unwrap_or_default()
}

impl ParameterRegistry {
    /// Declare a parameter whose type is given by `T`.
    pub fn declare_typed<T: ParameterType>(&mut self, spec: ParameterSpec) -> Result<Param<T>> {
        if spec.type_tag() != T::TAG {
            return Err(ArgError::Configuration(format!(
                "Parameter '{}' declared as {} through a {} handle",
                spec.label(),
                spec.type_tag(),
                T::TAG
            )));
        }
        let position = self.insert(spec)?;
        Ok(Param {
            registry: self.id(),
            position,
            _type: PhantomData,
        })
    }

    /// Shorthand for an optional parameter of type `T`.
    pub fn declare_as<T: ParameterType>(&mut self, name: &str) -> Result<Param<T>> {
        self.declare_typed(ParameterSpec::new(name, T::TAG))
    }

    /// Read a parameter by name.
    ///
    /// Unset parameters yield their declared default, or `T::default()`.
    pub fn get_value<T: ParameterType>(&self, name: &str) -> Result<T> {
        let spec = self.lookup(name)?;
        if spec.type_tag() != T::TAG {
            return Err(ArgError::TypeRequestMismatch {
                parameter: spec.label().to_string(),
                declared: spec.type_tag(),
                requested: T::TAG,
            });
        }
        Ok(resolve(spec))
    }

    /// Read a parameter through its typed handle.
    ///
    /// Fails with [`ArgError::ForeignHandle`] when the handle was issued by
    /// another registry.
    pub fn value_of<T: ParameterType>(&self, param: Param<T>) -> Result<T> {
        if param.registry != self.id() {
            return Err(ArgError::ForeignHandle);
        }
        // a clone may have been extended after the handle's declaration
        self.try_at(param.position)
            .map(resolve::<T>)
            .ok_or(ArgError::ForeignHandle)
    }

    pub fn is_set(&self, name: &str) -> Result<bool> {
        self.lookup(name).map(ParameterSpec::is_set)
    }

    /// Raw bound value, without default fallback.
    pub fn value(&self, name: &str) -> Result<Option<&TypedValue>> {
        self.lookup(name).map(ParameterSpec::value)
    }

    /// Effective value of every parameter as a JSON object. The positional
    /// parameter is keyed [`POSITIONAL_KEY`]; parameters with neither a bound
    /// nor a default value map to `null`.
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for spec in self.iter() {
            let key = if spec.is_positional() { POSITIONAL_KEY } else { spec.name() };
            let value = spec
                .effective_value()
                .and_then(|v| serde_json::to_value(v).ok())
                .unwrap_or(Value::Null);
            map.insert(key.to_string(), value);
        }
        Value::Object(map)
    }
}
