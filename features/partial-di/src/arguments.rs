use std::collections::BTreeMap;

use crate::{
    descriptor::Parameter,
    errors::ArgumentError,
    types::{Injectable, Value},
};

/// Call-time arguments, keyed by parameter name
///
/// Names iterate in sorted order so error messages stay deterministic.
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    values: BTreeMap<String, Value>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a named argument, replacing any earlier value with the same name
    pub fn with<T: Injectable>(self, name: impl Into<String>, value: T) -> Self {
        self.with_value(name, Value::new(value))
    }

    pub fn with_value(mut self, name: impl Into<String>, value: Value) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.values.insert(name.into(), value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn into_values(self) -> BTreeMap<String, Value> {
        self.values
    }
}

impl<N: Into<String>> FromIterator<(N, Value)> for Arguments {
    fn from_iter<I: IntoIterator<Item = (N, Value)>>(iter: I) -> Self {
        Arguments {
            values: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }
}

/// Constructor arguments laid out by parameter position
///
/// Built per invocation from the merged eager and call-time arguments.
/// A slot is empty when nothing was bound for that parameter.
pub struct ConstructorArgs<'a> {
    parameters: &'a [Parameter],
    slots: Vec<Option<Value>>,
}

impl<'a> ConstructorArgs<'a> {
    pub(crate) fn new(parameters: &'a [Parameter], slots: Vec<Option<Value>>) -> Self {
        debug_assert_eq!(parameters.len(), slots.len());
        Self { parameters, slots }
    }

    /// Raw slot at `position`
    pub fn value(&self, position: usize) -> Option<&Value> {
        self.slots.get(position).and_then(Option::as_ref)
    }

    /// Reads a parameter which must be bound
    ///
    /// An explicit `Value::none()` is a type mismatch here, use
    /// [ConstructorArgs::optional] for nullable parameters.
    pub fn required<T: Injectable + Clone>(&self, position: usize) -> Result<T, ArgumentError> {
        let parameter = self.parameter(position)?;
        match self.value(position) {
            Some(value) => read(&parameter.name, value),
            None => Err(ArgumentError::Unfilled {
                parameter: parameter.name.clone(),
            }),
        }
    }

    /// Reads a parameter which may be unbound or null
    pub fn optional<T: Injectable + Clone>(
        &self,
        position: usize,
    ) -> Result<Option<T>, ArgumentError> {
        let parameter = self.parameter(position)?;
        match self.value(position) {
            Some(value) if !value.is_none() => read(&parameter.name, value).map(Some),
            _ => Ok(None),
        }
    }

    /// Reads a parameter which must be bound, but may be bound to null
    pub fn nullable<T: Injectable + Clone>(
        &self,
        position: usize,
    ) -> Result<Option<T>, ArgumentError> {
        let parameter = self.parameter(position)?;
        match self.value(position) {
            Some(value) if value.is_none() => Ok(None),
            Some(value) => read(&parameter.name, value).map(Some),
            None => Err(ArgumentError::Unfilled {
                parameter: parameter.name.clone(),
            }),
        }
    }

    fn parameter(&self, position: usize) -> Result<&Parameter, ArgumentError> {
        self.parameters
            .get(position)
            .ok_or(ArgumentError::OutOfRange(position))
    }
}

/// Recorded arguments of a queued method call
pub struct MethodArgs<'a> {
    method: &'a str,
    values: &'a [Value],
}

impl<'a> MethodArgs<'a> {
    pub(crate) fn new(method: &'a str, values: &'a [Value]) -> Self {
        Self { method, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get<T: Injectable + Clone>(&self, position: usize) -> Result<T, ArgumentError> {
        let value = self
            .values
            .get(position)
            .ok_or(ArgumentError::OutOfRange(position))?;
        read(&format!("{}#{}", self.method, position), value)
    }
}

fn read<T: Injectable + Clone>(parameter: &str, value: &Value) -> Result<T, ArgumentError> {
    value
        .get::<T>()
        .map_err(|actual| ArgumentError::TypeMismatch {
            parameter: parameter.to_string(),
            expected: std::any::type_name::<T>(),
            actual,
        })
}
