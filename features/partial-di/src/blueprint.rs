use std::{collections::BTreeMap, fmt::Debug};

use indexmap::IndexSet;

use crate::{
    descriptor::ServiceDescriptor,
    types::{Injectable, Value},
};

/// A method call replayed on every new instance
#[derive(Debug, Clone)]
pub struct MethodCall {
    pub method: String,
    pub arguments: Vec<Value>,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, arguments: Vec<Value>) -> Self {
        MethodCall {
            method: method.into(),
            arguments,
        }
    }
}

/// Setup time record of a partial service
///
/// Produced by whatever discovers services, consumed once by
/// [crate::extractor::extract].
pub struct ServiceBlueprint<T> {
    /// Service identifier, used as registry key and in error messages
    pub id: String,
    /// How to build the target type - `None` is a declaration error
    pub descriptor: Option<ServiceDescriptor<T>>,
    /// Parameter names explicitly declared deferred, in declaration order
    pub declared_deferred: IndexSet<String>,
    /// Arguments bound at setup time, keyed by constructor position
    pub positional_arguments: BTreeMap<usize, Value>,
    pub method_calls: Vec<MethodCall>,
    pub tags: Vec<String>,
}
impl<T> Debug for ServiceBlueprint<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceBlueprint")
            .field("id", &self.id)
            .field("descriptor", &self.descriptor)
            .field("declared_deferred", &self.declared_deferred)
            .field("positional_arguments", &self.positional_arguments)
            .field("method_calls", &self.method_calls)
            .field("tags", &self.tags)
            .finish()
    }
}

impl<T> ServiceBlueprint<T> {
    pub fn new(id: impl Into<String>) -> Self {
        ServiceBlueprint {
            id: id.into(),
            descriptor: None,
            declared_deferred: IndexSet::new(),
            positional_arguments: BTreeMap::new(),
            method_calls: Vec::new(),
            tags: Vec::new(),
        }
    }

    pub fn descriptor(mut self, descriptor: ServiceDescriptor<T>) -> Self {
        self.descriptor = Some(descriptor);
        self
    }

    /// Declares a parameter deferred to call time
    pub fn defer(mut self, name: impl Into<String>) -> Self {
        self.declared_deferred.insert(name.into());
        self
    }

    pub fn defer_all<N: Into<String>>(mut self, names: impl IntoIterator<Item = N>) -> Self {
        self.declared_deferred
            .extend(names.into_iter().map(Into::into));
        self
    }

    /// Binds the constructor parameter at `position`
    pub fn argument<V: Injectable>(self, position: usize, value: V) -> Self {
        self.argument_value(position, Value::new(value))
    }

    pub fn argument_value(mut self, position: usize, value: Value) -> Self {
        self.positional_arguments.insert(position, value);
        self
    }

    /// Binds values to positions `0..`, replacing earlier bindings at those positions
    pub fn arguments(mut self, values: impl IntoIterator<Item = Value>) -> Self {
        for (position, value) in values.into_iter().enumerate() {
            self.positional_arguments.insert(position, value);
        }
        self
    }

    /// Queues a method call applied after construction
    pub fn call(mut self, method: impl Into<String>, arguments: Vec<Value>) -> Self {
        self.method_calls.push(MethodCall::new(method, arguments));
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }
}
