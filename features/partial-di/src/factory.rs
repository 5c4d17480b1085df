use std::{any::Any, collections::HashMap, fmt::Debug, sync::Arc};

use indexmap::{IndexMap, IndexSet};

use crate::{
    arguments::{Arguments, ConstructorArgs, MethodArgs},
    blueprint::MethodCall,
    descriptor::ServiceDescriptor,
    errors::InvokeError,
    types::{Injectable, Instance, TypeInfo, Value},
};

/// Method name reported when the constructor itself lacks arguments
pub const CONSTRUCTOR: &str = "new";

/// Everything a factory is made of, assembled by the extractor
pub(crate) struct FactoryParts<T> {
    pub service: String,
    pub descriptor: ServiceDescriptor<T>,
    pub deferred: IndexSet<String>,
    pub eager: IndexMap<String, Value>,
    pub positions: HashMap<String, usize>,
    pub method_calls: Vec<MethodCall>,
    pub tags: Vec<String>,
}

/// Builds instances of `T` once the deferred parameters are known
///
/// Immutable after setup. Cloning is cheap and every clone shares the same
/// metadata, so a factory can be handed to any number of threads.
/// Each invocation produces a new instance, nothing is cached.
pub struct PartialFactory<T>(Arc<FactoryParts<T>>);
impl<T> Clone for PartialFactory<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}
impl<T> Debug for PartialFactory<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PartialFactory")
            .field("service", &self.0.service)
            .field("target", &self.0.descriptor.target().type_name)
            .field("deferred", &self.0.deferred)
            .field("eager", &self.0.eager)
            .field("method_calls", &self.0.method_calls)
            .finish()
    }
}

impl<T> PartialFactory<T> {
    pub(crate) fn new(parts: FactoryParts<T>) -> Self {
        debug_assert!(!parts.deferred.is_empty(), "factory without deferred parameters");
        debug_assert!(
            parts.eager.keys().all(|name| !parts.deferred.contains(name)),
            "eager and deferred parameters overlap"
        );
        Self(Arc::new(parts))
    }

    pub fn service(&self) -> &str {
        &self.0.service
    }

    pub fn target(&self) -> TypeInfo {
        self.0.descriptor.target()
    }

    /// Names which every invocation must supply
    pub fn deferred_parameters(&self) -> impl Iterator<Item = &str> {
        self.0.deferred.iter().map(String::as_str)
    }

    pub fn eager_arguments(&self) -> &IndexMap<String, Value> {
        &self.0.eager
    }

    pub fn method_calls(&self) -> &[MethodCall] {
        &self.0.method_calls
    }

    pub fn tags(&self) -> &[String] {
        &self.0.tags
    }

    /// Builds a new instance from the deferred arguments, then replays the queued method calls
    ///
    /// `args` must name exactly the deferred parameters. A failing method call
    /// aborts the invocation, calls before it have already been applied to the
    /// discarded instance.
    pub fn invoke(&self, args: Arguments) -> Result<T, InvokeError> {
        let parts = &*self.0;
        let target = parts.descriptor.target().type_name;

        let extra: Vec<String> = args
            .names()
            .filter(|name| !parts.deferred.contains(*name))
            .map(ToString::to_string)
            .collect();
        if !extra.is_empty() {
            return Err(InvokeError::UnexpectedArguments(extra));
        }

        let missing: Vec<String> = parts
            .deferred
            .iter()
            .filter(|name| !args.contains(name))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(InvokeError::MissingArguments(missing));
        }

        tracing::trace!("Invoking partial factory '{}' for {}", parts.service, target);

        // Eager first, call-time layered on top - the names never overlap
        let parameters = parts.descriptor.parameters();
        let mut slots: Vec<Option<Value>> = vec![None; parameters.len()];
        for (name, value) in &parts.eager {
            if let Some(&position) = parts.positions.get(name) {
                slots[position] = Some(value.clone());
            }
        }
        for (name, value) in args.into_values() {
            if let Some(&position) = parts.positions.get(&name) {
                slots[position] = Some(value);
            }
        }

        let required = parameters.iter().filter(|p| !p.optional).count();
        let supplied = parameters
            .iter()
            .zip(&slots)
            .filter(|(p, slot)| !p.optional && slot.is_some())
            .count();
        if supplied < required {
            return Err(InvokeError::ArgumentCount {
                target,
                method: CONSTRUCTOR.to_string(),
                required,
                supplied,
            });
        }

        let mut instance = parts
            .descriptor
            .construct(&ConstructorArgs::new(parameters, slots))
            .map_err(|error| InvokeError::Construction { target, error })?;

        for call in &parts.method_calls {
            let method = parts.descriptor.method_named(&call.method).ok_or_else(|| {
                InvokeError::UnknownMethod {
                    target,
                    method: call.method.clone(),
                }
            })?;

            if call.arguments.len() < method.required {
                return Err(InvokeError::ArgumentCount {
                    target,
                    method: call.method.clone(),
                    required: method.required,
                    supplied: call.arguments.len(),
                });
            }

            tracing::trace!("Calling {}::{}()", target, call.method);
            (method.call)(&mut instance, &MethodArgs::new(&call.method, &call.arguments)).map_err(
                |error| InvokeError::MethodFailed {
                    target,
                    method: call.method.clone(),
                    error,
                },
            )?;
        }

        Ok(instance)
    }
}

/// Object safe view of a [PartialFactory], used to keep factories of different types together
pub trait DynPartialFactory: Send + Sync {
    fn service(&self) -> &str;

    /// Type the factory produces
    fn supplies(&self) -> TypeInfo;

    fn deferred_parameters(&self) -> Vec<&str>;

    fn tags(&self) -> &[String];

    /// Invokes the factory, returning the instance type erased
    fn invoke_dyn(&self, args: Arguments) -> Result<Instance, InvokeError>;

    fn as_any(&self) -> &dyn Any;
}
// Impl DynPartialFactory for any PartialFactory
impl<T: Injectable> DynPartialFactory for PartialFactory<T> {
    fn service(&self) -> &str {
        PartialFactory::service(self)
    }

    fn supplies(&self) -> TypeInfo {
        self.target()
    }

    fn deferred_parameters(&self) -> Vec<&str> {
        PartialFactory::deferred_parameters(self).collect()
    }

    fn tags(&self) -> &[String] {
        PartialFactory::tags(self)
    }

    fn invoke_dyn(&self, args: Arguments) -> Result<Instance, InvokeError> {
        self.invoke(args).map(Instance::new)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
