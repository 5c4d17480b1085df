use std::{collections::HashMap, fmt::Debug, sync::Arc};

use crate::{
    arguments::{ConstructorArgs, MethodArgs},
    types::{DynError, TypeInfo},
};

/// Positional constructor of a service type
pub type Constructor<T> = Arc<dyn Fn(&ConstructorArgs<'_>) -> Result<T, DynError> + Send + Sync>;

/// A method which can be queued on a freshly built instance
pub type MethodFn<T> = Arc<dyn Fn(&mut T, &MethodArgs<'_>) -> Result<(), DynError> + Send + Sync>;

/// A constructor parameter
///
/// The position of a parameter is its index in [ServiceDescriptor::parameters].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    /// The parameter may be left unbound
    pub optional: bool,
    /// Marker deferring this parameter to call time, whatever the blueprint declares
    pub deferred: bool,
}

impl Parameter {
    pub fn new(name: impl Into<String>) -> Self {
        Parameter {
            name: name.into(),
            optional: false,
            deferred: false,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn deferred(mut self) -> Self {
        self.deferred = true;
        self
    }
}

/// Method callable by name on instances of `T`
pub struct Method<T> {
    /// Number of arguments the method needs at least
    pub required: usize,
    pub(crate) call: MethodFn<T>,
}
impl<T> Clone for Method<T> {
    fn clone(&self) -> Self {
        Self {
            required: self.required,
            call: self.call.clone(),
        }
    }
}

/// Hand written description of how to construct a `T`
///
/// Stands in for runtime reflection: it lists the constructor parameters in
/// order, how to build a `T` from positional slots, and which methods may be
/// queued after construction.
///
/// ```rust
/// use partial_di::{Parameter, ServiceDescriptor};
///
/// struct Greeter {
///     greeting: String,
///     name: String,
/// }
///
/// let descriptor = ServiceDescriptor::new(|args| {
///     Ok(Greeter {
///         greeting: args.required(0)?,
///         name: args.required(1)?,
///     })
/// })
/// .parameter(Parameter::new("greeting"))
/// .parameter(Parameter::new("name").deferred())
/// .method("rename", 1, |greeter: &mut Greeter, args| {
///     greeter.name = args.get(0)?;
///     Ok(())
/// });
/// assert_eq!(descriptor.parameters().len(), 2);
/// ```
pub struct ServiceDescriptor<T> {
    target: TypeInfo,
    parameters: Vec<Parameter>,
    constructor: Constructor<T>,
    methods: HashMap<String, Method<T>>,
}
impl<T> Clone for ServiceDescriptor<T> {
    fn clone(&self) -> Self {
        Self {
            target: self.target,
            parameters: self.parameters.clone(),
            constructor: self.constructor.clone(),
            methods: self.methods.clone(),
        }
    }
}
impl<T> Debug for ServiceDescriptor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut methods: Vec<_> = self.methods.keys().collect();
        methods.sort();
        f.debug_struct("ServiceDescriptor")
            .field("target", &self.target.type_name)
            .field("parameters", &self.parameters)
            .field("methods", &methods)
            .finish()
    }
}

impl<T: 'static> ServiceDescriptor<T> {
    pub fn new<F>(constructor: F) -> Self
    where
        F: Fn(&ConstructorArgs<'_>) -> Result<T, DynError> + Send + Sync + 'static,
    {
        Self {
            target: TypeInfo::of::<T>(),
            parameters: Vec::new(),
            constructor: Arc::new(constructor),
            methods: HashMap::new(),
        }
    }

    /// Appends the next constructor parameter
    pub fn parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Registers a method which needs at least `required` arguments
    pub fn method<F>(mut self, name: impl Into<String>, required: usize, call: F) -> Self
    where
        F: Fn(&mut T, &MethodArgs<'_>) -> Result<(), DynError> + Send + Sync + 'static,
    {
        self.methods.insert(
            name.into(),
            Method {
                required,
                call: Arc::new(call),
            },
        );
        self
    }
}

impl<T> ServiceDescriptor<T> {
    pub fn target(&self) -> TypeInfo {
        self.target
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn method_named(&self, name: &str) -> Option<&Method<T>> {
        self.methods.get(name)
    }

    pub(crate) fn construct(&self, args: &ConstructorArgs<'_>) -> Result<T, DynError> {
        (self.constructor)(args)
    }
}
