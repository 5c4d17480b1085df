use std::{
    any::{Any, TypeId},
    fmt::Debug,
    sync::Arc,
};

/// Errors raised by user supplied constructors and methods
pub type DynError = Box<dyn std::error::Error + Send + Sync>;

/// Factories are shared between threads, so anything flowing through them
/// needs to be Send + Sync + 'static
pub trait Injectable: Send + Sync + 'static {}
impl<T: Send + Sync + 'static> Injectable for T {}

/// Type Name and Type Id
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct TypeInfo {
    pub type_name: &'static str,
    pub type_id: TypeId,
}
impl std::fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name)
    }
}
impl TypeInfo {
    pub fn of<T: 'static + ?Sized>() -> TypeInfo {
        TypeInfo {
            type_name: std::any::type_name::<T>(),
            type_id: TypeId::of::<T>(),
        }
    }
}

/// A dynamically typed argument value
///
/// Values are bound once at setup time and shared by every invocation of a
/// factory, reading one therefore clones the stored value.
/// `Value::none()` stands for an explicit null passed to an optional parameter.
#[derive(Clone)]
pub struct Value {
    inner: Option<(TypeInfo, Arc<dyn Any + Send + Sync>)>,
}
impl Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.inner {
            Some((info, _)) => f.debug_tuple("Value").field(&info.type_name).finish(),
            None => f.write_str("Value(none)"),
        }
    }
}

impl Value {
    /// Wraps `value`, passing an existing `Value` through unchanged
    pub fn new<T: Injectable>(value: T) -> Self {
        let value: Arc<dyn Any + Send + Sync> = Arc::new(value);
        match value.downcast::<Value>() {
            Ok(nested) => Arc::unwrap_or_clone(nested),
            Err(value) => Value {
                inner: Some((TypeInfo::of::<T>(), value)),
            },
        }
    }

    pub fn none() -> Self {
        Value { inner: None }
    }

    pub fn is_none(&self) -> bool {
        self.inner.is_none()
    }

    /// Type of the stored value, `None` for a null value
    pub fn type_info(&self) -> Option<TypeInfo> {
        self.inner.as_ref().map(|(info, _)| *info)
    }

    /// Clones the stored value out if it is a `T`
    ///
    /// Returns the actual type name on mismatch, or "none" for a null value
    pub fn get<T: Injectable + Clone>(&self) -> Result<T, &'static str> {
        match &self.inner {
            Some((info, value)) => value.downcast_ref::<T>().cloned().ok_or(info.type_name),
            None => Err("none"),
        }
    }
}

/// Type erased instance produced by a factory
#[derive(Clone)]
pub struct Instance {
    pub info: TypeInfo,
    pub instance: Arc<dyn Any + Send + Sync + 'static>,
}
impl Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Instance")
            .field("type", &self.info.type_name)
            .finish()
    }
}

impl Instance {
    pub(crate) fn new<Produced: Injectable>(instance: Produced) -> Self {
        Instance {
            info: TypeInfo::of::<Produced>(),
            instance: Arc::new(instance),
        }
    }

    pub fn downcast<T: Injectable>(&self) -> Result<Arc<T>, &'static str> {
        match Arc::downcast::<T>(self.instance.clone()) {
            Ok(downcasted) => Ok(downcasted),
            Err(_) => Err(self.info.type_name),
        }
    }
}
