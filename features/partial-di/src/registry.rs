use std::{any::type_name, fmt::Debug, sync::Arc};

use indexmap::{IndexMap, IndexSet};

use crate::{
    arguments::Arguments,
    blueprint::ServiceBlueprint,
    errors::{DeclarationError, DeclarationErrors, RegistryError},
    extractor::extract,
    factory::{DynPartialFactory, PartialFactory},
    types::{Injectable, Instance},
};

/// A blueprint waiting for extraction, with its target type erased
trait PendingService {
    fn id(&self) -> &str;

    fn extract(self: Box<Self>) -> Result<Arc<dyn DynPartialFactory>, DeclarationError>;
}
impl<T: Injectable> PendingService for ServiceBlueprint<T> {
    fn id(&self) -> &str {
        &self.id
    }

    fn extract(self: Box<Self>) -> Result<Arc<dyn DynPartialFactory>, DeclarationError> {
        let factory = extract(*self)?;
        Ok(Arc::new(factory))
    }
}

/// Collects partial service blueprints for the composition root
pub struct PartialRegistryBuilder {
    pending: Vec<Box<dyn PendingService>>,
}
impl Default for PartialRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialRegistryBuilder {
    pub fn new() -> Self {
        PartialRegistryBuilder {
            pending: Vec::new(),
        }
    }

    pub fn add_partial<T: Injectable>(mut self, blueprint: ServiceBlueprint<T>) -> Self {
        self.pending.push(Box::new(blueprint));
        self
    }

    /// Extracts every blueprint
    ///
    /// Returns all declaration errors at once, no registry is built if any occurred.
    pub fn build(self) -> Result<PartialRegistry, DeclarationErrors> {
        tracing::debug!("Building partial registry with {} services", self.pending.len());

        let mut factories: IndexMap<String, Arc<dyn DynPartialFactory>> = IndexMap::new();
        let mut seen = IndexSet::new();
        let mut errors = Vec::new();
        for pending in self.pending {
            let id = pending.id().to_string();
            if !seen.insert(id.clone()) {
                errors.push(DeclarationError::DuplicateService(id));
                continue;
            }

            match pending.extract() {
                Ok(factory) => {
                    factories.insert(id, factory);
                }
                Err(error) => {
                    tracing::error!("Partial service '{}' rejected: {}", id, error);
                    errors.push(error);
                }
            }
        }

        if !errors.is_empty() {
            return Err(DeclarationErrors { errors });
        }

        Ok(PartialRegistry(Arc::new(PartialRegistryInner { factories })))
    }
}

/// Registry of all partial factories, owned by the composition root
///
/// Cloning is cheap, clones share the same factories.
#[derive(Clone)]
pub struct PartialRegistry(Arc<PartialRegistryInner>);
struct PartialRegistryInner {
    factories: IndexMap<String, Arc<dyn DynPartialFactory>>,
}
impl Debug for PartialRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_struct("PartialRegistry");
        for (id, factory) in &self.0.factories {
            map.field(id, &factory.supplies().type_name);
        }
        map.finish()
    }
}

impl PartialRegistry {
    pub fn builder() -> PartialRegistryBuilder {
        PartialRegistryBuilder::new()
    }

    /// Type erased factory registered under `id`
    pub fn get(&self, id: &str) -> Option<&dyn DynPartialFactory> {
        self.0.factories.get(id).map(|factory| factory.as_ref())
    }

    /// Attempts to get the factory registered under `id` as a factory of `T`
    pub fn factory<T: Injectable>(&self, id: &str) -> Result<PartialFactory<T>, RegistryError> {
        let Some(factory) = self.get(id) else {
            tracing::error!("Tried to require an unregistered partial service: {}", id);
            return Err(RegistryError::ServiceMissing(id.to_string()));
        };

        factory
            .as_any()
            .downcast_ref::<PartialFactory<T>>()
            .cloned()
            .ok_or_else(|| RegistryError::TypeMismatch {
                service: id.to_string(),
                required_type: type_name::<T>(),
                actual_type: factory.supplies().type_name,
            })
    }

    pub fn invoke<T: Injectable>(&self, id: &str, args: Arguments) -> Result<T, RegistryError> {
        Ok(self.factory::<T>(id)?.invoke(args)?)
    }

    pub fn invoke_dyn(&self, id: &str, args: Arguments) -> Result<Instance, RegistryError> {
        let factory = self
            .get(id)
            .ok_or_else(|| RegistryError::ServiceMissing(id.to_string()))?;
        Ok(factory.invoke_dyn(args)?)
    }

    /// Ids of all services carrying `tag`, in registration order
    pub fn tagged(&self, tag: &str) -> Vec<&str> {
        self.0
            .factories
            .iter()
            .filter(|(_, factory)| factory.tags().iter().any(|t| t == tag))
            .map(|(id, _)| id.as_str())
            .collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.factories.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.0.factories.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.factories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        descriptor::{Parameter, ServiceDescriptor},
        errors::InvokeError,
    };

    #[derive(Debug, Clone, PartialEq)]
    struct Greeting(String);

    fn greeting(id: &str) -> ServiceBlueprint<Greeting> {
        let descriptor = ServiceDescriptor::new(|args| {
            let salutation: String = args.required(0)?;
            let name: String = args.required(1)?;
            Ok(Greeting(format!("{salutation} {name}")))
        })
        .parameter(Parameter::new("salutation"))
        .parameter(Parameter::new("name"));

        ServiceBlueprint::new(id)
            .descriptor(descriptor)
            .defer("name")
            .argument(0, "Hello".to_string())
    }

    #[test]
    fn resolves_typed_factory() {
        let registry = PartialRegistry::builder()
            .add_partial(greeting("greeting").tag("text"))
            .build()
            .unwrap();

        let factory = registry.factory::<Greeting>("greeting").unwrap();
        let greeting = factory
            .invoke(Arguments::new().with("name", "Ada".to_string()))
            .unwrap();
        assert_eq!(greeting, Greeting("Hello Ada".to_string()));
        assert_eq!(registry.tagged("text"), vec!["greeting"]);
        assert!(registry.tagged("other").is_empty());
    }

    #[test]
    fn invoke_dyn_through_registry() {
        let registry = PartialRegistry::builder()
            .add_partial(greeting("greeting"))
            .build()
            .unwrap();

        let instance = registry
            .invoke_dyn("greeting", Arguments::new().with("name", "Bob".to_string()))
            .unwrap();
        assert_eq!(
            *instance.downcast::<Greeting>().unwrap(),
            Greeting("Hello Bob".to_string())
        );
    }

    #[test]
    fn lookup_errors() {
        let registry = PartialRegistry::builder()
            .add_partial(greeting("greeting"))
            .build()
            .unwrap();

        assert!(matches!(
            registry.factory::<Greeting>("nope"),
            Err(RegistryError::ServiceMissing(id)) if id == "nope"
        ));
        assert!(matches!(
            registry.factory::<String>("greeting"),
            Err(RegistryError::TypeMismatch { .. })
        ));
        assert!(matches!(
            registry.invoke::<Greeting>("greeting", Arguments::new()),
            Err(RegistryError::Invoke(InvokeError::MissingArguments(_)))
        ));
    }

    #[test]
    fn build_reports_all_declaration_errors() {
        let errors = PartialRegistry::builder()
            .add_partial(greeting("greeting"))
            .add_partial(greeting("greeting"))
            .add_partial(greeting("broken").defer("missing"))
            .add_partial(ServiceBlueprint::<Greeting>::new("untyped").defer("name"))
            .build()
            .unwrap_err();

        assert_eq!(
            errors.errors,
            vec![
                DeclarationError::DuplicateService("greeting".to_string()),
                DeclarationError::UnknownDeferredParameters {
                    service: "broken".to_string(),
                    names: vec!["missing".to_string()],
                },
                DeclarationError::TargetUnspecified {
                    service: "untyped".to_string()
                },
            ]
        );
    }

    #[test]
    fn duplicate_of_a_rejected_service_is_still_reported() {
        let errors = PartialRegistry::builder()
            .add_partial(greeting("greeting").defer("bogus"))
            .add_partial(greeting("greeting"))
            .build()
            .unwrap_err();

        assert_eq!(
            errors.errors,
            vec![
                DeclarationError::UnknownDeferredParameters {
                    service: "greeting".to_string(),
                    names: vec!["bogus".to_string()],
                },
                DeclarationError::DuplicateService("greeting".to_string()),
            ]
        );
    }

    #[test]
    fn registry_is_listed_in_registration_order() {
        let registry = PartialRegistry::builder()
            .add_partial(greeting("b"))
            .add_partial(greeting("a"))
            .build()
            .unwrap();
        assert_eq!(registry.ids().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("a"));
        assert!(format!("{registry:?}").contains("Greeting"));
    }
}
