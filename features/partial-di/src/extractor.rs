//! Binding extraction
//!
//! Splits the constructor parameters of a blueprint into eager arguments, bound
//! now, and deferred parameters, supplied on every invocation. Runs once per
//! service at setup time.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::{
    blueprint::ServiceBlueprint,
    errors::DeclarationError,
    factory::{FactoryParts, PartialFactory},
};

/// Validates a blueprint and turns it into a [PartialFactory]
///
/// A parameter is deferred when it carries the deferred marker or its name is
/// declared on the blueprint. Declarations win over positional bindings, so a
/// deferred parameter never ends up among the eager arguments.
pub fn extract<T: 'static>(
    blueprint: ServiceBlueprint<T>,
) -> Result<PartialFactory<T>, DeclarationError> {
    let ServiceBlueprint {
        id,
        descriptor,
        declared_deferred,
        mut positional_arguments,
        method_calls,
        tags,
    } = blueprint;

    let Some(descriptor) = descriptor else {
        return Err(DeclarationError::TargetUnspecified { service: id });
    };
    let parameters = descriptor.parameters();

    // Name -> position adapter shared by every invocation
    let mut positions = HashMap::with_capacity(parameters.len());
    for (position, parameter) in parameters.iter().enumerate() {
        if positions.insert(parameter.name.clone(), position).is_some() {
            return Err(DeclarationError::DuplicateParameter {
                target: descriptor.target().type_name,
                parameter: parameter.name.clone(),
            });
        }
    }

    // Declared name -> found on the constructor
    let mut tracked: IndexMap<String, bool> = declared_deferred
        .into_iter()
        .map(|name| (name, false))
        .collect();
    let mut eager = IndexMap::new();

    for (position, parameter) in parameters.iter().enumerate() {
        if parameter.deferred || tracked.contains_key(&parameter.name) {
            tracked.insert(parameter.name.clone(), true);
            if positional_arguments.remove(&position).is_some() {
                tracing::debug!(
                    "Positional argument of deferred parameter '{}' ignored for '{}'",
                    parameter.name,
                    id
                );
            }
            continue;
        }

        if let Some(value) = positional_arguments.remove(&position) {
            eager.insert(parameter.name.clone(), value);
        }
    }

    for position in positional_arguments.keys() {
        tracing::warn!(
            "Argument at position {position} of '{id}' matches no constructor parameter of {} and is dropped",
            descriptor.target()
        );
    }

    if tracked.is_empty() {
        return Err(DeclarationError::NoDeferredParameters { service: id });
    }

    let unmatched: Vec<String> = tracked
        .iter()
        .filter(|(_, found)| !**found)
        .map(|(name, _)| name.clone())
        .collect();
    if !unmatched.is_empty() {
        return Err(DeclarationError::UnknownDeferredParameters {
            service: id,
            names: unmatched,
        });
    }

    tracing::debug!(
        "Extracted partial service '{}' for {} - {} deferred, {} eager, {} method calls",
        id,
        descriptor.target(),
        tracked.len(),
        eager.len(),
        method_calls.len()
    );

    Ok(PartialFactory::new(FactoryParts {
        service: id,
        descriptor,
        deferred: tracked.into_keys().collect(),
        eager,
        positions,
        method_calls,
        tags,
    }))
}
