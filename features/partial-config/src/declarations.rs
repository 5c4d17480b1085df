use std::collections::BTreeMap;

use partial_di::ServiceBlueprint;
use serde::Deserialize;

use crate::errors::ConfigError;

/// Declaration of a single partial service
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceDeclaration {
    /// Constructor parameters supplied at call time
    #[serde(default)]
    pub deferred: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A registry of partial service declarations, keyed by service id.
///
/// Declarations are merged into blueprints with [PartialDeclarations::apply].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartialDeclarations {
    #[serde(default)]
    services: BTreeMap<String, ServiceDeclaration>,
}

impl PartialDeclarations {
    /// Initializes an empty set of declarations
    pub fn initialize() -> Self {
        Self::default()
    }

    /// Parses declarations of the form
    ///
    /// ```toml
    /// [services.report]
    /// deferred = ["title"]
    /// tags = ["reporting"]
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let declarations: Self = toml::from_str(source)?;
        tracing::debug!(
            "Loaded {} partial service declarations",
            declarations.services.len()
        );
        Ok(declarations)
    }

    /// Adds a declaration.
    ///
    /// If the service is already declared, it will return a
    /// [`ConfigError::AlreadyDeclared`] error
    pub fn add_declaration<N: Into<String>>(
        &mut self,
        id: impl Into<String>,
        deferred: impl IntoIterator<Item = N>,
    ) -> Result<&mut Self, ConfigError> {
        let id = id.into();
        if self.services.contains_key(&id) {
            return Err(ConfigError::AlreadyDeclared(id));
        }

        self.services.insert(
            id,
            ServiceDeclaration {
                deferred: deferred.into_iter().map(Into::into).collect(),
                tags: Vec::new(),
            },
        );
        Ok(self)
    }

    pub fn get(&self, id: &str) -> Option<&ServiceDeclaration> {
        self.services.get(id)
    }

    /// Names declared deferred for the service, if it is declared at all
    pub fn deferred_for(&self, id: &str) -> Option<&[String]> {
        self.services.get(id).map(|d| d.deferred.as_slice())
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.services.keys().map(String::as_str)
    }

    /// Adds the declared deferred names and tags of the blueprint's service
    ///
    /// Blueprints without a declaration are returned unchanged.
    pub fn apply<T>(&self, blueprint: ServiceBlueprint<T>) -> ServiceBlueprint<T> {
        let Some(declaration) = self.services.get(&blueprint.id) else {
            return blueprint;
        };

        let mut blueprint = blueprint.defer_all(declaration.deferred.iter().cloned());
        blueprint.tags.extend(declaration.tags.iter().cloned());
        blueprint
    }
}
