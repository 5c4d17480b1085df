use thiserror::Error;

use crate::types::DynError;

/// Errors in a partial service declaration, detected at setup time
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeclarationError {
    /// The blueprint has no descriptor for the type to construct
    #[error("Target type must be specified for service '{service}'")]
    TargetUnspecified { service: String },
    /// Neither markers nor declarations defer any parameter
    #[error("No deferred arguments are specified for '{service}'")]
    NoDeferredParameters { service: String },
    /// Declared deferred names which match no constructor parameter
    #[error(
        "Some deferred arguments ({}) do not correspond to any constructor parameters for '{service}'",
        .names.join(", ")
    )]
    UnknownDeferredParameters { service: String, names: Vec<String> },
    /// Two constructor parameters share a name
    #[error("Parameter '{parameter}' is declared twice on '{target}'")]
    DuplicateParameter {
        target: &'static str,
        parameter: String,
    },
    /// A service id has been registered twice
    #[error("Partial service '{0}' has been registered twice")]
    DuplicateService(String),
}

/// All declaration errors found while building a registry
#[derive(Error, Debug, Clone)]
pub struct DeclarationErrors {
    pub errors: Vec<DeclarationError>,
}
impl std::fmt::Display for DeclarationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut display = Vec::new();
        display.push("The partial service declarations had one or more errors:".to_string());
        for error in &self.errors {
            display.push(format!("- {}", error));
        }
        f.write_str(&display.join("\n"))
    }
}
impl From<DeclarationError> for DeclarationErrors {
    fn from(error: DeclarationError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

/// Errors when invoking a partial factory
#[derive(Error, Debug)]
pub enum InvokeError {
    /// Call-time names which are not deferred parameters
    #[error("Unexpected arguments {}", .0.join(", "))]
    UnexpectedArguments(Vec<String>),
    /// Deferred parameters the caller did not supply
    #[error("Missing arguments {}", .0.join(", "))]
    MissingArguments(Vec<String>),
    /// A queued method call names a method the type does not have
    #[error("Call to undefined method {target}::{method}()")]
    UnknownMethod {
        target: &'static str,
        method: String,
    },
    /// A queued method call has fewer arguments than the method requires
    #[error(
        "Too few arguments to {target}::{method}(), {supplied} passed and at least {required} expected"
    )]
    ArgumentCount {
        target: &'static str,
        method: String,
        required: usize,
        supplied: usize,
    },
    /// The constructor failed
    #[error("Constructing '{target}' failed - error: {error}")]
    Construction {
        target: &'static str,
        error: DynError,
    },
    /// A queued method call failed
    #[error("Method {target}::{method}() failed - error: {error}")]
    MethodFailed {
        target: &'static str,
        method: String,
        error: DynError,
    },
}

/// Errors when reading a constructor or method argument
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("Required parameter '{parameter}' was not supplied")]
    Unfilled { parameter: String },
    #[error("Parameter '{parameter}' expects '{expected}' but got '{actual}'")]
    TypeMismatch {
        parameter: String,
        expected: &'static str,
        actual: &'static str,
    },
    #[error("There is no argument at position {0}")]
    OutOfRange(usize),
}

/// Errors when looking up a factory in the registry
#[derive(Error, Debug)]
pub enum RegistryError {
    /// No partial service with that id
    #[error("No partial service is registered as '{0}'")]
    ServiceMissing(String),
    /// The service builds another type than the one required
    #[error("Partial service '{service}' provides '{actual_type}', not '{required_type}'")]
    TypeMismatch {
        service: String,
        required_type: &'static str,
        actual_type: &'static str,
    },
    #[error(transparent)]
    Invoke(#[from] InvokeError),
}
