//! Partial Config declares which constructor parameters of a service are
//! deferred, without touching the code of the service.
//!
//! Declarations are usually loaded from TOML and merged into the blueprints
//! before they are added to the registry.
//!
//! # Examples
//!
//! ```rust
//! use partial_config::PartialDeclarations;
//! use partial_di::{Arguments, Parameter, PartialRegistry, ServiceBlueprint, ServiceDescriptor};
//!
//! struct Invoice {
//!     customer: String,
//!     currency: String,
//! }
//!
//! let declarations = PartialDeclarations::from_toml_str(
//!     r#"
//!     [services.invoice]
//!     deferred = ["customer"]
//!     "#,
//! )
//! .unwrap();
//!
//! let descriptor = ServiceDescriptor::new(|args| {
//!     Ok(Invoice {
//!         customer: args.required(0)?,
//!         currency: args.required(1)?,
//!     })
//! })
//! .parameter(Parameter::new("customer"))
//! .parameter(Parameter::new("currency"));
//!
//! let blueprint = ServiceBlueprint::new("invoice")
//!     .descriptor(descriptor)
//!     .argument(1, "EUR".to_string());
//!
//! let registry = PartialRegistry::builder()
//!     .add_partial(declarations.apply(blueprint))
//!     .build()
//!     .unwrap();
//!
//! let invoice = registry
//!     .invoke::<Invoice>("invoice", Arguments::new().with("customer", "ACME".to_string()))
//!     .unwrap();
//! assert_eq!(invoice.customer, "ACME");
//! assert_eq!(invoice.currency, "EUR");
//! ```
//!
//! Partial Config consists of the following components:
//!
//! 1. Declarations - the registry of declared deferred parameters, loading and merging
//! 2. Errors - for config errors

pub mod declarations;
pub mod errors;

pub use declarations::{PartialDeclarations, ServiceDeclaration};
pub use errors::ConfigError;
