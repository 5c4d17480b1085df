//! Partial services for dependency injection.
//!
//! Some services need constructor arguments which are only known when the
//! service is actually needed - a request id, a user supplied name. Instead of
//! an instance, the registry then holds a [PartialFactory]: every eager
//! argument is bound at setup time, the deferred ones are supplied per call.
//!
//! The crate consists of three parts:
//! 1. [ServiceBlueprint] and [ServiceDescriptor], describing a service at setup time
//! 2. [extract], validating a blueprint into a [PartialFactory]
//! 3. [PartialRegistry], holding the factories of the application
//!
//! ```rust
//! use partial_di::{Arguments, Parameter, PartialRegistry, ServiceBlueprint, ServiceDescriptor};
//!
//! struct Report {
//!     title: String,
//!     pages: u32,
//! }
//!
//! let descriptor = ServiceDescriptor::new(|args| {
//!     Ok(Report {
//!         title: args.required(0)?,
//!         pages: args.required(1)?,
//!     })
//! })
//! .parameter(Parameter::new("title").deferred())
//! .parameter(Parameter::new("pages"));
//!
//! let registry = PartialRegistry::builder()
//!     .add_partial(ServiceBlueprint::new("report").descriptor(descriptor).argument(1, 12_u32))
//!     .build()
//!     .unwrap();
//!
//! let report = registry
//!     .invoke::<Report>("report", Arguments::new().with("title", "Q3".to_string()))
//!     .unwrap();
//! assert_eq!(report.title, "Q3");
//! assert_eq!(report.pages, 12);
//! ```

pub mod arguments;
pub mod blueprint;
pub mod descriptor;
pub mod errors;
pub mod extractor;
pub mod factory;
pub mod registry;
pub mod types;

pub use arguments::{Arguments, ConstructorArgs, MethodArgs};
pub use blueprint::{MethodCall, ServiceBlueprint};
pub use descriptor::{Parameter, ServiceDescriptor};
pub use errors::{ArgumentError, DeclarationError, DeclarationErrors, InvokeError, RegistryError};
pub use extractor::extract;
pub use factory::{DynPartialFactory, PartialFactory};
pub use registry::{PartialRegistry, PartialRegistryBuilder};
pub use types::{DynError, Injectable, Instance, TypeInfo, Value};
