//! # attrkit
//!
//! Declarative record classes: declare a class as an ordered list of named
//! attributes, and get an initializer, a readable representation, equality,
//! ordering and hashing for free, plus validation of field values.
//!
//! Classes are declared at runtime with a builder rather than with Rust
//! structs. Field values are dynamic [`Value`]s, and every built [`Class`]
//! carries its ordered [`Attribute`] descriptors so helpers can introspect it.
//!
//! ```
//! use attrkit::{asdict, assoc, attr, validators::instance_of, ClassBuilder, Type, Value};
//!
//! let point = ClassBuilder::new("Point")
//!     .attr("x", attr().validator(instance_of(Type::Int)))
//!     .attr("y", attr().default(0))
//!     .build()?;
//!
//! let p = point.call([1])?;
//! assert_eq!(p.to_string(), "Point(x=1, y=0)");
//!
//! let q = assoc(&p, [("y", 2)])?;
//! assert!(p < q);
//! assert_eq!(asdict(&q).as_map().unwrap()["y"], Value::Int(2));
//! # Ok::<(), attrkit::AttrsError>(())
//! ```
//!
//! ## Layout
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Helpers (api.rs)                                            │
//! │  fields, has, asdict, assoc, validate, make_class            │
//! └──────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Classes (class.rs, instance.rs)                             │
//! │  ClassBuilder -> Class -> Instance, generated behavior       │
//! └──────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Descriptors (attribute.rs, validators.rs, options.rs)       │
//! │  Attribute, Factory, Validator, ClassOptions                 │
//! └──────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Values (value.rs, types.rs)                                 │
//! │  Value, Type, Interface                                      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Errors
//!
//! Every fallible operation returns [`Result`]. Usage errors (bad arguments,
//! unknown attributes, invalid declarations) and validation failures share
//! the [`AttrsError`] type; validation failures carry a structured
//! [`validators::ValidationError`].
//!
//! ## Logging
//!
//! The crate emits `tracing` events (class builds at `debug`, construction and
//! validation passes at `trace`) and never installs a subscriber.
//!
//! ## Module Overview
//!
//! - [`attribute`]: attribute descriptors and the `attr()` builder
//! - [`class`]: class declaration and construction
//! - [`instance`]: instances and their generated behavior
//! - [`validators`]: the `Validator` trait and stock validators
//! - [`options`]: generation options, serde-loadable
//! - [`value`] / [`types`]: runtime values, types and interfaces
//! - [`api`]: helper functions
//! - [`error`]: error types

pub mod api;
pub mod attribute;
pub mod class;
pub mod error;
pub mod instance;
pub mod options;
pub mod types;
pub mod validators;
pub mod value;

pub use api::{
    asdict, asdict_with, assoc, fields, has, make_class, make_class_with, validate, ClassFields,
};
pub use attribute::{attr, Attribute, AttributeBuilder, DefaultValue, Factory};
pub use class::{Args, Class, ClassBuilder};
pub use error::{AttrsError, Result};
pub use instance::Instance;
pub use options::{AsDictOptions, ClassOptions};
pub use types::{Interface, Type};
pub use value::Value;
