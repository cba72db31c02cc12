//! # ferrous-wire
//!
//! A small, type-driven dependency injection container.
//!
//! Register plain functions as constructors; the container reads what each
//! one needs from its parameter types and what it provides from its return
//! type. Ask for a type (or call a function that takes it) and the container
//! builds the whole dependency chain on demand, once, and shares the result.
//!
//! ## Features
//!
//! - **Signature-driven wiring**: parameters are `Arc<T>`, results are `T`
//! - **Lazy singletons**: every type is constructed at most once per container
//! - **Fallible constructors**: return `Result<T, E>`; `E` is surfaced as the
//!   failure cause and never registered
//! - **Multi-output constructors**: one function can provide a tuple of types
//! - **Cycle detection**: circular dependencies fail with the full path
//! - **Static validation** and **graph export** (DOT, Mermaid, JSON, YAML)
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_wire::Container;
//! use std::sync::Arc;
//!
//! struct Database {
//!     connection_string: String,
//! }
//!
//! struct UserService {
//!     db: Arc<Database>,
//! }
//!
//! let mut container = Container::new();
//! container.provide(|| Database {
//!     connection_string: "postgres://localhost".to_string(),
//! })?;
//! container.provide(|db: Arc<Database>| UserService { db })?;
//!
//! container.invoke(|users: Arc<UserService>| {
//!     assert_eq!(users.db.connection_string, "postgres://localhost");
//! })?;
//! # Ok::<(), ferrous_wire::DiError>(())
//! ```
//!
//! ## Fallible Constructors
//!
//! ```rust
//! use ferrous_wire::{Container, DiError};
//! use std::sync::Arc;
//!
//! struct Settings { port: u16 }
//! struct Server { port: u16 }
//!
//! let mut container = Container::new();
//! container.provide(|| Settings { port: 0 })?;
//! container.try_provide(|s: Arc<Settings>| {
//!     if s.port == 0 {
//!         return Err("port must be set");
//!     }
//!     Ok(Server { port: s.port })
//! })?;
//!
//! let err = container.invoke(|_: Arc<Server>| ()).unwrap_err();
//! assert!(matches!(err, DiError::Constructor { .. }));
//! assert_eq!(err.to_string(), format!(
//!     "Constructor for {} failed: port must be set",
//!     std::any::type_name::<Server>()
//! ));
//! # Ok::<(), DiError>(())
//! ```
//!
//! ## Trait Objects
//!
//! Register the trait object type itself and depend on `Arc<Box<dyn Trait>>`,
//! or wrap it in a newtype:
//!
//! ```rust
//! use ferrous_wire::Container;
//! use std::sync::Arc;
//!
//! trait Logger: Send + Sync {
//!     fn log(&self, message: &str) -> String;
//! }
//!
//! struct ConsoleLogger;
//! impl Logger for ConsoleLogger {
//!     fn log(&self, message: &str) -> String {
//!         format!("[LOG] {}", message)
//!     }
//! }
//!
//! let mut container = Container::new();
//! container.provide(|| Box::new(ConsoleLogger) as Box<dyn Logger>)?;
//!
//! let line = container.invoke(|logger: Arc<Box<dyn Logger>>| logger.log("hi"))?;
//! assert_eq!(line, "[LOG] hi");
//! # Ok::<(), ferrous_wire::DiError>(())
//! ```

pub mod config;
pub mod container;
pub mod dynamic;
pub mod error;
pub mod graph_export;
pub mod key;
pub mod module;
pub mod observer;
pub mod traits;
pub mod validation;

// Internal modules
mod internal;
mod registration;

pub use config::ContainerConfig;
pub use container::Container;
pub use dynamic::{DynCall, DynCallFn, DynConstructor};
pub use error::{BoxError, Cause, DiError, DiResult};
pub use graph_export::{DependencyGraph, GraphEdge, GraphNode};
pub use key::{key_of_type, Key};
pub use module::ProviderModule;
pub use observer::{DiObserver, LoggingObserver};
pub use registration::AnyArc;
pub use traits::{Constructor, Dependency, Injectable, OutputSet};
pub use validation::{ValidationIssue, ValidationReport};
