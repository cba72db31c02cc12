//! Error types for the dependency injection container.

use std::error::Error;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use thiserror::Error;

/// Boxed error accepted from fallible constructors.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Shared failure payload carried by [`DiError::Constructor`].
///
/// Derefs to the constructor's original error, so `downcast_ref` reaches the
/// concrete type. Cloning shares the same error value.
///
/// ```rust
/// use ferrous_wire::Cause;
///
/// let cause = Cause::new(std::fmt::Error);
/// assert!(cause.downcast_ref::<std::fmt::Error>().is_some());
/// ```
#[derive(Clone)]
pub struct Cause(Arc<dyn Error + Send + Sync + 'static>);

impl Cause {
    /// Wraps a constructor error.
    pub fn new(error: impl Into<BoxError>) -> Self {
        Cause(Arc::from(error.into()))
    }
}

impl From<BoxError> for Cause {
    fn from(error: BoxError) -> Self {
        Cause(Arc::from(error))
    }
}

impl Deref for Cause {
    type Target = dyn Error + Send + Sync + 'static;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

impl fmt::Debug for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}

/// Dependency injection errors
///
/// Represents the error conditions that can occur while registering
/// constructors or resolving a dependency graph.
///
/// # Examples
///
/// ```rust
/// use ferrous_wire::{Container, DiError};
/// use std::sync::Arc;
///
/// struct Config;
///
/// let container = Container::new();
/// match container.invoke(|_: Arc<Config>| ()) {
///     Err(DiError::ProviderNotFound(type_name)) => {
///         assert!(type_name.ends_with("Config"));
///     }
///     _ => unreachable!(),
/// }
/// ```
///
/// ```rust
/// use ferrous_wire::DiError;
///
/// let circular = DiError::Circular(vec!["ServiceA", "ServiceB", "ServiceA"]);
/// assert_eq!(
///     circular.to_string(),
///     "Circular dependency: ServiceA -> ServiceB -> ServiceA"
/// );
/// ```
#[derive(Debug, Clone, Error)]
pub enum DiError {
    /// A value handed to the container as a constructor or target is not invocable
    #[error("Not a constructor: {0}")]
    NotAConstructor(&'static str),
    /// Another constructor already provides this type
    #[error("Duplicate provider for: {0}")]
    DuplicateProvider(&'static str),
    /// A constructor declared a `Result` as something it provides
    #[error("Result cannot be provided: {0} (register fallible constructors with try_provide)")]
    ResultOutput(&'static str),
    /// No constructor is registered for this type
    #[error("Provider not found: {0}")]
    ProviderNotFound(&'static str),
    /// The constructor for `type_name` returned its failure indicator
    #[error("Constructor for {type_name} failed: {cause}")]
    Constructor {
        /// Type whose resolution triggered the failing constructor
        type_name: &'static str,
        /// The constructor's error, unchanged
        #[source]
        cause: Cause,
    },
    /// Circular dependency detected (includes path)
    #[error("Circular dependency: {}", .0.join(" -> "))]
    Circular(Vec<&'static str>),
    /// Maximum recursion depth exceeded
    #[error("Max depth {0} exceeded")]
    DepthExceeded(usize),
    /// A type-erased value did not have the declared type
    #[error("Type mismatch for: {0}")]
    TypeMismatch(&'static str),
    /// Configuration value could not be parsed
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    /// Dependency graph could not be serialized
    #[error("Graph export failed: {0}")]
    Export(String),
}

impl DiError {
    /// Builds a [`DiError::Constructor`] from any constructor error.
    pub fn constructor(type_name: &'static str, cause: impl Into<BoxError>) -> Self {
        DiError::Constructor {
            type_name,
            cause: Cause::new(cause),
        }
    }

    /// Returns the type name this error refers to, when it names one.
    pub fn type_name(&self) -> Option<&'static str> {
        match self {
            DiError::NotAConstructor(name)
            | DiError::DuplicateProvider(name)
            | DiError::ProviderNotFound(name)
            | DiError::ResultOutput(name)
            | DiError::TypeMismatch(name) => Some(*name),
            DiError::Constructor { type_name, .. } => Some(*type_name),
            _ => None,
        }
    }
}

/// Result type for DI operations
///
/// A convenience type alias for `Result<T, DiError>` used throughout ferrous-wire.
///
/// # Examples
///
/// ```rust
/// use ferrous_wire::{DiResult, DiError};
///
/// fn failing_operation() -> DiResult<()> {
///     Err(DiError::ProviderNotFound("some_service"))
/// }
///
/// assert!(failing_operation().is_err());
/// ```
pub type DiResult<T> = Result<T, DiError>;
