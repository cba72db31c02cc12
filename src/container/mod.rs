//! The container: provider registration, invocation and singleton resolution.
//!
//! A [`Container`] owns the provider registry and the instance cache.
//! Registration takes `&mut self`; resolution takes `&self` and serializes on
//! the cache lock for the duration of one resolution pass.

use std::any::type_name;
use std::fmt;
use std::sync::Arc;

use crate::config::ContainerConfig;
use crate::dynamic::{DynCallFn, DynConstructor};
use crate::error::{BoxError, Cause, DiError, DiResult};
use crate::graph_export::DependencyGraph;
use crate::internal::sync::TypeMap;
use crate::internal::Mutex;
use crate::key::{key_of_type, Key};
use crate::module::ProviderModule;
use crate::observer::{DiObserver, LoggingObserver, Observers};
use crate::registration::{AnyArc, ConstructorFn, Provider, ProviderFailure, Registry};
use crate::traits::{Constructor, Injectable, OutputSet};
use crate::validation::{self, ValidationReport};

mod resolver;

use resolver::Resolution;

/// Dependency injection container.
///
/// Holds one constructor per providable type and at most one instance per
/// type. Instances are built lazily, the first time something asks for them,
/// and shared from then on.
///
/// # Thread Safety
///
/// `Container` is `Send + Sync`. Any number of threads may call
/// [`invoke`](Self::invoke) and [`resolve`](Self::resolve) concurrently; a
/// constructor runs at most once per successful resolution of its type.
/// Constructors run while the instance cache is locked and must not call
/// back into the same container. Targets passed to `invoke` run after the
/// lock is released and may.
///
/// # Examples
///
/// ```
/// use ferrous_wire::Container;
/// use std::sync::Arc;
///
/// struct Config { url: String }
/// struct Database { url: String }
/// struct UserService { db: Arc<Database> }
///
/// let mut container = Container::new();
/// container
///     .provide(|| Config { url: "postgres://localhost".to_string() })?
///     .provide(|config: Arc<Config>| Database { url: config.url.clone() })?
///     .provide(|db: Arc<Database>| UserService { db })?;
///
/// let url = container.invoke(|users: Arc<UserService>| users.db.url.clone())?;
/// assert_eq!(url, "postgres://localhost");
/// # Ok::<(), ferrous_wire::DiError>(())
/// ```
pub struct Container {
    registry: Registry,
    instances: Mutex<TypeMap<AnyArc>>,
    observers: Observers,
    config: ContainerConfig,
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Container {
    /// Creates an empty container with default settings.
    pub fn new() -> Self {
        Self::with_config(ContainerConfig::default())
    }

    /// Creates an empty container with the given settings.
    pub fn with_config(config: ContainerConfig) -> Self {
        let mut observers = Observers::new();
        if config.trace_resolution {
            observers.add(Arc::new(LoggingObserver::new()));
        }

        Self {
            registry: Registry::new(),
            instances: Mutex::new(TypeMap::default()),
            observers,
            config,
        }
    }

    /// Creates an empty container configured from the environment.
    ///
    /// See [`ContainerConfig::from_env`].
    pub fn from_env() -> DiResult<Self> {
        Ok(Self::with_config(ContainerConfig::from_env()?))
    }

    /// The settings this container was created with.
    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// Registers an infallible constructor for its return type.
    ///
    /// The constructor is not called here. Its parameters need not be
    /// providable yet; they are looked up when the return type is first
    /// resolved.
    ///
    /// # Errors
    ///
    /// [`DiError::DuplicateProvider`] if the return type already has a
    /// provider. [`DiError::ResultOutput`] if the return type is a `Result`;
    /// fallible constructors go through [`try_provide`](Self::try_provide).
    /// The registry is left unchanged.
    pub fn provide<F, Args>(&mut self, constructor: F) -> DiResult<&mut Self>
    where
        F: Constructor<Args>,
        F::Output: Send + Sync + 'static,
    {
        let ctor: ConstructorFn = Box::new(
            move |args: Vec<AnyArc>| -> Result<Vec<AnyArc>, ProviderFailure> {
                let value = constructor.construct(args)?;
                Ok(vec![Arc::new(value) as AnyArc])
            },
        );

        self.register(
            type_name::<F>(),
            F::dependencies(),
            vec![key_of_type::<F::Output>()],
            ctor,
        )
    }

    /// Registers a fallible constructor for `T`.
    ///
    /// The `Err` side is the failure indicator: it is never registered as a
    /// providable type, and when it is returned the resolution fails with
    /// [`DiError::Constructor`] carrying it as the cause. Nothing is cached
    /// for a failed call, so a later resolution runs the constructor again.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrous_wire::{Container, DiError};
    /// use std::sync::Arc;
    ///
    /// struct Port(u16);
    ///
    /// let mut container = Container::new();
    /// container.try_provide(|| "eighty".parse::<u16>().map(Port))?;
    ///
    /// match container.resolve::<Port>() {
    ///     Err(DiError::Constructor { cause, .. }) => {
    ///         assert!(cause.downcast_ref::<std::num::ParseIntError>().is_some());
    ///     }
    ///     _ => unreachable!(),
    /// }
    /// # Ok::<(), DiError>(())
    /// ```
    pub fn try_provide<F, Args, T, E>(&mut self, constructor: F) -> DiResult<&mut Self>
    where
        F: Constructor<Args, Output = Result<T, E>>,
        T: Send + Sync + 'static,
        E: Into<BoxError> + 'static,
    {
        let ctor: ConstructorFn = Box::new(
            move |args: Vec<AnyArc>| -> Result<Vec<AnyArc>, ProviderFailure> {
                match constructor.construct(args)? {
                    Ok(value) => Ok(vec![Arc::new(value) as AnyArc]),
                    Err(e) => Err(ProviderFailure::Cause(Cause::new(e))),
                }
            },
        );

        self.register(
            type_name::<F>(),
            F::dependencies(),
            vec![key_of_type::<T>()],
            ctor,
        )
    }

    /// Registers a constructor returning a tuple; every element type becomes
    /// providable through this one constructor.
    ///
    /// Resolving any of the element types runs the constructor once and
    /// caches all of its results.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrous_wire::Container;
    /// use std::sync::Arc;
    ///
    /// struct Reader(u8);
    /// struct Writer(u8);
    ///
    /// let mut container = Container::new();
    /// container.provide_many(|| (Reader(1), Writer(2)))?;
    ///
    /// let sum = container.invoke(|r: Arc<Reader>, w: Arc<Writer>| r.0 + w.0)?;
    /// assert_eq!(sum, 3);
    /// # Ok::<(), ferrous_wire::DiError>(())
    /// ```
    pub fn provide_many<F, Args>(&mut self, constructor: F) -> DiResult<&mut Self>
    where
        F: Constructor<Args>,
        F::Output: OutputSet,
    {
        let ctor: ConstructorFn = Box::new(
            move |args: Vec<AnyArc>| -> Result<Vec<AnyArc>, ProviderFailure> {
                Ok(constructor.construct(args)?.into_instances())
            },
        );

        self.register(
            type_name::<F>(),
            F::dependencies(),
            <F::Output as OutputSet>::keys(),
            ctor,
        )
    }

    /// Fallible form of [`provide_many`](Self::provide_many).
    pub fn try_provide_many<F, Args, O, E>(&mut self, constructor: F) -> DiResult<&mut Self>
    where
        F: Constructor<Args, Output = Result<O, E>>,
        O: OutputSet,
        E: Into<BoxError> + 'static,
    {
        let ctor: ConstructorFn = Box::new(
            move |args: Vec<AnyArc>| -> Result<Vec<AnyArc>, ProviderFailure> {
                match constructor.construct(args)? {
                    Ok(values) => Ok(values.into_instances()),
                    Err(e) => Err(ProviderFailure::Cause(Cause::new(e))),
                }
            },
        );

        self.register(type_name::<F>(), F::dependencies(), O::keys(), ctor)
    }

    /// Registers a constructor described by explicit type metadata.
    ///
    /// # Errors
    ///
    /// [`DiError::NotAConstructor`] if the descriptor carries no callable,
    /// checked before anything else, or declares no outputs.
    /// [`DiError::DuplicateProvider`] and [`DiError::ResultOutput`] as for
    /// [`provide`](Self::provide).
    pub fn register_dynamic(&mut self, constructor: DynConstructor) -> DiResult<&mut Self> {
        let parts = constructor.into_parts()?;
        let call = parts.call;
        let ctor: ConstructorFn = Box::new(
            move |args: Vec<AnyArc>| -> Result<Vec<AnyArc>, ProviderFailure> {
                call(args).map_err(|e| ProviderFailure::Cause(Cause::from(e)))
            },
        );

        self.register(parts.name, parts.inputs, parts.outputs, ctor)
    }

    /// Installs every provider a module registers.
    ///
    /// Stops at the first failing registration; providers the module
    /// registered before it stay registered.
    pub fn install<M: ProviderModule>(&mut self, module: M) -> DiResult<&mut Self> {
        tracing::debug!(module = type_name::<M>(), "installing module");
        module.register(self)?;
        Ok(self)
    }

    /// Adds an observer notified around every constructor call.
    pub fn add_observer(&mut self, observer: Arc<dyn DiObserver>) -> &mut Self {
        self.observers.add(observer);
        self
    }

    fn register(
        &mut self,
        name: &'static str,
        params: Vec<Key>,
        outputs: Vec<Key>,
        ctor: ConstructorFn,
    ) -> DiResult<&mut Self> {
        let provider = Provider {
            name,
            params: params.into_iter().collect(),
            outputs: outputs.into_iter().collect(),
            ctor,
        };

        match self.registry.insert(provider) {
            Ok(index) => {
                tracing::debug!(constructor = name, index, "registered provider");
                Ok(self)
            }
            Err(err) => {
                tracing::debug!(constructor = name, error = %err, "registration rejected");
                Err(err)
            }
        }
    }

    /// Resolves every parameter of `target`, then calls it and returns what
    /// it returns.
    ///
    /// Parameters are resolved left to right; the first failure aborts the
    /// call and `target` is not run. Singletons built before the failure stay
    /// cached.
    ///
    /// # Errors
    ///
    /// - [`DiError::ProviderNotFound`] for a type with no provider, direct or
    ///   transitive
    /// - [`DiError::Constructor`] when a fallible constructor fails
    /// - [`DiError::Circular`] / [`DiError::DepthExceeded`] for dependency
    ///   cycles
    pub fn invoke<F, Args>(&self, target: F) -> DiResult<F::Output>
    where
        F: Injectable<Args>,
    {
        let args = self.resolve_keys(&F::dependencies())?;
        target.call_once(args)
    }

    /// Resolves a single type.
    ///
    /// ```
    /// use ferrous_wire::Container;
    /// use std::sync::Arc;
    ///
    /// let mut container = Container::new();
    /// container.provide(|| 7u32)?;
    ///
    /// let a = container.resolve::<u32>()?;
    /// let b = container.resolve::<u32>()?;
    /// assert!(Arc::ptr_eq(&a, &b));
    /// # Ok::<(), ferrous_wire::DiError>(())
    /// ```
    pub fn resolve<T: Send + Sync + 'static>(&self) -> DiResult<Arc<T>> {
        self.invoke(|instance: Arc<T>| instance)
    }

    /// Invokes a target described by explicit type metadata.
    ///
    /// Returns the target's results, checked against its declared outputs.
    /// Results are handed back, not cached.
    pub fn invoke_dynamic(&self, target: DynConstructor) -> DiResult<Vec<AnyArc>> {
        let parts = target.into_parts()?;
        let args = self.resolve_keys(&parts.inputs)?;

        let call: DynCallFn = parts.call;
        let checked = Provider {
            name: parts.name,
            params: parts.inputs.into_iter().collect(),
            outputs: parts.outputs.into_iter().collect(),
            ctor: Box::new(move |args: Vec<AnyArc>| -> Result<Vec<AnyArc>, ProviderFailure> {
                call(args).map_err(|e| ProviderFailure::Cause(Cause::from(e)))
            }),
        };

        checked.construct(args).map_err(|failure| match failure {
            ProviderFailure::Di(err) => err,
            ProviderFailure::Cause(cause) => DiError::Constructor {
                type_name: parts.name,
                cause,
            },
        })
    }

    fn resolve_keys(&self, keys: &[Key]) -> DiResult<Vec<AnyArc>> {
        let mut resolution = Resolution::new(self);
        resolution.resolve_all(keys)
    }

    /// Whether a provider is registered for `T`.
    pub fn contains<T: 'static>(&self) -> bool {
        self.registry.contains_key(&key_of_type::<T>())
    }

    /// Whether an instance of `T` has been built and cached.
    pub fn is_cached<T: 'static>(&self) -> bool {
        self.instances.lock().contains_key(&key_of_type::<T>())
    }

    /// Number of registered constructors.
    pub fn provider_count(&self) -> usize {
        self.registry.len()
    }

    /// Number of cached instances.
    pub fn cached_count(&self) -> usize {
        self.instances.lock().len()
    }

    /// Checks the registered providers without running any of them.
    ///
    /// Reports every parameter type that has no provider and every cycle
    /// among providers. A clean report means no resolution can fail with
    /// [`DiError::ProviderNotFound`] or [`DiError::Circular`].
    pub fn validate(&self) -> ValidationReport {
        validation::validate(&self.registry)
    }

    /// Snapshot of the providers, their dependencies and what is cached.
    pub fn dependency_graph(&self) -> DependencyGraph {
        let cache = self.instances.lock();
        DependencyGraph::build(&self.registry, &cache)
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("providers", &self.provider_count())
            .field("cached", &self.cached_count())
            .field("observers", &self.observers.len())
            .field("config", &self.config)
            .finish()
    }
}
