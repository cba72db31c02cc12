//! Constructors described by explicit type metadata.
//!
//! The typed API ([`Container::provide`](crate::Container::provide) and
//! friends) reads parameter and result types off the function signature.
//! [`DynConstructor`] is the escape hatch for values assembled at runtime:
//! plugin tables, scripted wiring, code generators. The caller declares the
//! inputs and outputs and supplies a type-erased callable.

use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

use crate::error::{BoxError, DiError, DiResult};
use crate::key::{key_of_type, Key};
use crate::registration::AnyArc;

/// Type-erased callable: resolved inputs in, one instance per declared output
/// out.
pub type DynCallFn = Arc<dyn Fn(Vec<AnyArc>) -> Result<Vec<AnyArc>, BoxError> + Send + Sync>;

/// Wrapper that marks an opaque value as invocable.
///
/// [`DynConstructor::call_any`] accepts any boxed value and only treats it as
/// a callable if it is a `DynCall`.
#[derive(Clone)]
pub struct DynCall(pub DynCallFn);

impl DynCall {
    /// Wraps a closure.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Vec<AnyArc>) -> Result<Vec<AnyArc>, BoxError> + Send + Sync + 'static,
    {
        DynCall(Arc::new(f))
    }
}

/// Builder for a constructor whose signature is given explicitly.
///
/// # Examples
///
/// ```
/// use ferrous_wire::{AnyArc, Container, DynConstructor};
/// use std::sync::Arc;
///
/// struct Greeting(String);
///
/// let mut container = Container::new();
/// container.provide(|| String::from("hello"))?;
/// container.register_dynamic(
///     DynConstructor::named("greeting")
///         .input::<String>()
///         .output::<Greeting>()
///         .call(|args| {
///             let word = args[0].clone().downcast::<String>().map_err(|_| "not a String")?;
///             Ok(vec![Arc::new(Greeting(format!("{}!", word))) as AnyArc])
///         }),
/// )?;
///
/// assert_eq!(container.resolve::<Greeting>()?.0, "hello!");
/// # Ok::<(), ferrous_wire::DiError>(())
/// ```
pub struct DynConstructor {
    name: &'static str,
    inputs: Vec<Key>,
    outputs: Vec<Key>,
    call: Option<DynCallFn>,
    rejected: Option<&'static str>,
}

/// Validated pieces of a [`DynConstructor`].
pub(crate) struct DynParts {
    pub(crate) name: &'static str,
    pub(crate) inputs: Vec<Key>,
    pub(crate) outputs: Vec<Key>,
    pub(crate) call: DynCallFn,
}

impl DynConstructor {
    /// Starts an empty descriptor.
    pub fn new() -> Self {
        Self::named("dynamic constructor")
    }

    /// Starts an empty descriptor with a diagnostic name.
    pub fn named(name: &'static str) -> Self {
        Self {
            name,
            inputs: Vec::new(),
            outputs: Vec::new(),
            call: None,
            rejected: None,
        }
    }

    /// Appends a parameter of type `T`; the callable receives it as an
    /// `Arc<T>` inside an [`AnyArc`].
    pub fn input<T: Send + Sync + 'static>(mut self) -> Self {
        self.inputs.push(key_of_type::<T>());
        self
    }

    /// Appends a result of type `T`.
    pub fn output<T: Send + Sync + 'static>(mut self) -> Self {
        self.outputs.push(key_of_type::<T>());
        self
    }

    /// Sets the callable.
    pub fn call<F>(mut self, f: F) -> Self
    where
        F: Fn(Vec<AnyArc>) -> Result<Vec<AnyArc>, BoxError> + Send + Sync + 'static,
    {
        self.call = Some(Arc::new(f));
        self.rejected = None;
        self
    }

    /// Sets the callable from an opaque value.
    ///
    /// Only a boxed [`DynCall`] counts as invocable. Anything else is
    /// remembered and reported as [`DiError::NotAConstructor`] when the
    /// descriptor is used.
    ///
    /// ```
    /// use ferrous_wire::{Container, DiError, DynConstructor};
    ///
    /// let mut container = Container::new();
    /// let err = container
    ///     .register_dynamic(DynConstructor::new().output::<u8>().call_any(Box::new(42i32)))
    ///     .unwrap_err();
    ///
    /// assert!(matches!(err, DiError::NotAConstructor(_)));
    /// assert_eq!(container.provider_count(), 0);
    /// ```
    pub fn call_any(mut self, value: Box<dyn Any + Send + Sync>) -> Self {
        match value.downcast::<DynCall>() {
            Ok(call) => {
                self.call = Some(call.0);
                self.rejected = None;
            }
            Err(_) => {
                self.call = None;
                self.rejected = Some(type_name::<Box<dyn Any + Send + Sync>>());
            }
        }
        self
    }

    /// Diagnostic name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared parameter keys, in order.
    pub fn inputs(&self) -> &[Key] {
        &self.inputs
    }

    /// Declared result keys, in order.
    pub fn outputs(&self) -> &[Key] {
        &self.outputs
    }

    /// Whether a callable has been set.
    pub fn is_callable(&self) -> bool {
        self.call.is_some()
    }

    pub(crate) fn into_parts(self) -> DiResult<DynParts> {
        let call = match self.call {
            Some(call) => call,
            None => return Err(DiError::NotAConstructor(self.rejected.unwrap_or(self.name))),
        };

        Ok(DynParts {
            name: self.name,
            inputs: self.inputs,
            outputs: self.outputs,
            call,
        })
    }
}

impl Default for DynConstructor {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DynConstructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynConstructor")
            .field("name", &self.name)
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .field("callable", &self.call.is_some())
            .finish()
    }
}
