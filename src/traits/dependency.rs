//! Parameter types the container knows how to supply.

use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::key::{key_of_type, Key};
use crate::registration::AnyArc;

/// A constructor or target parameter the container can materialize.
///
/// Implemented for `Arc<T>`: the container hands out shared handles to its
/// cached singletons, so every consumer of `T` sees the same instance.
///
/// # Examples
///
/// ```
/// use ferrous_wire::{Dependency, key_of_type};
/// use std::sync::Arc;
///
/// struct Database;
///
/// assert_eq!(<Arc<Database> as Dependency>::key(), key_of_type::<Database>());
/// ```
pub trait Dependency: Sized {
    /// Key of the providable type behind this parameter.
    fn key() -> Key;

    /// Recovers the parameter from a cached instance.
    fn from_instance(instance: AnyArc) -> DiResult<Self>;
}

impl<T: Send + Sync + 'static> Dependency for Arc<T> {
    #[inline]
    fn key() -> Key {
        key_of_type::<T>()
    }

    #[inline]
    fn from_instance(instance: AnyArc) -> DiResult<Self> {
        instance
            .downcast::<T>()
            .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>()))
    }
}
