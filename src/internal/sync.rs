//! Lock and map primitives selected by cargo feature.

#[cfg(not(feature = "parking-lot"))]
use std::sync::PoisonError;

use std::collections::HashMap;

use crate::key::Key;

/// Map keyed by providable type.
#[cfg(feature = "ahash")]
pub(crate) type TypeMap<V> = HashMap<Key, V, ahash::RandomState>;
#[cfg(not(feature = "ahash"))]
pub(crate) type TypeMap<V> = HashMap<Key, V>;

/// Ordered list of keys, inline for the common small arities.
#[cfg(feature = "smallvec")]
pub(crate) type KeyList = smallvec::SmallVec<[Key; 4]>;
#[cfg(not(feature = "smallvec"))]
pub(crate) type KeyList = Vec<Key>;

#[cfg(feature = "parking-lot")]
pub(crate) use parking_lot::{Mutex, MutexGuard};

#[cfg(not(feature = "parking-lot"))]
pub(crate) type MutexGuard<'a, T> = std::sync::MutexGuard<'a, T>;

/// `std` mutex that recovers from poisoning.
///
/// The instance cache is only written after a constructor returns, so a
/// panic mid-resolution never leaves it half-updated.
#[cfg(not(feature = "parking-lot"))]
#[derive(Default)]
pub(crate) struct Mutex<T>(std::sync::Mutex<T>);

#[cfg(not(feature = "parking-lot"))]
impl<T> Mutex<T> {
    pub(crate) fn new(value: T) -> Self {
        Self(std::sync::Mutex::new(value))
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, T> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
