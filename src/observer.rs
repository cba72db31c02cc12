//! Diagnostic observers for resolution events.
//!
//! Observers are notified around every constructor call the resolver makes.
//! Cache hits are not reported: an observer sees each providable type at
//! most once per successful construction.

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use crate::Key;

/// Observer trait for dependency injection resolution events.
///
/// Observer calls are made synchronously while the instance cache is locked.
/// Keep implementations lightweight.
///
/// # Examples
///
/// ```
/// use ferrous_wire::{Container, DiObserver, Key};
/// use std::sync::{Arc, Mutex};
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct Recorder(Mutex<Vec<String>>);
///
/// impl DiObserver for Recorder {
///     fn resolving(&self, key: &Key) {
///         self.0.lock().unwrap().push(format!("start {}", key.short_name()));
///     }
///
///     fn resolved(&self, key: &Key, _duration: Duration) {
///         self.0.lock().unwrap().push(format!("done {}", key.short_name()));
///     }
/// }
///
/// struct Clock;
///
/// let recorder = Arc::new(Recorder::default());
/// let mut container = Container::new();
/// container.add_observer(recorder.clone());
/// container.provide(|| Clock).unwrap();
/// container.invoke(|_: Arc<Clock>| ()).unwrap();
///
/// assert_eq!(*recorder.0.lock().unwrap(), vec!["start Clock", "done Clock"]);
/// ```
pub trait DiObserver: Send + Sync {
    /// Called right before a constructor runs.
    ///
    /// All of the constructor's parameters have been resolved by this point.
    fn resolving(&self, key: &Key);

    /// Called after a constructor succeeded and its outputs were cached.
    ///
    /// `duration` covers the constructor call only, not its dependencies.
    fn resolved(&self, key: &Key, duration: Duration);

    /// Called when a constructor returned its failure indicator.
    fn constructor_failed(&self, key: &Key, error: &(dyn Error + 'static)) {
        let _ = (key, error);
    }
}

/// Container for registered observers.
///
/// Designed to have minimal overhead when no observers are registered.
#[derive(Default, Clone)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn DiObserver>>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&mut self, observer: Arc<dyn DiObserver>) {
        self.observers.push(observer);
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.observers.len()
    }

    #[inline]
    pub(crate) fn resolving(&self, key: &Key) {
        for observer in &self.observers {
            observer.resolving(key);
        }
    }

    #[inline]
    pub(crate) fn resolved(&self, key: &Key, duration: Duration) {
        for observer in &self.observers {
            observer.resolved(key, duration);
        }
    }

    #[inline]
    pub(crate) fn constructor_failed(&self, key: &Key, error: &(dyn Error + 'static)) {
        for observer in &self.observers {
            observer.constructor_failed(key, error);
        }
    }
}

/// Built-in observer that forwards events to `tracing`.
///
/// Events are emitted at `DEBUG` (constructions) and `WARN` (failures) with
/// the observer's prefix as a `source` field, so several containers in one
/// process can be told apart.
///
/// # Examples
///
/// ```
/// use ferrous_wire::{Container, LoggingObserver};
/// use std::sync::Arc;
///
/// let mut container = Container::new();
/// container.add_observer(Arc::new(LoggingObserver::with_prefix("billing")));
/// ```
pub struct LoggingObserver {
    prefix: String,
}

impl LoggingObserver {
    /// Creates a new logging observer with default prefix.
    pub fn new() -> Self {
        Self {
            prefix: "ferrous-wire".to_string(),
        }
    }

    /// Creates a new logging observer with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// The prefix attached to every event.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl DiObserver for LoggingObserver {
    fn resolving(&self, key: &Key) {
        tracing::debug!(source = %self.prefix, type_name = key.display_name(), "constructing");
    }

    fn resolved(&self, key: &Key, duration: Duration) {
        tracing::debug!(
            source = %self.prefix,
            type_name = key.display_name(),
            elapsed_us = duration.as_micros() as u64,
            "constructed"
        );
    }

    fn constructor_failed(&self, key: &Key, error: &(dyn Error + 'static)) {
        tracing::warn!(
            source = %self.prefix,
            type_name = key.display_name(),
            error = %error,
            "constructor failed"
        );
    }
}
