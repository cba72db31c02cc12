//! One resolution pass over the provider graph.

use std::time::Instant;

use crate::error::{DiError, DiResult};
use crate::internal::sync::{MutexGuard, TypeMap};
use crate::internal::ResolutionStack;
use crate::key::Key;
use crate::observer::Observers;
use crate::registration::{AnyArc, Provider, ProviderFailure, Registry};

use super::Container;

/// State for resolving the parameters of one `invoke` call.
///
/// Holds the cache lock from creation until drop, so every singleton seen or
/// built within the pass is consistent and no other pass can build the same
/// type concurrently.
pub(super) struct Resolution<'c> {
    registry: &'c Registry,
    observers: &'c Observers,
    cache: MutexGuard<'c, TypeMap<AnyArc>>,
    stack: ResolutionStack,
}

impl<'c> Resolution<'c> {
    pub(super) fn new(container: &'c Container) -> Self {
        Self {
            registry: &container.registry,
            observers: &container.observers,
            cache: container.instances.lock(),
            stack: ResolutionStack::new(
                container.config.max_depth,
                container.config.detect_cycles,
            ),
        }
    }

    /// Resolves `keys` in order, stopping at the first failure.
    pub(super) fn resolve_all(&mut self, keys: &[Key]) -> DiResult<Vec<AnyArc>> {
        let mut instances = Vec::with_capacity(keys.len());
        for key in keys {
            instances.push(self.resolve(key)?);
        }
        Ok(instances)
    }

    /// Returns the cached instance for `key`, building it (and whatever it
    /// depends on) on first use.
    pub(super) fn resolve(&mut self, key: &Key) -> DiResult<AnyArc> {
        if let Some(instance) = self.cache.get(key) {
            tracing::trace!(type_name = key.display_name(), "cache hit");
            return Ok(instance.clone());
        }

        let registry = self.registry;
        let (index, provider) = registry
            .get(key)
            .ok_or(DiError::ProviderNotFound(key.display_name()))?;

        self.stack.enter(index, key.display_name())?;
        let built = self.build(key, provider);
        self.stack.leave(index);
        built
    }

    fn build(&mut self, key: &Key, provider: &'c Provider) -> DiResult<AnyArc> {
        let args = self.resolve_all(&provider.params)?;

        self.observers.resolving(key);
        let started = self.observers.has_observers().then(Instant::now);

        let instances = match provider.construct(args) {
            Ok(instances) => instances,
            Err(ProviderFailure::Di(err)) => {
                self.observers.constructor_failed(key, &err);
                tracing::warn!(
                    type_name = key.display_name(),
                    constructor = provider.name,
                    error = %err,
                    "constructor produced mismatched outputs"
                );
                return Err(err);
            }
            Err(ProviderFailure::Cause(cause)) => {
                self.observers.constructor_failed(key, &*cause);
                tracing::warn!(
                    type_name = key.display_name(),
                    constructor = provider.name,
                    error = %cause,
                    "constructor failed"
                );
                return Err(DiError::Constructor {
                    type_name: key.display_name(),
                    cause,
                });
            }
        };
        let elapsed = started.map(|started| started.elapsed());

        for (output, instance) in provider.outputs.iter().zip(instances) {
            self.cache.entry(*output).or_insert(instance);
        }
        if let Some(elapsed) = elapsed {
            self.observers.resolved(key, elapsed);
        }
        tracing::trace!(
            type_name = key.display_name(),
            depth = self.stack.depth(),
            "constructed"
        );

        self.cache
            .get(key)
            .cloned()
            .ok_or(DiError::TypeMismatch(key.display_name()))
    }
}
