//! Provider records and the registry that owns them.

use std::any::Any;
use std::sync::Arc;

use crate::error::{Cause, DiError, DiResult};
use crate::internal::sync::{KeyList, TypeMap};
use crate::key::Key;

/// Type-erased shared instance, as stored in the instance cache.
pub type AnyArc = Arc<dyn Any + Send + Sync>;

/// Why a type-erased constructor call produced no instances.
pub(crate) enum ProviderFailure {
    /// Injection itself went wrong (argument or output did not match its key)
    Di(DiError),
    /// The constructor returned its failure indicator
    Cause(Cause),
}

impl From<DiError> for ProviderFailure {
    fn from(err: DiError) -> Self {
        ProviderFailure::Di(err)
    }
}

/// Type-erased constructor: resolved arguments in, one instance per output out.
pub(crate) type ConstructorFn =
    Box<dyn Fn(Vec<AnyArc>) -> Result<Vec<AnyArc>, ProviderFailure> + Send + Sync>;

/// One registered constructor.
pub(crate) struct Provider {
    /// Constructor's type name, for diagnostics
    pub(crate) name: &'static str,
    /// Input types, in call order
    pub(crate) params: KeyList,
    /// Types this constructor produces, in result order
    pub(crate) outputs: KeyList,
    pub(crate) ctor: ConstructorFn,
}

impl Provider {
    /// Calls the constructor and checks its outputs line up with `outputs`.
    pub(crate) fn construct(&self, args: Vec<AnyArc>) -> Result<Vec<AnyArc>, ProviderFailure> {
        let instances = (self.ctor)(args)?;

        if instances.len() != self.outputs.len() {
            return Err(DiError::TypeMismatch(self.name).into());
        }
        for (key, instance) in self.outputs.iter().zip(&instances) {
            if Any::type_id(&**instance) != key.type_id() {
                return Err(DiError::TypeMismatch(key.display_name()).into());
            }
        }
        Ok(instances)
    }
}

/// Provider registry: every provider in registration order plus a
/// type → provider index.
///
/// Append-only. A key maps to at most one provider; a provider may be
/// reachable from several keys.
#[derive(Default)]
pub(crate) struct Registry {
    providers: Vec<Provider>,
    by_type: TypeMap<usize>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Inserts a provider for all of its outputs, or none of them.
    ///
    /// Fails with [`DiError::NotAConstructor`] if the provider produces
    /// nothing, [`DiError::ResultOutput`] if any output is a `Result`, and
    /// [`DiError::DuplicateProvider`] if any output is already claimed,
    /// either by an earlier provider or by a repeated output of this one.
    pub(crate) fn insert(&mut self, provider: Provider) -> DiResult<usize> {
        if provider.outputs.is_empty() {
            return Err(DiError::NotAConstructor(provider.name));
        }
        if let Some(key) = provider.outputs.iter().find(|key| key.is_result()) {
            return Err(DiError::ResultOutput(key.display_name()));
        }
        for (i, key) in provider.outputs.iter().enumerate() {
            if self.by_type.contains_key(key) || provider.outputs[..i].contains(key) {
                return Err(DiError::DuplicateProvider(key.display_name()));
            }
        }

        let index = self.providers.len();
        for key in provider.outputs.iter() {
            self.by_type.insert(*key, index);
        }
        self.providers.push(provider);
        Ok(index)
    }

    /// Looks up the provider for `key`, with its index.
    #[inline]
    pub(crate) fn get(&self, key: &Key) -> Option<(usize, &Provider)> {
        let index = *self.by_type.get(key)?;
        Some((index, &self.providers[index]))
    }

    /// Provider at a registry index.
    #[inline]
    pub(crate) fn by_index(&self, index: usize) -> Option<&Provider> {
        self.providers.get(index)
    }

    #[inline]
    pub(crate) fn contains_key(&self, key: &Key) -> bool {
        self.by_type.contains_key(key)
    }

    /// Providers in registration order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (usize, &Provider)> {
        self.providers.iter().enumerate()
    }

    pub(crate) fn len(&self) -> usize {
        self.providers.len()
    }
}
