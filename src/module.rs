//! Grouping registrations into reusable modules.

use crate::{Container, DiResult};

/// A bundle of providers that can be installed into a [`Container`].
///
/// # Example
///
/// ```rust
/// use ferrous_wire::{Container, DiResult, ProviderModule};
/// use std::sync::Arc;
///
/// struct UserConfig;
/// struct UserService { _config: Arc<UserConfig> }
///
/// struct UserModule;
///
/// impl ProviderModule for UserModule {
///     fn register(self, container: &mut Container) -> DiResult<()> {
///         container
///             .provide(|| UserConfig)?
///             .provide(|config: Arc<UserConfig>| UserService { _config: config })?;
///         Ok(())
///     }
/// }
///
/// # fn main() -> DiResult<()> {
/// let mut container = Container::new();
/// container.install(UserModule)?;
/// assert!(container.contains::<UserService>());
/// # Ok(())
/// # }
/// ```
pub trait ProviderModule {
    /// Registers this module's providers.
    fn register(self, container: &mut Container) -> DiResult<()>;
}

/// Any `FnOnce(&mut Container) -> DiResult<()>` is a module.
impl<F> ProviderModule for F
where
    F: FnOnce(&mut Container) -> DiResult<()>,
{
    fn register(self, container: &mut Container) -> DiResult<()> {
        self(container)
    }
}
