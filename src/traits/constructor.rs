//! Function-arity traits that stand in for runtime signature inspection.
//!
//! A plain Rust function or closure whose parameters are all
//! [`Dependency`] types implements [`Constructor`] (when it is `Fn` and can
//! be stored) and [`Injectable`] (when it only needs to run once). The
//! implementations expose the parameter keys in call order, which is all the
//! registry and the resolver need to know about a signature.

use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::key::{key_of_type, Key};
use crate::registration::AnyArc;
use crate::traits::Dependency;

/// A reusable constructor with 0 to 10 injectable parameters.
///
/// # Examples
///
/// ```
/// use ferrous_wire::{Constructor, key_of_type};
/// use std::sync::Arc;
///
/// struct Config;
/// struct Server { config: Arc<Config> }
///
/// fn new_server(config: Arc<Config>) -> Server {
///     Server { config }
/// }
///
/// fn params<F: Constructor<Args>, Args>(_: &F) -> Vec<ferrous_wire::Key> {
///     F::dependencies()
/// }
///
/// assert_eq!(params(&new_server), vec![key_of_type::<Config>()]);
/// ```
pub trait Constructor<Args>: Send + Sync + 'static {
    /// What the function returns.
    type Output;

    /// Parameter keys, in call order.
    fn dependencies() -> Vec<Key>;

    /// Calls the function with instances matching [`dependencies`](Self::dependencies).
    fn construct(&self, instances: Vec<AnyArc>) -> DiResult<Self::Output>;
}

/// A one-shot target function with 0 to 10 injectable parameters.
///
/// Every [`Constructor`] is also `Injectable`; targets additionally may be
/// `FnOnce`, borrow from their environment, and need not be `Send`.
pub trait Injectable<Args> {
    /// What the function returns.
    type Output;

    /// Parameter keys, in call order.
    fn dependencies() -> Vec<Key>;

    /// Consumes the function, calling it with the given instances.
    fn call_once(self, instances: Vec<AnyArc>) -> DiResult<Self::Output>;
}

/// A tuple of values that a single constructor produces together.
///
/// Each element becomes its own providable type, all bound to one provider.
pub trait OutputSet: Send + 'static {
    /// Keys of the tuple elements, in order.
    fn keys() -> Vec<Key>;

    /// Splits the tuple into type-erased instances, in order.
    fn into_instances(self) -> Vec<AnyArc>;
}

#[inline]
fn next_arg<D: Dependency>(instances: &mut std::vec::IntoIter<AnyArc>) -> DiResult<D> {
    let instance = instances
        .next()
        .ok_or(DiError::TypeMismatch(std::any::type_name::<D>()))?;
    D::from_instance(instance)
}

macro_rules! define_injectable ({ $($param:ident)* } => {
    impl<Func, R, $($param,)*> Constructor<($($param,)*)> for Func
    where
        Func: Fn($($param),*) -> R + Send + Sync + 'static,
        $($param: Dependency,)*
    {
        type Output = R;

        #[inline]
        fn dependencies() -> Vec<Key> {
            vec![$($param::key()),*]
        }

        #[inline]
        #[allow(non_snake_case, unused_mut, unused_variables)]
        fn construct(&self, instances: Vec<AnyArc>) -> DiResult<R> {
            let mut instances = instances.into_iter();
            $(let $param = next_arg::<$param>(&mut instances)?;)*
            Ok((self)($($param),*))
        }
    }

    impl<Func, R, $($param,)*> Injectable<($($param,)*)> for Func
    where
        Func: FnOnce($($param),*) -> R,
        $($param: Dependency,)*
    {
        type Output = R;

        #[inline]
        fn dependencies() -> Vec<Key> {
            vec![$($param::key()),*]
        }

        #[inline]
        #[allow(non_snake_case, unused_mut, unused_variables)]
        fn call_once(self, instances: Vec<AnyArc>) -> DiResult<R> {
            let mut instances = instances.into_iter();
            $(let $param = next_arg::<$param>(&mut instances)?;)*
            Ok((self)($($param),*))
        }
    }
});

define_injectable! {}
define_injectable! { T1 }
define_injectable! { T1 T2 }
define_injectable! { T1 T2 T3 }
define_injectable! { T1 T2 T3 T4 }
define_injectable! { T1 T2 T3 T4 T5 }
define_injectable! { T1 T2 T3 T4 T5 T6 }
define_injectable! { T1 T2 T3 T4 T5 T6 T7 }
define_injectable! { T1 T2 T3 T4 T5 T6 T7 T8 }
define_injectable! { T1 T2 T3 T4 T5 T6 T7 T8 T9 }
define_injectable! { T1 T2 T3 T4 T5 T6 T7 T8 T9 T10 }

macro_rules! define_output_set ({ $($out:ident)+ } => {
    impl<$($out: Send + Sync + 'static,)+> OutputSet for ($($out,)+) {
        #[inline]
        fn keys() -> Vec<Key> {
            vec![$(key_of_type::<$out>()),+]
        }

        #[inline]
        #[allow(non_snake_case)]
        fn into_instances(self) -> Vec<AnyArc> {
            let ($($out,)+) = self;
            vec![$(Arc::new($out) as AnyArc),+]
        }
    }
});

define_output_set! { O1 }
define_output_set! { O1 O2 }
define_output_set! { O1 O2 O3 }
define_output_set! { O1 O2 O3 O4 }
define_output_set! { O1 O2 O3 O4 O5 }
define_output_set! { O1 O2 O3 O4 O5 O6 }
define_output_set! { O1 O2 O3 O4 O5 O6 O7 }
define_output_set! { O1 O2 O3 O4 O5 O6 O7 O8 }
