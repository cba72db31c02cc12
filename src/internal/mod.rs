//! Internal implementation details.

pub(crate) mod circular;
pub(crate) mod sync;

pub(crate) use circular::ResolutionStack;
pub(crate) use sync::Mutex;
