//! Traits describing what can be injected and what can be invoked.

pub mod constructor;
pub mod dependency;

pub use constructor::{Constructor, Injectable, OutputSet};
pub use dependency::Dependency;
