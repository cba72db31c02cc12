//! Static validation of the registered provider graph.
//!
//! Resolution only discovers a missing provider or a cycle when it walks into
//! one. Validation walks the whole registry up front, without running any
//! constructor, and reports every such problem at once.

use std::fmt;

use crate::error::{DiError, DiResult};
use crate::registration::Registry;

/// A problem found in the provider graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// A constructor parameter has no provider
    MissingDependency {
        /// Type produced by the constructor that needs the parameter
        provider: &'static str,
        /// The unprovided parameter type
        dependency: &'static str,
    },
    /// Providers depend on each other in a loop
    CircularDependency {
        /// Types along the loop; first and last are the same
        cycle: Vec<&'static str>,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::MissingDependency { provider, dependency } => {
                write!(f, "{} requires {}, which has no provider", provider, dependency)
            }
            ValidationIssue::CircularDependency { cycle } => {
                write!(f, "circular dependency: {}", cycle.join(" -> "))
            }
        }
    }
}

impl From<ValidationIssue> for DiError {
    fn from(issue: ValidationIssue) -> Self {
        match issue {
            ValidationIssue::MissingDependency { dependency, .. } => {
                DiError::ProviderNotFound(dependency)
            }
            ValidationIssue::CircularDependency { cycle } => DiError::Circular(cycle),
        }
    }
}

/// Result of [`Container::validate`](crate::Container::validate).
///
/// # Examples
///
/// ```
/// use ferrous_wire::{Container, ValidationIssue};
/// use std::sync::Arc;
///
/// struct Database;
/// struct Repository(Arc<Database>);
///
/// let mut container = Container::new();
/// container.provide(|db: Arc<Database>| Repository(db)).unwrap();
///
/// let report = container.validate();
/// assert!(!report.is_valid());
/// assert!(matches!(
///     &report.issues()[0],
///     ValidationIssue::MissingDependency { dependency, .. } if dependency.ends_with("Database")
/// ));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// True when no problems were found.
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// Problems in discovery order: missing dependencies first (by provider
    /// registration order), then cycles.
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    /// Missing dependencies only.
    pub fn missing(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| matches!(i, ValidationIssue::MissingDependency { .. }))
    }

    /// Cycles only.
    pub fn cycles(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| matches!(i, ValidationIssue::CircularDependency { .. }))
    }

    /// `Ok(())` when valid, otherwise the first problem as the error
    /// resolution would have produced for it.
    pub fn into_result(self) -> DiResult<()> {
        match self.issues.into_iter().next() {
            None => Ok(()),
            Some(issue) => Err(issue.into()),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

pub(crate) fn validate(registry: &Registry) -> ValidationReport {
    let mut issues = Vec::new();

    for (_, provider) in registry.iter() {
        let Some(produced) = provider.outputs.first() else {
            continue;
        };
        for param in provider.params.iter() {
            if !registry.contains_key(param) {
                issues.push(ValidationIssue::MissingDependency {
                    provider: produced.display_name(),
                    dependency: param.display_name(),
                });
            }
        }
    }

    let mut marks = vec![Mark::Unvisited; registry.len()];
    let mut path = Vec::new();
    for (index, provider) in registry.iter() {
        if marks[index] == Mark::Unvisited {
            let root = provider
                .outputs
                .first()
                .map(|k| k.display_name())
                .unwrap_or(provider.name);
            visit(registry, index, root, &mut marks, &mut path, &mut issues);
        }
    }

    tracing::debug!(
        providers = registry.len(),
        issues = issues.len(),
        "validated provider graph"
    );
    ValidationReport { issues }
}

/// Depth-first walk; `path` holds (provider, type requested from it).
fn visit(
    registry: &Registry,
    index: usize,
    requested: &'static str,
    marks: &mut [Mark],
    path: &mut Vec<(usize, &'static str)>,
    issues: &mut Vec<ValidationIssue>,
) {
    let Some(provider) = registry.by_index(index) else {
        return;
    };
    marks[index] = Mark::InProgress;
    path.push((index, requested));

    for param in provider.params.iter() {
        let Some((next, _)) = registry.get(param) else {
            continue;
        };
        match marks[next] {
            Mark::Unvisited => visit(registry, next, param.display_name(), marks, path, issues),
            Mark::InProgress => {
                let start = path.iter().position(|&(p, _)| p == next).unwrap_or(0);
                let mut cycle: Vec<&'static str> = path[start..].iter().map(|&(_, n)| n).collect();
                cycle.push(param.display_name());
                issues.push(ValidationIssue::CircularDependency { cycle });
            }
            Mark::Done => {}
        }
    }

    path.pop();
    marks[index] = Mark::Done;
}
