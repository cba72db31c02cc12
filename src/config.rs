//! Container configuration.
//!
//! Settings can be built in code, read from the process environment, or
//! (with the `config` feature) deserialized from JSON.

use std::env;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::{DiError, DiResult};

/// Environment variable holding [`ContainerConfig::max_depth`].
pub const ENV_MAX_DEPTH: &str = "FERROUS_WIRE_MAX_DEPTH";
/// Environment variable holding [`ContainerConfig::detect_cycles`].
pub const ENV_DETECT_CYCLES: &str = "FERROUS_WIRE_DETECT_CYCLES";
/// Environment variable holding [`ContainerConfig::trace_resolution`].
pub const ENV_TRACE: &str = "FERROUS_WIRE_TRACE";

const DEFAULT_MAX_DEPTH: usize = 1024;

/// Resolution settings for a [`Container`](crate::Container).
///
/// # Examples
///
/// ```
/// use ferrous_wire::{Container, ContainerConfig};
///
/// let config = ContainerConfig::default()
///     .max_depth(64)
///     .trace_resolution(true);
///
/// let container = Container::with_config(config);
/// assert_eq!(container.config().max_depth, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ContainerConfig {
    /// Deepest chain of nested constructors a single resolution may build
    pub max_depth: usize,
    /// Fail fast with `DiError::Circular` when a type under construction is
    /// requested again. When off, cycles run into `max_depth` instead.
    pub detect_cycles: bool,
    /// Install a [`LoggingObserver`](crate::LoggingObserver) on creation
    pub trace_resolution: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            detect_cycles: true,
            trace_resolution: false,
        }
    }
}

impl ContainerConfig {
    /// Sets the maximum resolution depth.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Enables or disables cycle detection.
    pub fn detect_cycles(mut self, detect_cycles: bool) -> Self {
        self.detect_cycles = detect_cycles;
        self
    }

    /// Enables or disables the built-in logging observer.
    pub fn trace_resolution(mut self, trace_resolution: bool) -> Self {
        self.trace_resolution = trace_resolution;
        self
    }

    /// Reads settings from the environment, falling back to defaults for
    /// unset variables.
    ///
    /// Booleans accept `1/0`, `true/false`, `yes/no`, `on/off`.
    pub fn from_env() -> DiResult<Self> {
        let mut config = Self::default();

        if let Some(raw) = read_var(ENV_MAX_DEPTH) {
            config.max_depth = raw.parse().map_err(|_| {
                DiError::InvalidConfig(format!("{} must be an integer, got {:?}", ENV_MAX_DEPTH, raw))
            })?;
        }
        if let Some(raw) = read_var(ENV_DETECT_CYCLES) {
            config.detect_cycles = parse_bool(ENV_DETECT_CYCLES, &raw)?;
        }
        if let Some(raw) = read_var(ENV_TRACE) {
            config.trace_resolution = parse_bool(ENV_TRACE, &raw)?;
        }

        Ok(config)
    }

    /// Parses settings from a JSON document; missing fields take defaults.
    #[cfg(feature = "config")]
    pub fn from_json(json: &str) -> DiResult<Self> {
        serde_json::from_str(json).map_err(|e| DiError::InvalidConfig(e.to_string()))
    }
}

fn read_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_bool(name: &str, raw: &str) -> DiResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(DiError::InvalidConfig(format!(
            "{} must be a boolean, got {:?}",
            name, raw
        ))),
    }
}
