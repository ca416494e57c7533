// Stack trace configuration
// Process-wide switch and frame limit for stack trace capture

use std::env;
use std::sync::{PoisonError, RwLock};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Environment variable enabling or disabling capture.
pub const ENV_STACK_TRACE: &str = "FAULTLINE_STACK_TRACE";

/// Environment variable bounding the number of captured frames.
pub const ENV_MAX_FRAMES: &str = "FAULTLINE_MAX_FRAMES";

const DEFAULT_MAX_FRAMES: usize = 128;

/// Errors produced while reading configuration input.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Stack trace capture settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    /// When false, no error collects or enhances a stack trace.
    pub enabled: bool,
    /// Upper bound on frames recorded per capture.
    ///
    /// Captures keep the innermost frames and drop the outermost ones. An
    /// enhanced trace is merged with its cause from the outer end, so when
    /// either stack is deeper than this bound their outer frames no longer
    /// line up and both segments are printed in full.
    pub max_frames: usize,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_frames: DEFAULT_MAX_FRAMES,
        }
    }
}

impl TraceConfig {
    /// Read settings from `FAULTLINE_STACK_TRACE` and `FAULTLINE_MAX_FRAMES`.
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Parse settings from JSON, e.g. `{"enabled": false}`.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_STACK_TRACE) {
            config.enabled = parse_switch(ENV_STACK_TRACE, &value)?;
        }

        if let Some(value) = lookup(ENV_MAX_FRAMES) {
            config.max_frames = match value.trim().parse::<usize>() {
                Ok(frames) if frames > 0 => frames,
                _ => return Err(invalid(ENV_MAX_FRAMES, &value)),
            };
        }

        Ok(config)
    }
}

fn parse_switch(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" => Ok(true),
        "0" | "false" | "off" => Ok(false),
        _ => Err(invalid(key, value)),
    }
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

static ACTIVE: Lazy<RwLock<TraceConfig>> = Lazy::new(|| {
    let config = TraceConfig::from_env().unwrap_or_else(|e| {
        warn!(error = %e, "Ignoring stack trace configuration from environment");
        TraceConfig::default()
    });
    RwLock::new(config)
});

/// The active configuration, read from the environment on first use.
pub fn current() -> TraceConfig {
    *ACTIVE.read().unwrap_or_else(PoisonError::into_inner)
}

/// Replace the active configuration. Affects errors created afterwards.
pub fn set(config: TraceConfig) {
    *ACTIVE.write().unwrap_or_else(PoisonError::into_inner) = config;
}
