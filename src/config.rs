//! Analysis settings.
//!
//! Settings have built-in defaults, can be loaded from a JSON file, and can
//! be changed at runtime with `setoption`.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Default number of ranked plays returned per request.
pub const DEFAULT_MAX_CANDIDATES: usize = 10;

/// Errors raised while loading settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Controls how many candidate plays are kept. Evaluation flags are not
/// configurable: every request is scored and cubeless.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Keep at most this many of the engine's ranked plays.
    pub max_candidates: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            max_candidates: DEFAULT_MAX_CANDIDATES,
        }
    }
}

/// Loads settings from a JSON file. Missing fields take their defaults.
pub fn load_config(path: &Path) -> Result<AnalysisConfig, ConfigError> {
    let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_config_from_str(&data)
}

/// Loads settings from a JSON string.
pub fn load_config_from_str(json: &str) -> Result<AnalysisConfig, ConfigError> {
    Ok(serde_json::from_str(json)?)
}
