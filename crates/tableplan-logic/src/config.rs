//! Engine configuration.
//!
//! Per-plan knobs (stock budgets, zones, grid) live on the floor plan; this
//! covers what the caller sets once for every run.
//!
//! ```
//! use tableplan_logic::config::{validate_config, EngineConfig};
//!
//! let config: EngineConfig = serde_json::from_str(r#"{"fallback_grid": 25}"#).unwrap();
//! assert_eq!(config.labels.fixed, 20);
//! assert!(validate_config(&config).is_empty());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::DEFAULT_GRID;
use crate::labeling::LabelLimits;

/// Smallest search step accepted; finer grids make the spot search crawl.
pub const MIN_GRID: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Spot-search step when the room declares no grid of its own.
    pub fallback_grid: f64,
    pub labels: LabelLimits,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fallback_grid: DEFAULT_GRID,
            labels: LabelLimits::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("fallback grid must be positive, got {0}")]
    NonPositiveGrid(f64),
    #[error("fallback grid {0} is finer than the minimum of {min}", min = MIN_GRID)]
    GridTooFine(f64),
}

/// Validate an engine configuration, returning all errors found.
pub fn validate_config(config: &EngineConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();
    let grid = config.fallback_grid;
    if !(grid.is_finite() && grid > 0.0) {
        errors.push(ConfigError::NonPositiveGrid(grid));
    } else if grid < MIN_GRID {
        errors.push(ConfigError::GridTooFine(grid));
    }
    errors
}
