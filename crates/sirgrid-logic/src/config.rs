//! Run configuration and validation.
//!
//! A [`SimConfig`] is an explicit value handed to the run driver, so two
//! runs with different parameters never share state. Defaults match the
//! classic setup: a 50×50 grid, `beta = 0.3`, `gamma = 0.1`, 100 steps.
//!
//! ```
//! use sirgrid_logic::config::{validate_config, ConfigError, SimConfig};
//!
//! let mut config = SimConfig::default();
//! assert!(validate_config(&config).is_empty());
//!
//! config.beta = 1.5;
//! assert_eq!(validate_config(&config), vec![ConfigError::BetaOutOfRange(1.5)]);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::SimError;

/// Default side length of the grid.
pub const DEFAULT_GRID_SIZE: usize = 50;
/// Default per-neighbor infection probability.
pub const DEFAULT_BETA: f64 = 0.3;
/// Default per-step recovery probability.
pub const DEFAULT_GAMMA: f64 = 0.1;
/// Default number of recorded steps.
pub const DEFAULT_STEPS: usize = 100;

/// Parameters for one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Side length `N` of the square grid (must be ≥ 1).
    pub grid_size: usize,
    /// Probability that one infected neighbor infects a susceptible cell, in [0, 1].
    pub beta: f64,
    /// Probability that an infected cell recovers in a step, in [0, 1].
    pub gamma: f64,
    /// Number of steps to record.
    pub steps: usize,
    /// Random seed (None = seed from OS entropy).
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            beta: DEFAULT_BETA,
            gamma: DEFAULT_GAMMA,
            steps: DEFAULT_STEPS,
            seed: None,
        }
    }
}

/// A single violated parameter constraint.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Grid must have at least one cell.
    #[error("invalid parameter `grid_size` = 0: must be at least 1")]
    GridSizeZero,
    /// `grid_size * grid_size` cells cannot be addressed.
    #[error("invalid parameter `grid_size` = {0}: grid_size squared must not exceed usize::MAX")]
    GridSizeTooLarge(usize),
    /// Infection probability outside [0, 1] (or NaN).
    #[error("invalid parameter `beta` = {0}: must be within [0, 1]")]
    BetaOutOfRange(f64),
    /// Recovery probability outside [0, 1] (or NaN).
    #[error("invalid parameter `gamma` = {0}: must be within [0, 1]")]
    GammaOutOfRange(f64),
}

impl ConfigError {
    /// Name of the parameter this error refers to.
    pub fn parameter(&self) -> &'static str {
        match self {
            Self::GridSizeZero | Self::GridSizeTooLarge(_) => "grid_size",
            Self::BetaOutOfRange(_) => "beta",
            Self::GammaOutOfRange(_) => "gamma",
        }
    }
}

/// Whether `p` is a usable probability. NaN is rejected.
pub fn is_probability(p: f64) -> bool {
    (0.0..=1.0).contains(&p)
}

/// Number of cells in a `size`×`size` grid, rejecting sizes that cannot be built.
pub fn cell_count(size: usize) -> Result<usize, ConfigError> {
    if size == 0 {
        return Err(ConfigError::GridSizeZero);
    }
    size.checked_mul(size).ok_or(ConfigError::GridSizeTooLarge(size))
}

/// Check the rate parameters shared by [`SimConfig`] and the bare run driver.
pub fn check_rates(beta: f64, gamma: f64) -> Result<(), ConfigError> {
    if !is_probability(beta) {
        return Err(ConfigError::BetaOutOfRange(beta));
    }
    if !is_probability(gamma) {
        return Err(ConfigError::GammaOutOfRange(gamma));
    }
    Ok(())
}

/// Validate a configuration, returning all errors found.
pub fn validate_config(config: &SimConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    if let Err(err) = cell_count(config.grid_size) {
        errors.push(err);
    }
    if !is_probability(config.beta) {
        errors.push(ConfigError::BetaOutOfRange(config.beta));
    }
    if !is_probability(config.gamma) {
        errors.push(ConfigError::GammaOutOfRange(config.gamma));
    }

    errors
}

impl SimConfig {
    /// Fail with the first violated constraint, if any.
    pub fn check(&self) -> Result<(), SimError> {
        match validate_config(self).into_iter().next() {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    /// Parse a JSON document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let config: Self = serde_json::from_str(json)?;
        config.check()?;
        Ok(config)
    }

    /// Number of cells, `N*N`. Saturates for sizes [`validate_config`] rejects.
    pub fn population(&self) -> u64 {
        let n = self.grid_size as u64;
        n.saturating_mul(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SimConfig::default();
        assert!(validate_config(&config).is_empty());
        assert_eq!(config.grid_size, 50);
        assert_eq!(config.steps, 100);
        assert!((config.beta - 0.3).abs() < f64::EPSILON);
        assert!((config.gamma - 0.1).abs() < f64::EPSILON);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn zero_grid_size() {
        let config = SimConfig {
            grid_size: 0,
            ..SimConfig::default()
        };
        assert_eq!(validate_config(&config), vec![ConfigError::GridSizeZero]);
    }

    #[test]
    fn overflowing_grid_size() {
        let config = SimConfig {
            grid_size: usize::MAX,
            ..SimConfig::default()
        };
        assert_eq!(
            validate_config(&config),
            vec![ConfigError::GridSizeTooLarge(usize::MAX)]
        );
        let msg = config.check().unwrap_err().to_string();
        assert!(msg.contains("grid_size"));
        assert!(msg.contains("usize::MAX"));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn json_grid_size_overflowing_square_rejected() {
        let err = SimConfig::from_json(r#"{ "grid_size": 4294967296 }"#).unwrap_err();
        assert!(matches!(
            err,
            SimError::InvalidParameter(ConfigError::GridSizeTooLarge(4_294_967_296))
        ));
    }

    #[test]
    fn cell_count_of_valid_sizes() {
        assert_eq!(cell_count(1), Ok(1));
        assert_eq!(cell_count(50), Ok(2500));
        assert_eq!(cell_count(0), Err(ConfigError::GridSizeZero));
    }

    #[test]
    fn rates_out_of_range() {
        let config = SimConfig {
            beta: -0.1,
            gamma: 1.01,
            ..SimConfig::default()
        };
        let errors = validate_config(&config);
        assert_eq!(
            errors,
            vec![
                ConfigError::BetaOutOfRange(-0.1),
                ConfigError::GammaOutOfRange(1.01)
            ]
        );
    }

    #[test]
    fn nan_rate_rejected() {
        let config = SimConfig {
            gamma: f64::NAN,
            ..SimConfig::default()
        };
        let errors = validate_config(&config);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].parameter(), "gamma");
    }

    #[test]
    fn boundary_rates_accepted() {
        for (beta, gamma) in [(0.0, 0.0), (1.0, 1.0), (0.0, 1.0)] {
            assert!(check_rates(beta, gamma).is_ok());
        }
    }

    #[test]
    fn error_message_names_parameter_and_constraint() {
        let msg = ConfigError::BetaOutOfRange(1.5).to_string();
        assert!(msg.contains("beta"));
        assert!(msg.contains("1.5"));
        assert!(msg.contains("[0, 1]"));
    }

    #[test]
    fn check_reports_first_error() {
        let config = SimConfig {
            grid_size: 0,
            beta: 2.0,
            ..SimConfig::default()
        };
        let err = config.check().unwrap_err();
        assert_eq!(err.parameter(), Some("grid_size"));
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config = SimConfig::from_json(r#"{ "grid_size": 11, "seed": 42 }"#).unwrap();
        assert_eq!(config.grid_size, 11);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.steps, DEFAULT_STEPS);
        assert!((config.beta - DEFAULT_BETA).abs() < f64::EPSILON);
    }

    #[test]
    fn json_with_invalid_rate_rejected() {
        let err = SimConfig::from_json(r#"{ "beta": 3.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            SimError::InvalidParameter(ConfigError::BetaOutOfRange(_))
        ));
    }

    #[test]
    fn malformed_json_rejected() {
        let err = SimConfig::from_json("{ grid_size: ").unwrap_err();
        assert!(matches!(err, SimError::ConfigParse(_)));
    }

    #[test]
    fn negative_steps_unrepresentable_in_json() {
        assert!(SimConfig::from_json(r#"{ "steps": -1 }"#).is_err());
    }

    #[test]
    fn population_is_square() {
        let config = SimConfig {
            grid_size: 7,
            ..SimConfig::default()
        };
        assert_eq!(config.population(), 49);
    }
}
