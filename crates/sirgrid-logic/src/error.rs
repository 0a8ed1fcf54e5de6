//! Error types.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors raised before any simulation work begins.
///
/// There are no runtime failures once a run has started: every random
/// outcome, however extreme, is a valid outcome.
#[derive(Debug, Error)]
pub enum SimError {
    /// A run parameter violates its constraint.
    #[error(transparent)]
    InvalidParameter(#[from] ConfigError),

    /// A JSON config document could not be parsed.
    #[error("failed to parse config document: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl SimError {
    /// Name of the offending parameter, if this is a parameter error.
    pub fn parameter(&self) -> Option<&'static str> {
        match self {
            Self::InvalidParameter(e) => Some(e.parameter()),
            Self::ConfigParse(_) => None,
        }
    }
}
