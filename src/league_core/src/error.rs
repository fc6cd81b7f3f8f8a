//! Error types for the season simulator.
//!
//! Every failure is detected before the first trial runs, except cancellation.

use thiserror::Error;

/// Result type alias for simulator operations
pub type Result<T> = std::result::Result<T, SimError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// Malformed goal distribution (length mismatch, negative or zero total weight)
    #[error("invalid goal distribution: {field}: {reason}")]
    InvalidDistribution { field: &'static str, reason: String },

    /// Bad run parameters or inconsistent starting table
    #[error("invalid configuration: {field}: {reason}")]
    InvalidConfiguration { field: String, reason: String },

    /// The starting table lists the same team twice
    #[error("duplicate team in starting table: {0}")]
    DuplicateTeam(String),

    /// A fixture names a team the table does not know (strict policy only)
    #[error("fixture {fixture} references unknown team {team:?}")]
    UnknownTeam { fixture: usize, team: String },

    /// The run was stopped through its cancel flag
    #[error("simulation cancelled after {completed} trials")]
    Cancelled { completed: usize },
}

impl SimError {
    pub fn distribution(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidDistribution {
            field,
            reason: reason.into(),
        }
    }

    pub fn config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// True for every error caused by the caller's input rather than by cancellation.
    pub fn is_configuration(&self) -> bool {
        !matches!(self, Self::Cancelled { .. })
    }
}
