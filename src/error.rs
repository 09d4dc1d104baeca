//! Error types shared by configuration loading and the dispatch engine.

use thiserror::Error;

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"storage.batteries.efficiency"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors surfaced by a simulation run.
#[derive(Debug, Error)]
pub enum SimError {
    /// Inputs rejected before the first step.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Engine produced a state outside its invariants. Always a bug.
    #[error("invariant violated at step {step}: {subject} {detail} (value {value})")]
    Invariant {
        step: usize,
        subject: String,
        detail: &'static str,
        value: f64,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type SimResult<T> = Result<T, SimError>;
