// src/errors.rs

// error handling for the max rate limiter

// dependencies
use thiserror::Error;

use crate::clock::ClockError;

/// Error type for MaxRate configuration and usage issues.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MaxRateError {
    /// rate <= 0, NaN or infinite
    #[error("Rate must be positive and finite")]
    InvalidRate,
    /// interval <= 0, NaN or infinite
    #[error("Interval must be positive and finite")]
    InvalidInterval,
    /// negative, NaN or infinite transfer size
    #[error("Transfer size must be finite and non-negative, got {0}")]
    InvalidSize(f64),
    #[error("Clock error occurred: {0}")]
    ClockError(#[from] ClockError),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MaxRateError>;
