// src/config.rs

//! Configuration types for the max rate limiter

// dependencies
use crate::errors::MaxRateError;

/// Configuration for limiter behavior.
///
/// `rate_per_minute` is the maximum sustained rate in amount per minute and
/// `interval_minutes` the length of the trailing averaging window.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaxRateConfig {
    pub(crate) rate_per_minute: f64,
    pub(crate) interval_minutes: f64,
}

impl MaxRateConfig {
    /// Create a new configuration with rate and interval settings
    pub fn new(rate_per_minute: f64, interval_minutes: f64) -> Self {
        Self {
            rate_per_minute,
            interval_minutes,
        }
    }

    /// Builder-style: set rate per minute
    pub fn rate(mut self, rate_per_minute: f64) -> Self {
        self.rate_per_minute = rate_per_minute;
        self
    }

    /// Builder-style: set averaging interval in minutes
    pub fn interval(mut self, interval_minutes: f64) -> Self {
        self.interval_minutes = interval_minutes;
        self
    }

    /// Maximum amount allowed across one full interval
    pub fn capacity(&self) -> f64 {
        self.rate_per_minute * self.interval_minutes
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), MaxRateError> {
        if !(self.rate_per_minute.is_finite() && self.rate_per_minute > 0.0) {
            return Err(MaxRateError::InvalidRate);
        }
        if !(self.interval_minutes.is_finite() && self.interval_minutes > 0.0) {
            return Err(MaxRateError::InvalidInterval);
        }
        Ok(())
    }
}
