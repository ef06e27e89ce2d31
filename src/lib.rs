// src/lib.rs

//! # maxrate
//!
//! A sliding-window transfer-rate limiter. Given a maximum rate per minute
//! and an averaging interval, it tells callers how long to wait before a
//! transfer so the average over the trailing interval stays within the
//! rate, while still allowing bursts up to `rate * interval`.
//!
//! ## Quick Example
//!
//! ```rust
//! use maxrate::{MaxRate, MaxRateConfig, SystemClock};
//!
//! // 1024 units per minute, averaged over 5 minutes
//! let config = MaxRateConfig::new(1024.0, 5.0);
//! let mut limiter = MaxRate::with_config(config, SystemClock).unwrap();
//!
//! let wait = limiter.wait_time(512.0).unwrap();
//! assert!(wait.is_zero());
//!
//! limiter.transfer(512.0).unwrap();
//! println!("average rate: {:.1}/min", limiter.average_rate().unwrap());
//! ```

// private modules
mod clock;
mod config;
mod errors;
mod max_rate;
mod registry;

// public API exports
pub use clock::{Clock, ClockError, SystemClock};
pub use config::MaxRateConfig;
pub use errors::{MaxRateError, Result};
pub use max_rate::MaxRate;
pub use registry::MaxRateRegistry;
