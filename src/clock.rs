// src/clock.rs

// clock module definition and implementations

// dependencies
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Clock trait to abstract time retrieval and blocking waits.
/// Implementors must be thread-safe (Send + Sync).
/// The `now` method returns the current time in nanoseconds as a u64.
/// `sleep` blocks the calling thread; test clocks may advance themselves instead.
pub trait Clock: Send + Sync {
    fn now(&self) -> Result<u64, ClockError>;

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Clock error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClockError {
    #[error("system time is before the Unix epoch")]
    SystemTimeError,
}

/// SystemClock implementation using the system time.
/// Returns the current time in nanoseconds since the Unix epoch.
/// This is the default clock used by MaxRate.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Result<u64, ClockError> {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .map_err(|_| ClockError::SystemTimeError)
    }
}
