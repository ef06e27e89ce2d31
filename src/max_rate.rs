// src/max_rate.rs

// maxrate: a sliding-window transfer-rate limiter.

// dependencies
use crate::clock::{Clock, SystemClock};
use crate::config::MaxRateConfig;
use crate::errors::{MaxRateError, Result};
use std::collections::VecDeque;
use std::time::Duration;
use tracing::{debug, trace};

const NANOS_PER_MINUTE: u64 = 60_000_000_000;

/// A quantity transferred at a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Event {
    amount: f64,
    timestamp_nanos: u64,
}

/// The main MaxRate model.
///
/// Keeps a chronological log of transfer events covering the trailing
/// interval and answers how long a caller has to wait before the next
/// transfer keeps the average rate at or below `rate()` per minute.
/// Bursts up to `capacity()` are allowed.
///
/// Every operation takes `&mut self`; there is no internal locking.
/// C is the clock type, defaulting to SystemClock.
#[derive(Debug)]
pub struct MaxRate<C = SystemClock>
where
    C: Clock,
{
    max_rate: f64,
    interval: f64,
    transferred: f64,
    history: VecDeque<Event>,
    clock: C,
}

impl MaxRate<SystemClock> {
    /// Create a limiter on the system clock.
    pub fn new(rate_per_minute: f64, interval_minutes: f64) -> Result<Self> {
        Self::with_config(
            MaxRateConfig::new(rate_per_minute, interval_minutes),
            SystemClock,
        )
    }
}

// methods for the MaxRate type
impl<C> MaxRate<C>
where
    C: Clock,
{
    // method to create a new limiter from a config object
    pub fn with_config(config: MaxRateConfig, clock: C) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            max_rate: config.rate_per_minute,
            interval: config.interval_minutes,
            transferred: 0.0,
            history: VecDeque::new(),
            clock,
        })
    }

    // accessor method to return the rate field (amount per minute)
    pub fn rate(&self) -> f64 {
        self.max_rate
    }

    // accessor method to return the interval field (minutes)
    pub fn interval(&self) -> f64 {
        self.interval
    }

    /// Maximum amount that may be outstanding across one full interval.
    pub fn capacity(&self) -> f64 {
        self.max_rate * self.interval
    }

    /// Amount still counted against the window as of the last query.
    pub fn transferred(&self) -> f64 {
        self.transferred
    }

    /// Number of events currently held in the history.
    pub fn pending_events(&self) -> usize {
        self.history.len()
    }

    /// Returns how long to wait before transferring `size` keeps the rate
    /// within bounds.
    ///
    /// The wait is based on at most the amount currently outstanding, so a
    /// single transfer larger than `capacity()` on an idle limiter returns
    /// zero.
    pub fn wait_time(&mut self, size: f64) -> Result<Duration> {
        check_size(size)?;
        let now = self.clock.now()?;
        Ok(self.wait_time_at(size, now))
    }

    /// Waits as long as `wait_time(size)` requires, then records the transfer.
    ///
    /// Blocks the calling thread. The event is stamped with the time read
    /// after waking.
    pub fn transfer(&mut self, size: f64) -> Result<()> {
        let wait = self.wait_time(size)?;
        if !wait.is_zero() {
            debug!(size, wait_ms = wait.as_millis() as u64, "throttling transfer");
            self.clock.sleep(wait);
        }
        self.record(size)
    }

    /// Suspends for `wait_time(size)`, then records the transfer.
    ///
    /// Dropping the future before it completes records nothing.
    #[cfg(feature = "async")]
    pub async fn transfer_async(&mut self, size: f64) -> Result<()> {
        let wait = self.wait_time(size)?;
        if !wait.is_zero() {
            debug!(
                size,
                wait_ms = wait.as_millis() as u64,
                "throttling async transfer"
            );
            tokio::time::sleep(wait).await;
        }
        self.record(size)
    }

    /// Accounts for a transfer that already happened, without waiting.
    pub fn record(&mut self, size: f64) -> Result<()> {
        check_size(size)?;
        let now = self.clock.now()?;
        self.push_event(size, now);
        Ok(())
    }

    /// Appends an event at an explicit timestamp without waiting.
    ///
    /// Callers are responsible for keeping timestamps in chronological order.
    #[cfg(any(test, feature = "testing"))]
    pub fn record_at(&mut self, size: f64, timestamp_nanos: u64) -> Result<()> {
        check_size(size)?;
        self.push_event(size, timestamp_nanos);
        Ok(())
    }

    /// Average rate over the trailing interval, in amount per minute.
    pub fn average_rate(&mut self) -> Result<f64> {
        let now = self.clock.now()?;
        self.remove_expired(now);
        Ok(self.transferred / self.interval)
    }

    fn wait_time_at(&mut self, size: f64, now: u64) -> Duration {
        self.remove_expired(now);
        let capacity = self.capacity();

        if self.transferred + size < capacity {
            return Duration::ZERO;
        }

        let overflow = self.transferred + size - capacity;
        let data_to_wait_for = overflow.min(self.transferred);
        minutes_to_duration(data_to_wait_for / self.max_rate)
    }

    pub(crate) fn is_idle(&self) -> bool {
        self.history.is_empty()
    }

    fn push_event(&mut self, amount: f64, timestamp_nanos: u64) {
        self.transferred += amount;
        self.history.push_back(Event {
            amount,
            timestamp_nanos,
        });
    }

    // Drops events older than the interval. Any part of an old event that
    // exceeds what max_rate allows over its elapsed time is carried forward
    // as a new event stamped `now`.
    pub(crate) fn remove_expired(&mut self, now: u64) {
        // never zero, so residuals stamped `now` always stop the scan
        let interval_nanos = ((self.interval * NANOS_PER_MINUTE as f64) as u64).max(1);
        let Some(expire_time) = now.checked_sub(interval_nanos) else {
            return;
        };

        while let Some(event) = self.history.front().copied() {
            if event.timestamp_nanos > expire_time {
                break;
            }
            self.history.pop_front();

            let elapsed =
                now.saturating_sub(event.timestamp_nanos) as f64 / NANOS_PER_MINUTE as f64;
            let attributable = if event.amount / elapsed > self.max_rate {
                let allowed = self.max_rate * elapsed;
                let residual = event.amount - allowed;
                trace!(amount = event.amount, residual, "carrying residual forward");
                self.history.push_back(Event {
                    amount: residual,
                    timestamp_nanos: now,
                });
                allowed
            } else {
                trace!(amount = event.amount, "event expired");
                event.amount
            };

            self.transferred = (self.transferred - attributable).max(0.0);
        }

        if self.history.is_empty() {
            self.transferred = 0.0;
        }
    }
}

pub(crate) fn check_size(size: f64) -> Result<()> {
    if size.is_finite() && size >= 0.0 {
        Ok(())
    } else {
        Err(MaxRateError::InvalidSize(size))
    }
}

fn minutes_to_duration(minutes: f64) -> Duration {
    Duration::try_from_secs_f64(minutes * 60.0).unwrap_or(Duration::MAX)
}
