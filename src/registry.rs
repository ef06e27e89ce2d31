// src/registry.rs

//! Keyed collection of independent limiters

// dependencies
use crate::clock::{Clock, SystemClock};
use crate::config::MaxRateConfig;
use crate::errors::Result;
use crate::max_rate::{MaxRate, check_size};
use dashmap::DashMap;
use std::hash::Hash;
use std::time::Duration;
use tracing::debug;

/// One `MaxRate` per key (peer, connection, user...), all sharing a config.
///
/// Entries live in a `DashMap`, so the registry can be shared across
/// threads. Single calls lock their entry, but concurrent `transfer` calls
/// on one key are not serialized: each computes its wait before either
/// records, so together they can exceed the rate.
/// K is the key type, C the clock type, defaulting to SystemClock.
#[derive(Debug)]
pub struct MaxRateRegistry<K, C = SystemClock>
where
    K: Hash + Eq,
    C: Clock + Clone,
{
    config: MaxRateConfig,
    limiters: DashMap<K, MaxRate<C>>,
    clock: C,
}

impl<K, C> MaxRateRegistry<K, C>
where
    K: Hash + Eq,
    C: Clock + Clone,
{
    pub fn with_config(config: MaxRateConfig, clock: C) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            limiters: DashMap::new(),
            clock,
        })
    }

    pub fn config(&self) -> &MaxRateConfig {
        &self.config
    }

    /// Wait time for `size` on `key`. Unknown keys never wait and are not
    /// inserted.
    pub fn wait_time(&self, key: &K, size: f64) -> Result<Duration> {
        match self.limiters.get_mut(key) {
            Some(mut limiter) => limiter.wait_time(size),
            None => check_size(size).map(|_| Duration::ZERO),
        }
    }

    /// Records a transfer on `key`, creating its limiter on first use.
    pub fn record(&self, key: K, size: f64) -> Result<()> {
        check_size(size)?;
        self.limiters
            .entry(key)
            .or_try_insert_with(|| MaxRate::with_config(self.config, self.clock.clone()))?
            .record(size)
    }

    /// Blocks for the wait required on `key`, then records the transfer.
    ///
    /// The map entry is not held while sleeping.
    pub fn transfer(&self, key: K, size: f64) -> Result<()> {
        let wait = self.wait_time(&key, size)?;
        if !wait.is_zero() {
            debug!(size, wait_ms = wait.as_millis() as u64, "throttling keyed transfer");
            self.clock.sleep(wait);
        }
        self.record(key, size)
    }

    /// Average rate for `key`; zero for keys with no recorded transfers.
    pub fn average_rate(&self, key: &K) -> Result<f64> {
        match self.limiters.get_mut(key) {
            Some(mut limiter) => limiter.average_rate(),
            None => Ok(0.0),
        }
    }

    /// Expires every entry and drops those left with an empty history.
    /// Returns how many entries were removed.
    pub fn cleanup_idle(&self) -> Result<usize> {
        let now = self.clock.now()?;
        let mut removed = 0;
        self.limiters.retain(|_, limiter| {
            limiter.remove_expired(now);
            let keep = !limiter.is_idle();
            if !keep {
                removed += 1;
            }
            keep
        });
        debug!(removed, remaining = self.limiters.len(), "cleaned up idle limiters");
        Ok(removed)
    }

    pub fn len(&self) -> usize {
        self.limiters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.limiters.is_empty()
    }
}
