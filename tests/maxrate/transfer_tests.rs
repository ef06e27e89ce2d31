// tests/maxrate/transfer_tests.rs

#[cfg(test)]
mod tests {
    use crate::fixtures::test_clock::{TestClock, as_minutes, close_enough};
    use maxrate::{MaxRate, MaxRateConfig, SystemClock};
    use std::time::{Duration, Instant};

    #[test]
    fn transfer_within_capacity_does_not_wait() {
        let clock = TestClock::at_minutes(100.0);
        let mut limiter = MaxRate::with_config(MaxRateConfig::new(2.0, 5.0), clock.clone()).unwrap();

        limiter.transfer(4.0).unwrap();
        limiter.transfer(5.0).unwrap();

        assert_eq!(clock.minutes(), 100.0);
        assert_eq!(limiter.transferred(), 9.0);
        assert_eq!(limiter.pending_events(), 2);
    }

    #[test]
    fn transfer_sleeps_for_computed_wait() {
        let clock = TestClock::at_minutes(100.0);
        let mut limiter = MaxRate::with_config(MaxRateConfig::new(2.0, 5.0), clock.clone()).unwrap();
        limiter.transfer(10.0).unwrap();

        let expected = limiter.wait_time(3.0).unwrap();
        assert!(close_enough(as_minutes(expected), 1.5));

        limiter.transfer(3.0).unwrap();
        assert!(close_enough(clock.minutes() - 100.0, 1.5));
        assert!(close_enough(limiter.transferred(), 13.0));
    }

    #[test]
    fn sustained_transfers_hold_the_rate() {
        let clock = TestClock::at_minutes(1000.0);
        let mut limiter = MaxRate::with_config(MaxRateConfig::new(10.0, 1.0), clock.clone()).unwrap();

        let start = clock.minutes();
        for _ in 0..50 {
            limiter.transfer(5.0).unwrap();
        }
        let elapsed = clock.minutes() - start;

        // 250 units at 10/min: the first interval is a free burst of 10
        assert!(elapsed >= 23.9, "finished too fast: {elapsed} minutes");
        assert!(limiter.average_rate().unwrap() <= 10.0 + 1e-9);
    }

    #[test]
    fn record_never_waits() {
        let clock = TestClock::at_minutes(100.0);
        let mut limiter = MaxRate::with_config(MaxRateConfig::new(1.0, 1.0), clock.clone()).unwrap();

        limiter.record(50.0).unwrap();
        limiter.record(50.0).unwrap();

        assert_eq!(clock.minutes(), 100.0);
        assert_eq!(limiter.transferred(), 100.0);
    }

    #[test]
    fn transfer_blocks_on_system_clock() {
        // 60/min over one second: capacity 1, 0.03 over capacity is 30ms
        let config = MaxRateConfig::new(60.0, 1.0 / 60.0);
        let mut limiter = MaxRate::with_config(config, SystemClock).unwrap();
        limiter.record(1.0).unwrap();

        let expected = limiter.wait_time(0.03).unwrap();
        assert!(expected > Duration::ZERO);

        let started = Instant::now();
        limiter.transfer(0.03).unwrap();
        assert!(started.elapsed() + Duration::from_millis(1) >= expected);
    }
}
