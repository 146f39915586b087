//! Clock capability used for hour-of-day bucketing and history timestamps.
//!
//! The engine never reads the system time directly; every component that
//! needs "now" takes a [`Clock`], so tests can pin the hour (time-of-day
//! patterns, morning references) and timestamps (history retention,
//! responsiveness analysis).

use chrono::{DateTime, Local, TimeZone, Timelike};

/// Source of the current local time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;

    /// Current time as epoch milliseconds.
    fn now_ms(&self) -> i64 {
        self.now().timestamp_millis()
    }

    /// Local hour of day, `0..24`.
    fn hour(&self) -> u32 {
        self.now().hour()
    }
}

/// Wall-clock implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock frozen at a fixed instant.
#[derive(Debug, Clone)]
pub struct FixedClock(pub DateTime<Local>);

impl FixedClock {
    /// A fixed clock at the given hour of an arbitrary reference day.
    pub fn at_hour(hour: u32) -> Self {
        let instant = Local
            .with_ymd_and_hms(2025, 6, 2, hour, 0, 0)
            .earliest()
            .expect("valid reference instant");
        Self(instant)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_reports_requested_hour() {
        let clock = FixedClock::at_hour(7);
        assert_eq!(clock.hour(), 7);
        let clock = FixedClock::at_hour(21);
        assert_eq!(clock.hour(), 21);
    }

    #[test]
    fn test_now_ms_matches_now() {
        let clock = FixedClock::at_hour(12);
        assert_eq!(clock.now_ms(), clock.now().timestamp_millis());
    }
}
