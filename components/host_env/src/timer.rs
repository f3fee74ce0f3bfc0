//! Host clocks.
//!
//! Each host reads time in its own representation: a process runtime reports
//! `[seconds, nanoseconds]` pairs, a page reports fractional milliseconds, a
//! shell only has whole milliseconds. [`Timer::elapsed`] turns any pair of
//! readings from the same clock into a [`Duration`], so callers never look at
//! the raw representation.

use std::time::{Duration, Instant};

/// A raw clock reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Timestamp {
    /// `hrtime`-style reading: whole seconds plus nanoseconds
    HrTime {
        /// Whole seconds since the clock origin
        secs: u64,
        /// Nanoseconds past `secs`
        nanos: u32,
    },
    /// Milliseconds since the clock origin
    Millis(f64),
}

impl Timestamp {
    fn as_millis(self) -> f64 {
        match self {
            Timestamp::HrTime { secs, nanos } => secs as f64 * 1000.0 + f64::from(nanos) / 1e6,
            Timestamp::Millis(ms) => ms,
        }
    }
}

/// Computes the non-negative duration between two readings.
///
/// Readings in `HrTime` form are subtracted exactly; anything else goes
/// through milliseconds. A reversed pair yields zero.
pub fn between(start: Timestamp, end: Timestamp) -> Duration {
    match (start, end) {
        (
            Timestamp::HrTime {
                secs: s_secs,
                nanos: s_nanos,
            },
            Timestamp::HrTime {
                secs: e_secs,
                nanos: e_nanos,
            },
        ) => {
            let start = Duration::new(s_secs, s_nanos);
            let end = Duration::new(e_secs, e_nanos);
            end.saturating_sub(start)
        }
        (start, end) => {
            let ms = end.as_millis() - start.as_millis();
            if ms.is_finite() && ms > 0.0 {
                Duration::from_secs_f64(ms / 1000.0)
            } else {
                Duration::ZERO
            }
        }
    }
}

/// A monotonic clock provided by the host.
pub trait Timer {
    /// Reads the clock.
    fn now(&self) -> Timestamp;

    /// Duration between two readings of this clock.
    fn elapsed(&self, start: Timestamp, end: Timestamp) -> Duration {
        between(start, end)
    }

    /// Duration between `start` and now.
    fn since(&self, start: Timestamp) -> Duration {
        self.elapsed(start, self.now())
    }
}

/// `hrtime`-style clock of a process runtime.
#[derive(Debug, Clone, Copy)]
pub struct HrTimer {
    origin: Instant,
}

impl HrTimer {
    /// Creates a clock whose origin is now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for HrTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer for HrTimer {
    fn now(&self) -> Timestamp {
        let elapsed = self.origin.elapsed();
        Timestamp::HrTime {
            secs: elapsed.as_secs(),
            nanos: elapsed.subsec_nanos(),
        }
    }
}

/// `performance.now()`-style clock of a page.
#[derive(Debug, Clone, Copy)]
pub struct PerformanceTimer {
    origin: Instant,
}

impl PerformanceTimer {
    /// Creates a clock whose origin is now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for PerformanceTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer for PerformanceTimer {
    fn now(&self) -> Timestamp {
        Timestamp::Millis(self.origin.elapsed().as_secs_f64() * 1000.0)
    }
}

/// Whole-millisecond clock, the only one a bare shell guarantees.
#[derive(Debug, Clone, Copy)]
pub struct DateTimer {
    origin: Instant,
}

impl DateTimer {
    /// Creates a clock whose origin is now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for DateTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer for DateTimer {
    fn now(&self) -> Timestamp {
        Timestamp::Millis(self.origin.elapsed().as_millis() as f64)
    }
}
