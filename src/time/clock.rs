//! Monotonic session clock
//!
//! All event timestamps are milliseconds since a process-wide anchor taken
//! the first time the clock is initialized. Using a single anchor keeps
//! timestamps monotonic non-decreasing within a recording session and makes
//! elapsed-time arithmetic a plain subtraction.

use std::sync::OnceLock;
use std::time::Instant;

/// Global anchor, initialized once at startup
static ANCHOR: OnceLock<Instant> = OnceLock::new();

/// Process-wide monotonic clock
///
/// This struct provides:
/// - Millisecond-precision timestamps as `f64`
/// - Monotonic guarantees (time never goes backward)
/// - Zero state on the caller side; the anchor lives in a `OnceLock`
#[derive(Debug, Clone, Copy)]
pub struct SessionClock;

impl SessionClock {
    /// Initialize the clock. Call once at startup; later calls are no-ops.
    pub fn init() {
        ANCHOR.get_or_init(Instant::now);
    }

    /// Milliseconds since the anchor. Initializes the anchor on first use.
    #[inline]
    pub fn now_ms() -> f64 {
        let anchor = ANCHOR.get_or_init(Instant::now);
        anchor.elapsed().as_secs_f64() * 1_000.0
    }

    /// Elapsed milliseconds between two timestamps.
    /// Returns 0 if `end < start` rather than going negative.
    #[inline]
    pub fn elapsed_ms(start_ms: f64, end_ms: f64) -> f64 {
        if end_ms >= start_ms {
            end_ms - start_ms
        } else {
            0.0
        }
    }
}

/// Append-only fatigue timer
///
/// Started once at session begin; synthesis calls read elapsed time but
/// never mutate it. The fatigue factor applied to movement durations grows
/// linearly with elapsed hours.
#[derive(Debug, Clone, Copy)]
pub struct FatigueClock {
    started: Instant,
}

impl FatigueClock {
    /// Start the timer at session begin
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Hours elapsed since the session started
    #[inline]
    pub fn elapsed_hours(&self) -> f64 {
        self.started.elapsed().as_secs_f64() / 3_600.0
    }

    /// Fatigue multiplier: `1 + elapsed_hours * degradation_rate`.
    /// Monotonically increasing over a session.
    #[inline]
    pub fn factor(&self, degradation_rate: f64) -> f64 {
        1.0 + self.elapsed_hours() * degradation_rate
    }
}
