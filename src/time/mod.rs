//! Session timing
//!
//! Provides the monotonic millisecond clock every captured event is stamped
//! with, and the append-only fatigue timer the synthesizer reads.

pub mod clock;

pub use clock::{FatigueClock, SessionClock};
