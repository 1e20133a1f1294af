//! Timed dispatch of recorded and synthesized input
//!
//! A [`ReplayEngine`] walks an event source in time order and drives an
//! [`InjectionSink`] at the source's original cadence, scaled by a speed
//! factor. Pause, resume, and stop are cooperative; dry-run computes the
//! schedule without touching the sink.

pub mod engine;
pub mod sink;

pub use engine::{ReplayControl, ReplayEngine, ReplayOptions, ReplayResult, ReplaySource};
pub use sink::{InjectionSink, MockSink, SinkCall};
