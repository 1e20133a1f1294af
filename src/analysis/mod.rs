//! Statistical analysis of captured event streams
//!
//! The pipeline is a pure batch transformation: raw events are segmented,
//! kinematic and typing statistics are extracted, and the result is a
//! [`Profile`](crate::profile::Profile). No I/O and no wall-clock reads
//! happen here, so the same event log always yields the same statistics.

pub mod analyzer;
pub mod fitts;
pub mod keyboard;
pub mod mouse;
pub mod stats;

pub use analyzer::Analyzer;
pub use fitts::FittsFit;
pub use keyboard::KeyboardAnalyzer;
pub use mouse::MouseAnalyzer;
