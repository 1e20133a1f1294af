//! Synthesis of human-plausible input sequences
//!
//! Planners turn a [`Profile`](crate::profile::Profile) into concrete,
//! fully timed actions: a mouse trajectory with curvature, jitter, and
//! optional overshoot, or a keystroke sequence with digraph-aware delays
//! and occasional corrected typos. All randomness flows through one
//! injectable [`SynthRng`]; the same seed reproduces the same action
//! bit for bit.

pub mod bezier;
pub mod keyboard;
pub mod mouse;
pub mod qwerty;
pub mod rng;

pub use keyboard::{InjectedTypo, KeyTiming, KeyboardAction, KeyboardPlanner, TypingContext};
pub use mouse::{MouseAction, MousePlanner, TimedPoint};
pub use rng::SynthRng;
