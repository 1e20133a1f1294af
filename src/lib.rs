//! # biomotor
//!
//! A behavioral motor-profile capture and synthesis engine. The library
//! records a human operator's pointer and keystroke timing, derives a
//! statistical motor-control profile from the recording, and later
//! synthesizes new pointer trajectories and keystroke plans that reproduce
//! the same statistical signature for an arbitrary target point or text.
//!
//! ## Quick Start
//!
//! ```no_run
//! use biomotor::time::SessionClock;
//! use biomotor::analysis::Analyzer;
//! use biomotor::synthesis::{MousePlanner, SynthRng};
//!
//! SessionClock::init();
//!
//! // Analyze a closed event log into a profile
//! let events = Vec::new(); // captured RawEvents
//! let profile = Analyzer::new().analyze(&events);
//!
//! // Plan a movement that statistically matches the profile
//! let mut rng = SynthRng::seeded(42);
//! let planner = MousePlanner::new();
//! let action = planner.plan_movement(&profile, (0.0, 0.0), (640.0, 400.0), 24.0, &mut rng);
//! println!("{} points over {} ms", action.points.len(), action.duration_ms);
//! ```
//!
//! ## Architecture
//!
//! - [`time`]: Monotonic session clock and fatigue timer
//! - [`capture`]: Event types, lock-free SPSC ring, recorder, NDJSON log
//! - [`segment`]: Movement and typing-session segmentation
//! - [`analysis`]: Fitts regression, kinematic/keystroke statistics, distribution fitting
//! - [`profile`]: Profile value objects, validation, weighted merge, persistence
//! - [`synthesis`]: Bezier trajectory and keystroke-plan generation
//! - [`replay`]: Timed playback against an injection sink
//! - [`fallback`]: Heuristic default profiles when no capture exists
//! - [`app`]: CLI and configuration management
//!
//! ## Event Pipeline
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │  Listener   │───▶│ Event Ring  │───▶│  Segmenter  │───▶│  Analyzer   │
//! │  (platform) │    │ (lock-free) │    │             │    │             │
//! └─────────────┘    └─────────────┘    └─────────────┘    └─────────────┘
//!                                                                 │
//!                                                                 ▼
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │  Injection  │◀───│   Replay    │◀───│ Synthesizer │◀───│   Profile   │
//! │    Sink     │    │   Engine    │    │             │    │             │
//! └─────────────┘    └─────────────┘    └─────────────┘    └─────────────┘
//! ```

pub mod time;
pub mod capture;
pub mod segment;
pub mod analysis;
pub mod profile;
pub mod synthesis;
pub mod replay;
pub mod fallback;
pub mod app;

// Re-export commonly used types
pub use capture::recorder::Recorder;
pub use capture::types::{InputListener, MouseButton, RawEvent};
pub use profile::store::ProfileStore;
pub use profile::types::{KeyboardProfile, MouseProfile, Profile};
pub use replay::{InjectionSink, ReplayEngine, ReplayResult};
pub use synthesis::{KeyboardAction, KeyboardPlanner, MouseAction, MousePlanner, SynthRng};

/// Result type alias for the engine
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the engine
///
/// Recoverable conditions (insufficient samples, missing profile files,
/// degenerate synthesis requests, individual replay dispatch failures) are
/// deliberately *not* variants here: they resolve to documented defaults,
/// warnings, or per-event records. Only structural and programmer errors
/// are hard failures.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Capture session already active")]
    CaptureBusy,

    #[error("Capture backend unavailable: {0}")]
    CaptureUnavailable(String),

    #[error("Profile shape mismatch: {0}")]
    ProfileShapeMismatch(String),

    #[error("Replay error: {0}")]
    Replay(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
