//! Core types for event capture
//!
//! Defines the raw event union used throughout the pipeline and the
//! listener capability the platform input hook must satisfy.

use serde::{Deserialize, Serialize};

/// Mouse button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

/// Raw input event as delivered by the platform listener
///
/// Timestamps (`t`) are milliseconds on the session clock and are monotonic
/// non-decreasing within one recording session. Events are immutable and
/// transient; only statistics derived from them are persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RawEvent {
    /// Pointer moved to an absolute screen position
    Move { x: f64, y: f64, t: f64 },
    /// Button pressed or released at a position
    Click {
        x: f64,
        y: f64,
        button: MouseButton,
        pressed: bool,
        t: f64,
    },
    /// Wheel/trackpad scroll
    Scroll { dx: f64, dy: f64, t: f64 },
    /// Key pressed (`down = true`) or released
    Key { code: u32, down: bool, t: f64 },
}

impl RawEvent {
    /// Timestamp of the event, milliseconds on the session clock
    pub fn timestamp(&self) -> f64 {
        match self {
            RawEvent::Move { t, .. }
            | RawEvent::Click { t, .. }
            | RawEvent::Scroll { t, .. }
            | RawEvent::Key { t, .. } => *t,
        }
    }

    /// Check if this is a pointer movement event
    pub fn is_move(&self) -> bool {
        matches!(self, RawEvent::Move { .. })
    }

    /// Check if this is a button press (not a release)
    pub fn is_press(&self) -> bool {
        matches!(self, RawEvent::Click { pressed: true, .. })
    }

    /// Check if this is a keyboard event
    pub fn is_key(&self) -> bool {
        matches!(self, RawEvent::Key { .. })
    }

    /// Pointer coordinates, if the event carries any
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match self {
            RawEvent::Move { x, y, .. } | RawEvent::Click { x, y, .. } => Some((*x, *y)),
            _ => None,
        }
    }
}

/// Listener capability supplied by a platform input-hook collaborator
///
/// Implementations deliver raw events from their own thread; the methods
/// must be cheap since they run on the hot capture path. A mock
/// implementation satisfies this trait for tests.
pub trait InputListener: Send {
    /// Begin delivering events to `sink`. Returns an error when the
    /// backend is unavailable on this platform.
    fn attach(&mut self, sink: Box<dyn FnMut(RawEvent) + Send>) -> crate::Result<()>;

    /// Stop delivering events. Must be idempotent.
    fn detach(&mut self);
}

/// No-op listener used when no capture backend exists
///
/// Attaching always succeeds and never delivers events, so downstream code
/// degrades to an empty recording instead of failing outright.
#[derive(Debug, Default)]
pub struct NullListener;

impl InputListener for NullListener {
    fn attach(&mut self, _sink: Box<dyn FnMut(RawEvent) + Send>) -> crate::Result<()> {
        Ok(())
    }

    fn detach(&mut self) {}
}
