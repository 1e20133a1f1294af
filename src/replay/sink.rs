//! Injection sink abstraction
//!
//! The engine dispatches through this trait so replay logic stays
//! independent of any OS input backend. [`MockSink`] records every call
//! for assertions and can fail on demand.

use crate::capture::MouseButton;

/// Receives injected input events
pub trait InjectionSink: Send {
    /// Move the pointer by a delta
    fn move_relative(&mut self, dx: f64, dy: f64) -> crate::Result<()>;
    /// Press or release a mouse button
    fn set_button(&mut self, button: MouseButton, pressed: bool) -> crate::Result<()>;
    /// Scroll by a wheel delta
    fn wheel(&mut self, dx: f64, dy: f64) -> crate::Result<()>;
    /// Press or release a key
    fn send_key(&mut self, code: u32, down: bool) -> crate::Result<()>;
}

/// One recorded sink invocation
#[derive(Debug, Clone, PartialEq)]
pub enum SinkCall {
    MoveRelative { dx: f64, dy: f64 },
    SetButton { button: MouseButton, pressed: bool },
    Wheel { dx: f64, dy: f64 },
    SendKey { code: u32, down: bool },
}

/// Test sink that records calls and optionally fails
#[derive(Debug, Default)]
pub struct MockSink {
    pub calls: Vec<SinkCall>,
    /// When set, the call at this index (0-based) returns an error
    pub fail_at: Option<usize>,
}

impl MockSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_at(index: usize) -> Self {
        Self {
            calls: Vec::new(),
            fail_at: Some(index),
        }
    }

    fn record(&mut self, call: SinkCall) -> crate::Result<()> {
        let index = self.calls.len();
        self.calls.push(call);
        if self.fail_at == Some(index) {
            return Err(crate::Error::Replay(format!(
                "injected failure at call {index}"
            )));
        }
        Ok(())
    }

    /// Count of key-down calls, handy in tests
    pub fn key_presses(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, SinkCall::SendKey { down: true, .. }))
            .count()
    }
}

impl InjectionSink for MockSink {
    fn move_relative(&mut self, dx: f64, dy: f64) -> crate::Result<()> {
        self.record(SinkCall::MoveRelative { dx, dy })
    }

    fn set_button(&mut self, button: MouseButton, pressed: bool) -> crate::Result<()> {
        self.record(SinkCall::SetButton { button, pressed })
    }

    fn wheel(&mut self, dx: f64, dy: f64) -> crate::Result<()> {
        self.record(SinkCall::Wheel { dx, dy })
    }

    fn send_key(&mut self, code: u32, down: bool) -> crate::Result<()> {
        self.record(SinkCall::SendKey { code, down })
    }
}
