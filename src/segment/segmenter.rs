//! Streaming event segmentation
//!
//! Consumes raw events in order and produces finalized movements, typing
//! sessions, and click timing samples. State is owned exclusively by the
//! caller's thread (the capture consumer during recording, or the analyzer
//! during a batch pass).

use super::movement::{Movement, MovementBuilder};
use super::typing::{TypingAccumulator, TypingSession};
use crate::capture::types::{MouseButton, RawEvent};
use std::collections::HashMap;

/// Press-to-press interval below which two clicks count as a double click
pub const DOUBLE_CLICK_WINDOW_MS: f64 = 500.0;

/// Segmentation thresholds
#[derive(Debug, Clone)]
pub struct SegmenterConfig {
    /// Idle gap that finalizes an open movement (ms)
    pub movement_timeout_ms: f64,
    /// Idle gap that finalizes an open typing session (ms)
    pub typing_idle_ms: f64,
    /// Maximum press-to-press gap for a digraph sample (ms)
    pub max_digraph_interval_ms: f64,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            movement_timeout_ms: 800.0,
            typing_idle_ms: 5_000.0,
            max_digraph_interval_ms: 2_000.0,
        }
    }
}

/// A click timing sample
#[derive(Debug, Clone, Copy)]
pub struct ClickSample {
    pub button: MouseButton,
    /// Press timestamp (ms)
    pub pressed_at: f64,
    /// Press-to-release duration (ms); None if the release was never seen
    pub hold_ms: Option<f64>,
    /// Interval from the previous press of the same button, when it falls
    /// inside the double-click window
    pub double_click_interval_ms: Option<f64>,
}

/// Everything a segmentation pass produces
#[derive(Debug, Default)]
pub struct SegmentOutput {
    pub movements: Vec<Movement>,
    pub typing_sessions: Vec<TypingSession>,
    pub clicks: Vec<ClickSample>,
}

/// Streaming segmenter
pub struct Segmenter {
    config: SegmenterConfig,
    movement: MovementBuilder,
    typing: TypingAccumulator,
    output: SegmentOutput,
    /// Open button presses awaiting release: button -> press timestamp
    pending_clicks: HashMap<MouseButton, f64>,
    /// Previous press timestamp per button, for double-click intervals
    last_press: HashMap<MouseButton, f64>,
}

impl Segmenter {
    pub fn new(config: SegmenterConfig) -> Self {
        let typing = TypingAccumulator::new(config.max_digraph_interval_ms);
        Self {
            config,
            movement: MovementBuilder::new(),
            typing,
            output: SegmentOutput::default(),
            pending_clicks: HashMap::new(),
            last_press: HashMap::new(),
        }
    }

    /// Feed the next event. Events must arrive in timestamp order.
    pub fn feed(&mut self, event: &RawEvent) {
        self.check_timeouts(event.timestamp());

        match event {
            RawEvent::Move { x, y, t } => {
                self.movement.push(*x, *y, *t);
            }
            RawEvent::Click {
                button, pressed, t, ..
            } => {
                if *pressed {
                    // A press terminates the open movement; the movement
                    // keeps only the points that preceded the click
                    if let Some(movement) = self.movement.finalize() {
                        self.output.movements.push(movement);
                    }

                    let double_click_interval_ms = self
                        .last_press
                        .get(button)
                        .map(|prev| t - prev)
                        .filter(|gap| *gap < DOUBLE_CLICK_WINDOW_MS);
                    self.last_press.insert(*button, *t);
                    self.pending_clicks.insert(*button, *t);
                    self.output.clicks.push(ClickSample {
                        button: *button,
                        pressed_at: *t,
                        hold_ms: None,
                        double_click_interval_ms,
                    });
                } else if let Some(pressed_at) = self.pending_clicks.remove(button) {
                    if let Some(sample) = self
                        .output
                        .clicks
                        .iter_mut()
                        .rev()
                        .find(|c| c.button == *button && c.hold_ms.is_none())
                    {
                        sample.hold_ms = Some((t - pressed_at).max(0.0));
                    }
                }
            }
            RawEvent::Key { code, down, t } => {
                if *down {
                    self.typing.press(*code, *t);
                } else {
                    self.typing.release(*code, *t);
                }
            }
            RawEvent::Scroll { .. } => {
                // Scrolls neither extend nor terminate a movement
            }
        }
    }

    /// Finalize idle segments given the current timestamp
    fn check_timeouts(&mut self, now_ms: f64) {
        if let Some(last_t) = self.movement.last_t() {
            if now_ms - last_t > self.config.movement_timeout_ms {
                if let Some(movement) = self.movement.finalize() {
                    self.output.movements.push(movement);
                } // below-minimum runs are discarded by finalize
            }
        }
        if let Some(gap) = self.typing.gap_since_last(now_ms) {
            if gap > self.config.typing_idle_ms {
                if let Some(session) = self.typing.finalize() {
                    self.output.typing_sessions.push(session);
                }
            }
        }
    }

    /// Close all open segments and return everything produced
    pub fn finish(mut self) -> SegmentOutput {
        if let Some(movement) = self.movement.finalize() {
            self.output.movements.push(movement);
        }
        if let Some(session) = self.typing.finalize() {
            self.output.typing_sessions.push(session);
        }
        self.output
    }

    /// Run a whole closed event log through a fresh segmenter
    pub fn segment_all(config: SegmenterConfig, events: &[RawEvent]) -> SegmentOutput {
        let mut segmenter = Segmenter::new(config);
        for event in events {
            segmenter.feed(event);
        }
        segmenter.finish()
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new(SegmenterConfig::default())
    }
}
