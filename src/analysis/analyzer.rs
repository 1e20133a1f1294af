//! Batch analysis entry point
//!
//! Glues segmentation to the mouse and keyboard analyzers and assembles
//! the final [`Profile`]. The statistics are a pure function of the event
//! slice; only the profile metadata (id, creation time) varies between
//! runs.

use crate::capture::RawEvent;
use crate::profile::Profile;
use crate::segment::{Segmenter, SegmenterConfig};

use super::fitts::DEFAULT_TARGET_WIDTH;
use super::keyboard::KeyboardAnalyzer;
use super::mouse::MouseAnalyzer;

/// One-shot analyzer over a captured event log
pub struct Analyzer {
    segmenter_config: SegmenterConfig,
    target_width: f64,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer {
    pub fn new() -> Self {
        Self {
            segmenter_config: SegmenterConfig::default(),
            target_width: DEFAULT_TARGET_WIDTH,
        }
    }

    pub fn with_config(segmenter_config: SegmenterConfig, target_width: f64) -> Self {
        Self {
            segmenter_config,
            target_width,
        }
    }

    /// Segment the events and derive a full profile.
    ///
    /// An empty or sparse log yields a profile of documented defaults,
    /// never an error.
    pub fn analyze(&self, events: &[RawEvent]) -> Profile {
        let segments = Segmenter::segment_all(self.segmenter_config.clone(), events);

        tracing::debug!(
            events = events.len(),
            movements = segments.movements.len(),
            typing_sessions = segments.typing_sessions.len(),
            clicks = segments.clicks.len(),
            "segmented event log"
        );

        let mut profile = Profile::with_defaults();
        profile.mouse =
            MouseAnalyzer::new(self.target_width).analyze(&segments.movements, &segments.clicks, events);
        profile.keyboard = KeyboardAnalyzer::analyze(&segments.typing_sessions);

        profile.metadata.session_count = 1;
        profile.metadata.event_count = events.len() as u64;

        profile.interaction.movement_count = segments.movements.len() as u64;
        profile.interaction.typing_session_count = segments.typing_sessions.len() as u64;
        if let (Some(first), Some(last)) = (events.first(), events.last()) {
            profile.interaction.total_capture_ms = last.timestamp() - first.timestamp();
        }

        profile
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::MouseButton;

    fn move_event(x: f64, y: f64, t: f64) -> RawEvent {
        RawEvent::Move { x, y, t }
    }

    fn click_pair(x: f64, y: f64, t: f64) -> [RawEvent; 2] {
        [
            RawEvent::Click {
                x,
                y,
                button: MouseButton::Left,
                pressed: true,
                t,
            },
            RawEvent::Click {
                x,
                y,
                button: MouseButton::Left,
                pressed: false,
                t: t + 85.0,
            },
        ]
    }

    #[test]
    fn test_empty_log_yields_default_profile() {
        let profile = Analyzer::new().analyze(&[]);
        let defaults = Profile::with_defaults();
        assert_eq!(profile.mouse.fitts_a, defaults.mouse.fitts_a);
        assert_eq!(profile.keyboard.wpm_mean, defaults.keyboard.wpm_mean);
        assert_eq!(profile.metadata.event_count, 0);
        assert_eq!(profile.interaction.movement_count, 0);
    }

    #[test]
    fn test_movements_and_clicks_flow_through() {
        let mut events = Vec::new();
        for i in 0..20 {
            events.push(move_event(f64::from(i) * 15.0, 0.0, f64::from(i) * 25.0));
        }
        events.extend(click_pair(285.0, 0.0, 500.0));

        let profile = Analyzer::new().analyze(&events);
        assert_eq!(profile.interaction.movement_count, 1);
        assert!((profile.mouse.click_duration_mean - 85.0).abs() < 1e-9);
        assert_eq!(profile.metadata.event_count, 22);
    }

    #[test]
    fn test_typing_flows_through() {
        let mut events = Vec::new();
        for i in 0..10u32 {
            let t = f64::from(i) * 180.0;
            events.push(RawEvent::Key {
                code: 4 + (i % 26),
                down: true,
                t,
            });
            events.push(RawEvent::Key {
                code: 4 + (i % 26),
                down: false,
                t: t + 95.0,
            });
        }
        let profile = Analyzer::new().analyze(&events);
        assert_eq!(profile.interaction.typing_session_count, 1);
        assert_eq!(profile.keyboard.keystroke_samples, 10);
        assert!((profile.keyboard.iki_mean - 180.0).abs() < 1e-9);
        assert!((profile.keyboard.hold_duration_mean - 95.0).abs() < 1e-9);
    }

    #[test]
    fn test_statistics_are_deterministic() {
        let mut events = Vec::new();
        for i in 0..50 {
            events.push(move_event(f64::from(i) * 11.0, f64::from(i) * 3.0, f64::from(i) * 20.0));
        }
        events.extend(click_pair(539.0, 147.0, 1_010.0));

        let a = Analyzer::new().analyze(&events);
        let b = Analyzer::new().analyze(&events);
        assert_eq!(a.mouse.velocity_mean, b.mouse.velocity_mean);
        assert_eq!(a.mouse.fitts_a, b.mouse.fitts_a);
        assert_eq!(a.mouse.acceleration_profile, b.mouse.acceleration_profile);
    }

    #[test]
    fn test_capture_span_recorded() {
        let events = vec![move_event(0.0, 0.0, 100.0), move_event(5.0, 5.0, 2_600.0)];
        let profile = Analyzer::new().analyze(&events);
        assert!((profile.interaction.total_capture_ms - 2_500.0).abs() < 1e-9);
    }
}
