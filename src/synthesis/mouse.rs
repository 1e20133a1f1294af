//! Mouse trajectory planning
//!
//! Produces a fully timed cursor path from profile statistics: duration
//! from the Fitts coefficients, shape from a curvature-offset cubic
//! Bezier, an ease-in/out velocity envelope, tremor-scale jitter on the
//! interior points, and probabilistic overshoot with a correction back to
//! the exact target.

use crate::analysis::fitts::DEFAULT_TARGET_WIDTH;
use crate::profile::Profile;
use crate::time::FatigueClock;

use super::bezier;
use super::rng::SynthRng;

/// Duration noise fraction at strictness 0
const DURATION_NOISE_FRACTION: f64 = 0.15;
/// Fraction of jitter amplitude applied to interior trajectory points
const JITTER_SCALE: f64 = 0.5;
/// Pre-click hesitation when the profile carries no better signal
const PRE_CLICK_PAUSE_MEAN_MS: f64 = 120.0;
const PRE_CLICK_PAUSE_STD_MS: f64 = 40.0;
/// Extra time spent on the overshoot excursion, fraction of base duration
const OVERSHOOT_TIME_FRACTION: f64 = 0.12;
/// Trajectory sampling bounds
const MIN_PATH_POINTS: usize = 8;
const MAX_PATH_POINTS: usize = 96;

/// A trajectory sample with its dispatch offset from action start
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedPoint {
    pub x: f64,
    pub y: f64,
    /// Milliseconds from the start of the action
    pub t_ms: f64,
}

/// A planned pointer movement ending in a click-ready state
#[derive(Debug, Clone)]
pub struct MouseAction {
    /// Timed path samples; first is the start, last is the exact target
    pub points: Vec<TimedPoint>,
    pub target: (f64, f64),
    /// Total movement time, excluding the pre-click pause
    pub duration_ms: f64,
    /// Bezier control points the path was sampled from
    pub control_points: [(f64, f64); 2],
    /// Peak of the overshoot excursion, when one was injected
    pub overshoot_point: Option<(f64, f64)>,
    /// Hesitation between arrival and the press
    pub pre_click_pause_ms: f64,
    /// Press-to-release time for the subsequent click
    pub click_duration_ms: f64,
}

/// Plans movements against a profile
#[derive(Default)]
pub struct MousePlanner {
    fatigue: Option<FatigueClock>,
}

impl MousePlanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable session-length slowdown from the given clock
    pub fn with_fatigue(mut self, clock: FatigueClock) -> Self {
        self.fatigue = Some(clock);
        self
    }

    /// Plan a movement from `start` to `end` against a target of the
    /// given width. A zero-distance request yields a single-point,
    /// zero-duration action rather than a degenerate curve.
    pub fn plan_movement(
        &self,
        profile: &Profile,
        start: (f64, f64),
        end: (f64, f64),
        target_width: f64,
        rng: &mut SynthRng,
    ) -> MouseAction {
        let dx = end.0 - start.0;
        let dy = end.1 - start.1;
        let distance = (dx * dx + dy * dy).sqrt();

        let click_duration_ms = rng
            .gaussian(
                profile.mouse.click_duration_mean,
                profile.mouse.click_duration_std,
            )
            .max(1.0);
        let pre_click_pause_ms = rng
            .gaussian(PRE_CLICK_PAUSE_MEAN_MS, PRE_CLICK_PAUSE_STD_MS)
            .max(0.0);

        if distance == 0.0 {
            return MouseAction {
                points: vec![TimedPoint {
                    x: start.0,
                    y: start.1,
                    t_ms: 0.0,
                }],
                target: end,
                duration_ms: 0.0,
                control_points: [start, start],
                overshoot_point: None,
                pre_click_pause_ms,
                click_duration_ms,
            };
        }

        let width = if target_width > 0.0 {
            target_width
        } else {
            DEFAULT_TARGET_WIDTH
        };
        let strictness = profile.advanced.strictness.clamp(0.0, 1.0);

        // Fitts base duration with looseness-scaled noise and fatigue
        let base = profile.mouse.fitts_a
            + profile.mouse.fitts_b * (distance / width + 1.0).log2();
        let noise_std = base * DURATION_NOISE_FRACTION * (1.0 - strictness);
        let mut duration_ms = rng.gaussian(base, noise_std).max(1.0);
        if let Some(clock) = &self.fatigue {
            duration_ms *= clock.factor(profile.advanced.fatigue_degradation_rate);
        }

        // Curvature offset perpendicular to the chord, random side
        let curvature = rng
            .gaussian(
                profile.mouse.curvature_mean,
                profile.mouse.curvature_std,
            )
            .max(1.0);
        let offset = (curvature - 1.0) * distance * 0.75 * rng.sign();
        let (c1, c2) = bezier::chord_controls(start, end, offset);

        let steps = ((distance / 8.0) as usize).clamp(MIN_PATH_POINTS, MAX_PATH_POINTS);
        let jitter_std = profile.mouse.jitter_amplitude * JITTER_SCALE;

        let mut points = Vec::with_capacity(steps + 3);
        for i in 0..=steps {
            let s = i as f64 / steps as f64;
            let u = bezier::ease_in_out(s);
            let (mut x, mut y) = bezier::cubic_point(start, c1, c2, end, u);
            // Endpoints are exact; tremor only on interior points
            if i > 0 && i < steps {
                x += rng.gaussian(0.0, jitter_std);
                y += rng.gaussian(0.0, jitter_std);
            }
            points.push(TimedPoint {
                x,
                y,
                t_ms: s * duration_ms,
            });
        }

        // Overshoot: sail past the target along the final heading, then
        // correct back to the exact endpoint
        let mut overshoot_point = None;
        if rng.chance(profile.mouse.overshoot_rate * strictness) {
            let magnitude = rng
                .gaussian(
                    profile.mouse.overshoot_distance_mean,
                    profile.mouse.overshoot_distance_mean * 0.3,
                )
                .max(1.0);
            let (ux, uy) = (dx / distance, dy / distance);
            let peak = (end.0 + ux * magnitude, end.1 + uy * magnitude);
            let extra = duration_ms * OVERSHOOT_TIME_FRACTION;
            points.push(TimedPoint {
                x: peak.0,
                y: peak.1,
                t_ms: duration_ms + extra,
            });
            points.push(TimedPoint {
                x: end.0,
                y: end.1,
                t_ms: duration_ms + 2.0 * extra,
            });
            duration_ms += 2.0 * extra;
            overshoot_point = Some(peak);
        }

        MouseAction {
            points,
            target: end,
            duration_ms,
            control_points: [c1, c2],
            overshoot_point,
            pre_click_pause_ms,
            click_duration_ms,
        }
    }
}
