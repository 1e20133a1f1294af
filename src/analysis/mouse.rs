//! Mouse motor statistics
//!
//! Turns segmented movements, click samples, and the raw move stream into
//! a [`MouseProfile`]. Every statistic falls back to the profile defaults
//! when its sample count is below threshold; low data never errors.

use super::fitts::{FittsFit, MIN_FITTS_DISTANCE};
use super::stats;
use crate::capture::RawEvent;
use crate::profile::{MouseProfile, ACCEL_BINS};
use crate::segment::{ClickSample, Movement};

/// Curvature above this is a detour, not a pointing movement
const MAX_CURVATURE: f64 = 5.0;
/// Jitter window length
const JITTER_WINDOW_MS: f64 = 500.0;
/// Net displacement ceiling for a window to count as tremor, not travel
const JITTER_MAX_NET_DISPLACEMENT: f64 = 5.0;
/// Minimum samples in a jitter window
const JITTER_MIN_SAMPLES: usize = 5;

/// Extracts mouse statistics from segmented capture data
pub struct MouseAnalyzer {
    /// Assumed target width for the Fitts regression
    pub target_width: f64,
}

impl MouseAnalyzer {
    pub fn new(target_width: f64) -> Self {
        Self { target_width }
    }

    /// Build a mouse profile. `events` is the raw stream the movements
    /// were segmented from; it feeds the jitter extraction, which needs
    /// the stationary samples segmentation throws away.
    pub fn analyze(
        &self,
        movements: &[Movement],
        clicks: &[ClickSample],
        events: &[RawEvent],
    ) -> MouseProfile {
        let mut profile = MouseProfile::default();
        profile.movement_samples = movements.len() as u64;

        let fitts = FittsFit::fit(movements, self.target_width);
        profile.fitts_a = fitts.a;
        profile.fitts_b = fitts.b;
        profile.fitts_r2 = fitts.r2;

        let velocities: Vec<f64> = movements.iter().map(|m| m.avg_velocity).collect();
        if !velocities.is_empty() {
            profile.velocity_mean = stats::mean(&velocities);
            profile.velocity_std = stats::std_dev(&velocities);
        }

        let curvatures: Vec<f64> = movements
            .iter()
            .filter(|m| m.distance > MIN_FITTS_DISTANCE)
            .map(|m| m.curvature())
            .filter(|&c| c < MAX_CURVATURE)
            .collect();
        if !curvatures.is_empty() {
            profile.curvature_mean = stats::mean(&curvatures);
            profile.curvature_std = stats::std_dev(&curvatures);
        }

        if !movements.is_empty() {
            let overshooting: Vec<f64> = movements
                .iter()
                .filter(|m| m.overshoot)
                .map(|m| m.overshoot_distance)
                .collect();
            profile.overshoot_rate = overshooting.len() as f64 / movements.len() as f64;
            if !overshooting.is_empty() {
                profile.overshoot_distance_mean = stats::mean(&overshooting);
            }
        }

        if let Some((amplitude, frequency)) = extract_jitter(events) {
            profile.jitter_amplitude = amplitude;
            profile.jitter_frequency = frequency;
        }

        if let Some(bins) = acceleration_profile(movements) {
            profile.acceleration_profile = bins;
        }

        let holds: Vec<f64> = clicks.iter().filter_map(|c| c.hold_ms).collect();
        if !holds.is_empty() {
            profile.click_duration_mean = stats::mean(&holds);
            profile.click_duration_std = stats::std_dev(&holds);
        }
        let double_intervals: Vec<f64> = clicks
            .iter()
            .filter_map(|c| c.double_click_interval_ms)
            .collect();
        if !double_intervals.is_empty() {
            profile.double_click_interval_mean = stats::mean(&double_intervals);
            profile.double_click_interval_std = stats::std_dev(&double_intervals);
        }

        profile
    }
}

/// Tremor amplitude and frequency from near-stationary move windows.
///
/// Scans the raw move stream in windows of at most 500 ms. A window with
/// minimal net displacement is hand tremor; its RMS deviation from the
/// window centroid is the amplitude and samples over elapsed time the
/// frequency. Returns None when no window qualifies.
fn extract_jitter(events: &[RawEvent]) -> Option<(f64, f64)> {
    let moves: Vec<(f64, f64, f64)> = events
        .iter()
        .filter_map(|e| match e {
            RawEvent::Move { x, y, t } => Some((*x, *y, *t)),
            _ => None,
        })
        .collect();

    let mut amplitudes = Vec::new();
    let mut frequencies = Vec::new();
    let mut window: Vec<(f64, f64, f64)> = Vec::new();

    for &point in &moves {
        window.push(point);
        if point.2 - window[0].2 >= JITTER_WINDOW_MS {
            evaluate_window(&window, &mut amplitudes, &mut frequencies);
            window.clear();
        }
    }
    evaluate_window(&window, &mut amplitudes, &mut frequencies);

    if amplitudes.is_empty() {
        None
    } else {
        Some((stats::mean(&amplitudes), stats::mean(&frequencies)))
    }
}

fn evaluate_window(
    window: &[(f64, f64, f64)],
    amplitudes: &mut Vec<f64>,
    frequencies: &mut Vec<f64>,
) {
    if window.len() < JITTER_MIN_SAMPLES {
        return;
    }
    let (fx, fy, ft) = window[0];
    let (lx, ly, lt) = window[window.len() - 1];
    let net = ((lx - fx).powi(2) + (ly - fy).powi(2)).sqrt();
    let elapsed_ms = lt - ft;
    if net >= JITTER_MAX_NET_DISPLACEMENT || elapsed_ms <= 0.0 {
        return;
    }

    let n = window.len() as f64;
    let cx = window.iter().map(|p| p.0).sum::<f64>() / n;
    let cy = window.iter().map(|p| p.1).sum::<f64>() / n;
    let deviations: Vec<f64> = window
        .iter()
        .map(|p| ((p.0 - cx).powi(2) + (p.1 - cy).powi(2)).sqrt())
        .collect();

    amplitudes.push(stats::rms(&deviations));
    frequencies.push(n / (elapsed_ms / 1000.0));
}

/// Average normalized speed over 10 normalized-time bins.
///
/// Each movement's per-segment speeds are bucketed by normalized segment
/// midpoint time, averaged, then scaled so the peak bin is 1.0. Returns
/// None when no movement is usable.
fn acceleration_profile(movements: &[Movement]) -> Option<Vec<f64>> {
    let mut sums = vec![0.0f64; ACCEL_BINS];
    let mut counts = vec![0usize; ACCEL_BINS];
    let mut usable = false;

    for movement in movements {
        if movement.points.len() < 3 || movement.duration_ms <= 0.0 {
            continue;
        }
        let start_t = movement.points[0].t;
        // Per-movement speeds, normalized by the movement's own peak so
        // fast and slow movements contribute the same shape
        let mut speeds = Vec::with_capacity(movement.points.len() - 1);
        for pair in movement.points.windows(2) {
            let dt = pair[1].t - pair[0].t;
            if dt <= 0.0 {
                continue;
            }
            let d = pair[0].distance_to(&pair[1]);
            let mid = (pair[0].t + pair[1].t) / 2.0 - start_t;
            speeds.push((mid / movement.duration_ms, d / dt));
        }
        let peak = speeds.iter().map(|s| s.1).fold(0.0f64, f64::max);
        if peak <= 0.0 {
            continue;
        }
        usable = true;
        for (frac, speed) in speeds {
            let idx = ((frac * ACCEL_BINS as f64) as usize).min(ACCEL_BINS - 1);
            sums[idx] += speed / peak;
            counts[idx] += 1;
        }
    }

    if !usable {
        return None;
    }

    let mut bins: Vec<f64> = sums
        .iter()
        .zip(&counts)
        .map(|(&s, &c)| if c > 0 { s / c as f64 } else { 0.0 })
        .collect();
    let max = bins.iter().copied().fold(0.0f64, f64::max);
    if max > 0.0 {
        for b in &mut bins {
            *b /= max;
        }
    }
    Some(bins)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::MouseButton;
    use crate::segment::MovementBuilder;

    fn straight_movement(distance: f64, duration_ms: f64) -> Movement {
        let mut builder = MovementBuilder::new();
        for i in 0..=10 {
            let frac = f64::from(i) / 10.0;
            builder.push(frac * distance, 0.0, frac * duration_ms);
        }
        builder.finalize().unwrap()
    }

    fn click(hold_ms: f64) -> ClickSample {
        ClickSample {
            button: MouseButton::Left,
            pressed_at: 0.0,
            hold_ms: Some(hold_ms),
            double_click_interval_ms: None,
        }
    }

    #[test]
    fn test_empty_input_yields_defaults() {
        let profile = MouseAnalyzer::new(20.0).analyze(&[], &[], &[]);
        let defaults = MouseProfile::default();
        assert_eq!(profile.velocity_mean, defaults.velocity_mean);
        assert_eq!(profile.fitts_a, defaults.fitts_a);
        assert_eq!(profile.jitter_amplitude, defaults.jitter_amplitude);
        assert_eq!(profile.acceleration_profile, defaults.acceleration_profile);
        assert_eq!(profile.movement_samples, 0);
    }

    #[test]
    fn test_velocity_statistics() {
        // 200 px in 400 ms is 500 px/s average
        let movements = vec![straight_movement(200.0, 400.0); 3];
        let profile = MouseAnalyzer::new(20.0).analyze(&movements, &[], &[]);
        assert!((profile.velocity_mean - 500.0).abs() < 1e-6);
        assert!(profile.velocity_std.abs() < 1e-9);
        assert_eq!(profile.movement_samples, 3);
    }

    #[test]
    fn test_straight_movements_have_unit_curvature() {
        let movements = vec![straight_movement(300.0, 500.0); 2];
        let profile = MouseAnalyzer::new(20.0).analyze(&movements, &[], &[]);
        assert!((profile.curvature_mean - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_overshoot_rate() {
        let mut overshooting = MovementBuilder::new();
        // Past the endpoint at x = 130, back to 100
        for (i, &x) in [0.0, 40.0, 90.0, 130.0, 100.0].iter().enumerate() {
            overshooting.push(x, 0.0, i as f64 * 50.0);
        }
        let movements = vec![
            overshooting.finalize().unwrap(),
            straight_movement(200.0, 400.0),
        ];
        let profile = MouseAnalyzer::new(20.0).analyze(&movements, &[], &[]);
        assert!((profile.overshoot_rate - 0.5).abs() < 1e-9);
        assert!(profile.overshoot_distance_mean > 0.0);
    }

    #[test]
    fn test_click_statistics() {
        let clicks = vec![click(80.0), click(90.0), click(100.0)];
        let profile = MouseAnalyzer::new(20.0).analyze(&[], &clicks, &[]);
        assert!((profile.click_duration_mean - 90.0).abs() < 1e-9);
        assert!(profile.click_duration_std > 0.0);
    }

    #[test]
    fn test_jitter_from_stationary_tremor() {
        // 600 ms of sub-pixel wobble around (100, 100), 20 ms apart
        let events: Vec<RawEvent> = (0..30)
            .map(|i| RawEvent::Move {
                x: 100.0 + if i % 2 == 0 { 0.8 } else { -0.8 },
                y: 100.0,
                t: f64::from(i) * 20.0,
            })
            .collect();
        let profile = MouseAnalyzer::new(20.0).analyze(&[], &[], &events);
        assert!(profile.jitter_amplitude > 0.0);
        assert!(profile.jitter_amplitude < 2.0);
        // 50 samples per second
        assert!((profile.jitter_frequency - 50.0).abs() < 10.0);
    }

    #[test]
    fn test_travel_windows_do_not_count_as_jitter() {
        // Fast sweep across the screen; large net displacement per window
        let events: Vec<RawEvent> = (0..30)
            .map(|i| RawEvent::Move {
                x: f64::from(i) * 40.0,
                y: 0.0,
                t: f64::from(i) * 20.0,
            })
            .collect();
        let profile = MouseAnalyzer::new(20.0).analyze(&[], &[], &events);
        assert_eq!(
            profile.jitter_amplitude,
            MouseProfile::default().jitter_amplitude
        );
    }

    #[test]
    fn test_acceleration_profile_peaks_at_one() {
        let movements = vec![straight_movement(400.0, 600.0); 4];
        let profile = MouseAnalyzer::new(20.0).analyze(&movements, &[], &[]);
        assert_eq!(profile.acceleration_profile.len(), ACCEL_BINS);
        let max = profile
            .acceleration_profile
            .iter()
            .copied()
            .fold(0.0f64, f64::max);
        assert!((max - 1.0).abs() < 1e-9);
    }
}
