//! Fitts's Law regression over segmented movements
//!
//! Relates movement duration to the index of difficulty
//! `ID = log2(D/W + 1)` by ordinary least squares. The intercept `a` and
//! slope `b` later drive synthesized movement durations.

use crate::profile::{DEFAULT_FITTS_A, DEFAULT_FITTS_B};
use crate::segment::Movement;

/// Movements shorter than this carry no Fitts signal
pub const MIN_FITTS_DISTANCE: f64 = 10.0;
/// Below this many qualifying movements the fit reports defaults
pub const MIN_FITTS_SAMPLES: usize = 5;
/// Assumed target width when capture has no widget geometry
pub const DEFAULT_TARGET_WIDTH: f64 = 20.0;

/// Result of a Fitts regression
#[derive(Debug, Clone, Copy)]
pub struct FittsFit {
    /// Intercept (ms)
    pub a: f64,
    /// Slope (ms per bit)
    pub b: f64,
    /// Coefficient of determination in [0, 1]
    pub r2: f64,
    /// Qualifying movements behind the fit
    pub samples: usize,
}

impl FittsFit {
    fn defaults(samples: usize) -> Self {
        Self {
            a: DEFAULT_FITTS_A,
            b: DEFAULT_FITTS_B,
            r2: 0.0,
            samples,
        }
    }

    /// Regress duration on index of difficulty across movements.
    ///
    /// Movements with distance ≤ 10 px are excluded. Fewer than 5
    /// qualifying movements yields the default coefficients with r² = 0.
    pub fn fit(movements: &[Movement], target_width: f64) -> Self {
        let width = if target_width > 0.0 {
            target_width
        } else {
            DEFAULT_TARGET_WIDTH
        };

        let pairs: Vec<(f64, f64)> = movements
            .iter()
            .filter(|m| m.distance > MIN_FITTS_DISTANCE)
            .map(|m| ((m.distance / width + 1.0).log2(), m.duration_ms))
            .collect();

        if pairs.len() < MIN_FITTS_SAMPLES {
            return Self::defaults(pairs.len());
        }

        let n = pairs.len() as f64;
        let sum_x: f64 = pairs.iter().map(|(x, _)| x).sum();
        let sum_y: f64 = pairs.iter().map(|(_, y)| y).sum();
        let mean_x = sum_x / n;
        let mean_y = sum_y / n;

        let ss_xx: f64 = pairs.iter().map(|(x, _)| (x - mean_x).powi(2)).sum();
        let ss_xy: f64 = pairs
            .iter()
            .map(|(x, y)| (x - mean_x) * (y - mean_y))
            .sum();

        if ss_xx <= f64::EPSILON {
            // All movements share one index of difficulty; slope is unidentifiable
            return Self::defaults(pairs.len());
        }

        let b = ss_xy / ss_xx;
        let a = mean_y - b * mean_x;

        let ss_tot: f64 = pairs.iter().map(|(_, y)| (y - mean_y).powi(2)).sum();
        let ss_res: f64 = pairs
            .iter()
            .map(|(x, y)| (y - (a + b * x)).powi(2))
            .sum();
        let r2 = if ss_tot > f64::EPSILON {
            (1.0 - ss_res / ss_tot).clamp(0.0, 1.0)
        } else {
            0.0
        };

        Self {
            a,
            b,
            r2,
            samples: pairs.len(),
        }
    }

    /// Predicted duration for a given distance and target width
    pub fn predict_ms(&self, distance: f64, target_width: f64) -> f64 {
        let width = if target_width > 0.0 {
            target_width
        } else {
            DEFAULT_TARGET_WIDTH
        };
        (self.a + self.b * (distance / width + 1.0).log2()).max(0.0)
    }
}
