//! Pointer movement segments
//!
//! A [`Movement`] is a contiguous run of move points from a start position
//! to a terminating click or idle timeout. Movements are built incrementally
//! as points arrive, finalized once, consumed by the analyzer, and
//! discarded; only their derived statistics survive.

/// A single point on a pointer trajectory
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryPoint {
    pub x: f64,
    pub y: f64,
    /// Milliseconds on the session clock
    pub t: f64,
}

impl TrajectoryPoint {
    pub fn new(x: f64, y: f64, t: f64) -> Self {
        Self { x, y, t }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: &TrajectoryPoint) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Minimum points for a movement to be reported at all
pub const MIN_MOVEMENT_POINTS: usize = 3;

/// Margin by which an interior point must exceed the final distance to
/// count as an overshoot (fraction of the final distance)
const OVERSHOOT_MARGIN: f64 = 0.05;

/// A finalized pointer movement with derived kinematics
#[derive(Debug, Clone)]
pub struct Movement {
    /// Ordered trajectory points
    pub points: Vec<TrajectoryPoint>,
    /// Duration in milliseconds
    pub duration_ms: f64,
    /// Straight-line distance from start to end
    pub distance: f64,
    /// Total path length along the trajectory
    pub path_length: f64,
    /// Peak instantaneous velocity (px/s)
    pub peak_velocity: f64,
    /// Average velocity over the whole movement (px/s)
    pub avg_velocity: f64,
    /// Whether the pointer traveled past the endpoint before settling
    pub overshoot: bool,
    /// How far past the endpoint it traveled (px), 0 when no overshoot
    pub overshoot_distance: f64,
}

impl Movement {
    /// Start point of the movement
    pub fn start(&self) -> TrajectoryPoint {
        self.points[0]
    }

    /// End point of the movement
    pub fn end(&self) -> TrajectoryPoint {
        self.points[self.points.len() - 1]
    }

    /// Path curvature: path length over straight-line distance.
    /// Returns 1.0 for degenerate (zero-distance) movements.
    pub fn curvature(&self) -> f64 {
        if self.distance > f64::EPSILON {
            self.path_length / self.distance
        } else {
            1.0
        }
    }
}

/// Incremental movement accumulator
///
/// Collects points as move events arrive; `finalize` computes the derived
/// kinematics. Movements shorter than [`MIN_MOVEMENT_POINTS`] are discarded
/// by returning `None`.
#[derive(Debug, Default)]
pub struct MovementBuilder {
    points: Vec<TrajectoryPoint>,
}

impl MovementBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a point to the open movement
    pub fn push(&mut self, x: f64, y: f64, t: f64) {
        self.points.push(TrajectoryPoint::new(x, y, t));
    }

    /// Whether any points have accumulated
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of accumulated points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Timestamp of the most recent point, if any
    pub fn last_t(&self) -> Option<f64> {
        self.points.last().map(|p| p.t)
    }

    /// Finalize the accumulated points into a movement, resetting the
    /// builder. Degenerate runs (< 3 points) are discarded.
    pub fn finalize(&mut self) -> Option<Movement> {
        let points = std::mem::take(&mut self.points);
        if points.len() < MIN_MOVEMENT_POINTS {
            return None;
        }

        let start = points[0];
        let end = points[points.len() - 1];
        let duration_ms = (end.t - start.t).max(0.0);
        let distance = start.distance_to(&end);

        let mut path_length = 0.0;
        let mut peak_velocity: f64 = 0.0;
        for pair in points.windows(2) {
            let seg = pair[0].distance_to(&pair[1]);
            path_length += seg;
            let dt_s = (pair[1].t - pair[0].t) / 1_000.0;
            if dt_s > 1e-9 {
                peak_velocity = peak_velocity.max(seg / dt_s);
            }
        }

        let avg_velocity = if duration_ms > 0.0 {
            path_length / (duration_ms / 1_000.0)
        } else {
            0.0
        };

        // Overshoot: some interior point ended up farther from the start
        // than the final point, beyond the margin.
        let mut overshoot_distance: f64 = 0.0;
        for point in &points[1..points.len() - 1] {
            let d = start.distance_to(point);
            let excess = d - distance * (1.0 + OVERSHOOT_MARGIN);
            if excess > overshoot_distance {
                overshoot_distance = excess;
            }
        }
        let overshoot = overshoot_distance > 0.0;

        Some(Movement {
            points,
            duration_ms,
            distance,
            path_length,
            peak_velocity,
            avg_velocity,
            overshoot,
            overshoot_distance,
        })
    }

    /// Discard accumulated points without producing a movement
    pub fn clear(&mut self) {
        self.points.clear();
    }
}
