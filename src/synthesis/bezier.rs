//! Cubic Bezier evaluation and easing
//!
//! Geometry helpers for trajectory shaping. A planned movement is a cubic
//! curve from start to target whose control points sit at 33% and 67% of
//! the chord, pushed perpendicular to it; time runs through an
//! ease-in/out warp so speed peaks mid-movement.

/// Point on a cubic Bezier at parameter u in [0, 1]
pub fn cubic_point(
    p0: (f64, f64),
    c1: (f64, f64),
    c2: (f64, f64),
    p3: (f64, f64),
    u: f64,
) -> (f64, f64) {
    let v = 1.0 - u;
    let b0 = v * v * v;
    let b1 = 3.0 * v * v * u;
    let b2 = 3.0 * v * u * u;
    let b3 = u * u * u;
    (
        b0 * p0.0 + b1 * c1.0 + b2 * c2.0 + b3 * p3.0,
        b0 * p0.1 + b1 * c1.1 + b2 * c2.1 + b3 * p3.1,
    )
}

/// Quadratic ease-in/out; monotonic on [0, 1] with f(0)=0, f(1)=1
pub fn ease_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// Control points for the chord from `start` to `end`, offset
/// perpendicular to it by `offset` (signed, pixels)
pub fn chord_controls(
    start: (f64, f64),
    end: (f64, f64),
    offset: f64,
) -> ((f64, f64), (f64, f64)) {
    let dx = end.0 - start.0;
    let dy = end.1 - start.1;
    let len = (dx * dx + dy * dy).sqrt();
    let (nx, ny) = if len > 0.0 {
        (-dy / len, dx / len)
    } else {
        (0.0, 0.0)
    };
    let at = |frac: f64| {
        (
            start.0 + dx * frac + nx * offset,
            start.1 + dy * frac + ny * offset,
        )
    };
    (at(0.33), (at(0.67)))
}
