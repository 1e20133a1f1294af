//! Descriptive statistics and IKI distribution fitting
//!
//! Small numeric helpers shared by the mouse and keyboard analyzers, plus
//! the inter-key-interval distribution selector. The gamma log-density
//! needs `ln_gamma`; with the `precise-stats` feature it comes from
//! `statrs`, otherwise a Lanczos approximation is used. Both paths share
//! the same signature and the same tests.

use crate::profile::IkiDistribution;

/// Histogram resolution for the empirical density used in fitting
const FIT_BINS: usize = 20;
/// Below this many samples no fit is attempted
const MIN_FIT_SAMPLES: usize = 30;

/// Arithmetic mean; 0.0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator); 0.0 under two samples
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}

/// Percentile by linear interpolation between closest ranks; p in 0..100
pub fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    if sorted.len() == 1 {
        return sorted[0];
    }
    let rank = (p / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Root mean square of a slice; 0.0 when empty
pub fn rms(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    (values.iter().map(|v| v * v).sum::<f64>() / values.len() as f64).sqrt()
}

#[cfg(feature = "precise-stats")]
fn ln_gamma(x: f64) -> f64 {
    statrs::function::gamma::ln_gamma(x)
}

/// Lanczos approximation (g = 7, n = 9), accurate to ~1e-13 for x > 0
#[cfg(not(feature = "precise-stats"))]
fn ln_gamma(x: f64) -> f64 {
    const COEFFS: [f64; 9] = [
        0.999_999_999_999_809_93,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_1,
        -176.615_029_162_140_6,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_572e-6,
        1.505_632_735_149_311_6e-7,
    ];
    if x < 0.5 {
        // Reflection formula
        let pi = std::f64::consts::PI;
        return (pi / (pi * x).sin()).ln() - ln_gamma(1.0 - x);
    }
    let x = x - 1.0;
    let mut acc = COEFFS[0];
    for (i, c) in COEFFS.iter().enumerate().skip(1) {
        acc += c / (x + i as f64);
    }
    let t = x + 7.5;
    0.5 * (2.0 * std::f64::consts::PI).ln() + (x + 0.5) * t.ln() - t + acc.ln()
}

fn normal_pdf(x: f64, mu: f64, sigma: f64) -> f64 {
    if sigma <= 0.0 {
        return 0.0;
    }
    let z = (x - mu) / sigma;
    (-0.5 * z * z).exp() / (sigma * (2.0 * std::f64::consts::PI).sqrt())
}

fn lognormal_pdf(x: f64, mu: f64, sigma: f64) -> f64 {
    if x <= 0.0 || sigma <= 0.0 {
        return 0.0;
    }
    let z = (x.ln() - mu) / sigma;
    (-0.5 * z * z).exp() / (x * sigma * (2.0 * std::f64::consts::PI).sqrt())
}

fn gamma_pdf(x: f64, shape: f64, scale: f64) -> f64 {
    if x <= 0.0 || shape <= 0.0 || scale <= 0.0 {
        return 0.0;
    }
    ((shape - 1.0) * x.ln() - x / scale - ln_gamma(shape) - shape * scale.ln()).exp()
}

/// Pick the distribution family that best matches the IKI samples.
///
/// Candidates are fit by moments (normal: sample mean/std; log-normal:
/// mean/std of ln(x); gamma: shape = mean²/var, scale = var/mean) and
/// scored by residual sum of squares against a 20-bin empirical density.
/// Fewer than 30 samples, or degenerate variance, falls back to
/// log-normal without fitting.
pub fn fit_iki_distribution(samples: &[f64]) -> IkiDistribution {
    if samples.len() < MIN_FIT_SAMPLES {
        return IkiDistribution::Lognormal;
    }
    let positive: Vec<f64> = samples.iter().copied().filter(|&v| v > 0.0).collect();
    if positive.len() < MIN_FIT_SAMPLES {
        return IkiDistribution::Lognormal;
    }

    let m = mean(&positive);
    let s = std_dev(&positive);
    if s <= f64::EPSILON {
        return IkiDistribution::Lognormal;
    }
    let var = s * s;

    let logs: Vec<f64> = positive.iter().map(|v| v.ln()).collect();
    let log_mu = mean(&logs);
    let log_sigma = std_dev(&logs);

    let shape = m * m / var;
    let scale = var / m;

    let (centers, density) = empirical_density(&positive);
    let rss = |pdf: &dyn Fn(f64) -> f64| -> f64 {
        centers
            .iter()
            .zip(&density)
            .map(|(&x, &d)| (d - pdf(x)).powi(2))
            .sum()
    };

    let candidates = [
        (IkiDistribution::Normal, rss(&|x| normal_pdf(x, m, s))),
        (
            IkiDistribution::Lognormal,
            rss(&|x| lognormal_pdf(x, log_mu, log_sigma)),
        ),
        (IkiDistribution::Gamma, rss(&|x| gamma_pdf(x, shape, scale))),
    ];

    candidates
        .into_iter()
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(dist, _)| dist)
        .unwrap_or_default()
}

/// Bin centers and normalized density over [min, max] of the samples
fn empirical_density(samples: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = (max - min) / FIT_BINS as f64;
    if width <= 0.0 {
        return (vec![min], vec![1.0]);
    }

    let mut counts = vec![0usize; FIT_BINS];
    for &v in samples {
        let idx = (((v - min) / width) as usize).min(FIT_BINS - 1);
        counts[idx] += 1;
    }
    let total = samples.len() as f64;
    let centers = (0..FIT_BINS)
        .map(|i| min + (i as f64 + 0.5) * width)
        .collect();
    let density = counts
        .iter()
        .map(|&c| c as f64 / (total * width))
        .collect();
    (centers, density)
}
