//! Residual timing error statistics.

use contracts::{AlignmentResult, JitterStatistics};

/// Percentile reported alongside the worst case
pub const JITTER_PERCENTILE: f64 = 95.0;

/// Compute max and p95 jitter from an alignment result
pub fn compute_jitter(result: &AlignmentResult) -> JitterStatistics {
    jitter_from_residuals(&result.residuals)
}

/// Compute max and p95 jitter from raw residuals
///
/// An empty residual set yields zeros.
pub fn jitter_from_residuals(residuals: &[f64]) -> JitterStatistics {
    if residuals.is_empty() {
        return JitterStatistics::default();
    }

    let mut sorted: Vec<f64> = residuals.iter().map(|r| r.abs()).collect();
    sorted.sort_by(f64::total_cmp);

    let max_jitter_s = sorted[sorted.len() - 1];
    // Interpolation can land a rounding step above the max; keep the invariant.
    let p95_jitter_s = percentile_sorted(&sorted, JITTER_PERCENTILE).min(max_jitter_s);

    JitterStatistics {
        max_jitter_s,
        p95_jitter_s,
    }
}

/// Percentile of ascending `sorted` values, linear between order statistics.
///
/// `p` is in percent (0-100). Rank is `p/100 * (n - 1)`.
pub fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let rank = (p / 100.0).clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = rank.floor() as usize;
            let hi = rank.ceil() as usize;
            let frac = rank - lo as f64;
            sorted[lo] + (sorted[hi] - sorted[lo]) * frac
        }
    }
}
