//! Estimators over the sorted, non-missing values of a numerical column.
//!
//! Dispersion and shape estimators match the pandas conventions (sample
//! standard deviation, adjusted Fisher-Pearson skewness, bias-corrected excess
//! kurtosis) so scores computed here line up with the same column profiled
//! elsewhere.

/// Arithmetic mean. `0.0` for no values.
pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (ddof = 1). `0.0` for fewer than two values.
pub(crate) fn sample_std(values: &[f64], mean: f64) -> f64 {
    let n = values.len() as f64;
    if n <= 1.0 {
        return 0.0;
    }

    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    variance.sqrt()
}

/// Central moments m2, m3, m4 (population normalisation).
fn central_moments(values: &[f64], mean: f64) -> (f64, f64, f64) {
    let n = values.len() as f64;
    let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
    for v in values {
        let d = v - mean;
        let d2 = d * d;
        m2 += d2;
        m3 += d2 * d;
        m4 += d2 * d2;
    }
    (m2 / n, m3 / n, m4 / n)
}

/// Adjusted Fisher-Pearson skewness `G1`. `0.0` for fewer than three values or no spread.
pub(crate) fn skewness(values: &[f64], mean: f64) -> f64 {
    let n = values.len() as f64;
    if n < 3.0 {
        return 0.0;
    }

    let (m2, m3, _) = central_moments(values, mean);
    if m2 <= 0.0 {
        return 0.0;
    }

    let g1 = m3 / m2.powf(1.5);
    g1 * (n * (n - 1.0)).sqrt() / (n - 2.0)
}

/// Bias-corrected excess kurtosis `G2`. `0.0` for fewer than four values or no spread.
pub(crate) fn kurtosis(values: &[f64], mean: f64) -> f64 {
    let n = values.len() as f64;
    if n < 4.0 {
        return 0.0;
    }

    let (m2, _, m4) = central_moments(values, mean);
    if m2 <= 0.0 {
        return 0.0;
    }

    let g2 = m4 / (m2 * m2) - 3.0;
    ((n + 1.0) * g2 + 6.0) * (n - 1.0) / ((n - 2.0) * (n - 3.0))
}

/// Quantile with linear interpolation between closest ranks.
///
/// `sorted` must be ascending and non-empty.
pub(crate) fn quantile(sorted: &[f64], q: f64) -> f64 {
    let last = sorted.len() - 1;
    let pos = q.clamp(0.0, 1.0) * last as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Most frequent value; ties resolve to the smallest. `sorted` must be ascending and non-empty.
pub(crate) fn mode(sorted: &[f64]) -> f64 {
    let mut best = sorted[0];
    let mut best_run = 0usize;
    let mut run_start = 0usize;

    for i in 1..=sorted.len() {
        if i == sorted.len() || sorted[i] != sorted[run_start] {
            let run = i - run_start;
            if run > best_run {
                best_run = run;
                best = sorted[run_start];
            }
            run_start = i;
        }
    }

    best
}

/// Number of distinct values in an ascending slice.
pub(crate) fn count_unique(sorted: &[f64]) -> usize {
    if sorted.is_empty() {
        return 0;
    }
    1 + sorted.windows(2).filter(|w| w[0] != w[1]).count()
}

/// Fraction of values outside the inclusive range `[lower, upper]`.
pub(crate) fn fraction_outside(values: &[f64], lower: f64, upper: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let outside = values.iter().filter(|&&v| v < lower || v > upper).count();
    outside as f64 / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== sample_std tests ====================

    #[test]
    fn test_sample_std_basic() {
        // Mean = 3, Variance = 10 / 4 = 2.5
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let std = sample_std(&values, mean(&values));
        assert!((std - 2.5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_sample_std_single_value() {
        assert_eq!(sample_std(&[5.0], 5.0), 0.0);
    }

    #[test]
    fn test_sample_std_empty_returns_zero() {
        assert_eq!(sample_std(&[], 0.0), 0.0);
    }

    // ==================== skewness / kurtosis tests ====================

    #[test]
    fn test_skewness_symmetric() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert!(skewness(&values, mean(&values)).abs() < 1e-12);
    }

    #[test]
    fn test_skewness_matches_adjusted_estimator() {
        // g1 = 1.5 for this sample; G1 = 1.5 * sqrt(20) / 3
        let values = [1.0, 2.0, 3.0, 4.0, 1000.0];
        let skew = skewness(&values, mean(&values));
        assert!((skew - 2.236).abs() < 1e-2, "skew = {skew}");
    }

    #[test]
    fn test_skewness_negative() {
        let values = [-100.0, 1.0, 1.0, 1.0, 1.0];
        assert!(skewness(&values, mean(&values)) < 0.0);
    }

    #[test]
    fn test_skewness_constant_is_zero() {
        let values = [5.0, 5.0, 5.0, 5.0];
        assert_eq!(skewness(&values, 5.0), 0.0);
        assert_eq!(kurtosis(&values, 5.0), 0.0);
    }

    #[test]
    fn test_skewness_small_sample_is_zero() {
        assert_eq!(skewness(&[1.0, 100.0], 50.5), 0.0);
    }

    #[test]
    fn test_kurtosis_uniform_is_negative() {
        let values: Vec<f64> = (1..=10).map(f64::from).collect();
        assert!(kurtosis(&values, mean(&values)) < 0.0);
    }

    // ==================== quantile tests ====================

    #[test]
    fn test_quantile_linear_interpolation() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 1000.0];
        assert_eq!(quantile(&sorted, 0.25), 2.0);
        assert_eq!(quantile(&sorted, 0.5), 3.0);
        assert_eq!(quantile(&sorted, 0.75), 4.0);
        assert!((quantile(&sorted, 0.95) - 800.8).abs() < 1e-9);
    }

    #[test]
    fn test_quantile_single_value_collapses() {
        let sorted = [7.0];
        assert_eq!(quantile(&sorted, 0.05), 7.0);
        assert_eq!(quantile(&sorted, 0.95), 7.0);
    }

    // ==================== mode / unique tests ====================

    #[test]
    fn test_mode_prefers_most_frequent() {
        assert_eq!(mode(&[1.0, 2.0, 2.0, 3.0]), 2.0);
    }

    #[test]
    fn test_mode_ties_take_smallest() {
        assert_eq!(mode(&[1.0, 1.0, 3.0, 3.0]), 1.0);
        assert_eq!(mode(&[4.0, 5.0, 6.0]), 4.0);
    }

    #[test]
    fn test_count_unique() {
        assert_eq!(count_unique(&[1.0, 1.0, 2.0, 3.0, 3.0]), 3);
        assert_eq!(count_unique(&[]), 0);
    }

    #[test]
    fn test_fraction_outside() {
        let values = [1.0, 2.0, 3.0, 4.0, 1000.0];
        assert_eq!(fraction_outside(&values, -1.0, 7.0), 0.2);
        assert_eq!(fraction_outside(&[], 0.0, 1.0), 0.0);
    }
}
