//! Priority rules for every built-in strategy.
//!
//! Each function only reads the statistics snapshot, so rankings are
//! reproducible and can be tested without touching any data.

use super::score::Score;
use crate::types::{CategoricalColumnStats, NumericalColumnStats};

// =============================================================================
// Numerical imputation
// =============================================================================

pub fn median_imputation(stats: &NumericalColumnStats) -> Score {
    Score::new(300)
        .bonus(stats.skewness.abs() >= 1.0, 100)
        .bonus(stats.outlier_ratio > 0.05, 75)
}

pub fn mean_imputation(stats: &NumericalColumnStats) -> Score {
    Score::new(300)
        .bonus(stats.skewness.abs() < 0.5, 100)
        .penalize(stats.outlier_ratio > 0.05, 150)
        .penalize(stats.skewness.abs() >= 1.0, 100)
}

pub fn mode_imputation(stats: &NumericalColumnStats) -> Score {
    Score::new(200)
        .bonus(stats.n_unique <= 10, 100)
        .penalize(stats.n_unique > 20, 150)
}

pub fn constant_zero_imputation(stats: &NumericalColumnStats) -> Score {
    Score::new(150)
        .bonus(stats.missing_ratio > 0.3, 75)
        .bonus(stats.min >= 0.0, 25)
        .penalize(stats.mean > 0.0 && stats.missing_ratio < 0.1, 100)
}

pub fn upper_boundary_imputation(stats: &NumericalColumnStats) -> Score {
    Score::new(150)
        .bonus(stats.skewness > 2.0, 100)
        .bonus(stats.outlier_ratio > 0.05, 75)
        .penalize(stats.outlier_ratio > 0.15, 75)
}

pub fn lower_boundary_imputation(stats: &NumericalColumnStats) -> Score {
    Score::new(150)
        .bonus(stats.skewness < -2.0, 100)
        .bonus(stats.outlier_ratio > 0.05, 75)
        .penalize(stats.outlier_ratio > 0.15, 75)
}

// =============================================================================
// Numerical outlier handling
// =============================================================================

pub fn iqr_clipping(stats: &NumericalColumnStats) -> Score {
    Score::new(250)
        .bonus(stats.skewness.abs() < 1.0, 100)
        .bonus(stats.outlier_ratio < 0.05, 75)
        .penalize(stats.skewness.abs() >= 1.5, 100)
}

pub fn winsorize(stats: &NumericalColumnStats) -> Score {
    Score::new(250)
        .bonus(stats.skewness.abs() >= 1.0, 100)
        .bonus(stats.outlier_ratio >= 0.05, 100)
        .penalize(stats.count < 20, 75)
}

pub fn zscore_clipping(stats: &NumericalColumnStats) -> Score {
    Score::new(250)
        .bonus(stats.skewness.abs() < 0.5, 125)
        .bonus(stats.count >= 100, 50)
        .penalize(stats.skewness.abs() >= 1.0, 125)
        .penalize(stats.count < 30, 100)
}

// =============================================================================
// Numerical scaling
// =============================================================================

pub fn standard_scaler(stats: &NumericalColumnStats) -> Score {
    Score::new(250)
        .bonus(stats.skewness.abs() < 0.5, 100)
        .bonus(stats.outlier_ratio < 0.02, 75)
        .penalize(stats.outlier_ratio >= 0.05, 150)
        .penalize(stats.skewness.abs() >= 1.0, 100)
}

pub fn min_max_scaler(stats: &NumericalColumnStats) -> Score {
    Score::new(200)
        .bonus(stats.outlier_ratio == 0.0, 125)
        .bonus(stats.skewness.abs() < 0.5, 50)
        .penalize(stats.outlier_ratio > 0.0, 150)
}

pub fn log_transform(stats: &NumericalColumnStats) -> Score {
    let skew_bonus = if stats.skewness > 3.0 {
        150
    } else if stats.skewness > 1.5 {
        75
    } else {
        0
    };

    Score::new(150)
        .bonus(true, skew_bonus)
        .bonus(stats.min == 0.0, 25)
        .penalize(stats.outlier_ratio > 0.1, 50)
}

pub fn robust_scaler(stats: &NumericalColumnStats) -> Score {
    Score::new(250)
        .bonus(stats.outlier_ratio > 0.05, 100)
        .bonus(stats.skewness.abs() >= 1.0, 75)
}

// =============================================================================
// Categorical
// =============================================================================

pub fn categorical_mode(stats: &CategoricalColumnStats) -> Score {
    Score::new(200)
        .bonus(stats.n_unique <= 10, 100)
        .bonus(stats.most_frequent_ratio >= 0.5, 50)
        .penalize(stats.n_unique > 20, 150)
        .penalize(stats.missing_ratio > 0.5, 75)
}

pub fn missing_indicator(stats: &CategoricalColumnStats) -> Score {
    Score::new(150)
        .bonus(stats.missing_ratio > 0.3, 75)
        .bonus(stats.n_unique > 20, 50)
}

pub fn rare_grouping(stats: &CategoricalColumnStats) -> Score {
    Score::new(200)
        .bonus(stats.rare_ratio >= 0.05, 100)
        .bonus(stats.n_unique > 10, 50)
        .penalize(stats.rare_ratio > 0.5, 100)
}

pub fn normalize_spelling(_stats: &CategoricalColumnStats) -> Score {
    Score::new(250)
}
