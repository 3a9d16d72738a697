//! Column profiling.
//!
//! The profiler turns one column into a fixed-shape statistics record. Missing
//! values (nulls, and `NaN` or infinities in float columns) are excluded from every
//! estimator but counted in `missing_ratio`. Degenerate columns (constant,
//! single value, all missing) produce well-defined statistics rather than
//! errors; only empty columns and unsupported types fail.

mod frequency;
mod statistics;

use crate::config::ProfilerConfig;
use crate::error::{ProfilingError, Result};
use crate::types::{
    CategoricalColumnStats, ColumnRole, ColumnStats, NumericalColumnStats,
};
use crate::utils::{DtypeCategory, get_dtype_category, numeric_values, string_values};
use polars::prelude::*;
use tracing::debug;

/// Computes statistics records for single columns.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnProfiler {
    config: ProfilerConfig,
}

impl ColumnProfiler {
    pub fn new(config: ProfilerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProfilerConfig {
        &self.config
    }

    /// Profile a column according to its declared role.
    ///
    /// `Target` columns are profiled numerically when their dtype is numeric
    /// and categorically otherwise. Datetime, identifier and dropped columns
    /// carry no statistics and fail with [`ProfilingError::UnsupportedRole`].
    pub fn profile(&self, series: &Series, role: ColumnRole) -> Result<ColumnStats> {
        match role {
            ColumnRole::Numerical => Ok(ColumnStats::Numerical(self.profile_numeric(series)?)),
            ColumnRole::Categorical => Ok(ColumnStats::Categorical(
                self.profile_categorical(series)?,
            )),
            ColumnRole::Target => {
                if get_dtype_category(series.dtype()) == DtypeCategory::Numeric {
                    Ok(ColumnStats::Numerical(self.profile_numeric(series)?))
                } else {
                    Ok(ColumnStats::Categorical(self.profile_categorical(series)?))
                }
            }
            ColumnRole::Datetime | ColumnRole::Drop | ColumnRole::Id => {
                Err(ProfilingError::UnsupportedRole {
                    column: series.name().to_string(),
                    role,
                }
                .into())
            }
        }
    }

    /// Compute [`NumericalColumnStats`] for an integer, float or boolean column.
    pub fn profile_numeric(&self, series: &Series) -> Result<NumericalColumnStats> {
        let name = series.name().to_string();
        if series.is_empty() {
            return Err(ProfilingError::EmptyColumn(name).into());
        }

        match get_dtype_category(series.dtype()) {
            DtypeCategory::Numeric | DtypeCategory::Boolean => {}
            _ => {
                return Err(ProfilingError::UnsupportedType {
                    column: name,
                    dtype: series.dtype().to_string(),
                    family: "numerical",
                }
                .into());
            }
        }

        let total_count = series.len();
        let mut values: Vec<f64> = numeric_values(series)?.into_iter().flatten().collect();
        values.sort_by(f64::total_cmp);

        let count = values.len();
        let missing_ratio = (total_count - count) as f64 / total_count as f64;

        if values.is_empty() {
            debug!("Column '{}' has no present values", name);
            return Ok(NumericalColumnStats {
                max: 0.0,
                min: 0.0,
                mean: 0.0,
                median: 0.0,
                mode: 0.0,
                std: 0.0,
                variance: 0.0,
                skewness: 0.0,
                kurtosis: 0.0,
                range: 0.0,
                n_unique: 0,
                missing_ratio,
                outlier_ratio: 0.0,
                q1: 0.0,
                q3: 0.0,
                p05: 0.0,
                p95: 0.0,
                count,
                total_count,
            });
        }

        let min = values[0];
        let max = values[count - 1];
        let constant = min == max;

        let mean = statistics::mean(&values).clamp(min, max);
        let std = if constant {
            0.0
        } else {
            statistics::sample_std(&values, mean)
        };
        let (skewness, kurtosis) = if constant {
            (0.0, 0.0)
        } else {
            (
                statistics::skewness(&values, mean),
                statistics::kurtosis(&values, mean),
            )
        };

        let q1 = statistics::quantile(&values, 0.25);
        let q3 = statistics::quantile(&values, 0.75);
        let iqr = q3 - q1;
        let outlier_ratio = statistics::fraction_outside(&values, q1 - 1.5 * iqr, q3 + 1.5 * iqr);

        let stats = NumericalColumnStats {
            max,
            min,
            mean,
            median: statistics::quantile(&values, 0.5),
            mode: statistics::mode(&values),
            std,
            variance: std * std,
            skewness,
            kurtosis,
            range: max - min,
            n_unique: statistics::count_unique(&values),
            missing_ratio,
            outlier_ratio,
            q1,
            q3,
            p05: statistics::quantile(&values, 0.05),
            p95: statistics::quantile(&values, 0.95),
            count,
            total_count,
        };

        debug!(
            "Profiled '{}': mean={:.3}, std={:.3}, skew={:.3}, missing={:.1}%, outliers={:.1}%",
            name,
            stats.mean,
            stats.std,
            stats.skewness,
            stats.missing_ratio * 100.0,
            stats.outlier_ratio * 100.0
        );

        Ok(stats)
    }

    /// Compute [`CategoricalColumnStats`] for a string, categorical, boolean or integer column.
    pub fn profile_categorical(&self, series: &Series) -> Result<CategoricalColumnStats> {
        let name = series.name().to_string();
        if series.is_empty() {
            return Err(ProfilingError::EmptyColumn(name).into());
        }

        let supported = match get_dtype_category(series.dtype()) {
            DtypeCategory::String | DtypeCategory::Boolean => true,
            DtypeCategory::Numeric => series.dtype().is_integer(),
            DtypeCategory::Datetime | DtypeCategory::Other => false,
        };
        if !supported {
            return Err(ProfilingError::UnsupportedType {
                column: name,
                dtype: series.dtype().to_string(),
                family: "categorical",
            }
            .into());
        }

        let total_count = series.len();
        let present: Vec<String> = string_values(series)?.into_iter().flatten().collect();
        let count = present.len();
        let missing_ratio = (total_count - count) as f64 / total_count as f64;

        let counts = frequency::value_counts(&present);
        let n_unique = counts.len();

        let (most_frequent, most_frequent_ratio) = match frequency::most_frequent(&counts) {
            Some((value, freq)) => (Some(value.to_string()), freq as f64 / count as f64),
            None => (None, 0.0),
        };

        let (rare_categories, rare_count) =
            frequency::rare_categories(&counts, count, self.config.rare_threshold);
        let rare_ratio = if count == 0 {
            0.0
        } else {
            rare_count as f64 / count as f64
        };

        let stats = CategoricalColumnStats {
            n_unique,
            missing_ratio,
            mode: most_frequent.clone(),
            most_frequent,
            most_frequent_ratio,
            rare_categories,
            rare_ratio,
            entropy: frequency::entropy(&counts, count),
            cardinality: frequency::cardinality(
                n_unique,
                self.config.low_cardinality_max,
                self.config.medium_cardinality_max,
            ),
            has_typos: frequency::has_inconsistent_spelling(&counts),
            count,
            total_count,
        };

        debug!(
            "Profiled '{}': {} categories ({:?}), missing={:.1}%, rare={:.1}%",
            name,
            stats.n_unique,
            stats.cardinality,
            stats.missing_ratio * 100.0,
            stats.rare_ratio * 100.0
        );

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CleaningError;
    use crate::types::Cardinality;

    fn profiler() -> ColumnProfiler {
        ColumnProfiler::default()
    }

    // ==================== numeric profiling ====================

    #[test]
    fn test_profile_numeric_basic() {
        let series = Series::new("price".into(), &[10.0f64, 20.0, 30.0, 40.0, 50.0]);
        let stats = profiler().profile_numeric(&series).unwrap();

        assert_eq!(stats.mean, 30.0);
        assert_eq!(stats.median, 30.0);
        assert_eq!(stats.min, 10.0);
        assert_eq!(stats.max, 50.0);
        assert_eq!(stats.range, 40.0);
        assert_eq!(stats.q1, 20.0);
        assert_eq!(stats.q3, 40.0);
        assert_eq!(stats.n_unique, 5);
        assert_eq!(stats.missing_ratio, 0.0);
        assert_eq!(stats.outlier_ratio, 0.0);
        assert!(stats.skewness.abs() < 1e-12);
        assert!((stats.variance - 250.0).abs() < 1e-9);
    }

    #[test]
    fn test_profile_numeric_with_missing_and_outlier() {
        let series = Series::new(
            "v".into(),
            &[Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(1000.0), None],
        );
        let stats = profiler().profile_numeric(&series).unwrap();

        assert_eq!(stats.count, 5);
        assert_eq!(stats.total_count, 6);
        assert!((stats.missing_ratio - 1.0 / 6.0).abs() < 1e-12);
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.mean, 202.0);
        assert_eq!(stats.outlier_ratio, 0.2);
        assert!(stats.skewness > 2.0);
    }

    #[test]
    fn test_profile_numeric_invariants() {
        let series = Series::new("v".into(), &[3.0f64, -2.0, 7.5, 7.5, 100.0, 0.0, 1.0, 2.0]);
        let stats = profiler().profile_numeric(&series).unwrap();

        assert!(stats.p05 <= stats.q1);
        assert!(stats.q1 <= stats.median && stats.median <= stats.q3);
        assert!(stats.q3 <= stats.p95);
        assert!(stats.min <= stats.mean && stats.mean <= stats.max);
        assert!((0.0..=1.0).contains(&stats.outlier_ratio));
        assert_eq!(stats.mode, 7.5);
    }

    #[test]
    fn test_profile_numeric_constant_column() {
        let series = Series::new("c".into(), &[5.0f64, 5.0, 5.0, 5.0]);
        let stats = profiler().profile_numeric(&series).unwrap();

        assert_eq!(stats.std, 0.0);
        assert_eq!(stats.skewness, 0.0);
        assert_eq!(stats.q1, 5.0);
        assert_eq!(stats.p95, 5.0);
        assert_eq!(stats.iqr(), 0.0);
        assert_eq!(stats.outlier_ratio, 0.0);
    }

    #[test]
    fn test_profile_numeric_single_value() {
        let series = Series::new("s".into(), &[None, Some(4.0), None]);
        let stats = profiler().profile_numeric(&series).unwrap();

        assert_eq!(stats.std, 0.0);
        assert_eq!(stats.skewness, 0.0);
        assert_eq!(stats.p05, 4.0);
        assert_eq!(stats.median, 4.0);
        assert_eq!(stats.p95, 4.0);
    }

    #[test]
    fn test_profile_numeric_all_missing() {
        let series = Series::new("m".into(), &[None::<f64>, None, None]);
        let stats = profiler().profile_numeric(&series).unwrap();

        assert_eq!(stats.missing_ratio, 1.0);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.n_unique, 0);
        assert_eq!(stats.std, 0.0);
    }

    #[test]
    fn test_profile_numeric_nan_counts_as_missing() {
        let series = Series::new("n".into(), &[1.0f64, f64::NAN, 3.0, 4.0]);
        let stats = profiler().profile_numeric(&series).unwrap();
        assert_eq!(stats.missing_ratio, 0.25);
        assert_eq!(stats.count, 3);
    }

    #[test]
    fn test_profile_numeric_infinity_counts_as_missing() {
        let series = Series::new("n".into(), &[1.0f64, f64::INFINITY, 3.0, f64::NEG_INFINITY]);
        let stats = profiler().profile_numeric(&series).unwrap();
        assert_eq!(stats.missing_ratio, 0.5);
        assert_eq!(stats.max, 3.0);
        assert!(stats.std.is_finite());
    }

    #[test]
    fn test_profile_numeric_integers() {
        let series = Series::new("i".into(), &[1i32, 2, 3, 4]);
        let stats = profiler().profile_numeric(&series).unwrap();
        assert_eq!(stats.mean, 2.5);
    }

    #[test]
    fn test_profile_numeric_empty_fails() {
        let series = Series::new("e".into(), Vec::<f64>::new());
        let err = profiler().profile_numeric(&series).unwrap_err();
        assert!(matches!(
            err,
            CleaningError::Profiling(ProfilingError::EmptyColumn(_))
        ));
    }

    #[test]
    fn test_profile_numeric_string_fails() {
        let series = Series::new("s".into(), &["a", "b"]);
        let err = profiler().profile_numeric(&series).unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_TYPE");
    }

    // ==================== categorical profiling ====================

    #[test]
    fn test_profile_categorical_basic() {
        let series = Series::new(
            "color".into(),
            &[Some("red"), Some("blue"), Some("red"), None, Some("green")],
        );
        let stats = profiler().profile_categorical(&series).unwrap();

        assert_eq!(stats.n_unique, 3);
        assert_eq!(stats.missing_ratio, 0.2);
        assert_eq!(stats.most_frequent.as_deref(), Some("red"));
        assert_eq!(stats.mode, stats.most_frequent);
        assert_eq!(stats.most_frequent_ratio, 0.5);
        assert_eq!(stats.cardinality, Cardinality::Low);
        assert!(stats.entropy > 0.0);
        assert!(!stats.has_typos);
    }

    #[test]
    fn test_profile_categorical_rare_categories() {
        let mut values: Vec<&str> = vec!["common"; 98];
        values.push("x");
        values.push("y");
        let series = Series::new("cat".into(), values);

        let config = ProfilerConfig {
            rare_threshold: 0.05,
            ..ProfilerConfig::default()
        };
        let stats = ColumnProfiler::new(config)
            .profile_categorical(&series)
            .unwrap();

        assert_eq!(stats.rare_categories, vec!["x".to_string(), "y".to_string()]);
        assert!((stats.rare_ratio - 0.02).abs() < 1e-12);
    }

    #[test]
    fn test_profile_categorical_detects_typos() {
        let series = Series::new("city".into(), &["Paris", "paris ", "Rome"]);
        let stats = profiler().profile_categorical(&series).unwrap();
        assert!(stats.has_typos);
    }

    #[test]
    fn test_profile_categorical_all_missing() {
        let series = Series::new("c".into(), &[None::<&str>, None]);
        let stats = profiler().profile_categorical(&series).unwrap();
        assert_eq!(stats.missing_ratio, 1.0);
        assert_eq!(stats.most_frequent, None);
        assert_eq!(stats.entropy, 0.0);
    }

    #[test]
    fn test_profile_categorical_float_fails() {
        let series = Series::new("f".into(), &[1.5f64, 2.5]);
        assert!(profiler().profile_categorical(&series).is_err());
    }

    // ==================== role dispatch ====================

    #[test]
    fn test_profile_dispatches_on_role() {
        let numeric = Series::new("n".into(), &[1.0f64, 2.0]);
        let text = Series::new("t".into(), &["a", "b"]);

        assert!(matches!(
            profiler().profile(&numeric, ColumnRole::Target).unwrap(),
            ColumnStats::Numerical(_)
        ));
        assert!(matches!(
            profiler().profile(&text, ColumnRole::Target).unwrap(),
            ColumnStats::Categorical(_)
        ));
        assert!(matches!(
            profiler().profile(&text, ColumnRole::Categorical).unwrap(),
            ColumnStats::Categorical(_)
        ));
    }

    #[test]
    fn test_profile_unsupported_role() {
        let series = Series::new("id".into(), &[1i64, 2, 3]);
        let err = profiler().profile(&series, ColumnRole::Id).unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_ROLE");
    }
}
