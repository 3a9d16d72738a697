//! Built-in strategies for numerical columns.

use super::{Score, StrategyFlags, TransformStrategy, scoring};
use crate::error::Result;
use crate::types::{ColumnRole, NumericalColumnStats, TransformPhase};
use crate::utils::{clip_numeric, fill_numeric_nulls, map_numeric};
use polars::prelude::*;
use tracing::warn;

/// Every numerical strategy, with the parameters it carries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericStrategy {
    // Imputation
    Median,
    Mean,
    Mode,
    ConstantZero,
    UpperBoundary,
    LowerBoundary,
    // Outlier handling
    Iqr,
    Winsorize,
    ZScore { threshold: f64 },
    // Scaling
    StandardScaler,
    MinMaxScaler,
    LogTransform,
    RobustScaler,
}

impl NumericStrategy {
    /// Z-score clipping at the conventional three standard deviations.
    pub const fn zscore() -> Self {
        Self::ZScore { threshold: 3.0 }
    }

    /// Value an imputation strategy writes into missing cells.
    fn fill_value(&self, stats: &NumericalColumnStats) -> Option<f64> {
        match self {
            Self::Median => Some(stats.median),
            Self::Mean => Some(stats.mean),
            Self::Mode => Some(stats.mode),
            Self::ConstantZero => Some(0.0),
            Self::UpperBoundary => Some(stats.mean + 3.0 * stats.std),
            Self::LowerBoundary => Some(stats.mean - 3.0 * stats.std),
            _ => None,
        }
    }

    /// Clipping band of an outlier strategy.
    fn clip_bounds(&self, stats: &NumericalColumnStats) -> Option<(f64, f64)> {
        match self {
            Self::Iqr => Some(stats.iqr_fences()),
            Self::Winsorize => Some((stats.p05, stats.p95)),
            Self::ZScore { threshold } => Some((
                stats.mean - threshold * stats.std,
                stats.mean + threshold * stats.std,
            )),
            _ => None,
        }
    }

    fn scale(&self, data: &Series, stats: &NumericalColumnStats) -> Result<Series> {
        let scaled = match self {
            Self::StandardScaler => {
                if !is_positive(stats.std) {
                    return Ok(self.identity(data, "zero or non-finite standard deviation"));
                }
                let (mean, std) = (stats.mean, stats.std);
                map_numeric(data, |x| (x - mean) / std)?
            }
            Self::MinMaxScaler => {
                if !is_positive(stats.range) {
                    return Ok(self.identity(data, "zero range"));
                }
                let (min, range) = (stats.min, stats.range);
                map_numeric(data, |x| (x - min) / range)?
            }
            Self::LogTransform => {
                if stats.min < 0.0 {
                    return Ok(self.identity(data, "negative values"));
                }
                map_numeric(data, f64::ln_1p)?
            }
            Self::RobustScaler => {
                let iqr = stats.iqr();
                if !is_positive(iqr) {
                    return Ok(self.identity(data, "zero IQR"));
                }
                let median = stats.median;
                map_numeric(data, |x| (x - median) / iqr)?
            }
            _ => data.clone(),
        };
        Ok(scaled)
    }

    fn identity(&self, data: &Series, reason: &str) -> Series {
        warn!(
            "Strategy '{}' left column '{}' unchanged: {}",
            self.name(),
            data.name(),
            reason
        );
        data.clone()
    }
}

/// Strictly positive and finite; `NaN` fails.
fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

impl TransformStrategy for NumericStrategy {
    type Stats = NumericalColumnStats;

    fn name(&self) -> &'static str {
        match self {
            Self::Median => "median",
            Self::Mean => "mean",
            Self::Mode => "mode",
            Self::ConstantZero => "constant_zero",
            Self::UpperBoundary => "upper_boundary",
            Self::LowerBoundary => "lower_boundary",
            Self::Iqr => "iqr",
            Self::Winsorize => "winsorize",
            Self::ZScore { .. } => "zscore",
            Self::StandardScaler => "standard_scaler",
            Self::MinMaxScaler => "min_max_scaler",
            Self::LogTransform => "log_transform",
            Self::RobustScaler => "robust_scaler",
        }
    }

    fn column_type(&self) -> ColumnRole {
        ColumnRole::Numerical
    }

    fn phase(&self) -> TransformPhase {
        match self {
            Self::Median
            | Self::Mean
            | Self::Mode
            | Self::ConstantZero
            | Self::UpperBoundary
            | Self::LowerBoundary => TransformPhase::Imputation,
            Self::Iqr | Self::Winsorize | Self::ZScore { .. } => TransformPhase::Outlier,
            Self::StandardScaler | Self::MinMaxScaler | Self::LogTransform | Self::RobustScaler => {
                TransformPhase::Scaling
            }
        }
    }

    fn flags(&self) -> StrategyFlags {
        let imputer = StrategyFlags {
            sensitive_to_outliers: false,
            sensitive_to_skewness: false,
            preserves_distribution: true,
            requires_non_negative: false,
            invertible: false,
            safe_for_target: true,
        };
        let clipper = StrategyFlags {
            preserves_distribution: false,
            safe_for_target: false,
            ..imputer
        };
        let scaler = StrategyFlags {
            invertible: true,
            safe_for_target: false,
            ..imputer
        };

        match self {
            Self::Median => imputer,
            Self::Mean => StrategyFlags {
                sensitive_to_outliers: true,
                sensitive_to_skewness: true,
                ..imputer
            },
            Self::Mode | Self::ConstantZero => StrategyFlags {
                preserves_distribution: false,
                ..imputer
            },
            Self::UpperBoundary | Self::LowerBoundary => StrategyFlags {
                sensitive_to_outliers: true,
                preserves_distribution: false,
                safe_for_target: false,
                ..imputer
            },
            Self::Iqr => StrategyFlags {
                sensitive_to_skewness: true,
                ..clipper
            },
            Self::Winsorize => clipper,
            Self::ZScore { .. } => StrategyFlags {
                sensitive_to_outliers: true,
                sensitive_to_skewness: true,
                ..clipper
            },
            Self::StandardScaler => StrategyFlags {
                sensitive_to_outliers: true,
                sensitive_to_skewness: true,
                ..scaler
            },
            Self::MinMaxScaler => StrategyFlags {
                sensitive_to_outliers: true,
                ..scaler
            },
            Self::LogTransform => StrategyFlags {
                preserves_distribution: false,
                requires_non_negative: true,
                ..scaler
            },
            Self::RobustScaler => scaler,
        }
    }

    fn should_apply(&self, stats: &NumericalColumnStats, is_target: bool) -> bool {
        let skew = stats.skewness.abs();
        match self.phase() {
            TransformPhase::Imputation => {
                stats.missing_ratio > 0.0 && (!is_target || self.flags().safe_for_target)
            }
            _ if is_target => false,
            _ => match self {
                Self::Iqr => skew < 1.5,
                Self::Winsorize => stats.outlier_ratio > 0.01,
                Self::ZScore { .. } => stats.std > 0.0 && skew < 1.0 && stats.outlier_ratio > 0.0,
                Self::MinMaxScaler => stats.max > stats.min,
                Self::LogTransform => stats.min >= 0.0 && stats.skewness > 1.5,
                _ => true,
            },
        }
    }

    fn priority(&self, stats: &NumericalColumnStats) -> Score {
        match self {
            Self::Median => scoring::median_imputation(stats),
            Self::Mean => scoring::mean_imputation(stats),
            Self::Mode => scoring::mode_imputation(stats),
            Self::ConstantZero => scoring::constant_zero_imputation(stats),
            Self::UpperBoundary => scoring::upper_boundary_imputation(stats),
            Self::LowerBoundary => scoring::lower_boundary_imputation(stats),
            Self::Iqr => scoring::iqr_clipping(stats),
            Self::Winsorize => scoring::winsorize(stats),
            Self::ZScore { .. } => scoring::zscore_clipping(stats),
            Self::StandardScaler => scoring::standard_scaler(stats),
            Self::MinMaxScaler => scoring::min_max_scaler(stats),
            Self::LogTransform => scoring::log_transform(stats),
            Self::RobustScaler => scoring::robust_scaler(stats),
        }
    }

    fn apply(&self, data: &Series, stats: &NumericalColumnStats) -> Result<Series> {
        if let Some(value) = self.fill_value(stats) {
            return Ok(fill_numeric_nulls(data, value)?);
        }

        if let Some((lower, upper)) = self.clip_bounds(stats) {
            if let Self::ZScore { threshold } = self {
                if !is_positive(*threshold) {
                    return Ok(self.identity(data, "threshold must be positive and finite"));
                }
                if !is_positive(stats.std) {
                    return Ok(self.identity(data, "zero or non-finite standard deviation"));
                }
            }
            if matches!(self, Self::Iqr) && !is_positive(stats.iqr()) {
                return Ok(self.identity(data, "zero IQR"));
            }
            if lower.is_nan() || upper.is_nan() || lower > upper {
                return Ok(self.identity(data, "empty clipping band"));
            }
            return Ok(clip_numeric(data, lower, upper)?);
        }

        self.scale(data, stats)
    }

    fn explain(&self, stats: &NumericalColumnStats) -> String {
        let mut parts = match self.phase() {
            TransformPhase::Imputation => vec![format!(
                "Imputing {:.1}% missing with '{}' (fill value {:.4})",
                stats.missing_ratio * 100.0,
                self.name(),
                self.fill_value(stats).unwrap_or_default()
            )],
            TransformPhase::Outlier => {
                let (lower, upper) = self.clip_bounds(stats).unwrap_or((stats.min, stats.max));
                vec![
                    format!(
                        "Clipping outliers with '{}' to [{:.4}, {:.4}]",
                        self.name(),
                        lower,
                        upper
                    ),
                    format!("outlier_ratio={:.1}%", stats.outlier_ratio * 100.0),
                    format!("skewness={:.2}", stats.skewness),
                ]
            }
            TransformPhase::Scaling => vec![
                format!("Scaling with '{}'", self.name()),
                format!("skewness={:.2}", stats.skewness),
                format!("outlier_ratio={:.1}%", stats.outlier_ratio * 100.0),
            ],
        };

        let flags = self.flags();
        parts.extend(flags.caveats().into_iter().map(str::to_string));
        if self.phase() == TransformPhase::Scaling && !flags.invertible {
            parts.push("not invertible".to_string());
        }
        parts.join(" | ")
    }
}
