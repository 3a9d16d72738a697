//! Transformation strategies and the registries that rank them.
//!
//! A strategy is a statistics-driven rule for transforming one column. Every
//! strategy belongs to exactly one column family and one
//! [`TransformPhase`], decides for itself whether it applies, and reports a
//! structured [`Score`] used to rank it against its siblings.
//!
//! # Built-in strategies
//!
//! | Family | Phase | Strategies |
//! |--------|-------|------------|
//! | numerical | imputation | median, mean, mode, constant_zero, upper_boundary, lower_boundary |
//! | numerical | outlier | iqr, winsorize, zscore |
//! | numerical | scaling | standard_scaler, min_max_scaler, log_transform, robust_scaler |
//! | categorical | imputation | mode, missing_indicator |
//! | categorical | outlier | rare_grouping, normalize_spelling |
//!
//! # Example
//!
//! ```rust,ignore
//! use pills_core::strategies::build_numeric_imputation_registry;
//!
//! let registry = build_numeric_imputation_registry(&config)?;
//! let stats = profiler.profile_numeric(&series)?;
//! for ranked in registry.resolve(&stats, false) {
//!     println!("{} -> {}", ranked.strategy.name(), ranked.score);
//! }
//! let cleaned = registry.apply(&series, &stats, false)?;
//! ```

mod categorical;
mod numeric;
mod registry;
mod score;
pub mod scoring;

pub use categorical::CategoricalStrategy;
pub use numeric::NumericStrategy;
pub use registry::{
    AppliedStep, CategoricalRegistry, NumericRegistry, RankedStrategy, StrategyRegistry,
    build_categorical_imputation_registry, build_categorical_outlier_registry,
    build_categorical_scaling_registry, build_numeric_imputation_registry,
    build_numeric_outlier_registry, build_numeric_scaling_registry,
};
pub use score::Score;

use crate::error::Result;
use crate::types::{ColumnRole, TransformPhase};
use polars::prelude::Series;

/// Fixed traits of a strategy, surfaced in explanations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrategyFlags {
    pub sensitive_to_outliers: bool,
    pub sensitive_to_skewness: bool,
    pub preserves_distribution: bool,
    pub requires_non_negative: bool,
    pub invertible: bool,
    pub safe_for_target: bool,
}

impl StrategyFlags {
    /// Caveat fragments for explanation text, in a fixed order.
    ///
    /// Invertibility is left out; only scaling explanations mention it.
    pub fn caveats(&self) -> Vec<&'static str> {
        let mut parts = Vec::new();
        if !self.preserves_distribution {
            parts.push("changes distribution shape");
        }
        if self.sensitive_to_outliers {
            parts.push("sensitive to outliers");
        }
        if self.sensitive_to_skewness {
            parts.push("sensitive to skewness");
        }
        if self.requires_non_negative {
            parts.push("requires non-negative input");
        }
        if !self.safe_for_target {
            parts.push("unsafe for target");
        }
        parts
    }
}

/// A statistics-driven transform of a single column.
///
/// Implementations must be pure: `apply` only reads the column and the
/// statistics snapshot it is given, which lets registries be shared across
/// threads without locking.
pub trait TransformStrategy: Send + Sync {
    /// Statistics record of the column family this strategy works on.
    type Stats;

    /// Stable snake_case identifier, used in audit records.
    fn name(&self) -> &'static str;

    /// Column family the strategy works on.
    fn column_type(&self) -> ColumnRole;

    fn phase(&self) -> TransformPhase;

    fn flags(&self) -> StrategyFlags;

    /// Whether the strategy is eligible for this column.
    fn should_apply(&self, stats: &Self::Stats, is_target: bool) -> bool;

    fn priority(&self, stats: &Self::Stats) -> Score;

    /// Transform the column. Missing values pass through unchanged unless the
    /// strategy is an imputer; degenerate statistics yield the input as is.
    fn apply(&self, data: &Series, stats: &Self::Stats) -> Result<Series>;

    /// Human-readable justification for choosing this strategy.
    fn explain(&self, stats: &Self::Stats) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caveats_order() {
        let flags = StrategyFlags {
            sensitive_to_outliers: true,
            sensitive_to_skewness: true,
            preserves_distribution: false,
            requires_non_negative: false,
            invertible: true,
            safe_for_target: false,
        };
        assert_eq!(
            flags.caveats(),
            vec![
                "changes distribution shape",
                "sensitive to outliers",
                "sensitive to skewness",
                "unsafe for target"
            ]
        );
    }
}
