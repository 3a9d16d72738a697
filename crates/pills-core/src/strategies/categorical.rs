//! Built-in strategies for categorical columns.
//!
//! Every strategy here emits a string column, whatever the input dtype was.

use super::{Score, StrategyFlags, TransformStrategy, scoring};
use crate::error::Result;
use crate::types::{CategoricalColumnStats, ColumnRole, TransformPhase};
use crate::utils::{fill_string_nulls, map_strings, normalize_category};
use polars::prelude::*;
use std::collections::HashSet;

/// Every categorical strategy, with the labels it writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoricalStrategy {
    /// Fill missing cells with the most frequent category.
    Mode,
    /// Fill missing cells with a dedicated label.
    MissingIndicator { label: String },
    /// Replace every rare category with a single label.
    RareGrouping { label: String },
    /// Lower-case and trim values so spelling variants merge.
    NormalizeSpelling,
}

impl CategoricalStrategy {
    pub fn missing_indicator(label: impl Into<String>) -> Self {
        Self::MissingIndicator {
            label: label.into(),
        }
    }

    pub fn rare_grouping(label: impl Into<String>) -> Self {
        Self::RareGrouping {
            label: label.into(),
        }
    }
}

impl TransformStrategy for CategoricalStrategy {
    type Stats = CategoricalColumnStats;

    fn name(&self) -> &'static str {
        match self {
            Self::Mode => "mode",
            Self::MissingIndicator { .. } => "missing_indicator",
            Self::RareGrouping { .. } => "rare_grouping",
            Self::NormalizeSpelling => "normalize_spelling",
        }
    }

    fn column_type(&self) -> ColumnRole {
        ColumnRole::Categorical
    }

    fn phase(&self) -> TransformPhase {
        match self {
            Self::Mode | Self::MissingIndicator { .. } => TransformPhase::Imputation,
            Self::RareGrouping { .. } | Self::NormalizeSpelling => TransformPhase::Outlier,
        }
    }

    fn flags(&self) -> StrategyFlags {
        let base = StrategyFlags {
            sensitive_to_outliers: false,
            sensitive_to_skewness: false,
            preserves_distribution: false,
            requires_non_negative: false,
            invertible: false,
            safe_for_target: false,
        };
        match self {
            Self::Mode => StrategyFlags {
                safe_for_target: true,
                ..base
            },
            Self::MissingIndicator { .. } | Self::RareGrouping { .. } => base,
            Self::NormalizeSpelling => StrategyFlags {
                preserves_distribution: true,
                ..base
            },
        }
    }

    fn should_apply(&self, stats: &CategoricalColumnStats, is_target: bool) -> bool {
        if is_target && !self.flags().safe_for_target {
            return false;
        }
        match self {
            Self::Mode => stats.missing_ratio > 0.0 && stats.most_frequent.is_some(),
            Self::MissingIndicator { .. } => stats.missing_ratio > 0.0,
            Self::RareGrouping { .. } => stats.rare_categories.len() >= 2,
            Self::NormalizeSpelling => stats.has_typos,
        }
    }

    fn priority(&self, stats: &CategoricalColumnStats) -> Score {
        match self {
            Self::Mode => scoring::categorical_mode(stats),
            Self::MissingIndicator { .. } => scoring::missing_indicator(stats),
            Self::RareGrouping { .. } => scoring::rare_grouping(stats),
            Self::NormalizeSpelling => scoring::normalize_spelling(stats),
        }
    }

    fn apply(&self, data: &Series, stats: &CategoricalColumnStats) -> Result<Series> {
        let out = match self {
            Self::Mode => match &stats.most_frequent {
                Some(value) => fill_string_nulls(data, value)?,
                None => data.clone(),
            },
            Self::MissingIndicator { label } => fill_string_nulls(data, label)?,
            Self::RareGrouping { label } => {
                let rare: HashSet<&str> =
                    stats.rare_categories.iter().map(String::as_str).collect();
                map_strings(data, |value| {
                    if rare.contains(value.as_str()) {
                        label.clone()
                    } else {
                        value
                    }
                })?
            }
            Self::NormalizeSpelling => map_strings(data, |value| normalize_category(&value))?,
        };
        Ok(out)
    }

    fn explain(&self, stats: &CategoricalColumnStats) -> String {
        let mut parts = vec![match self {
            Self::Mode => format!(
                "Imputing {:.1}% missing with 'mode' (fill value '{}')",
                stats.missing_ratio * 100.0,
                stats.most_frequent.as_deref().unwrap_or_default()
            ),
            Self::MissingIndicator { label } => format!(
                "Imputing {:.1}% missing with 'missing_indicator' (label '{}')",
                stats.missing_ratio * 100.0,
                label
            ),
            Self::RareGrouping { label } => format!(
                "Grouping {} rare categories ({:.1}% of values) into '{}'",
                stats.rare_categories.len(),
                stats.rare_ratio * 100.0,
                label
            ),
            Self::NormalizeSpelling => format!(
                "Normalizing spelling of {} categories to trimmed lower case",
                stats.n_unique
            ),
        }];
        parts.extend(self.flags().caveats().into_iter().map(str::to_string));
        parts.join(" | ")
    }
}
