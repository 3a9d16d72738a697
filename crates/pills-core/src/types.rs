use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Role a column plays in the dataset, declared by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    Target,
    Numerical,
    Categorical,
    Datetime,
    Drop,
    Id,
}

impl ColumnRole {
    /// Whether the engine runs any phase on columns with this role.
    pub fn is_transformable(&self) -> bool {
        matches!(self, Self::Target | Self::Numerical | Self::Categorical)
    }
}

/// Pipeline stage a strategy belongs to. Ordering follows execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformPhase {
    Imputation,
    Outlier,
    Scaling,
}

impl TransformPhase {
    /// All phases in execution order.
    pub const ALL: [TransformPhase; 3] = [Self::Imputation, Self::Outlier, Self::Scaling];

    /// Returns a human-readable name for the phase.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Imputation => "Imputing Values",
            Self::Outlier => "Handling Outliers",
            Self::Scaling => "Scaling",
        }
    }
}

/// Cardinality bucket of a categorical column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    Low,
    Medium,
    High,
}

/// Statistics snapshot of a numerical column.
///
/// Recomputed after every phase, since imputation changes `missing_ratio`,
/// outlier handling changes `outlier_ratio`, and so on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericalColumnStats {
    pub max: f64,
    pub min: f64,
    pub mean: f64,
    pub median: f64,
    pub mode: f64,
    pub std: f64,
    pub variance: f64,
    pub skewness: f64,
    pub kurtosis: f64,
    pub range: f64,
    pub n_unique: usize,
    pub missing_ratio: f64,
    pub outlier_ratio: f64,
    pub q1: f64,
    pub q3: f64,
    pub p05: f64,
    pub p95: f64,
    /// Non-missing values.
    pub count: usize,
    /// All values, missing included.
    pub total_count: usize,
}

impl NumericalColumnStats {
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Boxplot fences `[q1 - 1.5 * IQR, q3 + 1.5 * IQR]`.
    pub fn iqr_fences(&self) -> (f64, f64) {
        let iqr = self.iqr();
        (self.q1 - 1.5 * iqr, self.q3 + 1.5 * iqr)
    }
}

/// Statistics snapshot of a categorical column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalColumnStats {
    pub n_unique: usize,
    pub missing_ratio: f64,
    pub most_frequent: Option<String>,
    pub most_frequent_ratio: f64,
    /// Sorted category values whose frequency is below the rarity threshold.
    pub rare_categories: Vec<String>,
    /// Fraction of non-missing values that belong to a rare category.
    pub rare_ratio: f64,
    /// Shannon entropy (bits) of the value distribution.
    pub entropy: f64,
    pub mode: Option<String>,
    pub cardinality: Cardinality,
    /// Some values only differ by case or surrounding whitespace.
    pub has_typos: bool,
    pub count: usize,
    pub total_count: usize,
}

/// Statistics of either column family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnStats {
    Numerical(NumericalColumnStats),
    Categorical(CategoricalColumnStats),
}

impl ColumnStats {
    pub fn missing_ratio(&self) -> f64 {
        match self {
            Self::Numerical(stats) => stats.missing_ratio,
            Self::Categorical(stats) => stats.missing_ratio,
        }
    }

    pub fn as_numerical(&self) -> Option<&NumericalColumnStats> {
        match self {
            Self::Numerical(stats) => Some(stats),
            Self::Categorical(_) => None,
        }
    }

    pub fn as_categorical(&self) -> Option<&CategoricalColumnStats> {
        match self {
            Self::Categorical(stats) => Some(stats),
            Self::Numerical(_) => None,
        }
    }
}

/// Audit record for one applied strategy.
///
/// Only needed for logging and explainability; the cleaned column is the
/// same whether or not callers keep these.
#[derive(Debug, Clone, Serialize)]
pub struct TransformResult {
    #[serde(skip_serializing)]
    pub data: Series,
    pub strategy_name: String,
    pub phase: TransformPhase,
    pub before_stats: ColumnStats,
    pub after_stats: ColumnStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Everything the engine produced for a single column.
#[derive(Debug, Clone)]
pub struct ColumnOutcome {
    pub data: Series,
    pub role: ColumnRole,
    pub is_target: bool,
    pub results: Vec<TransformResult>,
}

impl ColumnOutcome {
    /// Outcome for a column no phase touched.
    pub fn untouched(data: Series, role: ColumnRole, is_target: bool) -> Self {
        Self {
            data,
            role,
            is_target,
            results: Vec::new(),
        }
    }

    /// Names of the applied strategies, in application order.
    pub fn applied_strategies(&self) -> Vec<&str> {
        self.results
            .iter()
            .map(|r| r.strategy_name.as_str())
            .collect()
    }
}

/// Cleaned frame plus per-column outcomes, in the frame's column order.
#[derive(Debug, Clone)]
pub struct FrameOutcome {
    pub data: DataFrame,
    pub columns: Vec<ColumnOutcome>,
}

impl FrameOutcome {
    /// All audit records across columns, in column order.
    pub fn results(&self) -> impl Iterator<Item = &TransformResult> {
        self.columns.iter().flat_map(|c| c.results.iter())
    }

    /// Outcome of the column with the given name.
    pub fn column(&self, name: &str) -> Option<&ColumnOutcome> {
        self.columns.iter().find(|c| c.data.name().as_str() == name)
    }
}
