//! Per-(column type, phase) strategy containers.

use super::{CategoricalStrategy, NumericStrategy, Score, TransformStrategy};
use crate::config::{ApplicationMode, EngineConfig};
use crate::error::{IncompatibleStrategyError, Result};
use crate::types::{ColumnRole, TransformPhase};
use polars::prelude::Series;
use std::cmp::Reverse;
use tracing::debug;

/// A strategy that passed `should_apply`, with the score it was ranked by.
#[derive(Debug, Clone, Copy)]
pub struct RankedStrategy<'a, S> {
    pub strategy: &'a S,
    pub score: Score,
}

/// Output of one strategy application within [`StrategyRegistry::run`].
#[derive(Debug, Clone)]
pub struct AppliedStep<'a, S> {
    pub strategy: &'a S,
    pub score: Score,
    pub output: Series,
}

/// Ordered set of strategies for one column type and one phase.
///
/// Registration order is significant: strategies with equal total scores keep
/// it when ranked.
#[derive(Debug, Clone)]
pub struct StrategyRegistry<S> {
    column_type: ColumnRole,
    phase: TransformPhase,
    strategies: Vec<S>,
}

pub type NumericRegistry = StrategyRegistry<NumericStrategy>;
pub type CategoricalRegistry = StrategyRegistry<CategoricalStrategy>;

impl<S: TransformStrategy> StrategyRegistry<S> {
    pub fn new(column_type: ColumnRole, phase: TransformPhase) -> Self {
        Self {
            column_type,
            phase,
            strategies: Vec::new(),
        }
    }

    /// Add a strategy, rejecting it if it targets another column type or phase.
    pub fn register(mut self, strategy: S) -> std::result::Result<Self, IncompatibleStrategyError> {
        if strategy.column_type() != self.column_type || strategy.phase() != self.phase {
            return Err(IncompatibleStrategyError {
                strategy: strategy.name(),
                strategy_column_type: strategy.column_type(),
                strategy_phase: strategy.phase(),
                registry_column_type: self.column_type,
                registry_phase: self.phase,
            });
        }
        self.strategies.push(strategy);
        Ok(self)
    }

    pub fn column_type(&self) -> ColumnRole {
        self.column_type
    }

    pub fn phase(&self) -> TransformPhase {
        self.phase
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Registered strategies in registration order.
    pub fn strategies(&self) -> &[S] {
        &self.strategies
    }

    /// Qualifying strategies, highest total score first.
    pub fn resolve(&self, stats: &S::Stats, is_target: bool) -> Vec<RankedStrategy<'_, S>> {
        let mut ranked: Vec<RankedStrategy<'_, S>> = self
            .strategies
            .iter()
            .filter(|s| s.should_apply(stats, is_target))
            .map(|strategy| RankedStrategy {
                strategy,
                score: strategy.priority(stats),
            })
            .collect();
        ranked.sort_by_key(|r| Reverse(r.score.total()));
        ranked
    }

    /// Apply qualifying strategies in ranked order and keep every output.
    ///
    /// `Single` stops after the winner; `Chained` feeds each output into the
    /// next strategy. All strategies see the same statistics snapshot. The
    /// result is empty when nothing qualifies.
    pub fn run(
        &self,
        data: &Series,
        stats: &S::Stats,
        is_target: bool,
        mode: ApplicationMode,
    ) -> Result<Vec<AppliedStep<'_, S>>> {
        let ranked = self.resolve(stats, is_target);
        if ranked.is_empty() {
            debug!("{:?} on '{}': no strategy qualifies", self.phase, data.name());
            return Ok(Vec::new());
        }

        let take = match mode {
            ApplicationMode::Single => 1,
            ApplicationMode::Chained => ranked.len(),
        };

        let mut steps: Vec<AppliedStep<'_, S>> = Vec::with_capacity(take);
        for candidate in ranked.into_iter().take(take) {
            debug!(
                "{:?} on '{}': applying '{}' (score {})",
                self.phase,
                data.name(),
                candidate.strategy.name(),
                candidate.score.total()
            );
            let input = steps.last().map_or(data, |step| &step.output);
            let output = candidate.strategy.apply(input, stats)?;
            steps.push(AppliedStep {
                strategy: candidate.strategy,
                score: candidate.score,
                output,
            });
        }
        Ok(steps)
    }

    /// Apply only the top-ranked strategy; the input comes back unchanged if none qualifies.
    pub fn apply(&self, data: &Series, stats: &S::Stats, is_target: bool) -> Result<Series> {
        let steps = self.run(data, stats, is_target, ApplicationMode::Single)?;
        Ok(last_output(data, steps))
    }

    /// Apply every qualifying strategy in ranked order, each on the previous
    /// output, all against the same statistics snapshot.
    pub fn apply_all(&self, data: &Series, stats: &S::Stats, is_target: bool) -> Result<Series> {
        let steps = self.run(data, stats, is_target, ApplicationMode::Chained)?;
        Ok(last_output(data, steps))
    }

    /// Justification for the strategy `apply` would pick.
    pub fn explain(&self, stats: &S::Stats, is_target: bool) -> Option<String> {
        self.resolve(stats, is_target)
            .first()
            .map(|top| top.strategy.explain(stats))
    }

    /// One line per qualifying strategy, in ranked order.
    pub fn explain_ranking(&self, stats: &S::Stats, is_target: bool) -> Vec<String> {
        self.resolve(stats, is_target)
            .iter()
            .enumerate()
            .map(|(i, r)| format!("{}. {} (priority {})", i + 1, r.strategy.name(), r.score))
            .collect()
    }
}

fn last_output<S>(data: &Series, steps: Vec<AppliedStep<'_, S>>) -> Series {
    steps
        .into_iter()
        .last()
        .map_or_else(|| data.clone(), |step| step.output)
}

// =============================================================================
// Default registries
// =============================================================================

pub fn build_numeric_imputation_registry(_config: &EngineConfig) -> Result<NumericRegistry> {
    Ok(
        StrategyRegistry::new(ColumnRole::Numerical, TransformPhase::Imputation)
            .register(NumericStrategy::Median)?
            .register(NumericStrategy::Mean)?
            .register(NumericStrategy::Mode)?
            .register(NumericStrategy::ConstantZero)?
            .register(NumericStrategy::UpperBoundary)?
            .register(NumericStrategy::LowerBoundary)?,
    )
}

pub fn build_numeric_outlier_registry(config: &EngineConfig) -> Result<NumericRegistry> {
    Ok(
        StrategyRegistry::new(ColumnRole::Numerical, TransformPhase::Outlier)
            .register(NumericStrategy::Iqr)?
            .register(NumericStrategy::Winsorize)?
            .register(NumericStrategy::ZScore {
                threshold: config.zscore_threshold,
            })?,
    )
}

pub fn build_numeric_scaling_registry(_config: &EngineConfig) -> Result<NumericRegistry> {
    Ok(
        StrategyRegistry::new(ColumnRole::Numerical, TransformPhase::Scaling)
            .register(NumericStrategy::StandardScaler)?
            .register(NumericStrategy::MinMaxScaler)?
            .register(NumericStrategy::LogTransform)?
            .register(NumericStrategy::RobustScaler)?,
    )
}

pub fn build_categorical_imputation_registry(
    config: &EngineConfig,
) -> Result<CategoricalRegistry> {
    Ok(
        StrategyRegistry::new(ColumnRole::Categorical, TransformPhase::Imputation)
            .register(CategoricalStrategy::Mode)?
            .register(CategoricalStrategy::missing_indicator(
                config.missing_label.clone(),
            ))?,
    )
}

pub fn build_categorical_outlier_registry(config: &EngineConfig) -> Result<CategoricalRegistry> {
    Ok(
        StrategyRegistry::new(ColumnRole::Categorical, TransformPhase::Outlier)
            .register(CategoricalStrategy::rare_grouping(config.rare_label.clone()))?
            .register(CategoricalStrategy::NormalizeSpelling)?,
    )
}

/// Categorical columns have no scaling strategies; the registry stays empty.
pub fn build_categorical_scaling_registry(_config: &EngineConfig) -> Result<CategoricalRegistry> {
    Ok(StrategyRegistry::new(
        ColumnRole::Categorical,
        TransformPhase::Scaling,
    ))
}
