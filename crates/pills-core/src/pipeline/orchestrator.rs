//! Phase orchestration for single columns and whole frames.

use crate::config::{ApplicationMode, EngineConfig};
use crate::error::{CleaningError, Result, ResultExt};
use crate::profiler::ColumnProfiler;
use crate::strategies::{
    CategoricalStrategy, NumericStrategy, StrategyRegistry, TransformStrategy,
    build_categorical_imputation_registry, build_categorical_outlier_registry,
    build_categorical_scaling_registry, build_numeric_imputation_registry,
    build_numeric_outlier_registry, build_numeric_scaling_registry,
};
use crate::types::{ColumnOutcome, ColumnRole, ColumnStats, FrameOutcome, TransformPhase, TransformResult};
use crate::utils::{DtypeCategory, get_dtype_category};
use polars::prelude::*;
use rayon::prelude::*;
use static_assertions::assert_impl_all;
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, info};

/// The three registries of one column family.
#[derive(Debug, Clone)]
struct PhaseRegistries<S> {
    imputation: StrategyRegistry<S>,
    outlier: StrategyRegistry<S>,
    scaling: StrategyRegistry<S>,
}

impl<S> PhaseRegistries<S> {
    fn get(&self, phase: TransformPhase) -> &StrategyRegistry<S> {
        match phase {
            TransformPhase::Imputation => &self.imputation,
            TransformPhase::Outlier => &self.outlier,
            TransformPhase::Scaling => &self.scaling,
        }
    }
}

/// Runs imputation, outlier handling and scaling over columns.
///
/// Built once from an [`EngineConfig`]; immutable afterwards, so one
/// orchestrator can serve any number of threads.
///
/// # Example
///
/// ```rust,ignore
/// use pills_core::{EngineConfig, PhaseOrchestrator, ColumnRole};
///
/// let orchestrator = PhaseOrchestrator::new(EngineConfig::default())?;
/// let outcome = orchestrator.process_column(&series, ColumnRole::Numerical, false)?;
/// for result in &outcome.results {
///     println!("{:?}: {}", result.phase, result.strategy_name);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct PhaseOrchestrator {
    config: EngineConfig,
    profiler: ColumnProfiler,
    numeric: PhaseRegistries<NumericStrategy>,
    categorical: PhaseRegistries<CategoricalStrategy>,
}

assert_impl_all!(PhaseOrchestrator: Send, Sync);

impl PhaseOrchestrator {
    /// Validate the configuration and build the six default registries.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;

        let numeric = PhaseRegistries {
            imputation: build_numeric_imputation_registry(&config)?,
            outlier: build_numeric_outlier_registry(&config)?,
            scaling: build_numeric_scaling_registry(&config)?,
        };
        let categorical = PhaseRegistries {
            imputation: build_categorical_imputation_registry(&config)?,
            outlier: build_categorical_outlier_registry(&config)?,
            scaling: build_categorical_scaling_registry(&config)?,
        };

        Ok(Self {
            profiler: ColumnProfiler::new(config.profiler_config()),
            config,
            numeric,
            categorical,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn phase_enabled(&self, phase: TransformPhase) -> bool {
        match phase {
            TransformPhase::Imputation => self.config.handle_missing,
            TransformPhase::Outlier => self.config.handle_outliers,
            TransformPhase::Scaling => self.config.enable_scaling,
        }
    }

    fn phase_mode(&self, phase: TransformPhase) -> ApplicationMode {
        match phase {
            TransformPhase::Imputation => self.config.imputation_mode,
            TransformPhase::Outlier => self.config.outlier_mode,
            TransformPhase::Scaling => self.config.scaling_mode,
        }
    }

    /// Clean a single column.
    ///
    /// Datetime, identifier and dropped columns come back untouched. A
    /// `Target` role always counts as a target, whatever `is_target` says.
    pub fn process_column(
        &self,
        series: &Series,
        role: ColumnRole,
        is_target: bool,
    ) -> Result<ColumnOutcome> {
        let is_target = is_target || role == ColumnRole::Target;

        if !role.is_transformable() {
            debug!("Skipping column '{}' with role {:?}", series.name(), role);
            return Ok(ColumnOutcome::untouched(series.clone(), role, is_target));
        }

        let numeric = match role {
            ColumnRole::Numerical => true,
            ColumnRole::Categorical => false,
            _ => get_dtype_category(series.dtype()) == DtypeCategory::Numeric,
        };

        let processed = if numeric {
            self.run_phases(
                series,
                &self.numeric,
                is_target,
                |s| self.profiler.profile_numeric(s),
                ColumnStats::Numerical,
            )
        } else {
            self.run_phases(
                series,
                &self.categorical,
                is_target,
                |s| self.profiler.profile_categorical(s),
                ColumnStats::Categorical,
            )
        };
        let (data, results) = processed.context(format!("Processing column '{}'", series.name()))?;

        Ok(ColumnOutcome {
            data,
            role,
            is_target,
            results,
        })
    }

    /// Profile, resolve and apply each enabled phase in order, re-profiling
    /// between phases and after every applied strategy.
    fn run_phases<S, P, W>(
        &self,
        series: &Series,
        registries: &PhaseRegistries<S>,
        is_target: bool,
        profile: P,
        wrap: W,
    ) -> Result<(Series, Vec<TransformResult>)>
    where
        S: TransformStrategy,
        S::Stats: Clone,
        P: Fn(&Series) -> Result<S::Stats>,
        W: Fn(S::Stats) -> ColumnStats,
    {
        let mut data = series.clone();
        let mut results = Vec::new();

        for phase in TransformPhase::ALL {
            if !self.phase_enabled(phase) {
                debug!("{} disabled, skipping '{}'", phase.display_name(), series.name());
                continue;
            }

            let registry = registries.get(phase);
            if registry.is_empty() {
                continue;
            }

            let stats = profile(&data)?;
            let steps = registry.run(&data, &stats, is_target, self.phase_mode(phase))?;
            if steps.is_empty() {
                debug!("{}: nothing to do for '{}'", phase.display_name(), series.name());
                continue;
            }

            let mut before = stats.clone();
            for step in steps {
                debug!(
                    "{}: '{}' -> '{}' (score {})",
                    phase.display_name(),
                    series.name(),
                    step.strategy.name(),
                    step.score.total()
                );

                let after = profile(&step.output)?;
                results.push(TransformResult {
                    data: step.output.clone(),
                    strategy_name: step.strategy.name().to_string(),
                    phase,
                    before_stats: wrap(before),
                    after_stats: wrap(after.clone()),
                    notes: Some(step.strategy.explain(&stats)),
                });

                data = step.output;
                before = after;
            }
        }

        Ok((data, results))
    }

    /// Clean every column of a frame in parallel.
    ///
    /// Columns without an entry in `roles` are passed through as `Drop`. The
    /// output keeps the input column order.
    pub fn process_frame(
        &self,
        df: &DataFrame,
        roles: &HashMap<String, ColumnRole>,
        target: Option<&str>,
    ) -> Result<FrameOutcome> {
        if let Some(target) = target
            && df.column(target).is_err()
        {
            return Err(CleaningError::ColumnNotFound(target.to_string()));
        }

        let start = Instant::now();
        info!(
            "Processing frame: {} rows x {} columns, target: {:?}",
            df.height(),
            df.width(),
            target
        );

        let columns: Vec<ColumnOutcome> = df
            .get_columns()
            .par_iter()
            .map(|column| {
                let name = column.name().as_str();
                let role = roles.get(name).copied().unwrap_or(ColumnRole::Drop);
                let is_target = target == Some(name);
                self.process_column(column.as_materialized_series(), role, is_target)
            })
            .collect::<Result<Vec<_>>>()?;

        let data = DataFrame::new(
            columns
                .iter()
                .map(|outcome| Column::from(outcome.data.clone()))
                .collect(),
        )?;

        info!(
            "Frame processed in {:.2?}: {} strategies applied",
            start.elapsed(),
            columns.iter().map(|c| c.results.len()).sum::<usize>()
        );

        Ok(FrameOutcome { data, columns })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::numeric_values;

    fn orchestrator() -> PhaseOrchestrator {
        PhaseOrchestrator::new(EngineConfig::default()).unwrap()
    }

    fn skewed_series() -> Series {
        Series::new(
            "v".into(),
            &[Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(1000.0), None],
        )
    }

    #[test]
    fn test_numeric_column_runs_all_phases() {
        let outcome = orchestrator()
            .process_column(&skewed_series(), ColumnRole::Numerical, false)
            .unwrap();

        assert_eq!(
            outcome.applied_strategies(),
            vec!["median", "winsorize", "robust_scaler"]
        );
        assert_eq!(outcome.data.null_count(), 0);
        assert_eq!(outcome.data.name().as_str(), "v");

        let phases: Vec<TransformPhase> = outcome.results.iter().map(|r| r.phase).collect();
        assert_eq!(phases, TransformPhase::ALL.to_vec());
    }

    #[test]
    fn test_results_carry_before_and_after_stats() {
        let outcome = orchestrator()
            .process_column(&skewed_series(), ColumnRole::Numerical, false)
            .unwrap();
        let imputation = &outcome.results[0];

        assert!(imputation.before_stats.missing_ratio() > 0.0);
        assert_eq!(imputation.after_stats.missing_ratio(), 0.0);
        assert!(
            imputation
                .notes
                .as_deref()
                .is_some_and(|n| n.contains("'median'"))
        );
        assert_eq!(
            outcome.results[1].before_stats,
            outcome.results[0].after_stats
        );
    }

    #[test]
    fn test_infinite_values_do_not_survive_the_pipeline() {
        let series = Series::new(
            "v".into(),
            &[Some(-1.0), Some(0.0), Some(1.0), Some(f64::INFINITY), None, Some(2.0)],
        );
        let outcome = orchestrator()
            .process_column(&series, ColumnRole::Numerical, false)
            .unwrap();

        assert_eq!(outcome.results[0].phase, TransformPhase::Imputation);
        assert_eq!(outcome.data.null_count(), 0);
        assert!(
            numeric_values(&outcome.data)
                .unwrap()
                .iter()
                .all(|v| v.is_some_and(f64::is_finite))
        );
    }

    #[test]
    fn test_target_only_imputes() {
        let outcome = orchestrator()
            .process_column(&skewed_series(), ColumnRole::Numerical, true)
            .unwrap();
        assert_eq!(outcome.applied_strategies(), vec!["median"]);
        assert_eq!(
            numeric_values(&outcome.data).unwrap()[4],
            Some(1000.0)
        );
    }

    #[test]
    fn test_target_role_forces_target() {
        let outcome = orchestrator()
            .process_column(&skewed_series(), ColumnRole::Target, false)
            .unwrap();
        assert!(outcome.is_target);
        assert_eq!(outcome.applied_strategies(), vec!["median"]);
    }

    #[test]
    fn test_passthrough_roles() {
        let series = Series::new("id".into(), &[Some(1i64), None, Some(3)]);
        for role in [ColumnRole::Id, ColumnRole::Drop, ColumnRole::Datetime] {
            let outcome = orchestrator().process_column(&series, role, false).unwrap();
            assert!(outcome.results.is_empty());
            assert!(outcome.data.equals_missing(&series));
        }
    }

    #[test]
    fn test_categorical_column() {
        let series = Series::new(
            "c".into(),
            &[Some("a"), Some("a"), Some("b"), None, Some("c")],
        );
        let outcome = orchestrator()
            .process_column(&series, ColumnRole::Categorical, false)
            .unwrap();
        assert_eq!(outcome.applied_strategies(), vec!["mode"]);
        assert_eq!(outcome.data.null_count(), 0);
    }

    #[test]
    fn test_disabled_phases_are_skipped() {
        let config = EngineConfig::builder()
            .handle_missing(false)
            .enable_scaling(false)
            .build()
            .unwrap();
        let outcome = PhaseOrchestrator::new(config)
            .unwrap()
            .process_column(&skewed_series(), ColumnRole::Numerical, false)
            .unwrap();

        assert_eq!(outcome.data.null_count(), 1);
        assert!(
            outcome
                .results
                .iter()
                .all(|r| r.phase == TransformPhase::Outlier)
        );
    }

    #[test]
    fn test_chained_outlier_mode() {
        let config = EngineConfig::builder()
            .outlier_mode(ApplicationMode::Chained)
            .enable_scaling(false)
            .build()
            .unwrap();
        let series = Series::new(
            "v".into(),
            &[-30.0f64, 1.0, 2.0, 2.0, 3.0, 3.0, 3.0, 4.0, 4.0, 5.0, 36.0],
        );
        let outcome = PhaseOrchestrator::new(config)
            .unwrap()
            .process_column(&series, ColumnRole::Numerical, false)
            .unwrap();

        assert_eq!(
            outcome.applied_strategies(),
            vec!["iqr", "winsorize", "zscore"]
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EngineConfig {
            zscore_threshold: -1.0,
            ..EngineConfig::default()
        };
        let err = PhaseOrchestrator::new(config).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_empty_column_fails_with_context() {
        let series = Series::new("e".into(), Vec::<f64>::new());
        let err = orchestrator()
            .process_column(&series, ColumnRole::Numerical, false)
            .unwrap_err();
        assert_eq!(err.error_code(), "EMPTY_COLUMN");
        assert!(err.to_string().contains("Processing column 'e'"));
    }
}
