//! Column Cleaning Engine
//!
//! A statistics-driven cleaning engine for tabular columns, built with Rust and Polars.
//!
//! # Overview
//!
//! For every column the engine runs three phases in order:
//!
//! - **Imputation**: fill missing values (median, mean, mode, constants, boundaries)
//! - **Outlier handling**: clip extreme values (IQR fences, winsorizing, z-score)
//! - **Scaling**: normalise the value range (standard, min-max, log, robust)
//!
//! Before each phase the column is profiled into a statistics record. Every
//! candidate strategy inspects that record, decides whether it applies and
//! reports a structured [`Score`]; the best-scoring strategy wins. Each
//! applied strategy leaves a [`TransformResult`] behind explaining the choice.
//!
//! Categorical columns go through the same pipeline with their own
//! strategies (mode imputation, missing indicator, rare grouping, spelling
//! normalisation).
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use pills_core::{ColumnRole, EngineConfig, PhaseOrchestrator};
//! use polars::prelude::*;
//! use std::collections::HashMap;
//!
//! let df = df![
//!     "age" => [Some(21.0), None, Some(35.0), Some(240.0)],
//!     "city" => [Some("Paris"), Some("Rome"), None, Some("Paris")],
//! ]?;
//!
//! let roles = HashMap::from([
//!     ("age".to_string(), ColumnRole::Numerical),
//!     ("city".to_string(), ColumnRole::Categorical),
//! ]);
//!
//! let orchestrator = PhaseOrchestrator::new(EngineConfig::default())?;
//! let outcome = orchestrator.process_frame(&df, &roles, None)?;
//!
//! for result in outcome.results() {
//!     println!("{:?} {}: {:?}", result.phase, result.strategy_name, result.notes);
//! }
//! ```
//!
//! # Custom registries
//!
//! Registries are plain values; build one directly to rank strategies
//! without running the whole pipeline:
//!
//! ```rust,ignore
//! use pills_core::strategies::{NumericStrategy, StrategyRegistry};
//! use pills_core::{ColumnProfiler, ColumnRole, TransformPhase};
//!
//! let registry = StrategyRegistry::new(ColumnRole::Numerical, TransformPhase::Outlier)
//!     .register(NumericStrategy::Iqr)?
//!     .register(NumericStrategy::ZScore { threshold: 2.5 })?;
//!
//! let stats = ColumnProfiler::default().profile_numeric(&series)?;
//! for line in registry.explain_ranking(&stats, false) {
//!     println!("{line}");
//! }
//! ```

pub mod config;
pub mod error;
pub mod pipeline;
pub mod profiler;
pub mod strategies;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use config::{ApplicationMode, ConfigValidationError, EngineConfig, EngineConfigBuilder, ProfilerConfig};
pub use error::{
    CleaningError, IncompatibleStrategyError, ProfilingError, Result as CleaningResult, ResultExt,
};
pub use pipeline::PhaseOrchestrator;
pub use profiler::ColumnProfiler;
pub use strategies::{
    AppliedStep, CategoricalStrategy, NumericStrategy, RankedStrategy, Score, StrategyFlags,
    StrategyRegistry, TransformStrategy,
};
pub use types::{
    Cardinality, CategoricalColumnStats, ColumnOutcome, ColumnRole, ColumnStats, FrameOutcome,
    NumericalColumnStats, TransformPhase, TransformResult,
};
