//! Error types for the cleaning engine.
//!
//! Two failures are fatal by nature and get their own types:
//! [`ProfilingError`] for columns the profiler cannot describe and
//! [`IncompatibleStrategyError`] for registries assembled from the wrong
//! strategies. Everything surfaces to callers as [`CleaningError`].
//!
//! Numerically degenerate input (zero variance, zero IQR) is not an error:
//! strategies fall back to the identity transform instead.

use crate::config::ConfigValidationError;
use crate::types::{ColumnRole, TransformPhase};
use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// A column the profiler cannot turn into statistics.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProfilingError {
    /// The column has no rows at all.
    #[error("Column '{0}' is empty")]
    EmptyColumn(String),

    /// The column's dtype cannot be profiled as the requested family.
    #[error("Column '{column}' has unsupported dtype {dtype} for {family} profiling")]
    UnsupportedType {
        column: String,
        dtype: String,
        family: &'static str,
    },

    /// The declared role carries no statistics (datetime, identifiers, dropped columns).
    #[error("Column '{column}' with role {role:?} cannot be profiled")]
    UnsupportedRole { column: String, role: ColumnRole },
}

/// A strategy was registered into a registry built for another column type or phase.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "Strategy '{strategy}' is for {strategy_column_type:?}/{strategy_phase:?}, \
     registry expects {registry_column_type:?}/{registry_phase:?}"
)]
pub struct IncompatibleStrategyError {
    pub strategy: &'static str,
    pub strategy_column_type: ColumnRole,
    pub strategy_phase: TransformPhase,
    pub registry_column_type: ColumnRole,
    pub registry_phase: TransformPhase,
}

/// The main error type for the cleaning engine.
#[derive(Error, Debug)]
pub enum CleaningError {
    /// Column statistics could not be computed.
    #[error(transparent)]
    Profiling(#[from] ProfilingError),

    /// A registry was misconfigured at build time.
    #[error(transparent)]
    IncompatibleStrategy(#[from] IncompatibleStrategyError),

    /// Engine configuration failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigValidationError),

    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<CleaningError>,
    },
}

impl CleaningError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        CleaningError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code for callers that branch on the failure kind.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Profiling(ProfilingError::EmptyColumn(_)) => "EMPTY_COLUMN",
            Self::Profiling(ProfilingError::UnsupportedType { .. }) => "UNSUPPORTED_TYPE",
            Self::Profiling(ProfilingError::UnsupportedRole { .. }) => "UNSUPPORTED_ROLE",
            Self::IncompatibleStrategy(_) => "INCOMPATIBLE_STRATEGY",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Whether this error came from the profiler.
    pub fn is_profiling(&self) -> bool {
        match self {
            Self::Profiling(_) => true,
            Self::WithContext { source, .. } => source.is_profiling(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for CleaningError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("CleaningError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, CleaningError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| CleaningError::Polars(e).with_context(context))
    }
}
