//! Configuration types for the cleaning engine.
//!
//! The engine never reads global state: an [`EngineConfig`] is built once
//! (usually through [`EngineConfig::builder()`]) and passed to the profiler
//! and registry constructors.

use serde::{Deserialize, Serialize};

/// How a phase applies the strategies its registry resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationMode {
    /// Apply only the top-ranked strategy.
    #[default]
    Single,
    /// Apply every qualifying strategy in ranked order, each on the previous output.
    Chained,
}

/// Configuration for the cleaning engine.
///
/// # Example
///
/// ```rust,ignore
/// use pills_core::config::{ApplicationMode, EngineConfig};
///
/// let config = EngineConfig::builder()
///     .rare_threshold(0.02)
///     .zscore_threshold(2.5)
///     .outlier_mode(ApplicationMode::Chained)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Frequency (0.0 - 1.0) below which a category counts as rare.
    /// Default: 0.01
    pub rare_threshold: f64,

    /// Largest unique count still considered low cardinality.
    /// Default: 10
    pub low_cardinality_max: usize,

    /// Largest unique count still considered medium cardinality.
    /// Default: 100
    pub medium_cardinality_max: usize,

    /// Number of standard deviations the z-score strategy clips at.
    /// Default: 3.0
    pub zscore_threshold: f64,

    /// Label rare categories are grouped under.
    /// Default: "Other"
    pub rare_label: String,

    /// Label written into missing categorical cells by the missing indicator.
    /// Default: "Missing"
    pub missing_label: String,

    /// Whether to run the imputation phase.
    /// Default: true
    pub handle_missing: bool,

    /// Whether to run the outlier phase.
    /// Default: true
    pub handle_outliers: bool,

    /// Whether to run the scaling phase.
    /// Default: true
    pub enable_scaling: bool,

    /// Application mode of the imputation phase.
    /// Default: Single
    pub imputation_mode: ApplicationMode,

    /// Application mode of the outlier phase.
    /// Default: Single
    pub outlier_mode: ApplicationMode,

    /// Application mode of the scaling phase.
    /// Default: Single
    pub scaling_mode: ApplicationMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rare_threshold: 0.01,
            low_cardinality_max: 10,
            medium_cardinality_max: 100,
            zscore_threshold: 3.0,
            rare_label: "Other".to_string(),
            missing_label: "Missing".to_string(),
            handle_missing: true,
            handle_outliers: true,
            enable_scaling: true,
            imputation_mode: ApplicationMode::default(),
            outlier_mode: ApplicationMode::default(),
            scaling_mode: ApplicationMode::default(),
        }
    }
}

impl EngineConfig {
    /// Create a new configuration builder.
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// The subset of settings the profiler needs.
    pub fn profiler_config(&self) -> ProfilerConfig {
        ProfilerConfig {
            rare_threshold: self.rare_threshold,
            low_cardinality_max: self.low_cardinality_max,
            medium_cardinality_max: self.medium_cardinality_max,
        }
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(0.0..=1.0).contains(&self.rare_threshold) {
            return Err(ConfigValidationError::InvalidThreshold {
                field: "rare_threshold".to_string(),
                value: self.rare_threshold,
            });
        }

        if !self.zscore_threshold.is_finite() || self.zscore_threshold <= 0.0 {
            return Err(ConfigValidationError::InvalidZScoreThreshold(
                self.zscore_threshold,
            ));
        }

        if self.low_cardinality_max == 0 || self.low_cardinality_max >= self.medium_cardinality_max
        {
            return Err(ConfigValidationError::InvalidCardinalityLimits {
                low: self.low_cardinality_max,
                medium: self.medium_cardinality_max,
            });
        }

        if self.rare_label.trim().is_empty() {
            return Err(ConfigValidationError::EmptyLabel("rare_label".to_string()));
        }

        if self.missing_label.trim().is_empty() {
            return Err(ConfigValidationError::EmptyLabel(
                "missing_label".to_string(),
            ));
        }

        Ok(())
    }
}

/// Settings consumed by [`crate::profiler::ColumnProfiler`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfilerConfig {
    pub rare_threshold: f64,
    pub low_cardinality_max: usize,
    pub medium_cardinality_max: usize,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        EngineConfig::default().profiler_config()
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid threshold for '{field}': {value} (must be between 0.0 and 1.0)")]
    InvalidThreshold { field: String, value: f64 },

    #[error("Invalid z-score threshold: {0} (must be a positive finite number)")]
    InvalidZScoreThreshold(f64),

    #[error("Invalid cardinality limits: low={low}, medium={medium} (need 0 < low < medium)")]
    InvalidCardinalityLimits { low: usize, medium: usize },

    #[error("Label '{0}' must not be empty")]
    EmptyLabel(String),
}

/// Builder for [`EngineConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct EngineConfigBuilder {
    rare_threshold: Option<f64>,
    low_cardinality_max: Option<usize>,
    medium_cardinality_max: Option<usize>,
    zscore_threshold: Option<f64>,
    rare_label: Option<String>,
    missing_label: Option<String>,
    handle_missing: Option<bool>,
    handle_outliers: Option<bool>,
    enable_scaling: Option<bool>,
    imputation_mode: Option<ApplicationMode>,
    outlier_mode: Option<ApplicationMode>,
    scaling_mode: Option<ApplicationMode>,
}

impl EngineConfigBuilder {
    /// Set the frequency below which a category is rare.
    ///
    /// # Arguments
    /// * `threshold` - Value between 0.0 and 1.0 (e.g., 0.01 = 1%)
    pub fn rare_threshold(mut self, threshold: f64) -> Self {
        self.rare_threshold = Some(threshold);
        self
    }

    /// Set the cardinality limits (low and medium upper bounds).
    pub fn cardinality_limits(mut self, low: usize, medium: usize) -> Self {
        self.low_cardinality_max = Some(low);
        self.medium_cardinality_max = Some(medium);
        self
    }

    /// Set the z-score clipping threshold.
    pub fn zscore_threshold(mut self, threshold: f64) -> Self {
        self.zscore_threshold = Some(threshold);
        self
    }

    /// Set the label rare categories are grouped under.
    pub fn rare_label(mut self, label: impl Into<String>) -> Self {
        self.rare_label = Some(label.into());
        self
    }

    /// Set the label the missing indicator writes.
    pub fn missing_label(mut self, label: impl Into<String>) -> Self {
        self.missing_label = Some(label.into());
        self
    }

    /// Enable or disable the imputation phase.
    pub fn handle_missing(mut self, enable: bool) -> Self {
        self.handle_missing = Some(enable);
        self
    }

    /// Enable or disable the outlier phase.
    pub fn handle_outliers(mut self, enable: bool) -> Self {
        self.handle_outliers = Some(enable);
        self
    }

    /// Enable or disable the scaling phase.
    pub fn enable_scaling(mut self, enable: bool) -> Self {
        self.enable_scaling = Some(enable);
        self
    }

    /// Set how the imputation phase applies resolved strategies.
    pub fn imputation_mode(mut self, mode: ApplicationMode) -> Self {
        self.imputation_mode = Some(mode);
        self
    }

    /// Set how the outlier phase applies resolved strategies.
    pub fn outlier_mode(mut self, mode: ApplicationMode) -> Self {
        self.outlier_mode = Some(mode);
        self
    }

    /// Set how the scaling phase applies resolved strategies.
    pub fn scaling_mode(mut self, mode: ApplicationMode) -> Self {
        self.scaling_mode = Some(mode);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `EngineConfig` or an error if validation fails.
    pub fn build(self) -> Result<EngineConfig, ConfigValidationError> {
        let defaults = EngineConfig::default();
        let config = EngineConfig {
            rare_threshold: self.rare_threshold.unwrap_or(defaults.rare_threshold),
            low_cardinality_max: self
                .low_cardinality_max
                .unwrap_or(defaults.low_cardinality_max),
            medium_cardinality_max: self
                .medium_cardinality_max
                .unwrap_or(defaults.medium_cardinality_max),
            zscore_threshold: self.zscore_threshold.unwrap_or(defaults.zscore_threshold),
            rare_label: self.rare_label.unwrap_or(defaults.rare_label),
            missing_label: self.missing_label.unwrap_or(defaults.missing_label),
            handle_missing: self.handle_missing.unwrap_or(defaults.handle_missing),
            handle_outliers: self.handle_outliers.unwrap_or(defaults.handle_outliers),
            enable_scaling: self.enable_scaling.unwrap_or(defaults.enable_scaling),
            imputation_mode: self.imputation_mode.unwrap_or_default(),
            outlier_mode: self.outlier_mode.unwrap_or_default(),
            scaling_mode: self.scaling_mode.unwrap_or_default(),
        };

        config.validate()?;
        Ok(config)
    }
}
