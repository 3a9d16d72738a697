//! Shared utilities for profiling and strategy application.
//!
//! Numeric helpers treat non-finite floats (`NaN`, `inf`, `-inf`) the same as
//! a null: they count as missing and come out of a transform as null.

use polars::prelude::*;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Category of a data type for profiling purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DtypeCategory {
    /// Integer or floating point numbers
    Numeric,
    /// Date or datetime types
    Datetime,
    /// Boolean type
    Boolean,
    /// String/categorical text type
    String,
    /// Other/unknown types
    Other,
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType is a datetime type.
#[inline]
pub fn is_datetime_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Datetime(_, _) | DataType::Date | DataType::Time
    )
}

/// Get the category of a DataType.
pub fn get_dtype_category(dtype: &DataType) -> DtypeCategory {
    if is_numeric_dtype(dtype) {
        DtypeCategory::Numeric
    } else if is_datetime_dtype(dtype) {
        DtypeCategory::Datetime
    } else if matches!(dtype, DataType::Boolean) {
        DtypeCategory::Boolean
    } else if matches!(dtype, DataType::String | DataType::Categorical(_, _)) {
        DtypeCategory::String
    } else {
        DtypeCategory::Other
    }
}

// =============================================================================
// Value Extraction
// =============================================================================

/// Values of a numeric or boolean Series as `f64`, with nulls and non-finite values as `None`.
pub fn numeric_values(series: &Series) -> PolarsResult<Vec<Option<f64>>> {
    let float_series = series.cast(&DataType::Float64)?;
    Ok(float_series
        .f64()?
        .into_iter()
        .map(|v| v.filter(|val| val.is_finite()))
        .collect())
}

/// Values of a Series rendered as strings, with nulls as `None`.
pub fn string_values(series: &Series) -> PolarsResult<Vec<Option<String>>> {
    let str_series = series.cast(&DataType::String)?;
    Ok(str_series
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

// =============================================================================
// Series Transformation Utilities
// =============================================================================

/// Apply `f` to every present value of a numeric Series; missing values stay
/// null, and so does any non-finite result of `f`.
pub fn map_numeric<F>(series: &Series, f: F) -> PolarsResult<Series>
where
    F: Fn(f64) -> f64,
{
    let values: Vec<Option<f64>> = numeric_values(series)?
        .into_iter()
        .map(|v| v.map(&f).filter(|val| val.is_finite()))
        .collect();
    Ok(Series::new(series.name().clone(), values))
}

/// Clamp every present value of a numeric Series into `[lower, upper]`.
///
/// Never panics: an inverted or `NaN` bound clamps like `max(lower).min(upper)`.
pub fn clip_numeric(series: &Series, lower: f64, upper: f64) -> PolarsResult<Series> {
    map_numeric(series, |val| val.max(lower).min(upper))
}

/// Fill missing values in a numeric Series with a specific value.
pub fn fill_numeric_nulls(series: &Series, fill_value: f64) -> PolarsResult<Series> {
    let values: Vec<f64> = numeric_values(series)?
        .into_iter()
        .map(|v| v.unwrap_or(fill_value))
        .collect();
    Ok(Series::new(series.name().clone(), values))
}

/// Fill null values in a string-like Series with a specific value.
pub fn fill_string_nulls(series: &Series, fill_value: &str) -> PolarsResult<Series> {
    let values: Vec<String> = string_values(series)?
        .into_iter()
        .map(|v| v.unwrap_or_else(|| fill_value.to_string()))
        .collect();
    Ok(Series::new(series.name().clone(), values))
}

/// Apply `f` to every present value of a string-like Series; nulls stay null.
pub fn map_strings<F>(series: &Series, f: F) -> PolarsResult<Series>
where
    F: Fn(String) -> String,
{
    let values: Vec<Option<String>> = string_values(series)?
        .into_iter()
        .map(|v| v.map(&f))
        .collect();
    Ok(Series::new(series.name().clone(), values))
}

/// Lower-case and trim a category value.
pub fn normalize_category(value: &str) -> String {
    value.trim().to_lowercase()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_numeric_dtype() {
        assert!(is_numeric_dtype(&DataType::Int64));
        assert!(is_numeric_dtype(&DataType::Float64));
        assert!(!is_numeric_dtype(&DataType::String));
        assert!(!is_numeric_dtype(&DataType::Boolean));
    }

    #[test]
    fn test_dtype_category() {
        assert_eq!(get_dtype_category(&DataType::Int64), DtypeCategory::Numeric);
        assert_eq!(get_dtype_category(&DataType::Date), DtypeCategory::Datetime);
        assert_eq!(
            get_dtype_category(&DataType::Boolean),
            DtypeCategory::Boolean
        );
        assert_eq!(get_dtype_category(&DataType::String), DtypeCategory::String);
        assert_eq!(
            get_dtype_category(&DataType::Datetime(TimeUnit::Milliseconds, None)),
            DtypeCategory::Datetime
        );
    }

    #[test]
    fn test_numeric_values_treats_non_finite_as_missing() {
        let series = Series::new(
            "x".into(),
            &[Some(1.0), None, Some(f64::NAN), Some(f64::INFINITY), Some(f64::NEG_INFINITY)],
        );
        assert_eq!(
            numeric_values(&series).unwrap(),
            vec![Some(1.0), None, None, None, None]
        );
    }

    #[test]
    fn test_map_numeric_nulls_non_finite_results() {
        let series = Series::new("x".into(), &[0.0f64, 1.0, -1.0]);
        let mapped = map_numeric(&series, |x| 1.0 / x).unwrap();
        assert_eq!(
            numeric_values(&mapped).unwrap(),
            vec![None, Some(1.0), Some(-1.0)]
        );
        assert_eq!(mapped.null_count(), 1);
    }

    #[test]
    fn test_clip_numeric_inverted_bounds_does_not_panic() {
        let series = Series::new("v".into(), &[1.0f64, 5.0, 9.0]);
        let clipped = clip_numeric(&series, 6.0, 4.0).unwrap();
        assert_eq!(clipped.len(), 3);

        let clipped = clip_numeric(&series, f64::NAN, f64::NAN).unwrap();
        assert!(clipped.equals_missing(&series));
    }

    #[test]
    fn test_numeric_values_from_integers() {
        let series = Series::new("x".into(), &[1i64, 2, 3]);
        assert_eq!(
            numeric_values(&series).unwrap(),
            vec![Some(1.0), Some(2.0), Some(3.0)]
        );
    }

    #[test]
    fn test_fill_numeric_nulls() {
        let series = Series::new("test".into(), &[Some(1.0), None, Some(3.0)]);
        let filled = fill_numeric_nulls(&series, 0.0).unwrap();

        assert_eq!(filled.null_count(), 0);
        assert_eq!(filled.name().as_str(), "test");
        assert_eq!(filled.get(1).unwrap().try_extract::<f64>().unwrap(), 0.0);
    }

    #[test]
    fn test_clip_numeric_keeps_nulls() {
        let series = Series::new("v".into(), &[Some(-10.0), None, Some(5.0), Some(99.0)]);
        let clipped = clip_numeric(&series, 0.0, 10.0).unwrap();
        assert_eq!(
            numeric_values(&clipped).unwrap(),
            vec![Some(0.0), None, Some(5.0), Some(10.0)]
        );
    }

    #[test]
    fn test_fill_string_nulls() {
        let series = Series::new("c".into(), &[Some("a"), None, Some("b")]);
        let filled = fill_string_nulls(&series, "Missing").unwrap();
        assert_eq!(
            string_values(&filled).unwrap(),
            vec![
                Some("a".to_string()),
                Some("Missing".to_string()),
                Some("b".to_string())
            ]
        );
    }

    #[test]
    fn test_normalize_category() {
        assert_eq!(normalize_category("  Red "), "red");
        assert_eq!(normalize_category("BLUE"), "blue");
    }
}
