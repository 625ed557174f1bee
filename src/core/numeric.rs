//! Numeric input parsing and float helpers

use crate::core::error::ValidationError;

/// Default tolerance for float comparisons in calculations and tests
pub const EPSILON: f64 = 1e-9;

/// Parse a single user-entered number.
///
/// Surrounding whitespace is ignored. NaN and infinities are rejected so
/// that nothing downstream has to guard against them.
pub fn parse_value(input: &str) -> Result<f64, ValidationError> {
    let trimmed = input.trim();
    let value: f64 = trimmed.parse().map_err(|_| ValidationError::NotANumber {
        input: trimmed.to_string(),
    })?;
    if !value.is_finite() {
        return Err(ValidationError::NotANumber {
            input: trimmed.to_string(),
        });
    }
    Ok(value)
}

/// Parse a list of numbers separated by commas, whitespace or newlines.
///
/// Empty fragments (e.g. `"1,,2"`) are skipped. The first bad fragment
/// fails the whole list.
pub fn parse_values(input: &str) -> Result<Vec<f64>, ValidationError> {
    input
        .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(parse_value)
        .collect()
}

/// Reject NaN/infinite values for a named field
pub fn require_finite(value: f64, field: &'static str) -> Result<f64, ValidationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::NonFinite { field })
    }
}

/// Relative/absolute closeness check
pub fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
    let diff = (a - b).abs();
    diff <= tolerance || diff <= tolerance * a.abs().max(b.abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value(" 1.5 ").unwrap(), 1.5);
        assert_eq!(parse_value("-3e-9").unwrap(), -3e-9);
        assert_eq!(
            parse_value("abc"),
            Err(ValidationError::NotANumber {
                input: "abc".to_string()
            })
        );
        assert!(parse_value("NaN").is_err());
        assert!(parse_value("inf").is_err());
        assert!(parse_value("").is_err());
    }

    #[test]
    fn test_parse_values_mixed_separators() {
        let values = parse_values("1, 2,3\n4 5;6").unwrap();
        assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert!(parse_values("").unwrap().is_empty());
        assert!(parse_values("1,x,3").is_err());
    }

    #[test]
    fn test_approx_eq() {
        assert!(approx_eq(1.0, 1.0 + 1e-12, EPSILON));
        assert!(approx_eq(1e12, 1e12 + 1.0, EPSILON));
        assert!(!approx_eq(1.0, 1.1, EPSILON));
    }
}
