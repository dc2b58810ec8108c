use thiserror::Error;

/// Errors raised when preview inputs or configuration violate their contracts.
#[derive(Debug, Error, PartialEq)]
pub enum PreviewError {
    #[error("{field} must be at least {min} (got {value})")]
    MinViolation {
        field: &'static str,
        min: f64,
        value: f64,
    },
    #[error("{field} must be between {min} and {max} (got {value})")]
    RangeViolation {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("{field} is not a probability (got {value})")]
    ProbabilityOutOfRange { field: &'static str, value: f64 },
    #[error("adventurer has no experience yet; combat previews start after the first kill")]
    NoExperience,
    #[error("configuration could not be parsed: {0}")]
    ConfigParse(String),
}

/// Reject values outside `[0, 1]` (including NaN) for the named probability.
///
/// # Errors
///
/// Returns [`PreviewError::ProbabilityOutOfRange`] when `value` is not a probability.
pub fn ensure_probability(field: &'static str, value: f64) -> Result<f64, PreviewError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(PreviewError::ProbabilityOutOfRange { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probability_guard_rejects_out_of_range() {
        assert_eq!(ensure_probability("p", 0.5), Ok(0.5));
        assert!(ensure_probability("p", 1.000_1).is_err());
        assert!(ensure_probability("p", -0.1).is_err());
        assert!(ensure_probability("p", f64::NAN).is_err());
    }

    #[test]
    fn messages_name_the_field() {
        let err = PreviewError::ProbabilityOutOfRange {
            field: "beast_crit_chance",
            value: 1.5,
        };
        assert_eq!(
            err.to_string(),
            "beast_crit_chance is not a probability (got 1.5)"
        );
    }
}
