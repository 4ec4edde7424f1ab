//! Engine error type.
//!
//! Every failure the engine can report is a caller contract violation: bad
//! generation parameters or an out-of-range policy id. Numeric edge cases such
//! as a zero drawdown are encoded in the results (infinite ratios), not here.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
    #[error("unknown policy id {0} (expected 1..=20)")]
    UnknownPolicy(u8),
}

impl SimError {
    pub(crate) fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        Self::InvalidParameter {
            name,
            value,
            reason,
        }
    }
}

/// Reject anything outside `[0, 1]` (NaN included).
pub(crate) fn check_probability(name: &'static str, value: f64) -> Result<(), SimError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SimError::invalid(name, value, "probability must lie in [0, 1]"))
    }
}

/// Reject zero, negative, NaN and infinite payoffs.
pub(crate) fn check_payoff(name: &'static str, value: f64) -> Result<(), SimError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::invalid(name, value, "payoff must be finite and > 0"))
    }
}

pub(crate) fn check_count(name: &'static str, value: usize) -> Result<(), SimError> {
    if value > 0 {
        Ok(())
    } else {
        Err(SimError::invalid(name, 0.0, "count must be > 0"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probability_bounds_are_inclusive() {
        assert!(check_probability("p", 0.0).is_ok());
        assert!(check_probability("p", 1.0).is_ok());
        assert!(check_probability("p", -0.01).is_err());
        assert!(check_probability("p", 1.01).is_err());
        assert!(check_probability("p", f64::NAN).is_err());
    }

    #[test]
    fn payoff_must_be_positive_and_finite() {
        assert!(check_payoff("avg_win", 0.5).is_ok());
        assert!(check_payoff("avg_win", 0.0).is_err());
        assert!(check_payoff("avg_win", -3.0).is_err());
        assert!(check_payoff("avg_win", f64::INFINITY).is_err());
    }

    #[test]
    fn error_message_names_the_parameter() {
        let err = check_payoff("avg_loss", -1.0).unwrap_err();
        assert!(err.to_string().contains("avg_loss"));
    }
}
