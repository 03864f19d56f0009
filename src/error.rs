//! Error types for distribution evaluation.

use std::fmt;

/// Result type for distribution operations.
pub type StatsResult<T> = Result<T, StatsError>;

/// Errors that can occur while evaluating the studentized range distribution.
#[derive(Debug, Clone)]
pub enum StatsError {
    /// Invalid parameter value (k < 2, nu <= 0, q < 0, non-finite input).
    InvalidParameter {
        name: String,
        value: f64,
        reason: String,
    },

    /// Probability value outside (0, 1).
    InvalidProbability { value: f64 },

    /// Iterative search exhausted its budget without meeting tolerance.
    ///
    /// Carries the best available estimate so the caller can decide whether
    /// to retry with looser tolerances.
    NonConvergence {
        iterations: usize,
        best: f64,
        context: String,
    },

    /// An intermediate value reached NaN or infinity despite log-domain
    /// evaluation. Never returned as a numeric result.
    NumericalInstability { context: String },
}

impl fmt::Display for StatsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter {
                name,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{}' = {}: {}", name, value, reason)
            }
            Self::InvalidProbability { value } => {
                write!(f, "Invalid probability {}: must be in (0, 1)", value)
            }
            Self::NonConvergence {
                iterations,
                best,
                context,
            } => {
                write!(
                    f,
                    "{} did not converge after {} evaluations (best estimate {})",
                    context, iterations, best
                )
            }
            Self::NumericalInstability { context } => {
                write!(f, "Numerical instability in {}", context)
            }
        }
    }
}

impl std::error::Error for StatsError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StatsError::InvalidParameter {
            name: "nu".to_string(),
            value: -1.0,
            reason: "must be positive".to_string(),
        };
        assert!(err.to_string().contains("nu"));
        assert!(err.to_string().contains("-1"));

        let err = StatsError::InvalidProbability { value: 1.5 };
        assert!(err.to_string().contains("1.5"));
        assert!(err.to_string().contains("(0, 1)"));

        let err = StatsError::NonConvergence {
            iterations: 100,
            best: 3.5,
            context: "quantile search".to_string(),
        };
        assert!(err.to_string().contains("100"));
        assert!(err.to_string().contains("3.5"));
    }
}
