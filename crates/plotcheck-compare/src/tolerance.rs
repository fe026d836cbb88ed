//! Absolute-error comparison of numeric sequences

use crate::verdict::{Assurance, FailReason, Verdict};

/// Absolute-error bound for element-wise comparison
///
/// Element `i` agrees when `|expected[i] - actual[i]| <= epsilon`. Identical
/// values (including equal infinities) always agree; NaN never does.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    epsilon: f64,
}

impl Tolerance {
    /// Five-decimal closeness
    pub const DEFAULT_EPSILON: f64 = 1e-5;

    /// Create a tolerance
    ///
    /// # Errors
    /// Returns `ToleranceError::InvalidEpsilon` for a negative or non-finite bound
    pub fn new(epsilon: f64) -> Result<Self, ToleranceError> {
        if epsilon.is_finite() && epsilon >= 0.0 {
            Ok(Self { epsilon })
        } else {
            Err(ToleranceError::InvalidEpsilon(epsilon))
        }
    }

    /// The bound
    #[inline]
    #[must_use]
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Absolute error between two values if they agree
    #[inline]
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn agreement(&self, expected: f64, actual: f64) -> Option<f64> {
        if expected == actual {
            return Some(0.0);
        }
        let error = (expected - actual).abs();
        (error <= self.epsilon).then_some(error)
    }

    /// Compare two sequences element-wise
    ///
    /// Stops at the first diverging element. Failures are not attributed to
    /// an axis; see [`Verdict::on_axis`].
    #[must_use]
    pub fn compare(&self, expected: &[f64], actual: &[f64]) -> Verdict {
        if expected.len() != actual.len() {
            return Verdict::Fail(FailReason::LengthMismatch {
                axis: None,
                expected: expected.len(),
                actual: actual.len(),
            });
        }

        let mut max_error = 0.0_f64;
        for (index, (&e, &a)) in expected.iter().zip(actual).enumerate() {
            match self.agreement(e, a) {
                Some(error) => max_error = max_error.max(error),
                None => {
                    return Verdict::Fail(FailReason::ToleranceExceeded {
                        axis: None,
                        index,
                        expected: e,
                        actual: a,
                        error: (e - a).abs(),
                        epsilon: self.epsilon,
                    });
                }
            }
        }

        Verdict::Pass(Assurance::Values {
            compared: expected.len(),
            max_error,
        })
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            epsilon: Self::DEFAULT_EPSILON,
        }
    }
}

/// Errors constructing a tolerance
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ToleranceError {
    /// Epsilon must be finite and non-negative
    #[error("epsilon must be finite and non-negative, got {0}")]
    InvalidEpsilon(f64),
}
