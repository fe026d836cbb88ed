//! Verdicts
//!
//! Exactly one [`Verdict`] is produced per scenario. A failing verdict names
//! its [`FailReason`], each of which has a stable kebab-case code.

use plotcheck_figure::AxisName;
use serde::Serialize;
use std::fmt;

/// Outcome of verifying one (kind, variant) pair
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "kebab-case")]
pub enum Verdict {
    /// Rendering reproduces the golden data to the stated assurance
    Pass(Assurance),
    /// Rendering could not be verified
    Fail(FailReason),
}

impl Verdict {
    /// Check for a pass
    #[inline]
    #[must_use]
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass(_))
    }

    /// Check for a failure
    #[inline]
    #[must_use]
    pub fn is_fail(&self) -> bool {
        matches!(self, Self::Fail(_))
    }

    /// Failure reason, if any
    #[inline]
    #[must_use]
    pub fn fail_reason(&self) -> Option<&FailReason> {
        match self {
            Self::Fail(reason) => Some(reason),
            Self::Pass(_) => None,
        }
    }

    /// Attribute an untagged comparator failure to `axis`
    #[must_use]
    pub fn on_axis(self, axis: &AxisName) -> Self {
        match self {
            Self::Fail(reason) => Self::Fail(reason.on_axis(axis)),
            pass @ Self::Pass(_) => pass,
        }
    }

    /// Fold per-axis verdicts: the first failure wins, otherwise the passes
    /// are merged into one
    #[must_use]
    pub fn worst(verdicts: impl IntoIterator<Item = Verdict>) -> Self {
        let mut compared = 0;
        let mut max_error = 0.0_f64;
        let mut presence_points = None;

        for verdict in verdicts {
            match verdict {
                Self::Fail(reason) => return Self::Fail(reason),
                Self::Pass(Assurance::Values {
                    compared: n,
                    max_error: e,
                }) => {
                    compared += n;
                    max_error = max_error.max(e);
                }
                Self::Pass(Assurance::Presence { points }) => {
                    presence_points = Some(points);
                }
            }
        }

        match presence_points {
            Some(points) if compared == 0 => Self::Pass(Assurance::Presence { points }),
            _ => Self::Pass(Assurance::Values {
                compared,
                max_error,
            }),
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass(assurance) => write!(f, "PASS ({assurance})"),
            Self::Fail(reason) => write!(f, "FAIL [{}] {reason}", reason.code()),
        }
    }
}

/// Strength of a passing verdict
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "level", rename_all = "kebab-case")]
pub enum Assurance {
    /// Values were compared element-wise within tolerance
    Values {
        /// Number of elements compared
        compared: usize,
        /// Largest absolute error observed
        max_error: f64,
    },

    /// Only the presence of a non-empty primary series was checked
    Presence {
        /// Points in the primary series
        points: usize,
    },
}

impl fmt::Display for Assurance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Values {
                compared,
                max_error,
            } => write!(f, "{compared} values, max error {max_error:e}"),
            Self::Presence { points } => write!(f, "presence only, {points} points"),
        }
    }
}

/// Why a scenario failed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "code", rename_all = "kebab-case")]
pub enum FailReason {
    /// Artifact could not be opened or loaded
    ArtifactUnavailable {
        /// Driver or filesystem error text
        message: String,
    },

    /// Artifact did not finish loading in time
    ArtifactTimeout {
        /// Load deadline that passed, in milliseconds
        elapsed_ms: u64,
    },

    /// No ready figure appeared in time
    SnapshotTimeout {
        /// Time spent polling, in milliseconds
        elapsed_ms: u64,
    },

    /// No extraction strategy registered for the kind
    UnsupportedKind {
        /// Kind identifier as configured
        kind: String,
    },

    /// Known kind, but its data series holds no points
    EmptySeries {
        /// Where in the figure the series was read
        location: String,
    },

    /// Expected coordinate structure missing or not numeric
    MalformedFigure {
        /// What was wrong with the figure
        message: String,
    },

    /// No golden record for the pair
    GoldenNotFound {
        /// Expected record location
        path: String,
    },

    /// Golden record unreadable or for another pair
    GoldenInvalid {
        /// Parse or identity error text
        message: String,
    },

    /// Golden record lacks an axis the strategy compares
    GoldenAxisMissing {
        /// Axis the strategy needed
        axis: AxisName,
    },

    /// Extracted and golden sequences differ in length
    LengthMismatch {
        /// Axis compared, once attributed
        axis: Option<AxisName>,
        /// Golden length
        expected: usize,
        /// Extracted length
        actual: usize,
    },

    /// An element diverged beyond epsilon
    ToleranceExceeded {
        /// Axis compared, once attributed
        axis: Option<AxisName>,
        /// First diverging index
        index: usize,
        /// Golden value at `index`
        expected: f64,
        /// Rendered value at `index`
        actual: f64,
        /// Absolute error at `index`
        error: f64,
        /// Bound that was exceeded
        epsilon: f64,
    },
}

impl FailReason {
    /// Stable identifier of the reason
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::ArtifactUnavailable { .. } => "artifact-unavailable",
            Self::ArtifactTimeout { .. } => "artifact-timeout",
            Self::SnapshotTimeout { .. } => "snapshot-timeout",
            Self::UnsupportedKind { .. } => "unsupported-kind",
            Self::EmptySeries { .. } => "empty-series",
            Self::MalformedFigure { .. } => "malformed-figure",
            Self::GoldenNotFound { .. } => "golden-not-found",
            Self::GoldenInvalid { .. } => "golden-invalid",
            Self::GoldenAxisMissing { .. } => "golden-axis-missing",
            Self::LengthMismatch { .. } => "length-mismatch",
            Self::ToleranceExceeded { .. } => "tolerance-exceeded",
        }
    }

    /// Attribute a comparator failure to `axis` unless already attributed
    #[must_use]
    pub fn on_axis(self, axis: &AxisName) -> Self {
        match self {
            Self::LengthMismatch {
                axis: None,
                expected,
                actual,
            } => Self::LengthMismatch {
                axis: Some(axis.clone()),
                expected,
                actual,
            },
            Self::ToleranceExceeded {
                axis: None,
                index,
                expected,
                actual,
                error,
                epsilon,
            } => Self::ToleranceExceeded {
                axis: Some(axis.clone()),
                index,
                expected,
                actual,
                error,
                epsilon,
            },
            other => other,
        }
    }
}

impl fmt::Display for FailReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArtifactUnavailable { message } => write!(f, "artifact unavailable: {message}"),
            Self::ArtifactTimeout { elapsed_ms } => {
                write!(f, "artifact did not load within {elapsed_ms} ms")
            }
            Self::SnapshotTimeout { elapsed_ms } => {
                write!(f, "no ready figure after {elapsed_ms} ms")
            }
            Self::UnsupportedKind { kind } => write!(f, "no extraction strategy for '{kind}'"),
            Self::EmptySeries { location } => write!(f, "series at {location} is empty"),
            Self::MalformedFigure { message } => write!(f, "malformed figure: {message}"),
            Self::GoldenNotFound { path } => write!(f, "golden dataset not found: {path}"),
            Self::GoldenInvalid { message } => write!(f, "golden dataset invalid: {message}"),
            Self::GoldenAxisMissing { axis } => write!(f, "golden dataset has no '{axis}' axis"),
            Self::LengthMismatch {
                axis,
                expected,
                actual,
            } => {
                write!(f, "length mismatch")?;
                if let Some(axis) = axis {
                    write!(f, " on {axis}")?;
                }
                write!(f, ": expected {expected} values, found {actual}")
            }
            Self::ToleranceExceeded {
                axis,
                index,
                expected,
                actual,
                error,
                epsilon,
            } => {
                write!(f, "value mismatch")?;
                if let Some(axis) = axis {
                    write!(f, " on {axis}")?;
                }
                write!(
                    f,
                    " at index {index}: expected {expected}, found {actual} (error {error:e} > {epsilon:e})"
                )
            }
        }
    }
}
