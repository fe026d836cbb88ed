//! Error types for plotcheck core
//!
//! Two tiers:
//! - [`ScenarioError`] and the errors it wraps are scenario-local. They end a
//!   single scenario with a Fail verdict and never abort the run.
//! - [`RunError`] is a fault in the runner itself and aborts the whole run.

use crate::scenario::ScenarioState;
use plotcheck_compare::{FailReason, ToleranceError};
use plotcheck_extract::ExtractError;
use plotcheck_figure::{GoldenError, SnapshotError};
use std::path::PathBuf;
use std::time::Duration;

/// Failures opening or querying an artifact
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    /// No artifact at the expected location
    #[error("artifact not found: {path}")]
    NotFound {
        /// Location that was looked up
        path: PathBuf,
    },

    /// Artifact exists but could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Figure state queried before `load` completed
    #[error("artifact queried before it was loaded")]
    NotLoaded,

    /// Embedded figure document is not valid JSON
    #[error("figure document in {path} is not valid JSON: {source}")]
    InvalidFigure {
        /// Artifact holding the figure
        path: PathBuf,
        /// JSON parse error
        #[source]
        source: serde_json::Error,
    },

    /// Failure reported by an external page driver
    #[error("artifact driver error: {0}")]
    Driver(String),
}

/// Failures capturing a figure snapshot
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// No ready figure before the deadline
    #[error("no ready figure after {elapsed:?}")]
    Timeout {
        /// Time spent polling
        elapsed: Duration,
    },

    /// Artifact failed while being polled
    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    /// Figure entry exists but cannot be a figure
    #[error("figure entry is malformed: {0}")]
    Malformed(#[from] SnapshotError),
}

impl CaptureError {
    /// Check if the capture gave up waiting
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Scenario-local failure, converted into a Fail verdict
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    /// Artifact could not be opened or loaded
    #[error("artifact error: {0}")]
    Artifact(#[from] ArtifactError),

    /// Artifact did not report loaded in time
    #[error("artifact did not load within {elapsed:?}")]
    ArtifactTimeout {
        /// Load deadline that passed
        elapsed: Duration,
    },

    /// Snapshot capture failed
    #[error("capture failed: {0}")]
    Capture(#[from] CaptureError),

    /// Extraction failed
    #[error("extraction failed: {0}")]
    Extract(#[from] ExtractError),

    /// Golden dataset unavailable
    #[error("golden dataset error: {0}")]
    Golden(#[from] GoldenError),
}

impl From<ArtifactError> for FailReason {
    fn from(error: ArtifactError) -> Self {
        match error {
            ArtifactError::InvalidFigure { .. } => FailReason::MalformedFigure {
                message: error.to_string(),
            },
            other => FailReason::ArtifactUnavailable {
                message: other.to_string(),
            },
        }
    }
}

impl From<ScenarioError> for FailReason {
    fn from(error: ScenarioError) -> Self {
        match error {
            ScenarioError::Artifact(e) | ScenarioError::Capture(CaptureError::Artifact(e)) => e.into(),
            ScenarioError::ArtifactTimeout { elapsed } => FailReason::ArtifactTimeout {
                elapsed_ms: millis(elapsed),
            },
            ScenarioError::Capture(CaptureError::Timeout { elapsed }) => {
                FailReason::SnapshotTimeout {
                    elapsed_ms: millis(elapsed),
                }
            }
            ScenarioError::Capture(CaptureError::Malformed(e)) => FailReason::MalformedFigure {
                message: e.to_string(),
            },
            ScenarioError::Extract(ExtractError::UnsupportedKind(kind)) => {
                FailReason::UnsupportedKind { kind }
            }
            ScenarioError::Extract(ExtractError::EmptySeries { location }) => {
                FailReason::EmptySeries { location }
            }
            ScenarioError::Extract(e) => FailReason::MalformedFigure {
                message: e.to_string(),
            },
            ScenarioError::Golden(GoldenError::NotFound { path, .. }) => {
                FailReason::GoldenNotFound {
                    path: path.display().to_string(),
                }
            }
            ScenarioError::Golden(e) => FailReason::GoldenInvalid {
                message: e.to_string(),
            },
        }
    }
}

/// Duration in whole milliseconds, saturating
pub(crate) fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Fault in the runner's own control logic
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// Worker pool closed while scenarios were waiting for a slot
    #[error("worker pool closed")]
    PoolClosed,

    /// A scenario worker panicked
    #[error("scenario worker failed: {0}")]
    WorkerFailed(String),

    /// Scenario state machine asked for a transition it does not allow
    #[error("illegal scenario transition {from:?} -> {to:?}")]
    IllegalTransition {
        /// Current state
        from: ScenarioState,
        /// Requested state
        to: ScenarioState,
    },
}

/// Invalid run configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for a run
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// No kinds or no variants
    #[error("scenario matrix is empty")]
    EmptyMatrix,

    /// A kind listed twice
    #[error("chart kind '{0}' listed more than once")]
    DuplicateKind(String),

    /// `max_workers` is zero
    #[error("max_workers must be at least 1")]
    ZeroWorkers,

    /// A timeout or interval is zero
    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),

    /// Epsilon rejected by the comparator
    #[error(transparent)]
    Tolerance(#[from] ToleranceError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeouts_map_to_distinct_codes() {
        let artifact: FailReason = ScenarioError::ArtifactTimeout {
            elapsed: Duration::from_secs(30),
        }
        .into();
        let snapshot: FailReason = ScenarioError::Capture(CaptureError::Timeout {
            elapsed: Duration::from_millis(1500),
        })
        .into();

        assert_eq!(artifact.code(), "artifact-timeout");
        assert_eq!(snapshot, FailReason::SnapshotTimeout { elapsed_ms: 1500 });
    }

    #[test]
    fn unsupported_and_empty_stay_distinct() {
        let unsupported: FailReason =
            ScenarioError::Extract(ExtractError::UnsupportedKind("unknown-kind".into())).into();
        let empty: FailReason = ScenarioError::Extract(ExtractError::EmptySeries {
            location: "data/data01".into(),
        })
        .into();

        assert_eq!(unsupported.code(), "unsupported-kind");
        assert_eq!(empty.code(), "empty-series");
    }

    #[test]
    fn missing_golden_is_not_found() {
        let reason: FailReason = ScenarioError::Golden(GoldenError::NotFound {
            kind: plotcheck_figure::ChartKind::Line,
            variant: plotcheck_figure::Variant::new(2).unwrap(),
            path: PathBuf::from("test_data/line_chart_2.json"),
        })
        .into();
        assert_eq!(
            reason,
            FailReason::GoldenNotFound {
                path: "test_data/line_chart_2.json".to_string()
            }
        );
    }

    #[test]
    fn polled_artifact_failure_is_unavailable() {
        let reason: FailReason =
            ScenarioError::Capture(CaptureError::Artifact(ArtifactError::Driver("page crashed".into())))
                .into();
        assert_eq!(reason.code(), "artifact-unavailable");
    }

    #[test]
    fn millis_saturates() {
        assert_eq!(millis(Duration::from_millis(42)), 42);
        assert_eq!(millis(Duration::MAX), u64::MAX);
    }
}
