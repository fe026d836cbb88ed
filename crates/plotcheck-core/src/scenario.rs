//! Scenario identity and lifecycle
//!
//! A scenario is one (kind, variant) cell of the matrix. Its lifecycle is a
//! strictly forward state machine:
//!
//! ```text
//! NotStarted → ArtifactLoading → SnapshotPending → Extracting → Comparing → Done
//!                    │                  │               │
//!                    └──────────────────┴───────────────┴──────→ Done (Fail)
//! ```

use crate::error::RunError;
use plotcheck_figure::{ChartKind, Variant};
use serde::Serialize;
use std::fmt;

/// One cell of the kind × variant matrix
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Scenario {
    /// Chart kind
    pub kind: ChartKind,
    /// Stylistic variant
    pub variant: Variant,
}

impl Scenario {
    /// Create new scenario
    #[inline]
    #[must_use]
    pub fn new(kind: ChartKind, variant: Variant) -> Self {
        Self { kind, variant }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind.file_stem(self.variant))
    }
}

/// Scenario lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScenarioState {
    /// Queued
    NotStarted,
    /// Opening the artifact and waiting for it to load
    ArtifactLoading,
    /// Polling for a ready figure
    SnapshotPending,
    /// Reading coordinates and loading the golden dataset
    Extracting,
    /// Comparing per axis
    Comparing,
    /// Verdict produced
    Done,
}

impl ScenarioState {
    /// Check for the terminal state
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done)
    }
}

/// States reachable in one step from `from`
#[must_use]
pub fn allowed_transitions(from: ScenarioState) -> &'static [ScenarioState] {
    use ScenarioState::{ArtifactLoading, Comparing, Done, Extracting, NotStarted, SnapshotPending};
    match from {
        NotStarted => &[ArtifactLoading],
        ArtifactLoading => &[SnapshotPending, Done],
        SnapshotPending => &[Extracting, Done],
        Extracting => &[Comparing, Done],
        Comparing => &[Done],
        Done => &[],
    }
}

/// Validate a state transition
///
/// # Errors
/// Returns `RunError::IllegalTransition` if `to` is not reachable from `from`
pub fn validate_transition(from: ScenarioState, to: ScenarioState) -> Result<(), RunError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(RunError::IllegalTransition { from, to })
    }
}

/// Current state plus every state visited so far
#[derive(Debug, Clone)]
pub struct StateTrace {
    visited: Vec<ScenarioState>,
}

impl StateTrace {
    /// Create a trace in `NotStarted`
    #[must_use]
    pub fn new() -> Self {
        Self {
            visited: vec![ScenarioState::NotStarted],
        }
    }

    /// Current state
    #[must_use]
    pub fn current(&self) -> ScenarioState {
        self.visited
            .last()
            .copied()
            .unwrap_or(ScenarioState::NotStarted)
    }

    /// Move to `to`
    ///
    /// # Errors
    /// Returns `RunError::IllegalTransition` and leaves the trace unchanged if
    /// the move is not allowed
    pub fn advance(&mut self, to: ScenarioState) -> Result<(), RunError> {
        validate_transition(self.current(), to)?;
        self.visited.push(to);
        Ok(())
    }

    /// Visited states in order
    #[inline]
    #[must_use]
    pub fn visited(&self) -> &[ScenarioState] {
        &self.visited
    }

    /// Consume into the visited states
    #[must_use]
    pub fn into_states(self) -> Vec<ScenarioState> {
        self.visited
    }
}

impl Default for StateTrace {
    fn default() -> Self {
        Self::new()
    }
}
