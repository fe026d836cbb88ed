//! Extraction strategy trait and core types
//!
//! Provides the [`ExtractionStrategy`] trait: one implementation per layout
//! of coordinate data inside a figure's object model.

use plotcheck_figure::{AxisPair, ExtractedSeries, FigureSnapshot};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Knows where one family of charts keeps its plotted coordinates
///
/// # Contract
/// `extract()` must be deterministic and must never return an empty series
/// for a figure it understands; an empty series is `ExtractError::EmptySeries`.
pub trait ExtractionStrategy: Send + Sync + fmt::Debug {
    /// Read the plotted data out of a snapshot
    ///
    /// # Errors
    /// - `ExtractError::MissingStructure` if the expected structure is absent
    /// - `ExtractError::EmptySeries` if it is present but holds no points
    /// - `ExtractError::NonNumeric` if a coordinate is not a number
    fn extract(&self, snapshot: &FigureSnapshot) -> Result<Extraction, ExtractError>;

    /// Axes compared against the golden dataset, `None` for presence-only
    fn axes(&self) -> Option<AxisPair>;

    /// Strategy name (for configuration and reports)
    fn name(&self) -> StrategyName;
}

/// What a strategy could establish about a figure
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    /// Coordinates to compare value by value
    Series(ExtractedSeries),

    /// Only that a non-empty primary series exists
    ///
    /// Weaker than [`Extraction::Series`]: nothing is compared.
    Presence {
        /// Points in the primary series
        points: usize,
    },
}

impl Extraction {
    /// Series, if values were extracted
    #[inline]
    #[must_use]
    pub fn series(&self) -> Option<&ExtractedSeries> {
        match self {
            Self::Series(series) => Some(series),
            Self::Presence { .. } => None,
        }
    }

    /// Check for the presence-only tier
    #[inline]
    #[must_use]
    pub fn is_presence_only(&self) -> bool {
        matches!(self, Self::Presence { .. })
    }
}

/// Built-in strategies, selectable by name from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyName {
    /// Primary series as (x, y) rows
    DataSeries,
    /// Primary series as (theta, r) rows
    Polar,
    /// First path of the first collection, closing vertex dropped
    ClosedPath,
    /// Non-empty primary series only
    Presence,
}

impl StrategyName {
    /// All built-in strategy names
    pub const ALL: [StrategyName; 4] = [
        StrategyName::DataSeries,
        StrategyName::Polar,
        StrategyName::ClosedPath,
        StrategyName::Presence,
    ];

    /// Configuration identifier
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DataSeries => "data-series",
            Self::Polar => "polar",
            Self::ClosedPath => "closed-path",
            Self::Presence => "presence",
        }
    }
}

impl fmt::Display for StrategyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyName {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| ExtractError::UnknownStrategy(s.to_string()))
    }
}

/// Extraction failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    /// No strategy registered for the kind
    #[error("no extraction strategy registered for '{0}'")]
    UnsupportedKind(String),

    /// Series exists but has no points
    #[error("series at {location} is empty")]
    EmptySeries {
        /// Where the series was read
        location: String,
    },

    /// Expected structure is absent or has the wrong shape
    #[error("expected coordinate structure at {location}: {detail}")]
    MissingStructure {
        /// JSON location that was expected
        location: String,
        /// What was found instead
        detail: String,
    },

    /// A coordinate is not a number
    #[error("non-numeric coordinate at {location}[{index}]")]
    NonNumeric {
        /// Array holding the coordinate
        location: String,
        /// Row index of the coordinate
        index: usize,
    },

    /// Configuration names a strategy that does not exist
    #[error("unknown strategy name '{0}'")]
    UnknownStrategy(String),
}

/// Read `(first, second)` coordinate pairs from an array of rows
///
/// Rows may carry extra columns (shared-x series); only the first two are
/// read. `null` coordinates become NaN.
pub(crate) fn read_pairs(value: &Value, location: &str) -> Result<Vec<[f64; 2]>, ExtractError> {
    let rows = value.as_array().ok_or_else(|| ExtractError::MissingStructure {
        location: location.to_string(),
        detail: "not an array".to_string(),
    })?;

    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            let cells = row.as_array().filter(|cells| cells.len() >= 2).ok_or_else(|| {
                ExtractError::MissingStructure {
                    location: format!("{location}[{index}]"),
                    detail: "not a coordinate pair".to_string(),
                }
            })?;
            let coordinate = |cell: &Value| match cell {
                Value::Null => Some(f64::NAN),
                other => other.as_f64(),
            };
            match (coordinate(&cells[0]), coordinate(&cells[1])) {
                (Some(a), Some(b)) => Ok([a, b]),
                _ => Err(ExtractError::NonNumeric {
                    location: location.to_string(),
                    index,
                }),
            }
        })
        .collect()
}
