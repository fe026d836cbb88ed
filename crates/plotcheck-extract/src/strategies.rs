//! Built-in extraction strategies

use crate::strategy::{read_pairs, ExtractError, Extraction, ExtractionStrategy, StrategyName};
use plotcheck_figure::{Alignment, AxisPair, ExtractedSeries, FigureSnapshot, PRIMARY_SERIES};
use serde_json::Value;

fn primary_series(snapshot: &FigureSnapshot) -> Result<&Value, ExtractError> {
    snapshot
        .primary_series()
        .ok_or_else(|| ExtractError::MissingStructure {
            location: format!("data/{PRIMARY_SERIES}"),
            detail: "series not present".to_string(),
        })
}

fn primary_pairs(snapshot: &FigureSnapshot, axes: AxisPair) -> Result<Extraction, ExtractError> {
    let location = format!("data/{PRIMARY_SERIES}");
    let points = read_pairs(primary_series(snapshot)?, &location)?;
    if points.is_empty() {
        return Err(ExtractError::EmptySeries { location });
    }
    Ok(Extraction::Series(ExtractedSeries::new(axes, points)))
}

/// Cartesian charts drawn from the primary data series
///
/// Each row of `data01` is `[x, y, ...]`. Used for line, scatter and stem
/// charts.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataSeriesStrategy;

impl ExtractionStrategy for DataSeriesStrategy {
    fn extract(&self, snapshot: &FigureSnapshot) -> Result<Extraction, ExtractError> {
        primary_pairs(snapshot, AxisPair::cartesian())
    }

    fn axes(&self) -> Option<AxisPair> {
        Some(AxisPair::cartesian())
    }

    fn name(&self) -> StrategyName {
        StrategyName::DataSeries
    }
}

/// Polar charts: rows of `data01` are `[theta, r]`
#[derive(Debug, Clone, Copy, Default)]
pub struct PolarStrategy;

impl ExtractionStrategy for PolarStrategy {
    fn extract(&self, snapshot: &FigureSnapshot) -> Result<Extraction, ExtractError> {
        primary_pairs(snapshot, AxisPair::polar())
    }

    fn axes(&self) -> Option<AxisPair> {
        Some(AxisPair::polar())
    }

    fn name(&self) -> StrategyName {
        StrategyName::Polar
    }
}

/// Filled charts whose outline is a closed polygon
///
/// The polygon is the vertex list of the first path in the first collection
/// of the first axes. Vertex 0 is a synthetic closing vertex, so vertex
/// `i + 1` carries golden point `i`. The polygon continues past the data
/// (the baseline run back to the start), hence [`Alignment::GoldenPrefix`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ClosedPathStrategy;

impl ClosedPathStrategy {
    /// JSON pointer of the polygon vertices in a normalized snapshot
    pub const VERTICES: &'static str = "/props/axes/0/collections/0/paths/0/0";
}

impl ExtractionStrategy for ClosedPathStrategy {
    fn extract(&self, snapshot: &FigureSnapshot) -> Result<Extraction, ExtractError> {
        let location = "axes[0].collections[0].paths[0]";
        let vertices =
            snapshot
                .pointer(Self::VERTICES)
                .ok_or_else(|| ExtractError::MissingStructure {
                    location: location.to_string(),
                    detail: "no path vertices".to_string(),
                })?;

        let mut points = read_pairs(vertices, location)?;
        if points.len() <= 1 {
            return Err(ExtractError::EmptySeries {
                location: location.to_string(),
            });
        }
        points.remove(0);

        Ok(Extraction::Series(
            ExtractedSeries::new(AxisPair::cartesian(), points)
                .with_alignment(Alignment::GoldenPrefix),
        ))
    }

    fn axes(&self) -> Option<AxisPair> {
        Some(AxisPair::cartesian())
    }

    fn name(&self) -> StrategyName {
        StrategyName::ClosedPath
    }
}

/// Fallback for kinds whose coordinates are not compared
///
/// Passes on any non-empty primary series.
#[derive(Debug, Clone, Copy, Default)]
pub struct PresenceStrategy;

impl ExtractionStrategy for PresenceStrategy {
    fn extract(&self, snapshot: &FigureSnapshot) -> Result<Extraction, ExtractError> {
        let location = format!("data/{PRIMARY_SERIES}");
        let rows = primary_series(snapshot)?
            .as_array()
            .ok_or_else(|| ExtractError::MissingStructure {
                location: location.clone(),
                detail: "not an array".to_string(),
            })?;

        if rows.is_empty() {
            return Err(ExtractError::EmptySeries { location });
        }
        Ok(Extraction::Presence { points: rows.len() })
    }

    fn axes(&self) -> Option<AxisPair> {
        None
    }

    fn name(&self) -> StrategyName {
        StrategyName::Presence
    }
}
