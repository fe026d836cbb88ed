//! Series extracted from a figure snapshot

use crate::axis::{AxisName, AxisPair};
use serde::Serialize;

/// How extracted points line up with a golden axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Alignment {
    /// Point `i` corresponds to golden index `i`; lengths must match
    #[default]
    Exact,

    /// Point `i` corresponds to golden index `i`, but the rendered structure
    /// continues past the data (e.g. a filled polygon returning along its
    /// baseline). Only the first `len(golden)` points are compared.
    GoldenPrefix,
}

/// Ordered (independent, dependent) pairs read out of a figure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedSeries {
    axes: AxisPair,
    points: Vec<[f64; 2]>,
    alignment: Alignment,
}

impl ExtractedSeries {
    /// Create a series with exact alignment
    #[inline]
    #[must_use]
    pub fn new(axes: AxisPair, points: Vec<[f64; 2]>) -> Self {
        Self {
            axes,
            points,
            alignment: Alignment::Exact,
        }
    }

    /// Set alignment
    #[inline]
    #[must_use]
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Axes the coordinates are plotted against
    #[inline]
    #[must_use]
    pub fn axes(&self) -> &AxisPair {
        &self.axes
    }

    /// Extracted points
    #[inline]
    #[must_use]
    pub fn points(&self) -> &[[f64; 2]] {
        &self.points
    }

    /// Alignment rule against golden data
    #[inline]
    #[must_use]
    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    /// Number of points
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if no points were extracted
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Values plotted along `axis`, or `None` if the series is not plotted on it
    #[must_use]
    pub fn column(&self, axis: &AxisName) -> Option<Vec<f64>> {
        let index = if *axis == self.axes.independent {
            0
        } else if *axis == self.axes.dependent {
            1
        } else {
            return None;
        };
        Some(self.points.iter().map(|point| point[index]).collect())
    }

    /// Values along `axis` trimmed to what the alignment compares against a
    /// golden axis of `golden_len` values
    #[must_use]
    pub fn aligned_column(&self, axis: &AxisName, golden_len: usize) -> Option<Vec<f64>> {
        let mut column = self.column(axis)?;
        if self.alignment == Alignment::GoldenPrefix {
            column.truncate(golden_len);
        }
        Some(column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn series() -> ExtractedSeries {
        ExtractedSeries::new(AxisPair::cartesian(), vec![[0.0, 1.0], [1.0, 3.0], [2.0, 0.0]])
    }

    #[test]
    fn columns_follow_axis_pair() {
        let series = series();
        assert_eq!(series.column(&AxisName::X), Some(vec![0.0, 1.0, 2.0]));
        assert_eq!(series.column(&AxisName::Y), Some(vec![1.0, 3.0, 0.0]));
        assert_eq!(series.column(&AxisName::R), None);
    }

    #[test]
    fn exact_alignment_keeps_full_column() {
        assert_eq!(series().aligned_column(&AxisName::X, 2).map(|c| c.len()), Some(3));
    }

    #[test]
    fn prefix_alignment_truncates_to_golden_length() {
        let series = series().with_alignment(Alignment::GoldenPrefix);
        assert_eq!(series.aligned_column(&AxisName::X, 2), Some(vec![0.0, 1.0]));
        // A shorter series is left short so the length check still fires
        assert_eq!(series.aligned_column(&AxisName::X, 5).map(|c| c.len()), Some(3));
    }

    proptest! {
        #[test]
        fn prefix_alignment_never_exceeds_either_length(
            ys in prop::collection::vec(-1e6f64..1e6, 0..40),
            golden_len in 0usize..60,
        ) {
            let points = ys.iter().enumerate().map(|(i, y)| [i as f64, *y]).collect();
            let series = ExtractedSeries::new(AxisPair::cartesian(), points)
                .with_alignment(Alignment::GoldenPrefix);
            let column = series.aligned_column(&AxisName::Y, golden_len).unwrap();

            prop_assert_eq!(column.len(), ys.len().min(golden_len));
            prop_assert_eq!(&column[..], &ys[..column.len()]);
        }
    }
}
