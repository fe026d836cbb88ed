//! Extraction against golden data
//!
//! Turns what a strategy extracted into the scenario's verdict.

use plotcheck_compare::{Assurance, FailReason, Tolerance, Verdict};
use plotcheck_extract::Extraction;
use plotcheck_figure::GoldenDataset;

/// Verdict for an extraction
///
/// Presence-only extractions pass without comparison. Series are compared
/// axis by axis in the strategy's axis order; the first failing axis decides.
#[must_use]
pub fn judge(tolerance: &Tolerance, extraction: &Extraction, golden: &GoldenDataset) -> Verdict {
    let series = match extraction {
        Extraction::Presence { points } => {
            return Verdict::Pass(Assurance::Presence { points: *points })
        }
        Extraction::Series(series) => series,
    };

    Verdict::worst(series.axes().both().into_iter().map(|axis| {
        let Some(expected) = golden.axis(axis) else {
            return Verdict::Fail(FailReason::GoldenAxisMissing { axis: axis.clone() });
        };
        let actual = series
            .aligned_column(axis, expected.len())
            .unwrap_or_default();
        tolerance.compare(expected, &actual).on_axis(axis)
    }))
}
