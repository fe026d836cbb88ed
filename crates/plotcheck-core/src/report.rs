//! Run reports

use crate::scenario::{Scenario, ScenarioState};
use plotcheck_compare::{Assurance, Verdict};
use plotcheck_figure::{ChartKind, Variant};
use serde::Serialize;
use std::fmt::Write as _;

/// Outcome of one scenario
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioRecord {
    /// Chart kind
    #[serde(rename = "chart_kind")]
    pub kind: ChartKind,
    /// Variant
    pub variant: Variant,
    /// The scenario's single verdict
    pub verdict: Verdict,
    /// States visited, `NotStarted` through `Done`
    pub states: Vec<ScenarioState>,
    /// Wall time spent on the scenario
    pub elapsed_ms: u64,
}

impl ScenarioRecord {
    /// Scenario this record belongs to
    #[must_use]
    pub fn scenario(&self) -> Scenario {
        Scenario::new(self.kind.clone(), self.variant)
    }
}

/// Aggregated verdicts of a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    /// Records in matrix order
    pub records: Vec<ScenarioRecord>,
    /// The run was cancelled; only completed scenarios are recorded
    pub cancelled: bool,
    /// Wall time of the whole run
    pub elapsed_ms: u64,
}

impl RunReport {
    /// Check that every scenario ran and passed
    #[must_use]
    pub fn passed(&self) -> bool {
        !self.cancelled && self.records.iter().all(|r| r.verdict.is_pass())
    }

    /// Failed scenarios in matrix order
    pub fn failures(&self) -> impl Iterator<Item = &ScenarioRecord> {
        self.records.iter().filter(|r| r.verdict.is_fail())
    }

    /// Number of passing scenarios
    #[must_use]
    pub fn pass_count(&self) -> usize {
        self.records.iter().filter(|r| r.verdict.is_pass()).count()
    }

    /// Number of passes that only checked presence
    #[must_use]
    pub fn presence_only_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r.verdict, Verdict::Pass(Assurance::Presence { .. })))
            .count()
    }

    /// Process exit status: 0 if passed, 1 otherwise
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        i32::from(!self.passed())
    }

    /// Pretty-printed JSON
    ///
    /// # Errors
    /// Returns the serializer error, which only happens for non-string map keys
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Human-readable summary
    #[must_use]
    pub fn generate_text(&self) -> String {
        let mut report = String::new();

        report.push_str("=== plotcheck Report ===\n\n");
        for record in &self.records {
            let _ = writeln!(
                report,
                "{:<28} {}",
                record.kind.file_stem(record.variant),
                record.verdict
            );
        }

        let failures = self.records.len() - self.pass_count();
        let _ = write!(
            report,
            "\nScenarios: {}  Passed: {}  Failed: {}",
            self.records.len(),
            self.pass_count(),
            failures
        );
        if self.presence_only_count() > 0 {
            let _ = write!(report, "  (presence only: {})", self.presence_only_count());
        }
        let _ = writeln!(report, "\nElapsed: {} ms", self.elapsed_ms);
        if self.cancelled {
            report.push_str("Run was cancelled before all scenarios completed\n");
        }

        let _ = writeln!(
            report,
            "\n=== Result: {} ===",
            if self.passed() { "PASS" } else { "FAIL" }
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plotcheck_compare::FailReason;
    use pretty_assertions::assert_eq;

    fn record(kind: ChartKind, verdict: Verdict) -> ScenarioRecord {
        ScenarioRecord {
            kind,
            variant: Variant::new(1).unwrap(),
            verdict,
            states: vec![ScenarioState::NotStarted, ScenarioState::Done],
            elapsed_ms: 3,
        }
    }

    fn pass() -> Verdict {
        Verdict::Pass(Assurance::Values {
            compared: 4,
            max_error: 0.0,
        })
    }

    #[test]
    fn any_failure_fails_the_run() {
        let report = RunReport {
            records: vec![
                record(ChartKind::Line, pass()),
                record(
                    ChartKind::Area,
                    Verdict::Fail(FailReason::SnapshotTimeout { elapsed_ms: 30_000 }),
                ),
            ],
            cancelled: false,
            elapsed_ms: 10,
        };

        assert!(!report.passed());
        assert_eq!(report.exit_code(), 1);
        let failed: Vec<_> = report.failures().map(|r| r.kind.clone()).collect();
        assert_eq!(failed, vec![ChartKind::Area]);
    }

    #[test]
    fn cancelled_run_never_passes() {
        let report = RunReport {
            records: vec![record(ChartKind::Line, pass())],
            cancelled: true,
            elapsed_ms: 10,
        };
        assert!(!report.passed());
        assert!(report.generate_text().contains("cancelled"));
    }

    #[test]
    fn text_lists_every_scenario() {
        let report = RunReport {
            records: vec![
                record(ChartKind::Line, pass()),
                record(ChartKind::Pie, Verdict::Pass(Assurance::Presence { points: 5 })),
            ],
            cancelled: false,
            elapsed_ms: 10,
        };
        let text = report.generate_text();

        assert!(text.contains("line_chart_1"));
        assert!(text.contains("pie_chart_1"));
        assert!(text.contains("presence only: 1"));
        assert!(text.ends_with("=== Result: PASS ===\n"));
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn json_uses_chart_kind_key() {
        let report = RunReport {
            records: vec![record(ChartKind::Line, pass())],
            cancelled: false,
            elapsed_ms: 10,
        };
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["records"][0]["chart_kind"], "line_chart");
        assert_eq!(json["records"][0]["variant"], 1);
        assert_eq!(json["records"][0]["verdict"]["status"], "pass");
        assert_eq!(json["records"][0]["states"][1], "done");
    }
}
