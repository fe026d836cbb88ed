//! End-to-end runs against HTML artifacts on disk

use plotcheck_core::{RunReport, ScenarioRunner};
use plotcheck_figure::ChartKind;
use plotcheck_test_utils::{area_figure, line_figure, polar_figure, variant, Fixture};
use pretty_assertions::assert_eq;
use serde_json::Value;
use std::time::Duration;

fn statuses(report: &RunReport) -> Vec<(String, String)> {
    report
        .records
        .iter()
        .map(|r| {
            let status = match r.verdict.fail_reason() {
                Some(reason) => reason.code().to_string(),
                None => "pass".to_string(),
            };
            (r.kind.file_stem(r.variant), status)
        })
        .collect()
}

#[tokio::test]
async fn rendered_pages_verify_against_golden_data() {
    let fixture = Fixture::new();
    let line = [[0.0, 2.0], [1.0, 3.5], [2.0, 1.25]];
    let area = [[0.0, 1.0], [1.0, 2.0], [2.0, 1.5]];
    let polar = [[0.0, 1.0], [0.785_398_163_397_448_3, 1.5]];

    for v in [variant(1), variant(2)] {
        fixture.write_page(&ChartKind::Line, v, &line_figure(&line));
        fixture.write_golden(
            &ChartKind::Line,
            v,
            &[("x", &[0.0, 1.0, 2.0]), ("y", &[2.0, 3.500_000_1, 1.25])],
        );

        fixture.write_page(&ChartKind::Area, v, &area_figure(&area, 0.0));
        fixture.write_golden(
            &ChartKind::Area,
            v,
            &[("x", &[0.0, 1.0, 2.0]), ("y", &[1.0, 2.0, 1.5])],
        );

        fixture.write_page(&ChartKind::Polar, v, &polar_figure(&polar));
        fixture.write_golden(
            &ChartKind::Polar,
            v,
            &[("theta", &[0.0, 0.785_398]), ("r", &[1.0, 1.5])],
        );
    }

    let config = fixture
        .config()
        .with_kinds([ChartKind::Line, ChartKind::Area, ChartKind::Polar]);
    let report = ScenarioRunner::new(&config).unwrap().run().await.unwrap();

    assert!(report.passed(), "{}", report.generate_text());
    assert_eq!(report.records.len(), 6);
}

#[tokio::test]
async fn broken_pages_fail_with_specific_reasons() {
    let fixture = Fixture::new();
    let v1 = variant(1);

    // Rendered, but the golden record is for a different variant
    fixture.write_page(&ChartKind::Line, v1, &line_figure(&[[0.0, 1.0]]));
    std::fs::write(
        fixture.golden_dir().join("line_chart_1.json"),
        r#"{"chart_type": "line_chart", "version": 2, "x": [0.0], "y": [1.0]}"#,
    )
    .unwrap();

    // Page without a figure call
    std::fs::write(
        fixture.artifact_dir().join("bar_chart_1.html"),
        "<html><body>render failed</body></html>",
    )
    .unwrap();

    // Truncated figure document
    std::fs::write(
        fixture.artifact_dir().join("pie_chart_1.html"),
        r#"<script>mpld3.draw_figure("fig_el1", {"data": {"data01": [[0.0, "#,
    )
    .unwrap();

    let config = fixture
        .config()
        .with_kinds([ChartKind::Line, ChartKind::Bar, ChartKind::Pie, ChartKind::Area])
        .with_variant_count(1)
        .with_snapshot_timeout(Duration::from_millis(200))
        .with_poll_interval(Duration::from_millis(20));
    let report = ScenarioRunner::new(&config).unwrap().run().await.unwrap();

    assert_eq!(
        statuses(&report),
        vec![
            ("line_chart_1".to_string(), "golden-invalid".to_string()),
            ("bar_chart_1".to_string(), "snapshot-timeout".to_string()),
            ("pie_chart_1".to_string(), "malformed-figure".to_string()),
            ("area_chart_1".to_string(), "artifact-unavailable".to_string()),
        ]
    );

    let json: Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["records"][3]["verdict"]["status"], "fail");
    assert_eq!(
        json["records"][3]["verdict"]["detail"]["code"],
        "artifact-unavailable"
    );
    assert_eq!(json["cancelled"], false);
}
