//! Subcommand handlers
//!
//! Each handler writes its output to `out` and returns the process exit code.

use anyhow::{bail, Context, Result};
use clap::ArgMatches;
use plotcheck_core::{ArtifactHandle, HtmlArtifact, RunConfig, ScenarioRunner};
use plotcheck_extract::Extraction;
use plotcheck_figure::{ChartKind, FigureSnapshot};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Exit code for configuration errors and runner faults
pub(crate) const EXIT_FATAL: i32 = 2;

/// Load `--config` if given, else the built-in defaults
pub(crate) async fn load_config(path: Option<&Path>) -> Result<RunConfig> {
    match path {
        Some(path) => RunConfig::load(path)
            .await
            .with_context(|| format!("loading configuration {}", path.display())),
        None => Ok(RunConfig::default()),
    }
}

/// Apply `run` flags on top of the loaded configuration
pub(crate) fn apply_overrides(mut config: RunConfig, args: &ArgMatches) -> RunConfig {
    if let Some(dir) = args.get_one::<PathBuf>("artifact-dir") {
        config = config.with_artifact_dir(dir.clone());
    }
    if let Some(dir) = args.get_one::<PathBuf>("golden-dir") {
        config = config.with_golden_dir(dir.clone());
    }
    if let Some(kinds) = args.get_many::<ChartKind>("kind") {
        config = config.with_kinds(kinds.cloned());
    }
    if let Some(&count) = args.get_one::<u32>("variants") {
        config = config.with_variant_count(count);
    }
    if let Some(&epsilon) = args.get_one::<f64>("epsilon") {
        config = config.with_epsilon(epsilon);
    }
    if let Some(&workers) = args.get_one::<usize>("workers") {
        config = config.with_max_workers(workers);
    }
    if let Some(&ms) = args.get_one::<u64>("timeout-ms") {
        config = config.with_snapshot_timeout(std::time::Duration::from_millis(ms));
    }
    config
}

/// `plotcheck run`
pub(crate) async fn run(config: &RunConfig, json: bool, out: &mut dyn Write) -> Result<i32> {
    let runner = ScenarioRunner::new(config).context("invalid run configuration")?;

    let interrupt = async {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling outstanding scenarios");
        } else {
            // No signal handler: never cancel
            std::future::pending::<()>().await;
        }
    };
    let report = runner.run_until(interrupt).await?;

    if json {
        writeln!(out, "{}", report.to_json()?)?;
    } else {
        write!(out, "{}", report.generate_text())?;
    }
    Ok(report.exit_code())
}

/// `plotcheck kinds`
pub(crate) fn kinds(config: &RunConfig, out: &mut dyn Write) -> Result<i32> {
    let registry = config.registry();
    for kind in registry.kinds() {
        let strategy = registry
            .strategy_for(kind)
            .map_or("-", |s| s.name().as_str());
        let marker = if config.kinds.contains(kind) { "*" } else { " " };
        writeln!(out, "{marker} {:<20} {strategy}", kind.as_str())?;
    }
    Ok(0)
}

/// `plotcheck inspect`
pub(crate) async fn inspect(
    config: &RunConfig,
    kind: &ChartKind,
    file: &Path,
    out: &mut dyn Write,
) -> Result<i32> {
    let mut artifact = HtmlArtifact::new(file);
    artifact.load().await?;

    let Some(figure) = artifact.figure_state().await? else {
        bail!("no figure call found in {}", file.display());
    };
    let snapshot = FigureSnapshot::from_value(figure)?;
    if !snapshot.is_ready() {
        bail!("figure in {} holds no coordinates", file.display());
    }

    tracing::debug!("Inspecting {} as {}", file.display(), kind);

    match config.registry().extract(kind, &snapshot)? {
        Extraction::Series(series) => {
            let axes = series.axes();
            writeln!(
                out,
                "{} points ({}, {})",
                series.len(),
                axes.independent,
                axes.dependent
            )?;
            for (i, [a, b]) in series.points().iter().enumerate() {
                writeln!(out, "{i:>5}  {a:>14}  {b:>14}")?;
            }
        }
        Extraction::Presence { points } => {
            writeln!(out, "{points} points (presence only)")?;
        }
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::command;
    use plotcheck_test_utils::{area_figure, line_figure, variant, Fixture};

    fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn overrides_replace_loaded_values() {
        let matches = command()
            .try_get_matches_from([
                "plotcheck", "run", "--kind", "area", "--variants", "3", "--epsilon", "0.5",
                "--workers", "8", "--timeout-ms", "250",
            ])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        let config = apply_overrides(RunConfig::default(), args);

        assert_eq!(config.kinds, vec![ChartKind::Area]);
        assert_eq!(config.variants.len(), 3);
        assert!((config.epsilon - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.max_workers, 8);
        assert_eq!(config.snapshot_timeout_ms, 250);
    }

    #[test]
    fn kinds_marks_configured_matrix() {
        let config = RunConfig::default().with_kinds([ChartKind::Polar]);
        let mut buf = Vec::new();
        assert_eq!(kinds(&config, &mut buf).unwrap(), 0);

        let text = output(buf);
        let polar = text.lines().find(|l| l.contains("polar_plot")).unwrap();
        assert!(polar.starts_with('*'));
        assert!(polar.ends_with("polar"));
        let area = text.lines().find(|l| l.contains("area_chart")).unwrap();
        assert!(area.starts_with(' '));
        assert!(area.ends_with("closed-path"));
    }

    #[tokio::test]
    async fn inspect_prints_area_boundary() {
        let fixture = Fixture::new();
        let v1 = variant(1);
        fixture.write_page(&ChartKind::Area, v1, &area_figure(&[[0.0, 1.0], [1.0, 2.0]], 0.0));
        let page = fixture.artifact_dir().join(ChartKind::Area.file_stem(v1) + ".html");

        let mut buf = Vec::new();
        let code = inspect(&RunConfig::default(), &ChartKind::Area, &page, &mut buf)
            .await
            .unwrap();
        assert_eq!(code, 0);

        let text = output(buf);
        // Leading baseline vertex dropped; trailing ones kept
        assert!(text.starts_with("4 points (x, y)"), "{text}");
    }

    #[tokio::test]
    async fn inspect_rejects_page_without_figure() {
        let dir = tempfile::tempdir().unwrap();
        let page = dir.path().join("line_chart_1.html");
        std::fs::write(&page, "<html></html>").unwrap();

        let mut buf = Vec::new();
        let err = inspect(&RunConfig::default(), &ChartKind::Line, &page, &mut buf)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no figure call"));
    }

    #[tokio::test]
    async fn run_writes_json_report() {
        let fixture = Fixture::new();
        let v1 = variant(1);
        fixture.write_page(&ChartKind::Line, v1, &line_figure(&[[0.0, 1.0], [1.0, 2.0]]));
        fixture.write_golden(&ChartKind::Line, v1, &[("x", &[0.0, 1.0]), ("y", &[1.0, 2.0])]);

        let config = fixture
            .config()
            .with_kinds([ChartKind::Line])
            .with_variant_count(1);
        let mut buf = Vec::new();
        let code = run(&config, true, &mut buf).await.unwrap();
        assert_eq!(code, 0);

        let json: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(json["records"][0]["chart_kind"], "line_chart");
        assert_eq!(json["records"][0]["verdict"]["status"], "pass");
    }

    #[tokio::test]
    async fn run_rejects_invalid_configuration() {
        let config = RunConfig::default().with_max_workers(0);
        let mut buf = Vec::new();
        assert!(run(&config, false, &mut buf).await.is_err());
        assert!(buf.is_empty());
    }
}
