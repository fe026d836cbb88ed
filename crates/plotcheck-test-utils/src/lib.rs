//! Testing utilities for the plotcheck workspace
//!
//! Synthetic figures in the renderer's document shape, scripted artifact
//! handles, and golden/artifact fixtures on temp dirs.

#![allow(missing_docs)]

use async_trait::async_trait;
use plotcheck_core::{ArtifactError, ArtifactHandle, ArtifactOpener, RunConfig};
use plotcheck_figure::{ChartKind, Variant};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

pub fn variant(n: u32) -> Variant {
    Variant::new(n).unwrap()
}

fn rows(points: &[[f64; 2]]) -> Value {
    Value::Array(points.iter().map(|[a, b]| json!([a, b])).collect())
}

/// Figure document with `points` as the primary series
pub fn line_figure(points: &[[f64; 2]]) -> Value {
    json!({
        "width": 640.0,
        "height": 480.0,
        "axes": [{ "lines": [{ "data": "data01", "xindex": 0, "yindex": 1 }], "collections": [] }],
        "data": { "data01": rows(points) }
    })
}

/// Polar figures store `[theta, r]` rows the same way
pub fn polar_figure(points: &[[f64; 2]]) -> Value {
    line_figure(points)
}

/// Filled-region figure
///
/// The polygon starts with a closing vertex at `(x0, baseline)`, runs through
/// `points`, then back along the baseline.
pub fn area_figure(points: &[[f64; 2]], baseline: f64) -> Value {
    let first_x = points.first().map_or(0.0, |p| p[0]);
    let last_x = points.last().map_or(0.0, |p| p[0]);

    let mut vertices = vec![[first_x, baseline]];
    vertices.extend_from_slice(points);
    vertices.push([last_x, baseline]);
    vertices.push([first_x, baseline]);

    json!({
        "width": 640.0,
        "height": 480.0,
        "axes": [{
            "lines": [],
            "collections": [{
                "offsets": "data01",
                "paths": [[rows(&vertices), ["M", "L", "Z"]]],
                "pathcoordinates": "data"
            }]
        }],
        "data": { "data01": [[0.0, 0.0]] }
    })
}

/// Registered kind with an empty primary series
pub fn empty_figure() -> Value {
    json!({ "axes": [{ "collections": [] }], "data": { "data01": [] } })
}

/// Figure entry that exists but holds no coordinates yet
pub fn pending_figure() -> Value {
    json!({ "axes": [{ "collections": [] }], "data": {} })
}

/// Self-contained page embedding `figure` the way the renderer does
pub fn mpld3_page(figure: &Value) -> String {
    format!(
        r#"<html>
<head><script>function mpld3_load_lib(url, callback) {{ var s = document.createElement("script"); }}</script></head>
<body>
<div id="fig_el0123"></div>
<script>
if (typeof(mpld3) !== "undefined") {{
    mpld3.draw_figure("fig_el0123", {figure});
}}
</script>
</body>
</html>
"#
    )
}

/// Golden record: identity metadata plus one array per axis
pub fn golden_record(kind: &ChartKind, variant: Variant, axes: &[(&str, &[f64])]) -> Value {
    let mut record = Map::new();
    record.insert("chart_type".to_string(), json!(kind.as_str()));
    record.insert("version".to_string(), json!(variant.get()));
    for (name, values) in axes {
        record.insert((*name).to_string(), json!(values));
    }
    Value::Object(record)
}

/// Temp dirs laid out like the rendering pipeline's output
#[derive(Debug)]
pub struct Fixture {
    dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("output")).unwrap();
        std::fs::create_dir_all(dir.path().join("test_data")).unwrap();
        Self { dir }
    }

    pub fn artifact_dir(&self) -> PathBuf {
        self.dir.path().join("output")
    }

    pub fn golden_dir(&self) -> PathBuf {
        self.dir.path().join("test_data")
    }

    pub fn write_golden(&self, kind: &ChartKind, variant: Variant, axes: &[(&str, &[f64])]) {
        let path = self
            .golden_dir()
            .join(format!("{}.json", kind.file_stem(variant)));
        let record = golden_record(kind, variant, axes);
        std::fs::write(path, serde_json::to_string_pretty(&record).unwrap()).unwrap();
    }

    pub fn write_page(&self, kind: &ChartKind, variant: Variant, figure: &Value) {
        let path = self
            .artifact_dir()
            .join(format!("{}.html", kind.file_stem(variant)));
        std::fs::write(path, mpld3_page(figure)).unwrap();
    }

    /// Run configuration pointing at this fixture
    pub fn config(&self) -> RunConfig {
        RunConfig::default()
            .with_artifact_dir(self.artifact_dir())
            .with_golden_dir(self.golden_dir())
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Scripted artifact behavior
#[derive(Debug, Clone)]
pub enum Script {
    /// Figure available from the first poll
    Ready(Value),
    /// Figure available from the given poll on
    ReadyAfter { figure: Value, polls: usize },
    /// Loads, but never exposes a figure
    NeverReady,
    /// `open` never resolves
    OpenHangs,
    /// `load` never resolves
    LoadHangs,
    /// `load` fails with a driver error
    LoadFails(String),
    /// `load` resolves after a delay, then the figure is available
    SlowLoad { figure: Value, delay: Duration },
}

#[derive(Debug)]
pub struct ScriptedArtifact {
    name: String,
    script: Script,
    polls: AtomicUsize,
}

#[async_trait]
impl ArtifactHandle for ScriptedArtifact {
    async fn load(&mut self) -> Result<(), ArtifactError> {
        match &self.script {
            Script::LoadHangs => std::future::pending().await,
            Script::LoadFails(message) => Err(ArtifactError::Driver(message.clone())),
            Script::SlowLoad { delay, .. } => {
                tokio::time::sleep(*delay).await;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    async fn figure_state(&self) -> Result<Option<Value>, ArtifactError> {
        let poll = self.polls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(match &self.script {
            Script::Ready(figure) | Script::SlowLoad { figure, .. } => Some(figure.clone()),
            Script::ReadyAfter { figure, polls } => (poll >= *polls).then(|| figure.clone()),
            Script::NeverReady
            | Script::OpenHangs
            | Script::LoadHangs
            | Script::LoadFails(_) => None,
        })
    }

    fn location(&self) -> String {
        format!("scripted://{}", self.name)
    }
}

/// Opener serving scripted artifacts; unscripted pairs are not found
#[derive(Debug, Default)]
pub struct ScriptedOpener {
    scripts: HashMap<(ChartKind, Variant), Script>,
    opened: AtomicUsize,
}

impl ScriptedOpener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, kind: ChartKind, variant: Variant, script: Script) -> Self {
        self.scripts.insert((kind, variant), script);
        self
    }

    pub fn into_shared(self) -> Arc<dyn ArtifactOpener> {
        Arc::new(self)
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ArtifactOpener for ScriptedOpener {
    async fn open(
        &self,
        kind: &ChartKind,
        variant: Variant,
    ) -> Result<Box<dyn ArtifactHandle>, ArtifactError> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        let name = kind.file_stem(variant);
        let script = self
            .scripts
            .get(&(kind.clone(), variant))
            .cloned()
            .ok_or_else(|| ArtifactError::NotFound {
                path: PathBuf::from(format!("{name}.html")),
            })?;
        if matches!(script, Script::OpenHangs) {
            std::future::pending::<()>().await;
        }
        Ok(Box::new(ScriptedArtifact {
            name,
            script,
            polls: AtomicUsize::new(0),
        }))
    }
}
